//! # 统一错误处理模块
//!
//! 定义 Crysio 的所有错误类型，使用 `thiserror` 派生。
//! 解析类错误均携带格式名称，调用方可以区分
//! "不是这个格式" 和 "是这个格式但文件损坏"。
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// Crysio 统一错误类型
#[derive(Error, Debug)]
pub enum CrysioError {
    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to read file: {path}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Line read failed")]
    LineReadError(#[from] std::io::Error),

    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: String },

    // ─────────────────────────────────────────────────────────────
    // 解析错误
    // ─────────────────────────────────────────────────────────────
    #[error("[{format}] missing required section or field: {what}")]
    MissingSection { format: String, what: String },

    #[error("[{format}] required column never declared: {what}")]
    MissingColumn { format: String, what: String },

    #[error("[{format}] expected a number but found '{token}' at line {line}")]
    InvalidNumber {
        format: String,
        token: String,
        line: usize,
    },

    #[error("[{format}] unexpected end of file while reading {what}")]
    UnexpectedEof { format: String, what: String },

    #[error("[{format}] unrecognized unit marker: '{unit}'")]
    UnknownUnit { format: String, unit: String },

    #[error("[{format}] unknown atomic number: {number}")]
    UnknownAtomicNumber { format: String, number: u32 },

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    // ─────────────────────────────────────────────────────────────
    // 参数错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // ─────────────────────────────────────────────────────────────
    // CSV 错误
    // ─────────────────────────────────────────────────────────────
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    // ─────────────────────────────────────────────────────────────
    // 其他
    // ─────────────────────────────────────────────────────────────
    #[error("No matching files found with pattern: {pattern}")]
    NoFilesFound { pattern: String },
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, CrysioError>;
