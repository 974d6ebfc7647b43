//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `info`: 解析结构文件并打印摘要
//! - `collect`: 批量解析目录下的结构文件，汇总成 CSV
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: collect, info

pub mod collect;
pub mod info;

use clap::{Parser, Subcommand};

/// Crysio - 晶体结构文件统一读取工具
#[derive(Parser)]
#[command(name = "crysio")]
#[command(author = "Changjiang Wu")]
#[command(version)]
#[command(about = "A unified crystal structure file reading toolkit", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Parse structure files and print a summary (.cif, .xyz, .pdb, POSCAR, ...)
    Info(info::InfoArgs),

    /// Parse every structure file under a directory and write a CSV summary
    Collect(collect::CollectArgs),
}
