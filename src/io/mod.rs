//! # 输入抽象模块
//!
//! 提供解析器消费的逐行读取源。
//!
//! ## 依赖关系
//! - 被 `parsers/` 使用
//! - 子模块: source

pub mod source;

pub use source::LineSource;
