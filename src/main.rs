//! # Crysio - 晶体结构文件统一读取工具
//!
//! 九种结构文件格式（CIF、XYZ 及变体、PDB、VASP POSCAR、CP2K、
//! Quantum-Espresso、CSSR、Gaussian cube、(A)XSF）各自用互不兼容
//! 的文本约定描述同一套物理信息：晶格几何 + 原子位置。
//! Crysio 把它们统一解析成同一个结构模型。
//!
//! ## 子命令
//! - `info`    - 解析结构文件并打印摘要
//! - `collect` - 批量解析目录下的结构文件，汇总成 CSV
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── parsers/   (格式解析器)
//!   │     ├── models/    (数据模型)
//!   │     └── io/        (行读取源)
//!   ├── utils/      (工具函数)
//!   └── error.rs    (错误处理)
//! ```

mod cli;
mod commands;
mod error;
mod io;
mod models;
mod parsers;
mod utils;

use clap::Parser;
use cli::Cli;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    if let Err(e) = commands::run(cli.command) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
