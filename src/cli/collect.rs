//! # collect 子命令 CLI 定义
//!
//! 批量解析目录下的结构文件并汇总为 CSV。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/collect.rs`

use clap::Args;
use std::path::PathBuf;

/// collect 子命令参数
#[derive(Args, Debug)]
pub struct CollectArgs {
    /// Input directory containing structure files
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output CSV file
    #[arg(short, long, default_value = "structures.csv")]
    pub output: PathBuf,

    /// Glob pattern(s) for input files, comma separated
    #[arg(short, long, default_value = "*.cif,*.xyz,*.pdb,*.cssr,*.cube,*.xsf,*.axsf,*.pwo,*.pwi,POSCAR*,CONTCAR*")]
    pub pattern: String,

    /// Recurse into subdirectories
    #[arg(short, long, default_value_t = false)]
    pub recursive: bool,

    /// Number of parallel jobs (0 = auto)
    #[arg(short, long, default_value_t = 0)]
    pub jobs: usize,
}
