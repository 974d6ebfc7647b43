//! # info 子命令 CLI 定义
//!
//! 解析单个或多个结构文件并打印摘要。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/info.rs`

use crate::parsers::StructureFormat;
use clap::{Args, ValueEnum};
use std::path::PathBuf;

/// 可手动指定的输入格式
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum FormatArg {
    /// XCrySDen (A)XSF
    Axsf,
    /// Crystallographic Information File (P1)
    Cif,
    /// CP2K input file
    Cp2k,
    /// CSSR
    Cssr,
    /// Gaussian cube
    Cube,
    /// Protein Data Bank
    Pdb,
    /// VASP POSCAR/CONTCAR
    Poscar,
    /// Quantum-Espresso output/input
    Pwo,
    /// XYZ
    Xyz,
    /// XYZ tailor-made variant (fractional)
    XyzTm3,
}

impl From<FormatArg> for StructureFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Axsf => StructureFormat::Axsf,
            FormatArg::Cif => StructureFormat::Cif,
            FormatArg::Cp2k => StructureFormat::Cp2k,
            FormatArg::Cssr => StructureFormat::Cssr,
            FormatArg::Cube => StructureFormat::Cube,
            FormatArg::Pdb => StructureFormat::Pdb,
            FormatArg::Poscar => StructureFormat::Poscar,
            FormatArg::Pwo => StructureFormat::Pwo,
            FormatArg::Xyz => StructureFormat::Xyz,
            FormatArg::XyzTm3 => StructureFormat::XyzTm3,
        }
    }
}

/// info 子命令参数
#[derive(Args, Debug)]
pub struct InfoArgs {
    /// Structure files to inspect
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Force input format instead of guessing from the extension
    #[arg(short, long, value_enum)]
    pub format: Option<FormatArg>,

    /// Also list every atom
    #[arg(short, long, default_value_t = false)]
    pub atoms: bool,
}
