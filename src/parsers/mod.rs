//! # 解析器模块
//!
//! 提供九种结构文件格式的解析器。每个解析器都是独立的纯函数
//! `(LineSource) -> Structure`，彼此不依赖，只共享数据模型、
//! 列序查找和元素符号表。
//!
//! ## 依赖关系
//! - 被 `commands/` 模块使用
//! - 使用 `models/`, `io/`
//! - 子模块: axsf, cif, columns, cp2k, cssr, cube, pdb, poscar, pwo, xyz

pub mod axsf;
pub mod cif;
pub mod columns;
pub mod cp2k;
pub mod cssr;
pub mod cube;
pub mod pdb;
pub mod poscar;
pub mod pwo;
pub mod xyz;

use crate::error::{CrysioError, Result};
use crate::io::LineSource;
use crate::models::{elements, Structure};
use std::fs::File;
use std::io::{BufRead, BufReader, Seek};
use std::path::Path;

/// Å → Bohr 换算因子；原子单位制的长度除以它得到 Å
pub(crate) const ANGS2BOHR: f64 = 1.889_726_125;

/// 解析浮点 token，失败即为该文件的致命错误
pub(crate) fn parse_f64(format: &str, token: &str, line: usize) -> Result<f64> {
    token.parse().map_err(|_| CrysioError::InvalidNumber {
        format: format.to_string(),
        token: token.to_string(),
        line,
    })
}

/// 解析无符号整数 token（原子个数等）
pub(crate) fn parse_usize(format: &str, token: &str, line: usize) -> Result<usize> {
    token.parse().map_err(|_| CrysioError::InvalidNumber {
        format: format.to_string(),
        token: token.to_string(),
        line,
    })
}

/// 原子类型列既可以是元素符号也可以是原子序数；
/// 数字按原子序数查表换算成符号
pub(crate) fn resolve_species(format: &str, token: &str) -> Result<String> {
    match token.parse::<u32>() {
        Ok(z) => elements::symbol(z).map(str::to_string).ok_or_else(|| {
            CrysioError::UnknownAtomicNumber {
                format: format.to_string(),
                number: z,
            }
        }),
        Err(_) => Ok(token.to_string()),
    }
}

/// 支持的输入格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructureFormat {
    /// (A)XSF (XCrySDen)
    Axsf,
    /// Crystallographic Information File (P1)
    Cif,
    /// CP2K 输入文件
    Cp2k,
    /// CSSR
    Cssr,
    /// Gaussian cube
    Cube,
    /// Protein Data Bank（定列宽）
    Pdb,
    /// VASP POSCAR/CONTCAR
    Poscar,
    /// Quantum-Espresso 输出/输入 (.pwo/.pwi)
    Pwo,
    /// XYZ（含注释行晶胞变体）
    Xyz,
    /// XYZ 定制变体（分数坐标）
    XyzTm3,
}

impl std::fmt::Display for StructureFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            StructureFormat::Axsf => "axsf",
            StructureFormat::Cif => "cif",
            StructureFormat::Cp2k => "cp2k",
            StructureFormat::Cssr => "cssr",
            StructureFormat::Cube => "cube",
            StructureFormat::Pdb => "pdb",
            StructureFormat::Poscar => "poscar",
            StructureFormat::Pwo => "pwo",
            StructureFormat::Xyz => "xyz",
            StructureFormat::XyzTm3 => "xyz-tm3",
        };
        write!(f, "{}", name)
    }
}

/// 从文件扩展名/文件名推断格式
pub fn detect_format(path: &Path) -> Option<StructureFormat> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "axsf" | "xsf" => Some(StructureFormat::Axsf),
        "cif" => Some(StructureFormat::Cif),
        "inp" | "cp2k" => Some(StructureFormat::Cp2k),
        "cssr" => Some(StructureFormat::Cssr),
        "cube" => Some(StructureFormat::Cube),
        "pdb" => Some(StructureFormat::Pdb),
        "pwo" | "pwi" => Some(StructureFormat::Pwo),
        "xyz" => Some(StructureFormat::Xyz),
        "vasp" => Some(StructureFormat::Poscar),
        _ => {
            // POSCAR/CONTCAR 没有扩展名
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                if name.starts_with("POSCAR") || name.starts_with("CONTCAR") {
                    return Some(StructureFormat::Poscar);
                }
            }
            None
        }
    }
}

/// 按指定格式从行源解析
pub fn parse_from<R: BufRead + Seek>(
    src: &mut LineSource<R>,
    format: StructureFormat,
) -> Result<Structure> {
    match format {
        StructureFormat::Axsf => axsf::parse(src),
        StructureFormat::Cif => cif::parse(src),
        StructureFormat::Cp2k => cp2k::parse(src),
        StructureFormat::Cssr => cssr::parse(src),
        StructureFormat::Cube => cube::parse(src),
        StructureFormat::Pdb => pdb::parse(src),
        StructureFormat::Poscar => poscar::parse(src),
        StructureFormat::Pwo => pwo::parse(src),
        StructureFormat::Xyz => xyz::parse_xyz(src),
        StructureFormat::XyzTm3 => xyz::parse_xyz_tm3(src),
    }
}

/// 打开文件并解析；`format` 为 `None` 时按扩展名推断
pub fn parse_structure_file(path: &Path, format: Option<StructureFormat>) -> Result<Structure> {
    let format = match format.or_else(|| detect_format(path)) {
        Some(f) => f,
        None => {
            return Err(CrysioError::UnsupportedFormat(format!(
                "Cannot determine format for: {}",
                path.display()
            )))
        }
    };

    let file = File::open(path).map_err(|e| CrysioError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    let mut src = LineSource::new(BufReader::new(file));
    let mut structure = parse_from(&mut src, format)?;

    if structure.name.is_empty() {
        structure.name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown")
            .to_string();
    }
    structure.source_format = Some(format.to_string());

    Ok(structure)
}
