//! # VASP POSCAR 格式解析器
//!
//! 解析 VASP POSCAR/CONTCAR 文件（VASP 5+）。
//!
//! ## 格式说明
//! ```text
//! Comment line (structure name)
//! 1.0                    # scaling factor
//! a1 a2 a3               # lattice vector a
//! b1 b2 b3               # lattice vector b
//! c1 c2 c3               # lattice vector c
//! Element1 Element2 ...  # element symbols (VASP 5+)
//! n1 n2 ...              # number of atoms per element
//! Selective dynamics     # optional
//! Direct/Cartesian       # coordinate type
//! x1 y1 z1               # atom positions
//! ...
//! ```
//!
//! Direct 走分数坐标，Cartesian 走笛卡尔坐标，其他标志是
//! 致命错误。VASP 4 文件（第 6 行直接给原子个数）没有元素
//! 标签，无法填充类型列，同样报错。
//!
//! ## 依赖关系
//! - 被 `parsers/mod.rs` 使用
//! - 使用 `models/`, `io/source.rs`

use super::{parse_f64, parse_usize};
use crate::error::{CrysioError, Result};
use crate::io::LineSource;
use crate::models::Structure;
use std::io::{BufRead, Seek};

const FORMAT: &str = "poscar";

/// 解析 POSCAR/CONTCAR 行源
pub fn parse<R: BufRead + Seek>(src: &mut LineSource<R>) -> Result<Structure> {
    let mut s = Structure::default();

    // Line 0: comment/name
    let title = src.next_line_required(FORMAT, "comment line")?;
    s.name = title.trim().to_string();

    // Line 1: universal scaling factor
    let line = src.next_line_required(FORMAT, "scaling factor line")?;
    let scale = parse_f64(FORMAT, line.trim(), src.line_number())?;

    // Lines 2-4: lattice vectors
    let mut matrix = [[0.0; 3]; 3];
    for row in &mut matrix {
        let line = src.next_line_required(FORMAT, "lattice vector line")?;
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < 3 {
            return Err(CrysioError::MissingSection {
                format: FORMAT.to_string(),
                what: format!("3-component lattice vector at line {}", src.line_number()),
            });
        }
        for (j, slot) in row.iter_mut().enumerate() {
            *slot = parse_f64(FORMAT, tokens[j], src.line_number())? * scale;
        }
    }
    s.lattice_matrix = Some(matrix);

    // Line 5: element symbols (VASP 5+)
    let line = src.next_line_required(FORMAT, "element symbols line")?;
    let elements: Vec<String> = line.split_whitespace().map(str::to_string).collect();
    if elements.is_empty() || elements[0].parse::<i64>().is_ok() {
        return Err(CrysioError::MissingSection {
            format: FORMAT.to_string(),
            what: "element symbols line (VASP 5+)".to_string(),
        });
    }

    // Line 6: atoms per element
    let line = src.next_line_required(FORMAT, "atom count line")?;
    let counts = line
        .split_whitespace()
        .map(|tok| parse_usize(FORMAT, tok, src.line_number()))
        .collect::<Result<Vec<_>>>()?;
    if counts.len() != elements.len() {
        return Err(CrysioError::MissingSection {
            format: FORMAT.to_string(),
            what: format!(
                "one atom count per element ({} symbols, {} counts)",
                elements.len(),
                counts.len()
            ),
        });
    }

    // 可选的 Selective dynamics 行
    let mut flag = src.next_line_required(FORMAT, "coordinate type line")?;
    if flag.trim().to_lowercase().starts_with("selective") {
        flag = src.next_line_required(FORMAT, "coordinate type line")?;
    }

    let flag = flag.trim().to_lowercase();
    let cartesian = if flag.starts_with('d') {
        false
    } else if flag.starts_with('c') || flag.starts_with('k') {
        true
    } else {
        return Err(CrysioError::MissingSection {
            format: FORMAT.to_string(),
            what: "Direct or Cartesian coordinate flag".to_string(),
        });
    };

    for (elem, &count) in elements.iter().zip(counts.iter()) {
        for _ in 0..count {
            let line = src.next_line_required(FORMAT, "atom position row")?;
            let tokens: Vec<&str> = line.split_whitespace().collect();
            if tokens.len() < 3 {
                return Err(CrysioError::MissingSection {
                    format: FORMAT.to_string(),
                    what: format!("3-component position at line {}", src.line_number()),
                });
            }
            let coord = [
                parse_f64(FORMAT, tokens[0], src.line_number())?,
                parse_f64(FORMAT, tokens[1], src.line_number())?,
                parse_f64(FORMAT, tokens[2], src.line_number())?,
            ];
            s.atom_type.push(elem.clone());
            if cartesian {
                s.atom_xyz.push(coord);
            } else {
                s.atom_fract.push(coord);
            }
        }
    }

    Ok(s)
}
