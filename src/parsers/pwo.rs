//! # Quantum-Espresso 格式解析器
//!
//! 解析 pw.x 的输出 (.pwo) 和输入 (.pwi) 文件。
//!
//! ## 格式说明
//! ```text
//! CELL_PARAMETERS (angstrom)
//!   a1 a2 a3
//!   b1 b2 b3
//!   c1 c2 c3
//! ATOMIC_POSITIONS (crystal)
//!   Element x y z
//!   ...
//! ```
//!
//! 弛豫轨迹里这两个分节会出现多次，取**最后一次**出现的几何
//! （最接近收敛）。算法分两遍：第一遍扫完整个流，记下每个分节
//! 标记最后一次出现的行号；第二遍拨回开头快进到记录的行号再读。
//!
//! scf 计算的输出没有这两个分节，回退到文件头部的初始几何：
//! ```text
//!      celldm(1)=  10.200000  celldm(2)= ...
//!      celldm(4)= ...
//!
//!      crystal axes: (cart. coord. in units of alat)
//!                a(1) = ( 1.0 0.0 0.0 )
//!      ...
//!      site n.     atom                  positions (alat units)
//!          1           Fe  tau(   1) = ( 0.0 0.0 0.0 )
//! ```
//! alat 量纲的数值按 celldm(1) 换算成 Å。
//!
//! `ATOMIC_POSITIONS` 的单位标记只接受 angstrom（笛卡尔）和
//! crystal（分数），括号/花括号两种写法都认。
//!
//! ## 依赖关系
//! - 被 `parsers/mod.rs` 使用
//! - 使用 `models/`, `io/source.rs`

use super::{parse_f64, ANGS2BOHR};
use crate::error::{CrysioError, Result};
use crate::io::LineSource;
use crate::models::Structure;
use regex::Regex;
use std::io::{BufRead, Seek};

const FORMAT: &str = "pwo";

/// 解析 .pwo/.pwi 行源
pub fn parse<R: BufRead + Seek>(src: &mut LineSource<R>) -> Result<Structure> {
    let mut s = Structure::default();

    // ── 第一遍：记录分节标记最后一次出现的位置和单位 ──
    let tag_re = Regex::new(r"ATOMIC_POSITIONS\s*[({]?\s*([A-Za-z_]+)").unwrap();
    let mut cell_line: Option<usize> = None;
    let mut positions: Option<(usize, bool)> = None; // (行号, 分数坐标?)

    while let Some(line) = src.next_line()? {
        if line.contains("CELL_PARAMETERS") {
            cell_line = Some(src.line_number());
        }
        if line.contains("ATOMIC_POSITIONS") {
            let fractional = positions_unit(&tag_re, &line, src.line_number())?;
            positions = Some((src.line_number(), fractional));
        }
    }

    // ── 第二遍：晶胞 ──
    src.rewind()?;
    match cell_line {
        Some(n) => {
            skip_lines(src, n, "CELL_PARAMETERS block")?;
            let mut matrix = [[0.0; 3]; 3];
            for row in &mut matrix {
                let line = src.next_line_required(FORMAT, "CELL_PARAMETERS vector")?;
                read_components(&line, row, 0, 1.0, src.line_number())?;
            }
            s.lattice_matrix = Some(matrix);
        }
        None => s.lattice_matrix = Some(initial_cell(src)?),
    }

    // ── 第三遍：原子坐标 ──
    src.rewind()?;
    match positions {
        Some((n, fractional)) => {
            skip_lines(src, n, "ATOMIC_POSITIONS block")?;
            while let Some(line) = src.next_line()? {
                let tokens: Vec<&str> = line.split_whitespace().collect();
                if tokens.len() < 4 {
                    break; // 坐标行结束
                }
                s.atom_type.push(tokens[0].to_string());
                let coord = [
                    parse_f64(FORMAT, tokens[1], src.line_number())?,
                    parse_f64(FORMAT, tokens[2], src.line_number())?,
                    parse_f64(FORMAT, tokens[3], src.line_number())?,
                ];
                if fractional {
                    s.atom_fract.push(coord);
                } else {
                    s.atom_xyz.push(coord);
                }
            }
        }
        None => initial_positions(src, &mut s)?,
    }

    Ok(s)
}

/// 判定 `ATOMIC_POSITIONS` 行的单位标记
fn positions_unit(tag_re: &Regex, line: &str, lineno: usize) -> Result<bool> {
    let tag = tag_re
        .captures(line)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_lowercase());
    match tag.as_deref() {
        Some("crystal") => Ok(true),
        Some("angstrom") => Ok(false),
        Some(other) => Err(CrysioError::UnknownUnit {
            format: FORMAT.to_string(),
            unit: other.to_string(),
        }),
        None => Err(CrysioError::MissingSection {
            format: FORMAT.to_string(),
            what: format!("unit tag on ATOMIC_POSITIONS at line {}", lineno),
        }),
    }
}

/// scf 输出：初始晶胞来自 `celldm(1)=` + `crystal axes:` 块
fn initial_cell<R: BufRead + Seek>(src: &mut LineSource<R>) -> Result<[[f64; 3]; 3]> {
    let celldm1 = loop {
        let line = match src.next_line()? {
            Some(line) => line,
            None => {
                return Err(CrysioError::MissingSection {
                    format: FORMAT.to_string(),
                    what: "CELL_PARAMETERS or celldm(1)".to_string(),
                })
            }
        };
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.first() == Some(&"celldm(1)=") {
            let tok = tokens.get(1).ok_or_else(|| CrysioError::MissingSection {
                format: FORMAT.to_string(),
                what: "value after celldm(1)=".to_string(),
            })?;
            // celldm(1) 以 Bohr 给出
            break parse_f64(FORMAT, tok, src.line_number())? / ANGS2BOHR;
        }
    };

    // 跳过 celldm(4-6) 行、空行和 "crystal axes:" 标题
    skip_lines(src, 3, "crystal axes header")?;

    let mut matrix = [[0.0; 3]; 3];
    for row in &mut matrix {
        let line = src.next_line_required(FORMAT, "crystal axes vector")?;
        // 行形如 "a(1) = ( x y z )"，分量从第 4 个 token 起
        read_components(&line, row, 3, celldm1, src.line_number())?;
    }
    Ok(matrix)
}

/// scf 输出：初始坐标来自 "site n. atom positions" 表
fn initial_positions<R: BufRead + Seek>(src: &mut LineSource<R>, s: &mut Structure) -> Result<()> {
    let mut celldm1: Option<f64> = None;

    while let Some(line) = src.next_line()? {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.first() == Some(&"celldm(1)=") {
            if let Some(tok) = tokens.get(1) {
                celldm1 = Some(parse_f64(FORMAT, tok, src.line_number())? / ANGS2BOHR);
            }
        }
        if tokens.len() > 3 && tokens[3] == "positions" {
            let scale = celldm1.ok_or_else(|| CrysioError::MissingSection {
                format: FORMAT.to_string(),
                what: "celldm(1) before atom positions table".to_string(),
            })?;
            while let Some(line) = src.next_line()? {
                let tokens: Vec<&str> = line.split_whitespace().collect();
                if tokens.len() < 10 {
                    break; // 表结束
                }
                s.atom_type.push(tokens[1].to_string());
                s.atom_xyz.push([
                    parse_f64(FORMAT, tokens[6], src.line_number())? * scale,
                    parse_f64(FORMAT, tokens[7], src.line_number())? * scale,
                    parse_f64(FORMAT, tokens[8], src.line_number())? * scale,
                ]);
            }
            return Ok(());
        }
    }

    Err(CrysioError::MissingSection {
        format: FORMAT.to_string(),
        what: "ATOMIC_POSITIONS or initial atom positions table".to_string(),
    })
}

/// 从 `offset` 起读三个分量乘以 `scale` 填入 `row`
fn read_components(
    line: &str,
    row: &mut [f64; 3],
    offset: usize,
    scale: f64,
    lineno: usize,
) -> Result<()> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    for (j, slot) in row.iter_mut().enumerate() {
        let tok = tokens
            .get(offset + j)
            .ok_or_else(|| CrysioError::MissingSection {
                format: FORMAT.to_string(),
                what: format!("3-component vector at line {}", lineno),
            })?;
        *slot = parse_f64(FORMAT, tok, lineno)? * scale;
    }
    Ok(())
}

/// 快进 `n` 行
fn skip_lines<R: BufRead + Seek>(src: &mut LineSource<R>, n: usize, what: &str) -> Result<()> {
    for _ in 0..n {
        src.next_line_required(FORMAT, what)?;
    }
    Ok(())
}
