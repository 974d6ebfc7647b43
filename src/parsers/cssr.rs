//! # CSSR 格式解析器
//!
//! 解析 .cssr 文件。
//!
//! ## 格式说明
//! ```text
//!  a b c
//!  alpha beta gamma SPGR = 1 P 1
//! natoms 0
//! header
//!  1 Element x y z ... [charge]
//! ...
//! ```
//!
//! 原子行固定取第 2 个 token 作元素、第 3-5 个 token 作分数坐标；
//! 恰好 14 个 token 的行最后一列按电荷读取。
//!
//! ## 依赖关系
//! - 被 `parsers/mod.rs` 使用
//! - 使用 `models/`, `io/source.rs`

use super::{parse_f64, parse_usize};
use crate::error::{CrysioError, Result};
use crate::io::LineSource;
use crate::models::Structure;
use std::io::{BufRead, Seek};

const FORMAT: &str = "cssr";

/// 解析 .cssr 行源
pub fn parse<R: BufRead + Seek>(src: &mut LineSource<R>) -> Result<Structure> {
    let mut s = Structure::default();

    let line = src.next_line_required(FORMAT, "cell length line")?;
    s.cell_length = Some(read_triple(&line, src.line_number())?);

    let line = src.next_line_required(FORMAT, "cell angle line")?;
    s.cell_angle_deg = Some(read_triple(&line, src.line_number())?);

    let line = src.next_line_required(FORMAT, "atom count line")?;
    let count_token = line.split_whitespace().next().ok_or_else(|| {
        CrysioError::MissingSection {
            format: FORMAT.to_string(),
            what: "atom count".to_string(),
        }
    })?;
    let natoms = parse_usize(FORMAT, count_token, src.line_number())?;

    // 第 4 行是无关的头信息
    src.next_line_required(FORMAT, "header line")?;

    for _ in 0..natoms {
        let line = src.next_line_required(FORMAT, "atom row")?;
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < 5 {
            return Err(CrysioError::MissingSection {
                format: FORMAT.to_string(),
                what: format!("atom row with 5 fields at line {}", src.line_number()),
            });
        }
        s.atom_type.push(tokens[1].to_string());
        s.atom_fract.push([
            parse_f64(FORMAT, tokens[2], src.line_number())?,
            parse_f64(FORMAT, tokens[3], src.line_number())?,
            parse_f64(FORMAT, tokens[4], src.line_number())?,
        ]);
        // 电荷列的判据就是 token 总数
        if tokens.len() == 14 {
            s.atom_charge
                .push(parse_f64(FORMAT, tokens[13], src.line_number())?);
        }
    }

    Ok(s)
}

/// 从一行的前三个 token 读一个三元组
fn read_triple(line: &str, lineno: usize) -> Result<[f64; 3]> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() < 3 {
        return Err(CrysioError::MissingSection {
            format: FORMAT.to_string(),
            what: format!("3 values at line {}", lineno),
        });
    }
    Ok([
        parse_f64(FORMAT, tokens[0], lineno)?,
        parse_f64(FORMAT, tokens[1], lineno)?,
        parse_f64(FORMAT, tokens[2], lineno)?,
    ])
}
