//! # CP2K 输入格式解析器
//!
//! 解析 CP2K 输入文件中的晶胞与坐标信息。
//!
//! ## 格式说明
//! ```text
//! &CELL
//!   A [angstrom] a1 a2 a3
//!   B            b1 b2 b3
//!   C            c1 c2 c3
//! &END CELL
//! &COORD
//!   SCALED .true.
//!   Element x y z
//!   ...
//! &END COORD
//! ```
//!
//! 晶胞向量的单位标记只接受 `[angstrom]`（无标记默认 Å），
//! 其他带中括号的单位是致命错误。`SCALED` 标志在块内随时可以
//! 出现，作用于其后所有原子行：true 走分数坐标，false 走
//! 笛卡尔坐标。
//!
//! ## 依赖关系
//! - 被 `parsers/mod.rs` 使用
//! - 使用 `models/`, `io/source.rs`

use super::parse_f64;
use crate::error::{CrysioError, Result};
use crate::io::LineSource;
use crate::models::Structure;
use std::io::{BufRead, Seek};

const FORMAT: &str = "cp2k";

const TRUE_WORDS: [&str; 3] = ["t", "true", ".true."];
const FALSE_WORDS: [&str; 3] = ["f", "false", ".false."];

/// 坐标模式；由 `SCALED` 标志切换，作用于其后的原子行
#[derive(Clone, Copy, PartialEq)]
enum CoordMode {
    Cartesian,
    Scaled,
}

/// 解析 CP2K 输入行源
pub fn parse<R: BufRead + Seek>(src: &mut LineSource<R>) -> Result<Structure> {
    let mut s = Structure::default();
    let mut matrix = [[0.0; 3]; 3];
    let mut cell_seen = false;

    // 晶胞指令散布在 &COORD 之前的任何位置
    loop {
        let line = match src.next_line()? {
            Some(line) => line,
            None => {
                return Err(CrysioError::MissingSection {
                    format: FORMAT.to_string(),
                    what: "&COORD".to_string(),
                })
            }
        };
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some(&key) = tokens.first() else { continue };

        match key {
            "A" => read_cell_vector(&tokens, &mut matrix[0], src.line_number())?,
            "B" => read_cell_vector(&tokens, &mut matrix[1], src.line_number())?,
            "C" => read_cell_vector(&tokens, &mut matrix[2], src.line_number())?,
            "&COORD" => break,
            _ => continue,
        }
        cell_seen = true;
    }
    if cell_seen {
        s.lattice_matrix = Some(matrix);
    }

    let mut mode = CoordMode::Cartesian; // Default
    loop {
        let line = src.next_line_required(FORMAT, "&END of &COORD block")?;
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some(&key) = tokens.first() else { continue };

        match key {
            "SCALED" => mode = scaled_mode(&tokens)?,
            "&END" => break,
            _ => read_atom_row(&mut s, &tokens, mode, src.line_number())?,
        }
    }

    Ok(s)
}

/// 读 `A`/`B`/`C` 指令的三个分量，处理可选单位标记
fn read_cell_vector(tokens: &[&str], row: &mut [f64; 3], line: usize) -> Result<()> {
    let unit = tokens.get(1).ok_or_else(|| CrysioError::MissingSection {
        format: FORMAT.to_string(),
        what: format!("cell vector components at line {}", line),
    })?;

    // 无单位标记默认 Å，只接受 [angstrom]
    let shift = if !unit.starts_with('[') {
        0
    } else if unit.eq_ignore_ascii_case("[angstrom]") {
        1
    } else {
        return Err(CrysioError::UnknownUnit {
            format: FORMAT.to_string(),
            unit: unit.to_string(),
        });
    };

    for (j, slot) in row.iter_mut().enumerate() {
        let tok = tokens
            .get(1 + shift + j)
            .ok_or_else(|| CrysioError::MissingSection {
                format: FORMAT.to_string(),
                what: format!("3-component cell vector at line {}", line),
            })?;
        *slot = parse_f64(FORMAT, tok, line)?;
    }
    Ok(())
}

/// 解析 `SCALED` 标志的取值
fn scaled_mode(tokens: &[&str]) -> Result<CoordMode> {
    let value = tokens.get(1).copied().unwrap_or("");
    let lower = value.to_lowercase();
    if TRUE_WORDS.contains(&lower.as_str()) {
        Ok(CoordMode::Scaled)
    } else if FALSE_WORDS.contains(&lower.as_str()) {
        Ok(CoordMode::Cartesian)
    } else {
        Err(CrysioError::UnknownUnit {
            format: FORMAT.to_string(),
            unit: format!("SCALED {}", value),
        })
    }
}

/// 按当前坐标模式消费一条原子行
fn read_atom_row(s: &mut Structure, tokens: &[&str], mode: CoordMode, line: usize) -> Result<()> {
    if tokens.len() < 4 {
        return Err(CrysioError::MissingSection {
            format: FORMAT.to_string(),
            what: format!("atom row with 4 fields at line {}", line),
        });
    }
    s.atom_type.push(tokens[0].to_string());
    let coord = [
        parse_f64(FORMAT, tokens[1], line)?,
        parse_f64(FORMAT, tokens[2], line)?,
        parse_f64(FORMAT, tokens[3], line)?,
    ];
    match mode {
        CoordMode::Scaled => s.atom_fract.push(coord),
        CoordMode::Cartesian => s.atom_xyz.push(coord),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn parse_str(content: &str) -> Result<Structure> {
        parse(&mut LineSource::new(Cursor::new(content.to_string())))
    }

    #[test]
    fn test_scaled_true_populates_fract() {
        let content = "\
&CELL
  A 10.0 0.0 0.0
  B 0.0 10.0 0.0
  C 0.0 0.0 10.0
&END CELL
&COORD
  SCALED .true.
  Si 0.0 0.0 0.0
  Si 0.25 0.25 0.25
&END COORD
";
        let s = parse_str(content).unwrap();
        assert_eq!(s.natoms(), 2);
        assert_eq!(s.atom_fract.len(), 2);
        assert!(s.atom_xyz.is_empty());
        assert_eq!(s.lattice_matrix.unwrap()[1][1], 10.0);
    }

    #[test]
    fn test_default_is_cartesian() {
        let content = "\
&COORD
  O 0.0 0.0 0.0
  H 0.76 0.59 0.0
&END COORD
";
        let s = parse_str(content).unwrap();
        assert_eq!(s.atom_xyz.len(), 2);
        assert!(s.atom_fract.is_empty());
        assert!(s.lattice_matrix.is_none());
    }

    #[test]
    fn test_scaled_false_spelling_variants() {
        for word in ["F", "false", ".FALSE."] {
            let content = format!("&COORD\nSCALED {}\nC 1.0 2.0 3.0\n&END COORD\n", word);
            let s = parse_str(&content).unwrap();
            assert_eq!(s.atom_xyz.len(), 1, "spelling {:?}", word);
        }
    }

    #[test]
    fn test_angstrom_unit_marker() {
        let content = "\
A [angstrom] 4.0 0.0 0.0
B [angstrom] 0.0 4.0 0.0
C [angstrom] 0.0 0.0 4.0
&COORD
Fe 0.0 0.0 0.0
&END COORD
";
        let s = parse_str(content).unwrap();
        assert_eq!(s.lattice_matrix.unwrap()[2][2], 4.0);
    }

    #[test]
    fn test_weird_unit_is_fatal() {
        let content = "A [bohr] 4.0 0.0 0.0\n&COORD\n&END\n";
        let err = parse_str(content).unwrap_err();
        match err {
            CrysioError::UnknownUnit { unit, .. } => assert_eq!(unit, "[bohr]"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_missing_coord_block_is_fatal() {
        let err = parse_str("A 4.0 0.0 0.0\n").unwrap_err();
        assert!(matches!(err, CrysioError::MissingSection { .. }));
    }

    #[test]
    fn test_unterminated_coord_block_is_fatal() {
        let err = parse_str("&COORD\nC 0.0 0.0 0.0\n").unwrap_err();
        assert!(matches!(err, CrysioError::UnexpectedEof { .. }));
    }
}
