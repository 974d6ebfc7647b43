//! # PDB 格式解析器
//!
//! 解析 .pdb 文件的 CRYST1 与 ATOM/HETATM 记录。
//!
//! ## 格式说明
//! ```text
//! CRYST1    a(6-15)   b(15-24)  c(24-33) alpha(33-40) beta(40-47) gamma(47-54)
//! ATOM/HETATM ... x(30-38) y(38-46) z(46-54)
//! END / ENDMDL
//! ```
//!
//! PDB 是定列宽格式：数值字段按固定字符区间切取，与字段间
//! 空白多少无关。原子名仍按空白切分取第 3 个 token（坐标
//! 之外的列宽在各种变体间并不可靠）。无关记录行直接跳过。
//!
//! ## 依赖关系
//! - 被 `parsers/mod.rs` 使用
//! - 使用 `models/`, `io/source.rs`

use super::parse_f64;
use crate::error::{CrysioError, Result};
use crate::io::LineSource;
use crate::models::Structure;
use std::io::{BufRead, Seek};

const FORMAT: &str = "pdb";

/// 解析 .pdb 行源
pub fn parse<R: BufRead + Seek>(src: &mut LineSource<R>) -> Result<Structure> {
    let mut s = Structure::default();

    while let Some(line) = src.next_line()? {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some(&record) = tokens.first() else { continue };

        match record {
            "END" | "ENDMDL" => break,
            "CRYST1" => {
                s.cell_length = Some([
                    slice_f64(&line, 6, 15, src.line_number())?,
                    slice_f64(&line, 15, 24, src.line_number())?,
                    slice_f64(&line, 24, 33, src.line_number())?,
                ]);
                s.cell_angle_deg = Some([
                    slice_f64(&line, 33, 40, src.line_number())?,
                    slice_f64(&line, 40, 47, src.line_number())?,
                    slice_f64(&line, 47, 54, src.line_number())?,
                ]);
            }
            "ATOM" | "HETATM" => {
                let name = tokens.get(2).ok_or_else(|| CrysioError::MissingSection {
                    format: FORMAT.to_string(),
                    what: format!("atom name in record at line {}", src.line_number()),
                })?;
                s.atom_type.push((*name).to_string());
                s.atom_xyz.push([
                    slice_f64(&line, 30, 38, src.line_number())?,
                    slice_f64(&line, 38, 46, src.line_number())?,
                    slice_f64(&line, 46, 54, src.line_number())?,
                ]);
            }
            _ => {}
        }
    }

    Ok(s)
}

/// 按固定字符区间切取并解析一个浮点字段
fn slice_f64(line: &str, start: usize, end: usize, lineno: usize) -> Result<f64> {
    let field = line.get(start..end).unwrap_or("").trim();
    parse_f64(FORMAT, field, lineno)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn parse_str(content: &str) -> Result<Structure> {
        parse(&mut LineSource::new(Cursor::new(content.to_string())))
    }

    const SAMPLE: &str = "\
HEADER    TEST STRUCTURE
CRYST1   24.500   24.500   36.100  90.00  90.00 120.00 P 1           1
ATOM      1  C1  MOL A   1      12.001   0.002   5.000  1.00  0.00           C
HETATM    2  O1  MOL A   1       0.500  12.300   5.100  1.00  0.00           O
END
";

    #[test]
    fn test_cryst1_fixed_offsets() {
        let s = parse_str(SAMPLE).unwrap();
        assert_eq!(s.cell_length, Some([24.5, 24.5, 36.1]));
        assert_eq!(s.cell_angle_deg, Some([90.0, 90.0, 120.0]));
    }

    #[test]
    fn test_atom_records() {
        let s = parse_str(SAMPLE).unwrap();
        assert_eq!(s.atom_type, vec!["C1", "O1"]);
        assert_eq!(s.atom_xyz.len(), 2);
        assert!((s.atom_xyz[0][0] - 12.001).abs() < 1e-9);
        assert!((s.atom_xyz[1][1] - 12.3).abs() < 1e-9);
        assert!(s.atom_fract.is_empty());
    }

    #[test]
    fn test_offsets_survive_crowded_fields() {
        // 负坐标把字段间空白挤掉，按 token 切分会错位
        let content = "\
ATOM      1  C1  MOL A   1    -112.001-100.002-105.000  1.00  0.00           C
END
";
        let s = parse_str(content).unwrap();
        assert_eq!(s.atom_xyz, vec![[-112.001, -100.002, -105.0]]);
    }

    #[test]
    fn test_endmdl_stops_reading() {
        let content = "\
ATOM      1  C1  MOL A   1      12.000   0.000   5.000  1.00  0.00           C
ENDMDL
ATOM      2  N1  MOL A   1       1.000   1.000   1.000  1.00  0.00           N
";
        let s = parse_str(content).unwrap();
        assert_eq!(s.natoms(), 1);
    }

    #[test]
    fn test_unrelated_records_skipped() {
        let content = "\
REMARK generated
TER
END
";
        let s = parse_str(content).unwrap();
        assert_eq!(s.natoms(), 0);
        assert!(s.cell_length.is_none());
    }

    #[test]
    fn test_truncated_atom_record_is_fatal() {
        let content = "ATOM      1  C1  MOL A   1      12.000\nEND\n";
        let err = parse_str(content).unwrap_err();
        assert!(matches!(err, CrysioError::InvalidNumber { .. }));
    }
}
