//! # XYZ 格式解析器
//!
//! 解析 .xyz 文件及其变体。
//!
//! ## 格式说明
//! ```text
//! natoms
//! comment                # 注释行可以携带晶胞信息，见下
//! Element x y z [charge]
//! ...
//! ```
//!
//! 注释行的三种晶胞写法：
//! - `CELL: a b c alpha beta gamma`
//! - `cell: a1 a2 a3 b1 b2 b3 c1 c2 c3`
//! - `jmolscript: ...`（晶格分量在固定 token 位置 10-12/15-17/20-22）
//!
//! 另有一个定制变体（`parse_xyz_tm3`）：首行文件名、第二行
//! 晶胞、第三行原子数，坐标是分数坐标。
//!
//! ## 依赖关系
//! - 被 `parsers/mod.rs` 使用
//! - 使用 `models/`, `io/source.rs`

use super::{parse_f64, parse_usize};
use crate::error::{CrysioError, Result};
use crate::io::LineSource;
use crate::models::Structure;
use std::io::{BufRead, Seek};

const FORMAT: &str = "xyz";

/// 解析 .xyz 行源
pub fn parse_xyz<R: BufRead + Seek>(src: &mut LineSource<R>) -> Result<Structure> {
    let mut s = Structure::default();

    let line = src.next_line_required(FORMAT, "atom count line")?;
    let natoms = read_count(&line, src.line_number())?;

    // 注释行；可能带晶胞信息
    let comment = src.next_line_required(FORMAT, "comment line")?;
    let tokens: Vec<&str> = comment.split_whitespace().collect();
    if tokens.len() >= 7 && tokens[0] == "CELL:" {
        s.cell_length = Some(read_triple(&tokens, 1, src.line_number())?);
        s.cell_angle_deg = Some(read_triple(&tokens, 4, src.line_number())?);
    } else if tokens.len() >= 10 && tokens[0] == "cell:" {
        s.lattice_matrix = Some([
            read_triple(&tokens, 1, src.line_number())?,
            read_triple(&tokens, 4, src.line_number())?,
            read_triple(&tokens, 7, src.line_number())?,
        ]);
    } else if tokens.len() >= 23 && tokens[0] == "jmolscript:" {
        s.lattice_matrix = Some([
            read_triple(&tokens, 10, src.line_number())?,
            read_triple(&tokens, 15, src.line_number())?,
            read_triple(&tokens, 20, src.line_number())?,
        ]);
    }

    for _ in 0..natoms {
        let line = src.next_line_required(FORMAT, "atom row")?;
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < 4 {
            return Err(CrysioError::MissingSection {
                format: FORMAT.to_string(),
                what: format!("atom row with 4 fields at line {}", src.line_number()),
            });
        }
        s.atom_type.push(tokens[0].to_string());
        s.atom_xyz
            .push(read_triple(&tokens, 1, src.line_number())?);
        // 第 5 列按电荷读取
        if tokens.len() == 5 {
            s.atom_charge
                .push(parse_f64(FORMAT, tokens[4], src.line_number())?);
        }
    }

    Ok(s)
}

/// 解析定制变体：首行文件名，第二行晶胞，坐标为分数坐标
pub fn parse_xyz_tm3<R: BufRead + Seek>(src: &mut LineSource<R>) -> Result<Structure> {
    let mut s = Structure::default();

    src.next_line_required(FORMAT, "title line")?;

    let line = src.next_line_required(FORMAT, "cell line")?;
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() < 7 {
        return Err(CrysioError::MissingSection {
            format: FORMAT.to_string(),
            what: "cell line with lengths and angles".to_string(),
        });
    }
    s.cell_length = Some(read_triple(&tokens, 1, src.line_number())?);
    s.cell_angle_deg = Some(read_triple(&tokens, 4, src.line_number())?);

    let line = src.next_line_required(FORMAT, "atom count line")?;
    let natoms = read_count(&line, src.line_number())?;

    for _ in 0..natoms {
        let line = src.next_line_required(FORMAT, "atom row")?;
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < 4 {
            return Err(CrysioError::MissingSection {
                format: FORMAT.to_string(),
                what: format!("atom row with 4 fields at line {}", src.line_number()),
            });
        }
        s.atom_type.push(tokens[0].to_string());
        s.atom_fract
            .push(read_triple(&tokens, 1, src.line_number())?);
        // 第 6 列是电荷；只有 5 列的行说明电荷计算没有输出
        if tokens.len() >= 6 {
            s.atom_charge
                .push(parse_f64(FORMAT, tokens[5], src.line_number())?);
        }
    }

    Ok(s)
}

fn read_count(line: &str, lineno: usize) -> Result<usize> {
    let token = line.split_whitespace().next().ok_or_else(|| {
        CrysioError::MissingSection {
            format: FORMAT.to_string(),
            what: "atom count".to_string(),
        }
    })?;
    parse_usize(FORMAT, token, lineno)
}

/// 从 token 序列的 `offset` 起读三个浮点数
fn read_triple(tokens: &[&str], offset: usize, lineno: usize) -> Result<[f64; 3]> {
    Ok([
        parse_f64(FORMAT, tokens[offset], lineno)?,
        parse_f64(FORMAT, tokens[offset + 1], lineno)?,
        parse_f64(FORMAT, tokens[offset + 2], lineno)?,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn parse_str(content: &str) -> Result<Structure> {
        parse_xyz(&mut LineSource::new(Cursor::new(content.to_string())))
    }

    #[test]
    fn test_plain_xyz() {
        let content = "\
3
water molecule
O  0.000  0.000  0.117
H  0.757  0.586 -0.469
H -0.757  0.586 -0.469
";
        let s = parse_str(content).unwrap();
        assert_eq!(s.atom_type, vec!["O", "H", "H"]);
        assert_eq!(s.atom_xyz.len(), 3);
        assert!(s.atom_fract.is_empty());
        assert!(s.cell_length.is_none());
        assert!(s.lattice_matrix.is_none());
    }

    #[test]
    fn test_cell_comment_variant() {
        let content = "\
1
CELL: 10.0 11.0 12.0 90.0 90.0 120.0
C 0.0 0.0 0.0
";
        let s = parse_str(content).unwrap();
        assert_eq!(s.cell_length, Some([10.0, 11.0, 12.0]));
        assert_eq!(s.cell_angle_deg, Some([90.0, 90.0, 120.0]));
    }

    #[test]
    fn test_matrix_comment_variant() {
        let content = "\
1
cell: 5.0 0.0 0.0 0.0 6.0 0.0 0.0 0.0 7.0
C 0.0 0.0 0.0
";
        let s = parse_str(content).unwrap();
        let m = s.lattice_matrix.unwrap();
        assert_eq!(m[0][0], 5.0);
        assert_eq!(m[1][1], 6.0);
        assert_eq!(m[2][2], 7.0);
    }

    #[test]
    fn test_jmolscript_comment_variant() {
        let content = "\
1
jmolscript: load {1 1 1} spacegroup x,y,z unitcell [ { 4.0 0.0 0.0 } { 0.0 4.0 0.0 } { 0.0 0.0 4.0 } ]
C 0.0 0.0 0.0
";
        let s = parse_str(content).unwrap();
        let m = s.lattice_matrix.unwrap();
        assert_eq!(m[0][0], 4.0);
        assert_eq!(m[1][1], 4.0);
        assert_eq!(m[2][2], 4.0);
    }

    #[test]
    fn test_fifth_column_is_charge() {
        let content = "\
2
with charges
Na 0.0 0.0 0.0  0.98
Cl 2.8 0.0 0.0 -0.98
";
        let s = parse_str(content).unwrap();
        assert_eq!(s.atom_charge, vec![0.98, -0.98]);
        assert_eq!(s.natoms(), 2);
    }

    #[test]
    fn test_declared_count_exceeds_rows() {
        let content = "\
5
too short
C 0.0 0.0 0.0
";
        let err = parse_str(content).unwrap_err();
        assert!(matches!(err, CrysioError::UnexpectedEof { .. }));
    }

    #[test]
    fn test_tm3_variant() {
        let content = "\
MgO_opt.xyz
cell 4.21 4.21 4.21 90.0 90.0 90.0
2
Mg 0.0 0.0 0.0 1 1.2
O  0.5 0.5 0.5 2 -1.2
";
        let mut src = LineSource::new(Cursor::new(content.to_string()));
        let s = parse_xyz_tm3(&mut src).unwrap();
        assert_eq!(s.cell_length, Some([4.21, 4.21, 4.21]));
        assert_eq!(s.atom_fract.len(), 2);
        assert!(s.atom_xyz.is_empty());
        assert_eq!(s.atom_charge, vec![1.2, -1.2]);
    }

    #[test]
    fn test_tm3_without_charges() {
        let content = "\
failed_qeq.xyz
cell 4.21 4.21 4.21 90.0 90.0 90.0
1
Mg 0.0 0.0 0.0
";
        let mut src = LineSource::new(Cursor::new(content.to_string()));
        let s = parse_xyz_tm3(&mut src).unwrap();
        assert_eq!(s.natoms(), 1);
        assert!(s.atom_charge.is_empty());
    }
}
