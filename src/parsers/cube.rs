//! # Gaussian cube 格式解析器
//!
//! 解析 .cube 文件的头部（晶胞与原子），不读体数据。
//!
//! ## 格式说明
//! ```text
//! comment 1
//! comment 2
//! natoms  ox oy oz
//! n1  v1x v1y v1z
//! n2  v2x v2y v2z
//! n3  v3x v3y v3z
//! Z  charge  x y z
//! ...
//! ```
//!
//! 晶格向量 = 体素个数 × 体素向量，长度单位是 Bohr，
//! 解析时换算成 Å。原子坐标同样按 Bohr 读入并换算。
//!
//! ## 依赖关系
//! - 被 `parsers/mod.rs` 使用
//! - 使用 `models/`, `io/source.rs`

use super::{parse_f64, resolve_species, ANGS2BOHR};
use crate::error::{CrysioError, Result};
use crate::io::LineSource;
use crate::models::Structure;
use std::io::{BufRead, Seek};

const FORMAT: &str = "cube";

/// 解析 .cube 行源
pub fn parse<R: BufRead + Seek>(src: &mut LineSource<R>) -> Result<Structure> {
    let mut s = Structure::default();

    src.next_line_required(FORMAT, "first comment line")?;
    src.next_line_required(FORMAT, "second comment line")?;

    let line = src.next_line_required(FORMAT, "atom count line")?;
    let count_token = line.split_whitespace().next().ok_or_else(|| {
        CrysioError::MissingSection {
            format: FORMAT.to_string(),
            what: "atom count".to_string(),
        }
    })?;
    // 负的原子数标记带轨道数据的 cube，原子个数取绝对值
    let natoms: usize = count_token
        .parse::<i64>()
        .map_err(|_| CrysioError::InvalidNumber {
            format: FORMAT.to_string(),
            token: count_token.to_string(),
            line: src.line_number(),
        })?
        .unsigned_abs() as usize;

    let mut matrix = [[0.0; 3]; 3];
    for row in &mut matrix {
        let line = src.next_line_required(FORMAT, "voxel vector line")?;
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < 4 {
            return Err(CrysioError::MissingSection {
                format: FORMAT.to_string(),
                what: format!("voxel count and vector at line {}", src.line_number()),
            });
        }
        let count = parse_f64(FORMAT, tokens[0], src.line_number())?;
        for (j, slot) in row.iter_mut().enumerate() {
            let v = parse_f64(FORMAT, tokens[1 + j], src.line_number())?;
            *slot = count * v / ANGS2BOHR;
        }
    }
    s.lattice_matrix = Some(matrix);

    for _ in 0..natoms {
        let line = src.next_line_required(FORMAT, "atom row")?;
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < 5 {
            return Err(CrysioError::MissingSection {
                format: FORMAT.to_string(),
                what: format!("atom row with 5 fields at line {}", src.line_number()),
            });
        }
        s.atom_type.push(resolve_species(FORMAT, tokens[0])?);
        // tokens[1] 是核电荷列，跳过
        s.atom_xyz.push([
            parse_f64(FORMAT, tokens[2], src.line_number())? / ANGS2BOHR,
            parse_f64(FORMAT, tokens[3], src.line_number())? / ANGS2BOHR,
            parse_f64(FORMAT, tokens[4], src.line_number())? / ANGS2BOHR,
        ]);
    }

    Ok(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn parse_str(content: &str) -> Result<Structure> {
        parse(&mut LineSource::new(Cursor::new(content.to_string())))
    }

    const WATER: &str = "\
 water density
 from a test run
    3    0.000000    0.000000    0.000000
   10    0.283459    0.000000    0.000000
   10    0.000000    0.283459    0.000000
   10    0.000000    0.000000    0.283459
    8    8.000000    0.000000    0.000000    0.221665
    1    1.000000    1.435700    0.000000   -0.886659
    1    1.000000   -1.435700    0.000000   -0.886659
";

    #[test]
    fn test_parse_cube() {
        let s = parse_str(WATER).unwrap();
        let m = s.lattice_matrix.unwrap();
        // 10 * 0.283459 Bohr = 1.5 Å
        assert!((m[0][0] - 10.0 * 0.283459 / ANGS2BOHR).abs() < 1e-9);
        assert!((m[0][0] - 1.5).abs() < 1e-3);
        assert!(m[0][1].abs() < 1e-12);

        assert_eq!(s.atom_type, vec!["O", "H", "H"]);
        assert_eq!(s.atom_xyz.len(), 3);
        assert!(s.atom_fract.is_empty());
        // 坐标从 Bohr 换算成 Å
        assert!((s.atom_xyz[1][0] - 1.4357 / ANGS2BOHR).abs() < 1e-9);
    }

    #[test]
    fn test_numeric_and_symbolic_types_equivalent() {
        let symbolic = WATER.replace("    8    8.000000", "    O    8.000000");
        let a = parse_str(WATER).unwrap();
        let b = parse_str(&symbolic).unwrap();
        assert_eq!(a.atom_type, b.atom_type);
    }

    #[test]
    fn test_negative_atom_count() {
        let content = WATER.replace("    3    0.000000", "   -3    0.000000");
        let s = parse_str(&content).unwrap();
        assert_eq!(s.natoms(), 3);
    }

    #[test]
    fn test_truncated_header_is_fatal() {
        let err = parse_str(" only one comment\n").unwrap_err();
        assert!(matches!(err, CrysioError::UnexpectedEof { .. }));
    }

    #[test]
    fn test_unknown_atomic_number_is_fatal() {
        let content = WATER.replace("    8    8.000000", "  999    8.000000");
        let err = parse_str(&content).unwrap_err();
        assert!(matches!(err, CrysioError::UnknownAtomicNumber { .. }));
    }
}
