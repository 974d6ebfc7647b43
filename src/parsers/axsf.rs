//! # (A)XSF 格式解析器
//!
//! 解析 XCrySDen 的 .axsf/.xsf 文件。
//!
//! ## 格式说明
//! ```text
//! PRIMVEC
//!  a1 a2 a3
//!  b1 b2 b3
//!  c1 c2 c3
//! PRIMCOORD
//!  natoms 1
//!  Element|Z  x y z
//!  ...
//! ```
//!
//! 原子类型列可以是元素符号，也可以是原子序数。
//!
//! ## 依赖关系
//! - 被 `parsers/mod.rs` 使用
//! - 使用 `models/`, `io/source.rs`

use super::{parse_f64, parse_usize, resolve_species};
use crate::error::{CrysioError, Result};
use crate::io::LineSource;
use crate::models::Structure;
use std::io::{BufRead, Seek};

const FORMAT: &str = "axsf";

/// 解析 .axsf/.xsf 行源
pub fn parse<R: BufRead + Seek>(src: &mut LineSource<R>) -> Result<Structure> {
    let mut s = Structure::default();

    seek_section(src, "PRIMVEC")?;
    let mut matrix = [[0.0; 3]; 3];
    for row in &mut matrix {
        let line = src.next_line_required(FORMAT, "PRIMVEC lattice vector")?;
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < 3 {
            return Err(CrysioError::MissingSection {
                format: FORMAT.to_string(),
                what: format!("3-component lattice vector at line {}", src.line_number()),
            });
        }
        for (j, slot) in row.iter_mut().enumerate() {
            *slot = parse_f64(FORMAT, tokens[j], src.line_number())?;
        }
    }
    s.lattice_matrix = Some(matrix);

    seek_section(src, "PRIMCOORD")?;
    let count_line = src.next_line_required(FORMAT, "PRIMCOORD atom count")?;
    let count_token = count_line.split_whitespace().next().ok_or_else(|| {
        CrysioError::MissingSection {
            format: FORMAT.to_string(),
            what: "atom count after PRIMCOORD".to_string(),
        }
    })?;
    let natoms = parse_usize(FORMAT, count_token, src.line_number())?;

    for _ in 0..natoms {
        let line = src.next_line_required(FORMAT, "PRIMCOORD atom row")?;
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < 4 {
            return Err(CrysioError::MissingSection {
                format: FORMAT.to_string(),
                what: format!("atom row with 4 fields at line {}", src.line_number()),
            });
        }
        s.atom_type.push(resolve_species(FORMAT, tokens[0])?);
        s.atom_xyz.push([
            parse_f64(FORMAT, tokens[1], src.line_number())?,
            parse_f64(FORMAT, tokens[2], src.line_number())?,
            parse_f64(FORMAT, tokens[3], src.line_number())?,
        ]);
    }

    Ok(s)
}

/// 跳到首个 token 等于 `marker` 的行
fn seek_section<R: BufRead + Seek>(src: &mut LineSource<R>, marker: &str) -> Result<()> {
    while let Some(line) = src.next_line()? {
        if line.split_whitespace().next() == Some(marker) {
            return Ok(());
        }
    }
    Err(CrysioError::MissingSection {
        format: FORMAT.to_string(),
        what: marker.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn parse_str(content: &str) -> Result<Structure> {
        parse(&mut LineSource::new(Cursor::new(content.to_string())))
    }

    const GRAPHENE: &str = "\
ANIMSTEPS 1
CRYSTAL
PRIMVEC
  2.4670 0.0000 0.0000
 -1.2335 2.1365 0.0000
  0.0000 0.0000 10.0000
PRIMCOORD 1
2 1
C  0.0000 0.0000 5.0000
C  1.2335 0.7122 5.0000
";

    #[test]
    fn test_parse_axsf() {
        let s = parse_str(GRAPHENE).unwrap();
        let m = s.lattice_matrix.unwrap();
        assert!((m[0][0] - 2.467).abs() < 1e-9);
        assert!((m[1][0] + 1.2335).abs() < 1e-9);
        assert!((m[2][2] - 10.0).abs() < 1e-9);
        assert_eq!(s.natoms(), 2);
        assert_eq!(s.atom_type, vec!["C", "C"]);
        assert_eq!(s.atom_xyz.len(), 2);
        assert!(s.atom_fract.is_empty());
    }

    #[test]
    fn test_numeric_type_resolves_to_symbol() {
        let content = "\
PRIMVEC
 5.0 0.0 0.0
 0.0 5.0 0.0
 0.0 0.0 5.0
PRIMCOORD
1 1
6  0.0 0.0 0.0
";
        let s = parse_str(content).unwrap();
        // 原子序数 6 与符号 "C" 等效
        assert_eq!(s.atom_type, vec!["C"]);
    }

    #[test]
    fn test_missing_primvec() {
        let err = parse_str("CRYSTAL\nnothing here\n").unwrap_err();
        match err {
            CrysioError::MissingSection { what, .. } => assert_eq!(what, "PRIMVEC"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_truncated_atom_block() {
        let content = "\
PRIMVEC
 5.0 0.0 0.0
 0.0 5.0 0.0
 0.0 0.0 5.0
PRIMCOORD
3 1
C 0.0 0.0 0.0
";
        let err = parse_str(content).unwrap_err();
        assert!(matches!(err, CrysioError::UnexpectedEof { .. }));
    }
}
