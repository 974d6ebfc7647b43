//! # CIF 格式解析器
//!
//! 解析 P1 对称性的 .cif 文件。
//!
//! ## 格式说明
//! ```text
//! _cell_length_a    10.0
//! _cell_length_b    10.0
//! _cell_length_c    10.0
//! _cell_angle_alpha 90.0
//! _cell_angle_beta  90.0
//! _cell_angle_gamma 90.0
//! loop_
//! _atom_site_label
//! _atom_site_fract_x
//! _atom_site_fract_y
//! _atom_site_fract_z
//! C1 0.0 0.0 0.0
//! ...
//! ```
//!
//! 约束：只处理 P1 对称性；晶胞数据必须出现在原子数据之前；
//! `_atom_site_*` 声明块之前不能混入其他 `_atom_*` 指令。
//! 原子数据行在 `loop_`、空行或文件尾处结束。
//!
//! 列序由文件内的声明顺序决定（见 `columns.rs`）。原子类型列
//! 优先取 `_atom_site_type_symbol`，缺失时回退 `_atom_site_label`；
//! 坐标优先取分数坐标，缺失时回退笛卡尔坐标；两组同义词都
//! 没有声明是结构性错误。
//!
//! ## 依赖关系
//! - 被 `parsers/mod.rs` 使用
//! - 使用 `parsers/columns.rs`, `models/`, `io/source.rs`

use super::columns::ColumnMap;
use super::parse_f64;
use crate::error::{CrysioError, Result};
use crate::io::LineSource;
use crate::models::Structure;
use std::io::{BufRead, Seek};

const FORMAT: &str = "cif";

/// 原子类型列的同义词，按优先级排列
const TYPE_FIELDS: [&str; 2] = ["_atom_site_type_symbol", "_atom_site_label"];
/// 分数坐标列
const FRACT_FIELDS: [&str; 3] = ["_atom_site_fract_x", "_atom_site_fract_y", "_atom_site_fract_z"];
/// 笛卡尔坐标列（分数坐标缺失时的回退）
const CARTN_FIELDS: [&str; 3] = ["_atom_site_Cartn_x", "_atom_site_Cartn_y", "_atom_site_Cartn_z"];

/// 解析 .cif 行源
pub fn parse<R: BufRead + Seek>(src: &mut LineSource<R>) -> Result<Structure> {
    let mut s = Structure::default();
    let mut length = [None; 3];
    let mut angle = [None; 3];

    // 先扫描晶胞标量，直到 _atom_* 声明块开始
    let mut atom_block: Option<(ColumnMap, Option<String>)> = None;
    while let Some(line) = src.next_line()? {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some(&key) = tokens.first() else { continue };

        match key {
            "_cell_length_a" => length[0] = Some(cell_value(&tokens, key, src.line_number())?),
            "_cell_length_b" => length[1] = Some(cell_value(&tokens, key, src.line_number())?),
            "_cell_length_c" => length[2] = Some(cell_value(&tokens, key, src.line_number())?),
            "_cell_angle_alpha" => angle[0] = Some(cell_value(&tokens, key, src.line_number())?),
            "_cell_angle_beta" => angle[1] = Some(cell_value(&tokens, key, src.line_number())?),
            "_cell_angle_gamma" => angle[2] = Some(cell_value(&tokens, key, src.line_number())?),
            _ if key.starts_with("_atom") => {
                atom_block = Some(ColumnMap::scan(src, &line, "_atom")?);
                break;
            }
            _ => {}
        }
    }

    let (map, first_row) = atom_block.ok_or_else(|| CrysioError::MissingSection {
        format: FORMAT.to_string(),
        what: "_atom_site declaration block".to_string(),
    })?;

    s.cell_length = Some([
        require_cell(length[0], "_cell_length_a")?,
        require_cell(length[1], "_cell_length_b")?,
        require_cell(length[2], "_cell_length_c")?,
    ]);
    s.cell_angle_deg = Some([
        require_cell(angle[0], "_cell_angle_alpha")?,
        require_cell(angle[1], "_cell_angle_beta")?,
        require_cell(angle[2], "_cell_angle_gamma")?,
    ]);

    // 同义词决议：一次决定，整个数据块沿用
    let type_field = map.first_declared(&TYPE_FIELDS).ok_or_else(|| {
        CrysioError::MissingColumn {
            format: FORMAT.to_string(),
            what: "_atom_site_type_symbol or _atom_site_label".to_string(),
        }
    })?;
    let fractional = if map.contains(FRACT_FIELDS[0]) {
        true
    } else if map.contains(CARTN_FIELDS[0]) {
        false
    } else {
        return Err(CrysioError::MissingColumn {
            format: FORMAT.to_string(),
            what: "_atom_site_fract_* or _atom_site_Cartn_* coordinates".to_string(),
        });
    };
    let has_charge = map.contains("_atom_site_charge");

    // 数据行：loop_ / _loop / 空行 / 文件尾 终止
    let mut row = first_row;
    while let Some(line) = row {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        match tokens.first() {
            None => break,
            Some(&"loop_") | Some(&"_loop") => break,
            Some(_) => {}
        }

        s.atom_type
            .push(row_field(&map, &tokens, type_field, src.line_number())?.to_string());

        let coord_fields = if fractional { &FRACT_FIELDS } else { &CARTN_FIELDS };
        let mut coord = [0.0; 3];
        for (slot, name) in coord.iter_mut().zip(coord_fields.iter().copied()) {
            let tok = row_field(&map, &tokens, name, src.line_number())?;
            *slot = parse_f64(FORMAT, tok, src.line_number())?;
        }
        if fractional {
            s.atom_fract.push(coord);
        } else {
            s.atom_xyz.push(coord);
        }

        if has_charge {
            let tok = row_field(&map, &tokens, "_atom_site_charge", src.line_number())?;
            s.atom_charge.push(parse_f64(FORMAT, tok, src.line_number())?);
        }

        row = src.next_line()?;
    }

    Ok(s)
}

/// 取指令行的数值参数
fn cell_value(tokens: &[&str], key: &str, line: usize) -> Result<f64> {
    let tok = tokens.get(1).ok_or_else(|| CrysioError::MissingSection {
        format: FORMAT.to_string(),
        what: format!("value after {}", key),
    })?;
    parse_f64(FORMAT, tok, line)
}

fn require_cell(value: Option<f64>, what: &str) -> Result<f64> {
    value.ok_or_else(|| CrysioError::MissingSection {
        format: FORMAT.to_string(),
        what: what.to_string(),
    })
}

/// 按声明的列号从数据行取 token；行太短按结构性错误处理
fn row_field<'a>(map: &ColumnMap, tokens: &[&'a str], name: &str, line: usize) -> Result<&'a str> {
    map.field(tokens, name)
        .ok_or_else(|| CrysioError::MissingSection {
            format: FORMAT.to_string(),
            what: format!("value for {} in atom row at line {}", name, line),
        })
}
