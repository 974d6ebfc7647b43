//! # info 命令实现
//!
//! 解析结构文件并打印摘要表格。
//!
//! ## 依赖关系
//! - 使用 `cli/info.rs` 定义的参数
//! - 使用 `parsers/`, `models/`
//! - 使用 `utils/output.rs`

use crate::cli::info::InfoArgs;
use crate::commands::cell_parameters;
use crate::error::Result;
use crate::models::{elements, Structure};
use crate::parsers;
use crate::utils::output;

use tabled::{Table, Tabled};

/// 摘要表行
#[derive(Debug, Clone, Tabled)]
struct PropertyRow {
    #[tabled(rename = "Property")]
    property: String,
    #[tabled(rename = "Value")]
    value: String,
}

/// 原子表行
#[derive(Debug, Clone, Tabled)]
struct AtomRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Species")]
    species: String,
    #[tabled(rename = "x")]
    x: String,
    #[tabled(rename = "y")]
    y: String,
    #[tabled(rename = "z")]
    z: String,
}

/// 执行 info 命令
pub fn execute(args: InfoArgs) -> Result<()> {
    let format = args.format.map(Into::into);

    for path in &args.files {
        let structure = parsers::parse_structure_file(path, format)?;

        output::print_header(&format!("{} ({})", structure.name, path.display()));
        let table = Table::new(property_rows(&structure));
        println!("{}", table);

        if args.atoms {
            println!();
            let table = Table::new(atom_rows(&structure));
            println!("{}", table);
        }
    }

    Ok(())
}

fn property_rows(s: &Structure) -> Vec<PropertyRow> {
    let mut rows = Vec::new();
    let row = |property: &str, value: String| PropertyRow {
        property: property.to_string(),
        value,
    };

    if let Some(format) = &s.source_format {
        rows.push(row("Format", format.clone()));
    }
    rows.push(row("Atoms", s.natoms().to_string()));
    rows.push(row("Formula", s.formula()));
    if s.natoms() > 0 {
        rows.push(row("Species", species_breakdown(s)));
    }
    rows.push(row(
        "Coordinates",
        if s.natoms() == 0 {
            "-".to_string()
        } else if s.is_fractional() {
            "fractional".to_string()
        } else {
            "cartesian".to_string()
        },
    ));

    match cell_parameters(s) {
        Some((length, angle)) => {
            rows.push(row(
                "Cell a b c (Å)",
                format!("{:.4} {:.4} {:.4}", length[0], length[1], length[2]),
            ));
            rows.push(row(
                "Cell α β γ (°)",
                format!("{:.2} {:.2} {:.2}", angle[0], angle[1], angle[2]),
            ));
        }
        None => rows.push(row("Cell", "not specified".to_string())),
    }

    if !s.atom_charge.is_empty() {
        let total: f64 = s.atom_charge.iter().sum();
        rows.push(row(
            "Charges",
            format!("{} atoms, net {:+.4}", s.atom_charge.len(), total),
        ));
    }

    rows
}

/// 物种分布，按原子序数排序；查不到的标签排最后
fn species_breakdown(s: &Structure) -> String {
    use std::collections::BTreeMap;
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for elem in &s.atom_type {
        *counts.entry(elem.as_str()).or_insert(0) += 1;
    }

    let mut species: Vec<(&str, usize)> = counts.into_iter().collect();
    species.sort_by_key(|(el, _)| elements::atomic_number(el).unwrap_or(u32::MAX));

    species
        .iter()
        .map(|(el, n)| format!("{} x{}", el, n))
        .collect::<Vec<_>>()
        .join(", ")
}

fn atom_rows(s: &Structure) -> Vec<AtomRow> {
    let coords = if s.is_fractional() {
        &s.atom_fract
    } else {
        &s.atom_xyz
    };

    s.atom_type
        .iter()
        .zip(coords.iter())
        .enumerate()
        .map(|(i, (species, pos))| AtomRow {
            index: i + 1,
            species: species.clone(),
            x: format!("{:12.6}", pos[0]),
            y: format!("{:12.6}", pos[1]),
            z: format!("{:12.6}", pos[2]),
        })
        .collect()
}
