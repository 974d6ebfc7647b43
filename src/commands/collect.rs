//! # collect 命令实现
//!
//! 批量解析目录下的结构文件并写出 CSV 汇总。
//!
//! ## 功能
//! - walkdir 遍历目录，glob 模式过滤
//! - rayon 并行解析
//! - CSV 汇总：格式、原子数、化学式、晶胞参数、电荷
//!
//! ## 依赖关系
//! - 使用 `cli/collect.rs` 定义的参数
//! - 使用 `parsers/`, `models/`
//! - 使用 `utils/output.rs`, `utils/progress.rs`

use crate::cli::collect::CollectArgs;
use crate::commands::cell_parameters;
use crate::error::{CrysioError, Result};
use crate::models::Structure;
use crate::parsers;
use crate::utils::{output, progress};

use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

/// CSV 汇总行
#[derive(Debug, Serialize)]
struct StructureRecord {
    file: String,
    format: String,
    natoms: usize,
    formula: String,
    coordinates: String,
    a: Option<f64>,
    b: Option<f64>,
    c: Option<f64>,
    alpha: Option<f64>,
    beta: Option<f64>,
    gamma: Option<f64>,
    charges: usize,
}

/// 执行 collect 命令
pub fn execute(args: CollectArgs) -> Result<()> {
    output::print_header("Collecting structure files");

    if !args.input.is_dir() {
        return Err(CrysioError::DirectoryNotFound {
            path: args.input.display().to_string(),
        });
    }

    let files = collect_input_files(&args.input, &args.pattern, args.recursive)?;
    if files.is_empty() {
        return Err(CrysioError::NoFilesFound {
            pattern: args.pattern.clone(),
        });
    }
    output::print_info(&format!("Found {} files to parse", files.len()));

    // 设置并行度
    let num_threads = if args.jobs == 0 {
        num_cpus::get()
    } else {
        args.jobs
    };
    rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()
        .ok();

    let pb = progress::create_progress_bar(files.len() as u64, "Parsing");
    let fail_count = AtomicUsize::new(0);

    // 并行解析；失败的文件跳过并计数
    let mut records: Vec<StructureRecord> = files
        .par_iter()
        .filter_map(|path| {
            let result = parsers::parse_structure_file(path, None);
            pb.inc(1);
            match result {
                Ok(structure) => Some(to_record(path, &structure)),
                Err(e) => {
                    fail_count.fetch_add(1, Ordering::SeqCst);
                    pb.suspend(|| {
                        output::print_error(&format!("{}: {}", path.display(), e));
                    });
                    None
                }
            }
        })
        .collect();
    pb.finish_with_message("Done");

    records.sort_by(|a, b| a.file.cmp(&b.file));
    write_summary_csv(&records, &args.output)?;
    output::print_success(&format!("Summary saved to '{}'", args.output.display()));

    let failed = fail_count.load(Ordering::SeqCst);
    if failed > 0 {
        output::print_warning(&format!("{} file(s) failed to parse", failed));
    }
    output::print_done(&format!("Collected {} structure(s)", records.len()));

    Ok(())
}

/// 收集输入文件
fn collect_input_files(input_dir: &Path, pattern: &str, recursive: bool) -> Result<Vec<PathBuf>> {
    let patterns = pattern
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| {
            glob::Pattern::new(p).map_err(|e| {
                CrysioError::InvalidArgument(format!("Invalid pattern '{}': {}", p, e))
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let walker = if recursive {
        walkdir::WalkDir::new(input_dir)
    } else {
        walkdir::WalkDir::new(input_dir).max_depth(1)
    };

    let mut files = Vec::new();
    for entry in walker.into_iter().filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            if patterns.iter().any(|p| p.matches(name)) {
                files.push(entry.path().to_path_buf());
            }
        }
    }

    files.sort();
    Ok(files)
}

fn to_record(path: &Path, s: &Structure) -> StructureRecord {
    let (length, angle) = match cell_parameters(s) {
        Some((l, a)) => (Some(l), Some(a)),
        None => (None, None),
    };

    StructureRecord {
        file: path.display().to_string(),
        format: s.source_format.clone().unwrap_or_default(),
        natoms: s.natoms(),
        formula: s.formula(),
        coordinates: if s.natoms() == 0 {
            String::new()
        } else if s.is_fractional() {
            "fractional".to_string()
        } else {
            "cartesian".to_string()
        },
        a: length.map(|l| l[0]),
        b: length.map(|l| l[1]),
        c: length.map(|l| l[2]),
        alpha: angle.map(|a| a[0]),
        beta: angle.map(|a| a[1]),
        gamma: angle.map(|a| a[2]),
        charges: s.atom_charge.len(),
    }
}

/// 保存汇总到 CSV
fn write_summary_csv(records: &[StructureRecord], output_path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(output_path).map_err(CrysioError::CsvError)?;

    for record in records {
        wtr.serialize(record).map_err(CrysioError::CsvError)?;
    }

    wtr.flush().map_err(|e| CrysioError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_record_with_cell() {
        let mut s = Structure::new("NaCl");
        s.source_format = Some("cif".to_string());
        s.cell_length = Some([5.64, 5.64, 5.64]);
        s.cell_angle_deg = Some([90.0, 90.0, 90.0]);
        s.atom_type = vec!["Na".to_string(), "Cl".to_string()];
        s.atom_fract = vec![[0.0, 0.0, 0.0], [0.5, 0.5, 0.5]];

        let record = to_record(Path::new("NaCl.cif"), &s);
        assert_eq!(record.natoms, 2);
        assert_eq!(record.formula, "ClNa");
        assert_eq!(record.coordinates, "fractional");
        assert_eq!(record.a, Some(5.64));
        assert_eq!(record.charges, 0);
    }

    #[test]
    fn test_to_record_without_cell() {
        let mut s = Structure::new("water");
        s.atom_type = vec!["O".to_string()];
        s.atom_xyz = vec![[0.0, 0.0, 0.0]];

        let record = to_record(Path::new("water.xyz"), &s);
        assert_eq!(record.coordinates, "cartesian");
        assert_eq!(record.a, None);
        assert_eq!(record.alpha, None);
    }
}
