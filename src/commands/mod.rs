//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `parsers/`, `models/`, `utils/`
//! - 子模块: collect, info

pub mod collect;
pub mod info;

use crate::cli::Commands;
use crate::error::Result;
use crate::models::Structure;

/// 执行命令
pub fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Info(args) => info::execute(args),
        Commands::Collect(args) => collect::execute(args),
    }
}

/// 取展示用的晶胞参数 (a, b, c, alpha, beta, gamma)。
///
/// 解析层不在两种晶格表示之间换算；展示层在只有矩阵时
/// 按行向量模长和夹角折算。
pub(crate) fn cell_parameters(s: &Structure) -> Option<([f64; 3], [f64; 3])> {
    if let (Some(length), Some(angle)) = (s.cell_length, s.cell_angle_deg) {
        return Some((length, angle));
    }

    let m = s.lattice_matrix?;
    let norm = |v: [f64; 3]| (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
    let dot = |u: [f64; 3], v: [f64; 3]| u[0] * v[0] + u[1] * v[1] + u[2] * v[2];

    let (a, b, c) = (norm(m[0]), norm(m[1]), norm(m[2]));
    let alpha = (dot(m[1], m[2]) / (b * c)).acos().to_degrees();
    let beta = (dot(m[0], m[2]) / (a * c)).acos().to_degrees();
    let gamma = (dot(m[0], m[1]) / (a * b)).acos().to_degrees();

    Some(([a, b, c], [alpha, beta, gamma]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_parameters_prefers_explicit() {
        let mut s = Structure::new("x");
        s.cell_length = Some([5.0, 6.0, 7.0]);
        s.cell_angle_deg = Some([90.0, 90.0, 120.0]);
        let (len, ang) = cell_parameters(&s).unwrap();
        assert_eq!(len, [5.0, 6.0, 7.0]);
        assert_eq!(ang, [90.0, 90.0, 120.0]);
    }

    #[test]
    fn test_cell_parameters_from_matrix() {
        let mut s = Structure::new("x");
        s.lattice_matrix = Some([[4.0, 0.0, 0.0], [0.0, 4.0, 0.0], [0.0, 0.0, 9.0]]);
        let (len, ang) = cell_parameters(&s).unwrap();
        assert!((len[0] - 4.0).abs() < 1e-9);
        assert!((len[2] - 9.0).abs() < 1e-9);
        assert!((ang[0] - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_cell_parameters_absent() {
        let s = Structure::new("x");
        assert!(cell_parameters(&s).is_none());
    }
}
