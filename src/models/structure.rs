//! # 晶体结构数据模型
//!
//! 定义统一的晶体结构表示，所有格式解析器都填充同一个 `Structure`。
//!
//! 几何信息二选一：`lattice_matrix` 或 (`cell_length` + `cell_angle_deg`)，
//! 由源格式决定，解析层不做相互换算。原子坐标同理：
//! 每次解析只填充 `atom_xyz` 和 `atom_fract` 中的一个，另一个保持为空。
//!
//! ## 依赖关系
//! - 被 `parsers/` 和 `commands/` 使用
//! - 无外部模块依赖

use serde::{Deserialize, Serialize};

/// 晶体/分子结构
///
/// 每次解析调用产生一个实例，字段只增不改。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Structure {
    /// 结构名称（一般取自文件名）
    pub name: String,

    /// 晶格向量矩阵 (3x3)，行向量表示 a, b, c，单位 Å
    /// [[a1, a2, a3], [b1, b2, b3], [c1, c2, c3]]
    pub lattice_matrix: Option<[[f64; 3]; 3]>,

    /// 晶胞边长 (a, b, c)，单位 Å
    pub cell_length: Option<[f64; 3]>,

    /// 晶胞夹角 (alpha, beta, gamma)，单位度
    pub cell_angle_deg: Option<[f64; 3]>,

    /// 元素/物种标签，下标即原子序号，
    /// 与 `atom_xyz`/`atom_fract`/`atom_charge` 对齐
    pub atom_type: Vec<String>,

    /// 笛卡尔坐标 [x, y, z]，单位 Å
    pub atom_xyz: Vec<[f64; 3]>,

    /// 分数坐标 [x, y, z]（晶格基矢线性组合的系数）
    pub atom_fract: Vec<[f64; 3]>,

    /// 每原子电荷；只有源文件提供时才填充，可以比 `atom_type` 短
    pub atom_charge: Vec<f64>,

    /// 来源文件格式
    pub source_format: Option<String>,
}

impl Structure {
    pub fn new(name: impl Into<String>) -> Self {
        Structure {
            name: name.into(),
            ..Default::default()
        }
    }

    /// 原子个数
    pub fn natoms(&self) -> usize {
        self.atom_type.len()
    }

    /// 计算化学式
    pub fn formula(&self) -> String {
        use std::collections::BTreeMap;
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();

        for elem in &self.atom_type {
            *counts.entry(elem.as_str()).or_insert(0) += 1;
        }

        counts
            .into_iter()
            .map(|(el, count)| {
                if count == 1 {
                    el.to_string()
                } else {
                    format!("{}{}", el, count)
                }
            })
            .collect::<Vec<_>>()
            .join("")
    }

    /// 坐标是否为分数坐标
    pub fn is_fractional(&self) -> bool {
        !self.atom_fract.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_structure() {
        let s = Structure::new("empty");
        assert_eq!(s.natoms(), 0);
        assert!(s.lattice_matrix.is_none());
        assert!(s.cell_length.is_none());
        assert!(s.atom_xyz.is_empty());
        assert!(s.atom_fract.is_empty());
        assert!(s.atom_charge.is_empty());
    }

    #[test]
    fn test_formula() {
        let mut s = Structure::new("NaCl");
        for _ in 0..4 {
            s.atom_type.push("Na".to_string());
        }
        for _ in 0..4 {
            s.atom_type.push("Cl".to_string());
        }
        assert_eq!(s.formula(), "Cl4Na4");
    }

    #[test]
    fn test_formula_single_atom() {
        let mut s = Structure::new("He");
        s.atom_type.push("He".to_string());
        assert_eq!(s.formula(), "He");
    }

    #[test]
    fn test_is_fractional() {
        let mut s = Structure::new("x");
        s.atom_type.push("C".to_string());
        s.atom_fract.push([0.5, 0.5, 0.5]);
        assert!(s.is_fractional());

        let mut s = Structure::new("y");
        s.atom_type.push("C".to_string());
        s.atom_xyz.push([1.0, 2.0, 3.0]);
        assert!(!s.is_fractional());
    }
}
