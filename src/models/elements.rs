//! # 元素符号表
//!
//! 原子序数与元素符号的互查。cube 和 (A)XSF 格式的原子类型列
//! 可以是原子序数，需要在解析时换算成元素符号。
//!
//! ## 依赖关系
//! - 被 `parsers/axsf.rs`, `parsers/cube.rs` 使用
//! - 无外部模块依赖

/// 元素符号，下标 = 原子序数 - 1 (Z = 1..=118)
const SYMBOLS: [&str; 118] = [
    "H", "He", "Li", "Be", "B", "C", "N", "O", "F", "Ne", //
    "Na", "Mg", "Al", "Si", "P", "S", "Cl", "Ar", "K", "Ca", //
    "Sc", "Ti", "V", "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn", //
    "Ga", "Ge", "As", "Se", "Br", "Kr", "Rb", "Sr", "Y", "Zr", //
    "Nb", "Mo", "Tc", "Ru", "Rh", "Pd", "Ag", "Cd", "In", "Sn", //
    "Sb", "Te", "I", "Xe", "Cs", "Ba", "La", "Ce", "Pr", "Nd", //
    "Pm", "Sm", "Eu", "Gd", "Tb", "Dy", "Ho", "Er", "Tm", "Yb", //
    "Lu", "Hf", "Ta", "W", "Re", "Os", "Ir", "Pt", "Au", "Hg", //
    "Tl", "Pb", "Bi", "Po", "At", "Rn", "Fr", "Ra", "Ac", "Th", //
    "Pa", "U", "Np", "Pu", "Am", "Cm", "Bk", "Cf", "Es", "Fm", //
    "Md", "No", "Lr", "Rf", "Db", "Sg", "Bh", "Hs", "Mt", "Ds", //
    "Rg", "Cn", "Nh", "Fl", "Mc", "Lv", "Ts", "Og",
];

/// 按原子序数查元素符号
pub fn symbol(number: u32) -> Option<&'static str> {
    if number == 0 {
        return None;
    }
    SYMBOLS.get(number as usize - 1).copied()
}

/// 按元素符号查原子序数
pub fn atomic_number(symbol: &str) -> Option<u32> {
    SYMBOLS
        .iter()
        .position(|s| s.eq_ignore_ascii_case(symbol))
        .map(|i| i as u32 + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_lookup() {
        assert_eq!(symbol(1), Some("H"));
        assert_eq!(symbol(6), Some("C"));
        assert_eq!(symbol(26), Some("Fe"));
        assert_eq!(symbol(118), Some("Og"));
    }

    #[test]
    fn test_symbol_out_of_range() {
        assert_eq!(symbol(0), None);
        assert_eq!(symbol(119), None);
    }

    #[test]
    fn test_atomic_number_lookup() {
        assert_eq!(atomic_number("H"), Some(1));
        assert_eq!(atomic_number("fe"), Some(26));
        assert_eq!(atomic_number("Xx"), None);
    }
}
