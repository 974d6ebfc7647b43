//! # 动态列序查找
//!
//! 有的格式在数据行之前逐行声明字段顺序（CIF 的 `_atom_site_*` 块），
//! 数据行的列序严格跟随声明顺序。`ColumnMap` 先扫描声明建立
//! 字段名 → 列号 的映射，再按名字从数据行取值。
//!
//! 语义字段允许同义词时（type_symbol 优先于 label，分数坐标
//! 优先于笛卡尔坐标），按文档化的优先级顺序取第一个被声明的；
//! 一个都没声明由调用方判为致命错误。
//!
//! ## 依赖关系
//! - 被 `parsers/cif.rs` 使用
//! - 使用 `io/source.rs`, `error.rs`

use crate::error::Result;
use crate::io::LineSource;
use std::collections::HashMap;
use std::io::{BufRead, Seek};

/// 字段名 → 列号 映射
#[derive(Debug, Default)]
pub struct ColumnMap {
    order: HashMap<String, usize>,
}

impl ColumnMap {
    /// 从声明块建立映射。
    ///
    /// `first_line` 是已经读出的第一条声明行；之后只要行首 token
    /// 以 `prefix` 开头就继续记录，每条声明占一行，列号按声明顺序
    /// 递增。返回映射和第一条非声明行（即第一条数据行，必须保留
    /// 给调用方，不能丢弃）；声明块直达文件尾时为 `None`。
    pub fn scan<R: BufRead + Seek>(
        src: &mut LineSource<R>,
        first_line: &str,
        prefix: &str,
    ) -> Result<(ColumnMap, Option<String>)> {
        let mut map = ColumnMap::default();
        let mut line = first_line.to_string();

        loop {
            let name = match line.split_whitespace().next() {
                Some(tok) if tok.starts_with(prefix) => tok.to_string(),
                _ => return Ok((map, Some(line))),
            };
            let idx = map.order.len();
            map.order.insert(name, idx);

            match src.next_line()? {
                Some(next) => line = next,
                None => return Ok((map, None)),
            }
        }
    }

    /// 字段是否被声明过
    pub fn contains(&self, name: &str) -> bool {
        self.order.contains_key(name)
    }

    /// 字段的列号
    pub fn index(&self, name: &str) -> Option<usize> {
        self.order.get(name).copied()
    }

    /// 按字段名从一条数据行取 token
    pub fn field<'a>(&self, tokens: &[&'a str], name: &str) -> Option<&'a str> {
        self.index(name).and_then(|i| tokens.get(i)).copied()
    }

    /// 按优先级顺序返回第一个被声明的同义词
    pub fn first_declared<'a>(&self, names: &[&'a str]) -> Option<&'a str> {
        names.iter().copied().find(|n| self.contains(n))
    }

    /// 已声明的字段个数
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn scan_str(content: &str, prefix: &str) -> (ColumnMap, Option<String>) {
        let mut src = LineSource::new(Cursor::new(content.to_string()));
        let first = src.next_line().unwrap().unwrap();
        ColumnMap::scan(&mut src, &first, prefix).unwrap()
    }

    #[test]
    fn test_scan_records_declaration_order() {
        let content = "_atom_site_label\n_atom_site_fract_x\n_atom_site_fract_y\nC1 0.0 0.5\n";
        let (map, first_row) = scan_str(content, "_atom");

        assert_eq!(map.len(), 3);
        assert_eq!(map.index("_atom_site_label"), Some(0));
        assert_eq!(map.index("_atom_site_fract_x"), Some(1));
        assert_eq!(map.index("_atom_site_fract_y"), Some(2));
        // 第一条数据行必须被保留
        assert_eq!(first_row.as_deref(), Some("C1 0.0 0.5"));
    }

    #[test]
    fn test_scan_hits_eof() {
        let content = "_atom_site_label\n_atom_site_fract_x\n";
        let (map, first_row) = scan_str(content, "_atom");
        assert_eq!(map.len(), 2);
        assert_eq!(first_row, None);
    }

    #[test]
    fn test_field_resolution() {
        let content = "_atom_site_type_symbol\n_atom_site_fract_x\nFe 0.25\n";
        let (map, row) = scan_str(content, "_atom");
        let row = row.unwrap();
        let tokens: Vec<&str> = row.split_whitespace().collect();

        assert_eq!(map.field(&tokens, "_atom_site_type_symbol"), Some("Fe"));
        assert_eq!(map.field(&tokens, "_atom_site_fract_x"), Some("0.25"));
        assert_eq!(map.field(&tokens, "_atom_site_fract_y"), None);
    }

    #[test]
    fn test_synonym_priority() {
        let content = "_atom_site_label\n_atom_site_fract_x\nrow\n";
        let (map, _) = scan_str(content, "_atom");

        // type_symbol 未声明，回退到 label
        assert_eq!(
            map.first_declared(&["_atom_site_type_symbol", "_atom_site_label"]),
            Some("_atom_site_label")
        );
        // 两个同义词都没声明
        assert_eq!(
            map.first_declared(&["_atom_site_Cartn_x", "_atom_site_Cartn_y"]),
            None
        );
    }
}
