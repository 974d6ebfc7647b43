//! # 行读取源
//!
//! `LineSource` 把一个可定位的字节流包装成逐行读取的文本源，
//! 是所有格式解析器消费的唯一输入抽象。
//!
//! 行号从 1 开始计数。`rewind` 把流拨回开头并清零行号，
//! 供需要二次扫描的解析器使用（Quantum-Espresso 输出）。
//! 一个 `LineSource` 只属于一次解析调用，不允许跨线程共享句柄。
//!
//! ## 依赖关系
//! - 被 `parsers/` 全部模块使用
//! - 使用 `error.rs`

use crate::error::{CrysioError, Result};
use std::io::{BufRead, Seek, SeekFrom};

/// 可定位的逐行文本源
pub struct LineSource<R: BufRead + Seek> {
    reader: R,
    line_no: usize,
}

impl<R: BufRead + Seek> LineSource<R> {
    pub fn new(reader: R) -> Self {
        LineSource { reader, line_no: 0 }
    }

    /// 读取下一行（去掉行尾换行符）；到达文件尾返回 `None`
    pub fn next_line(&mut self) -> Result<Option<String>> {
        let mut buf = String::new();
        let n = self.reader.read_line(&mut buf)?;
        if n == 0 {
            return Ok(None);
        }
        self.line_no += 1;
        while buf.ends_with('\n') || buf.ends_with('\r') {
            buf.pop();
        }
        Ok(Some(buf))
    }

    /// 读取下一行，文件尾视为截断错误
    pub fn next_line_required(&mut self, format: &str, what: &str) -> Result<String> {
        self.next_line()?.ok_or_else(|| CrysioError::UnexpectedEof {
            format: format.to_string(),
            what: what.to_string(),
        })
    }

    /// 拨回文件开头，行号清零
    pub fn rewind(&mut self) -> Result<()> {
        self.reader.seek(SeekFrom::Start(0))?;
        self.line_no = 0;
        Ok(())
    }

    /// 最近一次读到的行的行号（1 起）
    pub fn line_number(&self) -> usize {
        self.line_no
    }
}
