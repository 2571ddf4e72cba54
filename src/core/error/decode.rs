//! 回复解码错误
//!
//! 出错位置在错误向上传播时逐层补全，成功路径上不产生任何格式化开销

use std::fmt;
use thiserror::Error;

/// 解码操作结果类型别名
pub type DecodeResult<T> = Result<T, DecodeError>;

/// 线路结构违反约定时产生的错误
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{}", self.render())]
pub struct DecodeError {
    location: Vec<String>,
    message: String,
}

impl DecodeError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            location: Vec::new(),
            message: message.into(),
        }
    }

    pub fn unknown_tag(tag: i64) -> Self {
        Self::new(format!("无法识别的类型标签 {}", tag))
    }

    pub fn arity(what: &str, expected: usize, actual: usize) -> Self {
        Self::new(format!(
            "{} 需要 {} 个元素，实际为 {} 个",
            what, expected, actual
        ))
    }

    pub fn unexpected(expected: &str, found: &str) -> Self {
        Self::new(format!("期望 {}，实际为 {}", expected, found))
    }

    /// 在错误位置前追加一段路径（由内向外调用）
    pub fn within(mut self, segment: impl fmt::Display) -> Self {
        self.location.push(segment.to_string());
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// 由外向内的出错路径，例如 `rows[0][1].properties[2]`
    pub fn location(&self) -> String {
        let mut path = String::new();
        for segment in self.location.iter().rev() {
            if !path.is_empty() && !segment.starts_with('[') {
                path.push('.');
            }
            path.push_str(segment);
        }
        path
    }

    fn render(&self) -> String {
        if self.location.is_empty() {
            self.message.clone()
        } else {
            format!("{}: {}", self.location(), self.message)
        }
    }
}
