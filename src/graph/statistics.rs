//! 执行统计
//!
//! 结果集只把统计信息当作不透明的 `键: 值` 字符串保存，
//! 这里按服务端的常用条目提供带类型的读取方式；缺失的条目视为 0

use serde::{Deserialize, Serialize};

pub const LABELS_ADDED: &str = "Labels added";
pub const LABELS_REMOVED: &str = "Labels removed";
pub const NODES_CREATED: &str = "Nodes created";
pub const NODES_DELETED: &str = "Nodes deleted";
pub const PROPERTIES_SET: &str = "Properties set";
pub const PROPERTIES_REMOVED: &str = "Properties removed";
pub const RELATIONSHIPS_CREATED: &str = "Relationships created";
pub const RELATIONSHIPS_DELETED: &str = "Relationships deleted";
pub const INDICES_CREATED: &str = "Indices created";
pub const INDICES_DELETED: &str = "Indices deleted";
pub const CACHED_EXECUTION: &str = "Cached execution";
/// 服务端实际发送 `Query internal execution time`，按子串匹配
pub const INTERNAL_EXECUTION_TIME: &str = "internal execution time";

/// 按服务端顺序保存的原始统计行
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryStatistics {
    lines: Vec<String>,
}

impl QueryStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse<'a>(lines: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            lines: lines.into_iter().map(str::to_string).collect(),
        }
    }

    /// 服务端返回的原始行，顺序与重复条目都保持不变
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// 按 `键: 值` 拆分后的条目；没有冒号的行整行作为键，值为空
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.lines.iter().map(|line| match line.split_once(':') {
            Some((key, value)) => (key.trim(), value.trim()),
            None => (line.trim(), ""),
        })
    }

    /// 先找键完全相同的第一条，再找键包含 `key` 的第一条
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries()
            .find(|(k, _)| *k == key)
            .or_else(|| self.entries().find(|(k, _)| k.contains(key)))
            .map(|(_, v)| v)
    }

    /// 取条目值中的第一个数字，例如 `15.5 milliseconds` 取 `15.5`
    fn number(&self, key: &str) -> Option<f64> {
        self.get(key)?.split_whitespace().next()?.parse().ok()
    }

    fn count(&self, key: &str) -> u64 {
        self.number(key).map_or(0, |n| n as u64)
    }

    pub fn labels_added(&self) -> u64 {
        self.count(LABELS_ADDED)
    }

    pub fn labels_removed(&self) -> u64 {
        self.count(LABELS_REMOVED)
    }

    pub fn nodes_created(&self) -> u64 {
        self.count(NODES_CREATED)
    }

    pub fn nodes_deleted(&self) -> u64 {
        self.count(NODES_DELETED)
    }

    pub fn properties_set(&self) -> u64 {
        self.count(PROPERTIES_SET)
    }

    pub fn properties_removed(&self) -> u64 {
        self.count(PROPERTIES_REMOVED)
    }

    pub fn relationships_created(&self) -> u64 {
        self.count(RELATIONSHIPS_CREATED)
    }

    pub fn relationships_deleted(&self) -> u64 {
        self.count(RELATIONSHIPS_DELETED)
    }

    pub fn indices_created(&self) -> u64 {
        self.count(INDICES_CREATED)
    }

    pub fn indices_deleted(&self) -> u64 {
        self.count(INDICES_DELETED)
    }

    pub fn cached_execution(&self) -> bool {
        self.count(CACHED_EXECUTION) == 1
    }

    pub fn internal_execution_time_ms(&self) -> f64 {
        self.number(INTERNAL_EXECUTION_TIME).unwrap_or(0.0)
    }
}
