//! 传输层回复结构
//!
//! 传输协作方返回的原始回复树，只包含 RESP 风格的基础类型，
//! 不带任何图语义

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum RawReply {
    Nil,
    Integer(i64),
    Double(f64),
    String(String),
    Array(Vec<RawReply>),
    /// 服务端错误回复
    Error(String),
}

impl RawReply {
    pub fn array(items: impl IntoIterator<Item = RawReply>) -> Self {
        RawReply::Array(items.into_iter().collect())
    }

    /// 回复种类名称，用于错误信息
    pub fn kind(&self) -> &'static str {
        match self {
            RawReply::Nil => "nil",
            RawReply::Integer(_) => "integer",
            RawReply::Double(_) => "double",
            RawReply::String(_) => "string",
            RawReply::Array(_) => "array",
            RawReply::Error(_) => "error",
        }
    }

    pub fn as_array(&self) -> Option<&[RawReply]> {
        match self {
            RawReply::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            RawReply::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_error(&self) -> Option<&str> {
        match self {
            RawReply::Error(message) => Some(message),
            _ => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, RawReply::Error(_))
    }
}

impl fmt::Display for RawReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawReply::Nil => write!(f, "(nil)"),
            RawReply::Integer(i) => write!(f, "(integer) {}", i),
            RawReply::Double(d) => write!(f, "(double) {}", d),
            RawReply::String(s) => write!(f, "\"{}\"", s),
            RawReply::Error(e) => write!(f, "(error) {}", e),
            RawReply::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
        }
    }
}

impl From<i64> for RawReply {
    fn from(value: i64) -> Self {
        RawReply::Integer(value)
    }
}

impl From<f64> for RawReply {
    fn from(value: f64) -> Self {
        RawReply::Double(value)
    }
}

impl From<&str> for RawReply {
    fn from(value: &str) -> Self {
        RawReply::String(value.to_string())
    }
}

impl From<String> for RawReply {
    fn from(value: String) -> Self {
        RawReply::String(value)
    }
}

impl From<Vec<RawReply>> for RawReply {
    fn from(value: Vec<RawReply>) -> Self {
        RawReply::Array(value)
    }
}

/// 由 JSON 字面量构造回复，便于编写测试夹具
///
/// 布尔值按服务端的习惯转为 `"true"` / `"false"` 字符串；
/// 对象没有对应的回复类型，按 `[key, value, ...]` 平铺
impl From<serde_json::Value> for RawReply {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value as Json;
        match value {
            Json::Null => RawReply::Nil,
            Json::Bool(b) => RawReply::String(b.to_string()),
            Json::Number(n) => match n.as_i64() {
                Some(i) => RawReply::Integer(i),
                None => RawReply::Double(n.as_f64().unwrap_or(f64::NAN)),
            },
            Json::String(s) => RawReply::String(s),
            Json::Array(items) => RawReply::Array(items.into_iter().map(RawReply::from).collect()),
            Json::Object(map) => RawReply::Array(
                map.into_iter()
                    .flat_map(|(k, v)| [RawReply::String(k), RawReply::from(v)])
                    .collect(),
            ),
        }
    }
}
