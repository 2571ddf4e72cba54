//! 查询参数
//!
//! 参数以 `CYPHER k=v k2=v2 ` 头部的形式拼接在查询文本前面

use crate::core::error::{ClientError, ClientResult};
use crate::core::value::{Value, ValueMap};

/// 为字符串加上双引号并转义 `\` 与 `"`
pub fn quote_string(s: &str) -> String {
    if s.is_empty() {
        return "\"\"".to_string();
    }
    let mut quoted = String::with_capacity(s.len() + 2);
    quoted.push('"');
    for c in s.chars() {
        match c {
            '\\' => quoted.push_str("\\\\"),
            '"' => quoted.push_str("\\\""),
            other => quoted.push(other),
        }
    }
    quoted.push('"');
    quoted
}

/// 把参数值转换为参数头中的文本
///
/// 字符串加引号，映射的键不加引号；图实体不能作为参数发送
pub fn stringify_param(value: &Value) -> ClientResult<String> {
    Ok(match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Int(i) => i.to_string(),
        Value::Float(f) => format!("{:?}", f),
        Value::String(s) => quote_string(s),
        Value::List(items) => {
            let items = items
                .iter()
                .map(stringify_param)
                .collect::<ClientResult<Vec<_>>>()?;
            format!("[{}]", items.join(","))
        }
        Value::Map(map) => {
            let entries = map
                .iter()
                .map(|(k, v)| Ok(format!("{}:{}", k, stringify_param(v)?)))
                .collect::<ClientResult<Vec<_>>>()?;
            format!("{{{}}}", entries.join(","))
        }
        Value::Point(point) => point.to_string(),
        Value::Node(_) | Value::Edge(_) | Value::Path(_) => {
            return Err(ClientError::InvalidParameter(format!(
                "{} 不能作为查询参数",
                value.type_name()
            )))
        }
    })
}

/// 构造参数头，没有参数时返回空字符串
pub fn build_params_header(params: &ValueMap) -> ClientResult<String> {
    if params.is_empty() {
        return Ok(String::new());
    }
    let mut header = String::from("CYPHER ");
    for (key, value) in params.iter() {
        header.push_str(key);
        header.push('=');
        header.push_str(&stringify_param(value)?);
        header.push(' ');
    }
    Ok(header)
}
