//! 统一错误处理系统 for GraphDB Client
//!
//! ## 设计理念
//!
//! 1. **按层划分**：
//!    - 解码错误（`DecodeError`）只描述线路结构问题，携带出错位置
//!    - 传输错误（`TransportError`）由传输层产生，客户端原样透传
//!
//! 2. **统一接口**：`ClientResult<T>` 提供统一的返回类型，简化错误传播
//!
//! 3. **不重试**：解码与解析错误不会在客户端内部自动重试，
//!    是否重新发起查询由调用方决定

use thiserror::Error;

pub mod decode;
pub mod transport;

pub use decode::{DecodeError, DecodeResult};
pub use transport::TransportError;

use crate::schema::SchemaCategory;

/// 客户端统一错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClientError {
    /// 回复结构违反类型标签约定的固定元数，不可重试
    #[error("回复格式错误: {0}")]
    MalformedReply(#[from] DecodeError),

    /// 在本次查询允许的唯一一次刷新之后，标识符仍无法解析
    #[error("未知的{category}标识符 {id}（服务端仅报告了 {known} 个）")]
    UnknownIdentifier {
        category: SchemaCategory,
        id: i64,
        known: usize,
    },

    /// 结果表头中不存在该列名
    #[error("不存在的列: {0}")]
    NoSuchColumn(String),

    /// 服务端拒绝了查询，因为客户端持有的模式版本已过期
    #[error("模式版本不匹配，服务端版本: {0}")]
    SchemaVersionMismatch(i64),

    /// 服务端返回的错误回复
    #[error("服务端错误: {0}")]
    Server(String),

    #[error("传输错误: {0}")]
    Transport(#[from] TransportError),

    /// 无法作为查询参数发送的值
    #[error("无效的查询参数: {0}")]
    InvalidParameter(String),

    #[error("配置错误: {0}")]
    Config(String),
}

/// 统一的结果类型
pub type ClientResult<T> = Result<T, ClientError>;

impl ClientError {
    /// 是否属于协议层面的致命错误（回复格式或标识符不一致）
    pub fn is_protocol_error(&self) -> bool {
        matches!(
            self,
            ClientError::MalformedReply(_) | ClientError::UnknownIdentifier { .. }
        )
    }

    pub fn unknown_identifier(category: SchemaCategory, id: i64, known: usize) -> Self {
        ClientError::UnknownIdentifier {
            category,
            id,
            known,
        }
    }
}

impl From<toml::de::Error> for ClientError {
    fn from(err: toml::de::Error) -> Self {
        ClientError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for ClientError {
    fn from(err: toml::ser::Error) -> Self {
        ClientError::Config(err.to_string())
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::Config(err.to_string())
    }
}
