//! 传输层错误类型
//!
//! 由传输协作方产生，客户端不做任何掩盖，原样透传给发起查询的调用方

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransportError {
    #[error("连接错误: {0}")]
    Connection(String),

    #[error("IO错误: {0}")]
    Io(String),

    #[error("请求超时")]
    Timeout,

    #[error("连接已关闭")]
    Closed,

    #[error("{0}")]
    Other(String),
}

impl From<std::io::Error> for TransportError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::TimedOut => TransportError::Timeout,
            std::io::ErrorKind::ConnectionRefused
            | std::io::ErrorKind::ConnectionReset
            | std::io::ErrorKind::ConnectionAborted => TransportError::Connection(err.to_string()),
            _ => TransportError::Io(err.to_string()),
        }
    }
}
