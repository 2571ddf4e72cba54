//! 传输协作方
//!
//! 客户端只需要一个能力：发送命令并取回原始回复。连接的建立、复用、
//! 认证与超时都属于传输层，这里不做任何假设

use async_trait::async_trait;
use std::sync::Arc;

use crate::core::error::TransportError;
use crate::protocol::RawReply;

/// 阻塞式传输，调用线程等待回复
pub trait Transport: Send + Sync {
    fn execute(&self, command: &str, args: &[String]) -> Result<RawReply, TransportError>;
}

/// 可挂起的传输，等待回复时让出当前任务
#[async_trait]
pub trait AsyncTransport: Send + Sync {
    async fn execute(&self, command: &str, args: &[String]) -> Result<RawReply, TransportError>;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn execute(&self, command: &str, args: &[String]) -> Result<RawReply, TransportError> {
        (**self).execute(command, args)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn execute(&self, command: &str, args: &[String]) -> Result<RawReply, TransportError> {
        (**self).execute(command, args)
    }
}

#[async_trait]
impl<T: AsyncTransport + ?Sized> AsyncTransport for Arc<T> {
    async fn execute(&self, command: &str, args: &[String]) -> Result<RawReply, TransportError> {
        (**self).execute(command, args).await
    }
}

#[async_trait]
impl<T: AsyncTransport + ?Sized> AsyncTransport for Box<T> {
    async fn execute(&self, command: &str, args: &[String]) -> Result<RawReply, TransportError> {
        (**self).execute(command, args).await
    }
}
