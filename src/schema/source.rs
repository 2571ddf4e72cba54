//! 元数据来源
//!
//! 缓存刷新时需要向服务端拉取某一类元数据的完整列表。
//! 同步与异步两种调用方式只在这一步不同，因此分别抽象为两个能力

use async_trait::async_trait;

use super::category::SchemaCategory;
use crate::core::error::ClientResult;

/// 阻塞式元数据来源
pub trait SchemaSource {
    /// 拉取该类别当前的完整名称列表（不是增量）
    fn fetch_names(&self, category: SchemaCategory) -> ClientResult<Vec<String>>;
}

/// 可挂起的元数据来源
#[async_trait]
pub trait AsyncSchemaSource: Send + Sync {
    async fn fetch_names(&self, category: SchemaCategory) -> ClientResult<Vec<String>>;
}
