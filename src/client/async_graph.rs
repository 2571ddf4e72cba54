//! 可挂起的图句柄
//!
//! 与 `Graph` 共用解码、刷新规划和结果组装，只有发送命令和执行刷新
//! 发生在挂起点上；刷新计划中的多个类别并发拉取

use async_trait::async_trait;
use std::sync::Arc;

use super::pipeline::{check_status, Decoded, GraphCore, QueryOptions};
use super::transport::AsyncTransport;
use crate::config::ClientConfig;
use crate::core::error::{ClientError, ClientResult};
use crate::graph::QueryResult;
use crate::protocol::decode_listing;
use crate::schema::{AsyncSchemaSource, MetadataCache, RefreshPlan, SchemaCategory};

pub struct AsyncGraph<T> {
    core: GraphCore,
    transport: T,
}

impl<T: AsyncTransport> AsyncGraph<T> {
    pub fn new(transport: T, name: impl Into<String>) -> Self {
        Self::with_config(transport, &ClientConfig::default().with_graph(name))
    }

    pub fn with_config(transport: T, config: &ClientConfig) -> Self {
        Self {
            core: GraphCore::new(config.graph.clone(), config.commands.clone()),
            transport,
        }
    }

    pub fn with_cache(mut self, cache: Arc<MetadataCache>) -> Self {
        self.core.cache = cache;
        self
    }

    pub fn name(&self) -> &str {
        &self.core.name
    }

    pub fn cache(&self) -> &Arc<MetadataCache> {
        &self.core.cache
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub async fn query(&self, query: &str) -> ClientResult<QueryResult> {
        self.query_with(query, &QueryOptions::new()).await
    }

    pub async fn ro_query(&self, query: &str) -> ClientResult<QueryResult> {
        self.query_with(query, &QueryOptions::new().read_only(true))
            .await
    }

    /// 执行查询，版本过期的处理与 `Graph::query_with` 相同
    ///
    /// 任务在挂起点被取消时，不会向调用方暴露部分结果
    pub async fn query_with(
        &self,
        query: &str,
        options: &QueryOptions,
    ) -> ClientResult<QueryResult> {
        let (command, args) = self.core.query_command(query, options)?;
        let reply = self.transport.execute(&command, &args).await?;

        match self.core.decode(&reply)? {
            Decoded::Reply { raw, plan } => {
                self.core.cache.apply_async(self, &plan).await?;
                self.core.finish(&raw)
            }
            Decoded::VersionMismatch(version) => {
                self.core
                    .cache
                    .apply_async(self, &RefreshPlan::full(version))
                    .await?;
                Err(ClientError::SchemaVersionMismatch(version))
            }
        }
    }

    pub async fn call_procedure(
        &self,
        procedure: &str,
        args: &[&str],
    ) -> ClientResult<QueryResult> {
        self.ro_query(&GraphCore::procedure_query(procedure, args))
            .await
    }

    pub async fn labels(&self) -> ClientResult<Vec<String>> {
        self.fetch_names(SchemaCategory::Label).await
    }

    pub async fn relationship_types(&self) -> ClientResult<Vec<String>> {
        self.fetch_names(SchemaCategory::RelationshipType).await
    }

    pub async fn property_keys(&self) -> ClientResult<Vec<String>> {
        self.fetch_names(SchemaCategory::PropertyKey).await
    }

    pub async fn delete(&self) -> ClientResult<()> {
        self.core.cache.clear();
        let (command, args) = self.core.delete_command();
        let reply = self.transport.execute(&command, &args).await?;
        check_status(&reply)
    }
}

#[async_trait]
impl<T: AsyncTransport> AsyncSchemaSource for AsyncGraph<T> {
    async fn fetch_names(&self, category: SchemaCategory) -> ClientResult<Vec<String>> {
        let (command, args) = self.core.listing_command(category);
        let reply = self.transport.execute(&command, &args).await?;
        decode_listing(&reply)
    }
}
