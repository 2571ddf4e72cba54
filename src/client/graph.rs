//! 阻塞式图句柄

use std::sync::Arc;

use super::pipeline::{check_status, Decoded, GraphCore, QueryOptions};
use super::transport::Transport;
use crate::config::ClientConfig;
use crate::core::error::{ClientError, ClientResult};
use crate::graph::QueryResult;
use crate::protocol::decode_listing;
use crate::schema::{MetadataCache, RefreshPlan, SchemaCategory, SchemaSource};

/// 某个图的句柄，持有该图的元数据缓存
///
/// 句柄可以在线程间共享，并发查询共用同一份缓存。
pub struct Graph<T> {
    core: GraphCore,
    transport: T,
}

impl<T: Transport> Graph<T> {
    pub fn new(transport: T, name: impl Into<String>) -> Self {
        Self::with_config(transport, &ClientConfig::default().with_graph(name))
    }

    pub fn with_config(transport: T, config: &ClientConfig) -> Self {
        Self {
            core: GraphCore::new(config.graph.clone(), config.commands.clone()),
            transport,
        }
    }

    /// 与同一个图的其他句柄共用元数据缓存
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

    pub fn query(&self, query: &str) -> ClientResult<QueryResult> {
        self.query_with(query, &QueryOptions::new())
    }

    pub fn ro_query(&self, query: &str) -> ClientResult<QueryResult> {
        self.query_with(query, &QueryOptions::new().read_only(true))
    }

    /// 执行查询
    ///
    /// 服务端报告模式版本过期时，先全量刷新缓存再返回 `SchemaVersionMismatch`，
    /// 是否重新发起查询由调用方决定
    pub fn query_with(&self, query: &str, options: &QueryOptions) -> ClientResult<QueryResult> {
        let (command, args) = self.core.query_command(query, options)?;
        let reply = self.transport.execute(&command, &args)?;

        match self.core.decode(&reply)? {
            Decoded::Reply { raw, plan } => {
                self.core.cache.apply(self, &plan)?;
                self.core.finish(&raw)
            }
            Decoded::VersionMismatch(version) => {
                self.core.cache.apply(self, &RefreshPlan::full(version))?;
                Err(ClientError::SchemaVersionMismatch(version))
            }
        }
    }

    /// 以只读方式调用存储过程，参数按字符串加引号
    pub fn call_procedure(&self, procedure: &str, args: &[&str]) -> ClientResult<QueryResult> {
        self.ro_query(&GraphCore::procedure_query(procedure, args))
    }

    pub fn labels(&self) -> ClientResult<Vec<String>> {
        self.fetch_names(SchemaCategory::Label)
    }

    pub fn relationship_types(&self) -> ClientResult<Vec<String>> {
        self.fetch_names(SchemaCategory::RelationshipType)
    }

    pub fn property_keys(&self) -> ClientResult<Vec<String>> {
        self.fetch_names(SchemaCategory::PropertyKey)
    }

    /// 删除整个图并清空本地元数据缓存
    pub fn delete(&self) -> ClientResult<()> {
        self.core.cache.clear();
        let (command, args) = self.core.delete_command();
        let reply = self.transport.execute(&command, &args)?;
        check_status(&reply)
    }
}

impl<T: Transport> SchemaSource for Graph<T> {
    fn fetch_names(&self, category: SchemaCategory) -> ClientResult<Vec<String>> {
        let (command, args) = self.core.listing_command(category);
        let reply = self.transport.execute(&command, &args)?;
        decode_listing(&reply)
    }
}
