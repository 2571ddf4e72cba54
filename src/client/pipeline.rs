//! 同步与异步句柄共享的查询流程
//!
//! 一次查询分为三步：解码回复并规划刷新、执行刷新、用刷新后的快照组装结果。
//! 第一步和第三步是纯计算，放在这里；只有第二步以及发送命令本身
//! 需要区分阻塞调用和挂起调用，由两种句柄各自完成。

use log::{debug, warn};
use std::sync::Arc;

use super::params::{build_params_header, quote_string};
use crate::config::CommandConfig;
use crate::core::error::{ClientError, ClientResult};
use crate::core::value::{Value, ValueMap};
use crate::graph::{assemble, QueryResult};
use crate::protocol::{decode_query_reply, RawQueryReply, RawReply};
use crate::schema::{MetadataCache, RefreshPlan, SchemaCategory, SchemaDemand};

/// 单次查询的可选项
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryOptions {
    params: ValueMap,
    timeout_ms: Option<u64>,
    read_only: bool,
}

impl QueryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(name, value.into());
        self
    }

    pub fn params(mut self, params: ValueMap) -> Self {
        self.params = params;
        self
    }

    /// 服务端执行超时（毫秒），由服务端强制执行
    pub fn timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }
}

/// 解码后的查询回复
#[derive(Debug)]
pub(crate) enum Decoded {
    Reply {
        raw: RawQueryReply,
        plan: RefreshPlan,
    },
    /// 服务端因模式版本过期拒绝了查询
    VersionMismatch(i64),
}

/// 图句柄中与调用方式无关的部分
#[derive(Debug, Clone)]
pub(crate) struct GraphCore {
    pub name: String,
    pub commands: CommandConfig,
    pub cache: Arc<MetadataCache>,
}

impl GraphCore {
    pub fn new(name: String, commands: CommandConfig) -> Self {
        Self {
            name,
            commands,
            cache: Arc::new(MetadataCache::new()),
        }
    }

    pub fn query_command(
        &self,
        query: &str,
        options: &QueryOptions,
    ) -> ClientResult<(String, Vec<String>)> {
        let command = if options.read_only {
            &self.commands.ro_query
        } else {
            &self.commands.query
        };
        let text = format!("{}{}", build_params_header(&options.params)?, query);

        let mut args = vec![self.name.clone(), text, self.commands.compact_flag.clone()];
        if let Some(timeout) = options.timeout_ms {
            args.push(self.commands.timeout_flag.clone());
            args.push(timeout.to_string());
        }
        Ok((command.clone(), args))
    }

    pub fn procedure_query(procedure: &str, args: &[&str]) -> String {
        let args: Vec<String> = args.iter().map(|arg| quote_string(arg)).collect();
        format!("CALL {}({})", procedure, args.join(","))
    }

    /// 拉取某一类元数据的命令，直接发送而不经过查询流程，避免刷新时再次触发刷新
    pub fn listing_command(&self, category: SchemaCategory) -> (String, Vec<String>) {
        let procedure = match category {
            SchemaCategory::Label => &self.commands.labels_procedure,
            SchemaCategory::RelationshipType => &self.commands.relationship_types_procedure,
            SchemaCategory::PropertyKey => &self.commands.property_keys_procedure,
        };
        (
            self.commands.ro_query.clone(),
            vec![
                self.name.clone(),
                Self::procedure_query(procedure, &[]),
                self.commands.compact_flag.clone(),
            ],
        )
    }

    pub fn delete_command(&self) -> (String, Vec<String>) {
        (self.commands.delete.clone(), vec![self.name.clone()])
    }

    pub fn decode(&self, reply: &RawReply) -> ClientResult<Decoded> {
        let raw = match decode_query_reply(reply) {
            Ok(raw) => raw,
            Err(ClientError::SchemaVersionMismatch(version)) => {
                warn!(
                    "图 {} 的模式版本已过期: 本地 {}, 服务端 {}",
                    self.name,
                    self.cache.version(),
                    version
                );
                return Ok(Decoded::VersionMismatch(version));
            }
            Err(err) => return Err(err),
        };

        let demand = SchemaDemand::from_rows(&raw.rows);
        let plan = RefreshPlan::build(&self.cache.snapshot(), &demand, raw.schema_version());
        if !plan.is_empty() {
            debug!(
                "图 {} 需要刷新元数据: {:?}",
                self.name,
                plan.categories().collect::<Vec<_>>()
            );
        }
        Ok(Decoded::Reply { raw, plan })
    }

    pub fn finish(&self, raw: &RawQueryReply) -> ClientResult<QueryResult> {
        let result = assemble(raw, &self.cache.snapshot())?;
        debug!(
            "图 {} 查询完成: {} 列, {} 行",
            self.name,
            result.columns().len(),
            result.len()
        );
        Ok(result)
    }
}

/// 非查询命令（如删除图）的回复只需要检查是否为错误
pub(crate) fn check_status(reply: &RawReply) -> ClientResult<()> {
    match reply.as_error() {
        Some(message) => Err(ClientError::Server(message.to_string())),
        None => Ok(()),
    }
}
