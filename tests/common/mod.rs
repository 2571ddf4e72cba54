//! 集成测试共享工具模块
//!
//! 提供脚本化的模拟传输层和回复夹具，供所有集成测试使用

#![allow(dead_code)]

pub mod data_fixtures;

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};

use graphdb_client::client::{AsyncTransport, Transport};
use graphdb_client::config::CommandConfig;
use graphdb_client::core::TransportError;
use graphdb_client::protocol::RawReply;
use graphdb_client::schema::SchemaCategory;

/// 记录下来的一次命令调用
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub command: String,
    pub args: Vec<String>,
}

#[derive(Default)]
struct MockState {
    replies: VecDeque<RawReply>,
    /// 最后一个回复会被重复使用
    sticky_reply: Option<RawReply>,
    listings: HashMap<SchemaCategory, VecDeque<RawReply>>,
    listing_errors: HashMap<SchemaCategory, TransportError>,
    calls: Vec<Call>,
}

/// 按脚本返回回复的传输层，同时实现阻塞与异步两种接口
///
/// 元数据列表请求按过程名识别；同一类别脚本里的最后一个列表会被重复返回
#[derive(Default)]
pub struct MockTransport {
    commands: CommandConfig,
    state: Mutex<MockState>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// 下一次查询命令的回复
    pub fn push_reply(&self, reply: impl Into<RawReply>) -> &Self {
        self.state.lock().replies.push_back(reply.into());
        self
    }

    /// 每次查询都返回同一个回复
    pub fn always_reply(&self, reply: impl Into<RawReply>) -> &Self {
        self.state.lock().sticky_reply = Some(reply.into());
        self
    }

    /// 追加一个类别的列表回复（紧凑查询回复形式）
    pub fn push_listing(&self, category: SchemaCategory, names: &[&str]) -> &Self {
        self.push_listing_reply(category, data_fixtures::listing_reply(names))
    }

    pub fn push_listing_reply(&self, category: SchemaCategory, reply: impl Into<RawReply>) -> &Self {
        self.state
            .lock()
            .listings
            .entry(category)
            .or_default()
            .push_back(reply.into());
        self
    }

    pub fn fail_listing(&self, category: SchemaCategory, error: TransportError) -> &Self {
        self.state.lock().listing_errors.insert(category, error);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().calls.clone()
    }

    pub fn listing_calls(&self, category: SchemaCategory) -> usize {
        let procedure = self.procedure_call(category);
        self.state
            .lock()
            .calls
            .iter()
            .filter(|call| call.args.get(1) == Some(&procedure))
            .count()
    }

    pub fn total_listing_calls(&self) -> usize {
        SchemaCategory::ALL
            .iter()
            .map(|&category| self.listing_calls(category))
            .sum()
    }

    pub fn clear_calls(&self) {
        self.state.lock().calls.clear();
    }

    fn procedure_call(&self, category: SchemaCategory) -> String {
        let procedure = match category {
            SchemaCategory::Label => &self.commands.labels_procedure,
            SchemaCategory::RelationshipType => &self.commands.relationship_types_procedure,
            SchemaCategory::PropertyKey => &self.commands.property_keys_procedure,
        };
        format!("CALL {}()", procedure)
    }

    fn listing_category(&self, args: &[String]) -> Option<SchemaCategory> {
        let text = args.get(1)?;
        SchemaCategory::ALL
            .iter()
            .copied()
            .find(|&category| *text == self.procedure_call(category))
    }

    fn respond(&self, command: &str, args: &[String]) -> Result<RawReply, TransportError> {
        let category = self.listing_category(args);
        let mut state = self.state.lock();
        state.calls.push(Call {
            command: command.to_string(),
            args: args.to_vec(),
        });

        if let Some(category) = category {
            if let Some(error) = state.listing_errors.get(&category) {
                return Err(error.clone());
            }
            let queue = state.listings.entry(category).or_default();
            return Ok(match queue.len() {
                0 => data_fixtures::listing_reply(&[]),
                1 => queue[0].clone(),
                _ => queue.pop_front().unwrap_or(RawReply::Nil),
            });
        }

        if command == self.commands.delete {
            return Ok(RawReply::String("OK".to_string()));
        }

        match state.replies.pop_front() {
            Some(reply) => Ok(reply),
            None => state
                .sticky_reply
                .clone()
                .ok_or_else(|| TransportError::Other(format!("没有为 {} 准备回复", command))),
        }
    }
}

impl Transport for MockTransport {
    fn execute(&self, command: &str, args: &[String]) -> Result<RawReply, TransportError> {
        self.respond(command, args)
    }
}

#[async_trait]
impl AsyncTransport for MockTransport {
    async fn execute(&self, command: &str, args: &[String]) -> Result<RawReply, TransportError> {
        // 模拟网络往返中的挂起点
        tokio::task::yield_now().await;
        self.respond(command, args)
    }
}
