//! GraphDB Client - 图数据库查询协议的客户端解码器
//!
//! 把服务端紧凑的、带类型标签的查询回复转换为可导航的图结果
//! （节点、边、路径、标量与嵌套集合），并维护把标签、关系类型、
//! 属性键的整数 id 翻译为名称的本地元数据缓存。
//!
//! 连接管理由调用方实现的 [`client::Transport`] / [`client::AsyncTransport`] 提供。

pub mod client;
pub mod config;
pub mod core;
pub mod graph;
pub mod protocol;
pub mod schema;
pub mod utils;

pub use crate::client::{AsyncGraph, AsyncTransport, Graph, QueryOptions, Transport};
pub use crate::config::ClientConfig;
pub use crate::core::{ClientError, ClientResult, Edge, Node, Path, Value};
pub use crate::graph::{QueryResult, QueryStatistics};
pub use crate::schema::{MetadataCache, SchemaCategory};
