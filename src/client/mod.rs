//! 图客户端模块
//!
//! 提供阻塞式与可挂起两种图句柄，二者共用同一套解码与解析逻辑，
//! 只在调用传输层的方式上不同

pub mod async_graph;
pub mod graph;
pub mod params;
pub mod pipeline;
pub mod transport;

pub use async_graph::AsyncGraph;
pub use graph::Graph;
pub use params::{build_params_header, quote_string, stringify_param};
pub use pipeline::QueryOptions;
pub use transport::{AsyncTransport, Transport};
