//! 线路协议模块
//!
//! 包含传输层回复结构、未解析的值树以及带类型标签的值解码器

pub mod decoder;
pub mod raw_value;
pub mod reply;

pub use decoder::{
    decode_listing, decode_payload, decode_query_reply, decode_value, encode_value, RawColumn,
    RawQueryReply, SCHEMA_VERSION_STAT, VERSION_MISMATCH,
};
pub use raw_value::{ColumnType, RawEdge, RawEntity, RawNode, RawPath, RawValue, ValueTag};
pub use reply::RawReply;
