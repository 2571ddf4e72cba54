//! 测试数据生成模块
//!
//! 用 `serde_json::json!` 字面量拼出线路上的带标签值，再转换为 `RawReply`

use serde_json::{json, Value as Json};

use graphdb_client::protocol::RawReply;

pub const NULL: i64 = 1;
pub const STRING: i64 = 2;
pub const INTEGER: i64 = 3;
pub const BOOLEAN: i64 = 4;
pub const DOUBLE: i64 = 5;
pub const ARRAY: i64 = 6;
pub const EDGE: i64 = 7;
pub const NODE: i64 = 8;
pub const PATH: i64 = 9;
pub const MAP: i64 = 10;
pub const POINT: i64 = 11;

pub const COLUMN_SCALAR: i64 = 1;
pub const COLUMN_NODE: i64 = 2;
pub const COLUMN_RELATION: i64 = 3;

pub fn int(v: i64) -> Json {
    json!([INTEGER, v])
}

pub fn string(s: &str) -> Json {
    json!([STRING, s])
}

pub fn array(items: Vec<Json>) -> Json {
    json!([ARRAY, items])
}

/// 属性条目 `[keyId, tag, payload]`
pub fn prop(key_id: i64, tagged: Json) -> Json {
    json!([key_id, tagged[0], tagged[1]])
}

pub fn node_payload(id: i64, labels: &[i64], props: Vec<Json>) -> Json {
    json!([id, labels, props])
}

pub fn node(id: i64, labels: &[i64], props: Vec<Json>) -> Json {
    json!([NODE, node_payload(id, labels, props)])
}

pub fn edge_payload(id: i64, type_id: i64, src: i64, dst: i64, props: Vec<Json>) -> Json {
    json!([id, type_id, src, dst, props])
}

pub fn edge(id: i64, type_id: i64, src: i64, dst: i64, props: Vec<Json>) -> Json {
    json!([EDGE, edge_payload(id, type_id, src, dst, props)])
}

pub fn id_path(node_ids: &[i64], edge_ids: &[i64]) -> Json {
    json!([PATH, [node_ids, edge_ids]])
}

pub fn column(column_type: i64, name: &str) -> Json {
    json!([column_type, name])
}

/// `[header, rows, statistics]`
pub fn query_reply<S: AsRef<str>>(header: Vec<Json>, rows: Vec<Vec<Json>>, stats: &[S]) -> RawReply {
    let stats: Vec<&str> = stats.iter().map(|s| s.as_ref()).collect();
    RawReply::from(json!([header, rows, stats]))
}

pub fn version_stat(version: i64) -> String {
    format!("Schema version: {}", version)
}

/// 元数据过程的回复：一列名称
pub fn listing_reply(names: &[&str]) -> RawReply {
    let rows: Vec<Vec<Json>> = names.iter().map(|name| vec![string(name)]).collect();
    query_reply::<&str>(vec![column(COLUMN_SCALAR, "name")], rows, &[])
}

pub fn version_mismatch(version: i64) -> RawReply {
    RawReply::array([
        RawReply::Error("version mismatch".to_string()),
        RawReply::Integer(version),
    ])
}
