//! 带类型标签的值解码器
//!
//! 纯结构化、递归地把传输层回复转换为 `RawValue` 树：
//! 类型标签决定载荷的解释方式，解码器从不做 id 到名称的解析，
//! 因此不持有任何状态，可以直接针对字面量夹具测试

use log::{debug, warn};

use super::raw_value::{ColumnType, RawEdge, RawNode, RawPath, RawValue, ValueTag};
use super::reply::RawReply;
use crate::core::error::{ClientError, ClientResult, DecodeError, DecodeResult};

/// 统计信息中携带模式版本的条目名
pub const SCHEMA_VERSION_STAT: &str = "Schema version";

/// 服务端因模式版本过期拒绝查询时的错误信息
pub const VERSION_MISMATCH: &str = "version mismatch";

/// 结果表头中的一列
#[derive(Debug, Clone, PartialEq)]
pub struct RawColumn {
    pub column_type: ColumnType,
    pub name: String,
}

/// 查询回复 `[header, rows, statistics]` 解码后的结构
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawQueryReply {
    pub header: Vec<RawColumn>,
    pub rows: Vec<Vec<RawValue>>,
    pub statistics: Vec<String>,
}

impl RawQueryReply {
    /// 统计信息中报告的模式版本；没有该条目时返回 `None`
    pub fn schema_version(&self) -> Option<i64> {
        self.statistics.iter().find_map(|line| {
            let (key, value) = line.split_once(':')?;
            if key.trim() != SCHEMA_VERSION_STAT {
                return None;
            }
            value.split_whitespace().next()?.parse().ok()
        })
    }
}

/// 解码一次查询命令的完整回复
///
/// 错误回复会被转换为 `Server` 或 `SchemaVersionMismatch`，
/// 结构违例转换为 `MalformedReply`
pub fn decode_query_reply(reply: &RawReply) -> ClientResult<RawQueryReply> {
    let items = match reply {
        RawReply::Array(items) => items,
        RawReply::Error(message) => return Err(ClientError::Server(message.clone())),
        other => return Err(DecodeError::unexpected("查询回复数组", other.kind()).into()),
    };

    if let Some(RawReply::Error(message)) = items.first() {
        if message.trim().eq_ignore_ascii_case(VERSION_MISMATCH) {
            if let Some(version) = items.get(1).and_then(|v| integer_of(v).ok()) {
                return Err(ClientError::SchemaVersionMismatch(version));
            }
        }
        return Err(ClientError::Server(message.clone()));
    }

    // 执行期错误出现在部分结果之后
    if let Some(RawReply::Error(message)) = items.last() {
        return Err(ClientError::Server(message.clone()));
    }

    let decoded = match items.as_slice() {
        [statistics] => RawQueryReply {
            header: Vec::new(),
            rows: Vec::new(),
            statistics: decode_statistics(statistics).map_err(|e| e.within("statistics"))?,
        },
        [header, rows, statistics] => {
            let header = decode_header(header).map_err(|e| e.within("header"))?;
            let rows = decode_rows(rows, header.len()).map_err(|e| e.within("rows"))?;
            let statistics = decode_statistics(statistics).map_err(|e| e.within("statistics"))?;
            RawQueryReply {
                header,
                rows,
                statistics,
            }
        }
        other => return Err(DecodeError::arity("查询回复", 3, other.len()).into()),
    };

    debug!(
        "解码查询回复: {} 列, {} 行, {} 条统计",
        decoded.header.len(),
        decoded.rows.len(),
        decoded.statistics.len()
    );
    Ok(decoded)
}

fn decode_header(reply: &RawReply) -> DecodeResult<Vec<RawColumn>> {
    let columns = expect_array(reply, "表头数组")?;
    columns
        .iter()
        .enumerate()
        .map(|(i, column)| decode_column(column).map_err(|e| e.within(format!("[{}]", i))))
        .collect()
}

fn decode_column(reply: &RawReply) -> DecodeResult<RawColumn> {
    let pair = expect_arity(reply, "列描述", 2)?;
    let column_type = ColumnType::try_from(integer_of(&pair[0])?)?;
    let name = string_of(&pair[1])?;
    Ok(RawColumn { column_type, name })
}

fn decode_rows(reply: &RawReply, column_count: usize) -> DecodeResult<Vec<Vec<RawValue>>> {
    let rows = expect_array(reply, "结果行数组")?;
    // 空表头时服务端不会返回有意义的行
    if column_count == 0 {
        return Ok(Vec::new());
    }
    rows.iter()
        .enumerate()
        .map(|(r, row)| {
            decode_row(row, column_count).map_err(|e| e.within(format!("[{}]", r)))
        })
        .collect()
}

fn decode_row(reply: &RawReply, column_count: usize) -> DecodeResult<Vec<RawValue>> {
    let cells = expect_arity(reply, "结果行", column_count)?;
    cells
        .iter()
        .enumerate()
        .map(|(c, cell)| decode_value(cell).map_err(|e| e.within(format!("[{}]", c))))
        .collect()
}

fn decode_statistics(reply: &RawReply) -> DecodeResult<Vec<String>> {
    let lines = expect_array(reply, "统计信息数组")?;
    lines
        .iter()
        .enumerate()
        .map(|(i, line)| string_of(line).map_err(|e| e.within(format!("[{}]", i))))
        .collect()
}

/// 解码一个 `[typeTag, payload]` 值
pub fn decode_value(reply: &RawReply) -> DecodeResult<RawValue> {
    let pair = expect_arity(reply, "带标签的值", 2)?;
    let tag = ValueTag::try_from(integer_of(&pair[0])?)?;
    decode_payload(tag, &pair[1])
}

/// 按类型标签解释载荷
pub fn decode_payload(tag: ValueTag, payload: &RawReply) -> DecodeResult<RawValue> {
    match tag {
        ValueTag::Unknown => {
            warn!("回复中出现未知类型的值，按 null 处理: {}", payload);
            Ok(RawValue::Null)
        }
        ValueTag::Null => Ok(RawValue::Null),
        ValueTag::String => Ok(RawValue::String(string_of(payload)?)),
        ValueTag::Integer => Ok(RawValue::Int(integer_of(payload)?)),
        ValueTag::Boolean => Ok(RawValue::Bool(bool_of(payload)?)),
        ValueTag::Double => Ok(RawValue::Double(double_of(payload)?)),
        ValueTag::Array => {
            let items = expect_array(payload, "数组载荷")?;
            let values = items
                .iter()
                .enumerate()
                .map(|(i, item)| decode_value(item).map_err(|e| e.within(format!("[{}]", i))))
                .collect::<DecodeResult<Vec<_>>>()?;
            Ok(RawValue::Array(values))
        }
        ValueTag::Map => decode_map(payload).map(RawValue::Map),
        ValueTag::Point => {
            let coords = expect_arity(payload, "点", 2)?;
            Ok(RawValue::Point {
                lat: double_of(&coords[0]).map_err(|e| e.within("latitude"))?,
                lon: double_of(&coords[1]).map_err(|e| e.within("longitude"))?,
            })
        }
        ValueTag::Node => decode_node(payload).map(RawValue::Node),
        ValueTag::Edge => decode_edge(payload).map(RawValue::Edge),
        ValueTag::Path => decode_path(payload).map(RawValue::Path),
    }
}

fn decode_map(payload: &RawReply) -> DecodeResult<Vec<(RawValue, RawValue)>> {
    let flat = expect_array(payload, "映射载荷")?;
    if flat.len() % 2 != 0 {
        return Err(DecodeError::new(format!(
            "映射载荷必须由键值对组成，实际有 {} 个元素",
            flat.len()
        )));
    }
    flat.chunks_exact(2)
        .enumerate()
        .map(|(i, pair)| {
            let key = string_of(&pair[0]).map_err(|e| e.within(format!("[{}]", i * 2)))?;
            let value = decode_value(&pair[1]).map_err(|e| e.within(format!("[{}]", i * 2 + 1)))?;
            Ok((RawValue::String(key), value))
        })
        .collect()
}

/// 节点载荷: `[id, [labelId...], [[propKeyId, typeTag, payload]...]]`
fn decode_node(payload: &RawReply) -> DecodeResult<RawNode> {
    let fields = expect_arity(payload, "节点", 3)?;
    let id = integer_of(&fields[0]).map_err(|e| e.within("id"))?;
    let label_ids = integer_list(&fields[1]).map_err(|e| e.within("labels"))?;
    let properties = decode_properties(&fields[2]).map_err(|e| e.within("properties"))?;
    Ok(RawNode {
        id,
        label_ids,
        properties,
    })
}

/// 边载荷: `[id, typeId, srcId, dstId, [[propKeyId, typeTag, payload]...]]`
fn decode_edge(payload: &RawReply) -> DecodeResult<RawEdge> {
    let fields = expect_arity(payload, "边", 5)?;
    Ok(RawEdge {
        id: integer_of(&fields[0]).map_err(|e| e.within("id"))?,
        type_id: integer_of(&fields[1]).map_err(|e| e.within("type"))?,
        src_id: integer_of(&fields[2]).map_err(|e| e.within("src"))?,
        dst_id: integer_of(&fields[3]).map_err(|e| e.within("dst"))?,
        properties: decode_properties(&fields[4]).map_err(|e| e.within("properties"))?,
    })
}

fn decode_properties(reply: &RawReply) -> DecodeResult<Vec<(i64, RawValue)>> {
    let entries = expect_array(reply, "属性列表")?;
    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            decode_property(entry).map_err(|e| e.within(format!("[{}]", i)))
        })
        .collect()
}

fn decode_property(reply: &RawReply) -> DecodeResult<(i64, RawValue)> {
    let triple = expect_arity(reply, "属性", 3)?;
    let key_id = integer_of(&triple[0])?;
    let tag = ValueTag::try_from(integer_of(&triple[1])?)?;
    let value = decode_payload(tag, &triple[2])?;
    Ok((key_id, value))
}

/// 路径载荷有两种形式：
/// - id 形式 `[[nodeId...], [edgeId...]]`
/// - 内联形式 `[[6, [node...]], [6, [edge...]]]`，每个元素都是完整的带标签实体
fn decode_path(payload: &RawReply) -> DecodeResult<RawPath> {
    let parts = expect_arity(payload, "路径", 2)?;
    if is_tagged_array(&parts[0]) {
        let nodes = decode_path_entities(&parts[0], |v| match v {
            RawValue::Node(node) => Some(node),
            _ => None,
        })
        .map_err(|e| e.within("nodes"))?;
        let edges = decode_path_entities(&parts[1], |v| match v {
            RawValue::Edge(edge) => Some(edge),
            _ => None,
        })
        .map_err(|e| e.within("edges"))?;
        RawPath::from_entities(nodes, edges)
    } else {
        let node_ids = integer_list(&parts[0]).map_err(|e| e.within("nodes"))?;
        let edge_ids = integer_list(&parts[1]).map_err(|e| e.within("edges"))?;
        RawPath::from_ids(node_ids, edge_ids)
    }
}

fn is_tagged_array(reply: &RawReply) -> bool {
    matches!(
        reply.as_array(),
        Some([tag, RawReply::Array(_)]) if integer_of(tag).ok() == Some(ValueTag::Array.code())
    )
}

fn decode_path_entities<T>(
    reply: &RawReply,
    pick: impl Fn(RawValue) -> Option<T>,
) -> DecodeResult<Vec<T>> {
    match decode_value(reply)? {
        RawValue::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(i, item)| {
                let tag = item.tag();
                pick(item).ok_or_else(|| {
                    DecodeError::new(format!("路径中出现了类型为 {:?} 的元素", tag))
                        .within(format!("[{}]", i))
                })
            })
            .collect(),
        other => Err(DecodeError::unexpected("数组", &format!("{:?}", other.tag()))),
    }
}

/// 解码元数据列表回复
///
/// 接受两种形式：扁平的字符串数组，或第 0 列为名称的紧凑查询回复
pub fn decode_listing(reply: &RawReply) -> ClientResult<Vec<String>> {
    if let Some(message) = reply.as_error() {
        return Err(ClientError::Server(message.to_string()));
    }
    let items = expect_array(reply, "元数据列表")?;
    if items.iter().all(|item| matches!(item, RawReply::String(_))) {
        return Ok(items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect());
    }

    let decoded = decode_query_reply(reply)?;
    decoded
        .rows
        .into_iter()
        .enumerate()
        .map(|(r, row)| match row.into_iter().next() {
            Some(RawValue::String(name)) => Ok(name),
            other => Err(ClientError::from(
                DecodeError::unexpected("字符串名称", &format!("{:?}", other.map(|v| v.tag())))
                    .within(format!("[{}]", r))
                    .within("rows"),
            )),
        })
        .collect()
}

/// 把值树重新编码为线路上的带标签形式，名称解析之前的结构原样保留
pub fn encode_value(value: &RawValue) -> RawReply {
    RawReply::array([
        RawReply::Integer(value.tag().code()),
        encode_payload(value),
    ])
}

fn encode_payload(value: &RawValue) -> RawReply {
    match value {
        RawValue::Null => RawReply::Nil,
        RawValue::Bool(b) => RawReply::String(b.to_string()),
        RawValue::Int(i) => RawReply::Integer(*i),
        RawValue::Double(d) => RawReply::Double(*d),
        RawValue::String(s) => RawReply::String(s.clone()),
        RawValue::Array(items) => RawReply::array(items.iter().map(encode_value)),
        RawValue::Map(entries) => RawReply::array(
            entries
                .iter()
                .flat_map(|(k, v)| [encode_payload(k), encode_value(v)]),
        ),
        RawValue::Point { lat, lon } => {
            RawReply::array([RawReply::Double(*lat), RawReply::Double(*lon)])
        }
        RawValue::Node(node) => encode_node(node),
        RawValue::Edge(edge) => encode_edge(edge),
        RawValue::Path(path) => {
            if path.is_inline() {
                let nodes = path
                    .inline_nodes()
                    .iter()
                    .map(|n| tagged(ValueTag::Node, encode_node(n)));
                let edges = path
                    .inline_edges()
                    .iter()
                    .map(|e| tagged(ValueTag::Edge, encode_edge(e)));
                RawReply::array([
                    tagged(ValueTag::Array, RawReply::array(nodes)),
                    tagged(ValueTag::Array, RawReply::array(edges)),
                ])
            } else {
                RawReply::array([
                    integers(path.node_ids()),
                    integers(path.edge_ids()),
                ])
            }
        }
    }
}

fn encode_node(node: &RawNode) -> RawReply {
    RawReply::array([
        RawReply::Integer(node.id),
        integers(&node.label_ids),
        encode_properties(&node.properties),
    ])
}

fn encode_edge(edge: &RawEdge) -> RawReply {
    RawReply::array([
        RawReply::Integer(edge.id),
        RawReply::Integer(edge.type_id),
        RawReply::Integer(edge.src_id),
        RawReply::Integer(edge.dst_id),
        encode_properties(&edge.properties),
    ])
}

fn encode_properties(properties: &[(i64, RawValue)]) -> RawReply {
    RawReply::array(properties.iter().map(|(key, value)| {
        RawReply::array([
            RawReply::Integer(*key),
            RawReply::Integer(value.tag().code()),
            encode_payload(value),
        ])
    }))
}

fn tagged(tag: ValueTag, payload: RawReply) -> RawReply {
    RawReply::array([RawReply::Integer(tag.code()), payload])
}

fn integers(ids: &[i64]) -> RawReply {
    RawReply::array(ids.iter().map(|id| RawReply::Integer(*id)))
}

// ==================== 标量读取 ====================

fn expect_array<'a>(reply: &'a RawReply, what: &str) -> DecodeResult<&'a [RawReply]> {
    reply
        .as_array()
        .ok_or_else(|| DecodeError::unexpected(what, reply.kind()))
}

fn expect_arity<'a>(reply: &'a RawReply, what: &str, arity: usize) -> DecodeResult<&'a [RawReply]> {
    let items = expect_array(reply, what)?;
    if items.len() != arity {
        return Err(DecodeError::arity(what, arity, items.len()));
    }
    Ok(items)
}

fn integer_of(reply: &RawReply) -> DecodeResult<i64> {
    match reply {
        RawReply::Integer(i) => Ok(*i),
        RawReply::String(s) => s
            .trim()
            .parse()
            .map_err(|_| DecodeError::unexpected("整数", &format!("\"{}\"", s))),
        other => Err(DecodeError::unexpected("整数", other.kind())),
    }
}

fn double_of(reply: &RawReply) -> DecodeResult<f64> {
    match reply {
        RawReply::Double(d) => Ok(*d),
        RawReply::Integer(i) => Ok(*i as f64),
        RawReply::String(s) => s
            .trim()
            .parse()
            .map_err(|_| DecodeError::unexpected("浮点数", &format!("\"{}\"", s))),
        other => Err(DecodeError::unexpected("浮点数", other.kind())),
    }
}

fn bool_of(reply: &RawReply) -> DecodeResult<bool> {
    match reply {
        RawReply::String(s) if s == "true" => Ok(true),
        RawReply::String(s) if s == "false" => Ok(false),
        RawReply::Integer(0) => Ok(false),
        RawReply::Integer(1) => Ok(true),
        other => Err(DecodeError::unexpected("布尔值", &other.to_string())),
    }
}

fn string_of(reply: &RawReply) -> DecodeResult<String> {
    match reply {
        RawReply::String(s) => Ok(s.clone()),
        RawReply::Integer(i) => Ok(i.to_string()),
        RawReply::Double(d) => Ok(d.to_string()),
        other => Err(DecodeError::unexpected("字符串", other.kind())),
    }
}

fn integer_list(reply: &RawReply) -> DecodeResult<Vec<i64>> {
    let items = expect_array(reply, "整数列表")?;
    items
        .iter()
        .enumerate()
        .map(|(i, item)| integer_of(item).map_err(|e| e.within(format!("[{}]", i))))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn reply(value: serde_json::Value) -> RawReply {
        RawReply::from(value)
    }

    #[test]
    fn test_decode_scalars() {
        assert_eq!(decode_value(&reply(json!([1, null]))), Ok(RawValue::Null));
        assert_eq!(
            decode_value(&reply(json!([2, "hi"]))),
            Ok(RawValue::String("hi".into()))
        );
        assert_eq!(decode_value(&reply(json!([3, 10]))), Ok(RawValue::Int(10)));
        assert_eq!(decode_value(&reply(json!([3, "-4"]))), Ok(RawValue::Int(-4)));
        assert_eq!(decode_value(&reply(json!([4, "true"]))), Ok(RawValue::Bool(true)));
        assert_eq!(decode_value(&reply(json!([4, 0]))), Ok(RawValue::Bool(false)));
        assert_eq!(
            decode_value(&reply(json!([5, "3.25"]))),
            Ok(RawValue::Double(3.25))
        );
        assert_eq!(decode_value(&reply(json!([5, 2]))), Ok(RawValue::Double(2.0)));
    }

    #[test]
    fn test_unknown_tag_zero_is_null() {
        assert_eq!(decode_value(&reply(json!([0, "???"]))), Ok(RawValue::Null));
    }

    #[test]
    fn test_unrecognized_tag_is_malformed() {
        let err = decode_value(&reply(json!([42, 1]))).unwrap_err();
        assert!(err.message().contains("42"));
    }

    #[test]
    fn test_boolean_rejects_other_strings() {
        assert!(decode_value(&reply(json!([4, "yes"]))).is_err());
    }

    #[test]
    fn test_decode_map_preserves_order() {
        let value = decode_value(&reply(json!([10, ["b", [3, 1], "a", [2, "x"]]]))).unwrap();
        assert_eq!(
            value,
            RawValue::Map(vec![
                (RawValue::String("b".into()), RawValue::Int(1)),
                (RawValue::String("a".into()), RawValue::String("x".into())),
            ])
        );
    }

    #[test]
    fn test_decode_map_odd_length_is_malformed() {
        assert!(decode_value(&reply(json!([10, ["a", [3, 1], "b"]]))).is_err());
    }

    #[test]
    fn test_decode_point() {
        let value = decode_value(&reply(json!([11, ["32.07", "34.78"]]))).unwrap();
        assert_eq!(value, RawValue::Point { lat: 32.07, lon: 34.78 });
        assert!(decode_value(&reply(json!([11, [1.0]]))).is_err());
    }

    #[test]
    fn test_decode_node() {
        let value = decode_value(&reply(json!([8, [5, [0, 2], [[1, 2, "Alice"], [0, 3, 33]]]])))
            .unwrap();
        assert_eq!(
            value,
            RawValue::Node(RawNode {
                id: 5,
                label_ids: vec![0, 2],
                properties: vec![
                    (1, RawValue::String("Alice".into())),
                    (0, RawValue::Int(33)),
                ],
            })
        );
    }

    #[test]
    fn test_decode_node_wrong_arity_reports_location() {
        let row = reply(json!([[[8, [5, [0]]]]]));
        let err = decode_rows(&row, 1).unwrap_err().within("rows");
        assert_eq!(err.location(), "rows[0][0]");
    }

    #[test]
    fn test_decode_edge() {
        let value = decode_value(&reply(json!([7, [12, 1, 5, 7, [[2, 5, "0.5"]]]]))).unwrap();
        assert_eq!(
            value,
            RawValue::Edge(RawEdge {
                id: 12,
                type_id: 1,
                src_id: 5,
                dst_id: 7,
                properties: vec![(2, RawValue::Double(0.5))],
            })
        );
    }

    #[test]
    fn test_decode_path_id_form() {
        let value = decode_value(&reply(json!([9, [[5, 7], [12]]]))).unwrap();
        match value {
            RawValue::Path(path) => {
                assert_eq!(path.node_ids(), &[5, 7]);
                assert_eq!(path.edge_ids(), &[12]);
                assert!(!path.is_inline());
            }
            other => panic!("expected path, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_path_violating_invariant_is_malformed() {
        assert!(decode_value(&reply(json!([9, [[5, 7, 9], [12]]]))).is_err());
    }

    #[test]
    fn test_decode_path_inline_form() {
        let payload = json!([9, [
            [6, [[8, [5, [], []]], [8, [7, [], []]]]],
            [6, [[7, [12, 0, 5, 7, []]]]]
        ]]);
        match decode_value(&reply(payload)).unwrap() {
            RawValue::Path(path) => {
                assert!(path.is_inline());
                assert_eq!(path.node_ids(), &[5, 7]);
                assert_eq!(path.inline_edges()[0].type_id, 0);
            }
            other => panic!("expected path, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_path_inline_rejects_wrong_entity_kind() {
        let payload = json!([9, [[6, [[7, [12, 0, 5, 7, []]]]], [6, []]]]);
        assert!(decode_value(&reply(payload)).is_err());
    }

    #[test]
    fn test_query_reply_shape() {
        let decoded = decode_query_reply(&reply(json!([
            [[1, "count"]],
            [[[3, 10]]],
            ["Schema version: 4", "Query internal execution time: 0.1 milliseconds"]
        ])))
        .unwrap();
        assert_eq!(decoded.header[0].name, "count");
        assert_eq!(decoded.header[0].column_type, ColumnType::Scalar);
        assert_eq!(decoded.rows, vec![vec![RawValue::Int(10)]]);
        assert_eq!(decoded.schema_version(), Some(4));
    }

    #[test]
    fn test_query_reply_statistics_only() {
        let decoded = decode_query_reply(&reply(json!([["Nodes created: 2"]]))).unwrap();
        assert!(decoded.header.is_empty());
        assert!(decoded.rows.is_empty());
        assert_eq!(decoded.statistics, vec!["Nodes created: 2".to_string()]);
        assert_eq!(decoded.schema_version(), None);
    }

    #[test]
    fn test_query_reply_row_width_must_match_header() {
        let result = decode_query_reply(&reply(json!([
            [[1, "a"], [1, "b"]],
            [[[3, 1]]],
            []
        ])));
        assert!(matches!(result, Err(ClientError::MalformedReply(_))));
    }

    #[test]
    fn test_query_reply_errors() {
        let server = RawReply::array([RawReply::Error("syntax error".into())]);
        assert_eq!(
            decode_query_reply(&server),
            Err(ClientError::Server("syntax error".into()))
        );

        let runtime = RawReply::array([
            RawReply::from(json!([[1, "a"]])),
            RawReply::from(json!([])),
            RawReply::Error("division by zero".into()),
        ]);
        assert_eq!(
            decode_query_reply(&runtime),
            Err(ClientError::Server("division by zero".into()))
        );

        let mismatch = RawReply::array([
            RawReply::Error("version mismatch".into()),
            RawReply::Integer(7),
        ]);
        assert_eq!(
            decode_query_reply(&mismatch),
            Err(ClientError::SchemaVersionMismatch(7))
        );
    }

    #[test]
    fn test_query_reply_wrong_arity() {
        let result = decode_query_reply(&reply(json!([[], []])));
        assert!(matches!(result, Err(ClientError::MalformedReply(_))));
    }

    #[test]
    fn test_decode_listing_forms() {
        assert_eq!(
            decode_listing(&reply(json!(["Person", "City"]))).unwrap(),
            vec!["Person".to_string(), "City".to_string()]
        );
        assert_eq!(
            decode_listing(&reply(json!([
                [[1, "label"]],
                [[[2, "Person"]], [[2, "City"]]],
                ["Cached execution: 1"]
            ])))
            .unwrap(),
            vec!["Person".to_string(), "City".to_string()]
        );
        assert!(decode_listing(&reply(json!([]))).unwrap().is_empty());
    }

    #[test]
    fn test_encode_reproduces_wire_shape() {
        let wire = reply(json!([6, [
            [8, [5, [0], [[1, 2, "Alice"]]]],
            [7, [12, 1, 5, 7, []]],
            [9, [[5, 7], [12]]],
            [11, [1.5, 2.5]],
            [10, ["k", [3, 1]]]
        ]]));
        let decoded = decode_value(&wire).unwrap();
        assert_eq!(encode_value(&decoded), wire);
    }
}
