//! 图实体构建器
//!
//! 把解码得到的 `RawNode` / `RawEdge` / `RawPath` 结合元数据快照物化为
//! `Node` / `Edge` / `Path`。构建过程是纯计算：所需的缓存刷新已经在
//! 调用方按 `RefreshPlan` 完成，这里只读取不可变的 `SchemaSnapshot`，
//! 仍然无法解析的 id 直接报告 `UnknownIdentifier`。

use log::trace;
use std::collections::HashMap;

use crate::core::error::{ClientResult, DecodeError};
use crate::core::value::{Point, Value, ValueMap};
use crate::core::vertex_edge_path::{Edge, Node, Path};
use crate::protocol::{RawEdge, RawEntity, RawNode, RawPath, RawValue};
use crate::schema::{SchemaCategory, SchemaSnapshot};

/// 单次回复内按 id 索引的完整实体
///
/// 只给出 id 的路径通过它找到在同一回复其他位置出现过的完整节点和边。
/// 同一 id 出现多次时保留第一次出现的实体。
#[derive(Debug, Default)]
pub struct EntityIndex<'a> {
    nodes: HashMap<i64, &'a RawNode>,
    edges: HashMap<i64, &'a RawEdge>,
}

impl<'a> EntityIndex<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rows(rows: &'a [Vec<RawValue>]) -> Self {
        let mut index = Self::new();
        for value in rows.iter().flatten() {
            index.add(value);
        }
        index
    }

    pub fn add(&mut self, value: &'a RawValue) {
        value.for_each_entity(&mut |entity| match entity {
            RawEntity::Node(node) => {
                self.nodes.entry(node.id).or_insert(node);
            }
            RawEntity::Edge(edge) => {
                self.edges.entry(edge.id).or_insert(edge);
            }
        });
    }

    pub fn node(&self, id: i64) -> Option<&'a RawNode> {
        self.nodes.get(&id).copied()
    }

    pub fn edge(&self, id: i64) -> Option<&'a RawEdge> {
        self.edges.get(&id).copied()
    }
}

pub struct EntityBuilder<'a> {
    schema: &'a SchemaSnapshot,
    index: EntityIndex<'a>,
}

impl<'a> EntityBuilder<'a> {
    pub fn new(schema: &'a SchemaSnapshot, index: EntityIndex<'a>) -> Self {
        Self { schema, index }
    }

    /// 不带实体索引的构建器，id 形式的路径全部物化为占位实体
    pub fn standalone(schema: &'a SchemaSnapshot) -> Self {
        Self::new(schema, EntityIndex::new())
    }

    pub fn build_value(&self, raw: &RawValue) -> ClientResult<Value> {
        Ok(match raw {
            RawValue::Null => Value::Null,
            RawValue::Bool(b) => Value::Bool(*b),
            RawValue::Int(i) => Value::Int(*i),
            RawValue::Double(d) => Value::Float(*d),
            RawValue::String(s) => Value::String(s.clone()),
            RawValue::Array(items) => Value::List(
                items
                    .iter()
                    .map(|item| self.build_value(item))
                    .collect::<ClientResult<Vec<_>>>()?,
            ),
            RawValue::Map(entries) => Value::Map(self.build_map(entries)?),
            RawValue::Point { lat, lon } => Value::Point(Point::new(*lat, *lon)),
            RawValue::Node(node) => Value::Node(self.build_node(node)?),
            RawValue::Edge(edge) => Value::Edge(self.build_edge(edge)?),
            RawValue::Path(path) => Value::Path(self.build_path(path)?),
        })
    }

    pub fn build_node(&self, raw: &RawNode) -> ClientResult<Node> {
        let labels = raw
            .label_ids
            .iter()
            .map(|&id| {
                self.schema
                    .resolve(SchemaCategory::Label, id)
                    .map(str::to_string)
            })
            .collect::<ClientResult<Vec<_>>>()?;
        let properties = self.build_properties(&raw.properties)?;
        Ok(Node::new(raw.id, labels, properties))
    }

    pub fn build_edge(&self, raw: &RawEdge) -> ClientResult<Edge> {
        let relation_type = self
            .schema
            .resolve(SchemaCategory::RelationshipType, raw.type_id)?;
        let properties = self.build_properties(&raw.properties)?;
        Ok(Edge::new(
            raw.id,
            relation_type,
            raw.src_id,
            raw.dst_id,
            properties,
        ))
    }

    /// 内联路径直接构建；id 形式的路径优先使用回复中出现过的完整实体，
    /// 找不到时退化为只带 id 的占位实体
    pub fn build_path(&self, raw: &RawPath) -> ClientResult<Path> {
        if raw.is_inline() {
            let nodes = raw
                .inline_nodes()
                .iter()
                .map(|node| self.build_node(node))
                .collect::<ClientResult<Vec<_>>>()?;
            let edges = raw
                .inline_edges()
                .iter()
                .map(|edge| self.build_edge(edge))
                .collect::<ClientResult<Vec<_>>>()?;
            return Path::try_new(nodes, edges);
        }

        let node_ids = raw.node_ids();
        let nodes = node_ids
            .iter()
            .map(|&id| match self.index.node(id) {
                Some(node) => self.build_node(node),
                None => Ok(Node::stub(id)),
            })
            .collect::<ClientResult<Vec<_>>>()?;
        let edges = raw
            .edge_ids()
            .iter()
            .enumerate()
            .map(|(k, &id)| match self.index.edge(id) {
                Some(edge) => self.build_edge(edge),
                None => {
                    trace!("路径中的边 {} 未在回复中出现，使用占位实体", id);
                    Ok(Edge::stub(id, node_ids[k], node_ids[k + 1]))
                }
            })
            .collect::<ClientResult<Vec<_>>>()?;
        Path::try_new(nodes, edges)
    }

    /// 按线路顺序解析属性键
    pub fn build_properties(&self, raw: &[(i64, RawValue)]) -> ClientResult<ValueMap> {
        let mut properties = ValueMap::with_capacity(raw.len());
        for (key_id, value) in raw {
            let key = self.schema.resolve(SchemaCategory::PropertyKey, *key_id)?;
            properties.insert(key, self.build_value(value)?);
        }
        Ok(properties)
    }

    fn build_map(&self, entries: &[(RawValue, RawValue)]) -> ClientResult<ValueMap> {
        let mut map = ValueMap::with_capacity(entries.len());
        for (position, (key, value)) in entries.iter().enumerate() {
            let key = match key {
                RawValue::String(s) => s.clone(),
                other => {
                    return Err(DecodeError::new(format!(
                        "映射键必须是字符串，实际为 {:?}",
                        other.tag()
                    ))
                    .within(format!("[{}]", position * 2))
                    .into())
                }
            };
            map.insert(key, self.build_value(value)?);
        }
        Ok(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ClientError;
    use crate::schema::MetadataCache;

    fn snapshot() -> SchemaSnapshot {
        let cache = MetadataCache::new();
        cache.install(SchemaCategory::Label, vec!["Person".into(), "City".into()]);
        cache.install(SchemaCategory::RelationshipType, vec!["LIVES_IN".into()]);
        cache.install(
            SchemaCategory::PropertyKey,
            vec!["name".into(), "age".into(), "since".into()],
        );
        cache.snapshot()
    }

    fn raw_node(id: i64, labels: Vec<i64>) -> RawNode {
        RawNode {
            id,
            label_ids: labels,
            properties: Vec::new(),
        }
    }

    #[test]
    fn test_build_node_preserves_label_and_property_order() {
        let schema = snapshot();
        let builder = EntityBuilder::standalone(&schema);
        let node = builder
            .build_node(&RawNode {
                id: 3,
                label_ids: vec![1, 0],
                properties: vec![
                    (1, RawValue::Int(42)),
                    (0, RawValue::String("Ann".into())),
                ],
            })
            .unwrap();

        assert_eq!(node.labels(), &["City".to_string(), "Person".to_string()]);
        let keys: Vec<&str> = node.properties.keys().collect();
        assert_eq!(keys, vec!["age", "name"]);
    }

    #[test]
    fn test_build_edge_resolves_type() {
        let schema = snapshot();
        let builder = EntityBuilder::standalone(&schema);
        let edge = builder
            .build_edge(&RawEdge {
                id: 9,
                type_id: 0,
                src_id: 1,
                dst_id: 2,
                properties: vec![(2, RawValue::Int(2020))],
            })
            .unwrap();
        assert_eq!(edge.relation_type(), "LIVES_IN");
        assert_eq!(edge.property("since"), Some(&Value::Int(2020)));
    }

    #[test]
    fn test_unknown_property_key_is_reported() {
        let schema = snapshot();
        let builder = EntityBuilder::standalone(&schema);
        let err = builder
            .build_node(&RawNode {
                id: 0,
                label_ids: vec![],
                properties: vec![(4, RawValue::Null)],
            })
            .unwrap_err();
        assert_eq!(
            err,
            ClientError::unknown_identifier(SchemaCategory::PropertyKey, 4, 3)
        );
    }

    #[test]
    fn test_nested_entities_in_properties_are_resolved() {
        let schema = snapshot();
        let builder = EntityBuilder::standalone(&schema);
        let value = builder
            .build_value(&RawValue::Array(vec![RawValue::Node(raw_node(1, vec![0]))]))
            .unwrap();
        let list = value.as_list().unwrap();
        assert!(list[0].as_node().unwrap().has_label("Person"));
    }

    #[test]
    fn test_id_path_uses_index_then_stubs() {
        let schema = snapshot();
        let rows = vec![vec![RawValue::Node(raw_node(5, vec![0]))]];
        let builder = EntityBuilder::new(&schema, EntityIndex::from_rows(&rows));

        let path = builder
            .build_path(&RawPath::from_ids(vec![5, 7], vec![12]).unwrap())
            .unwrap();
        assert_eq!(path.node_count(), 2);
        assert_eq!(path.edge_count(), 1);
        assert!(path.node(0).unwrap().has_label("Person"));
        assert!(path.node(1).unwrap().labels().is_empty());
        assert!(path.edge(0).unwrap().connects(5, 7));
    }

    #[test]
    fn test_path_with_disconnected_edge_is_malformed() {
        let schema = snapshot();
        let nodes = vec![raw_node(1, vec![]), raw_node(2, vec![])];
        let edges = vec![RawEdge {
            id: 0,
            type_id: 0,
            src_id: 1,
            dst_id: 3,
            properties: vec![],
        }];
        let builder = EntityBuilder::standalone(&schema);
        let err = builder
            .build_path(&RawPath::from_entities(nodes, edges).unwrap())
            .unwrap_err();
        assert!(matches!(err, ClientError::MalformedReply(_)));
    }

    #[test]
    fn test_map_with_non_string_key_is_malformed() {
        let schema = snapshot();
        let builder = EntityBuilder::standalone(&schema);
        let err = builder
            .build_value(&RawValue::Map(vec![(RawValue::Int(1), RawValue::Null)]))
            .unwrap_err();
        assert!(err.is_protocol_error());
    }
}
