//! 结果集结构定义
//!
//! 把解码后的表头、行和统计信息组合为查询结果。组装过程不做任何 I/O，
//! 结果构造完成后不可变，由发起查询的调用方独占

use std::collections::HashMap;

use super::entity_builder::{EntityBuilder, EntityIndex};
use super::statistics::QueryStatistics;
use crate::core::error::{ClientError, ClientResult, DecodeError};
use crate::core::value::{EntityRef, Value};
use crate::core::vertex_edge_path::{Edge, Node};
use crate::protocol::{ColumnType, RawQueryReply};
use crate::schema::SchemaSnapshot;

/// 结果表头中的一列
#[derive(Debug, Clone, PartialEq)]
pub struct ResultColumn {
    pub name: String,
    pub column_type: ColumnType,
}

/// 一次查询的完整结果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryResult {
    columns: Vec<ResultColumn>,
    rows: Vec<Vec<Value>>,
    statistics: QueryStatistics,
    nodes: HashMap<i64, Node>,
    edges: HashMap<i64, Edge>,
}

/// 结果中的一行
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    columns: &'a [ResultColumn],
    values: &'a [Value],
}

impl<'a> Row<'a> {
    pub fn get(&self, name: &str) -> ClientResult<&'a Value> {
        let index = column_position(self.columns, name)?;
        self.values
            .get(index)
            .ok_or_else(|| ClientError::NoSuchColumn(name.to_string()))
    }

    pub fn at(&self, index: usize) -> Option<&'a Value> {
        self.values.get(index)
    }

    pub fn values(&self) -> &'a [Value] {
        self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn column_position(columns: &[ResultColumn], name: &str) -> ClientResult<usize> {
    columns
        .iter()
        .position(|c| c.name == name)
        .ok_or_else(|| ClientError::NoSuchColumn(name.to_string()))
}

impl QueryResult {
    /// 构造结果并建立节点与边的查找表
    ///
    /// 每一行的值个数必须与列数相同，否则返回 `MalformedReply`。
    pub fn new(
        columns: Vec<ResultColumn>,
        rows: Vec<Vec<Value>>,
        statistics: QueryStatistics,
    ) -> ClientResult<Self> {
        if let Some((r, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != columns.len())
        {
            return Err(DecodeError::new(format!(
                "行中有 {} 个值，表头有 {} 列",
                row.len(),
                columns.len()
            ))
            .within(format!("[{}]", r))
            .within("rows")
            .into());
        }

        let mut nodes = HashMap::new();
        let mut edges = HashMap::new();
        for value in rows.iter().flatten() {
            value.for_each_entity(&mut |entity| match entity {
                EntityRef::Node(node) => {
                    nodes.entry(node.id).or_insert_with(|| node.clone());
                }
                EntityRef::Edge(edge) => {
                    edges.entry(edge.id).or_insert_with(|| edge.clone());
                }
            });
        }
        Ok(Self {
            columns,
            rows,
            statistics,
            nodes,
            edges,
        })
    }

    pub fn columns(&self) -> &[ResultColumn] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn column_index(&self, name: &str) -> ClientResult<usize> {
        column_position(&self.columns, name)
    }

    /// 按列名取出该列在每一行中的值
    pub fn column(&self, name: &str) -> ClientResult<Vec<&Value>> {
        let index = self.column_index(name)?;
        Ok(self.rows.iter().map(|row| &row[index]).collect())
    }

    pub fn column_at(&self, index: usize) -> Option<Vec<&Value>> {
        if index >= self.columns.len() {
            return None;
        }
        Some(self.rows.iter().map(|row| &row[index]).collect())
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<Row<'_>> {
        self.rows.get(index).map(|values| Row {
            columns: &self.columns,
            values,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = Row<'_>> {
        self.rows.iter().map(move |values| Row {
            columns: &self.columns,
            values,
        })
    }

    pub fn value(&self, row: usize, name: &str) -> ClientResult<Option<&Value>> {
        let index = self.column_index(name)?;
        Ok(self.rows.get(row).map(|r| &r[index]))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn statistics(&self) -> &QueryStatistics {
        &self.statistics
    }

    pub fn statistic(&self, key: &str) -> Option<&str> {
        self.statistics.get(key)
    }

    /// 本结果中出现过的节点
    pub fn node(&self, id: i64) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn edge(&self, id: i64) -> Option<&Edge> {
        self.edges.get(&id)
    }

    /// 边的起点和终点；不在本结果中的端点为 `None`
    pub fn endpoints(&self, edge: &Edge) -> (Option<&Node>, Option<&Node>) {
        (self.node(edge.source_id), self.node(edge.dest_id))
    }
}

/// 用元数据快照组装查询结果
///
/// 快照应当已经按本次回复的需求刷新过，这里出现的未知 id 即为协议错误
pub fn assemble(raw: &RawQueryReply, schema: &SchemaSnapshot) -> ClientResult<QueryResult> {
    let builder = EntityBuilder::new(schema, EntityIndex::from_rows(&raw.rows));

    let rows = raw
        .rows
        .iter()
        .enumerate()
        .map(|(r, row)| {
            row.iter()
                .enumerate()
                .map(|(c, value)| {
                    builder.build_value(value).map_err(|err| match err {
                        ClientError::MalformedReply(e) => ClientError::MalformedReply(
                            e.within(format!("[{}]", c))
                                .within(format!("[{}]", r))
                                .within("rows"),
                        ),
                        other => other,
                    })
                })
                .collect::<ClientResult<Vec<_>>>()
        })
        .collect::<ClientResult<Vec<_>>>()?;

    let columns = raw
        .header
        .iter()
        .map(|column| ResultColumn {
            name: column.name.clone(),
            column_type: column.column_type,
        })
        .collect();
    let statistics = QueryStatistics::parse(raw.statistics.iter().map(String::as_str));

    QueryResult::new(columns, rows, statistics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{RawColumn, RawEdge, RawNode, RawValue};
    use crate::schema::{MetadataCache, SchemaCategory};

    fn count_reply() -> RawQueryReply {
        RawQueryReply {
            header: vec![RawColumn {
                column_type: ColumnType::Scalar,
                name: "count".into(),
            }],
            rows: vec![vec![RawValue::Int(10)]],
            statistics: vec!["Query internal execution time: 0.2 milliseconds".into()],
        }
    }

    #[test]
    fn test_named_and_positional_access() {
        let result = assemble(&count_reply(), &SchemaSnapshot::default()).unwrap();

        assert_eq!(result.column_names(), vec!["count"]);
        assert_eq!(result.len(), 1);
        assert_eq!(result.column("count").unwrap(), vec![&Value::Int(10)]);
        assert_eq!(result.row(0).unwrap().get("count").unwrap(), &Value::Int(10));
        assert_eq!(result.row(0).unwrap().at(0), Some(&Value::Int(10)));
        assert_eq!(result.column_at(0).unwrap(), vec![&Value::Int(10)]);
        assert!(result.column_at(1).is_none());
    }

    #[test]
    fn test_missing_column() {
        let result = assemble(&count_reply(), &SchemaSnapshot::default()).unwrap();
        assert_eq!(
            result.column("missing").unwrap_err(),
            ClientError::NoSuchColumn("missing".into())
        );
        assert!(result.row(0).unwrap().get("missing").is_err());
    }

    #[test]
    fn test_statistics_are_passed_through() {
        let result = assemble(&count_reply(), &SchemaSnapshot::default()).unwrap();
        assert_eq!(
            result.statistic("Query internal execution time"),
            Some("0.2 milliseconds")
        );
        assert_eq!(result.statistics().internal_execution_time_ms(), 0.2);
    }

    #[test]
    fn test_edge_endpoints_lookup() {
        let cache = MetadataCache::new();
        cache.install(SchemaCategory::Label, vec!["Person".into()]);
        cache.install(SchemaCategory::RelationshipType, vec!["KNOWS".into()]);
        let raw = RawQueryReply {
            header: vec![
                RawColumn {
                    column_type: ColumnType::Node,
                    name: "a".into(),
                },
                RawColumn {
                    column_type: ColumnType::Relation,
                    name: "r".into(),
                },
            ],
            rows: vec![vec![
                RawValue::Node(RawNode {
                    id: 1,
                    label_ids: vec![0],
                    properties: vec![],
                }),
                RawValue::Edge(RawEdge {
                    id: 4,
                    type_id: 0,
                    src_id: 1,
                    dst_id: 2,
                    properties: vec![],
                }),
            ]],
            statistics: vec![],
        };

        let result = assemble(&raw, &cache.snapshot()).unwrap();
        let edge = result.edge(4).unwrap();
        let (source, dest) = result.endpoints(edge);
        assert!(source.unwrap().has_label("Person"));
        assert!(dest.is_none());
    }

    #[test]
    fn test_malformed_value_reports_row_location() {
        let mut raw = count_reply();
        raw.rows = vec![vec![RawValue::Map(vec![(RawValue::Int(0), RawValue::Null)])]];
        match assemble(&raw, &SchemaSnapshot::default()).unwrap_err() {
            ClientError::MalformedReply(e) => assert_eq!(e.location(), "rows[0][0][0]"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    fn scalar_column(name: &str) -> ResultColumn {
        ResultColumn {
            name: name.into(),
            column_type: ColumnType::Scalar,
        }
    }

    #[test]
    fn test_ragged_rows_are_rejected() {
        let err = QueryResult::new(
            vec![scalar_column("a"), scalar_column("b")],
            vec![vec![Value::Int(1), Value::Int(2)], vec![Value::Int(3)]],
            QueryStatistics::new(),
        )
        .unwrap_err();
        match err {
            ClientError::MalformedReply(e) => assert_eq!(e.location(), "rows[1]"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_lookup_includes_entities_inside_path_properties() {
        use crate::core::value::ValueMap;
        use crate::core::vertex_edge_path::Path;

        let mut props = ValueMap::new();
        props.insert("home", Value::Node(Node::new(9, vec![], ValueMap::new())));
        let path = Path::try_new(vec![Node::new(1, vec![], props)], vec![]).unwrap();

        let result = QueryResult::new(
            vec![scalar_column("p")],
            vec![vec![Value::Path(path)]],
            QueryStatistics::new(),
        )
        .unwrap();
        assert!(result.node(1).is_some());
        assert!(result.node(9).is_some());
    }
}
