use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::error::{ClientResult, DecodeError};
use crate::core::value::{Value, ValueMap};

/// Represents a node returned by a query
///
/// Identity is the server id: two `Node` values with the same id refer to the
/// same graph vertex, but each decode produces an independent value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: i64,
    pub labels: Vec<String>,
    pub properties: ValueMap,
}

impl Node {
    pub fn new(id: i64, labels: Vec<String>, properties: ValueMap) -> Self {
        Self {
            id,
            labels,
            properties,
        }
    }

    /// 只知道 id 的节点（路径中引用、但回复里没有完整内容的节点）
    pub fn stub(id: i64) -> Self {
        Self::new(id, Vec::new(), ValueMap::new())
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Check if node has a specific label
    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }
}

/// Represents a directed edge returned by a query
///
/// `source_id` / `dest_id` are weak references: the endpoints are looked up
/// by id in the owning result, and may not be present there.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: i64,
    pub relation_type: String,
    pub source_id: i64,
    pub dest_id: i64,
    pub properties: ValueMap,
}

impl Edge {
    pub fn new(
        id: i64,
        relation_type: impl Into<String>,
        source_id: i64,
        dest_id: i64,
        properties: ValueMap,
    ) -> Self {
        Self {
            id,
            relation_type: relation_type.into(),
            source_id,
            dest_id,
            properties,
        }
    }

    /// 只知道 id 和端点的边，关系类型为空
    pub fn stub(id: i64, source_id: i64, dest_id: i64) -> Self {
        Self::new(id, String::new(), source_id, dest_id, ValueMap::new())
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn relation_type(&self) -> &str {
        &self.relation_type
    }

    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    /// 是否连接两个节点（不区分方向）
    pub fn connects(&self, a: i64, b: i64) -> bool {
        (self.source_id == a && self.dest_id == b) || (self.source_id == b && self.dest_id == a)
    }
}

/// Represents a path: alternating nodes and edges
///
/// A non-empty path has exactly one more node than edges, and edge `k`
/// connects node `k` and node `k + 1` in either direction.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Path {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl Path {
    pub fn empty() -> Self {
        Self::default()
    }

    /// 构造路径并校验节点数与边数、以及相邻关系
    pub fn try_new(nodes: Vec<Node>, edges: Vec<Edge>) -> ClientResult<Self> {
        if nodes.is_empty() && edges.is_empty() {
            return Ok(Self::empty());
        }
        if nodes.len() != edges.len() + 1 {
            return Err(DecodeError::new(format!(
                "路径包含 {} 个节点和 {} 条边，节点数必须比边数多一",
                nodes.len(),
                edges.len()
            ))
            .into());
        }
        for (k, edge) in edges.iter().enumerate() {
            let (a, b) = (nodes[k].id, nodes[k + 1].id);
            if !edge.connects(a, b) {
                return Err(DecodeError::new(format!(
                    "路径中第 {} 条边 ({}) 没有连接节点 {} 和 {}",
                    k, edge.id, a, b
                ))
                .into());
            }
        }
        Ok(Self { nodes, edges })
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node(&self, index: usize) -> Option<&Node> {
        self.nodes.get(index)
    }

    pub fn edge(&self, index: usize) -> Option<&Edge> {
        self.edges.get(index)
    }

    pub fn first_node(&self) -> Option<&Node> {
        self.nodes.first()
    }

    pub fn last_node(&self) -> Option<&Node> {
        self.nodes.last()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// 按名称排序输出属性，如 `{age:30,name:"Alice"}`
fn fmt_properties(f: &mut fmt::Formatter<'_>, properties: &ValueMap) -> fmt::Result {
    if properties.is_empty() {
        return Ok(());
    }
    let mut pairs: Vec<_> = properties.iter().collect();
    pairs.sort_by(|(a, _), (b, _)| a.cmp(b));
    write!(f, "{{")?;
    for (i, (k, v)) in pairs.into_iter().enumerate() {
        if i > 0 {
            write!(f, ",")?;
        }
        match v {
            Value::String(s) => write!(f, "{}:{}", k, crate::client::params::quote_string(s))?,
            other => write!(f, "{}:{}", k, other)?,
        }
    }
    write!(f, "}}")
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for label in &self.labels {
            write!(f, ":{}", label)?;
        }
        fmt_properties(f, &self.properties)?;
        write!(f, ")")
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "()-[")?;
        if !self.relation_type.is_empty() {
            write!(f, ":{}", self.relation_type)?;
        }
        fmt_properties(f, &self.properties)?;
        write!(f, "]->()")
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<")?;
        for (k, edge) in self.edges.iter().enumerate() {
            let node_id = self.nodes[k].id;
            write!(f, "({})", node_id)?;
            if edge.source_id == node_id {
                write!(f, "-[{}]->", edge.id)?;
            } else {
                write!(f, "<-[{}]-", edge.id)?;
            }
        }
        if let Some(last) = self.nodes.last() {
            write!(f, "({})", last.id)?;
        }
        write!(f, ">")
    }
}
