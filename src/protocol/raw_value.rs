//! 未解析的值树
//!
//! 纯粹由线路数据构造，标签、关系类型和属性键仍是服务端的整数 id

use std::fmt;

use crate::core::error::{DecodeError, DecodeResult};

/// 紧凑结果集格式中的值类型标签
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueTag {
    Unknown,
    Null,
    String,
    Integer,
    Boolean,
    Double,
    Array,
    Edge,
    Node,
    Path,
    Map,
    Point,
}

impl ValueTag {
    pub fn code(self) -> i64 {
        match self {
            ValueTag::Unknown => 0,
            ValueTag::Null => 1,
            ValueTag::String => 2,
            ValueTag::Integer => 3,
            ValueTag::Boolean => 4,
            ValueTag::Double => 5,
            ValueTag::Array => 6,
            ValueTag::Edge => 7,
            ValueTag::Node => 8,
            ValueTag::Path => 9,
            ValueTag::Map => 10,
            ValueTag::Point => 11,
        }
    }
}

impl TryFrom<i64> for ValueTag {
    type Error = DecodeError;

    fn try_from(code: i64) -> DecodeResult<Self> {
        Ok(match code {
            0 => ValueTag::Unknown,
            1 => ValueTag::Null,
            2 => ValueTag::String,
            3 => ValueTag::Integer,
            4 => ValueTag::Boolean,
            5 => ValueTag::Double,
            6 => ValueTag::Array,
            7 => ValueTag::Edge,
            8 => ValueTag::Node,
            9 => ValueTag::Path,
            10 => ValueTag::Map,
            11 => ValueTag::Point,
            other => return Err(DecodeError::unknown_tag(other)),
        })
    }
}

/// 结果表头中声明的列类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    Unknown,
    Scalar,
    Node,
    Relation,
}

impl ColumnType {
    pub fn code(self) -> i64 {
        match self {
            ColumnType::Unknown => 0,
            ColumnType::Scalar => 1,
            ColumnType::Node => 2,
            ColumnType::Relation => 3,
        }
    }
}

impl TryFrom<i64> for ColumnType {
    type Error = DecodeError;

    fn try_from(code: i64) -> DecodeResult<Self> {
        Ok(match code {
            0 => ColumnType::Unknown,
            1 => ColumnType::Scalar,
            2 => ColumnType::Node,
            3 => ColumnType::Relation,
            other => {
                return Err(DecodeError::new(format!("无法识别的列类型 {}", other)));
            }
        })
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnType::Unknown => "unknown",
            ColumnType::Scalar => "scalar",
            ColumnType::Node => "node",
            ColumnType::Relation => "relation",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawNode {
    pub id: i64,
    pub label_ids: Vec<i64>,
    /// 按线路顺序排列的 (属性键 id, 值)
    pub properties: Vec<(i64, RawValue)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawEdge {
    pub id: i64,
    pub type_id: i64,
    pub src_id: i64,
    pub dst_id: i64,
    pub properties: Vec<(i64, RawValue)>,
}

/// 未解析的路径
///
/// 线路上的路径可以只给出 id 列表，也可以内联完整的节点与边。
/// 内联时 `nodes` / `edges` 与 id 列表一一对应，否则为空。
/// 线路形式单独记录，空路径也能按原来的形式重新编码。
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawPath {
    node_ids: Vec<i64>,
    edge_ids: Vec<i64>,
    nodes: Vec<RawNode>,
    edges: Vec<RawEdge>,
    inline: bool,
}

impl RawPath {
    /// 由 id 列表构造，校验节点数比边数多一（空路径除外）
    pub fn from_ids(node_ids: Vec<i64>, edge_ids: Vec<i64>) -> DecodeResult<Self> {
        check_path_arity(node_ids.len(), edge_ids.len())?;
        Ok(Self {
            node_ids,
            edge_ids,
            nodes: Vec::new(),
            edges: Vec::new(),
            inline: false,
        })
    }

    /// 由内联的完整实体构造
    pub fn from_entities(nodes: Vec<RawNode>, edges: Vec<RawEdge>) -> DecodeResult<Self> {
        check_path_arity(nodes.len(), edges.len())?;
        Ok(Self {
            node_ids: nodes.iter().map(|n| n.id).collect(),
            edge_ids: edges.iter().map(|e| e.id).collect(),
            nodes,
            edges,
            inline: true,
        })
    }

    pub fn node_ids(&self) -> &[i64] {
        &self.node_ids
    }

    pub fn edge_ids(&self) -> &[i64] {
        &self.edge_ids
    }

    /// 内联的节点；只给出 id 的路径返回空切片
    pub fn inline_nodes(&self) -> &[RawNode] {
        &self.nodes
    }

    pub fn inline_edges(&self) -> &[RawEdge] {
        &self.edges
    }

    /// 线路上是否为内联形式
    pub fn is_inline(&self) -> bool {
        self.inline
    }

    pub fn is_empty(&self) -> bool {
        self.node_ids.is_empty()
    }
}

fn check_path_arity(nodes: usize, edges: usize) -> DecodeResult<()> {
    if (nodes == 0 && edges == 0) || nodes == edges + 1 {
        Ok(())
    } else {
        Err(DecodeError::new(format!(
            "路径包含 {} 个节点和 {} 条边，节点数必须比边数多一",
            nodes, edges
        )))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Null,
    Bool(bool),
    Int(i64),
    Double(f64),
    String(String),
    Array(Vec<RawValue>),
    Map(Vec<(RawValue, RawValue)>),
    Point { lat: f64, lon: f64 },
    Node(RawNode),
    Edge(RawEdge),
    Path(RawPath),
}

/// 值树中未解析实体的借用视图
#[derive(Debug, Clone, Copy)]
pub enum RawEntity<'a> {
    Node(&'a RawNode),
    Edge(&'a RawEdge),
}

impl RawValue {
    pub fn tag(&self) -> ValueTag {
        match self {
            RawValue::Null => ValueTag::Null,
            RawValue::Bool(_) => ValueTag::Boolean,
            RawValue::Int(_) => ValueTag::Integer,
            RawValue::Double(_) => ValueTag::Double,
            RawValue::String(_) => ValueTag::String,
            RawValue::Array(_) => ValueTag::Array,
            RawValue::Map(_) => ValueTag::Map,
            RawValue::Point { .. } => ValueTag::Point,
            RawValue::Node(_) => ValueTag::Node,
            RawValue::Edge(_) => ValueTag::Edge,
            RawValue::Path(_) => ValueTag::Path,
        }
    }

    /// 先序遍历值树中的所有节点与边（含属性值、数组元素、映射值和内联路径中的实体）
    pub fn for_each_entity<'a, F>(&'a self, f: &mut F)
    where
        F: FnMut(RawEntity<'a>),
    {
        match self {
            RawValue::Array(items) => {
                for item in items {
                    item.for_each_entity(f);
                }
            }
            RawValue::Map(entries) => {
                for (key, value) in entries {
                    key.for_each_entity(f);
                    value.for_each_entity(f);
                }
            }
            RawValue::Node(node) => visit_node(node, f),
            RawValue::Edge(edge) => visit_edge(edge, f),
            RawValue::Path(path) => {
                for node in path.inline_nodes() {
                    visit_node(node, f);
                }
                for edge in path.inline_edges() {
                    visit_edge(edge, f);
                }
            }
            _ => {}
        }
    }
}

fn visit_node<'a, F>(node: &'a RawNode, f: &mut F)
where
    F: FnMut(RawEntity<'a>),
{
    f(RawEntity::Node(node));
    for (_, value) in &node.properties {
        value.for_each_entity(f);
    }
}

fn visit_edge<'a, F>(edge: &'a RawEdge, f: &mut F)
where
    F: FnMut(RawEntity<'a>),
{
    f(RawEntity::Edge(edge));
    for (_, value) in &edge.properties {
        value.for_each_entity(f);
    }
}
