use serde::{Deserialize, Serialize};
use std::fmt;

use super::map::ValueMap;
use crate::core::vertex_edge_path::{Edge, Node, Path};

/// 地理坐标点
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub latitude: f64,
    pub longitude: f64,
}

impl Point {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "point({{latitude:{},longitude:{}}})",
            self.latitude, self.longitude
        )
    }
}

/// 解析完成的结果值
///
/// 与 `RawValue` 不同，这里不再包含任何未解析的整数标识符：
/// 标签、关系类型和属性键都已经是字符串
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<Value>),
    Map(ValueMap),
    Point(Point),
    Node(Node),
    Edge(Edge),
    Path(Path),
}

impl Value {
    /// 值的类型名称，用于错误信息和日志
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Int(_) => "integer",
            Value::Float(_) => "double",
            Value::String(_) => "string",
            Value::List(_) => "array",
            Value::Map(_) => "map",
            Value::Point(_) => "point",
            Value::Node(_) => "node",
            Value::Edge(_) => "edge",
            Value::Path(_) => "path",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// 整数也可以按浮点数读取
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&ValueMap> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_point(&self) -> Option<&Point> {
        match self {
            Value::Point(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Value::Node(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_edge(&self) -> Option<&Edge> {
        match self {
            Value::Edge(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_path(&self) -> Option<&Path> {
        match self {
            Value::Path(p) => Some(p),
            _ => None,
        }
    }

    /// 先序遍历值树中的所有节点与边，包括路径、列表、映射以及实体属性中嵌套的实体
    pub fn for_each_entity<'a, F>(&'a self, f: &mut F)
    where
        F: FnMut(EntityRef<'a>),
    {
        match self {
            Value::List(items) => {
                for item in items {
                    item.for_each_entity(f);
                }
            }
            Value::Map(map) => {
                for value in map.values() {
                    value.for_each_entity(f);
                }
            }
            Value::Node(node) => visit_node(node, f),
            Value::Edge(edge) => visit_edge(edge, f),
            Value::Path(path) => {
                for node in path.nodes() {
                    visit_node(node, f);
                }
                for edge in path.edges() {
                    visit_edge(edge, f);
                }
            }
            _ => {}
        }
    }
}

fn visit_node<'a, F>(node: &'a Node, f: &mut F)
where
    F: FnMut(EntityRef<'a>),
{
    f(EntityRef::Node(node));
    for value in node.properties.values() {
        value.for_each_entity(f);
    }
}

fn visit_edge<'a, F>(edge: &'a Edge, f: &mut F)
where
    F: FnMut(EntityRef<'a>),
{
    f(EntityRef::Edge(edge));
    for value in edge.properties.values() {
        value.for_each_entity(f);
    }
}

/// 值树中实体的借用视图
#[derive(Debug, Clone, Copy)]
pub enum EntityRef<'a> {
    Node(&'a Node),
    Edge(&'a Edge),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::String(s) => write!(f, "{}", s),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Map(map) => write!(f, "{}", map),
            Value::Point(p) => write!(f, "{}", p),
            Value::Node(n) => write!(f, "{}", n),
            Value::Edge(e) => write!(f, "{}", e),
            Value::Path(p) => write!(f, "{}", p),
        }
    }
}
