use serde::{Deserialize, Serialize};
use std::fmt;

/// 服务端以整数 id 报告的三类元数据
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SchemaCategory {
    Label,
    RelationshipType,
    PropertyKey,
}

impl SchemaCategory {
    pub const ALL: [SchemaCategory; 3] = [
        SchemaCategory::Label,
        SchemaCategory::RelationshipType,
        SchemaCategory::PropertyKey,
    ];

    pub(crate) fn index(self) -> usize {
        match self {
            SchemaCategory::Label => 0,
            SchemaCategory::RelationshipType => 1,
            SchemaCategory::PropertyKey => 2,
        }
    }
}

impl fmt::Display for SchemaCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SchemaCategory::Label => "标签",
            SchemaCategory::RelationshipType => "关系类型",
            SchemaCategory::PropertyKey => "属性键",
        };
        write!(f, "{}", name)
    }
}
