//! 元数据缓存模块
//!
//! 结果中的节点标签、关系类型、属性键都以整数 id 编码，
//! 本模块负责缓存 id → 名称 映射并在需要时向服务端刷新

pub mod cache;
pub mod category;
pub mod refresh;
pub mod source;

pub use cache::{MetadataCache, SchemaSnapshot};
pub use category::SchemaCategory;
pub use refresh::{RefreshPlan, RefreshTarget, SchemaDemand};
pub use source::{AsyncSchemaSource, SchemaSource};
