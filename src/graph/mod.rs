//! 图结果模块
//!
//! 包含图实体构建、查询结果组装以及执行统计

pub mod entity_builder;
pub mod result_set;
pub mod statistics;

pub use entity_builder::{EntityBuilder, EntityIndex};
pub use result_set::{assemble, QueryResult, ResultColumn, Row};
pub use statistics::QueryStatistics;
