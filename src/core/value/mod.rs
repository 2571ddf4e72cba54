//! Value 模块 - 查询结果值类型系统
//!
//! 此模块提供了解析完成后的值类型，所有标识符都已经替换为名称：
//! - 核心类型定义 (`types.rs`)
//! - 保持插入顺序的映射 (`map.rs`)
//! - 类型转换 (`conversion.rs`)

pub mod conversion;
pub mod map;
pub mod types;

pub use map::ValueMap;
pub use types::*;
