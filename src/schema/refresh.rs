//! 单次查询的刷新规划
//!
//! 在解析实体之前，先从解码后的回复中统计每个类别引用到的最大 id，
//! 再结合服务端报告的模式版本一次性决定需要刷新哪些类别。
//! 同一次查询中每个类别最多出现在计划里一次，刷新之后的解析是纯计算，
//! 因此每个类别每次查询至多刷新一次

use super::cache::SchemaSnapshot;
use super::category::SchemaCategory;
use crate::protocol::{RawEntity, RawValue};

/// 一次回复对各类元数据的需求：每个类别引用到的最大 id
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchemaDemand {
    max_ids: [Option<i64>; 3],
}

impl SchemaDemand {
    pub fn new() -> Self {
        Self::default()
    }

    /// 统计一批结果行中的全部引用
    pub fn from_rows(rows: &[Vec<RawValue>]) -> Self {
        let mut demand = Self::new();
        for value in rows.iter().flatten() {
            demand.record_value(value);
        }
        demand
    }

    pub fn record_value(&mut self, value: &RawValue) {
        value.for_each_entity(&mut |entity| match entity {
            RawEntity::Node(node) => {
                for id in &node.label_ids {
                    self.record(SchemaCategory::Label, *id);
                }
                for (key, _) in &node.properties {
                    self.record(SchemaCategory::PropertyKey, *key);
                }
            }
            RawEntity::Edge(edge) => {
                self.record(SchemaCategory::RelationshipType, edge.type_id);
                for (key, _) in &edge.properties {
                    self.record(SchemaCategory::PropertyKey, *key);
                }
            }
        });
    }

    /// 负数 id 不可能被任何刷新满足，留给解析阶段报错
    pub fn record(&mut self, category: SchemaCategory, id: i64) {
        if id < 0 {
            return;
        }
        let slot = &mut self.max_ids[category.index()];
        *slot = Some(slot.map_or(id, |current| current.max(id)));
    }

    pub fn max_id(&self, category: SchemaCategory) -> Option<i64> {
        self.max_ids[category.index()]
    }

    pub fn is_empty(&self) -> bool {
        self.max_ids.iter().all(Option::is_none)
    }
}

/// 计划中的一次类别刷新
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshTarget {
    pub category: SchemaCategory,
    /// 需要覆盖到的 id；`None` 表示无条件刷新（版本变化）
    pub required_id: Option<i64>,
}

impl RefreshTarget {
    /// 当前缓存是否已经满足需求（例如并发查询已经完成了同样的刷新）
    pub fn satisfied_by(&self, snapshot: &SchemaSnapshot) -> bool {
        match self.required_id {
            Some(id) => snapshot.covers(self.category, id),
            None => false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefreshPlan {
    version: Option<i64>,
    targets: Vec<RefreshTarget>,
}

impl RefreshPlan {
    pub fn none() -> Self {
        Self::default()
    }

    /// 版本变化：三个类别全部无条件刷新，并记录新版本
    pub fn full(version: i64) -> Self {
        Self {
            version: Some(version),
            targets: SchemaCategory::ALL
                .iter()
                .map(|&category| RefreshTarget {
                    category,
                    required_id: None,
                })
                .collect(),
        }
    }

    /// 单个 id 未命中
    pub fn for_miss(category: SchemaCategory, id: i64) -> Self {
        Self {
            version: None,
            targets: vec![RefreshTarget {
                category,
                required_id: Some(id),
            }],
        }
    }

    /// 根据当前缓存快照、回复中的需求以及服务端版本生成计划
    pub fn build(
        snapshot: &SchemaSnapshot,
        demand: &SchemaDemand,
        server_version: Option<i64>,
    ) -> Self {
        if let Some(version) = server_version {
            if version != snapshot.version() {
                return Self::full(version);
            }
        }
        let targets = SchemaCategory::ALL
            .iter()
            .filter_map(|&category| {
                let id = demand.max_id(category)?;
                if snapshot.covers(category, id) {
                    None
                } else {
                    Some(RefreshTarget {
                        category,
                        required_id: Some(id),
                    })
                }
            })
            .collect();
        Self {
            version: None,
            targets,
        }
    }

    pub fn version(&self) -> Option<i64> {
        self.version
    }

    pub fn targets(&self) -> &[RefreshTarget] {
        &self.targets
    }

    pub fn categories(&self) -> impl Iterator<Item = SchemaCategory> + '_ {
        self.targets.iter().map(|t| t.category)
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty() && self.version.is_none()
    }
}
