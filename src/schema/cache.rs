//! 元数据缓存
//!
//! 按图维护 标签 / 关系类型 / 属性键 三组 id → 名称 映射以及服务端的模式版本。
//! 同一模式版本内三组序列只会追加，不会收缩或改写已有下标；版本变化时
//! 以服务端列表为准整体替换。刷新以整组替换的方式原子提交，
//! 读者拿到的快照要么是刷新前的序列，要么是刷新后的序列。
//!
//! 缓存可以在多个线程、多个并发查询之间共享（通常包裹在 `Arc` 中）。

use log::{debug, info, warn};
use parking_lot::RwLock;
use std::sync::Arc;

use super::category::SchemaCategory;
use super::refresh::{RefreshPlan, RefreshTarget};
use super::source::{AsyncSchemaSource, SchemaSource};
use crate::core::error::{ClientError, ClientResult};

#[derive(Debug, Clone, Default)]
struct SchemaState {
    version: i64,
    names: [Arc<Vec<String>>; 3],
}

/// 某一时刻缓存内容的不可变视图
///
/// 快照只持有各序列的 `Arc`，克隆代价与序列长度无关。
#[derive(Debug, Clone, Default)]
pub struct SchemaSnapshot {
    version: i64,
    names: [Arc<Vec<String>>; 3],
}

impl SchemaSnapshot {
    pub fn version(&self) -> i64 {
        self.version
    }

    pub fn names(&self, category: SchemaCategory) -> &[String] {
        &self.names[category.index()]
    }

    pub fn len(&self, category: SchemaCategory) -> usize {
        self.names[category.index()].len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.iter().all(|names| names.is_empty())
    }

    /// id 是否落在当前序列范围内
    pub fn covers(&self, category: SchemaCategory, id: i64) -> bool {
        self.get(category, id).is_some()
    }

    pub fn get(&self, category: SchemaCategory, id: i64) -> Option<&str> {
        let index = usize::try_from(id).ok()?;
        self.names[category.index()].get(index).map(String::as_str)
    }

    /// 解析 id，未知时返回 `UnknownIdentifier`
    pub fn resolve(&self, category: SchemaCategory, id: i64) -> ClientResult<&str> {
        self.get(category, id)
            .ok_or_else(|| ClientError::unknown_identifier(category, id, self.len(category)))
    }
}

#[derive(Debug, Default)]
pub struct MetadataCache {
    state: RwLock<SchemaState>,
}

impl MetadataCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> SchemaSnapshot {
        let state = self.state.read();
        SchemaSnapshot {
            version: state.version,
            names: state.names.clone(),
        }
    }

    pub fn version(&self) -> i64 {
        self.state.read().version
    }

    pub fn len(&self, category: SchemaCategory) -> usize {
        self.state.read().names[category.index()].len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().names.iter().all(|names| names.is_empty())
    }

    /// 只查缓存，不触发刷新
    pub fn get(&self, category: SchemaCategory, id: i64) -> Option<String> {
        let index = usize::try_from(id).ok()?;
        self.state.read().names[category.index()].get(index).cloned()
    }

    /// 用服务端返回的完整列表替换某个类别
    ///
    /// 新列表比现有的短，或者改写了已有下标的名称时拒绝替换并返回 `false`。
    pub fn install(&self, category: SchemaCategory, names: Vec<String>) -> bool {
        let mut state = self.state.write();
        let current = &state.names[category.index()];

        if names.len() < current.len() {
            warn!(
                "拒绝收缩{}缓存: 现有 {} 项, 服务端返回 {} 项",
                category,
                current.len(),
                names.len()
            );
            return false;
        }
        if let Some(index) = current.iter().zip(&names).position(|(old, new)| old != new) {
            warn!(
                "拒绝改写{}缓存: 下标 {} 由 {:?} 变为 {:?}",
                category, index, current[index], names[index]
            );
            return false;
        }

        if names.len() > current.len() {
            info!("{}缓存增长: {} -> {}", category, current.len(), names.len());
        }
        state.names[category.index()] = Arc::new(names);
        true
    }

    pub fn set_version(&self, version: i64) {
        let mut state = self.state.write();
        if state.version != version {
            info!("模式版本更新: {} -> {}", state.version, version);
            state.version = version;
        }
    }

    /// 清空全部映射并把版本复位为 0（图被删除之后）
    pub fn clear(&self) {
        let mut state = self.state.write();
        *state = SchemaState::default();
        debug!("元数据缓存已清空");
    }

    /// 执行刷新计划
    ///
    /// 计划中的每个类别至多拉取一次；如果执行时缓存已经满足某个目标
    /// （例如并发查询刚刚完成同样的刷新），则跳过该目标。
    pub fn apply<S>(&self, source: &S, plan: &RefreshPlan) -> ClientResult<()>
    where
        S: SchemaSource + ?Sized,
    {
        let mut fetched = Vec::new();
        for target in self.pending_targets(plan) {
            fetched.push((target.category, source.fetch_names(target.category)?));
        }
        self.commit(plan, fetched);
        Ok(())
    }

    /// `apply` 的异步版本，计划内的多个类别并发拉取
    pub async fn apply_async<S>(&self, source: &S, plan: &RefreshPlan) -> ClientResult<()>
    where
        S: AsyncSchemaSource + ?Sized,
    {
        let targets = self.pending_targets(plan);
        let fetched = futures::future::try_join_all(
            targets.iter().map(|target| source.fetch_names(target.category)),
        )
        .await?;
        let fetched = targets
            .iter()
            .map(|target| target.category)
            .zip(fetched)
            .collect();
        self.commit(plan, fetched);
        Ok(())
    }

    /// 解析单个 id，未命中时刷新该类别一次后重试
    pub fn resolve<S>(&self, source: &S, category: SchemaCategory, id: i64) -> ClientResult<String>
    where
        S: SchemaSource + ?Sized,
    {
        if let Some(name) = self.get(category, id) {
            return Ok(name);
        }
        self.apply(source, &RefreshPlan::for_miss(category, id))?;
        self.snapshot().resolve(category, id).map(str::to_string)
    }

    pub async fn resolve_async<S>(
        &self,
        source: &S,
        category: SchemaCategory,
        id: i64,
    ) -> ClientResult<String>
    where
        S: AsyncSchemaSource + ?Sized,
    {
        if let Some(name) = self.get(category, id) {
            return Ok(name);
        }
        self.apply_async(source, &RefreshPlan::for_miss(category, id))
            .await?;
        self.snapshot().resolve(category, id).map(str::to_string)
    }

    /// 版本不一致时全量刷新，返回是否发生了刷新
    pub fn check_version<S>(&self, source: &S, server_version: i64) -> ClientResult<bool>
    where
        S: SchemaSource + ?Sized,
    {
        if self.version() == server_version {
            return Ok(false);
        }
        self.apply(source, &RefreshPlan::full(server_version))?;
        Ok(true)
    }

    pub async fn check_version_async<S>(&self, source: &S, server_version: i64) -> ClientResult<bool>
    where
        S: AsyncSchemaSource + ?Sized,
    {
        if self.version() == server_version {
            return Ok(false);
        }
        self.apply_async(source, &RefreshPlan::full(server_version))
            .await?;
        Ok(true)
    }

    fn pending_targets(&self, plan: &RefreshPlan) -> Vec<RefreshTarget> {
        let snapshot = self.snapshot();
        plan.targets()
            .iter()
            .filter(|target| {
                let satisfied = target.satisfied_by(&snapshot);
                if satisfied {
                    debug!("{}缓存已覆盖 id {:?}, 跳过刷新", target.category, target.required_id);
                }
                !satisfied
            })
            .copied()
            .collect()
    }

    /// 提交一次计划拉取到的列表
    ///
    /// 带版本的计划（版本变化）以服务端列表为准整体替换，并在同一次写锁内
    /// 更新版本；同一版本内的刷新只允许追加。
    fn commit(&self, plan: &RefreshPlan, fetched: Vec<(SchemaCategory, Vec<String>)>) {
        let version = match plan.version() {
            Some(version) => version,
            None => {
                for (category, names) in fetched {
                    self.install(category, names);
                }
                return;
            }
        };

        let mut state = self.state.write();
        for (category, names) in fetched {
            let current = &state.names[category.index()];
            let keeps_prefix = names.len() >= current.len()
                && current.iter().zip(&names).all(|(old, new)| old == new);
            if !keeps_prefix {
                warn!(
                    "模式版本 {} -> {} 后{}映射与缓存不一致，按服务端列表替换: {} 项 -> {} 项",
                    state.version,
                    version,
                    category,
                    current.len(),
                    names.len()
                );
            } else if names.len() > current.len() {
                info!("{}缓存增长: {} -> {}", category, current.len(), names.len());
            }
            state.names[category.index()] = Arc::new(names);
        }
        if state.version != version {
            info!("模式版本更新: {} -> {}", state.version, version);
            state.version = version;
        }
    }
}
