use super::algorithms::nearest::{nearest_search, DistanceResult};
use super::{Coordinate, Record};
use std::sync::Arc;

/// 按坐标排序的记录集合（快照）
///
/// 构建后不可变：刷新时整体重建，不支持单条插入、更新或删除。
#[derive(Debug, Clone, Default)]
pub struct RecordCollection {
    records: Vec<Arc<Record>>,
}

impl RecordCollection {
    /// 复制引用列表并按坐标排序，O(n log n)
    ///
    /// 坐标相同的记录之间顺序不确定
    pub fn build<I>(records: I) -> Self
    where
        I: IntoIterator<Item = Arc<Record>>,
    {
        let mut records: Vec<Arc<Record>> = records.into_iter().collect();
        records.sort_unstable_by(|a, b| a.coordinate.sort_order(&b.coordinate));
        Self { records }
    }

    /// 从拥有所有权的记录构建
    pub fn from_records(records: Vec<Record>) -> Self {
        Self::build(records.into_iter().map(Arc::new))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 排序后的记录
    pub fn records(&self) -> &[Arc<Record>] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Record>> {
        self.records.iter()
    }

    /// 查找离 `target` 最近的 `k` 条记录
    ///
    /// 返回 `min(k, n)` 个结果；`k >= n` 时返回全部记录且不按距离排序。
    /// 详见 [`nearest_search`]。
    pub fn find_closest(&self, target: &Coordinate, k: usize) -> Vec<DistanceResult> {
        nearest_search(&self.records, target, k)
    }
}
