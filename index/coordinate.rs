use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// 经纬度坐标（单位：度）
///
/// 排序规则：先比较纬度，纬度相等时再比较经度。
/// 该顺序是 `RecordCollection` 的唯一排序键。
#[derive(Debug, Display, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[display(fmt = "({}, {})", latitude, longitude)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// 严格小于：纬度优先，其次经度
    pub fn less_than(&self, other: &Coordinate) -> bool {
        if self.latitude == other.latitude {
            return self.longitude < other.longitude;
        }
        self.latitude < other.latitude
    }

    /// 由 `less_than` 双向推导出的排序结果
    ///
    /// 相等或不可比较（NaN）时返回 `Equal`，排序不会 panic
    pub fn sort_order(&self, other: &Coordinate) -> Ordering {
        if self.less_than(other) {
            Ordering::Less
        } else if other.less_than(self) {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    }

    /// 是否为有限值且落在合法范围内
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}
