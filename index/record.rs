use super::coordinate::Coordinate;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// 一个公共卫生间条目
///
/// `id` 是标识字段，但索引层不保证唯一：重复的记录会在结果里出现两次。
#[derive(Debug, Display, Clone, PartialEq, Serialize, Deserialize)]
#[display(fmt = "Record {{ id: {}, name: {}, coordinate: {} }}", id, name, coordinate)]
pub struct Record {
    pub id: String,
    pub name: String,
    /// 街道位置描述（原始数据中的 Location 列）
    pub location: String,
    pub borough: String,
    pub handicap_ok: bool,
    pub open_all_year: bool,
    pub coordinate: Coordinate,
    /// Unix 秒
    pub created_at: i64,
    /// Unix 秒
    pub updated_at: i64,
}

impl Record {
    /// 创建只含必要字段的记录，其余字段取默认值
    pub fn new(id: impl Into<String>, name: impl Into<String>, coordinate: Coordinate) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            location: String::new(),
            borough: String::new(),
            handicap_ok: false,
            open_all_year: false,
            coordinate,
            created_at: 0,
            updated_at: 0,
        }
    }

    pub fn created_at_time(&self) -> SystemTime {
        unix_to_system_time(self.created_at)
    }

    pub fn updated_at_time(&self) -> SystemTime {
        unix_to_system_time(self.updated_at)
    }
}

fn unix_to_system_time(secs: i64) -> SystemTime {
    if secs >= 0 {
        UNIX_EPOCH + Duration::from_secs(secs as u64)
    } else {
        UNIX_EPOCH - Duration::from_secs(secs.unsigned_abs())
    }
}
