//! 开放数据 `rows.json` 解码
//!
//! 文档形如 `{"meta": {...}, "data": [[...], [...]]}`，每行是按列位置排列的数组。
//! 这里按固定列号逐字段解码，不依赖运行时字段名查找。

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::FeedError;
use crate::index::{Coordinate, Record};

/// 行内各字段的列号
mod column {
    pub const ID: usize = 1;
    pub const CREATED_AT: usize = 3;
    pub const UPDATED_AT: usize = 5;
    pub const NAME: usize = 8;
    pub const LOCATION: usize = 9;
    pub const OPEN_ALL_YEAR: usize = 10;
    pub const HANDICAP_OK: usize = 11;
    pub const BOROUGH: usize = 12;
}

#[derive(Debug, Deserialize)]
struct FeedDocument {
    data: Vec<Value>,
}

/// 尚未获得坐标的原始记录
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    pub id: String,
    pub name: String,
    pub location: String,
    pub borough: String,
    pub handicap_ok: bool,
    pub open_all_year: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl RawRecord {
    /// 用于地理编码的地址："名称, 位置, 行政区"
    pub fn address(&self) -> String {
        [self.name.as_str(), self.location.as_str(), self.borough.as_str()].join(", ")
    }

    /// 附上坐标，得到可索引的记录
    pub fn into_record(self, coordinate: Coordinate) -> Record {
        Record {
            id: self.id,
            name: self.name,
            location: self.location,
            borough: self.borough,
            handicap_ok: self.handicap_ok,
            open_all_year: self.open_all_year,
            coordinate,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// 解码结果
#[derive(Debug, Default)]
pub struct DecodedRows {
    pub records: Vec<RawRecord>,
    /// 解码失败被跳过的行数
    pub skipped: usize,
}

/// 解码整个文档
///
/// 单行解码失败只记录警告并跳过；文档本身格式错误则返回错误
pub fn decode_rows(body: &[u8]) -> Result<DecodedRows, FeedError> {
    let document: FeedDocument = serde_json::from_slice(body)?;
    let mut decoded = DecodedRows {
        records: Vec::with_capacity(document.data.len()),
        skipped: 0,
    };

    for (index, row) in document.data.iter().enumerate() {
        match decode_row(index, row) {
            Ok(record) => decoded.records.push(record),
            Err(e) => {
                warn!("Skipping feed row: {}", e);
                decoded.skipped += 1;
            }
        }
    }

    debug!(
        "Decoded {} feed rows ({} skipped)",
        decoded.records.len(),
        decoded.skipped
    );
    Ok(decoded)
}

/// 解码单行
pub fn decode_row(index: usize, row: &Value) -> Result<RawRecord, FeedError> {
    let cells = row.as_array().ok_or_else(|| FeedError::InvalidRow {
        row: index,
        reason: "row is not an array".to_string(),
    })?;
    let row = Row { index, cells };

    Ok(RawRecord {
        id: row.text(column::ID, "id")?,
        name: row.text(column::NAME, "name")?,
        location: row.text(column::LOCATION, "location")?,
        borough: row.text(column::BOROUGH, "borough")?,
        handicap_ok: row.flag(column::HANDICAP_OK, "handicap_ok")?,
        open_all_year: row.flag(column::OPEN_ALL_YEAR, "open_all_year")?,
        created_at: row.timestamp(column::CREATED_AT, "created_at")?,
        updated_at: row.timestamp(column::UPDATED_AT, "updated_at")?,
    })
}

struct Row<'a> {
    index: usize,
    cells: &'a [Value],
}

impl Row<'_> {
    fn invalid(&self, field: &str, reason: &str) -> FeedError {
        FeedError::InvalidRow {
            row: self.index,
            reason: format!("{}: {}", field, reason),
        }
    }

    fn cell(&self, column: usize, field: &str) -> Result<&Value, FeedError> {
        self.cells
            .get(column)
            .ok_or_else(|| self.invalid(field, "missing column"))
    }

    /// 字符串字段；null 视为空字符串
    fn text(&self, column: usize, field: &str) -> Result<String, FeedError> {
        match self.cell(column, field)? {
            Value::String(s) => Ok(s.trim().to_string()),
            Value::Null => Ok(String::new()),
            _ => Err(self.invalid(field, "expected string")),
        }
    }

    /// "yes" 为真（不区分大小写），其余值和 null 为假
    fn flag(&self, column: usize, field: &str) -> Result<bool, FeedError> {
        match self.cell(column, field)? {
            Value::String(s) => Ok(s.trim().eq_ignore_ascii_case("yes")),
            Value::Null => Ok(false),
            _ => Err(self.invalid(field, "expected yes/no string")),
        }
    }

    /// Unix 秒，可以是数字或数字字符串
    fn timestamp(&self, column: usize, field: &str) -> Result<i64, FeedError> {
        match self.cell(column, field)? {
            Value::Number(n) => n
                .as_i64()
                .ok_or_else(|| self.invalid(field, "expected integer timestamp")),
            Value::String(s) => s
                .trim()
                .parse::<i64>()
                .map_err(|_| self.invalid(field, "expected integer timestamp")),
            _ => Err(self.invalid(field, "expected integer timestamp")),
        }
    }
}
