use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::index::Record;

/// 记录存储错误类型
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Binary serialization error: {0}")]
    Binary(#[from] bincode::Error),
}

/// 序列化格式枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SerializationFormat {
    /// JSON格式 - 可读性好，方便调试
    Json,
    /// 二进制格式 - 性能好，体积小
    Binary,
}

impl SerializationFormat {
    /// 根据文件扩展名自动判断格式
    pub fn from_extension<P: AsRef<Path>>(path: P) -> Self {
        match path.as_ref().extension().and_then(|ext| ext.to_str()) {
            Some("json") => SerializationFormat::Json,
            _ => SerializationFormat::Binary,
        }
    }

    /// 按名称解析："json"、"binary"；"auto" 或空值返回 None（按扩展名判断）
    pub fn from_name(name: &str) -> Result<Option<Self>, String> {
        match name.to_ascii_lowercase().as_str() {
            "" | "auto" => Ok(None),
            "json" => Ok(Some(SerializationFormat::Json)),
            "binary" | "bincode" => Ok(Some(SerializationFormat::Binary)),
            other => Err(format!(
                "Invalid storage format: '{}'. Must be one of: auto, json, binary",
                other
            )),
        }
    }
}

/// 文件中的存储结构
#[derive(Debug, Serialize, Deserialize)]
struct StoredRecords {
    /// 保存时间（Unix 秒）
    saved_at: u64,
    records: Vec<Record>,
}

/// 基于单个文件的记录存储
///
/// 每次刷新整体替换：先写临时文件再原子重命名，
/// 不会留下半写的数据文件。
#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
    format: SerializationFormat,
}

impl RecordStore {
    /// 根据扩展名选择格式：.json -> JSON，其他 -> 二进制
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        let path = path.into();
        let format = SerializationFormat::from_extension(&path);
        Self { path, format }
    }

    pub fn with_format<P: Into<PathBuf>>(path: P, format: SerializationFormat) -> Self {
        Self {
            path: path.into(),
            format,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> SerializationFormat {
        self.format
    }

    /// 清空并写入全部记录
    pub fn replace_all(&self, records: &[Record]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let stored = StoredRecords {
            saved_at: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0),
            records: records.to_vec(),
        };

        let data = match self.format {
            SerializationFormat::Json => serde_json::to_vec_pretty(&stored)?,
            SerializationFormat::Binary => bincode::serialize(&stored)?,
        };

        // 创建临时文件路径，确保原子性写入
        let temp_path = self.path.with_extension(format!(
            "{}.tmp",
            self.path.extension().unwrap_or_default().to_string_lossy()
        ));
        fs::write(&temp_path, data)?;
        fs::rename(temp_path, &self.path)?;

        Ok(())
    }

    /// 读取全部记录；文件不存在时返回空列表
    pub fn load_all(&self) -> Result<Vec<Record>, StoreError> {
        let data = match fs::read(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let stored: StoredRecords = match self.format {
            SerializationFormat::Json => serde_json::from_slice(&data)?,
            SerializationFormat::Binary => bincode::deserialize(&data)?,
        };

        Ok(stored.records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::Coordinate;
    use tempfile::TempDir;

    fn sample_records() -> Vec<Record> {
        let mut park = Record::new("uuid-1", "Bryant Park", Coordinate::new(40.7536, -73.9832));
        park.location = "42nd St & 6th Ave".to_string();
        park.borough = "Manhattan".to_string();
        park.handicap_ok = true;
        park.created_at = 1_400_000_000;
        park.updated_at = 1_400_000_100;

        let beach = Record::new("uuid-2", "Orchard Beach", Coordinate::new(40.8673, -73.7932));
        vec![park, beach]
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(SerializationFormat::from_extension("a.json"), SerializationFormat::Json);
        assert_eq!(SerializationFormat::from_extension("a.bin"), SerializationFormat::Binary);
        assert_eq!(SerializationFormat::from_extension("a"), SerializationFormat::Binary);
    }

    #[test]
    fn test_format_from_name() {
        assert_eq!(SerializationFormat::from_name("auto").unwrap(), None);
        assert_eq!(SerializationFormat::from_name("JSON").unwrap(), Some(SerializationFormat::Json));
        assert_eq!(SerializationFormat::from_name("binary").unwrap(), Some(SerializationFormat::Binary));
        assert!(SerializationFormat::from_name("sqlite").is_err());
    }

    #[test]
    fn test_missing_file_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let store = RecordStore::new(temp_dir.path().join("missing.bin"));

        assert!(store.load_all().unwrap().is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_replace_all_binary() {
        let temp_dir = TempDir::new().unwrap();
        let store = RecordStore::new(temp_dir.path().join("nested").join("records.bin"));

        store.replace_all(&sample_records()).unwrap();
        assert!(store.path().exists());

        let loaded = store.load_all().unwrap();
        assert_eq!(loaded, sample_records());
    }

    #[test]
    fn test_replace_all_json_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let store = RecordStore::new(temp_dir.path().join("records.json"));

        store.replace_all(&sample_records()).unwrap();
        let content = fs::read_to_string(store.path()).unwrap();
        assert!(content.contains("Bryant Park"));
        assert!(content.contains("saved_at"));

        // 第二次写入整体替换
        store.replace_all(&sample_records()[1..]).unwrap();
        assert_eq!(store.load_all().unwrap().len(), 1);
        assert_eq!(store.load_all().unwrap()[0].id, "uuid-2");

        // 不残留临时文件
        assert!(!temp_dir.path().join("records.json.tmp").exists());
    }

    #[test]
    fn test_explicit_format() {
        let temp_dir = TempDir::new().unwrap();
        let store = RecordStore::with_format(temp_dir.path().join("records.dat"), SerializationFormat::Json);
        assert_eq!(store.format(), SerializationFormat::Json);

        store.replace_all(&sample_records()).unwrap();
        let value: serde_json::Value =
            serde_json::from_slice(&fs::read(store.path()).unwrap()).unwrap();
        assert_eq!(value["records"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_corrupt_file_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let store = RecordStore::new(temp_dir.path().join("records.json"));
        fs::write(store.path(), b"not json").unwrap();

        assert!(matches!(store.load_all(), Err(StoreError::Json(_))));
    }
}
