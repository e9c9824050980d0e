use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::decode::RawRecord;
use super::fetch::FeedClient;
use super::geocode::{Geocoder, GoogleGeocoder};
use super::FeedError;
use crate::index::{Record, RecordCollection};
use crate::storage::{FinderDatabase, RecordStore};

/// 一次刷新的统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshReport {
    /// 数据源中的行数
    pub fetched: usize,
    /// 写入新快照的记录数
    pub indexed: usize,
    /// 解码、地理编码或坐标校验失败而跳过的行数
    pub skipped: usize,
}

/// 刷新流程：下载 -> 解码 -> 地理编码 -> 持久化 -> 发布快照
///
/// 同一时间只允许一个刷新在执行；查询不受影响，
/// 新快照在完整构建后才会被发布。
pub struct Refresher<G = GoogleGeocoder> {
    feed: FeedClient,
    geocoder: G,
    store: Arc<RecordStore>,
    database: Arc<FinderDatabase>,
    running: Mutex<()>,
}

impl<G> Refresher<G>
where
    G: Geocoder + Send + Sync,
{
    pub fn new(
        feed: FeedClient,
        geocoder: G,
        store: Arc<RecordStore>,
        database: Arc<FinderDatabase>,
    ) -> Self {
        Self {
            feed,
            geocoder,
            store,
            database,
            running: Mutex::new(()),
        }
    }

    pub fn database(&self) -> &Arc<FinderDatabase> {
        &self.database
    }

    pub fn store(&self) -> &Arc<RecordStore> {
        &self.store
    }

    /// 完整刷新一次
    pub async fn refresh(&self) -> Result<RefreshReport, FeedError> {
        let _guard = self.running.lock().await;
        info!("Refreshing restroom data from {}", self.feed.url());

        let decoded = self.feed.fetch_rows().await?;
        let mut report = self.apply(decoded.records).await?;
        report.fetched += decoded.skipped;
        report.skipped += decoded.skipped;

        info!(
            "Refresh finished: {} fetched, {} indexed, {} skipped",
            report.fetched, report.indexed, report.skipped
        );
        Ok(report)
    }

    /// 处理已解码的原始记录（刷新的后半段）
    pub async fn ingest(&self, raw: Vec<RawRecord>) -> Result<RefreshReport, FeedError> {
        let _guard = self.running.lock().await;
        self.apply(raw).await
    }

    /// 从持久化存储重建快照
    ///
    /// 存储为空时返回 `None`，当前快照保持不变
    pub async fn load_from_store(&self) -> Result<Option<usize>, FeedError> {
        let _guard = self.running.lock().await;

        let store = Arc::clone(&self.store);
        let records = tokio::task::spawn_blocking(move || store.load_all()).await??;
        if records.is_empty() {
            info!("No stored records in {}", self.store.path().display());
            return Ok(None);
        }

        let collection = RecordCollection::from_records(records);
        Ok(Some(self.database.publish(collection).await))
    }

    async fn apply(&self, raw: Vec<RawRecord>) -> Result<RefreshReport, FeedError> {
        let mut report = RefreshReport {
            fetched: raw.len(),
            ..Default::default()
        };

        let mut records: Vec<Record> = Vec::with_capacity(raw.len());
        for (i, item) in raw.into_iter().enumerate() {
            let address = item.address();
            let coordinate = match self.geocoder.locate(&address).await {
                Ok(coordinate) => coordinate,
                Err(e) => {
                    warn!("Skipping '{}': {}", address, e);
                    report.skipped += 1;
                    continue;
                }
            };

            if !coordinate.is_valid() {
                warn!("Skipping '{}': invalid coordinate {}", address, coordinate);
                report.skipped += 1;
                continue;
            }

            records.push(item.into_record(coordinate));
            debug!("Completed {}", i + 1);
        }

        // 数据源异常时保留旧数据，不用空集合覆盖
        if records.is_empty() {
            return Err(FeedError::Empty);
        }

        let store = Arc::clone(&self.store);
        let to_save = records.clone();
        tokio::task::spawn_blocking(move || store.replace_all(&to_save)).await??;

        report.indexed = self
            .database
            .publish(RecordCollection::from_records(records))
            .await;
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::test_support::TableGeocoder;
    use crate::index::Coordinate;
    use std::time::Duration;
    use tempfile::TempDir;

    fn raw(id: &str, name: &str) -> RawRecord {
        RawRecord {
            id: id.to_string(),
            name: name.to_string(),
            location: "Loc".to_string(),
            borough: "Manhattan".to_string(),
            handicap_ok: true,
            open_all_year: false,
            created_at: 1,
            updated_at: 2,
        }
    }

    fn refresher(temp_dir: &TempDir, table: &[(&str, f64, f64)]) -> Refresher<TableGeocoder> {
        Refresher::new(
            FeedClient::new("http://127.0.0.1:1/rows.json", Duration::from_secs(1)).unwrap(),
            TableGeocoder::new(table),
            Arc::new(RecordStore::new(temp_dir.path().join("records.bin"))),
            Arc::new(FinderDatabase::new()),
        )
    }

    #[tokio::test]
    async fn test_ingest_publishes_and_persists() {
        let temp_dir = TempDir::new().unwrap();
        let refresher = refresher(
            &temp_dir,
            &[("North", 41.0, -74.0), ("South", 40.0, -73.0), ("Bad", 95.0, 0.0)],
        );

        let report = refresher
            .ingest(vec![
                raw("n", "North"),
                raw("s", "South"),
                raw("u", "Unknown"),
                raw("b", "Bad"),
            ])
            .await
            .unwrap();

        assert_eq!(
            report,
            RefreshReport {
                fetched: 4,
                indexed: 2,
                skipped: 2
            }
        );

        let snapshot = refresher.database().snapshot().await.unwrap();
        let ids: Vec<&str> = snapshot.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["s", "n"]);

        let stored = refresher.store().load_all().unwrap();
        assert_eq!(stored.len(), 2);
        assert!(stored.iter().all(|r| r.handicap_ok && r.updated_at == 2));
    }

    #[tokio::test]
    async fn test_empty_ingest_keeps_previous_snapshot() {
        let temp_dir = TempDir::new().unwrap();
        let refresher = refresher(&temp_dir, &[("North", 41.0, -74.0)]);

        refresher.ingest(vec![raw("n", "North")]).await.unwrap();
        let result = refresher.ingest(vec![raw("u", "Unknown")]).await;

        assert!(matches!(result, Err(FeedError::Empty)));
        assert_eq!(refresher.database().stats().await.record_count, 1);
        assert_eq!(refresher.store().load_all().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_load_from_store() {
        let temp_dir = TempDir::new().unwrap();
        let refresher = refresher(&temp_dir, &[]);

        // 存储为空
        assert_eq!(refresher.load_from_store().await.unwrap(), None);
        assert!(!refresher.database().is_loaded().await);

        refresher
            .store()
            .replace_all(&[
                Record::new("a", "A", Coordinate::new(40.0, -73.0)),
                Record::new("b", "B", Coordinate::new(40.5, -73.5)),
            ])
            .unwrap();

        assert_eq!(refresher.load_from_store().await.unwrap(), Some(2));
        let results = refresher
            .database()
            .closest(&Coordinate::new(40.4, -73.4), 1)
            .await;
        assert_eq!(results[0].record.id, "b");
    }

    #[tokio::test]
    async fn test_refresh_fetch_failure_leaves_database_untouched() {
        let temp_dir = TempDir::new().unwrap();
        let refresher = refresher(&temp_dir, &[]);

        assert!(matches!(refresher.refresh().await, Err(FeedError::Http(_))));
        assert!(!refresher.database().is_loaded().await);
    }

    #[tokio::test]
    async fn test_refresh_from_feed() {
        use crate::feed::test_support::serve_once;
        use serde_json::json;

        let body = json!({
            "data": [
                [1, "n", 1, 10, "", 20, "", null, "North", "Loc", "yes", "no", "Manhattan"],
                [2, "s", 1, 10, "", 20, "", null, "South", "Loc", "no", "yes", "Manhattan"],
                [3, null]
            ]
        })
        .to_string();
        let url = serve_once("200 OK", body).await;

        let temp_dir = TempDir::new().unwrap();
        let refresher = Refresher::new(
            FeedClient::new(url, Duration::from_secs(5)).unwrap(),
            TableGeocoder::new(&[("North", 41.0, -74.0), ("South", 40.0, -73.0)]),
            Arc::new(RecordStore::new(temp_dir.path().join("records.json"))),
            Arc::new(FinderDatabase::new()),
        );

        let report = refresher.refresh().await.unwrap();
        assert_eq!(
            report,
            RefreshReport {
                fetched: 3,
                indexed: 2,
                skipped: 1
            }
        );

        let results = refresher
            .database()
            .closest(&Coordinate::new(40.1, -73.1), 1)
            .await;
        assert_eq!(results[0].record.name, "South");
        assert!(results[0].record.handicap_ok);
        assert!(!results[0].record.open_all_year);
    }
}
