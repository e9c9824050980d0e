use std::sync::Arc;
use std::time::SystemTime;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::index::{Coordinate, DistanceResult, RecordCollection};

/// 已发布的快照及其发布时间
struct Published {
    collection: Arc<RecordCollection>,
    published_at: SystemTime,
}

/// 异步快照数据库
///
/// 持有当前生效的 `RecordCollection`。写入方整体替换快照（只交换 Arc），
/// 读取方拿到 Arc 后即释放锁，查询期间看到的永远是完整的旧快照或新快照。
pub struct FinderDatabase {
    // None 表示尚未加载任何数据
    current: RwLock<Option<Published>>,
}

impl Default for FinderDatabase {
    fn default() -> Self {
        Self::new()
    }
}

impl FinderDatabase {
    pub fn new() -> Self {
        Self {
            current: RwLock::new(None),
        }
    }

    /// 原子发布新快照，返回其记录数
    pub async fn publish(&self, collection: RecordCollection) -> usize {
        let count = collection.len();
        let published = Published {
            collection: Arc::new(collection),
            published_at: SystemTime::now(),
        };

        // 写锁只覆盖指针交换，旧快照由仍持有它的查询自行释放
        let mut current = self.current.write().await;
        *current = Some(published);
        drop(current);

        info!("Published snapshot with {} records", count);
        count
    }

    /// 当前快照（未加载时为 None）
    pub async fn snapshot(&self) -> Option<Arc<RecordCollection>> {
        let current = self.current.read().await;
        current.as_ref().map(|p| Arc::clone(&p.collection))
    }

    pub async fn is_loaded(&self) -> bool {
        self.current.read().await.is_some()
    }

    /// 在当前快照上查询最近的 k 条记录；未加载时返回空结果
    pub async fn closest(&self, target: &Coordinate, k: usize) -> Vec<DistanceResult> {
        // 早释放锁，查询本身是纯 CPU 计算
        let snapshot = match self.snapshot().await {
            Some(snapshot) => snapshot,
            None => return Vec::new(),
        };

        let results = snapshot.find_closest(target, k);
        debug!(
            "closest {} k={} -> {} results over {} records",
            target,
            k,
            results.len(),
            snapshot.len()
        );
        results
    }

    /// 数据库统计信息
    pub async fn stats(&self) -> DatabaseStats {
        let current = self.current.read().await;
        match current.as_ref() {
            Some(published) => DatabaseStats {
                loaded: true,
                record_count: published.collection.len(),
                published_at: Some(published.published_at),
            },
            None => DatabaseStats {
                loaded: false,
                record_count: 0,
                published_at: None,
            },
        }
    }
}

/// 数据库统计信息
#[derive(Debug, Clone)]
pub struct DatabaseStats {
    pub loaded: bool,
    pub record_count: usize,
    pub published_at: Option<SystemTime>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::Record;

    fn collection(points: &[(&str, f64, f64)]) -> RecordCollection {
        RecordCollection::from_records(
            points
                .iter()
                .map(|(id, lat, lng)| Record::new(*id, *id, Coordinate::new(*lat, *lng)))
                .collect(),
        )
    }

    #[tokio::test]
    async fn test_unloaded_database() {
        let db = FinderDatabase::new();

        assert!(!db.is_loaded().await);
        assert!(db.snapshot().await.is_none());
        assert!(db.closest(&Coordinate::new(40.0, -73.0), 5).await.is_empty());

        let stats = db.stats().await;
        assert!(!stats.loaded);
        assert_eq!(stats.record_count, 0);
        assert!(stats.published_at.is_none());
    }

    #[tokio::test]
    async fn test_publish_and_query() {
        let db = FinderDatabase::new();
        let count = db
            .publish(collection(&[("A", 40.0, -73.0), ("B", 40.5, -73.5), ("C", 41.0, -74.0)]))
            .await;
        assert_eq!(count, 3);
        assert!(db.is_loaded().await);

        let results = db.closest(&Coordinate::new(40.4, -73.4), 2).await;
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].record.id, "B");

        let stats = db.stats().await;
        assert!(stats.loaded);
        assert_eq!(stats.record_count, 3);
        assert!(stats.published_at.is_some());
    }

    #[tokio::test]
    async fn test_old_snapshot_survives_publish() {
        let db = FinderDatabase::new();
        db.publish(collection(&[("old1", 1.0, 1.0), ("old2", 2.0, 2.0)])).await;

        let held = db.snapshot().await.unwrap();
        db.publish(collection(&[("new1", 3.0, 3.0)])).await;

        // 旧快照依旧完整可用
        assert_eq!(held.len(), 2);
        assert_eq!(held.find_closest(&Coordinate::new(1.0, 1.0), 1)[0].record.id, "old1");

        let current = db.snapshot().await.unwrap();
        assert_eq!(current.len(), 1);
        assert_eq!(current.records()[0].id, "new1");
    }

    #[tokio::test]
    async fn test_concurrent_queries_during_publish() {
        let db = Arc::new(FinderDatabase::new());
        db.publish(collection(&[("a", 1.0, 1.0), ("b", 2.0, 2.0), ("c", 3.0, 3.0)]))
            .await;

        let mut handles = Vec::new();
        for i in 0..16 {
            let db = Arc::clone(&db);
            handles.push(tokio::spawn(async move {
                if i % 4 == 0 {
                    db.publish(collection(&[("x", 1.0, 1.0), ("y", 2.0, 2.0)])).await;
                    None
                } else {
                    Some(db.closest(&Coordinate::new(2.0, 2.0), 10).await.len())
                }
            }));
        }

        for handle in handles {
            if let Some(len) = handle.await.unwrap() {
                // 只可能看到完整的旧快照或新快照
                assert!(len == 3 || len == 2, "unexpected result size {}", len);
            }
        }
    }
}
