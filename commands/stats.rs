use std::future::Future;
use std::sync::Arc;
use std::time::UNIX_EPOCH;

use crate::commands::Command;
use crate::protocol::parser::RespValue;
use crate::protocol::RespResponse;
use crate::storage::FinderDatabase;
use crate::Result;

/// STATS：快照状态，返回键值对数组
pub struct StatsCommand {
    database: Arc<FinderDatabase>,
}

impl StatsCommand {
    pub fn new(database: Arc<FinderDatabase>) -> Self {
        Self { database }
    }
}

impl Command for StatsCommand {
    fn name(&self) -> &'static str {
        "STATS"
    }

    fn execute(&self, _args: &[RespValue]) -> impl Future<Output = Result<String>> + Send {
        let database = Arc::clone(&self.database);

        async move {
            let stats = database.stats().await;

            // 发布时间为 Unix 秒，未加载时为 null
            let published_at = match stats.published_at {
                Some(at) => RespValue::Integer(
                    at.duration_since(UNIX_EPOCH)
                        .map(|d| d.as_secs() as i64)
                        .unwrap_or(0),
                ),
                None => RespValue::BulkString(None),
            };

            let values = vec![
                RespValue::BulkString(Some("loaded".to_string())),
                RespValue::Integer(stats.loaded as i64),
                RespValue::BulkString(Some("records".to_string())),
                RespValue::Integer(stats.record_count as i64),
                RespValue::BulkString(Some("published_at".to_string())),
                published_at,
            ];
            Ok(RespResponse::array(Some(&values)))
        }
    }
}
