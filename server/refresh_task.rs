use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use crate::feed::{Geocoder, Refresher};

/// 启动后台定时刷新
///
/// 第一次刷新在一个完整间隔之后执行；失败只记录日志，旧快照继续服务。
pub fn spawn_refresh_task<G>(refresher: Arc<Refresher<G>>, period: Duration) -> JoinHandle<()>
where
    G: Geocoder + Send + Sync + 'static,
{
    info!("Auto refresh enabled every {} seconds", period.as_secs());

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
        // 刷新耗时超过间隔时不补跑
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            match refresher.refresh().await {
                Ok(report) => info!(
                    "Scheduled refresh indexed {} records ({} skipped)",
                    report.indexed, report.skipped
                ),
                Err(e) => warn!("Scheduled refresh failed: {}", e),
            }
        }
    })
}
