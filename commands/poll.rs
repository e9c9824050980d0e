use std::future::Future;
use std::sync::Arc;
use tracing::error;

use crate::commands::Command;
use crate::feed::{Geocoder, GoogleGeocoder, Refresher};
use crate::protocol::parser::RespValue;
use crate::protocol::RespResponse;
use crate::Result;

/// POLL：立即执行一次完整刷新
pub struct PollCommand<G = GoogleGeocoder> {
    refresher: Arc<Refresher<G>>,
}

impl<G> PollCommand<G> {
    pub fn new(refresher: Arc<Refresher<G>>) -> Self {
        Self { refresher }
    }
}

impl<G> Command for PollCommand<G>
where
    G: Geocoder + Send + Sync + 'static,
{
    fn name(&self) -> &'static str {
        "POLL"
    }

    fn execute(&self, args: &[RespValue]) -> impl Future<Output = Result<String>> + Send {
        let refresher = Arc::clone(&self.refresher);
        let arg_count = args.len();

        async move {
            if arg_count != 0 {
                return Ok(RespResponse::error(
                    "ERR wrong number of arguments for 'poll' command",
                ));
            }

            match refresher.refresh().await {
                Ok(report) => Ok(RespResponse::integer(report.indexed as i64)),
                Err(e) => {
                    error!("Refresh failed: {}", e);
                    Ok(RespResponse::error(&format!("ERR refresh failed: {}", e)))
                }
            }
        }
    }
}

/// RELOAD：从本地存储重建快照
pub struct ReloadCommand<G = GoogleGeocoder> {
    refresher: Arc<Refresher<G>>,
}

impl<G> ReloadCommand<G> {
    pub fn new(refresher: Arc<Refresher<G>>) -> Self {
        Self { refresher }
    }
}

impl<G> Command for ReloadCommand<G>
where
    G: Geocoder + Send + Sync + 'static,
{
    fn name(&self) -> &'static str {
        "RELOAD"
    }

    fn execute(&self, _args: &[RespValue]) -> impl Future<Output = Result<String>> + Send {
        let refresher = Arc::clone(&self.refresher);

        async move {
            match refresher.load_from_store().await {
                Ok(Some(count)) => Ok(RespResponse::integer(count as i64)),
                Ok(None) => Ok(RespResponse::error("ERR no restroom data stored")),
                Err(e) => Ok(RespResponse::error(&format!("ERR reload failed: {}", e))),
            }
        }
    }
}
