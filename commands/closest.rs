use std::future::Future;
use std::sync::Arc;

use crate::commands::{ArgumentParser, Command};
use crate::index::DistanceResult;
use crate::protocol::parser::RespValue;
use crate::protocol::RespResponse;
use crate::storage::{result_to_geojson, FinderDatabase};
use crate::Result;

/// CLOSEST POINT lat lng COUNT k [GEOJSON]
pub struct ClosestCommand {
    database: Arc<FinderDatabase>,
}

impl ClosestCommand {
    pub fn new(database: Arc<FinderDatabase>) -> Self {
        Self { database }
    }
}

/// 单行结果："名称,纬度,经度,距离 miles"
pub fn format_result_line(result: &DistanceResult) -> String {
    format!(
        "{},{:.6},{:.6},{:.2} miles",
        result.record.name,
        result.record.coordinate.latitude,
        result.record.coordinate.longitude,
        result.distance
    )
}

impl Command for ClosestCommand {
    fn name(&self) -> &'static str {
        "CLOSEST"
    }

    fn execute(&self, args: &[RespValue]) -> impl Future<Output = Result<String>> + Send {
        let database = Arc::clone(&self.database);

        // 同步解析参数
        let parse_result = ArgumentParser::new(args, "CLOSEST").parse_closest_args();

        async move {
            let parsed = match parse_result {
                Ok(parsed) => parsed,
                Err(err_msg) => return Ok(RespResponse::error(&err_msg)),
            };

            if !database.is_loaded().await {
                return Ok(RespResponse::error(
                    "ERR no restroom data loaded, run POLL first",
                ));
            }

            let results = database.closest(&parsed.target, parsed.k()).await;

            let lines = if parsed.geojson {
                results
                    .iter()
                    .map(result_to_geojson)
                    .collect::<Result<Vec<_>>>()?
            } else {
                results.iter().map(format_result_line).collect()
            };

            Ok(RespResponse::string_array(&lines))
        }
    }
}
