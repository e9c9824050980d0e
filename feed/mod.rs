pub mod decode;
pub mod fetch;
pub mod geocode;
pub mod refresh;

pub use decode::{decode_rows, DecodedRows, RawRecord};
pub use fetch::{FeedClient, DEFAULT_FEED_URL};
pub use geocode::{format_address, Geocoder, GoogleGeocoder, DEFAULT_GEOCODE_ENDPOINT};
pub use refresh::{RefreshReport, Refresher};

use crate::storage::StoreError;

/// 数据刷新相关的错误类型
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    /// HTTP 请求错误
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// 非 2xx 响应
    #[error("unexpected HTTP status {0}")]
    Status(reqwest::StatusCode),

    /// JSON 解析错误
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// 无法解码的数据行（包含行号和原因）
    #[error("invalid feed row {row}: {reason}")]
    InvalidRow { row: usize, reason: String },

    /// 地理编码没有结果
    #[error("no geocoding result for '{0}'")]
    NoGeocodeResult(String),

    /// 地理编码服务返回的错误状态
    #[error("geocoder returned status {0}")]
    GeocodeStatus(String),

    /// 刷新后没有任何可索引的记录
    #[error("feed produced no indexable records")]
    Empty,

    /// 持久化错误
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// 后台任务失败
    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::collections::HashMap;
    use std::future::Future;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::{FeedError, Geocoder};
    use crate::index::Coordinate;

    /// 按地址查表的地理编码器
    pub struct TableGeocoder {
        table: HashMap<String, Coordinate>,
    }

    impl TableGeocoder {
        /// `entries` 中的名称按 "name, Loc, Manhattan" 拼成地址
        pub fn new(entries: &[(&str, f64, f64)]) -> Self {
            let table = entries
                .iter()
                .map(|(name, lat, lng)| {
                    (format!("{}, Loc, Manhattan", name), Coordinate::new(*lat, *lng))
                })
                .collect();
            Self { table }
        }
    }

    impl Geocoder for TableGeocoder {
        fn locate(&self, address: &str) -> impl Future<Output = Result<Coordinate, FeedError>> + Send {
            let found = self
                .table
                .get(address)
                .copied()
                .ok_or_else(|| FeedError::NoGeocodeResult(address.to_string()));
            async move { found }
        }
    }

    /// 启动只响应一次的 HTTP 服务，返回其 URL
    pub async fn serve_once(status: &str, body: String) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let status = status.to_string();

        tokio::spawn(async move {
            if let Ok((mut stream, _)) = listener.accept().await {
                let mut request = vec![0u8; 8192];
                let _ = stream.read(&mut request).await;

                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = stream.write_all(response.as_bytes()).await;
                let _ = stream.shutdown().await;
            }
        });

        format!("http://{}/rows.json", addr)
    }
}
