use std::time::Duration;
use tracing::debug;

use super::decode::{decode_rows, DecodedRows};
use super::FeedError;

/// NYC Open Data 公共卫生间数据集
pub const DEFAULT_FEED_URL: &str = "https://data.cityofnewyork.us/api/views/hjae-yuav/rows.json";

/// 数据源客户端
#[derive(Debug, Clone)]
pub struct FeedClient {
    client: reqwest::Client,
    url: String,
}

impl FeedClient {
    /// 创建客户端，`timeout` 作用于整个请求（含读取响应体）
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, FeedError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, url))
    }

    pub fn with_client(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// 底层 HTTP 客户端，可与地理编码共用连接池
    pub fn http_client(&self) -> &reqwest::Client {
        &self.client
    }

    /// 下载原始数据
    pub async fn fetch(&self) -> Result<Vec<u8>, FeedError> {
        let response = self.client.get(&self.url).send().await?;
        if !response.status().is_success() {
            return Err(FeedError::Status(response.status()));
        }

        let body = response.bytes().await?;
        debug!("Fetched {} bytes from {}", body.len(), self.url);
        Ok(body.to_vec())
    }

    /// 下载并解码
    pub async fn fetch_rows(&self) -> Result<DecodedRows, FeedError> {
        let body = self.fetch().await?;
        decode_rows(&body)
    }
}
