use regex::{Captures, Regex};
use serde::Deserialize;
use std::future::Future;
use std::sync::OnceLock;
use tracing::debug;

use super::FeedError;
use crate::index::Coordinate;

pub const DEFAULT_GEOCODE_ENDPOINT: &str = "https://maps.googleapis.com/maps/api/geocode/json";

/// 地址 -> 坐标
pub trait Geocoder {
    fn locate(&self, address: &str) -> impl Future<Output = Result<Coordinate, FeedError>> + Send;
}

/// Google Geocoding API 客户端
#[derive(Debug, Clone)]
pub struct GoogleGeocoder {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl GoogleGeocoder {
    pub fn new(client: reqwest::Client, endpoint: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            api_key,
        }
    }
}

impl Geocoder for GoogleGeocoder {
    fn locate(&self, address: &str) -> impl Future<Output = Result<Coordinate, FeedError>> + Send {
        let query = format_address(address);
        let mut request = self.client.get(&self.endpoint).query(&[("address", query.as_str())]);
        if let Some(key) = &self.api_key {
            request = request.query(&[("key", key.as_str())]);
        }
        let address = address.to_string();

        async move {
            let response = request.send().await?;
            if !response.status().is_success() {
                return Err(FeedError::Status(response.status()));
            }

            let body: GeocodeResponse = response.json().await?;
            let coordinate = body.first_coordinate(&address)?;
            debug!("Geocoded '{}' -> {}", address, coordinate);
            Ok(coordinate)
        }
    }
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    results: Vec<GeocodeResult>,
    #[serde(default)]
    status: String,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: GeocodeGeometry,
}

#[derive(Debug, Deserialize)]
struct GeocodeGeometry {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

impl GeocodeResponse {
    /// 取第一个结果
    fn first_coordinate(&self, address: &str) -> Result<Coordinate, FeedError> {
        match self.results.first() {
            Some(result) => Ok(Coordinate::new(
                result.geometry.location.lat,
                result.geometry.location.lng,
            )),
            None if self.status.is_empty() || self.status == "OK" || self.status == "ZERO_RESULTS" => {
                Err(FeedError::NoGeocodeResult(address.to_string()))
            }
            None => Err(FeedError::GeocodeStatus(self.status.clone())),
        }
    }
}

/// 规范化地理编码查询地址
///
/// - `&` 替换为 `and`
/// - 独立的数字加上英文序数后缀（`1 Ave` -> `1st Ave`，`42 St` -> `42nd St`）
pub fn format_address(address: &str) -> String {
    static NUMBER: OnceLock<Option<Regex>> = OnceLock::new();

    let address = address.replace('&', "and");
    let number = match NUMBER.get_or_init(|| Regex::new(r"\b\d+\b").ok()) {
        Some(number) => number,
        None => return address,
    };
    number
        .replace_all(&address, |caps: &Captures| {
            let digits = &caps[0];
            match digits.parse::<u64>() {
                Ok(n) => format!("{}{}", digits, ordinal_suffix(n)),
                Err(_) => digits.to_string(),
            }
        })
        .into_owned()
}

fn ordinal_suffix(n: u64) -> &'static str {
    if (11..=13).contains(&(n % 100)) {
        return "th";
    }
    match n % 10 {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    }
}
