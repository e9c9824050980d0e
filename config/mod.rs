use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::feed::{DEFAULT_FEED_URL, DEFAULT_GEOCODE_ENDPOINT};
use crate::storage::{RecordStore, SerializationFormat};

/// restroomfinder 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinderConfig {
    /// 服务器配置
    pub server: ServerConfig,

    /// 数据源配置
    pub feed: FeedConfig,

    /// 地理编码配置
    pub geocoder: GeocoderConfig,

    /// 存储配置
    pub storage: StorageConfig,

    /// 日志配置
    pub logging: LoggingConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,

    /// 最大并发连接数
    #[serde(default = "default_max_connections")]
    pub max_connections: usize,
}

/// 数据源配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// 数据集地址
    #[serde(default = "default_feed_url")]
    pub url: String,

    /// 下载超时（秒）
    #[serde(default = "default_poll_timeout")]
    pub poll_timeout_secs: u64,

    /// 自动刷新间隔（秒），0 表示只在 POLL 时刷新
    #[serde(default)]
    pub refresh_interval_secs: u64,

    /// 启动时是否立即刷新
    #[serde(default)]
    pub refresh_on_startup: bool,
}

/// 地理编码配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocoderConfig {
    /// Geocoding API 地址
    #[serde(default = "default_geocode_endpoint")]
    pub endpoint: String,

    /// API key；未配置时读取 GOOGLE_GEOCODE_API_KEY
    pub api_key: Option<String>,
}

/// 存储配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// 记录文件（.json 为 JSON，其余为二进制）
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,

    /// 序列化格式：auto（按扩展名）, json, binary
    #[serde(default = "default_storage_format")]
    pub format: String,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// 日志级别：trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 日志输出：stdout, file
    #[serde(default = "default_log_output")]
    pub output: String,

    /// 日志文件路径（当 output = file 时）
    pub log_file: Option<PathBuf>,
}

// ============================================================================
// 默认值函数
// ============================================================================

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    9851
}

fn default_max_connections() -> usize {
    1024
}

fn default_feed_url() -> String {
    DEFAULT_FEED_URL.to_string()
}

fn default_poll_timeout() -> u64 {
    30
}

fn default_geocode_endpoint() -> String {
    DEFAULT_GEOCODE_ENDPOINT.to_string()
}

fn default_data_file() -> PathBuf {
    PathBuf::from("./data/restrooms.bin")
}

fn default_storage_format() -> String {
    "auto".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_output() -> String {
    "stdout".to_string()
}

// ============================================================================
// 实现
// ============================================================================

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: default_host(),
                port: default_port(),
                max_connections: default_max_connections(),
            },
            feed: FeedConfig {
                url: default_feed_url(),
                poll_timeout_secs: default_poll_timeout(),
                refresh_interval_secs: 0,
                refresh_on_startup: false,
            },
            geocoder: GeocoderConfig {
                endpoint: default_geocode_endpoint(),
                api_key: None,
            },
            storage: StorageConfig {
                data_file: default_data_file(),
                format: default_storage_format(),
            },
            logging: LoggingConfig {
                level: default_log_level(),
                output: default_log_output(),
                log_file: None,
            },
        }
    }
}

impl FinderConfig {
    /// 从文件加载配置
    ///
    /// 配置加载顺序（优先级从低到高）：
    /// 1. 默认配置（内嵌的 default.toml）
    /// 2. 用户配置文件（可选）
    /// 3. 环境变量（RESTROOMFINDER__ 前缀，使用双下划线分隔嵌套）
    ///
    /// # 示例
    ///
    /// ```no_run
    /// use restroomfinder::config::FinderConfig;
    ///
    /// let config = FinderConfig::from_file("restroomfinder.toml").unwrap();
    /// ```
    pub fn from_file(path: &str) -> crate::Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from_str(
                include_str!("default.toml"),
                config::FileFormat::Toml,
            ))
            .add_source(
                config::File::with_name(path)
                    .format(config::FileFormat::Toml)
                    .required(false),
            )
            .add_source(config::Environment::with_prefix("RESTROOMFINDER").separator("__"))
            .build()
            .map_err(|e| format!("Failed to load config: {}", e))?;

        let mut config: FinderConfig = settings
            .try_deserialize()
            .map_err(|e| format!("Failed to parse config: {}", e))?;

        if config.geocoder.api_key.is_none() {
            config.geocoder.api_key = std::env::var("GOOGLE_GEOCODE_API_KEY").ok();
        }

        Ok(config)
    }

    /// 保存配置到文件
    pub fn save_to_file(&self, path: &str) -> crate::Result<()> {
        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;
        std::fs::write(path, toml_string)
            .map_err(|e| format!("Failed to write config file: {}", e))?;
        Ok(())
    }

    pub fn poll_timeout(&self) -> Duration {
        Duration::from_secs(self.feed.poll_timeout_secs)
    }

    /// 自动刷新间隔；未启用时为 None
    pub fn refresh_interval(&self) -> Option<Duration> {
        match self.feed.refresh_interval_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    /// 验证配置
    ///
    /// 检查配置的合法性，包括：
    /// - 端口范围
    /// - 日志级别与输出
    /// - 下载超时
    /// - 数据目录
    pub fn validate(&self) -> Result<(), String> {
        // 验证端口（非特权端口）
        if self.server.port < 1024 {
            return Err(format!(
                "Server port {} is below 1024 (privileged range)",
                self.server.port
            ));
        }

        if self.server.max_connections == 0 {
            return Err("max_connections must be greater than 0".to_string());
        }

        if self.feed.poll_timeout_secs == 0 {
            return Err("poll_timeout_secs must be greater than 0".to_string());
        }

        // 验证日志级别
        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(format!(
                    "Invalid log level: '{}'. Must be one of: trace, debug, info, warn, error",
                    self.logging.level
                ))
            }
        }

        match self.logging.output.as_str() {
            "stdout" => {}
            "file" if self.logging.log_file.is_some() => {}
            "file" => {
                return Err("Log output is 'file' but log_file path is not specified".to_string())
            }
            other => {
                return Err(format!(
                    "Invalid log output: '{}'. Must be one of: stdout, file",
                    other
                ))
            }
        }

        SerializationFormat::from_name(&self.storage.format)?;

        // 验证数据目录（尝试创建）
        if let Some(dir) = self.storage.data_file.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                std::fs::create_dir_all(dir).map_err(|e| {
                    format!("Failed to create data directory '{}': {}", dir.display(), e)
                })?;
            }
        }

        Ok(())
    }

    /// 按存储配置创建记录存储
    pub fn record_store(&self) -> Result<RecordStore, String> {
        let path = self.storage.data_file.clone();
        Ok(match SerializationFormat::from_name(&self.storage.format)? {
            Some(format) => RecordStore::with_format(path, format),
            None => RecordStore::new(path),
        })
    }

    /// 打印配置摘要
    pub fn print_summary(&self) {
        println!("📋 restroomfinder Configuration:");
        println!("   Server:      {}:{}", self.server.host, self.server.port);
        println!("   Max Connections: {}", self.server.max_connections);
        println!();
        println!("   Feed URL:    {}", self.feed.url);
        println!("   Poll Timeout: {} seconds", self.feed.poll_timeout_secs);
        match self.refresh_interval() {
            Some(interval) => println!("   Auto Refresh: every {} seconds", interval.as_secs()),
            None => println!("   Auto Refresh: disabled"),
        }
        println!(
            "   Geocoder:    {} ({})",
            self.geocoder.endpoint,
            if self.geocoder.api_key.is_some() {
                "key configured"
            } else {
                "no key"
            }
        );
        println!();
        println!("   Data File:   {}", self.storage.data_file.display());
        println!("   Format:      {}", self.storage.format);
        println!();
        println!("   Log Level:   {}", self.logging.level);
        println!("   Log Output:  {}", self.logging.output);
        if let Some(ref log_file) = self.logging.log_file {
            println!("   Log File:    {}", log_file.display());
        }
        println!();
    }
}
