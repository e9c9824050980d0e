use clap::Parser;
use restroomfinder::commands::CommandRegistry;
use restroomfinder::feed::{FeedClient, GoogleGeocoder, Refresher};
use restroomfinder::server::{spawn_refresh_task, TcpServer};
use restroomfinder::storage::FinderDatabase;
use restroomfinder::{FinderConfig, Result};
use std::sync::Arc;
use tracing::{debug, info, warn, Level};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// 配置文件路径
    #[arg(short, long, default_value = "restroomfinder.toml")]
    config: String,

    /// 生成默认配置文件并退出
    #[arg(long)]
    generate_config: bool,

    /// Host to bind to (overrides config file)
    #[arg(long)]
    host: Option<String>,

    /// Port to bind to (overrides config file)
    #[arg(short, long)]
    port: Option<u16>,

    /// Log level (overrides config file)
    #[arg(long)]
    log_level: Option<String>,

    /// Refresh from the feed once at startup (overrides config file)
    #[arg(long)]
    poll_on_start: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // 生成默认配置文件
    if args.generate_config {
        let config = FinderConfig::default();
        config.save_to_file(&args.config)?;
        println!("✅ Generated default configuration: {}", args.config);
        println!("📝 You can edit this file and restart the server.");
        return Ok(());
    }

    // 加载配置
    let mut config = FinderConfig::from_file(&args.config)?;

    // 命令行参数覆盖配置文件
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(log_level) = args.log_level {
        config.logging.level = log_level;
    }
    if args.poll_on_start {
        config.feed.refresh_on_startup = true;
    }

    // 验证配置
    config.validate()?;

    // 初始化日志系统
    init_logging(&config.logging)?;

    info!("🚀 Starting restroomfinder server...");
    info!("📦 Version: {}", env!("CARGO_PKG_VERSION"));
    println!();

    // 打印配置摘要
    config.print_summary();

    if config.geocoder.api_key.is_none() {
        warn!("⚠️  No geocoding API key configured, POLL will likely fail");
    }

    // 组装数据刷新链路，数据源与地理编码共用一个 HTTP 客户端
    let feed = FeedClient::new(config.feed.url.clone(), config.poll_timeout())?;
    let geocoder = GoogleGeocoder::new(
        feed.http_client().clone(),
        config.geocoder.endpoint.clone(),
        config.geocoder.api_key.clone(),
    );
    let store = Arc::new(config.record_store()?);
    debug!("Record store {} ({:?})", store.path().display(), store.format());
    let database = Arc::new(FinderDatabase::new());
    let refresher = Arc::new(Refresher::new(feed, geocoder, store, database));

    // 从本地存储恢复上次的数据
    match refresher.load_from_store().await {
        Ok(Some(count)) => info!("📖 Restored {} records from {}", count, config.storage.data_file.display()),
        Ok(None) => info!("⚠️  No stored records yet, run POLL to load restroom data"),
        Err(e) => warn!("⚠️  Failed to restore stored records: {}", e),
    }

    if config.feed.refresh_on_startup {
        let refresher = Arc::clone(&refresher);
        tokio::spawn(async move {
            match refresher.refresh().await {
                Ok(report) => info!("✅ Startup refresh indexed {} records", report.indexed),
                Err(e) => warn!("⚠️  Startup refresh failed: {}", e),
            }
        });
    }

    if let Some(period) = config.refresh_interval() {
        spawn_refresh_task(Arc::clone(&refresher), period);
    }

    info!(
        "🌐 Server listening on {}:{}",
        config.server.host, config.server.port
    );
    println!();

    let server = TcpServer::new(config.server.clone(), CommandRegistry::new(refresher));
    server.start().await?;

    Ok(())
}

/// 初始化日志系统
fn init_logging(config: &restroomfinder::config::LoggingConfig) -> Result<()> {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let filter = match config.level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };
    let filter = tracing_subscriber::filter::LevelFilter::from_level(filter);

    match (config.output.as_str(), &config.log_file) {
        ("file", Some(log_file)) => {
            // 确保日志目录存在
            if let Some(parent) = log_file.parent() {
                std::fs::create_dir_all(parent)?;
            }

            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(log_file)?;

            tracing_subscriber::registry()
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(file)
                        .with_ansi(false)
                        .with_target(false),
                )
                .with(filter)
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(tracing_subscriber::fmt::layer().with_target(false))
                .with(filter)
                .init();
        }
    }

    Ok(())
}
