pub mod client;
pub mod commands;
pub mod config;
pub mod feed;
pub mod index;
pub mod protocol;
pub mod server;
pub mod storage;

use std::error::Error;

// 重新导出主要的公共接口
pub use index::{Coordinate, DistanceResult, Record, RecordCollection};

// 重新导出常用类型，便于二进制文件使用
pub use client::{CliArgs, ClientConnection, OutputFormatter};
pub use config::FinderConfig;
pub use server::TcpServer;
pub use storage::FinderDatabase;

pub type Result<T> = std::result::Result<T, Box<dyn Error + Send + Sync>>;
