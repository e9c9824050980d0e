use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

use crate::commands::CommandRegistry;
use crate::config::ServerConfig;
use crate::feed::{Geocoder, GoogleGeocoder};
use crate::server::Connection;
use crate::Result;

pub struct TcpServer<G = GoogleGeocoder> {
    config: ServerConfig,
    registry: Arc<CommandRegistry<G>>,
    connections: Arc<Semaphore>,
}

impl<G> TcpServer<G>
where
    G: Geocoder + Send + Sync + 'static,
{
    pub fn new(config: ServerConfig, registry: CommandRegistry<G>) -> Self {
        let connections = Arc::new(Semaphore::new(config.max_connections));
        Self {
            config,
            registry: Arc::new(registry),
            connections,
        }
    }

    pub async fn start(&self) -> Result<()> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let listener = TcpListener::bind(&addr).await?;

        info!("restroomfinder server listening on {}", addr);
        self.serve(listener).await
    }

    /// 在已绑定的监听器上接受连接
    pub async fn serve(&self, listener: TcpListener) -> Result<()> {
        info!("Ready to accept connections");

        loop {
            // 达到连接上限时在这里等待，而不是拒绝
            let permit = Arc::clone(&self.connections).acquire_owned().await?;

            match listener.accept().await {
                Ok((stream, addr)) => {
                    info!("Accepted connection from {}", addr);

                    // 克隆注册表引用以便在异步任务中使用
                    let registry = Arc::clone(&self.registry);

                    // 为每个连接创建一个异步任务
                    tokio::spawn(async move {
                        if let Err(e) = Self::handle_client(stream, registry).await {
                            error!("Error handling client {}: {}", addr, e);
                        }
                        drop(permit);
                    });
                }
                Err(e) => {
                    warn!("Failed to accept connection: {}", e);
                }
            }
        }
    }

    async fn handle_client(stream: TcpStream, registry: Arc<CommandRegistry<G>>) -> Result<()> {
        let mut connection = Connection::new(stream, registry);
        connection.handle().await
    }
}

impl<G> Drop for TcpServer<G> {
    fn drop(&mut self) {
        info!("TCP server shutting down");
    }
}
