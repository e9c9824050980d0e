use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::{debug, info, warn};

use crate::commands::CommandRegistry;
use crate::feed::{Geocoder, GoogleGeocoder};
use crate::protocol::parser::RespValue;
use crate::protocol::{parse_frame, RespResponse};
use crate::Result;

/// 未成帧数据的缓冲上限
pub(crate) const MAX_PENDING_BYTES: usize = 1024 * 1024;

/// 单个客户端连接
///
/// 读取的数据先进入缓冲区，每凑齐一帧就执行一条命令，
/// 不完整的帧留在缓冲区等待后续数据。
pub struct Connection<G = GoogleGeocoder> {
    stream: TcpStream,
    registry: Arc<CommandRegistry<G>>,
    buffer: Vec<u8>,
}

impl<G> Connection<G>
where
    G: Geocoder + Send + Sync + 'static,
{
    pub fn new(stream: TcpStream, registry: Arc<CommandRegistry<G>>) -> Self {
        Self {
            stream,
            registry,
            buffer: Vec::with_capacity(4096),
        }
    }

    pub async fn handle(&mut self) -> Result<()> {
        let peer_addr = self.stream.peer_addr()?;
        debug!("Serving connection from {}", peer_addr);

        let mut temp_buffer = [0u8; 4096];
        loop {
            let bytes_read = self.stream.read(&mut temp_buffer).await?;
            if bytes_read == 0 {
                if !self.buffer.is_empty() {
                    warn!(
                        "Connection from {} closed with {} unparsed bytes",
                        peer_addr,
                        self.buffer.len()
                    );
                }
                break;
            }
            self.buffer.extend_from_slice(&temp_buffer[..bytes_read]);

            if !self.process_frames().await? {
                break;
            }

            if self.buffer.len() > MAX_PENDING_BYTES {
                warn!(
                    "Connection from {} sent {} bytes without a complete frame",
                    peer_addr,
                    self.buffer.len()
                );
                let response = RespResponse::error(&format!(
                    "ERR protocol error: request exceeds {} bytes",
                    MAX_PENDING_BYTES
                ));
                self.stream.write_all(response.as_bytes()).await?;
                break;
            }
        }

        info!("Connection with {} closed", peer_addr);
        Ok(())
    }

    /// 执行缓冲区中所有完整的帧；返回 false 表示连接应关闭
    async fn process_frames(&mut self) -> Result<bool> {
        loop {
            let (frame, used) = match parse_frame(&self.buffer) {
                Ok(Some(parsed)) => parsed,
                Ok(None) => return Ok(true),
                Err(e) => {
                    // 协议错误后无法再对齐帧边界，直接断开
                    let response = RespResponse::error(&format!("ERR protocol error: {}", e));
                    self.stream.write_all(response.as_bytes()).await?;
                    return Ok(false);
                }
            };
            self.buffer.drain(..used);
            debug!("Parsed command: {:?}", frame);

            let (response, quit) = self.execute_frame(frame).await;
            self.stream.write_all(response.as_bytes()).await?;
            debug!("Sent response: {}", response.trim_end());

            if quit {
                return Ok(false);
            }
        }
    }

    async fn execute_frame(&self, frame: RespValue) -> (String, bool) {
        let items = match frame {
            RespValue::Array(Some(items)) if !items.is_empty() => items,
            _ => return (RespResponse::error("ERR invalid command format"), false),
        };

        let name = match items[0].as_str() {
            Some(name) => name.to_string(),
            None => return (RespResponse::error("ERR invalid command format"), false),
        };

        let response = match self.registry.execute(&name, &items[1..]).await {
            Ok(response) => response,
            Err(e) => {
                warn!("Command {} failed: {}", name, e);
                RespResponse::error(&format!("ERR {}", e))
            }
        };
        (response, name.eq_ignore_ascii_case("QUIT"))
    }
}
