use std::io::{Read, Write};
use std::net::TcpStream;
use std::time::Duration;

use crate::protocol::parser::RespValue;
use crate::protocol::RespParser;
use crate::Result;

pub struct ClientConnection {
    stream: Option<TcpStream>,
    host: String,
    port: u16,
    timeout: Duration,
}

impl ClientConnection {
    pub fn new(host: &str, port: u16, timeout: Duration) -> Self {
        Self {
            stream: None,
            host: host.to_string(),
            port,
            timeout,
        }
    }

    pub fn connect(&mut self) -> Result<()> {
        let addr = format!("{}:{}", self.host, self.port);
        let stream = TcpStream::connect(&addr)?;
        stream.set_read_timeout(Some(self.timeout))?;
        self.stream = Some(stream);
        Ok(())
    }

    pub fn send_command(&mut self, cmd: &[String]) -> Result<RespValue> {
        if self.stream.is_none() {
            self.connect()?;
        }
        let stream = self.stream.as_mut().ok_or("connection not established")?;

        stream.write_all(Self::build_resp_command(cmd).as_bytes())?;

        // 读到一个完整的帧为止
        let parser = RespParser::new();
        let mut buffer = Vec::new();
        let mut temp = [0; 4096];

        loop {
            let n = stream.read(&mut temp)?;
            if n == 0 {
                self.stream = None;
                return Err("Connection closed by server".into());
            }
            buffer.extend_from_slice(&temp[..n]);

            if let Some((response, _)) = parser.parse_frame(&buffer)? {
                return Ok(response);
            }
        }
    }

    pub fn disconnect(&mut self) -> Result<()> {
        if let Some(stream) = self.stream.take() {
            stream.shutdown(std::net::Shutdown::Both)?;
        }
        Ok(())
    }

    pub fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    fn build_resp_command(cmd: &[String]) -> String {
        let mut result = format!("*{}\r\n", cmd.len());
        for arg in cmd {
            result.push_str(&format!("${}\r\n{}\r\n", arg.len(), arg));
        }
        result
    }
}
