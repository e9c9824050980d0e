use std::future::Future;

use crate::commands::Command;
use crate::protocol::parser::RespValue;
use crate::protocol::response::RespResponse;
use crate::Result;

pub struct PingCommand;

impl Command for PingCommand {
    fn name(&self) -> &'static str {
        "PING"
    }

    fn execute(&self, args: &[RespValue]) -> impl Future<Output = Result<String>> + Send {
        let response = match args {
            [] => RespResponse::simple_string("PONG"),
            [message] => match message.as_str() {
                Some(msg) => RespResponse::bulk_string(Some(msg)),
                None => RespResponse::error("ERR wrong argument type"),
            },
            _ => RespResponse::error("ERR wrong number of arguments for 'ping' command"),
        };
        async move { Ok(response) }
    }
}

pub struct HelloCommand;

impl Command for HelloCommand {
    fn name(&self) -> &'static str {
        "HELLO"
    }

    fn execute(&self, _args: &[RespValue]) -> impl Future<Output = Result<String>> + Send {
        let info = vec![
            RespValue::BulkString(Some("server".to_string())),
            RespValue::BulkString(Some("restroomfinder".to_string())),
            RespValue::BulkString(Some("version".to_string())),
            RespValue::BulkString(Some(env!("CARGO_PKG_VERSION").to_string())),
            RespValue::BulkString(Some("proto".to_string())),
            RespValue::Integer(2),
        ];
        async move { Ok(RespResponse::array(Some(&info))) }
    }
}

/// 连接在回复后由服务端关闭
pub struct QuitCommand;

impl Command for QuitCommand {
    fn name(&self) -> &'static str {
        "QUIT"
    }

    fn execute(&self, _args: &[RespValue]) -> impl Future<Output = Result<String>> + Send {
        async move { Ok(RespResponse::ok()) }
    }
}
