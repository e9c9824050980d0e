pub mod args;
pub mod basic;
pub mod closest;
pub mod poll;
pub mod registry;
pub mod stats;

use crate::feed::{Geocoder, GoogleGeocoder};
use crate::protocol::parser::RespValue;
use crate::Result;

use basic::{HelloCommand, PingCommand, QuitCommand};
use closest::ClosestCommand;
use poll::{PollCommand, ReloadCommand};
use stats::StatsCommand;

// 重新导出常用的类型
pub use args::{ArgumentParser, ClosestArgs};
pub use closest::format_result_line;
pub use registry::CommandRegistry;

pub trait Command {
    fn name(&self) -> &'static str;
    fn execute(&self, args: &[RespValue]) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub enum CommandType<G = GoogleGeocoder> {
    Ping(PingCommand),
    Hello(HelloCommand),
    Quit(QuitCommand),
    Closest(ClosestCommand),
    Poll(PollCommand<G>),
    Reload(ReloadCommand<G>),
    Stats(StatsCommand),
}

impl<G> CommandType<G>
where
    G: Geocoder + Send + Sync + 'static,
{
    fn name(&self) -> &'static str {
        match self {
            CommandType::Ping(cmd) => cmd.name(),
            CommandType::Hello(cmd) => cmd.name(),
            CommandType::Quit(cmd) => cmd.name(),
            CommandType::Closest(cmd) => cmd.name(),
            CommandType::Poll(cmd) => cmd.name(),
            CommandType::Reload(cmd) => cmd.name(),
            CommandType::Stats(cmd) => cmd.name(),
        }
    }

    async fn execute(&self, args: &[RespValue]) -> Result<String> {
        match self {
            CommandType::Ping(cmd) => cmd.execute(args).await,
            CommandType::Hello(cmd) => cmd.execute(args).await,
            CommandType::Quit(cmd) => cmd.execute(args).await,
            CommandType::Closest(cmd) => cmd.execute(args).await,
            CommandType::Poll(cmd) => cmd.execute(args).await,
            CommandType::Reload(cmd) => cmd.execute(args).await,
            CommandType::Stats(cmd) => cmd.execute(args).await,
        }
    }
}
