use std::collections::HashMap;
use std::sync::Arc;

use crate::feed::{Geocoder, GoogleGeocoder, Refresher};
use crate::protocol::parser::RespValue;
use crate::Result;

use super::{
    basic::{HelloCommand, PingCommand, QuitCommand},
    closest::ClosestCommand,
    poll::{PollCommand, ReloadCommand},
    stats::StatsCommand,
    CommandType,
};

/// 命令注册表，管理所有可用的命令
pub struct CommandRegistry<G = GoogleGeocoder> {
    commands: HashMap<String, CommandType<G>>,
}

impl<G> CommandRegistry<G>
where
    G: Geocoder + Send + Sync + 'static,
{
    /// 创建新的命令注册表，查询命令共用刷新器持有的数据库
    pub fn new(refresher: Arc<Refresher<G>>) -> Self {
        let database = Arc::clone(refresher.database());
        let mut registry = Self {
            commands: HashMap::new(),
        };

        // 注册基础命令
        registry.register(CommandType::Ping(PingCommand));
        registry.register(CommandType::Hello(HelloCommand));
        registry.register(CommandType::Quit(QuitCommand));

        // 注册查询命令
        registry.register(CommandType::Closest(ClosestCommand::new(Arc::clone(&database))));
        registry.register(CommandType::Stats(StatsCommand::new(database)));

        // 注册数据管理命令
        registry.register(CommandType::Poll(PollCommand::new(Arc::clone(&refresher))));
        registry.register(CommandType::Reload(ReloadCommand::new(refresher)));

        registry
    }

    /// 注册一个命令
    pub fn register(&mut self, command: CommandType<G>) {
        let name = command.name().to_uppercase();
        self.commands.insert(name, command);
    }

    /// 执行指定的命令
    pub async fn execute(&self, command_name: &str, args: &[RespValue]) -> Result<String> {
        let name = command_name.to_uppercase();
        match self.commands.get(&name) {
            Some(command) => command.execute(args).await,
            None => Ok(format!("-ERR unknown command '{}'\r\n", command_name)),
        }
    }

    /// 获取所有注册的命令名称
    pub fn command_names(&self) -> Vec<&str> {
        self.commands.keys().map(|s| s.as_str()).collect()
    }

    /// 检查命令是否存在
    pub fn has_command(&self, command_name: &str) -> bool {
        let name = command_name.to_uppercase();
        self.commands.contains_key(&name)
    }
}
