pub mod connection;
pub mod refresh_task;
pub mod tcp_server;

pub use connection::Connection;
pub use refresh_task::spawn_refresh_task;
pub use tcp_server::TcpServer;
