pub mod cli_args;
pub mod client_connection;
pub mod formatter;

pub use cli_args::CliArgs;
pub use client_connection::ClientConnection;
pub use formatter::OutputFormatter;
