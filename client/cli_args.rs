use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "restroomfinder-cli",
    about = "A command line interface for the restroomfinder server",
    long_about = "restroomfinder-cli connects to a restroomfinder server and runs commands such as\nCLOSEST, POLL and STATS, either once or in an interactive session."
)]
pub struct CliArgs {
    /// Server hostname
    #[arg(long = "host", default_value = "127.0.0.1")]
    pub host: String,

    /// Server port
    #[arg(short = 'p', long = "port", default_value = "9851")]
    pub port: u16,

    /// Enter interactive mode
    #[arg(short = 'i', long = "interactive")]
    pub interactive: bool,

    /// Seconds to wait for a reply (POLL can take a while)
    #[arg(short = 't', long = "timeout", default_value = "300")]
    pub timeout_secs: u64,

    /// Command to execute (if not in interactive mode)
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}

impl CliArgs {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.port == 0 {
            return Err("Port must be greater than 0".to_string());
        }

        if self.timeout_secs == 0 {
            return Err("Timeout must be greater than 0".to_string());
        }

        Ok(())
    }

    pub fn should_run_interactive(&self) -> bool {
        self.interactive || self.command.is_empty()
    }
}
