use std::io::{self, BufRead, Write};
use std::time::Duration;

use restroomfinder::client::{CliArgs, ClientConnection, OutputFormatter};
use restroomfinder::Result;

/// 交互模式下一行输入的处理结果
enum Next {
    Continue,
    Exit,
}

fn main() -> Result<()> {
    let args = CliArgs::parse_args();

    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    let mut connection = ClientConnection::new(
        &args.host,
        args.port,
        Duration::from_secs(args.timeout_secs),
    );

    if args.should_run_interactive() {
        run_interactive(&mut connection, &args.host, args.port)
    } else {
        run_once(&mut connection, &args.command)
    }
}

/// 执行单条命令；服务端返回错误时以非零状态退出
fn run_once(connection: &mut ClientConnection, command: &[String]) -> Result<()> {
    connection.connect()?;
    let response = connection.send_command(command)?;
    println!("{}", OutputFormatter::format_response(&response));
    connection.disconnect()?;

    if matches!(response, restroomfinder::protocol::RespValue::Error(_)) {
        std::process::exit(2);
    }
    Ok(())
}

fn run_interactive(connection: &mut ClientConnection, host: &str, port: u16) -> Result<()> {
    println!("restroomfinder-cli interactive mode");
    println!("{}", OutputFormatter::format_connecting_message(host, port));

    if let Err(e) = connection.connect() {
        eprintln!("Failed to connect: {}", e);
        return Ok(());
    }
    println!("{}", OutputFormatter::format_connected_message(host, port));
    println!("Type 'HELP' for available commands, 'QUIT' to exit.");
    println!();

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("{}", OutputFormatter::format_prompt(host, port));
        io::stdout().flush()?;

        // None 为 EOF (Ctrl+D)
        let line = match lines.next() {
            Some(Ok(line)) => line,
            Some(Err(e)) => {
                eprintln!("Error reading input: {}", e);
                break;
            }
            None => {
                println!();
                break;
            }
        };

        if let Next::Exit = handle_line(connection, &line, host, port) {
            break;
        }
    }

    println!("{}", OutputFormatter::format_disconnected_message());
    connection.disconnect()?;
    Ok(())
}

fn handle_line(connection: &mut ClientConnection, line: &str, host: &str, port: u16) -> Next {
    let parts: Vec<String> = line.split_whitespace().map(str::to_string).collect();
    let command = match parts.first() {
        Some(first) => first.to_uppercase(),
        None => return Next::Continue,
    };

    match command.as_str() {
        "HELP" => {
            println!("{}", OutputFormatter::format_help_message());
            Next::Continue
        }
        "QUIT" | "EXIT" => {
            if let Ok(response) = connection.send_command(&["QUIT".to_string()]) {
                println!("{}", OutputFormatter::format_response(&response));
            }
            Next::Exit
        }
        _ => match connection.send_command(&parts) {
            Ok(response) => {
                println!("{}", OutputFormatter::format_response(&response));
                Next::Continue
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                reconnect(connection, host, port)
            }
        },
    }
}

/// 连接已断开时重连一次，失败则退出
fn reconnect(connection: &mut ClientConnection, host: &str, port: u16) -> Next {
    if connection.is_connected() {
        return Next::Continue;
    }

    println!("Connection lost. Attempting to reconnect...");
    match connection.connect() {
        Ok(()) => {
            println!("{}", OutputFormatter::format_connected_message(host, port));
            Next::Continue
        }
        Err(e) => {
            eprintln!("Failed to reconnect: {}", e);
            Next::Exit
        }
    }
}
