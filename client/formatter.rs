use crate::protocol::parser::RespValue;
use colored::*;

pub struct OutputFormatter;

impl OutputFormatter {
    pub fn format_response(value: &RespValue) -> String {
        match value {
            RespValue::SimpleString(s) => s.green().to_string(),
            RespValue::Error(err) => format!("(error) {}", err.red()),
            RespValue::Integer(i) => format!("(integer) {}", i.to_string().cyan()),
            RespValue::BulkString(s) => Self::format_bulk_string(s),
            RespValue::Array(arr) => Self::format_array(arr),
        }
    }

    fn format_bulk_string(s: &Option<String>) -> String {
        match s {
            Some(s) if s.is_empty() => "(empty string)".yellow().to_string(),
            Some(s) => Self::highlight_distance(s),
            None => "(nil)".red().to_string(),
        }
    }

    /// "名称,纬度,经度,0.25 miles" 中的距离部分高亮
    fn highlight_distance(line: &str) -> String {
        match line.rsplit_once(',') {
            Some((head, tail)) if tail.ends_with(" miles") => {
                format!("{},{}", head, tail.yellow())
            }
            _ => line.to_string(),
        }
    }

    fn format_array(arr: &Option<Vec<RespValue>>) -> String {
        let values = match arr {
            Some(values) if values.is_empty() => return "(empty array)".yellow().to_string(),
            Some(values) => values,
            None => return "(nil)".red().to_string(),
        };

        let mut result = String::new();
        for (i, value) in values.iter().enumerate() {
            let formatted_value = match value {
                RespValue::BulkString(Some(s)) => Self::highlight_distance(s),
                RespValue::BulkString(None) => "(nil)".to_string(),
                RespValue::Integer(n) => n.to_string(),
                RespValue::SimpleString(s) => s.clone(),
                RespValue::Error(e) => format!("(error) {}", e),
                RespValue::Array(_) => Self::format_response(value),
            };
            result.push_str(&format!(
                "{}) {}\n",
                (i + 1).to_string().blue(),
                formatted_value
            ));
        }
        result.trim_end().to_string()
    }

    pub fn format_prompt(host: &str, port: u16) -> String {
        format!("{}:{}> ", host.blue(), port.to_string().blue())
    }

    pub fn format_connecting_message(host: &str, port: u16) -> String {
        format!("Connecting to {}:{}...", host.cyan(), port.to_string().cyan())
    }

    pub fn format_connected_message(host: &str, port: u16) -> String {
        format!("Connected to {}:{}", host.green(), port.to_string().green())
    }

    pub fn format_disconnected_message() -> String {
        "Disconnected".red().to_string()
    }

    pub fn format_help_message() -> String {
        let help = r#"
Available commands:
  CLOSEST POINT <lat> <lng> COUNT <k> [GEOJSON]
                     - Find the k restrooms closest to a point
  POLL               - Refresh restroom data from the feed now
  RELOAD             - Rebuild the index from locally stored records
  STATS              - Show index status
  PING [message]     - Test server connection
  HELLO              - Get server information
  QUIT               - Close connection and exit
  HELP               - Show this help message

Use Ctrl+C or Ctrl+D to exit interactive mode.
"#;
        help.trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_scalars() {
        colored::control::set_override(false);

        assert_eq!(
            OutputFormatter::format_response(&RespValue::SimpleString("PONG".to_string())),
            "PONG"
        );
        assert_eq!(
            OutputFormatter::format_response(&RespValue::Integer(42)),
            "(integer) 42"
        );
        assert_eq!(
            OutputFormatter::format_response(&RespValue::Error("ERR no restroom data stored".to_string())),
            "(error) ERR no restroom data stored"
        );
        assert_eq!(
            OutputFormatter::format_response(&RespValue::BulkString(None)),
            "(nil)"
        );
    }

    #[test]
    fn test_format_closest_lines() {
        colored::control::set_override(false);

        let value = RespValue::Array(Some(vec![
            RespValue::BulkString(Some("Bryant Park,40.753600,-73.983200,0.25 miles".to_string())),
            RespValue::BulkString(Some("Madison Square,40.742000,-73.987000,0.91 miles".to_string())),
        ]));
        let result = OutputFormatter::format_response(&value);

        assert_eq!(
            result,
            "1) Bryant Park,40.753600,-73.983200,0.25 miles\n2) Madison Square,40.742000,-73.987000,0.91 miles"
        );
        assert_eq!(
            OutputFormatter::format_response(&RespValue::Array(Some(vec![]))),
            "(empty array)"
        );
    }

    #[test]
    fn test_help_lists_commands() {
        let help = OutputFormatter::format_help_message();
        for name in ["CLOSEST", "POLL", "RELOAD", "STATS"] {
            assert!(help.contains(name));
        }
    }
}
