use crate::Result;

/// 数组元素个数上限
pub const MAX_ARRAY_LEN: i64 = 1024 * 1024;
/// 批量字符串长度上限（512 MB，与 Redis 一致）
pub const MAX_BULK_LEN: i64 = 512 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq)]
pub enum RespValue {
    SimpleString(String),
    Error(String),
    Integer(i64),
    BulkString(Option<String>),
    Array(Option<Vec<RespValue>>),
}

impl RespValue {
    /// 取出字符串内容（简单字符串或批量字符串）
    pub fn as_str(&self) -> Option<&str> {
        match self {
            RespValue::SimpleString(s) => Some(s),
            RespValue::BulkString(Some(s)) => Some(s),
            _ => None,
        }
    }
}

pub struct RespParser;

impl Default for RespParser {
    fn default() -> Self {
        Self::new()
    }
}

impl RespParser {
    pub fn new() -> Self {
        Self
    }

    /// 解析一个完整的 RESP 值，数据不完整时报错
    pub fn parse(&self, input: &[u8]) -> Result<RespValue> {
        match parse_frame(input)? {
            Some((value, _)) => Ok(value),
            None => Err("Unexpected EOF".into()),
        }
    }

    pub fn parse_frame(&self, input: &[u8]) -> Result<Option<(RespValue, usize)>> {
        parse_frame(input)
    }
}

/// 从缓冲区开头解析一帧
///
/// 返回 `Ok(None)` 表示数据还不完整，需要继续读取；
/// 成功时同时返回该帧占用的字节数。
pub fn parse_frame(input: &[u8]) -> Result<Option<(RespValue, usize)>> {
    parse_value(input, 0)
}

fn parse_value(input: &[u8], start: usize) -> Result<Option<(RespValue, usize)>> {
    let (line, next) = match read_line(input, start) {
        Some(found) => found,
        None => return Ok(None),
    };

    let (&prefix, content) = match line.split_first() {
        Some(parts) => parts,
        None => return Err("Empty line".into()),
    };
    let content = std::str::from_utf8(content)?;

    match prefix {
        b'+' => Ok(Some((RespValue::SimpleString(content.to_string()), next))),
        b'-' => Ok(Some((RespValue::Error(content.to_string()), next))),
        b':' => Ok(Some((RespValue::Integer(content.parse::<i64>()?), next))),
        b'$' => {
            let len = content.parse::<i64>()?;
            if len < 0 {
                return Ok(Some((RespValue::BulkString(None), next)));
            }
            if len > MAX_BULK_LEN {
                return Err(format!("invalid bulk length {}", len).into());
            }

            let end = next + len as usize;
            // 数据加结尾的 \r\n
            if input.len() < end + 2 {
                return Ok(None);
            }
            if &input[end..end + 2] != b"\r\n" {
                return Err("Bulk string is not terminated by CRLF".into());
            }

            let s = String::from_utf8(input[next..end].to_vec())?;
            Ok(Some((RespValue::BulkString(Some(s)), end + 2)))
        }
        b'*' => {
            let len = content.parse::<i64>()?;
            if len < 0 {
                return Ok(Some((RespValue::Array(None), next)));
            }
            if len > MAX_ARRAY_LEN {
                return Err(format!("invalid multibulk length {}", len).into());
            }

            // 元素未到齐前不按声明长度整块分配
            let mut items = Vec::with_capacity((len as usize).min(1024));
            let mut offset = next;
            for _ in 0..len {
                match parse_value(input, offset)? {
                    Some((item, after)) => {
                        items.push(item);
                        offset = after;
                    }
                    None => return Ok(None),
                }
            }
            Ok(Some((RespValue::Array(Some(items)), offset)))
        }
        // 内联命令：PING 之类直接以空格分隔
        _ => {
            let line = std::str::from_utf8(line)?;
            let items = line
                .split_whitespace()
                .map(|word| RespValue::BulkString(Some(word.to_string())))
                .collect();
            Ok(Some((RespValue::Array(Some(items)), next)))
        }
    }
}

/// 读取一行（不含 \r\n），返回下一行的起始位置
fn read_line(input: &[u8], start: usize) -> Option<(&[u8], usize)> {
    let rest = input.get(start..)?;
    let pos = rest.windows(2).position(|w| w == b"\r\n")?;
    Some((&rest[..pos], start + pos + 2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_string() {
        let parser = RespParser::new();
        let result = parser.parse(b"+OK\r\n").unwrap();
        assert_eq!(result, RespValue::SimpleString("OK".to_string()));
    }

    #[test]
    fn test_error_and_integer() {
        let parser = RespParser::new();
        assert_eq!(
            parser.parse(b"-ERR refresh failed\r\n").unwrap(),
            RespValue::Error("ERR refresh failed".to_string())
        );
        assert_eq!(parser.parse(b":42\r\n").unwrap(), RespValue::Integer(42));
    }

    #[test]
    fn test_bulk_strings() {
        let parser = RespParser::new();
        assert_eq!(
            parser.parse(b"$6\r\nfoobar\r\n").unwrap(),
            RespValue::BulkString(Some("foobar".to_string()))
        );
        assert_eq!(
            parser.parse(b"$0\r\n\r\n").unwrap(),
            RespValue::BulkString(Some(String::new()))
        );
        assert_eq!(parser.parse(b"$-1\r\n").unwrap(), RespValue::BulkString(None));
    }

    #[test]
    fn test_command_array() {
        let input = b"*6\r\n$7\r\nCLOSEST\r\n$5\r\nPOINT\r\n$4\r\n40.7\r\n$5\r\n-73.9\r\n$5\r\nCOUNT\r\n$1\r\n3\r\n";
        let (value, used) = parse_frame(input).unwrap().unwrap();

        assert_eq!(used, input.len());
        match value {
            RespValue::Array(Some(items)) => {
                let words: Vec<&str> = items.iter().filter_map(|v| v.as_str()).collect();
                assert_eq!(words, vec!["CLOSEST", "POINT", "40.7", "-73.9", "COUNT", "3"]);
            }
            other => panic!("unexpected value {:?}", other),
        }
    }

    #[test]
    fn test_incomplete_frames() {
        assert!(parse_frame(b"").unwrap().is_none());
        assert!(parse_frame(b"*2\r\n$4\r\nPING\r\n").unwrap().is_none());
        assert!(parse_frame(b"$6\r\nfoo").unwrap().is_none());
        assert!(parse_frame(b"+OK").unwrap().is_none());
        assert!(RespParser::new().parse(b"$6\r\nfoo").is_err());
    }

    #[test]
    fn test_pipelined_frames() {
        let input = b"*1\r\n$4\r\nPING\r\n*1\r\n$5\r\nSTATS\r\n";
        let (first, used) = parse_frame(input).unwrap().unwrap();
        let (second, rest) = parse_frame(&input[used..]).unwrap().unwrap();

        assert_eq!(
            first,
            RespValue::Array(Some(vec![RespValue::BulkString(Some("PING".to_string()))]))
        );
        assert_eq!(
            second,
            RespValue::Array(Some(vec![RespValue::BulkString(Some("STATS".to_string()))]))
        );
        assert_eq!(used + rest, input.len());
    }

    #[test]
    fn test_inline_command() {
        let (value, used) = parse_frame(b"POLL\r\n").unwrap().unwrap();
        assert_eq!(used, 6);
        assert_eq!(
            value,
            RespValue::Array(Some(vec![RespValue::BulkString(Some("POLL".to_string()))]))
        );
    }

    #[test]
    fn test_malformed() {
        assert!(parse_frame(b":abc\r\n").is_err());
        assert!(parse_frame(b"$3\r\nfooXY").is_err());
        assert!(parse_frame(b"\r\n").is_err());
    }

    #[test]
    fn test_oversized_lengths() {
        assert!(parse_frame(b"*4611686018427387903\r\n").is_err());
        assert!(parse_frame(b"*1048577\r\n").is_err());
        assert!(parse_frame(b"$9223372036854775807\r\nab\r\n").is_err());
        assert!(parse_frame(b"$536870913\r\n").is_err());

        // 合法上限内的头部仍等待后续数据
        assert_eq!(parse_frame(b"*1048576\r\n").unwrap(), None);
        assert_eq!(parse_frame(b"$536870912\r\nab").unwrap(), None);

        // 嵌套元素同样受限
        assert!(parse_frame(b"*2\r\n$3\r\nfoo\r\n$9999999999\r\n").is_err());
    }
}
