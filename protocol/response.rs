use crate::protocol::parser::RespValue;

/// RESP 响应编码
pub struct RespResponse;

impl RespResponse {
    pub fn simple_string(s: &str) -> String {
        format!("+{}\r\n", s)
    }

    pub fn ok() -> String {
        Self::simple_string("OK")
    }

    /// 错误消息中的换行会破坏帧，统一替换为空格
    pub fn error(msg: &str) -> String {
        format!("-{}\r\n", msg.replace(['\r', '\n'], " "))
    }

    pub fn integer(n: i64) -> String {
        format!(":{}\r\n", n)
    }

    pub fn bulk_string(s: Option<&str>) -> String {
        match s {
            Some(s) => format!("${}\r\n{}\r\n", s.len(), s),
            None => "$-1\r\n".to_string(),
        }
    }

    pub fn array(items: Option<&[RespValue]>) -> String {
        match items {
            Some(items) => {
                let mut result = format!("*{}\r\n", items.len());
                for item in items {
                    result.push_str(&Self::encode(item));
                }
                result
            }
            None => "*-1\r\n".to_string(),
        }
    }

    /// 批量字符串数组
    pub fn string_array<S: AsRef<str>>(items: &[S]) -> String {
        let mut result = format!("*{}\r\n", items.len());
        for item in items {
            result.push_str(&Self::bulk_string(Some(item.as_ref())));
        }
        result
    }

    pub fn encode(value: &RespValue) -> String {
        match value {
            RespValue::SimpleString(s) => Self::simple_string(s),
            RespValue::Error(s) => Self::error(s),
            RespValue::Integer(n) => Self::integer(*n),
            RespValue::BulkString(s) => Self::bulk_string(s.as_deref()),
            RespValue::Array(arr) => Self::array(arr.as_deref()),
        }
    }
}
