use crate::index::Coordinate;
use crate::protocol::parser::RespValue;

/// 参数解析工具
pub struct ArgumentParser<'a> {
    args: &'a [RespValue],
    command_name: &'static str,
}

/// CLOSEST 命令参数
#[derive(Debug, Clone, PartialEq)]
pub struct ClosestArgs {
    pub target: Coordinate,
    /// 原始请求数量，可能为 0 或负数
    pub count: i64,
    pub geojson: bool,
}

impl ClosestArgs {
    /// 实际要返回的结果数；非正数时为 0
    pub fn k(&self) -> usize {
        usize::try_from(self.count).unwrap_or(0)
    }
}

impl<'a> ArgumentParser<'a> {
    pub fn new(args: &'a [RespValue], command_name: &'static str) -> Self {
        Self { args, command_name }
    }

    /// 检查参数数量
    pub fn check_arg_count(&self, expected: usize) -> std::result::Result<(), String> {
        if self.args.len() != expected {
            return Err(format!(
                "ERR wrong number of arguments for '{}' command. Expected {}, got {}",
                self.command_name,
                expected,
                self.args.len()
            ));
        }
        Ok(())
    }

    /// 获取字符串参数
    pub fn get_string(&self, index: usize, param_name: &str) -> std::result::Result<&str, String> {
        match self.args.get(index).map(|v| (v, v.as_str())) {
            Some((_, Some(s))) => Ok(s),
            Some((_, None)) => Err(format!("ERR invalid {}: expected string", param_name)),
            None => Err(format!("ERR missing {} parameter", param_name)),
        }
    }

    /// 获取浮点参数
    pub fn get_float(&self, index: usize, param_name: &str) -> std::result::Result<f64, String> {
        let raw = self.get_string(index, param_name)?;
        match raw.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(value),
            _ => Err(format!(
                "ERR invalid {}: expected number, got '{}'",
                param_name, raw
            )),
        }
    }

    /// 获取整数参数（允许负数）
    pub fn get_integer(&self, index: usize, param_name: &str) -> std::result::Result<i64, String> {
        match self.args.get(index) {
            Some(RespValue::Integer(n)) => Ok(*n),
            Some(_) => {
                let raw = self.get_string(index, param_name)?;
                raw.parse::<i64>().map_err(|_| {
                    format!("ERR invalid {}: expected integer, got '{}'", param_name, raw)
                })
            }
            None => Err(format!("ERR missing {} parameter", param_name)),
        }
    }

    /// 检查关键字（不区分大小写）
    fn expect_keyword(&self, index: usize, keyword: &str) -> std::result::Result<(), String> {
        let found = self.get_string(index, &format!("{} keyword", keyword))?;
        if !found.eq_ignore_ascii_case(keyword) {
            return Err(format!(
                "ERR invalid syntax: expected '{}', got '{}'",
                keyword, found
            ));
        }
        Ok(())
    }

    /// 解析 CLOSEST 命令的参数
    /// 语法: CLOSEST POINT lat lng COUNT k [GEOJSON]
    pub fn parse_closest_args(&self) -> std::result::Result<ClosestArgs, String> {
        if self.args.len() != 5 && self.args.len() != 6 {
            return Err(format!(
                "ERR wrong number of arguments for '{}' command. Usage: CLOSEST POINT lat lng COUNT k [GEOJSON]",
                self.command_name
            ));
        }

        self.expect_keyword(0, "POINT")?;

        let latitude = self.get_float(1, "latitude")?;
        let longitude = self.get_float(2, "longitude")?;

        // 验证经纬度范围
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(format!(
                "ERR invalid latitude: must be between -90 and 90, got {}",
                latitude
            ));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(format!(
                "ERR invalid longitude: must be between -180 and 180, got {}",
                longitude
            ));
        }

        self.expect_keyword(3, "COUNT")?;
        let count = self.get_integer(4, "count")?;

        let geojson = match self.args.len() {
            6 => {
                self.expect_keyword(5, "GEOJSON")?;
                true
            }
            _ => false,
        };

        Ok(ClosestArgs {
            target: Coordinate::new(latitude, longitude),
            count,
            geojson,
        })
    }
}
