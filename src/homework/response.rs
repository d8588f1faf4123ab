//! API 响应外层结构校验

use crate::error::BotError;
use serde_json::Value;
use tracing::debug;

/// 响应中作业列表所在的键
pub const HOMEWORKS_KEY: &str = "homeworks";

/// 响应是否为"空"（null、空对象、空数组、空字符串、false、0）
///
/// 空响应不推进游标，直接进入下一轮等待
pub fn is_empty_response(response: &Value) -> bool {
    match response {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

/// 校验响应结构并返回作业列表
///
/// 只检查外层：必须是对象，且 `homeworks` 必须是数组。
/// 单条记录的结构留给 `parse_status` 处理。
pub fn validate_response(response: &Value) -> Result<Vec<Value>, BotError> {
    let object = response.as_object().ok_or_else(|| {
        BotError::MalformedResponse(format!("response is not an object: {}", response))
    })?;

    let homeworks = match object.get(HOMEWORKS_KEY) {
        Some(Value::Array(items)) => items.clone(),
        Some(other) => {
            return Err(BotError::MalformedResponse(format!(
                "\"{}\" is not a list: {}",
                HOMEWORKS_KEY, other
            )))
        }
        None => {
            return Err(BotError::MalformedResponse(format!(
                "\"{}\" is not a list: key is missing",
                HOMEWORKS_KEY
            )))
        }
    };

    debug!(count = homeworks.len(), homeworks = ?homeworks, "API response is valid");
    Ok(homeworks)
}
