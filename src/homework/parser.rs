//! 单条作业记录解析

use super::status;
use crate::error::BotError;
use serde_json::Value;
use tracing::debug;

/// 作业名称字段
pub const NAME_FIELD: &str = "homework_name";
/// 兼容字段名
const NAME_FIELD_FALLBACK: &str = "name";
/// 状态字段
pub const STATUS_FIELD: &str = "status";

/// 一条作业记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    pub name: String,
    pub status_code: String,
}

impl WorkItem {
    /// 从 JSON 对象中提取记录
    ///
    /// 字段缺失或为 null 时返回 `MissingField`，列出所有缺失字段
    pub fn from_value(value: &Value) -> Result<Self, BotError> {
        let object = value.as_object().ok_or_else(|| {
            BotError::MalformedItem(format!("homework record is not an object: {}", value))
        })?;

        let name = object
            .get(NAME_FIELD)
            .filter(|v| !v.is_null())
            .or_else(|| object.get(NAME_FIELD_FALLBACK).filter(|v| !v.is_null()))
            .map(value_to_string);
        let status_code = object
            .get(STATUS_FIELD)
            .filter(|v| !v.is_null())
            .map(value_to_string);

        match (name, status_code) {
            (Some(name), Some(status_code)) => Ok(Self { name, status_code }),
            (name, status_code) => {
                let mut fields = Vec::new();
                if name.is_none() {
                    fields.push(NAME_FIELD);
                }
                if status_code.is_none() {
                    fields.push(STATUS_FIELD);
                }
                Err(BotError::MissingField { fields })
            }
        }
    }
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// 格式化状态变更通知
pub fn format_status_message(name: &str, verdict: &str) -> String {
    format!("Изменился статус проверки работы \"{}\". {}", name, verdict)
}

/// 解析一条作业记录，返回通知文本
pub fn parse_status(homework: &Value) -> Result<String, BotError> {
    let item = WorkItem::from_value(homework)?;

    let verdict = status::lookup(&item.status_code)
        .ok_or_else(|| BotError::UnknownStatus(item.status_code.clone()))?;

    debug!(homework = %item.name, status = %item.status_code, "Homework status parsed");
    Ok(format_status_message(&item.name, verdict))
}
