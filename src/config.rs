//! 启动配置
//!
//! 三个凭据都必须存在（空字符串视为缺失）：
//! - `PRACTICUM_TOKEN`: 作业状态 API 的 OAuth token
//! - `TELEGRAM_TOKEN`: Telegram bot token
//! - `TELEGRAM_CHAT_ID`: 接收通知的 chat

use crate::api::client::{DEFAULT_ENDPOINT, DEFAULT_TIMEOUT_SECS};
use crate::error::ConfigError;
use crate::notification::telegram::DEFAULT_TELEGRAM_API;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

pub const PRACTICUM_TOKEN: &str = "PRACTICUM_TOKEN";
pub const TELEGRAM_TOKEN: &str = "TELEGRAM_TOKEN";
pub const TELEGRAM_CHAT_ID: &str = "TELEGRAM_CHAT_ID";

/// 必需的环境变量
pub const REQUIRED_VARS: [&str; 3] = [PRACTICUM_TOKEN, TELEGRAM_TOKEN, TELEGRAM_CHAT_ID];

/// 默认轮询间隔（秒）
pub const DEFAULT_RETRY_SECS: u64 = 600;

/// Bot 配置
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub practicum_token: String,
    pub telegram_token: String,
    pub telegram_chat_id: String,
    /// 作业状态 API 地址
    pub endpoint: String,
    /// Telegram Bot API 地址
    pub telegram_api: String,
    /// 两轮轮询之间的固定间隔
    pub retry_interval: Duration,
    /// HTTP 请求超时（秒）
    pub request_timeout_secs: u64,
}

impl BotConfig {
    /// 从进程环境变量加载
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 从 env 文件加载，文件中没有的键回退到进程环境变量
    pub fn from_env_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let mut values = HashMap::new();
        for item in dotenvy::from_path_iter(path.as_ref())? {
            let (key, value) = item?;
            values.insert(key, value);
        }

        Self::from_lookup(|key| values.get(key).cloned().or_else(|| std::env::var(key).ok()))
    }

    /// 通过查找函数加载，所有必需变量缺失时一并报告
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        match REQUIRED_VARS.map(|key| get(key)) {
            [Some(practicum_token), Some(telegram_token), Some(telegram_chat_id)] => Ok(Self {
                practicum_token,
                telegram_token,
                telegram_chat_id,
                endpoint: DEFAULT_ENDPOINT.to_string(),
                telegram_api: DEFAULT_TELEGRAM_API.to_string(),
                retry_interval: Duration::from_secs(DEFAULT_RETRY_SECS),
                request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            }),
            values => Err(ConfigError::Missing(
                REQUIRED_VARS
                    .into_iter()
                    .zip(values)
                    .filter_map(|(key, value)| value.is_none().then_some(key))
                    .collect(),
            )),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_telegram_api(mut self, api: impl Into<String>) -> Self {
        self.telegram_api = api.into();
        self
    }

    pub fn with_retry_interval(mut self, interval: Duration) -> Result<Self, ConfigError> {
        if interval.is_zero() {
            return Err(ConfigError::Invalid {
                key: "retry interval",
                reason: "must be greater than zero".to_string(),
            });
        }
        self.retry_interval = interval;
        Ok(self)
    }

    pub fn with_request_timeout(mut self, secs: u64) -> Result<Self, ConfigError> {
        if secs == 0 {
            return Err(ConfigError::Invalid {
                key: "request timeout",
                reason: "must be greater than zero".to_string(),
            });
        }
        self.request_timeout_secs = secs;
        Ok(self)
    }
}
