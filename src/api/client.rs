//! Practicum homework_statuses 客户端
//!
//! 单次同步请求，不做任何重试：重试由 `PollLoop` 按固定间隔负责。

use crate::error::BotError;
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// 默认 API 地址
pub const DEFAULT_ENDPOINT: &str = "https://practicum.yandex.ru/api/user_api/homework_statuses/";

/// 默认请求超时（秒）
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// 作业状态来源
pub trait StatusSource {
    /// 拉取 `from_date` 之后的状态变更
    fn fetch(&self, from_date: i64) -> Result<Value, BotError>;
}

/// 客户端配置
#[derive(Debug, Clone)]
pub struct PracticumConfig {
    /// API 地址
    pub endpoint: String,
    /// OAuth token
    pub token: String,
    /// 超时时间（秒）
    pub timeout_secs: u64,
}

impl PracticumConfig {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            token: token.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Practicum API 客户端
pub struct PracticumClient {
    client: Client,
    config: PracticumConfig,
}

impl PracticumClient {
    /// 创建客户端
    pub fn new(config: PracticumConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    fn authorization(&self) -> String {
        format!("OAuth {}", self.config.token)
    }
}

impl StatusSource for PracticumClient {
    fn fetch(&self, from_date: i64) -> Result<Value, BotError> {
        let from_date = effective_from_date(from_date);
        let endpoint = &self.config.endpoint;

        let transport = |source: reqwest::Error| BotError::Transport {
            endpoint: endpoint.clone(),
            source,
        };

        let response = self
            .client
            .get(endpoint)
            .header("Authorization", self.authorization())
            .query(&[("from_date", from_date)])
            .send()
            .map_err(transport)?;

        let status = response.status();
        let body = response.text().map_err(transport)?;
        interpret_response(endpoint, status, &body)
    }
}

/// 游标为 0（未设置）时使用当前时间
pub fn effective_from_date(from_date: i64) -> i64 {
    if from_date == 0 {
        chrono::Utc::now().timestamp()
    } else {
        from_date
    }
}

/// 把 HTTP 状态码和响应体转换为结果
pub fn interpret_response(endpoint: &str, status: StatusCode, body: &str) -> Result<Value, BotError> {
    if status != StatusCode::OK {
        return Err(BotError::RemoteService {
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
        });
    }

    debug!(endpoint = %endpoint, status = status.as_u16(), "API request succeeded");

    serde_json::from_str(body)
        .map_err(|e| BotError::MalformedResponse(format!("response body is not JSON: {}", e)))
}
