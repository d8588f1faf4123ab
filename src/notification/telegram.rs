//! Telegram Bot API 渠道
//!
//! 通过 `POST {api}/bot{token}/sendMessage` 发送纯文本消息

use super::channel::ChatChannel;
use crate::error::ChannelError;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 默认 Bot API 地址
pub const DEFAULT_TELEGRAM_API: &str = "https://api.telegram.org";

/// Telegram 渠道配置
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    /// Bot API 地址
    pub api_url: String,
    /// Bot token
    pub token: String,
    /// 超时时间（秒）
    pub timeout_secs: u64,
}

impl TelegramConfig {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            api_url: DEFAULT_TELEGRAM_API.to_string(),
            token: token.into(),
            timeout_secs: 30,
        }
    }
}

/// sendMessage 请求载荷
#[derive(Debug, Serialize)]
struct SendMessagePayload<'a> {
    chat_id: &'a str,
    text: &'a str,
}

/// Bot API 响应
#[derive(Debug, Deserialize)]
struct BotApiResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Telegram 渠道
pub struct TelegramChannel {
    client: Client,
    config: TelegramConfig,
}

impl TelegramChannel {
    pub fn new(config: TelegramConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    fn send_message_url(&self) -> String {
        format!(
            "{}/bot{}/sendMessage",
            self.config.api_url.trim_end_matches('/'),
            self.config.token
        )
    }
}

impl ChatChannel for TelegramChannel {
    fn name(&self) -> &str {
        "telegram"
    }

    fn send(&self, chat_id: &str, text: &str) -> Result<(), ChannelError> {
        let response = self
            .client
            .post(self.send_message_url())
            .json(&SendMessagePayload { chat_id, text })
            .send()
            // 请求 URL 中包含 bot token
            .map_err(|e| ChannelError::Http(e.without_url()))?;

        let status = response.status();
        // 错误响应体也可能不是 JSON
        let body: Option<BotApiResponse> = response.json().ok();

        match body {
            Some(body) if status.is_success() && body.ok => Ok(()),
            Some(body) => Err(ChannelError::Rejected {
                status: status.as_u16(),
                description: body
                    .description
                    .unwrap_or_else(|| "Unknown error".to_string()),
            }),
            None => Err(ChannelError::Rejected {
                status: status.as_u16(),
                description: "unreadable Bot API response".to_string(),
            }),
        }
    }
}
