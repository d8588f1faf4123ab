//! 通知闸门 - 抑制连续重复消息
//!
//! 只与上一条发出的消息比较：`[A, A, B, A]` 会发送 `A, B, A`。
//! 上一条消息在发送前就会更新，因此发送失败的消息不会在下一轮被重发。

use super::channel::ChatChannel;
use crate::error::BotError;
use tracing::info;

/// 通知闸门
pub struct NotificationGate<C> {
    channel: C,
    chat_id: String,
    /// 最近一次尝试发送的消息
    last_sent: Option<String>,
}

impl<C: ChatChannel> NotificationGate<C> {
    pub fn new(channel: C, chat_id: impl Into<String>) -> Self {
        Self {
            channel,
            chat_id: chat_id.into(),
            last_sent: None,
        }
    }

    /// 与上一条消息相同则跳过，否则发送
    ///
    /// 返回 `Ok(true)` 表示已发送，`Ok(false)` 表示被去重
    pub fn notify(&mut self, message: &str) -> Result<bool, BotError> {
        if self.last_sent.as_deref() == Some(message) {
            return Ok(false);
        }

        self.last_sent = Some(message.to_string());

        self.channel
            .send(&self.chat_id, message)
            .map_err(|source| BotError::Delivery {
                message: message.to_string(),
                source,
            })?;

        info!(
            channel = self.channel.name(),
            chat_id = %self.chat_id,
            message = %message,
            "Message sent to chat"
        );
        Ok(true)
    }

    pub fn last_sent(&self) -> Option<&str> {
        self.last_sent.as_deref()
    }

    pub fn channel(&self) -> &C {
        &self.channel
    }
}
