//! 通知层 - 向聊天渠道发送去重后的消息
//!
//! - `ChatChannel`: 渠道 trait，只负责把一条文本发送到指定 chat
//! - `TelegramChannel`: 基于 Telegram Bot API 的实现
//! - `NotificationGate`: 持有上一条消息，抑制连续重复发送

pub mod channel;
pub mod gate;
pub mod telegram;

pub use channel::ChatChannel;
pub use gate::NotificationGate;
pub use telegram::{TelegramChannel, TelegramConfig};
