//! 聊天渠道 trait 定义

use crate::error::ChannelError;

/// 聊天渠道：向指定 chat 发送一条文本消息
pub trait ChatChannel {
    /// 渠道名称（用于日志）
    fn name(&self) -> &str;

    /// 同步发送消息
    fn send(&self, chat_id: &str, text: &str) -> Result<(), ChannelError>;
}

impl<C: ChatChannel + ?Sized> ChatChannel for &C {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn send(&self, chat_id: &str, text: &str) -> Result<(), ChannelError> {
        (**self).send(chat_id, text)
    }
}

impl<C: ChatChannel + ?Sized> ChatChannel for Box<C> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn send(&self, chat_id: &str, text: &str) -> Result<(), ChannelError> {
        (**self).send(chat_id, text)
    }
}
