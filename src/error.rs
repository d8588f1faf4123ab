//! 错误类型
//!
//! - `BotError`: 单次轮询周期内可能出现的所有错误，由 `PollLoop` 统一捕获
//! - `ConfigError`: 启动时配置缺失，唯一的致命错误，不会进入轮询周期
//! - `ChannelError`: 聊天渠道发送失败的具体原因，被包装进 `BotError::Delivery`

/// 轮询周期错误
#[derive(Debug, thiserror::Error)]
pub enum BotError {
    /// 远端服务返回非 200
    #[error("API request to [{endpoint}] failed: service unavailable, status code {status}")]
    RemoteService { endpoint: String, status: u16 },

    /// 网络层失败（连接、超时等）
    #[error("API request to [{endpoint}] failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// 响应外层结构不正确
    #[error("malformed API response: {0}")]
    MalformedResponse(String),

    /// 单个作业记录不是对象
    #[error("malformed homework record: {0}")]
    MalformedItem(String),

    /// 作业记录缺少必需字段
    #[error("homework record is missing field(s): {}", .fields.join(", "))]
    MissingField { fields: Vec<&'static str> },

    /// API 返回了未登记的状态
    #[error("undocumented homework status in API response: {0:?}")]
    UnknownStatus(String),

    /// 聊天消息发送失败
    #[error("failed to deliver message \"{message}\" to chat: {source}")]
    Delivery {
        message: String,
        #[source]
        source: ChannelError,
    },
}

impl BotError {
    /// 是否为发送失败（这是唯一能把其它错误告知用户的渠道）
    pub fn is_delivery(&self) -> bool {
        matches!(self, BotError::Delivery { .. })
    }
}

/// 聊天渠道发送错误
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    /// 构造时需去掉 URL（包含 bot token）
    #[error("HTTP request failed: {0}")]
    Http(#[source] reqwest::Error),

    #[error("chat API rejected message (status {status}): {description}")]
    Rejected { status: u16, description: String },
}

/// 启动配置错误
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("required environment variable(s) not set: {}", .0.join(", "))]
    Missing(Vec<&'static str>),

    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },

    #[error("cannot read env file: {0}")]
    EnvFile(#[from] dotenvy::Error),
}
