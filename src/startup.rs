//! 启动流程：先校验配置，再创建 HTTP 客户端
//!
//! 配置错误在任何客户端创建之前返回，因此不会发生网络访问。

use crate::api::{PracticumClient, PracticumConfig};
use crate::config::BotConfig;
use crate::error::ConfigError;
use crate::notification::{NotificationGate, TelegramChannel, TelegramConfig};
use crate::poll_loop::PollLoop;

/// 生产环境使用的主循环
pub type HomeworkBot = PollLoop<PracticumClient, TelegramChannel>;

/// 启动错误
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("cannot create HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// 用配置创建 API 客户端、Telegram 渠道和主循环
pub fn build_poll_loop(config: &BotConfig) -> Result<HomeworkBot, reqwest::Error> {
    let source = PracticumClient::new(PracticumConfig {
        endpoint: config.endpoint.clone(),
        token: config.practicum_token.clone(),
        timeout_secs: config.request_timeout_secs,
    })?;

    let channel = TelegramChannel::new(TelegramConfig {
        api_url: config.telegram_api.clone(),
        token: config.telegram_token.clone(),
        timeout_secs: config.request_timeout_secs,
    })?;

    let gate = NotificationGate::new(channel, config.telegram_chat_id.clone());
    Ok(PollLoop::new(source, gate, config.retry_interval))
}

/// 配置有效时才调用 `build`
pub fn start_with<T, B>(config: Result<BotConfig, ConfigError>, build: B) -> Result<T, StartupError>
where
    B: FnOnce(&BotConfig) -> Result<T, reqwest::Error>,
{
    let config = config?;
    build(&config).map_err(StartupError::Client)
}

/// 校验配置并创建生产主循环
pub fn start(config: Result<BotConfig, ConfigError>) -> Result<HomeworkBot, StartupError> {
    start_with(config, build_poll_loop)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_config_error_skips_client_construction() {
        let built = Cell::new(false);
        let result = start_with(BotConfig::from_lookup(|_| None), |_| {
            built.set(true);
            Ok(())
        });

        assert!(matches!(
            result,
            Err(StartupError::Config(ConfigError::Missing(_)))
        ));
        assert!(!built.get());
    }

    #[test]
    fn test_start_builds_from_valid_config() {
        let config = BotConfig::from_lookup(|key| Some(format!("value-{}", key)));
        let bot = start(config).unwrap();
        assert_eq!(bot.interval(), std::time::Duration::from_secs(600));
    }

    #[test]
    fn test_start_rejects_incomplete_config() {
        let config = BotConfig::from_lookup(|key| match key {
            "PRACTICUM_TOKEN" => Some("practicum".to_string()),
            _ => None,
        });
        match start(config) {
            Err(StartupError::Config(ConfigError::Missing(missing))) => {
                assert_eq!(missing, vec!["TELEGRAM_TOKEN", "TELEGRAM_CHAT_ID"])
            }
            Err(other) => panic!("unexpected error: {}", other),
            Ok(_) => panic!("incomplete configuration must not start"),
        }
    }
}
