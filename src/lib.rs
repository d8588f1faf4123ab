//! Homework Status Bot - 轮询作业状态 API 并把状态变更推送到 Telegram

pub mod api;
pub mod config;
pub mod error;
pub mod homework;
pub mod notification;
pub mod poll_loop;
pub mod startup;

pub use api::{PracticumClient, PracticumConfig, StatusSource};
pub use config::BotConfig;
pub use error::{BotError, ChannelError, ConfigError};
pub use homework::{parse_status, validate_response, Verdict, WorkItem};
pub use notification::{ChatChannel, NotificationGate, TelegramChannel, TelegramConfig};
pub use poll_loop::{CycleOutcome, PollLoop};
pub use startup::{HomeworkBot, StartupError};
