//! 作业状态 API 客户端

pub mod client;

pub use client::{PracticumClient, PracticumConfig, StatusSource, DEFAULT_ENDPOINT};
