//! 作业状态处理 - 从原始 API 响应到通知文本
//!
//! 数据流：`validate_response` 校验外层结构 → `parse_status` 逐条解析 →
//! 通过 `status::lookup` 查找评审结论。

pub mod parser;
pub mod response;
pub mod status;

pub use parser::{parse_status, WorkItem};
pub use response::{is_empty_response, validate_response};
pub use status::{lookup, Verdict};
