//! 轮询主循环
//!
//! 每轮：拉取 → 校验 → 逐条解析 → 通知。任一步出错都会中止本轮剩余记录，
//! 错误被记录日志并尽力通过同一通知闸门告知用户。无论结果如何，
//! 两轮之间都等待相同的固定间隔（不是退避）。

use crate::api::StatusSource;
use crate::error::BotError;
use crate::homework::{is_empty_response, parse_status, validate_response};
use crate::notification::{ChatChannel, NotificationGate};
use std::time::Duration;
use tracing::{debug, error, info};

/// 一轮轮询的结果
#[derive(Debug)]
pub enum CycleOutcome {
    /// 响应为空，游标未推进
    Idle,
    /// 响应已处理
    Processed { items: usize, delivered: usize },
    /// 本轮出错（已记录并尝试通知）
    Faulted(BotError),
}

/// 格式化失败通知
pub fn format_failure_message(error: &BotError) -> String {
    format!("Сбой в работе программы: {}", error)
}

fn unix_now() -> i64 {
    chrono::Utc::now().timestamp()
}

/// 轮询主循环
pub struct PollLoop<S, C> {
    source: S,
    gate: NotificationGate<C>,
    /// 下一次请求的 from_date
    cursor: i64,
    interval: Duration,
    clock: Box<dyn Fn() -> i64>,
}

impl<S: StatusSource, C: ChatChannel> PollLoop<S, C> {
    /// 创建主循环，游标初始化为当前时间
    pub fn new(source: S, gate: NotificationGate<C>, interval: Duration) -> Self {
        Self {
            source,
            gate,
            cursor: unix_now(),
            interval,
            clock: Box::new(unix_now),
        }
    }

    /// 替换时钟，游标按新时钟重新初始化
    pub fn with_clock(mut self, clock: impl Fn() -> i64 + 'static) -> Self {
        self.cursor = clock();
        self.clock = Box::new(clock);
        self
    }

    /// 指定初始游标
    pub fn with_cursor(mut self, cursor: i64) -> Self {
        self.cursor = cursor;
        self
    }

    pub fn cursor(&self) -> i64 {
        self.cursor
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn gate(&self) -> &NotificationGate<C> {
        &self.gate
    }

    /// 执行一轮，所有错误都在此处收敛
    pub fn run_cycle(&mut self) -> CycleOutcome {
        match self.poll() {
            Ok(None) => CycleOutcome::Idle,
            Ok(Some((items, delivered))) => CycleOutcome::Processed { items, delivered },
            Err(e) => {
                let message = format_failure_message(&e);
                error!(error = %e, delivery_failure = e.is_delivery(), "{}", message);

                if let Err(notify_err) = self.gate.notify(&message) {
                    error!(error = %notify_err, "Failed to deliver failure notification");
                }
                CycleOutcome::Faulted(e)
            }
        }
    }

    /// 无限循环，只能通过外部终止进程结束
    pub fn run(&mut self) -> ! {
        info!(
            interval_secs = self.interval.as_secs(),
            cursor = self.cursor,
            "Homework status polling started"
        );

        loop {
            let outcome = self.run_cycle();
            debug!(outcome = ?outcome, cursor = self.cursor, "Cycle finished");
            std::thread::sleep(self.interval);
        }
    }

    fn poll(&mut self) -> Result<Option<(usize, usize)>, BotError> {
        let response = self.source.fetch(self.cursor)?;
        if is_empty_response(&response) {
            debug!(cursor = self.cursor, "Empty API response, cursor unchanged");
            return Ok(None);
        }

        self.cursor = self.cursor.max((self.clock)());

        let homeworks = validate_response(&response)?;
        if homeworks.is_empty() {
            debug!("No homework status updates");
        }

        let mut delivered = 0;
        for homework in &homeworks {
            let message = parse_status(homework)?;
            if self.gate.notify(&message)? {
                delivered += 1;
            }
        }

        Ok(Some((homeworks.len(), delivered)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ChannelError;
    use serde_json::{json, Value};
    use std::cell::{Cell, RefCell};
    use std::collections::VecDeque;
    use std::rc::Rc;

    struct ScriptedSource {
        responses: RefCell<VecDeque<Result<Value, BotError>>>,
        requests: RefCell<Vec<i64>>,
    }

    impl ScriptedSource {
        fn new(responses: Vec<Result<Value, BotError>>) -> Self {
            Self {
                responses: RefCell::new(responses.into()),
                requests: RefCell::new(Vec::new()),
            }
        }
    }

    impl StatusSource for ScriptedSource {
        fn fetch(&self, from_date: i64) -> Result<Value, BotError> {
            self.requests.borrow_mut().push(from_date);
            self.responses
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Ok(json!({})))
        }
    }

    #[derive(Default)]
    struct RecordingChannel {
        sent: RefCell<Vec<String>>,
    }

    impl ChatChannel for RecordingChannel {
        fn name(&self) -> &str {
            "recording"
        }

        fn send(&self, _chat_id: &str, text: &str) -> Result<(), ChannelError> {
            self.sent.borrow_mut().push(text.to_string());
            Ok(())
        }
    }

    fn poll_loop(
        responses: Vec<Result<Value, BotError>>,
        clock: Rc<Cell<i64>>,
    ) -> PollLoop<ScriptedSource, RecordingChannel> {
        let gate = NotificationGate::new(RecordingChannel::default(), "42");
        PollLoop::new(ScriptedSource::new(responses), gate, Duration::from_secs(600))
            .with_clock(move || clock.get())
    }

    #[test]
    fn test_cursor_starts_at_clock() {
        let clock = Rc::new(Cell::new(1_000));
        let poller = poll_loop(vec![], clock);
        assert_eq!(poller.cursor(), 1_000);
        assert_eq!(poller.interval(), Duration::from_secs(600));
    }

    #[test]
    fn test_explicit_cursor_is_used_for_first_request() {
        let clock = Rc::new(Cell::new(1_000));
        let mut poller = poll_loop(vec![], clock).with_cursor(42);
        poller.run_cycle();
        assert_eq!(*poller.source().requests.borrow(), vec![42]);
    }

    #[test]
    fn test_empty_response_keeps_cursor() {
        let clock = Rc::new(Cell::new(1_000));
        let mut poller = poll_loop(vec![Ok(json!({}))], clock.clone());

        clock.set(2_000);
        assert!(matches!(poller.run_cycle(), CycleOutcome::Idle));
        assert_eq!(poller.cursor(), 1_000);
        assert!(poller.gate().channel().sent.borrow().is_empty());
    }

    #[test]
    fn test_non_empty_response_advances_cursor() {
        let clock = Rc::new(Cell::new(1_000));
        let mut poller = poll_loop(
            vec![Ok(json!({"homeworks": [], "current_date": 1_500}))],
            clock.clone(),
        );

        clock.set(2_000);
        assert!(matches!(
            poller.run_cycle(),
            CycleOutcome::Processed { items: 0, delivered: 0 }
        ));
        assert_eq!(poller.cursor(), 2_000);

        // 下一轮使用新的游标
        poller.run_cycle();
        assert_eq!(*poller.source().requests.borrow(), vec![1_000, 2_000]);
    }

    #[test]
    fn test_cursor_never_moves_backwards() {
        let clock = Rc::new(Cell::new(1_000));
        let mut poller = poll_loop(vec![Ok(json!({"homeworks": []}))], clock.clone());

        clock.set(500);
        poller.run_cycle();
        assert_eq!(poller.cursor(), 1_000);
    }

    #[test]
    fn test_fault_is_reported_once() {
        let clock = Rc::new(Cell::new(1_000));
        let unknown = json!({"homeworks": [{"homework_name": "hw1", "status": "in_progress"}]});
        let mut poller = poll_loop(vec![Ok(unknown.clone()), Ok(unknown)], clock);

        assert!(matches!(
            poller.run_cycle(),
            CycleOutcome::Faulted(BotError::UnknownStatus(_))
        ));
        assert!(matches!(poller.run_cycle(), CycleOutcome::Faulted(_)));

        let sent = poller.gate().channel().sent.borrow();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].starts_with("Сбой в работе программы:"));
        assert!(sent[0].contains("in_progress"));
    }

    #[test]
    fn test_error_aborts_rest_of_batch() {
        let clock = Rc::new(Cell::new(1_000));
        let response = json!({"homeworks": [
            {"homework_name": "hw1", "status": "approved"},
            {"homework_name": "hw2"},
            {"homework_name": "hw3", "status": "rejected"}
        ]});
        let mut poller = poll_loop(vec![Ok(response)], clock);

        assert!(matches!(
            poller.run_cycle(),
            CycleOutcome::Faulted(BotError::MissingField { .. })
        ));

        let sent = poller.gate().channel().sent.borrow();
        assert_eq!(sent.len(), 2);
        assert!(sent[0].contains("hw1"));
        assert!(sent[1].starts_with("Сбой в работе программы:"));
        assert!(!sent.iter().any(|m| m.contains("hw3")));
    }

    #[test]
    fn test_remote_error_does_not_advance_cursor() {
        let clock = Rc::new(Cell::new(1_000));
        let mut poller = poll_loop(
            vec![Err(BotError::RemoteService {
                endpoint: "https://example.test/".to_string(),
                status: 500,
            })],
            clock.clone(),
        );

        clock.set(2_000);
        assert!(matches!(poller.run_cycle(), CycleOutcome::Faulted(_)));
        assert_eq!(poller.cursor(), 1_000);
        assert_eq!(poller.gate().channel().sent.borrow().len(), 1);
    }
}
