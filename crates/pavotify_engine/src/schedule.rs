use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use chrono::Utc;

/// Clock and timer used by the session controller and simulated transfers.
#[async_trait::async_trait]
pub trait Scheduler: Send + Sync {
    /// Current time in epoch milliseconds.
    fn now_millis(&self) -> i64;

    async fn sleep(&self, delay: Duration);
}

/// Wall-clock time and tokio timers.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioScheduler;

#[async_trait::async_trait]
impl Scheduler for TokioScheduler {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }

    async fn sleep(&self, delay: Duration) {
        tokio::time::sleep(delay).await;
    }
}

/// Virtual time: `sleep` returns at once, advancing the clock by the requested delay.
/// Every requested delay is recorded in order.
#[derive(Debug, Default)]
pub struct VirtualScheduler {
    now: AtomicI64,
    sleeps: Mutex<Vec<Duration>>,
}

impl VirtualScheduler {
    pub fn starting_at(now_millis: i64) -> Self {
        Self {
            now: AtomicI64::new(now_millis),
            sleeps: Mutex::new(Vec::new()),
        }
    }

    pub fn advance(&self, delay: Duration) {
        let millis = i64::try_from(delay.as_millis()).unwrap_or(i64::MAX);
        self.now.fetch_add(millis, Ordering::SeqCst);
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait::async_trait]
impl Scheduler for VirtualScheduler {
    fn now_millis(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }

    async fn sleep(&self, delay: Duration) {
        self.sleeps
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(delay);
        self.advance(delay);
        tokio::task::yield_now().await;
    }
}
