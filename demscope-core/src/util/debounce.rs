//!  src/util/debounce.rs
//!  ===================================================================
//!  Trailing-edge debouncing for filter bar edits.
//!
//!  • One pending sleeper task per `Debouncer`; resubmitting aborts the
//!    previous sleeper, so a burst of edits fires exactly once with the
//!    last submitted event.
//!  • Uses `tokio::time` sleeps: under a paused test clock the quiet
//!    window is fully deterministic.
//!  • The sleeper is released on `cancel()` and on `Drop`, so a torn-down
//!    owner never receives a late callback.

use std::time::Duration;

use tokio::{
    sync::mpsc,
    task::JoinHandle,
    time::{Instant, sleep_until},
};
use tracing::trace;

/* ======================== DebounceConfig ============================ */

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebounceConfig {
    /// Quiet period that must elapse after the last submit.
    pub delay: Duration,

    /// Upper bound on how long a burst may postpone firing.
    pub max_delay: Option<Duration>,
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self::entity_list()
    }
}

impl DebounceConfig {
    /// Coarse lists (entities, string tables).
    #[must_use]
    pub const fn entity_list() -> Self {
        Self {
            delay: Duration::from_millis(166),
            max_delay: None,
        }
    }

    /// Secondary/detail lists (entity fields).
    #[must_use]
    pub const fn field_list() -> Self {
        Self {
            delay: Duration::from_millis(10),
            max_delay: None,
        }
    }

    #[must_use]
    pub const fn with_max_delay(mut self, max_delay: Option<Duration>) -> Self {
        self.max_delay = max_delay;
        self
    }
}

/* ============================ Debouncer ============================ */

pub struct Debouncer<T> {
    cfg: DebounceConfig,
    tx: mpsc::UnboundedSender<T>,
    sleeper: Option<JoinHandle<()>>,
    // start of the current burst, for `max_delay`
    burst_started: Option<Instant>,
}

impl<T: Send + 'static> Debouncer<T> {
    /// Debouncer delivering fired events into `tx`.
    #[must_use]
    pub const fn new(cfg: DebounceConfig, tx: mpsc::UnboundedSender<T>) -> Self {
        Self {
            cfg,
            tx,
            sleeper: None,
            burst_started: None,
        }
    }

    /// Debouncer with its own receiving end.
    #[must_use]
    pub fn channel(cfg: DebounceConfig) -> (Self, mpsc::UnboundedReceiver<T>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(cfg, tx), rx)
    }

    #[must_use]
    pub const fn config(&self) -> DebounceConfig {
        self.cfg
    }

    /// True while a submitted event is waiting for its quiet period.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.sleeper
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Submit an event; must be called from within a Tokio runtime.
    pub fn submit(&mut self, ev: T) {
        let now = Instant::now();

        if !self.is_pending() {
            self.burst_started = Some(now);
        }

        // Cancel any existing sleeper
        if let Some(handle) = self.sleeper.take() {
            handle.abort();
        }

        let mut deadline = now + self.cfg.delay;
        if let (Some(max_delay), Some(started)) = (self.cfg.max_delay, self.burst_started) {
            deadline = deadline.min(started + max_delay);
        }

        trace!(delay_ms = self.cfg.delay.as_millis() as u64, "debounce armed");

        let tx = self.tx.clone();
        self.sleeper = Some(tokio::spawn(async move {
            sleep_until(deadline).await;
            let _ = tx.send(ev);
        }));
    }

    /// Drop the pending event, if any.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.sleeper.take() {
            handle.abort();
        }
        self.burst_started = None;
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.sleeper.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::advance;

    // Lets spawned sleepers observe the advanced clock.
    async fn settle() {
        for _ in 0..4 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_fires_once_with_last_event() {
        let (mut deb, mut rx) = Debouncer::channel(DebounceConfig::entity_list());

        deb.submit("a");
        advance(Duration::from_millis(50)).await;
        deb.submit("ab");
        advance(Duration::from_millis(50)).await;
        deb.submit("abc");
        settle().await;
        assert!(rx.try_recv().is_err());

        advance(Duration::from_millis(170)).await;
        settle().await;

        assert_eq!(rx.try_recv().ok(), Some("abc"));
        assert!(rx.try_recv().is_err());
        assert!(!deb.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_quiet_period_not_elapsed() {
        let (mut deb, mut rx) = Debouncer::channel(DebounceConfig::field_list());

        deb.submit(1);
        advance(Duration::from_millis(5)).await;
        settle().await;
        assert!(rx.try_recv().is_err());
        assert!(deb.is_pending());

        advance(Duration::from_millis(6)).await;
        settle().await;
        assert_eq!(rx.try_recv().ok(), Some(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_max_delay_caps_a_long_burst() {
        let cfg = DebounceConfig::entity_list().with_max_delay(Some(Duration::from_millis(300)));
        let (mut deb, mut rx) = Debouncer::channel(cfg);

        for i in 0..5 {
            deb.submit(i);
            advance(Duration::from_millis(100)).await;
            settle().await;
        }

        // burst started at t=0, so the cap fired at t=300 with event 2
        assert_eq!(rx.try_recv().ok(), Some(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_pending_event() {
        let (mut deb, mut rx) = Debouncer::channel(DebounceConfig::field_list());
        deb.submit(42);
        drop(deb);

        advance(Duration::from_millis(50)).await;
        settle().await;
        // sender side is gone and nothing was delivered
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_drops_pending_event() {
        let (mut deb, mut rx) = Debouncer::channel(DebounceConfig::field_list());
        deb.submit(7);
        deb.cancel();

        advance(Duration::from_millis(50)).await;
        settle().await;
        assert!(rx.try_recv().is_err());
    }
}
