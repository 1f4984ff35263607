//! Periodic tick scheduler.
//!
//! Components that need to run on a cadence subscribe a handler; every tick
//! calls each subscribed handler once. Ticks never overlap: a tick that
//! arrives while another is still running waits for it to finish.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

/// Handler invoked on every tick.
pub type TickHandler = Arc<dyn Fn() + Send + Sync>;

/// Handle returned by [`Scheduler::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Recurring timer with handler registration.
pub struct Scheduler {
    interval: Duration,
    handlers: Mutex<Vec<(SubscriptionId, TickHandler)>>,
    next_id: AtomicU64,
    /// Held for the duration of a tick.
    tick_lock: Mutex<()>,
}

impl Scheduler {
    /// Create a scheduler ticking every `interval`.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            handlers: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(0),
            tick_lock: Mutex::new(()),
        }
    }

    /// Time between ticks.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Register a handler to be called on every tick.
    pub fn subscribe<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn() + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.handlers.lock().push((id, Arc::new(handler)));
        id
    }

    /// Remove a handler. Returns `false` if it was not subscribed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut handlers = self.handlers.lock();
        let before = handlers.len();
        handlers.retain(|(handler_id, _)| *handler_id != id);
        handlers.len() != before
    }

    /// Number of subscribed handlers.
    pub fn subscriber_count(&self) -> usize {
        self.handlers.lock().len()
    }

    /// Run every subscribed handler once.
    pub fn tick(&self) {
        let _running = self.tick_lock.lock();

        // Handlers run outside the subscription lock so they may (un)subscribe.
        let handlers: Vec<TickHandler> = self
            .handlers
            .lock()
            .iter()
            .map(|(_, handler)| Arc::clone(handler))
            .collect();

        for handler in handlers {
            handler();
        }
    }

    /// Tick on the configured interval until `shutdown_rx` fires.
    ///
    /// Each tick runs on the blocking thread pool since handlers do file IO.
    /// Missed ticks are skipped rather than queued.
    pub async fn run(self: Arc<Self>, mut shutdown_rx: watch::Receiver<()>) {
        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        log::debug!("Scheduler running every {:?}", self.interval);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let scheduler = Arc::clone(&self);
                    if let Err(e) = tokio::task::spawn_blocking(move || scheduler.tick()).await {
                        log::error!("Scheduler tick failed: {}", e);
                    }
                }
                _ = shutdown_rx.changed() => break,
            }
        }

        log::debug!("Scheduler stopped");
    }
}
