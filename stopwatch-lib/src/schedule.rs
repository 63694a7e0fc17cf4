//! Frame scheduling for the stopwatch's refresh chain.
//!
//! While running, every [`Stopwatch::draw`](crate::stopwatch::Stopwatch::draw)
//! asks its scheduler for exactly one more frame. The host answers each
//! granted frame by calling `draw` again, so the chain lasts as long as the
//! stopwatch keeps running.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex,
};
use std::time::Duration;

/// Something that can run one more refresh at the host's next frame.
pub trait FrameScheduler {
    /// Request one refresh at the next frame boundary.
    fn request_frame(&mut self);

    /// Drop any request that has not been served yet.
    fn cancel(&mut self) {}
}

impl<S: FrameScheduler + ?Sized> FrameScheduler for Box<S> {
    fn request_frame(&mut self) {
        (**self).request_frame()
    }

    fn cancel(&mut self) {
        (**self).cancel()
    }
}

/// Paint-driven scheduler: a single pending flag checked once per paint.
///
/// Only an unserved request is ever pending, so repeated requests within one
/// frame collapse into one refresh.
#[derive(Debug, Clone, Default)]
pub struct FrameRequests {
    pending: Arc<AtomicBool>,
}

impl FrameRequests {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume the pending request, if any. Call once per paint.
    pub fn take(&self) -> bool {
        self.pending.swap(false, Ordering::SeqCst)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::SeqCst)
    }
}

impl FrameScheduler for FrameRequests {
    fn request_frame(&mut self) {
        self.pending.store(true, Ordering::SeqCst);
    }

    fn cancel(&mut self) {
        self.pending.store(false, Ordering::SeqCst);
    }
}

#[derive(Debug, Default)]
struct TickerState {
    armed: bool,
    next_due_ms: Option<u64>,
}

/// Fixed-interval cooperative timer for hosts without a paint cadence.
///
/// A request arms the ticker; [`IntervalTicker::poll`] fires at most once per
/// interval. Clones share state, so the host can keep one clone to poll and
/// hand another to the stopwatch, which cancels it on pause and reset.
#[derive(Debug, Clone)]
pub struct IntervalTicker {
    interval_ms: u64,
    state: Arc<Mutex<TickerState>>,
}

impl IntervalTicker {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval_ms: (interval.as_millis() as u64).max(1),
            state: Arc::new(Mutex::new(TickerState::default())),
        }
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    /// Return `true` if an armed request is due at `now_ms`, disarming it.
    ///
    /// The first firing after arming from idle happens immediately; after that
    /// firings are spaced by the interval.
    pub fn poll(&self, now_ms: u64) -> bool {
        let mut state = self.lock();
        if !state.armed {
            return false;
        }
        let due = state.next_due_ms.map_or(true, |due| now_ms >= due);
        if due {
            state.armed = false;
            state.next_due_ms = Some(now_ms.saturating_add(self.interval_ms));
        }
        due
    }

    pub fn is_armed(&self) -> bool {
        self.lock().armed
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, TickerState> {
        match self.state.lock() {
            Ok(state) => state,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl FrameScheduler for IntervalTicker {
    fn request_frame(&mut self) {
        self.lock().armed = true;
    }

    fn cancel(&mut self) {
        let mut state = self.lock();
        state.armed = false;
        state.next_due_ms = None;
    }
}
