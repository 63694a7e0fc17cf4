//! # Stopwatch Library
//!
//! A pausable elapsed-time tracker meant to sit behind a UI label. The
//! [`Stopwatch`] accumulates running time across start/pause/reset cycles,
//! formats it as `HH:MM:SS.mmm`, and can keep a display sink fresh once per
//! host frame while it runs.

pub mod clock;
pub mod display;
pub mod format;
pub mod schedule;
pub mod stopwatch;

pub use clock::{Clock, ManualClock, MonotonicClock, SystemClock};
pub use display::{DisplaySink, SharedText};
pub use format::{format_elapsed, pad_num, parse_elapsed, ParseElapsedError};
pub use schedule::{FrameRequests, FrameScheduler, IntervalTicker};
pub use stopwatch::{Elapsed, Snapshot, Stopwatch};
