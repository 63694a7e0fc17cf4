//! The pausable stopwatch and its refresh chain.

use std::fmt::{Display, Formatter};

use log::debug;
use serde::Serialize;

use crate::clock::{Clock, MonotonicClock};
use crate::display::DisplaySink;
use crate::format::format_elapsed;
use crate::schedule::FrameScheduler;

/// Elapsed time as returned by [`Stopwatch::get_elapsed`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Elapsed {
    Millis(u64),
    Formatted(String),
}

impl Display for Elapsed {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Millis(ms) => write!(f, "{}", ms),
            Self::Formatted(text) => f.write_str(text),
        }
    }
}

/// Point-in-time view of a stopwatch, for UI consumers and JSON output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub elapsed_ms: u64,
    pub formatted: String,
    pub running: bool,
}

/// Measures running time across start/pause/reset cycles.
///
/// Time spent paused is not counted. When a display sink is attached the
/// stopwatch writes the formatted time into it on every transition and,
/// given a [`FrameScheduler`], keeps it fresh once per frame while running.
pub struct Stopwatch<C: Clock = MonotonicClock> {
    clock: C,
    // Completed segments only; the running segment is added on demand.
    elapsed_ms: u64,
    segment_start_ms: u64,
    running: bool,
    display: Option<Box<dyn DisplaySink>>,
    frames: Option<Box<dyn FrameScheduler>>,
    detached_reported: bool,
}

impl Stopwatch<MonotonicClock> {
    /// Create a paused stopwatch at zero on the monotonic clock.
    ///
    /// An attached sink is drawn immediately so it shows `00:00:00.000`.
    pub fn new(display: Option<Box<dyn DisplaySink>>) -> Self {
        Self::with_clock(MonotonicClock::new(), display)
    }
}

impl Default for Stopwatch<MonotonicClock> {
    fn default() -> Self {
        Self::new(None)
    }
}

impl<C: Clock> Stopwatch<C> {
    /// Create a paused stopwatch at zero reading time from `clock`.
    pub fn with_clock(clock: C, display: Option<Box<dyn DisplaySink>>) -> Self {
        let mut stopwatch = Self {
            clock,
            elapsed_ms: 0,
            segment_start_ms: 0,
            running: false,
            display,
            frames: None,
            detached_reported: false,
        };
        stopwatch.draw();
        stopwatch
    }

    /// Attach the scheduler that drives the refresh chain while running.
    pub fn with_frame_scheduler(mut self, frames: Box<dyn FrameScheduler>) -> Self {
        self.frames = Some(frames);
        self
    }

    /// Elapsed time, either as raw milliseconds or as `HH:MM:SS.mmm`.
    pub fn get_elapsed(&self, formatted: bool) -> Elapsed {
        if formatted {
            Elapsed::Formatted(self.elapsed_formatted())
        } else {
            Elapsed::Millis(self.elapsed_ms())
        }
    }

    /// Total running time in milliseconds, including the current segment.
    pub fn elapsed_ms(&self) -> u64 {
        if self.running {
            // A clock that steps backwards counts as zero progress.
            let segment = self.clock.now_ms().saturating_sub(self.segment_start_ms);
            self.elapsed_ms.saturating_add(segment)
        } else {
            self.elapsed_ms
        }
    }

    /// Total running time rendered as `HH:MM:SS.mmm`.
    pub fn elapsed_formatted(&self) -> String {
        format_elapsed(self.elapsed_ms())
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn snapshot(&self) -> Snapshot {
        let elapsed_ms = self.elapsed_ms();
        Snapshot {
            elapsed_ms,
            formatted: format_elapsed(elapsed_ms),
            running: self.running,
        }
    }

    /// Begin a new segment. Does nothing if already running.
    pub fn start(&mut self) -> &mut Self {
        if !self.running {
            self.segment_start_ms = self.clock.now_ms();
            self.running = true;
            debug!("stopwatch started at {} ms", self.segment_start_ms);
        }
        self.draw()
    }

    /// Close the current segment. Does nothing if already paused.
    pub fn pause(&mut self) -> &mut Self {
        if self.running {
            let segment = self.clock.now_ms().saturating_sub(self.segment_start_ms);
            self.elapsed_ms = self.elapsed_ms.saturating_add(segment);
            self.running = false;
            self.cancel_frames();
            debug!("stopwatch paused at {} ms elapsed", self.elapsed_ms);
        }
        self.draw()
    }

    /// Back to zero and paused, whatever the previous state.
    pub fn reset(&mut self) -> &mut Self {
        self.elapsed_ms = 0;
        self.segment_start_ms = 0;
        self.running = false;
        self.cancel_frames();
        debug!("stopwatch reset");
        self.draw()
    }

    /// Reset to zero, then start running.
    pub fn restart(&mut self) -> &mut Self {
        self.reset().start()
    }

    /// Start if paused, pause if running.
    pub fn toggle(&mut self) -> &mut Self {
        if self.running {
            self.pause()
        } else {
            self.start()
        }
    }

    /// Write the current time to the display sink.
    ///
    /// While running this also requests the next frame, and the host answers
    /// that frame by calling `draw` again. Hosts rarely need to call this
    /// outside of their frame callback.
    pub fn draw(&mut self) -> &mut Self {
        if self.display.is_none() {
            return self;
        }
        let text = self.elapsed_formatted();
        let Some(display) = self.display.as_mut() else {
            return self;
        };

        if !display.is_attached() {
            if !self.detached_reported {
                debug!("display sink is detached, skipping refresh");
                self.detached_reported = true;
            }
            return self;
        }

        display.set_text(&text);
        if self.running {
            if let Some(frames) = self.frames.as_mut() {
                frames.request_frame();
            }
        }
        self
    }

    fn cancel_frames(&mut self) {
        if let Some(frames) = self.frames.as_mut() {
            frames.cancel();
        }
    }
}

impl<C: Clock> std::fmt::Debug for Stopwatch<C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stopwatch")
            .field("elapsed_ms", &self.elapsed_ms)
            .field("segment_start_ms", &self.segment_start_ms)
            .field("running", &self.running)
            .field("display", &self.display.is_some())
            .field("frames", &self.frames.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::display::SharedText;
    use crate::schedule::{FrameRequests, IntervalTicker};
    use std::time::Duration;

    fn manual() -> (ManualClock, Stopwatch<ManualClock>) {
        let clock = ManualClock::new(1_000_000);
        let stopwatch = Stopwatch::with_clock(clock.clone(), None);
        (clock, stopwatch)
    }

    fn displayed() -> (ManualClock, SharedText, FrameRequests, Stopwatch<ManualClock>) {
        let clock = ManualClock::new(0);
        let text = SharedText::new();
        let frames = FrameRequests::new();
        let stopwatch = Stopwatch::with_clock(clock.clone(), Some(Box::new(text.clone())))
            .with_frame_scheduler(Box::new(frames.clone()));
        (clock, text, frames, stopwatch)
    }

    #[test]
    fn fresh_stopwatch_is_zero_and_paused() {
        let (_, stopwatch) = manual();
        assert!(!stopwatch.is_running());
        assert_eq!(stopwatch.elapsed_ms(), 0);
        assert_eq!(
            stopwatch.get_elapsed(true),
            Elapsed::Formatted("00:00:00.000".to_string())
        );
        assert_eq!(stopwatch.get_elapsed(false), Elapsed::Millis(0));
    }

    #[test]
    fn construction_draws_zero_into_sink() {
        let text = SharedText::new();
        let _stopwatch = Stopwatch::new(Some(Box::new(text.clone())));
        assert_eq!(text.text(), "00:00:00.000");
    }

    #[test]
    fn single_segment_measures_wait() {
        let (clock, mut stopwatch) = manual();
        stopwatch.start();
        clock.advance(1_500);
        assert_eq!(stopwatch.elapsed_ms(), 1_500);
        stopwatch.pause();

        assert_eq!(stopwatch.elapsed_ms(), 1_500);
        assert!(stopwatch.elapsed_formatted().starts_with("00:00:01."));

        clock.advance(10_000);
        assert_eq!(stopwatch.elapsed_ms(), 1_500);
    }

    #[test]
    fn segments_accumulate_across_pauses() {
        let (clock, mut stopwatch) = manual();
        stopwatch.start();
        clock.advance(300);
        stopwatch.pause();
        clock.advance(5_000);
        stopwatch.start();
        clock.advance(200);
        stopwatch.pause();
        assert_eq!(stopwatch.elapsed_ms(), 500);
    }

    #[test]
    fn redundant_calls_do_not_change_total() {
        let (clock, mut stopwatch) = manual();
        stopwatch.pause().pause();
        stopwatch.start();
        clock.advance(100);
        stopwatch.start().start();
        clock.advance(100);
        stopwatch.pause();
        clock.advance(700);
        stopwatch.pause();
        stopwatch.start();
        clock.advance(50);
        stopwatch.start().pause().pause();
        assert_eq!(stopwatch.elapsed_ms(), 250);
    }

    #[test]
    fn running_elapsed_includes_current_segment() {
        let (clock, mut stopwatch) = manual();
        stopwatch.start();
        clock.advance(400);
        stopwatch.pause().start();
        clock.advance(600);
        assert!(stopwatch.is_running());
        assert_eq!(stopwatch.elapsed_ms(), 1_000);
        assert_eq!(stopwatch.get_elapsed(false).to_string(), "1000");
    }

    #[test]
    fn reset_zeroes_from_any_state() {
        let (clock, mut stopwatch) = manual();
        stopwatch.start();
        clock.advance(2_000);
        stopwatch.reset();
        assert!(!stopwatch.is_running());
        assert_eq!(stopwatch.elapsed_ms(), 0);
        assert_eq!(stopwatch.elapsed_formatted(), "00:00:00.000");
        clock.advance(2_000);
        assert_eq!(stopwatch.elapsed_ms(), 0);

        stopwatch.start();
        clock.advance(900);
        stopwatch.pause().reset();
        assert_eq!(stopwatch.elapsed_ms(), 0);
        assert_eq!(stopwatch.get_elapsed(true).to_string(), "00:00:00.000");
    }

    #[test]
    fn restart_runs_from_zero() {
        let (clock, mut stopwatch) = manual();
        stopwatch.start();
        clock.advance(5_000);
        stopwatch.restart();
        assert!(stopwatch.is_running());
        assert_eq!(stopwatch.elapsed_ms(), 0);
        clock.advance(25);
        assert_eq!(stopwatch.elapsed_ms(), 25);
    }

    #[test]
    fn restart_on_real_clock_starts_near_zero() {
        let mut stopwatch: Stopwatch = Stopwatch::default();
        stopwatch.restart();
        assert!(stopwatch.is_running());
        assert!(stopwatch.elapsed_ms() < 50);
    }

    #[test]
    fn toggle_alternates_and_never_loses_time() {
        let (clock, mut stopwatch) = manual();
        stopwatch.toggle();
        assert!(stopwatch.is_running());
        clock.advance(120);
        let before = stopwatch.elapsed_ms();
        stopwatch.toggle();
        assert!(!stopwatch.is_running());
        assert!(stopwatch.elapsed_ms() >= before);
        assert_eq!(stopwatch.elapsed_ms(), 120);
    }

    #[test]
    fn large_totals_format_with_wide_hours() {
        let (clock, mut stopwatch) = manual();
        stopwatch.start();
        clock.advance(360_000_000);
        stopwatch.pause();
        assert_eq!(stopwatch.elapsed_formatted(), "100:00:00.000");
    }

    #[test]
    fn backwards_clock_step_counts_as_zero() {
        let (clock, mut stopwatch) = manual();
        stopwatch.start();
        clock.advance(500);
        stopwatch.pause().start();
        clock.set(0);
        assert_eq!(stopwatch.elapsed_ms(), 500);
        stopwatch.pause();
        assert_eq!(stopwatch.elapsed_ms(), 500);
    }

    #[test]
    fn snapshot_reflects_state() {
        let (clock, mut stopwatch) = manual();
        stopwatch.start();
        clock.advance(61_001);
        let snapshot = stopwatch.snapshot();
        assert_eq!(
            snapshot,
            Snapshot {
                elapsed_ms: 61_001,
                formatted: "00:01:01.001".to_string(),
                running: true,
            }
        );
        let json = serde_json::to_value(&snapshot).expect("serialize snapshot");
        assert_eq!(json["elapsed_ms"], 61_001);
        assert_eq!(json["formatted"], "00:01:01.001");
        assert_eq!(json["running"], true);
    }

    #[test]
    fn transitions_refresh_the_sink() {
        let (clock, text, _frames, mut stopwatch) = displayed();
        assert_eq!(text.text(), "00:00:00.000");

        stopwatch.start();
        clock.advance(1_234);
        stopwatch.pause();
        assert_eq!(text.text(), "00:00:01.234");

        stopwatch.reset();
        assert_eq!(text.text(), "00:00:00.000");
    }

    #[test]
    fn refresh_chain_runs_only_while_running() {
        let (clock, text, frames, mut stopwatch) = displayed();
        assert!(!frames.is_pending());

        stopwatch.start();
        for step in 1..=3 {
            assert!(frames.take());
            clock.advance(16);
            stopwatch.draw();
            assert_eq!(text.text(), format_elapsed(16 * step));
        }

        stopwatch.pause();
        assert!(!frames.is_pending());
        // A frame already in flight draws once and does not reschedule.
        stopwatch.draw();
        assert!(!frames.take());
    }

    #[test]
    fn reset_ends_refresh_chain() {
        let (_, _, frames, mut stopwatch) = displayed();
        stopwatch.start();
        assert!(frames.is_pending());
        stopwatch.reset();
        assert!(!frames.is_pending());

        stopwatch.restart();
        assert!(frames.take());
    }

    #[test]
    fn no_sink_means_no_frames() {
        let clock = ManualClock::new(0);
        let frames = FrameRequests::new();
        let mut stopwatch = Stopwatch::with_clock(clock.clone(), None)
            .with_frame_scheduler(Box::new(frames.clone()));
        stopwatch.start();
        assert!(!frames.is_pending());
        clock.advance(10);
        assert_eq!(stopwatch.elapsed_ms(), 10);
    }

    #[test]
    fn detached_sink_is_skipped_and_chain_stops() {
        let (clock, text, frames, mut stopwatch) = displayed();
        stopwatch.start();
        assert!(frames.take());
        text.detach();
        clock.advance(500);
        stopwatch.draw();
        assert_eq!(text.text(), "00:00:00.000");
        assert!(!frames.is_pending());
        assert_eq!(stopwatch.elapsed_ms(), 500);
    }

    #[test]
    fn interval_ticker_is_cancelled_by_pause() {
        let clock = ManualClock::new(0);
        let text = SharedText::new();
        let ticker = IntervalTicker::new(Duration::from_millis(100));
        let mut stopwatch = Stopwatch::with_clock(clock.clone(), Some(Box::new(text.clone())))
            .with_frame_scheduler(Box::new(ticker.clone()));

        stopwatch.start();
        assert!(ticker.is_armed());
        assert!(ticker.poll(clock.now_ms()));
        stopwatch.draw();

        clock.advance(100);
        assert!(ticker.poll(clock.now_ms()));
        stopwatch.draw();
        assert_eq!(text.text(), "00:00:00.100");

        stopwatch.pause();
        assert!(!ticker.is_armed());
        clock.advance(1_000);
        assert!(!ticker.poll(clock.now_ms()));
    }

    #[test]
    fn debug_output_names_state() {
        let (_, stopwatch) = manual();
        let debug = format!("{:?}", stopwatch);
        assert!(debug.contains("running: false"));
        assert!(debug.contains("elapsed_ms: 0"));
    }
}
