//! Non-interactive subcommands: format, parse and headless runs.

use std::thread::sleep;
use std::time::Duration;

use log::info;
use stopwatch_lib::{
    format_elapsed, parse_elapsed, FrameRequests, SharedText, Snapshot, Stopwatch,
};

use super::error::CliError;

/// Print `ms` as `HH:MM:SS.mmm`, or as a JSON snapshot.
pub fn run_format(ms: u64, json: bool) -> Result<i32, CliError> {
    if json {
        let snapshot = Snapshot {
            elapsed_ms: ms,
            formatted: format_elapsed(ms),
            running: false,
        };
        println!("{}", serde_json::to_string(&snapshot)?);
    } else {
        println!("{}", format_elapsed(ms));
    }
    Ok(0)
}

/// Print the millisecond value of a formatted elapsed time.
pub fn run_parse(text: &str) -> Result<i32, CliError> {
    let ms = parse_elapsed(text.trim())?;
    println!("{}", ms);
    Ok(0)
}

/// Run a stopwatch on the real clock for at least `run_for_ms`, refreshing a
/// detached text cell at `fps`, then print the final time.
pub fn run_headless(run_for_ms: u64, fps: u32, json: bool) -> Result<i32, CliError> {
    if fps == 0 {
        return Err(CliError::InvalidArgument("fps must be positive".to_string()));
    }
    let frame = Duration::from_millis((1000 / u64::from(fps)).max(1));
    let display = SharedText::new();
    let frames = FrameRequests::new();
    let mut stopwatch = Stopwatch::new(Some(Box::new(display.clone())))
        .with_frame_scheduler(Box::new(frames.clone()));

    info!("running headless for {} ms", run_for_ms);
    stopwatch.start();
    let mut drawn = 0_u64;
    while stopwatch.elapsed_ms() < run_for_ms {
        let remaining = run_for_ms - stopwatch.elapsed_ms();
        sleep(frame.min(Duration::from_millis(remaining.max(1))));
        if frames.take() {
            stopwatch.draw();
            drawn += 1;
        }
    }
    stopwatch.pause();
    info!("headless run finished after {} frames at {}", drawn, display.text());

    if json {
        println!("{}", serde_json::to_string(&stopwatch.snapshot())?);
    } else {
        println!("{}", display.text());
    }
    Ok(0)
}
