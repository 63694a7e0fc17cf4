use std::{
    io::{self, Stdout},
    time::Duration,
};

use clap::ArgMatches;
use crossterm::{
    cursor, execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::info;
use ratatui::{backend::CrosstermBackend, Terminal};
use stopwatch_lib::{
    Clock, FrameRequests, FrameScheduler, IntervalTicker, MonotonicClock, SharedText, Stopwatch,
    SystemClock,
};

use crate::cli::{error::CliError, oneshot};
use crate::{controls, logging, ui};

pub fn run(args: &ArgMatches, log_buffer: logging::LogBuffer) -> Result<i32, CliError> {
    let fps = required::<u32>(args, "fps")?;

    match args.subcommand() {
        Some(("format", sub)) => {
            oneshot::run_format(required(sub, "MS")?, sub.get_flag("json"))
        }
        Some(("parse", sub)) => oneshot::run_parse(&required::<String>(sub, "TIME")?),
        Some(("run", sub)) => {
            oneshot::run_headless(required(sub, "for")?, fps, sub.get_flag("json"))
        }
        _ => run_interactive(args, fps, log_buffer),
    }
}

fn required<T>(args: &ArgMatches, id: &str) -> Result<T, CliError>
where
    T: Clone + Send + Sync + 'static,
{
    args.get_one::<T>(id)
        .cloned()
        .ok_or_else(|| CliError::InvalidArgument(format!("missing {}", id)))
}

fn build_clock(name: &str) -> Result<Box<dyn Clock>, CliError> {
    match name {
        "monotonic" => Ok(Box::new(MonotonicClock::new())),
        "wall" => Ok(Box::new(SystemClock)),
        other => Err(CliError::InvalidArgument(format!("unknown clock {}", other))),
    }
}

/// How the host answers the stopwatch's frame requests.
enum RefreshDriver {
    Frames(FrameRequests),
    Interval {
        ticker: IntervalTicker,
        clock: MonotonicClock,
    },
}

impl RefreshDriver {
    fn new(interval_ms: Option<u64>) -> Self {
        match interval_ms {
            Some(ms) => Self::Interval {
                ticker: IntervalTicker::new(Duration::from_millis(ms)),
                clock: MonotonicClock::new(),
            },
            None => Self::Frames(FrameRequests::new()),
        }
    }

    fn scheduler(&self) -> Box<dyn FrameScheduler> {
        match self {
            Self::Frames(frames) => Box::new(frames.clone()),
            Self::Interval { ticker, .. } => Box::new(ticker.clone()),
        }
    }

    /// Whether a refresh is owed at this frame boundary.
    fn due(&self) -> bool {
        match self {
            Self::Frames(frames) => frames.take(),
            Self::Interval { ticker, clock } => ticker.poll(clock.now_ms()),
        }
    }

    fn label(&self, fps: u32) -> String {
        match self {
            Self::Frames(_) => format!("{} fps", fps),
            Self::Interval { ticker, .. } => {
                format!("every {} ms", ticker.interval().as_millis())
            }
        }
    }
}

fn run_interactive(
    args: &ArgMatches,
    fps: u32,
    log_buffer: logging::LogBuffer,
) -> Result<i32, CliError> {
    let clock_name = required::<String>(args, "clock")?;
    let quiet = args.get_flag("quiet");
    let frame = Duration::from_millis((1000 / u64::from(fps.max(1))).max(1));

    let display = SharedText::new();
    let driver = RefreshDriver::new(args.get_one::<u64>("interval-ms").copied());
    let clock = build_clock(&clock_name)?;
    let mut stopwatch = Stopwatch::with_clock(clock, Some(Box::new(display.clone())))
        .with_frame_scheduler(driver.scheduler());
    let refresh = driver.label(fps);
    info!("stopwatch ready (clock: {}, refresh: {})", clock_name, refresh);

    if args.get_flag("autostart") {
        stopwatch.start();
        info!("started");
    }

    {
        let _raw_mode = RawModeGuard::enable()?;
        let mut terminal = if quiet { None } else { Some(enter_terminal()?) };

        // UI / input loop.
        loop {
            if driver.due() {
                stopwatch.draw();
            }

            if let Some(term) = terminal.as_mut() {
                let log_lines = logging::snapshot(&log_buffer);
                let status = controls::status_text(controls::StatusArgs {
                    time: display.text(),
                    running: stopwatch.is_running(),
                    clock: &clock_name,
                    refresh: &refresh,
                });
                ui::draw_status(term, &status, &log_lines);
            }

            if !controls::handle_key_event(&mut stopwatch, frame) {
                break;
            }
        }

        // Restore the terminal state before exiting.
        if let Some(term) = terminal {
            leave_terminal(term);
        }
    }

    display.detach();
    if quiet {
        println!("{}", stopwatch.elapsed_formatted());
    }

    Ok(0)
}

fn enter_terminal() -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, cursor::Hide)?;
    Terminal::new(CrosstermBackend::new(stdout))
}

fn leave_terminal(mut term: Terminal<CrosstermBackend<Stdout>>) {
    let _ = term.show_cursor();
    let stdout = term.backend_mut();
    let _ = execute!(stdout, LeaveAlternateScreen, cursor::Show);
}

struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::args::build_cli;

    #[test]
    fn builds_both_clocks() {
        assert!(build_clock("monotonic").is_ok());
        assert!(build_clock("wall").is_ok());
        assert!(matches!(
            build_clock("sundial"),
            Err(CliError::InvalidArgument(_))
        ));
    }

    #[test]
    fn interval_driver_serves_requests_once() {
        let driver = RefreshDriver::new(Some(10_000));
        let mut scheduler = driver.scheduler();
        assert!(!driver.due());
        scheduler.request_frame();
        assert!(driver.due());
        scheduler.request_frame();
        assert!(!driver.due());
        assert_eq!(driver.label(60), "every 10000 ms");
    }

    #[test]
    fn frame_driver_serves_each_request() {
        let driver = RefreshDriver::new(None);
        let mut scheduler = driver.scheduler();
        scheduler.request_frame();
        assert!(driver.due());
        assert!(!driver.due());
        assert_eq!(driver.label(30), "30 fps");
    }

    #[test]
    fn required_reports_missing_ids() {
        let matches = build_cli().get_matches_from(["stopwatch"]);
        assert_eq!(required::<u32>(&matches, "fps").unwrap(), 60);
        assert!(matches!(
            required::<u64>(&matches, "interval-ms"),
            Err(CliError::InvalidArgument(_))
        ));
    }
}
