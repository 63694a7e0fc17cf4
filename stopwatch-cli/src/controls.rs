use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use log::info;
use stopwatch_lib::{Clock, Stopwatch};

pub struct StatusSnapshot {
    pub time: String,
    pub text: String,
}

pub struct StatusArgs<'a> {
    pub time: String,
    pub running: bool,
    pub clock: &'a str,
    pub refresh: &'a str,
}

pub fn status_text(args: StatusArgs) -> StatusSnapshot {
    let state = if args.running { "▶ Running" } else { "⏸ Paused" };
    let text = format!(
        "{}\nClock: {} | refresh: {}",
        state, args.clock, args.refresh
    );

    StatusSnapshot {
        time: args.time,
        text,
    }
}

/// What a key press asks the host to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Toggle,
    Start,
    Pause,
    Reset,
    Restart,
    Quit,
}

pub fn action_for(key: KeyEvent) -> Option<Action> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    match key.code {
        KeyCode::Char(' ') => Some(Action::Toggle),
        KeyCode::Char('s') => Some(Action::Start),
        KeyCode::Char('p') => Some(Action::Pause),
        KeyCode::Char('r') => Some(Action::Reset),
        KeyCode::Char('R') => Some(Action::Restart),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Action::Quit),
        _ => None,
    }
}

/// Apply an action. Returns `false` once the host should exit.
pub fn apply<C: Clock>(stopwatch: &mut Stopwatch<C>, action: Action) -> bool {
    match action {
        Action::Toggle => {
            stopwatch.toggle();
            let verb = if stopwatch.is_running() { "resumed" } else { "paused" };
            info!("{} at {}", verb, stopwatch.elapsed_formatted());
        }
        Action::Start => {
            if !stopwatch.is_running() {
                stopwatch.start();
                info!("started at {}", stopwatch.elapsed_formatted());
            }
        }
        Action::Pause => {
            if stopwatch.is_running() {
                stopwatch.pause();
                info!("paused at {}", stopwatch.elapsed_formatted());
            }
        }
        Action::Reset => {
            stopwatch.reset();
            info!("reset");
        }
        Action::Restart => {
            stopwatch.restart();
            info!("restarted");
        }
        Action::Quit => {
            stopwatch.pause();
            info!("quit at {}", stopwatch.elapsed_formatted());
            return false;
        }
    }
    true
}

/// Wait up to `timeout` for a key and apply it. Returns `false` on quit.
pub fn handle_key_event<C: Clock>(stopwatch: &mut Stopwatch<C>, timeout: Duration) -> bool {
    if event::poll(timeout).unwrap_or(false) {
        if let Ok(Event::Key(key)) = event::read() {
            if let Some(action) = action_for(key) {
                return apply(stopwatch, action);
            }
        }
    }

    true
}
