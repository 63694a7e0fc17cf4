//! CLI argument definitions for `stopwatch-cli`.

use clap::{value_parser, Arg, ArgAction, Command};

/// Build the CLI argument parser and command definitions.
pub fn build_cli() -> Command {
    Command::new("stopwatch")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A terminal stopwatch")
        .arg(
            Arg::new("clock")
                .long("clock")
                .short('c')
                .value_name("CLOCK")
                .value_parser(["monotonic", "wall"])
                .default_value("monotonic")
                .help("Time source: monotonic ignores system clock changes, wall follows them"),
        )
        .arg(
            Arg::new("fps")
                .long("fps")
                .value_name("FPS")
                .value_parser(value_parser!(u32).range(1..=240))
                .default_value("60")
                .help("Display refresh rate while running"),
        )
        .arg(
            Arg::new("interval-ms")
                .long("interval-ms")
                .value_name("MS")
                .value_parser(value_parser!(u64).range(1..))
                .help("Refresh on a fixed interval instead of every frame"),
        )
        .arg(
            Arg::new("autostart")
                .long("autostart")
                .short('a')
                .action(ArgAction::SetTrue)
                .help("Start running immediately"),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .short('q')
                .action(ArgAction::SetTrue)
                .help("No terminal UI; print the final time on quit"),
        )
        .subcommand(
            Command::new("format")
                .about("Format a millisecond count as HH:MM:SS.mmm")
                .arg(
                    Arg::new("MS")
                        .help("Elapsed milliseconds")
                        .required(true)
                        .value_parser(value_parser!(u64))
                        .index(1),
                )
                .arg(json_arg()),
        )
        .subcommand(
            Command::new("parse")
                .about("Convert HH:MM:SS.mmm back to milliseconds")
                .arg(
                    Arg::new("TIME")
                        .help("Formatted elapsed time")
                        .required(true)
                        .index(1),
                ),
        )
        .subcommand(
            Command::new("run")
                .about("Run headless for a fixed time, then print the elapsed time")
                .arg(
                    Arg::new("for")
                        .long("for")
                        .value_name("MS")
                        .required(true)
                        .value_parser(value_parser!(u64))
                        .help("How long to run, in milliseconds"),
                )
                .arg(json_arg()),
        )
}

fn json_arg() -> Arg {
    Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .help("Print a JSON snapshot instead of plain text")
}
