//! # Stopwatch
//!
//! A terminal stopwatch built on `stopwatch-lib`.

use log::error;

mod cli;
mod controls;
mod logging;
mod runner;
mod ui;

fn main() {
    // Missing .env is fine.
    dotenv::dotenv().ok();

    let args = cli::args::build_cli().get_matches();
    let interactive = args.subcommand().is_none() && !args.get_flag("quiet");
    let log_buffer = logging::init(!interactive);

    let code = match runner::run(&args, log_buffer) {
        Ok(code) => code,
        Err(err) => {
            error!("{}", err.to_string().to_lowercase());
            -1
        }
    };

    std::process::exit(code)
}
