//! ri2c - I2C bus diagnostic tool
//!
//! A small command tool for poking at I2C buses: list buses, scan for
//! devices, read and write registers, dump register windows, and verify
//! writes. Options like the device address or data width are sticky, so
//! an interactive session can set them once and keep issuing short
//! commands.
//!
//! Run with a subcommand for a one-shot invocation, or with none for an
//! interactive session. With `--sim` the commands run against an
//! in-memory simulated board instead of `/dev/i2c-*`.

mod cli;
mod commands;
mod output;
mod shell;

use clap::Parser;
use cli::Cli;
use ri2c_core::gateway::Gateway;
use ri2c_core::options::{Limits, Options};

fn main() {
    let cli = Cli::parse();

    // Initialize logger
    let env = env_logger::Env::default().default_filter_or(log_filter(cli.verbose));
    env_logger::Builder::from_env(env).init();

    #[cfg(feature = "sim")]
    if cli.sim {
        run_and_exit(&ri2c_sim::SimGateway::demo_board(), cli);
    }

    #[cfg(feature = "linux-i2c")]
    run_and_exit(&ri2c_linux::LinuxGateway::new(), cli);

    #[cfg(not(feature = "linux-i2c"))]
    {
        eprintln!("ri2c: no hardware gateway built in; rebuild with the linux-i2c feature or pass --sim");
        std::process::exit(1);
    }
}

/// Runs the requested command, or the interactive session when no
/// command was given, and exits with the outcome.
fn run_and_exit<G: Gateway>(gateway: &G, cli: Cli) -> ! {
    let limits = Limits::default();
    let mut session = Options::default();

    let result = match cli.command {
        Some(command) => commands::dispatch(gateway, &mut session, &limits, command),
        None => shell::run(gateway, &mut session, &limits),
    };

    match result {
        Ok(()) => std::process::exit(0),
        Err(err) => {
            eprintln!("ri2c: {}", err);
            std::process::exit(1);
        }
    }
}

/// Default log filter for the given `-v` count. `RUST_LOG` overrides it
/// when set.
fn log_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}
