//! Interactive session
//!
//! Lines are parsed with the same grammar as the one-shot commands, so
//! option flags behave identically and stay sticky from line to line.

use clap::Parser;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use ri2c_core::gateway::Gateway;
use ri2c_core::options::{Limits, Options};

use crate::cli::ShellLine;
use crate::commands;

/// Read and run commands until `exit` or end of input.
pub fn run<G: Gateway>(
    gateway: &G,
    session: &mut Options,
    limits: &Limits,
) -> Result<(), Box<dyn std::error::Error>> {
    println!(
        "ri2c {} - type 'help' for commands, 'exit' to leave",
        env!("CARGO_PKG_VERSION")
    );

    let mut rl = DefaultEditor::new()?;
    loop {
        match rl.readline("i2c> ") {
            Ok(line) => {
                let input = line.trim();
                if input.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(input);

                if input == "exit" || input == "quit" {
                    break;
                }

                let words = std::iter::once("i2c").chain(input.split_whitespace());
                match ShellLine::try_parse_from(words) {
                    Ok(parsed) => {
                        if let Err(err) = commands::dispatch(gateway, session, limits, parsed.command)
                        {
                            eprintln!("ri2c: {}", err);
                        }
                    }
                    // clap renders help and usage errors itself.
                    Err(err) => {
                        let _ = err.print();
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => return Err(Box::new(err)),
        }
    }
    Ok(())
}
