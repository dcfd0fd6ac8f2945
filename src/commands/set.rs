//! Register write command

use ri2c_core::gateway::Gateway;
use ri2c_core::options::{Limits, Options};
use ri2c_core::register::{check_value, write_register};

use crate::output;

/// Write a value to the current register and echo it back.
pub fn run_set<G: Gateway>(
    gateway: &G,
    opts: &Options,
    limits: &Limits,
    value: u16,
) -> Result<(), Box<dyn std::error::Error>> {
    opts.validate(limits)?;
    check_value(value, opts.width)?;

    let mut master = gateway.open(opts.bus)?;
    write_register(&mut master, opts, opts.regaddr, value)?;
    println!("{}", output::value_line(opts, opts.regaddr, value));
    Ok(())
}
