//! Write and read-back verification command

use ri2c_core::gateway::Gateway;
use ri2c_core::options::{Limits, Options};
use ri2c_core::verify::verify_registers;

use crate::output;

/// Write a value to `count` registers, read each back, and report any
/// register that did not hold the value.
pub fn run_verf<G: Gateway>(
    gateway: &G,
    opts: &Options,
    limits: &Limits,
    value: u16,
    count: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    opts.validate(limits)?;

    let mut master = gateway.open(opts.bus)?;
    let results = verify_registers(&mut master, opts, value, count)?;

    let mut mismatches = 0;
    for v in &results {
        let status = if v.matched() {
            "ok"
        } else {
            mismatches += 1;
            "MISMATCH"
        };
        println!(
            "reg {:#04x}: wrote {} read {} {}",
            v.regaddr,
            output::format_value(v.wrote, opts.width),
            output::format_value(v.read, opts.width),
            status
        );
    }

    if mismatches > 0 {
        return Err(format!("{} of {} registers mismatched", mismatches, results.len()).into());
    }
    Ok(())
}
