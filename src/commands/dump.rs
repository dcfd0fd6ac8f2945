//! Register dump command

use ri2c_core::dump::dump_registers;
use ri2c_core::gateway::Gateway;
use ri2c_core::options::{Limits, Options};

use crate::output;

/// Read a run of registers and print them as hex and ASCII. A failure
/// partway through still prints the bytes gathered so far.
pub fn run_dump<G: Gateway>(
    gateway: &G,
    opts: &Options,
    limits: &Limits,
    count: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    opts.validate(limits)?;

    let mut master = gateway.open(opts.bus)?;
    let dump = dump_registers(&mut master, opts, count)?;
    print!("{}", output::hexdump(dump.start, &dump.bytes));

    if let Some((regaddr, err)) = dump.failed {
        return Err(format!("read of register {:#04x} failed: {}", regaddr, err).into());
    }
    Ok(())
}
