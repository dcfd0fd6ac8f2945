//! Register read command

use ri2c_core::gateway::Gateway;
use ri2c_core::options::{Limits, Options};
use ri2c_core::register::read_register;

use crate::output;

/// Read a register `count` times, advancing the register address when
/// auto-increment is on.
pub fn run_get<G: Gateway>(
    gateway: &G,
    opts: &Options,
    limits: &Limits,
    count: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    opts.validate(limits)?;
    if count == 0 {
        return Err("count must be at least 1".into());
    }

    let mut master = gateway.open(opts.bus)?;
    let mut regaddr = opts.regaddr;
    for _ in 0..count {
        let value = read_register(&mut master, opts, regaddr)?;
        println!("{}", output::value_line(opts, regaddr, value));
        if opts.autoincr {
            regaddr = regaddr.wrapping_add(opts.width_bytes() as u8);
        }
    }
    Ok(())
}
