//! Bus recovery command

use ri2c_core::gateway::{Gateway, I2cMaster};
use ri2c_core::options::{Limits, Options};

/// Ask the bus controller to run its recovery sequence.
pub fn run_reset<G: Gateway>(
    gateway: &G,
    opts: &Options,
    limits: &Limits,
) -> Result<(), Box<dyn std::error::Error>> {
    opts.validate(limits)?;

    let mut master = gateway.open(opts.bus)?;
    master.reset()?;
    println!("Bus {}: reset", opts.bus);
    Ok(())
}
