//! Device scan command

use ri2c_core::gateway::Gateway;
use ri2c_core::options::{Limits, Options};
use ri2c_core::scan::{self, ProbeOutcome};

use crate::output;

/// Scan one bus for responding devices and print the address grid.
///
/// The scan covers the configured address range unless narrowed by the
/// `first`/`last` arguments.
pub fn run_dev<G: Gateway>(
    gateway: &G,
    opts: &Options,
    limits: &Limits,
    first: Option<u8>,
    last: Option<u8>,
) -> Result<(), Box<dyn std::error::Error>> {
    opts.validate(limits)?;

    let first = first.unwrap_or(limits.min_addr);
    let last = last.unwrap_or(limits.max_addr);
    limits.check_addr(first)?;
    limits.check_addr(last)?;
    if first > last {
        return Err(format!("scan range {:#04x}..{:#04x} is backwards", first, last).into());
    }
    let range = Limits {
        min_addr: first,
        max_addr: last,
        ..*limits
    };

    let mut master = gateway.open(opts.bus)?;
    let report = scan::scan_bus(&mut master, opts, &range)?;
    print!("{}", output::scan_grid(&report));

    for (addr, outcome) in &report.outcomes {
        if let ProbeOutcome::Fault(err) = outcome {
            log::warn!("address {:#04x}: {}", addr, err);
        }
    }
    Ok(())
}
