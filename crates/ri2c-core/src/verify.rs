//! Write-then-read-back verification.

use crate::error::{Error, Result, VerifyPhase};
use crate::gateway::I2cMaster;
use crate::options::Options;
use crate::register;

/// One register's verification outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verification {
    /// The register that was written and read back.
    pub regaddr: u8,
    /// The value written.
    pub wrote: u16,
    /// The value read back.
    pub read: u16,
}

impl Verification {
    /// The read-back matched what was written.
    pub fn matched(&self) -> bool {
        self.wrote == self.read
    }
}

/// Writes `value` and reads it back, `count` registers starting at
/// `opts.regaddr`.
///
/// A transfer failure aborts the run with [`Error::Verify`] naming the
/// phase it happened in. A mismatch is not a failure; it is the result,
/// and it is up to the caller to report it.
pub fn verify_registers<M>(
    master: &mut M,
    opts: &Options,
    value: u16,
    count: usize,
) -> Result<Vec<Verification>>
where
    M: I2cMaster + ?Sized,
{
    register::check_value(value, opts.width)?;
    if count == 0 {
        return Err(Error::OutOfRange {
            what: "count",
            value: 0,
            min: 1,
            max: u32::MAX,
        });
    }

    let mut results = Vec::with_capacity(count);
    let mut regaddr = opts.regaddr;
    for _ in 0..count {
        register::write_register(master, opts, regaddr, value).map_err(|err| Error::Verify {
            phase: VerifyPhase::Write,
            regaddr,
            source: Box::new(err),
        })?;
        let read = register::read_register(master, opts, regaddr).map_err(|err| Error::Verify {
            phase: VerifyPhase::Read,
            regaddr,
            source: Box::new(err),
        })?;
        results.push(Verification {
            regaddr,
            wrote: value,
            read,
        });
        if opts.autoincr {
            regaddr = regaddr.wrapping_add(opts.width_bytes() as u8);
        }
    }
    Ok(results)
}
