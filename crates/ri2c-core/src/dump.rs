//! Multi-register dump.

use log::warn;

use crate::error::{Error, Result};
use crate::gateway::I2cMaster;
use crate::options::{self, Options, MAX_DUMP_BYTES};
use crate::register;

/// The bytes a dump managed to read, plus the failure that cut it short.
#[derive(Debug)]
pub struct Dump {
    /// Register address the dump started at.
    pub start: u8,
    /// Bytes read so far, in read order.
    pub bytes: Vec<u8>,
    /// The register whose read failed, when the dump stopped early.
    pub failed: Option<(u8, Error)>,
}

impl Dump {
    /// Whether every requested register was read.
    pub fn is_complete(&self) -> bool {
        self.failed.is_none()
    }
}

/// Reads `count` registers starting at `opts.regaddr`.
///
/// With `opts.autoincr` the register address advances by the width's byte
/// count after each read, wrapping at the end of the register space;
/// without it the same register is sampled `count` times. A failed read
/// stops the dump but keeps what was already accumulated.
pub fn dump_registers<M>(master: &mut M, opts: &Options, count: usize) -> Result<Dump>
where
    M: I2cMaster + ?Sized,
{
    options::check_width(opts.width)?;
    let nbytes = opts.width_bytes();
    let max_count = MAX_DUMP_BYTES / nbytes;
    if count == 0 || count > max_count {
        return Err(Error::OutOfRange {
            what: "count",
            value: count.min(u32::MAX as usize) as u32,
            min: 1,
            max: max_count as u32,
        });
    }

    let mut bytes = Vec::with_capacity(count * nbytes);
    let mut failed = None;
    let mut regaddr = opts.regaddr;
    for _ in 0..count {
        match register::read_register(master, opts, regaddr) {
            Ok(value) => {
                bytes.extend_from_slice(&register::encode_value(value, opts.width));
                if opts.autoincr {
                    regaddr = regaddr.wrapping_add(nbytes as u8);
                }
            }
            Err(err) => {
                warn!("dump: read of register {regaddr:#04x} failed: {err}");
                failed = Some((regaddr, err));
                break;
            }
        }
    }

    Ok(Dump {
        start: opts.regaddr,
        bytes,
        failed,
    })
}
