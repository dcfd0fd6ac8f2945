//! Sticky session options and the bounds they are validated against.

use crate::error::{Error, Result};

/// Smallest bus index covered by the bus listing.
pub const MIN_BUS: u8 = 0;
/// Largest bus index covered by the bus listing.
pub const MAX_BUS: u8 = 3;
/// Smallest scannable device address; the lower addresses are reserved.
pub const MIN_ADDR: u8 = 0x03;
/// Largest scannable device address; the upper addresses are reserved.
pub const MAX_ADDR: u8 = 0x77;
/// Largest register address.
pub const MAX_REG_ADDR: u8 = 0xff;
/// Default bus frequency request in Hz (standard mode).
pub const DEFAULT_FREQ: u32 = 100_000;
/// Hard cap on the number of bytes one dump may accumulate.
pub const MAX_DUMP_BYTES: usize = 256;

/// Bounds for bus, device, and register addresses.
///
/// [`Limits::default`] carries the stock platform bounds; tests inject
/// narrower ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Smallest valid bus index.
    pub min_bus: u8,
    /// Largest valid bus index.
    pub max_bus: u8,
    /// Smallest valid device address.
    pub min_addr: u8,
    /// Largest valid device address.
    pub max_addr: u8,
    /// Largest valid register address.
    pub max_regaddr: u8,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            min_bus: MIN_BUS,
            max_bus: MAX_BUS,
            min_addr: MIN_ADDR,
            max_addr: MAX_ADDR,
            max_regaddr: MAX_REG_ADDR,
        }
    }
}

impl Limits {
    /// Checks a bus index against the bounds.
    pub fn check_bus(&self, bus: u8) -> Result<()> {
        check_range("bus", bus, self.min_bus, self.max_bus)
    }

    /// Checks a device address against the bounds.
    pub fn check_addr(&self, addr: u8) -> Result<()> {
        check_range("address", addr, self.min_addr, self.max_addr)
    }

    /// Checks a register address against the bounds.
    pub fn check_regaddr(&self, regaddr: u8) -> Result<()> {
        check_range("register", regaddr, 0, self.max_regaddr)
    }
}

fn check_range(what: &'static str, value: u8, min: u8, max: u8) -> Result<()> {
    if value < min || value > max {
        return Err(Error::OutOfRange {
            what,
            value: u32::from(value),
            min: u32::from(min),
            max: u32::from(max),
        });
    }
    Ok(())
}

/// Checks a data width; only 8 and 16 bits are supported.
pub fn check_width(width: u8) -> Result<()> {
    match width {
        8 | 16 => Ok(()),
        other => Err(Error::InvalidWidth(other)),
    }
}

/// One session's sticky option set.
///
/// Every command folds its explicit flags into the session copy, then runs
/// against an immutable snapshot. Unset flags inherit whatever an earlier
/// command left behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// 7-bit device address.
    pub addr: u8,
    /// Bus index.
    pub bus: u8,
    /// Register address within the device.
    pub regaddr: u8,
    /// Data width in bits, 8 or 16.
    pub width: u8,
    /// Issue a repeated start between register select and data.
    pub start: bool,
    /// Probe with zero-length writes instead of reads during scans.
    pub zerowrite: bool,
    /// Advance the register address across repeated operations.
    pub autoincr: bool,
    /// A register address has been explicitly supplied this session.
    pub hasregindx: bool,
    /// Bus frequency request in Hz.
    pub freq: u32,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            addr: MIN_ADDR,
            bus: MIN_BUS,
            regaddr: 0,
            width: 8,
            start: true,
            zerowrite: false,
            autoincr: false,
            hasregindx: false,
            freq: DEFAULT_FREQ,
        }
    }
}

impl Options {
    /// Checks every bounded field, width included.
    pub fn validate(&self, limits: &Limits) -> Result<()> {
        limits.check_bus(self.bus)?;
        limits.check_addr(self.addr)?;
        limits.check_regaddr(self.regaddr)?;
        check_width(self.width)
    }

    /// Payload bytes per register at the current width.
    ///
    /// Meaningful only after the width has been validated.
    pub fn width_bytes(&self) -> usize {
        usize::from(self.width / 8)
    }
}
