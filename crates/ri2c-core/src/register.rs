//! Single-register access on top of the transaction builder.

use crate::error::{Error, Result};
use crate::gateway::I2cMaster;
use crate::options::{self, Options};
use crate::transaction::{self, Op};

/// Packs `value` into the big-endian payload for `width` bits.
pub fn encode_value(value: u16, width: u8) -> Vec<u8> {
    if width == 16 {
        value.to_be_bytes().to_vec()
    } else {
        vec![value as u8]
    }
}

/// Decodes a big-endian register payload of one or two bytes.
pub fn decode_value(bytes: &[u8]) -> u16 {
    bytes.iter().fold(0u16, |acc, &b| (acc << 8) | u16::from(b))
}

/// Checks that `value` fits in `width` bits.
pub fn check_value(value: u16, width: u8) -> Result<()> {
    options::check_width(width)?;
    let max: u16 = if width == 16 { u16::MAX } else { 0xff };
    if value > max {
        return Err(Error::OutOfRange {
            what: "value",
            value: u32::from(value),
            min: 0,
            max: u32::from(max),
        });
    }
    Ok(())
}

/// Reads one register, or performs a plain read when no register has been
/// named this session.
///
/// `regaddr` is passed explicitly so repeated reads can walk the register
/// space without mutating the session options.
pub fn read_register<M>(master: &mut M, opts: &Options, regaddr: u8) -> Result<u16>
where
    M: I2cMaster + ?Sized,
{
    let op = if opts.hasregindx {
        Op::ReadRegister(regaddr)
    } else {
        Op::ReadRaw
    };
    let mut msgs = transaction::build(op, opts)?;
    master.transfer(&mut msgs)?;
    Ok(decode_value(&msgs[msgs.len() - 1].buf))
}

/// Writes one register, or performs a plain write when no register has
/// been named this session.
pub fn write_register<M>(master: &mut M, opts: &Options, regaddr: u8, value: u16) -> Result<()>
where
    M: I2cMaster + ?Sized,
{
    check_value(value, opts.width)?;
    let op = if opts.hasregindx {
        Op::WriteRegister(regaddr, value)
    } else {
        Op::WriteRaw(value)
    };
    let mut msgs = transaction::build(op, opts)?;
    master.transfer(&mut msgs)
}
