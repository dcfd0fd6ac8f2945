//! Message descriptors and the transaction builder.
//!
//! Every diagnostic operation is shaped here into one or two [`Message`]s
//! that a gateway submits as a single transaction: a start before each
//! message unless suppressed, a stop only after the last one.

use bitflags::bitflags;

use crate::error::{Error, Result};
use crate::options::Options;
use crate::register::encode_value;

bitflags! {
    /// Per-message transfer flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct MsgFlags: u8 {
        /// Data flows from the device to the host.
        const READ = 1 << 0;
        /// Suppress the repeated start before this message.
        const NO_START = 1 << 1;
    }
}

/// One segment of an I2C transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// 7-bit target device address.
    pub addr: u8,
    /// Transfer flags.
    pub flags: MsgFlags,
    /// Bus frequency request in Hz, passed through untouched.
    pub frequency: u32,
    /// Payload for writes; sized up front and filled in place for reads.
    pub buf: Vec<u8>,
}

impl Message {
    /// Write message carrying `data`.
    pub fn write(addr: u8, frequency: u32, data: &[u8]) -> Self {
        Message {
            addr,
            flags: MsgFlags::empty(),
            frequency,
            buf: data.to_vec(),
        }
    }

    /// Read message expecting `len` bytes.
    pub fn read(addr: u8, frequency: u32, len: usize) -> Self {
        Message {
            addr,
            flags: MsgFlags::READ,
            frequency,
            buf: vec![0; len],
        }
    }

    /// Suppresses the repeated start before this message.
    pub fn without_start(mut self) -> Self {
        self.flags |= MsgFlags::NO_START;
        self
    }

    /// Whether data flows from the device to the host.
    pub fn is_read(&self) -> bool {
        self.flags.contains(MsgFlags::READ)
    }

    /// Payload length in bytes.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether the message carries no payload, as scan probes do.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}

/// Operations the builder knows how to shape into messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    /// Address-acknowledge probe used by the bus scan.
    Probe,
    /// Register select followed by a data read.
    ReadRegister(u8),
    /// Register select and value bytes in one write.
    WriteRegister(u8, u16),
    /// Plain read with no register select.
    ReadRaw,
    /// Plain write of the value bytes.
    WriteRaw(u16),
}

/// Shapes `op` into the messages submitted as one transaction.
///
/// The width is checked here so a bad width can never produce descriptors,
/// whatever path led to the builder. Register reads become a one-byte
/// select write followed by a read of the width's byte count; the read
/// keeps its repeated start unless `opts.start` is off. Register writes
/// fold the select and the big-endian value into a single write. Probes
/// are a zero-length write under `opts.zerowrite`, otherwise a one-byte
/// read whose result is discarded.
pub fn build(op: Op, opts: &Options) -> Result<Vec<Message>> {
    if opts.width != 8 && opts.width != 16 {
        return Err(Error::InvalidWidth(opts.width));
    }
    let nbytes = opts.width_bytes();

    let msgs = match op {
        Op::Probe => {
            if opts.zerowrite {
                vec![Message::write(opts.addr, opts.freq, &[])]
            } else {
                vec![Message::read(opts.addr, opts.freq, 1)]
            }
        }
        Op::ReadRegister(regaddr) => {
            let select = Message::write(opts.addr, opts.freq, &[regaddr]);
            let mut data = Message::read(opts.addr, opts.freq, nbytes);
            if !opts.start {
                data = data.without_start();
            }
            vec![select, data]
        }
        Op::WriteRegister(regaddr, value) => {
            let mut payload = Vec::with_capacity(1 + nbytes);
            payload.push(regaddr);
            payload.extend_from_slice(&encode_value(value, opts.width));
            vec![Message::write(opts.addr, opts.freq, &payload)]
        }
        Op::ReadRaw => vec![Message::read(opts.addr, opts.freq, nbytes)],
        Op::WriteRaw(value) => {
            vec![Message::write(
                opts.addr,
                opts.freq,
                &encode_value(value, opts.width),
            )]
        }
    };

    Ok(msgs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts() -> Options {
        Options {
            addr: 0x48,
            bus: 1,
            regaddr: 0x10,
            freq: 400_000,
            ..Options::default()
        }
    }

    #[test]
    fn test_register_read_shape() {
        let msgs = build(Op::ReadRegister(0x10), &opts()).unwrap();
        assert_eq!(msgs.len(), 2);

        assert_eq!(msgs[0].addr, 0x48);
        assert!(!msgs[0].is_read());
        assert_eq!(msgs[0].buf, vec![0x10]);
        assert_eq!(msgs[0].flags, MsgFlags::empty());

        assert_eq!(msgs[1].addr, 0x48);
        assert!(msgs[1].is_read());
        assert_eq!(msgs[1].len(), 1);
        assert!(!msgs[1].flags.contains(MsgFlags::NO_START));
    }

    #[test]
    fn test_register_read_without_start() {
        let opts = Options {
            start: false,
            ..opts()
        };
        let msgs = build(Op::ReadRegister(0x10), &opts).unwrap();
        assert_eq!(msgs.len(), 2);
        assert!(
            !msgs[0].flags.contains(MsgFlags::NO_START),
            "select keeps its start"
        );
        assert!(msgs[1].flags.contains(MsgFlags::NO_START));
    }

    #[test]
    fn test_register_read_width_16() {
        let opts = Options {
            width: 16,
            ..opts()
        };
        let msgs = build(Op::ReadRegister(0x20), &opts).unwrap();
        assert_eq!(msgs[0].buf, vec![0x20]);
        assert_eq!(msgs[1].len(), 2);
    }

    #[test]
    fn test_register_write_folds_select_and_value() {
        let msgs = build(Op::WriteRegister(0x10, 0xab), &opts()).unwrap();
        assert_eq!(msgs.len(), 1);
        assert!(!msgs[0].is_read());
        assert_eq!(msgs[0].buf, vec![0x10, 0xab]);
    }

    #[test]
    fn test_register_write_width_16_big_endian() {
        let opts = Options {
            width: 16,
            ..opts()
        };
        let msgs = build(Op::WriteRegister(0x10, 0x1234), &opts).unwrap();
        assert_eq!(msgs.len(), 1);
        assert_eq!(msgs[0].buf, vec![0x10, 0x12, 0x34]);
    }

    #[test]
    fn test_raw_read_and_write() {
        let msgs = build(Op::ReadRaw, &opts()).unwrap();
        assert_eq!(msgs.len(), 1);
        assert!(msgs[0].is_read());
        assert_eq!(msgs[0].len(), 1);

        let msgs = build(Op::WriteRaw(0x5a), &opts()).unwrap();
        assert_eq!(msgs.len(), 1);
        assert_eq!(msgs[0].buf, vec![0x5a]);
    }

    #[test]
    fn test_probe_read_by_default() {
        let msgs = build(Op::Probe, &opts()).unwrap();
        assert_eq!(msgs.len(), 1);
        assert!(msgs[0].is_read());
        assert_eq!(msgs[0].len(), 1);
    }

    #[test]
    fn test_probe_zero_write() {
        let opts = Options {
            zerowrite: true,
            ..opts()
        };
        let msgs = build(Op::Probe, &opts).unwrap();
        assert_eq!(msgs.len(), 1);
        assert!(!msgs[0].is_read());
        assert!(msgs[0].is_empty());
    }

    #[test]
    fn test_invalid_width_produces_no_descriptors() {
        for op in [
            Op::Probe,
            Op::ReadRegister(0),
            Op::WriteRegister(0, 0),
            Op::ReadRaw,
            Op::WriteRaw(0),
        ] {
            let opts = Options {
                width: 9,
                ..opts()
            };
            assert!(matches!(build(op, &opts), Err(Error::InvalidWidth(9))));
        }
    }

    #[test]
    fn test_frequency_and_addr_propagate_to_every_message() {
        let msgs = build(Op::ReadRegister(0x00), &opts()).unwrap();
        for msg in &msgs {
            assert_eq!(msg.addr, 0x48);
            assert_eq!(msg.frequency, 400_000);
        }
    }
}
