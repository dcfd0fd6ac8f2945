//! Linux I2C bus implementation
//!
//! This module provides the `LinuxI2c` struct that implements the
//! `I2cMaster` trait using Linux's i2c-dev interface, plus the
//! `LinuxGateway` that opens buses by index.

use crate::error::{LinuxI2cError, Result};

use ri2c_core::error::{Error as CoreError, Result as CoreResult};
use ri2c_core::gateway::{Gateway, I2cMaster};
use ri2c_core::transaction::{Message, MsgFlags};

use std::fs::{File, OpenOptions};
use std::os::unix::io::AsRawFd;
use std::path::Path;

/// Linux i2c-dev ioctl constants
mod ioctl {
    use nix::ioctl_read_bad;

    // From include/uapi/linux/i2c-dev.h. These are plain numbers, not
    // _IO-encoded requests.

    /// Query adapter functionality bits.
    pub const I2C_FUNCS: libc::c_ulong = 0x0705;
    /// Submit a combined transfer.
    pub const I2C_RDWR: libc::c_ulong = 0x0707;
    /// Most messages one I2C_RDWR submission accepts.
    pub const I2C_RDWR_IOCTL_MAX_MSGS: usize = 42;

    // From include/uapi/linux/i2c.h

    /// Message flag: data flows from the device to the host.
    pub const I2C_M_RD: u16 = 0x0001;
    /// Message flag: suppress the repeated start before this message.
    pub const I2C_M_NOSTART: u16 = 0x4000;
    /// Functionality bit: plain (non-SMBus) transfers.
    pub const I2C_FUNC_I2C: libc::c_ulong = 0x0000_0001;
    /// Functionality bit: I2C_M_NOSTART is honored.
    pub const I2C_FUNC_NOSTART: libc::c_ulong = 0x0000_0010;

    ioctl_read_bad!(i2c_funcs, I2C_FUNCS, libc::c_ulong);
}

/// Kernel message descriptor for the I2C_RDWR ioctl
/// This must match the kernel's struct i2c_msg layout
#[repr(C)]
struct I2cMsg {
    addr: u16,    // __u16 addr
    flags: u16,   // __u16 flags
    len: u16,     // __u16 len
    buf: *mut u8, // __u8 *buf
}

/// Request block for the I2C_RDWR ioctl
/// This must match the kernel's struct i2c_rdwr_ioctl_data layout
#[repr(C)]
struct I2cRdwrIoctlData {
    msgs: *mut I2cMsg, // struct i2c_msg *msgs
    nmsgs: u32,        // __u32 nmsgs
}

/// Builds the `/dev/i2c-N` path for a bus index.
fn dev_path(bus: u8) -> String {
    format!("/dev/i2c-{bus}")
}

/// Translates portable message flags into kernel i2c_msg flags.
fn kernel_flags(flags: MsgFlags) -> u16 {
    let mut out = 0;
    if flags.contains(MsgFlags::READ) {
        out |= ioctl::I2C_M_RD;
    }
    if flags.contains(MsgFlags::NO_START) {
        out |= ioctl::I2C_M_NOSTART;
    }
    out
}

/// Errnos the adapter drivers raise for an unacknowledged address.
fn is_nak_errno(errno: i32) -> bool {
    errno == libc::ENXIO || errno == libc::EREMOTEIO || errno == libc::ENODEV
}

/// One open Linux I2C bus
///
/// Holds the i2c-dev file handle and the adapter functionality bits
/// queried at open time.
pub struct LinuxI2c {
    /// File handle for the i2c-dev node
    file: File,
    /// Device node path, kept for diagnostics
    path: String,
    /// Adapter functionality bits
    funcs: libc::c_ulong,
}

impl LinuxI2c {
    /// Opens the i2c-dev node for `bus` and checks that the adapter can
    /// carry plain I2C transfers (some SMBus-only adapters cannot).
    pub fn open(bus: u8) -> Result<Self> {
        let path = dev_path(bus);
        log::debug!("linux_i2c: opening {path}");

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(&path)
            .map_err(|e| LinuxI2cError::OpenFailed {
                path: path.clone(),
                source: e,
            })?;

        let mut funcs: libc::c_ulong = 0;
        unsafe {
            ioctl::i2c_funcs(file.as_raw_fd(), &mut funcs).map_err(|e| {
                LinuxI2cError::FuncsFailed {
                    path: path.clone(),
                    source: std::io::Error::from_raw_os_error(e as i32),
                }
            })?;
        }

        if funcs & ioctl::I2C_FUNC_I2C == 0 {
            return Err(LinuxI2cError::NotSupported {
                path,
                what: "plain I2C transfers",
            });
        }

        log::info!("linux_i2c: opened {path} (funcs={funcs:#x})");
        Ok(Self { file, path, funcs })
    }

    /// Adapter functionality bits as reported by I2C_FUNCS.
    pub fn funcs(&self) -> libc::c_ulong {
        self.funcs
    }

    /// Submits `msgs` through one I2C_RDWR ioctl.
    ///
    /// The kernel treats the whole submission as a single transaction and
    /// fills read buffers through the descriptor pointers. i2c-dev has no
    /// per-transfer clock control, so the frequency request in each
    /// message is ignored and the adapter's configured rate applies.
    fn i2c_transfer(&mut self, msgs: &mut [Message]) -> Result<()> {
        if msgs.is_empty() {
            return Ok(());
        }
        if msgs.len() > ioctl::I2C_RDWR_IOCTL_MAX_MSGS {
            return Err(LinuxI2cError::InvalidTransfer(format!(
                "{} messages, kernel accepts at most {}",
                msgs.len(),
                ioctl::I2C_RDWR_IOCTL_MAX_MSGS
            )));
        }
        if msgs.iter().any(|m| m.flags.contains(MsgFlags::NO_START))
            && self.funcs & ioctl::I2C_FUNC_NOSTART == 0
        {
            return Err(LinuxI2cError::NotSupported {
                path: self.path.clone(),
                what: "no-start transfers",
            });
        }

        let mut kmsgs = Vec::with_capacity(msgs.len());
        for msg in msgs.iter_mut() {
            let len = u16::try_from(msg.buf.len()).map_err(|_| {
                LinuxI2cError::InvalidTransfer(format!("message of {} bytes", msg.buf.len()))
            })?;
            kmsgs.push(I2cMsg {
                addr: u16::from(msg.addr),
                flags: kernel_flags(msg.flags),
                len,
                buf: msg.buf.as_mut_ptr(),
            });
        }

        let request = I2cRdwrIoctlData {
            msgs: kmsgs.as_mut_ptr(),
            nmsgs: kmsgs.len() as u32,
        };

        let ret = unsafe { libc::ioctl(self.file.as_raw_fd(), ioctl::I2C_RDWR, &request) };
        if ret < 0 {
            return Err(LinuxI2cError::TransferFailed(
                std::io::Error::last_os_error(),
            ));
        }

        Ok(())
    }
}

impl I2cMaster for LinuxI2c {
    fn transfer(&mut self, msgs: &mut [Message]) -> CoreResult<()> {
        let addr = msgs.first().map_or(0, |m| m.addr);
        self.i2c_transfer(msgs).map_err(|err| classify(addr, err))
    }

    #[cfg(feature = "reset")]
    fn reset(&mut self) -> CoreResult<()> {
        // i2c-dev exposes no bus recovery hook.
        log::warn!("linux_i2c: {} cannot reset the bus", self.path);
        Err(CoreError::ResetNotSupported)
    }
}

/// Maps a transfer failure onto the core taxonomy: NAK-class errnos mean
/// the device did not answer, everything else is a bus fault.
fn classify(addr: u8, err: LinuxI2cError) -> CoreError {
    match err {
        LinuxI2cError::TransferFailed(io_err) => match io_err.raw_os_error() {
            Some(errno) if is_nak_errno(errno) => CoreError::NoAck { addr },
            _ => CoreError::Io(io_err),
        },
        other => CoreError::Io(std::io::Error::other(other)),
    }
}

/// Opens `/dev/i2c-N` nodes on demand
#[derive(Debug, Default, Clone, Copy)]
pub struct LinuxGateway;

impl LinuxGateway {
    /// Gateway over the host's i2c-dev nodes.
    pub fn new() -> Self {
        LinuxGateway
    }
}

impl Gateway for LinuxGateway {
    type Master = LinuxI2c;

    fn bus_exists(&self, bus: u8) -> bool {
        Path::new(&dev_path(bus)).exists()
    }

    fn open(&self, bus: u8) -> CoreResult<LinuxI2c> {
        LinuxI2c::open(bus).map_err(|err| match err {
            LinuxI2cError::OpenFailed { source, .. } => CoreError::NotFound { bus, source },
            other => CoreError::Io(std::io::Error::other(other)),
        })
    }
}
