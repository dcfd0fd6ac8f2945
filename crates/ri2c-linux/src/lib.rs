//! ri2c-linux - Linux i2c-dev support
//!
//! This crate provides I2C bus access on Linux via the `/dev/i2c-N`
//! character devices exposed by the i2c-dev driver.
//!
//! # Overview
//!
//! Each adapter registered with the kernel appears as `/dev/i2c-N` where
//! N is the bus number. Combined transfers go through the I2C_RDWR ioctl,
//! which submits a whole message batch as one transaction, so register
//! reads keep their repeated start without any userspace locking.
//!
//! # Example
//!
//! ```no_run
//! use ri2c_linux::LinuxGateway;
//! use ri2c_core::gateway::Gateway;
//! use ri2c_core::options::Options;
//! use ri2c_core::register;
//!
//! let gateway = LinuxGateway::new();
//! let mut bus = gateway.open(1)?;
//! let opts = Options {
//!     addr: 0x48,
//!     bus: 1,
//!     hasregindx: true,
//!     ..Options::default()
//! };
//! let value = register::read_register(&mut bus, &opts, 0x0f)?;
//! println!("register 0x0f = {value:#04x}");
//! # Ok::<(), ri2c_core::Error>(())
//! ```
//!
//! # System Requirements
//!
//! - Linux kernel with i2c-dev support enabled (`CONFIG_I2C_CHARDEV`)
//! - Read/write access to `/dev/i2c-N`; may require adding the user to
//!   the `i2c` group or a udev rule
//!
//! Adapters that only implement SMBus cannot carry the combined
//! transfers this tool issues; opening one fails with a capability
//! error rather than corrupting transactions later.

pub mod device;
pub mod error;

// Re-exports
pub use device::{LinuxGateway, LinuxI2c};
pub use error::{LinuxI2cError, Result};
