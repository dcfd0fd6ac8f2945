//! ri2c-core - Core library for I2C bus diagnostics
//!
//! This crate holds the hardware-independent half of the `ri2c` tool: the
//! sticky option model, the validator, the transaction builder, and the
//! command engine (scan, register get/set, dump, verify). Backends plug in
//! through the [`gateway`] traits and only have to move messages.
//!
//! # Example
//!
//! ```ignore
//! use ri2c_core::gateway::I2cMaster;
//! use ri2c_core::options::Options;
//! use ri2c_core::register;
//!
//! fn read_chip_id<M: I2cMaster>(master: &mut M) {
//!     let opts = Options {
//!         addr: 0x48,
//!         hasregindx: true,
//!         ..Options::default()
//!     };
//!     match register::read_register(master, &opts, 0x0f) {
//!         Ok(value) => println!("chip id: {value:#04x}"),
//!         Err(e) => println!("read failed: {e}"),
//!     }
//! }
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod dump;
pub mod error;
pub mod gateway;
pub mod options;
pub mod register;
pub mod scan;
pub mod transaction;
pub mod verify;

#[cfg(test)]
mod testutil;

pub use error::{Error, Result};
