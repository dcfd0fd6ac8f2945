//! Error types for Linux i2c-dev operations

use thiserror::Error;

/// Linux i2c-dev specific errors
#[derive(Debug, Error)]
pub enum LinuxI2cError {
    /// Failed to open device
    #[error("Failed to open {path}: {source}")]
    OpenFailed {
        /// The device node that could not be opened.
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to query adapter capabilities
    #[error("Failed to query capabilities of {path}: {source}")]
    FuncsFailed {
        /// The device node whose capability query failed.
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Adapter lacks a required capability
    #[error("{path} does not support {what}")]
    NotSupported {
        /// The device node lacking the capability.
        path: String,
        /// Human-readable capability name.
        what: &'static str,
    },

    /// Combined transfer failed
    #[error("I2C transfer failed: {0}")]
    TransferFailed(#[source] std::io::Error),

    /// Transfer request the kernel interface cannot carry
    #[error("Invalid transfer: {0}")]
    InvalidTransfer(String),
}

/// Result type for Linux i2c-dev operations
pub type Result<T> = std::result::Result<T, LinuxI2cError>;
