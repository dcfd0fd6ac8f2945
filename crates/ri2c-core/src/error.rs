//! Error types for I2C diagnostic operations.

use std::io;

use thiserror::Error;

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by option validation, transaction building, and bus
/// transfers.
///
/// Transfer failures distinguish a missing acknowledge ([`Error::NoAck`])
/// from any other bus fault ([`Error::Io`]); the bus scan relies on that
/// distinction to tell an empty address from a broken bus.
#[derive(Debug, Error)]
pub enum Error {
    /// A numeric option or argument fell outside the configured bounds.
    #[error("{what} {value:#x} out of range [{min:#x}, {max:#x}]")]
    OutOfRange {
        /// Name of the offending field.
        what: &'static str,
        /// The rejected value.
        value: u32,
        /// Smallest accepted value.
        min: u32,
        /// Largest accepted value.
        max: u32,
    },

    /// Data width other than 8 or 16 bits.
    #[error("invalid data width {0}, expected 8 or 16")]
    InvalidWidth(u8),

    /// No bus with the requested index.
    #[error("cannot open bus {bus}: {source}")]
    NotFound {
        /// The requested bus index.
        bus: u8,
        /// The underlying open failure.
        #[source]
        source: io::Error,
    },

    /// The addressed device did not acknowledge the transfer.
    #[error("no acknowledge from device {addr:#04x}")]
    NoAck {
        /// The address that went unanswered.
        addr: u8,
    },

    /// The transfer failed for a reason other than a missing acknowledge.
    #[error("bus transfer failed: {0}")]
    Io(#[from] io::Error),

    /// A write-then-read-back verification aborted mid-transfer.
    #[error("{phase} failed at register {regaddr:#04x}: {source}")]
    Verify {
        /// Which half of the verification failed.
        phase: VerifyPhase,
        /// Register being verified when the transfer failed.
        regaddr: u8,
        /// The transfer error that stopped the verification.
        #[source]
        source: Box<Error>,
    },

    /// The gateway has no bus recovery support.
    #[cfg(feature = "reset")]
    #[error("bus reset not supported by this gateway")]
    ResetNotSupported,
}

/// The half of a write-then-read-back verification a failure occurred in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyPhase {
    /// The initial register write.
    Write,
    /// The read-back of the just-written value.
    Read,
}

impl std::fmt::Display for VerifyPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VerifyPhase::Write => write!(f, "write phase"),
            VerifyPhase::Read => write!(f, "read-back phase"),
        }
    }
}

impl Error {
    /// True for failures that mean "nobody answered" rather than "the bus
    /// itself misbehaved".
    pub fn is_nak(&self) -> bool {
        matches!(self, Error::NoAck { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_display() {
        let err = Error::OutOfRange {
            what: "address",
            value: 0x99,
            min: 0x03,
            max: 0x77,
        };
        assert_eq!(err.to_string(), "address 0x99 out of range [0x3, 0x77]");
    }

    #[test]
    fn test_verify_display_names_phase_and_source() {
        let err = Error::Verify {
            phase: VerifyPhase::Read,
            regaddr: 0x10,
            source: Box::new(Error::NoAck { addr: 0x48 }),
        };
        let text = err.to_string();
        assert!(text.contains("read-back phase"));
        assert!(text.contains("0x10"));
        assert!(text.contains("no acknowledge from device 0x48"));
    }

    #[test]
    fn test_nak_classification() {
        assert!(Error::NoAck { addr: 0x50 }.is_nak());
        assert!(!Error::InvalidWidth(9).is_nak());
        let io_err = Error::Io(io::Error::new(io::ErrorKind::TimedOut, "stuck"));
        assert!(!io_err.is_nak());
    }
}
