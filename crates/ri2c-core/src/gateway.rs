//! Traits a bus backend implements to serve the diagnostic commands.

use crate::error::Result;
use crate::transaction::Message;

/// A handle on one open I2C bus.
///
/// A batch passed to [`transfer`](I2cMaster::transfer) is one atomic
/// transaction: the transport issues a start before each message unless
/// [`MsgFlags::NO_START`](crate::transaction::MsgFlags::NO_START)
/// suppresses it, and a stop only after the final message. Nothing else
/// may run on the bus between the messages of a batch.
pub trait I2cMaster {
    /// Submits `msgs` as a single transaction, filling read buffers in
    /// place.
    ///
    /// Returns [`Error::NoAck`](crate::Error::NoAck) when the device did
    /// not answer and [`Error::Io`](crate::Error::Io) for any other bus
    /// fault.
    fn transfer(&mut self, msgs: &mut [Message]) -> Result<()>;

    /// Attempts to recover a wedged bus.
    #[cfg(feature = "reset")]
    fn reset(&mut self) -> Result<()> {
        Err(crate::error::Error::ResetNotSupported)
    }
}

/// Opens buses by index.
pub trait Gateway {
    /// The bus handle produced by [`open`](Gateway::open).
    type Master: I2cMaster;

    /// Whether `bus` is backed by anything at all.
    ///
    /// This is a cheap existence probe for the bus listing; it must not
    /// touch the bus.
    fn bus_exists(&self, bus: u8) -> bool;

    /// Opens `bus` for the duration of one command.
    fn open(&self, bus: u8) -> Result<Self::Master>;
}
