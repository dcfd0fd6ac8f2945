//! Bus scan over the scannable address range.

use log::debug;

use crate::error::{Error, Result};
use crate::gateway::I2cMaster;
use crate::options::{Limits, Options};
use crate::transaction::{self, Op};

/// What one probed address did.
#[derive(Debug)]
pub enum ProbeOutcome {
    /// The address acknowledged the probe.
    Responded,
    /// Nobody answered.
    NoResponse,
    /// The probe failed for a reason other than a missing acknowledge.
    Fault(Error),
}

/// One bus scan, ascending address order, one entry per probed address.
#[derive(Debug)]
pub struct ScanReport {
    /// The bus that was scanned.
    pub bus: u8,
    /// Per-address outcomes, ascending.
    pub outcomes: Vec<(u8, ProbeOutcome)>,
}

/// Probes every address in the scannable range on an open bus.
///
/// The sticky device address plays no part here; the range comes from
/// `limits`. A fault at one address is recorded and the scan moves on, so
/// a single broken device cannot hide the rest of the bus.
pub fn scan_bus<M>(master: &mut M, opts: &Options, limits: &Limits) -> Result<ScanReport>
where
    M: I2cMaster + ?Sized,
{
    let mut outcomes = Vec::with_capacity(usize::from(limits.max_addr - limits.min_addr) + 1);
    for addr in limits.min_addr..=limits.max_addr {
        let probe_opts = Options { addr, ..*opts };
        let mut msgs = transaction::build(Op::Probe, &probe_opts)?;
        let outcome = match master.transfer(&mut msgs) {
            Ok(()) => ProbeOutcome::Responded,
            Err(err) if err.is_nak() => ProbeOutcome::NoResponse,
            Err(err) => {
                debug!("scan: probe of {addr:#04x} faulted: {err}");
                ProbeOutcome::Fault(err)
            }
        };
        outcomes.push((addr, outcome));
    }
    Ok(ScanReport {
        bus: opts.bus,
        outcomes,
    })
}

impl ScanReport {
    /// Addresses that acknowledged, ascending.
    pub fn responders(&self) -> Vec<u8> {
        self.outcomes
            .iter()
            .filter_map(|(addr, outcome)| match outcome {
                ProbeOutcome::Responded => Some(*addr),
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;
    use crate::testutil::ScriptedMaster;

    #[test]
    fn test_scan_classifies_and_orders() {
        let limits = Limits {
            min_addr: 0x10,
            max_addr: 0x13,
            ..Limits::default()
        };
        let mut master = ScriptedMaster::new();
        master.push_reply(vec![0x00]);
        master.push_failure(Error::NoAck { addr: 0x11 });
        master.push_failure(Error::Io(io::Error::new(
            io::ErrorKind::TimedOut,
            "arbitration lost",
        )));
        master.push_reply(vec![0x00]);

        let report = scan_bus(&mut master, &Options::default(), &limits).unwrap();
        let addrs: Vec<u8> = report.outcomes.iter().map(|(a, _)| *a).collect();
        assert_eq!(addrs, vec![0x10, 0x11, 0x12, 0x13]);

        assert!(matches!(report.outcomes[0].1, ProbeOutcome::Responded));
        assert!(matches!(report.outcomes[1].1, ProbeOutcome::NoResponse));
        assert!(matches!(report.outcomes[2].1, ProbeOutcome::Fault(_)));
        assert!(matches!(report.outcomes[3].1, ProbeOutcome::Responded));
        assert_eq!(report.responders(), vec![0x10, 0x13]);
    }

    #[test]
    fn test_scan_ignores_sticky_address() {
        let limits = Limits {
            min_addr: 0x20,
            max_addr: 0x21,
            ..Limits::default()
        };
        let opts = Options {
            addr: 0x48,
            ..Options::default()
        };
        let mut master = ScriptedMaster::new();
        let report = scan_bus(&mut master, &opts, &limits).unwrap();
        assert_eq!(report.outcomes.len(), 2);

        let probed: Vec<u8> = master
            .submissions()
            .iter()
            .map(|msgs| msgs[0].addr)
            .collect();
        assert_eq!(probed, vec![0x20, 0x21]);
    }

    #[test]
    fn test_scan_probe_shape_follows_zerowrite() {
        let limits = Limits {
            min_addr: 0x30,
            max_addr: 0x30,
            ..Limits::default()
        };

        let mut master = ScriptedMaster::new();
        scan_bus(&mut master, &Options::default(), &limits).unwrap();
        assert!(master.submissions()[0][0].is_read());

        let opts = Options {
            zerowrite: true,
            ..Options::default()
        };
        let mut master = ScriptedMaster::new();
        scan_bus(&mut master, &opts, &limits).unwrap();
        let probe = &master.submissions()[0][0];
        assert!(!probe.is_read());
        assert!(probe.is_empty());
    }
}
