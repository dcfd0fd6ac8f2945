//! Command implementations
//!
//! Each command folds its sticky flags into the session options, opens
//! the bus through the gateway, runs the engine operation, and prints
//! the result. One-shot invocations and interactive lines share this
//! dispatch.

mod bus;
mod dev;
mod dump;
mod get;
#[cfg(feature = "reset")]
mod reset;
mod set;
mod verf;

use ri2c_core::gateway::Gateway;
use ri2c_core::options::{Limits, Options};

use crate::cli::Commands;

/// Folds the command's flags into the session, then runs the command
/// against a snapshot of the updated session.
pub fn dispatch<G: Gateway>(
    gateway: &G,
    session: &mut Options,
    limits: &Limits,
    command: Commands,
) -> Result<(), Box<dyn std::error::Error>> {
    command.common().apply(session, limits)?;
    let opts = *session;
    match command {
        Commands::Bus { .. } => bus::run_bus(gateway, limits),
        Commands::Dev { first, last, .. } => dev::run_dev(gateway, &opts, limits, first, last),
        Commands::Get { count, .. } => get::run_get(gateway, &opts, limits, count),
        Commands::Set { value, .. } => set::run_set(gateway, &opts, limits, value),
        Commands::Dump { count, .. } => dump::run_dump(gateway, &opts, limits, count),
        Commands::Verf { value, count, .. } => verf::run_verf(gateway, &opts, limits, value, count),
        #[cfg(feature = "reset")]
        Commands::Reset { .. } => reset::run_reset(gateway, &opts, limits),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use ri2c_sim::{SimBus, SimDevice, SimGateway};

    use crate::cli::ShellLine;

    fn parse(line: &str) -> Commands {
        let words = std::iter::once("i2c").chain(line.split_whitespace());
        ShellLine::try_parse_from(words).unwrap().command
    }

    fn gateway() -> SimGateway {
        SimGateway::new().with_bus(SimBus::new(0).with_device(SimDevice::new(0x48)))
    }

    #[test]
    fn test_set_then_bare_get_inherits_session() {
        let gateway = gateway();
        let limits = Limits::default();
        let mut session = Options::default();

        dispatch(&gateway, &mut session, &limits, parse("set -a 48 -r 10 ab")).unwrap();
        let shared = gateway.bus(0).unwrap();
        assert_eq!(shared.borrow().device(0x48).unwrap().reg(0x10), 0xab);

        // The follow-up command names nothing and reads the same register.
        dispatch(&gateway, &mut session, &limits, parse("get")).unwrap();
        assert_eq!(session.addr, 0x48);
        assert_eq!(session.regaddr, 0x10);
        assert!(session.hasregindx);
    }

    #[test]
    fn test_missing_bus_is_reported() {
        let gateway = gateway();
        let limits = Limits::default();
        let mut session = Options::default();

        let err = dispatch(&gateway, &mut session, &limits, parse("get -a 48 -b 1")).unwrap_err();
        assert!(err.to_string().contains("cannot open bus 1"));
    }

    #[test]
    fn test_rejected_flag_leaves_session_unchanged() {
        let gateway = gateway();
        let limits = Limits::default();
        let mut session = Options::default();

        assert!(dispatch(&gateway, &mut session, &limits, parse("get -a 02")).is_err());
        assert_eq!(session.addr, Options::default().addr);
    }

    #[test]
    fn test_dump_failure_names_the_register() {
        let gateway = SimGateway::new().with_bus(
            SimBus::new(0).with_device(SimDevice::new(0x48).with_nak_register(0x12)),
        );
        let limits = Limits::default();
        let mut session = Options::default();

        let err = dispatch(
            &gateway,
            &mut session,
            &limits,
            parse("dump -a 48 -r 10 -i 4"),
        )
        .unwrap_err();
        assert!(err.to_string().contains("read of register 0x12 failed"));
    }

    #[test]
    fn test_verf_counts_mismatched_registers() {
        let gateway = SimGateway::new().with_bus(
            SimBus::new(0).with_device(SimDevice::new(0x48).with_read_only(0x11)),
        );
        let limits = Limits::default();
        let mut session = Options::default();

        let err = dispatch(
            &gateway,
            &mut session,
            &limits,
            parse("verf -a 48 -r 10 -i 5a 4"),
        )
        .unwrap_err();
        assert!(err.to_string().contains("1 of 4 registers mismatched"));
    }

    #[cfg(feature = "reset")]
    #[test]
    fn test_reset_unwedges_the_bus() {
        let gateway = gateway();
        let limits = Limits::default();
        let mut session = Options::default();

        gateway.bus(0).unwrap().borrow_mut().set_wedged(true);
        assert!(dispatch(&gateway, &mut session, &limits, parse("get -a 48")).is_err());

        dispatch(&gateway, &mut session, &limits, parse("reset")).unwrap();
        dispatch(&gateway, &mut session, &limits, parse("get -a 48")).unwrap();
    }
}
