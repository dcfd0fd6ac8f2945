//! Bus listing command

use ri2c_core::gateway::Gateway;
use ri2c_core::options::Limits;

/// List the configured bus range and report which buses exist.
pub fn run_bus<G: Gateway>(gateway: &G, limits: &Limits) -> Result<(), Box<dyn std::error::Error>> {
    println!(" BUS   EXISTS?");
    for bus in limits.min_bus..=limits.max_bus {
        let exists = if gateway.bus_exists(bus) { "YES" } else { "NO" };
        println!("Bus {}: {}", bus, exists);
    }
    Ok(())
}
