//! CLI argument parsing

use clap::{Args, Parser, Subcommand};

use ri2c_core::options::{self, Limits, Options};

/// Parse a string as a hex u8, with or without a 0x prefix
fn parse_hex_u8(s: &str) -> Result<u8, String> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    u8::from_str_radix(digits, 16).map_err(|e| format!("Invalid hex value '{}': {}", s, e))
}

/// Parse a string as a hex u16, with or without a 0x prefix
fn parse_hex_u16(s: &str) -> Result<u16, String> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    u16::from_str_radix(digits, 16).map_err(|e| format!("Invalid hex value '{}': {}", s, e))
}

#[derive(Parser)]
#[command(name = "ri2c")]
#[command(author, version, about = "I2C bus diagnostic tool", long_about = None)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Run against the in-memory simulated board instead of /dev/i2c-*
    #[cfg(feature = "sim")]
    #[arg(long, global = true)]
    pub sim: bool,

    /// Command to run; omit it for an interactive session
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Sticky option flags shared by every command
///
/// A flag given here overwrites the session value and stays in effect for
/// later commands; a flag left out inherits whatever the session holds.
#[derive(Args, Debug, Clone, Default)]
pub struct CommonArgs {
    /// Device address (hex)
    #[arg(short = 'a', value_name = "ADDR", value_parser = parse_hex_u8)]
    pub addr: Option<u8>,

    /// Bus number
    #[arg(short = 'b', value_name = "BUS")]
    pub bus: Option<u8>,

    /// Register address (hex); also marks the session as register-addressed
    #[arg(short = 'r', value_name = "REG", value_parser = parse_hex_u8)]
    pub regaddr: Option<u8>,

    /// Data width in bits (8 or 16)
    #[arg(short = 'w', value_name = "BITS")]
    pub width: Option<u8>,

    /// Issue a repeated start between register select and data
    #[arg(short = 's', overrides_with = "no_start")]
    pub start: bool,

    /// Suppress the repeated start between register select and data
    #[arg(short = 'n', overrides_with = "start")]
    pub no_start: bool,

    /// Advance the register address on repeated operations
    #[arg(short = 'i', overrides_with = "no_autoincr")]
    pub autoincr: bool,

    /// Keep the register address fixed on repeated operations
    #[arg(short = 'j', overrides_with = "autoincr")]
    pub no_autoincr: bool,

    /// Probe with zero-length writes during bus scans
    #[arg(short = 'z')]
    pub zerowrite: bool,

    /// Bus frequency in Hz
    #[arg(short = 'f', value_name = "HZ")]
    pub freq: Option<u32>,
}

impl CommonArgs {
    /// Folds the explicit flags into the session options, range-checking
    /// each one as it lands.
    pub fn apply(&self, opts: &mut Options, limits: &Limits) -> ri2c_core::Result<()> {
        if let Some(bus) = self.bus {
            limits.check_bus(bus)?;
            opts.bus = bus;
        }
        if let Some(addr) = self.addr {
            limits.check_addr(addr)?;
            opts.addr = addr;
        }
        if let Some(regaddr) = self.regaddr {
            limits.check_regaddr(regaddr)?;
            opts.regaddr = regaddr;
            opts.hasregindx = true;
        }
        if let Some(width) = self.width {
            options::check_width(width)?;
            opts.width = width;
        }
        if self.start {
            opts.start = true;
        }
        if self.no_start {
            opts.start = false;
        }
        if self.autoincr {
            opts.autoincr = true;
        }
        if self.no_autoincr {
            opts.autoincr = false;
        }
        if self.zerowrite {
            opts.zerowrite = true;
        }
        if let Some(freq) = self.freq {
            if freq == 0 {
                return Err(ri2c_core::Error::OutOfRange {
                    what: "frequency",
                    value: 0,
                    min: 1,
                    max: u32::MAX,
                });
            }
            opts.freq = freq;
        }
        Ok(())
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the configured buses and whether each one exists
    Bus {
        #[command(flatten)]
        common: CommonArgs,
    },

    /// Scan a bus for responding devices
    Dev {
        #[command(flatten)]
        common: CommonArgs,

        /// First address to probe (hex); defaults to the low bound
        #[arg(value_name = "FIRST", value_parser = parse_hex_u8)]
        first: Option<u8>,

        /// Last address to probe (hex); defaults to the high bound
        #[arg(value_name = "LAST", value_parser = parse_hex_u8)]
        last: Option<u8>,
    },

    /// Read a device register
    Get {
        #[command(flatten)]
        common: CommonArgs,

        /// Number of repeated reads
        #[arg(value_name = "COUNT", default_value_t = 1)]
        count: usize,
    },

    /// Write a device register
    Set {
        #[command(flatten)]
        common: CommonArgs,

        /// Value to write (hex)
        #[arg(value_name = "VALUE", value_parser = parse_hex_u16)]
        value: u16,
    },

    /// Dump a run of registers as hex and ASCII
    Dump {
        #[command(flatten)]
        common: CommonArgs,

        /// Number of registers to read
        #[arg(value_name = "COUNT", default_value_t = 1)]
        count: usize,
    },

    /// Write a value, read it back, and compare
    Verf {
        #[command(flatten)]
        common: CommonArgs,

        /// Value to write (hex)
        #[arg(value_name = "VALUE", value_parser = parse_hex_u16)]
        value: u16,

        /// Number of registers to verify
        #[arg(value_name = "COUNT", default_value_t = 1)]
        count: usize,
    },

    /// Try to recover a wedged bus
    #[cfg(feature = "reset")]
    Reset {
        #[command(flatten)]
        common: CommonArgs,
    },
}

impl Commands {
    /// The sticky option flags every command carries.
    pub fn common(&self) -> &CommonArgs {
        match self {
            Commands::Bus { common } => common,
            Commands::Dev { common, .. } => common,
            Commands::Get { common, .. } => common,
            Commands::Set { common, .. } => common,
            Commands::Dump { common, .. } => common,
            Commands::Verf { common, .. } => common,
            #[cfg(feature = "reset")]
            Commands::Reset { common } => common,
        }
    }
}

/// One line of the interactive session, parsed with the same grammar as
/// the one-shot commands.
#[derive(Parser)]
#[command(name = "i2c", about = "I2C diagnostic commands", long_about = None)]
pub struct ShellLine {
    #[command(subcommand)]
    pub command: Commands,
}
