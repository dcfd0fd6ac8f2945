//! Pure text rendering for command output
//!
//! Everything here is a plain function from results to text so the
//! renderers can be checked without touching a bus.

use ri2c_core::options::Options;
use ri2c_core::scan::{ProbeOutcome, ScanReport};

/// Formats a register value at the session width.
pub fn format_value(value: u16, width: u8) -> String {
    if width == 16 {
        format!("{value:#06x}")
    } else {
        format!("{value:#04x}")
    }
}

/// One `get`/`set` result line, naming the register only when the
/// session is register-addressed.
pub fn value_line(opts: &Options, regaddr: u8, value: u16) -> String {
    if opts.hasregindx {
        format!(
            "bus {} addr {:#04x} reg {:#04x} = {}",
            opts.bus,
            opts.addr,
            regaddr,
            format_value(value, opts.width)
        )
    } else {
        format!(
            "bus {} addr {:#04x} = {}",
            opts.bus,
            opts.addr,
            format_value(value, opts.width)
        )
    }
}

/// Hex and ASCII rows, 16 bytes per line, offsets continuing from
/// `start`.
pub fn hexdump(start: u8, bytes: &[u8]) -> String {
    let mut text = String::new();
    for (row, chunk) in bytes.chunks(16).enumerate() {
        let offset = usize::from(start) + row * 16;
        let mut hex = String::new();
        for &byte in chunk {
            hex.push_str(&format!("{byte:02x} "));
        }
        let ascii: String = chunk
            .iter()
            .map(|&byte| {
                if (0x20..0x7f).contains(&byte) {
                    byte as char
                } else {
                    '.'
                }
            })
            .collect();
        text.push_str(&format!("{offset:04x}: {hex:<48} {ascii}\n"));
    }
    text
}

/// Address grid of scan outcomes: responders show their address,
/// silence shows `--`, faults show `EE`, and addresses outside the
/// scanned range stay blank.
pub fn scan_grid(report: &ScanReport) -> String {
    let mut cells: [Option<&ProbeOutcome>; 128] = [None; 128];
    for (addr, outcome) in &report.outcomes {
        let addr = usize::from(*addr);
        if addr < cells.len() {
            cells[addr] = Some(outcome);
        }
    }

    let mut text = String::from("     0  1  2  3  4  5  6  7  8  9  a  b  c  d  e  f\n");
    for row in (0x00..0x80).step_by(16) {
        let mut line = format!("{row:02x}:");
        for col in 0..16 {
            let addr = row + col;
            match cells[addr] {
                None => line.push_str("   "),
                Some(ProbeOutcome::Responded) => line.push_str(&format!(" {addr:02x}")),
                Some(ProbeOutcome::NoResponse) => line.push_str(" --"),
                Some(ProbeOutcome::Fault(_)) => line.push_str(" EE"),
            }
        }
        text.push_str(line.trim_end());
        text.push('\n');
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_format_value_width() {
        assert_eq!(format_value(0x0a, 8), "0x0a");
        assert_eq!(format_value(0x0a, 16), "0x000a");
        assert_eq!(format_value(0x1234, 16), "0x1234");
    }

    #[test]
    fn test_value_line_with_and_without_register() {
        let opts = Options {
            bus: 1,
            addr: 0x48,
            hasregindx: true,
            ..Options::default()
        };
        assert_eq!(
            value_line(&opts, 0x10, 0xab),
            "bus 1 addr 0x48 reg 0x10 = 0xab"
        );

        let opts = Options {
            hasregindx: false,
            ..opts
        };
        assert_eq!(value_line(&opts, 0x10, 0xab), "bus 1 addr 0x48 = 0xab");
    }

    #[test]
    fn test_hexdump_full_row() {
        let bytes: Vec<u8> = (0x41..=0x50).collect();
        assert_eq!(
            hexdump(0x10, &bytes),
            "0010: 41 42 43 44 45 46 47 48 49 4a 4b 4c 4d 4e 4f 50  ABCDEFGHIJKLMNOP\n"
        );
    }

    #[test]
    fn test_hexdump_short_row_and_unprintable() {
        assert_eq!(
            hexdump(0x00, &[0x00, 0x7f]),
            format!("0000: {:<48} ..\n", "00 7f ")
        );
    }

    #[test]
    fn test_hexdump_multiple_rows_advance_offset() {
        let bytes = vec![0u8; 20];
        let text = hexdump(0x10, &bytes);
        let offsets: Vec<&str> = text
            .lines()
            .map(|l| l.split(':').next().unwrap())
            .collect();
        assert_eq!(offsets, vec!["0010", "0020"]);
    }

    #[test]
    fn test_hexdump_empty() {
        assert_eq!(hexdump(0x00, &[]), "");
    }

    fn report(outcomes: Vec<(u8, ProbeOutcome)>) -> ScanReport {
        ScanReport { bus: 0, outcomes }
    }

    #[test]
    fn test_scan_grid_cells() {
        let mut outcomes = Vec::new();
        for addr in 0x03..=0x77 {
            let outcome = match addr {
                0x20 | 0x50 => ProbeOutcome::Responded,
                0x13 => ProbeOutcome::Fault(ri2c_core::Error::Io(io::Error::new(
                    io::ErrorKind::TimedOut,
                    "stuck",
                ))),
                _ => ProbeOutcome::NoResponse,
            };
            outcomes.push((addr, outcome));
        }
        let text = scan_grid(&report(outcomes));
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines[0],
            "     0  1  2  3  4  5  6  7  8  9  a  b  c  d  e  f"
        );
        assert_eq!(
            lines[1],
            "00:          -- -- -- -- -- -- -- -- -- -- -- -- --"
        );
        assert_eq!(
            lines[2],
            "10: -- -- -- EE -- -- -- -- -- -- -- -- -- -- -- --"
        );
        assert_eq!(
            lines[3],
            "20: 20 -- -- -- -- -- -- -- -- -- -- -- -- -- -- --"
        );
        assert_eq!(
            lines[6],
            "50: 50 -- -- -- -- -- -- -- -- -- -- -- -- -- -- --"
        );
        assert_eq!(lines[8], "70: -- -- -- -- -- -- -- --");
        assert_eq!(lines.len(), 9);
    }

    #[test]
    fn test_scan_grid_narrow_range_leaves_blanks() {
        let outcomes = vec![
            (0x10, ProbeOutcome::NoResponse),
            (0x11, ProbeOutcome::Responded),
            (0x12, ProbeOutcome::NoResponse),
        ];
        let text = scan_grid(&report(outcomes));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[1], "00:");
        assert_eq!(lines[2], "10: -- 11 --");
        assert_eq!(lines[3], "20:");
    }
}
