//! ri2c-sim - In-memory I2C bus simulator
//!
//! This crate provides a simulated gateway that emulates buses and
//! register-file devices in memory. It's useful for testing and for
//! exercising the tool without real hardware.
//!
//! Each simulated device is a 256-byte register file behind the usual
//! pointer convention: the first byte of any write selects a register,
//! the remaining bytes land there, and reads return consecutive
//! registers from wherever the pointer sits. Devices can be configured
//! to refuse reads, refuse individual registers, or fault outright, and
//! a whole bus can be wedged until reset.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::io;
use std::rc::Rc;

use ri2c_core::error::{Error, Result};
use ri2c_core::gateway::{Gateway, I2cMaster};
use ri2c_core::transaction::Message;

/// Registers per simulated device.
pub const REG_COUNT: usize = 256;

/// A simulated register-file device.
#[derive(Debug, Clone)]
pub struct SimDevice {
    addr: u8,
    regs: [u8; REG_COUNT],
    ptr: u8,
    nak_reads: bool,
    nak_regs: Vec<u8>,
    read_only_regs: Vec<u8>,
    fault: bool,
}

impl SimDevice {
    /// Device with a zeroed register file.
    pub fn new(addr: u8) -> Self {
        SimDevice {
            addr,
            regs: [0; REG_COUNT],
            ptr: 0,
            nak_reads: false,
            nak_regs: Vec::new(),
            read_only_regs: Vec::new(),
            fault: false,
        }
    }

    /// Device whose register file starts with `initial`.
    pub fn with_regs(addr: u8, initial: &[u8]) -> Self {
        let mut device = SimDevice::new(addr);
        let len = initial.len().min(REG_COUNT);
        device.regs[..len].copy_from_slice(&initial[..len]);
        device
    }

    /// Makes the device refuse every read message. It still acknowledges
    /// writes, like a write-only controller.
    pub fn with_nak_reads(mut self) -> Self {
        self.nak_reads = true;
        self
    }

    /// Makes the device refuse any write that selects `regaddr`.
    pub fn with_nak_register(mut self, regaddr: u8) -> Self {
        self.nak_regs.push(regaddr);
        self
    }

    /// Makes `regaddr` read-only. Writes to it are acknowledged but do
    /// not land, like a status or identification register.
    pub fn with_read_only(mut self, regaddr: u8) -> Self {
        self.read_only_regs.push(regaddr);
        self
    }

    /// Makes every access fail with a bus fault instead of a missing
    /// acknowledge.
    pub fn with_fault(mut self) -> Self {
        self.fault = true;
        self
    }

    /// The device's bus address.
    pub fn addr(&self) -> u8 {
        self.addr
    }

    /// One register's current value.
    pub fn reg(&self, regaddr: u8) -> u8 {
        self.regs[usize::from(regaddr)]
    }

    /// The whole register file.
    pub fn regs(&self) -> &[u8] {
        &self.regs
    }

    /// Overwrites one register directly, bypassing the bus.
    pub fn set_reg(&mut self, regaddr: u8, value: u8) {
        self.regs[usize::from(regaddr)] = value;
    }

    fn handle(&mut self, msg: &mut Message) -> Result<()> {
        if self.fault {
            return Err(Error::Io(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "device holding the bus",
            )));
        }

        if msg.is_read() {
            if self.nak_reads {
                return Err(Error::NoAck { addr: self.addr });
            }
            for byte in msg.buf.iter_mut() {
                *byte = self.regs[usize::from(self.ptr)];
                self.ptr = self.ptr.wrapping_add(1);
            }
            return Ok(());
        }

        // Writes: the first byte selects a register, the rest land there.
        // An empty write is a probe and only asks for the acknowledge.
        if let Some((&regaddr, data)) = msg.buf.split_first() {
            if self.nak_regs.contains(&regaddr) {
                return Err(Error::NoAck { addr: self.addr });
            }
            self.ptr = regaddr;
            for &byte in data {
                if !self.read_only_regs.contains(&self.ptr) {
                    self.regs[usize::from(self.ptr)] = byte;
                }
                self.ptr = self.ptr.wrapping_add(1);
            }
        }
        Ok(())
    }
}

/// One simulated bus holding devices and a transcript of everything
/// submitted to it.
#[derive(Debug)]
pub struct SimBus {
    bus: u8,
    devices: Vec<SimDevice>,
    wedged: bool,
    transcript: Vec<Vec<Message>>,
}

impl SimBus {
    /// Empty bus with the given index.
    pub fn new(bus: u8) -> Self {
        SimBus {
            bus,
            devices: Vec::new(),
            wedged: false,
            transcript: Vec::new(),
        }
    }

    /// Adds a device, builder style.
    pub fn with_device(mut self, device: SimDevice) -> Self {
        self.devices.push(device);
        self
    }

    /// The bus index.
    pub fn index(&self) -> u8 {
        self.bus
    }

    /// Looks up a device for inspection.
    pub fn device(&self, addr: u8) -> Option<&SimDevice> {
        self.devices.iter().find(|d| d.addr == addr)
    }

    /// Looks up a device for manipulation.
    pub fn device_mut(&mut self, addr: u8) -> Option<&mut SimDevice> {
        self.devices.iter_mut().find(|d| d.addr == addr)
    }

    /// Wedges or unwedges the bus. A wedged bus fails every transfer
    /// with a timeout until reset.
    pub fn set_wedged(&mut self, wedged: bool) {
        self.wedged = wedged;
    }

    /// Whether the bus is currently wedged.
    pub fn is_wedged(&self) -> bool {
        self.wedged
    }

    /// Every submission so far, in order, as handed to the bus.
    pub fn transcript(&self) -> &[Vec<Message>] {
        &self.transcript
    }

    /// Forgets the transcript.
    pub fn clear_transcript(&mut self) {
        self.transcript.clear();
    }
}

impl I2cMaster for SimBus {
    fn transfer(&mut self, msgs: &mut [Message]) -> Result<()> {
        // Record the request shape before touching any device.
        self.transcript.push(msgs.to_vec());

        if self.wedged {
            return Err(Error::Io(io::Error::new(
                io::ErrorKind::TimedOut,
                "bus wedged",
            )));
        }

        for msg in msgs.iter_mut() {
            let addr = msg.addr;
            match self.devices.iter_mut().find(|d| d.addr == addr) {
                Some(device) => device.handle(msg)?,
                None => return Err(Error::NoAck { addr }),
            }
        }
        Ok(())
    }

    #[cfg(feature = "reset")]
    fn reset(&mut self) -> Result<()> {
        log::info!("sim: bus {} reset", self.bus);
        self.wedged = false;
        Ok(())
    }
}

/// Shared handle on one simulated bus.
///
/// The gateway hands these out so a test can keep its own reference and
/// inspect device state after the commands have run.
#[derive(Debug)]
pub struct SimHandle(Rc<RefCell<SimBus>>);

impl I2cMaster for SimHandle {
    fn transfer(&mut self, msgs: &mut [Message]) -> Result<()> {
        self.0.borrow_mut().transfer(msgs)
    }

    #[cfg(feature = "reset")]
    fn reset(&mut self) -> Result<()> {
        self.0.borrow_mut().reset()
    }
}

/// Gateway over a board of simulated buses.
#[derive(Default)]
pub struct SimGateway {
    buses: BTreeMap<u8, Rc<RefCell<SimBus>>>,
}

impl SimGateway {
    /// Gateway with no buses.
    pub fn new() -> Self {
        SimGateway::default()
    }

    /// Adds a bus, builder style. The bus keeps the index it was built
    /// with.
    pub fn with_bus(mut self, bus: SimBus) -> Self {
        self.buses.insert(bus.index(), Rc::new(RefCell::new(bus)));
        self
    }

    /// Shared reference to a bus for inspection after commands ran.
    pub fn bus(&self, bus: u8) -> Option<Rc<RefCell<SimBus>>> {
        self.buses.get(&bus).map(Rc::clone)
    }

    /// A small demo board: bus 0 carries a zeroed sensor-style device at
    /// 0x48, an EEPROM-style device at 0x50 with a counting pattern, and
    /// a device at 0x68 with an identification register; bus 2 exists
    /// but is empty.
    pub fn demo_board() -> Self {
        let pattern: Vec<u8> = (0..=255).collect();
        let mut ident = SimDevice::new(0x68);
        ident.set_reg(0x75, 0x68);

        SimGateway::new()
            .with_bus(
                SimBus::new(0)
                    .with_device(SimDevice::new(0x48))
                    .with_device(SimDevice::with_regs(0x50, &pattern))
                    .with_device(ident),
            )
            .with_bus(SimBus::new(2))
    }
}

impl Gateway for SimGateway {
    type Master = SimHandle;

    fn bus_exists(&self, bus: u8) -> bool {
        self.buses.contains_key(&bus)
    }

    fn open(&self, bus: u8) -> Result<SimHandle> {
        match self.buses.get(&bus) {
            Some(shared) => {
                log::debug!("sim: opened bus {bus}");
                Ok(SimHandle(Rc::clone(shared)))
            }
            None => Err(Error::NotFound {
                bus,
                source: io::Error::new(io::ErrorKind::NotFound, "no such simulated bus"),
            }),
        }
    }
}
