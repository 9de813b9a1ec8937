//! Simulated SX1278 and delay for unit tests

extern crate std;

use std::cell::RefCell;
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal::delay::DelayNs;
use embedded_hal::spi::{ErrorKind, ErrorType, Operation, SpiDevice};

pub const REG_OP_MODE: usize = 0x01;
pub const REG_FIFO_ADDR_PTR: usize = 0x0D;
pub const REG_FIFO_TX_BASE_ADDR: usize = 0x0E;
pub const REG_FIFO_RX_BASE_ADDR: usize = 0x0F;
pub const REG_FIFO_RX_CURRENT_ADDR: usize = 0x10;
pub const REG_IRQ_FLAGS: usize = 0x12;
pub const REG_RX_NB_BYTES: usize = 0x13;
pub const REG_PAYLOAD_LENGTH: usize = 0x22;
pub const REG_VERSION: usize = 0x42;

const MODE_TX: u8 = 0x3;
const MODE_RX_CONTINUOUS: u8 = 0x5;

/// Register file and FIFO of the simulated chip
pub struct Chip {
    pub regs: [u8; 0x80],
    pub fifo: [u8; 256],
    /// Fail every transaction
    pub fail: bool,
    /// Raise TxDone as soon as TX mode is entered
    pub tx_completes: bool,
    /// Feed every transmitted packet back as a received one
    pub loopback: bool,
    /// IRQ flag reads performed while in TX mode
    pub irq_reads_in_tx: u32,
    /// Every write: (address, data)
    pub writes: Vec<(u8, Vec<u8>)>,
    pending_rx: bool,
}

impl Chip {
    fn new() -> Self {
        let mut regs = [0u8; 0x80];
        // LoRa page reset values
        regs[REG_OP_MODE] = 0x09;
        regs[0x06] = 0x6C;
        regs[0x07] = 0x80;
        regs[0x09] = 0x4F;
        regs[0x0C] = 0x20;
        regs[REG_FIFO_TX_BASE_ADDR] = 0x80;
        regs[0x1D] = 0x72;
        regs[0x1E] = 0x70;
        regs[0x1F] = 0x64;
        regs[0x21] = 0x08;
        regs[REG_PAYLOAD_LENGTH] = 0x01;
        regs[0x23] = 0xFF;
        regs[0x26] = 0x04;
        regs[REG_VERSION] = 0x12;

        Self {
            regs,
            fifo: [0; 256],
            fail: false,
            tx_completes: true,
            loopback: false,
            irq_reads_in_tx: 0,
            writes: Vec::new(),
            pending_rx: false,
        }
    }

    pub fn mode(&self) -> u8 {
        self.regs[REG_OP_MODE] & 0x07
    }

    fn read_burst(&mut self, address: u8, buf: &mut [u8]) {
        let address = usize::from(address & 0x7F);

        if address == REG_IRQ_FLAGS && self.mode() == MODE_TX {
            self.irq_reads_in_tx += 1;
        }

        for (i, byte) in buf.iter_mut().enumerate() {
            if address == 0 {
                let ptr = self.regs[REG_FIFO_ADDR_PTR];
                *byte = self.fifo[usize::from(ptr)];
                self.regs[REG_FIFO_ADDR_PTR] = ptr.wrapping_add(1);
            } else {
                *byte = self.regs[(address + i) & 0x7F];
            }
        }
    }

    fn write_burst(&mut self, address: u8, bytes: &[u8]) {
        let address = usize::from(address & 0x7F);
        self.writes.push((address as u8, bytes.to_vec()));

        for (i, &byte) in bytes.iter().enumerate() {
            match address {
                0 => {
                    let ptr = self.regs[REG_FIFO_ADDR_PTR];
                    self.fifo[usize::from(ptr)] = byte;
                    self.regs[REG_FIFO_ADDR_PTR] = ptr.wrapping_add(1);
                }
                REG_IRQ_FLAGS if i == 0 => self.regs[REG_IRQ_FLAGS] &= !byte,
                REG_OP_MODE if i == 0 => {
                    self.regs[REG_OP_MODE] = byte;
                    self.mode_changed();
                }
                _ => self.regs[(address + i) & 0x7F] = byte,
            }
        }
    }

    fn mode_changed(&mut self) {
        match self.mode() {
            MODE_TX => {
                if self.loopback {
                    let len = self.regs[REG_PAYLOAD_LENGTH];
                    let tx_base = self.regs[REG_FIFO_TX_BASE_ADDR];
                    let rx_base = self.regs[REG_FIFO_RX_BASE_ADDR];
                    for i in 0..len {
                        self.fifo[usize::from(rx_base.wrapping_add(i))] =
                            self.fifo[usize::from(tx_base.wrapping_add(i))];
                    }
                    self.regs[REG_FIFO_RX_CURRENT_ADDR] = rx_base;
                    self.regs[REG_RX_NB_BYTES] = len;
                    self.pending_rx = true;
                }
                if self.tx_completes {
                    self.regs[REG_IRQ_FLAGS] |= 0x08;
                }
            }
            MODE_RX_CONTINUOUS if self.pending_rx => {
                self.pending_rx = false;
                self.regs[REG_IRQ_FLAGS] |= 0x40 | 0x10;
            }
            _ => {}
        }
    }

    fn run(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), ErrorKind> {
        if self.fail {
            return Err(ErrorKind::Other);
        }

        let mut address = None;
        for operation in operations.iter_mut() {
            match operation {
                Operation::Write(bytes) => match address {
                    None => {
                        let (&first, rest) = bytes.split_first().ok_or(ErrorKind::Other)?;
                        address = Some(first);
                        if !rest.is_empty() {
                            self.write_burst(first, rest);
                        }
                    }
                    Some(a) => self.write_burst(a, bytes),
                },
                Operation::Read(buf) => {
                    let a = address.ok_or(ErrorKind::Other)?;
                    self.read_burst(a, buf);
                }
                _ => return Err(ErrorKind::Other),
            }
        }

        Ok(())
    }
}

/// SPI handle onto a shared [`Chip`]
#[derive(Clone)]
pub struct MockRadio {
    pub chip: Rc<RefCell<Chip>>,
}

impl MockRadio {
    pub fn new() -> Self {
        Self {
            chip: Rc::new(RefCell::new(Chip::new())),
        }
    }

    pub fn reg(&self, address: usize) -> u8 {
        self.chip.borrow().regs[address]
    }

    pub fn set_reg(&self, address: usize, value: u8) {
        self.chip.borrow_mut().regs[address] = value;
    }

    pub fn raise(&self, flags: u8) {
        self.chip.borrow_mut().regs[REG_IRQ_FLAGS] |= flags;
    }
}

impl ErrorType for MockRadio {
    type Error = ErrorKind;
}

impl SpiDevice for MockRadio {
    fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), Self::Error> {
        self.chip.borrow_mut().run(operations)
    }
}

impl embedded_hal_async::spi::SpiDevice for MockRadio {
    async fn transaction(
        &mut self,
        operations: &mut [Operation<'_, u8>],
    ) -> Result<(), Self::Error> {
        self.chip.borrow_mut().run(operations)
    }
}

/// Delay that only records how long it was asked to wait
#[derive(Debug, Default)]
pub struct MockDelay {
    pub elapsed_ms: u32,
    pub calls: u32,
}

// `delay_ms` is overridden so that a millisecond wait counts as one call
// instead of going through the default chunked `delay_ns` loop.
impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.calls += 1;
        self.elapsed_ms += ns / 1_000_000;
    }

    fn delay_ms(&mut self, ms: u32) {
        self.calls += 1;
        self.elapsed_ms += ms;
    }
}
