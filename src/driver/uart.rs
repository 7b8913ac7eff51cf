//! # UART Driver
//!
//! Driver for the ns16550-compatible console UART of the board. The registers are spaced by the
//! bus width and accessed as 32-bit words; the divisor is programmed from the peripheral clock
//! when the console comes up.

use core::fmt::Write;
use core::{fmt, ptr};

// Register offsets, in register units
const THR_OFFSET: usize = 0x00;
const RBR_OFFSET: usize = 0x00;
const DLL_OFFSET: usize = 0x00;
const IER_OFFSET: usize = 0x01;
const DLM_OFFSET: usize = 0x01;
const FCR_OFFSET: usize = 0x02;
const LCR_OFFSET: usize = 0x03;
const MCR_OFFSET: usize = 0x04;
const LSR_OFFSET: usize = 0x05;

/// Divisor Latch Access Bit
const LCR_DLAB: u8 = 0x80;
/// 8 data bits, 1 stop bit, no parity
const LCR_8N1: u8 = 0x03;
/// Enable FIFOs
const FCR_FIFO_EN: u8 = 0x01;
/// Transmit Holding Register Empty
const LSR_THRE: u8 = 0x20;

pub struct UartDriver {
    serial_port_base_addr: usize,
    size_per_register: usize,
}

impl UartDriver {
    pub const fn new(serial_port_base_addr: usize, size_per_register: usize) -> Self {
        UartDriver {
            serial_port_base_addr,
            size_per_register,
        }
    }

    /// Program the line: divisor from the peripheral clock, 8N1, FIFOs on, interrupts off.
    pub fn init(&mut self, clock_hz: usize, baudrate: usize) {
        // Round to the closest reachable rate
        let divisor = (clock_hz + 8 * baudrate) / (16 * baudrate);

        self.write_reg(IER_OFFSET, 0x00);
        self.write_reg(LCR_OFFSET, LCR_DLAB);
        self.write_reg(DLL_OFFSET, (divisor & 0xff) as u8);
        self.write_reg(DLM_OFFSET, ((divisor >> 8) & 0xff) as u8);
        self.write_reg(LCR_OFFSET, LCR_8N1);
        self.write_reg(FCR_OFFSET, FCR_FIFO_EN);
        self.write_reg(MCR_OFFSET, 0x00);

        // Drain stale line status and receive data
        self.read_reg(LSR_OFFSET);
        self.read_reg(RBR_OFFSET);
    }

    pub(crate) fn write_char(&mut self, c: char) {
        while self.is_line_busy() {}

        self.write_reg(THR_OFFSET, c as u8);
    }

    fn is_line_busy(&self) -> bool {
        self.read_reg(LSR_OFFSET) & LSR_THRE == 0
    }

    const fn get_register(&self, offset: usize) -> usize {
        self.serial_port_base_addr + offset * self.size_per_register
    }

    fn write_reg(&mut self, offset: usize, value: u8) {
        // SAFETY: the register address derives from the board constants the driver is built with
        unsafe { ptr::write_volatile(self.get_register(offset) as *mut u32, value as u32) }
    }

    fn read_reg(&self, offset: usize) -> u8 {
        // SAFETY: the register address derives from the board constants the driver is built with
        unsafe { ptr::read_volatile(self.get_register(offset) as *const u32) as u8 }
    }
}

impl Write for UartDriver {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.chars() {
            self.write_char(c);
        }
        Ok(())
    }
}
