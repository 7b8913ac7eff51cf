//! Bare metal C910
//!
//! Production implementation of [`SocPort`]: CSR writes through `csrw`, vendor CSRs addressed by
//! number, volatile loads from the memory bus, and `ebreak` for the debugger wait.

use core::arch::asm;
use core::ptr;

use super::{Csr, SocPort};

/// Register access through the real CSRs and the memory bus.
pub struct MetalPort {}

impl SocPort for MetalPort {
    fn write_csr(&mut self, csr: Csr, value: usize) {
        // SAFETY: CSR writes reconfigure memory protection and caches; the boot flow guarantees
        // the required ordering (PMP guards before the matching accesses).
        unsafe { write_csr(csr, value) }
    }

    fn read_mmio(&mut self, addr: usize) -> u32 {
        // SAFETY: the boot flow only reads registers of the SoC memory map.
        unsafe { ptr::read_volatile(addr as *const u32) }
    }

    fn breakpoint(&mut self) {
        unsafe { asm!("ebreak") }
    }
}

unsafe fn write_csr(csr: Csr, value: usize) {
    match csr {
        Csr::Pmpaddr0 => asm!("csrw pmpaddr0, {}", in(reg) value),
        Csr::Pmpaddr1 => asm!("csrw pmpaddr1, {}", in(reg) value),
        Csr::Pmpaddr2 => asm!("csrw pmpaddr2, {}", in(reg) value),
        Csr::Pmpaddr3 => asm!("csrw pmpaddr3, {}", in(reg) value),
        Csr::Pmpaddr4 => asm!("csrw pmpaddr4, {}", in(reg) value),
        Csr::Pmpaddr5 => asm!("csrw pmpaddr5, {}", in(reg) value),
        Csr::Pmpcfg0 => asm!("csrw pmpcfg0, {}", in(reg) value),
        // The XuanTie registers are not known to the assembler by name
        Csr::Mxstatus => asm!("csrw 0x7C0, {}", in(reg) value),
        Csr::Mhcr => asm!("csrw 0x7C1, {}", in(reg) value),
        Csr::Mcor => asm!("csrw 0x7C2, {}", in(reg) value),
        Csr::Mccr2 => asm!("csrw 0x7C3, {}", in(reg) value),
        Csr::Mhint => asm!("csrw 0x7C5, {}", in(reg) value),
    }
}
