//! C910 architecture interface
//!
//! The registers this boot stage programs and the port the boot code uses to reach them. The
//! production port lives in `metal` and only builds for riscv64; tests substitute a recording
//! implementation.

#[cfg(target_arch = "riscv64")]
pub mod metal;
pub mod pmp;

// ————————————————————————————————— CSRs ——————————————————————————————————— //

/// A machine-mode CSR written during boot.
///
/// Covers the six PMP address registers of the board flow, their configuration register, and the
/// XuanTie extension CSRs of the C910.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Csr {
    Pmpaddr0,
    Pmpaddr1,
    Pmpaddr2,
    Pmpaddr3,
    Pmpaddr4,
    Pmpaddr5,
    Pmpcfg0,
    /// Extended machine status (0x7C0)
    Mxstatus,
    /// Hardware configuration: caches, write allocate, branch prediction (0x7C1)
    Mhcr,
    /// Cache operation: invalidate caches and predictors (0x7C2)
    Mcor,
    /// L2 cache control (0x7C3)
    Mccr2,
    /// Prefetch and write-burst hints (0x7C5)
    Mhint,
}

// ——————————————————————————————— Register Port ———————————————————————————— //

/// Access to the SoC's registers.
///
/// The boot flow is written against this trait so the exact write order can be observed without
/// hardware; `metal::MetalPort` forwards to the real CSRs and the memory bus.
pub trait SocPort {
    /// Write a machine-mode CSR.
    fn write_csr(&mut self, csr: Csr, value: usize);

    /// Read a 32-bit memory-mapped SoC register.
    fn read_mmio(&mut self, addr: usize) -> u32;

    /// Trigger a breakpoint trap, handing the hart to an attached debugger.
    ///
    /// Returns once the debugger resumes the hart.
    fn breakpoint(&mut self);
}

// ————————————————————————————————— Misc ——————————————————————————————————— //

/// Wait for an interrupt.
pub fn wfi() {
    #[cfg(target_arch = "riscv64")]
    unsafe {
        core::arch::asm!("wfi", options(nomem, nostack));
    }
}
