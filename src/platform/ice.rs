//! T-HEAD ICE EVB
//!
//! Board facts for the ICE evaluation board: the C910 memory map, the PMP images the boot flow
//! programs, the clock targets and the console UART. The raw register values come from the
//! vendor boot flow and are pinned by the tests below.

use core::fmt::Write;
use core::{fmt, hint};

use log::Level;
use spin::Mutex;

use crate::arch::pmp::pmpcfg::{L, NAPOT, R, RWX, TOR, W, X};
use crate::arch::pmp::{build_napot, PmpConfig};
use crate::arch::{wfi, Csr};
use crate::driver::uart::UartDriver;
use crate::platform::Platform;

// ——————————————————————————————— Memory Map ——————————————————————————————— //

/// The memory-mapped peripheral window.
pub const DEV_BASE: usize = 0x3_f000_0000;
pub const DEV_SIZE: usize = 0x1000_0000;

/// The DRAM window, 4 GiB from address zero.
pub const DRAM_BASE: usize = 0x0;
pub const DRAM_SIZE: usize = 0x1_0000_0000;

/// Boot-mode status register. The low two bits read 0b11 when a JTAG probe drives the hart.
pub const BOOT_MODE_STATUS: usize = 0x3_fff7_2050;
pub const JTAG_ATTACHED_MASK: u32 = 0b11;

/// NAPOT pmpaddr images of the guarded windows.
///
/// Both windows are power-of-two sized and aligned; a bad window constant fails the build here
/// instead of silently guarding the wrong range.
pub const DEV_WINDOW_PMPADDR: usize = match build_napot(DEV_BASE, DEV_SIZE) {
    Some(pmpaddr) => pmpaddr,
    None => panic!("peripheral window is not a valid NAPOT region"),
};
pub const DRAM_WINDOW_PMPADDR: usize = match build_napot(DRAM_BASE, DRAM_SIZE) {
    Some(pmpaddr) => pmpaddr,
    None => panic!("DRAM window is not a valid NAPOT region"),
};

// —————————————————————————————— Clock Targets ————————————————————————————— //

pub const CPU_FREQ_MHZ: u32 = 1200;
pub const DDR_FREQ_MHZ: u32 = 1600;

// ——————————————————————————————— PMP Images ——————————————————————————————— //

/// `pmpcfg0` while only the peripheral guard is in place (raw value `0x8898_0000_001b_1f1d`).
///
/// Entries 0 and 1 mirror the SDRAM setup of the boot ROM, entry 2 is the peripheral guard
/// (read+write, never execute). Entries 6 and 7 were locked by the boot ROM; their octets are
/// carried unchanged and the hardware ignores the write.
pub const DEV_PMPCFG: PmpConfig = PmpConfig::EMPTY
    .set(0, NAPOT | R | X)
    .set(1, NAPOT | RWX)
    .set(2, NAPOT | R | W)
    .set(6, L | NAPOT)
    .set(7, L | TOR);

/// `pmpcfg0` once DRAM is up, generic ICE image (raw value `0x8898_0000_001b_1f1f`).
///
/// Entry 0 opens the full DRAM window, where the next stage is loaded and executed. No
/// reconfigurable entry is locked, so later boot stages keep control of the PMP.
pub const DDR_PMPCFG: PmpConfig = PmpConfig::EMPTY
    .set(0, NAPOT | RWX)
    .set(1, NAPOT | RWX)
    .set(2, NAPOT | R | W)
    .set(6, L | NAPOT)
    .set(7, L | TOR);

/// The ICE-RVB image (raw value `0x8898_0000_009b_9f9f`): [`DDR_PMPCFG`] with entries 0 to 2
/// additionally locked. On that revision the unlocked image makes the next boot stage hang in
/// its own PMP setup, at the price of freezing those entries until reset.
pub const DDR_PMPCFG_RVB: PmpConfig = PmpConfig::EMPTY
    .set(0, L | NAPOT | RWX)
    .set(1, L | NAPOT | RWX)
    .set(2, L | NAPOT | R | W)
    .set(6, L | NAPOT)
    .set(7, L | TOR);

/// Board revisions with diverging PMP needs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoardVariant {
    /// Generic ICE EVB
    Ice,
    /// ICE-RVB revision
    IceRvb,
}

/// The DRAM-phase `pmpcfg0` image for a board revision.
pub const fn ddr_pmpcfg(variant: BoardVariant) -> PmpConfig {
    match variant {
        BoardVariant::Ice => DDR_PMPCFG,
        BoardVariant::IceRvb => DDR_PMPCFG_RVB,
    }
}

// ————————————————————————— Performance Registers —————————————————————————— //

/// The XuanTie performance setup: caches, prefetch, branch prediction and the vendor ISA
/// extensions. Values inherited from the vendor boot flow, written in this order.
pub const PERF_CSRS: [(Csr, usize); 5] = [
    (Csr::Mcor, 0x70013),
    (Csr::Mccr2, 0xe0410009),
    (Csr::Mhcr, 0x11ff),
    (Csr::Mxstatus, 0x638000),
    (Csr::Mhint, 0x16e30c),
];

// ————————————————————————————————— Console ———————————————————————————————— //

/// Console UART (ns16550 compatible), 32-bit registers spaced 4 bytes apart.
const UART0_BASE: usize = 0x3_fff7_3000;
const UART0_REG_WIDTH: usize = 4;
const UART0_CLK_HZ: usize = 62_500_000;
const UART0_BAUDRATE: usize = 115_200;

pub static WRITER: Mutex<UartDriver> = Mutex::new(UartDriver::new(UART0_BASE, UART0_REG_WIDTH));

// ———————————————————————————————— Platform ———————————————————————————————— //

pub struct IcePlatform {}

impl Platform for IcePlatform {
    fn name() -> &'static str {
        "T-HEAD ICE EVB"
    }

    fn init() {
        let mut writer = WRITER.lock();
        writer.init(UART0_CLK_HZ, UART0_BAUDRATE);
        writer.write_char('\n');
    }

    fn debug_print(_level: Level, args: fmt::Arguments) {
        let mut writer = WRITER.lock();
        writer.write_fmt(args).unwrap();
        writer.write_str("\r").unwrap();
    }

    fn exit_failure() -> ! {
        loop {
            wfi();
            hint::spin_loop();
        }
    }
}

// ————————————————————————————————— Tests —————————————————————————————————— //
