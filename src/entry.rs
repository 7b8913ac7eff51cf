//! Bare-metal entry
//!
//! The assembly prologue and the binding of the board seams to the real hardware: CSR access goes
//! through [`MetalPort`], the framework collaborators resolve to the symbols the surrounding
//! firmware links in, and fatal errors park the hart.

use core::arch::global_asm;
use core::{fmt, mem, ptr};

use ice_spl::arch::metal::MetalPort;
use ice_spl::platform::{self, Plat, Platform};
use ice_spl::spl::{self, BootOrder, SplServices};

// ————————————————————————— Framework Collaborators ———————————————————————— //

// Provided at link time by the SoC support library and the DRAM init blob.
extern "C" {
    fn cpu_clk_config(cpu_freq: i32);
    fn ddr_clk_config(ddr_freq: i32);
    fn show_sys_clk();
    fn spl_early_init() -> i32;
    fn arch_cpu_init_dm();
    static init_ddr: u8;
}

/// The services of the surrounding firmware.
struct MetalSpl {}

impl SplServices for MetalSpl {
    fn cpu_clk_config(&mut self, freq_mhz: u32) {
        unsafe { cpu_clk_config(freq_mhz as i32) }
    }

    fn ddr_clk_config(&mut self, freq_mhz: u32) {
        unsafe { ddr_clk_config(freq_mhz as i32) }
    }

    fn show_sys_clk(&mut self) {
        unsafe { show_sys_clk() }
    }

    fn spl_early_init(&mut self) -> Result<(), i32> {
        let ret = unsafe { spl_early_init() };
        if ret != 0 {
            Err(ret)
        } else {
            Ok(())
        }
    }

    fn arch_cpu_init_dm(&mut self) {
        unsafe { arch_cpu_init_dm() }
    }

    fn console_init(&mut self) {
        platform::init();
    }

    fn ddr_init(&mut self) {
        // SAFETY: init_ddr marks the entry of the DRAM init blob linked into the image; the blob
        // takes no arguments and returns once DRAM is usable.
        let ddr_initialize: extern "C" fn() =
            unsafe { mem::transmute(ptr::addr_of!(init_ddr)) };
        ddr_initialize();
    }

    fn console_print(&mut self, args: fmt::Arguments) {
        // Straight to the UART: this must work even when the failure happens before the console
        // and logger are up.
        Plat::debug_print(log::Level::Error, args);
    }
}

// ——————————————————————————————— Entry Point —————————————————————————————— //

// The boot ROM drops us here with DRAM still down; mask interrupts, set up a stack in SRAM and
// get into Rust. The stack symbol comes from the linker script.
global_asm!(
    r#"
.text
.align 4
.global _start
_start:
    csrw mie, zero
    ld sp, __stack_top
    j {main}

// Store the address of the stack in memory
// That way it can be loaded as an absolute value
__stack_top:
    .dword {stack_top}
"#,
    main = sym main,
    stack_top = sym _stack_top,
);

extern "C" {
    static _stack_top: u8;
}

extern "C" fn main() -> ! {
    let mut port = MetalPort {};
    let mut services = MetalSpl {};

    if let Err(err) = spl::board_init_f(&mut port, &mut services) {
        log::error!("{}", err);
        Plat::exit_failure();
    }

    log::info!("{}: board init done", Plat::name());

    let mut order = BootOrder::new();
    spl::board_boot_order(&mut port, &mut order);
    match order.get(0) {
        Some(device) => log::info!("boot device: {:?}", device),
        None => log::warn!("no boot device selected"),
    }

    // Loading the next stage belongs to the dispatcher; nothing left to do here.
    Plat::exit_failure();
}

#[panic_handler]
fn panic(info: &core::panic::PanicInfo) -> ! {
    log::error!("Panicked at {:#?}", info);
    Plat::exit_failure();
}
