//! ICE board boot flow
//!
//! The board hooks the SPL dispatcher calls on the T-HEAD ICE EVB. `board_init_f` walks the fixed
//! bring-up sequence: PMP guard over the peripheral window, clocks, framework early init, console,
//! DRAM, PMP guard over DRAM. `board_boot_order` then selects the boot device, or parks the hart
//! when a JTAG probe is attached.
//!
//! All hardware traffic goes through [`SocPort`] and all framework calls through [`SplServices`],
//! so the tests below pin the exact register values and the call order.

use core::fmt;

use thiserror_no_std::Error;

use crate::arch::{Csr, SocPort};
use crate::config;
use crate::platform::ice;

// ————————————————————————————— Boot Devices ——————————————————————————————— //

/// A device the dispatcher can load the next boot stage from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BootDevice {
    Mmc1,
}

/// Capacity of a boot order list, fixed by the dispatcher.
const BOOT_ORDER_CAPACITY: usize = 4;

/// The boot devices to try, most preferred first.
///
/// The dispatcher owns the probing; this board fills the first slot only and leaves the list
/// empty when the hart is handed to a debugger.
#[derive(Debug)]
pub struct BootOrder {
    devices: [Option<BootDevice>; BOOT_ORDER_CAPACITY],
    len: usize,
}

impl BootOrder {
    pub const CAPACITY: usize = BOOT_ORDER_CAPACITY;

    pub const fn new() -> Self {
        BootOrder {
            devices: [None; Self::CAPACITY],
            len: 0,
        }
    }

    /// Append a device. Entries past the list capacity are dropped.
    pub fn push(&mut self, device: BootDevice) {
        if self.len < Self::CAPACITY {
            self.devices[self.len] = Some(device);
            self.len += 1;
        }
    }

    pub fn get(&self, idx: usize) -> Option<BootDevice> {
        if idx < self.len {
            self.devices[idx]
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Default for BootOrder {
    fn default() -> Self {
        BootOrder::new()
    }
}

// ————————————————————————————————— Errors ————————————————————————————————— //

/// A fatal boot error.
///
/// There is no recovery path this early: the caller must report the error and park the hart
/// instead of continuing the boot flow.
#[derive(Error, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SplError {
    /// The framework's early initialization failed with the given code.
    #[error("spl_early_init() failed: {0}")]
    EarlyInit(i32),
}

// ——————————————————————————— Framework Services ——————————————————————————— //

/// The SPL environment this board plugs into.
///
/// Clock programming, driver-model setup and the DRAM init code are owned by the surrounding
/// firmware; the board flow only decides when they run.
pub trait SplServices {
    fn cpu_clk_config(&mut self, freq_mhz: u32);
    fn ddr_clk_config(&mut self, freq_mhz: u32);

    /// Print the measured system clocks.
    fn show_sys_clk(&mut self);

    /// Early framework setup. Returns the framework's error code on failure.
    fn spl_early_init(&mut self) -> Result<(), i32>;

    /// Driver-model CPU setup.
    fn arch_cpu_init_dm(&mut self);

    /// Bring up the boot console.
    fn console_init(&mut self);

    /// Run the DRAM initialization code. DRAM is usable once this returns.
    fn ddr_init(&mut self);

    /// Best-effort console output, usable even before `console_init`.
    fn console_print(&mut self, args: fmt::Arguments);
}

// ———————————————————————————————— PMP Guards —————————————————————————————— //

/// Guard the peripheral window before the first device access.
///
/// Entry 2 covers the memory-mapped peripherals, read+write and never execute. The written image
/// also carries the octets of the entries the boot ROM locked; the hardware ignores those.
pub fn setup_dev_pmp(port: &mut impl SocPort) {
    log::trace!("setup_dev_pmp");

    // peripherals: 0x3_f000_0000 ~ 0x4_0000_0000, napot rw
    port.write_csr(Csr::Pmpaddr2, ice::DEV_WINDOW_PMPADDR);
    port.write_csr(Csr::Pmpcfg0, ice::DEV_PMPCFG.bits());
}

/// Guard the DRAM window. Must only run once DRAM is initialized.
///
/// Entry 0 covers the full 4 GiB DRAM range and entries 3 to 5 are cleared. Entry 1 maps the
/// SDRAM this code runs from, configured by the boot ROM, so it is deliberately left untouched.
pub fn setup_ddr_pmp(port: &mut impl SocPort) {
    log::trace!("setup_ddr_pmp");

    // ddr: 0x0 ~ 0x1_0000_0000
    port.write_csr(Csr::Pmpaddr0, ice::DRAM_WINDOW_PMPADDR);
    port.write_csr(Csr::Pmpaddr3, 0x0);
    port.write_csr(Csr::Pmpaddr4, 0x0);
    port.write_csr(Csr::Pmpaddr5, 0x0);
    port.write_csr(Csr::Pmpcfg0, ice::ddr_pmpcfg(config::BOARD_VARIANT).bits());
}

// ————————————————————————— Performance Configuration —————————————————————— //

/// Turn on the C910 performance features.
///
/// Runs once per boot, after DRAM is live and only when no debugger holds the hart. There is no
/// undo before the next reset.
pub fn cpu_performance_enable(port: &mut impl SocPort) {
    for (csr, value) in ice::PERF_CSRS {
        port.write_csr(csr, value);
    }
}

// ————————————————————————————— Board Init Flow ———————————————————————————— //

/// The pre-relocation board init sequence.
///
/// Every step is a precondition of the ones after it, so the order is fixed: the peripheral
/// guard before any device access, the CPU clock before the framework early init, clocks and
/// console before DRAM init, and the DRAM guard last, once the window is backed by working
/// memory.
///
/// On error the caller must not continue the boot; see [`SplError`].
pub fn board_init_f(port: &mut impl SocPort, spl: &mut impl SplServices) -> Result<(), SplError> {
    setup_dev_pmp(port);
    spl.cpu_clk_config(ice::CPU_FREQ_MHZ);

    if let Err(code) = spl.spl_early_init() {
        spl.console_print(format_args!("spl_early_init() failed: {}\n", code));
        return Err(SplError::EarlyInit(code));
    }

    spl.arch_cpu_init_dm();
    spl.console_init();

    spl.ddr_clk_config(ice::DDR_FREQ_MHZ);
    spl.ddr_init();
    spl.show_sys_clk();
    setup_ddr_pmp(port);

    log::debug!("board_init_f done");
    Ok(())
}

// ——————————————————————————————— Boot Order ——————————————————————————————— //

/// Select the boot device, or hold the hart for an attached debugger.
///
/// The low two bits of the boot-mode status register read 0b11 when a JTAG probe drives the
/// hart. In that case nothing is added to the boot order: the breakpoint hands control to the
/// debugger and the empty list keeps the dispatcher from racing it. Otherwise boot from MMC and
/// enable the performance features.
pub fn board_boot_order(port: &mut impl SocPort, order: &mut BootOrder) {
    let status = port.read_mmio(ice::BOOT_MODE_STATUS);
    if status & ice::JTAG_ATTACHED_MASK == ice::JTAG_ATTACHED_MASK {
        log::debug!("Wait here for JTAG/GDB connecting");
        port.breakpoint();
    } else {
        order.push(BootDevice::Mmc1);
        cpu_performance_enable(port);
    }
}

// ————————————————————————————————— Tests —————————————————————————————————— //

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::arch::pmp::{pmpcfg, PmpConfig};

    /// Everything the boot flow did, in order.
    #[derive(Debug, Clone, PartialEq)]
    enum Event {
        CsrWrite(Csr, usize),
        MmioRead(usize),
        Breakpoint,
        CpuClk(u32),
        DdrClk(u32),
        ShowSysClk,
        EarlyInit,
        ArchCpuInitDm,
        ConsoleInit,
        DdrInit,
        Print(String),
    }

    /// A single trace shared by the port and the services fakes, so tests can check the global
    /// interleaving and not just per-fake ordering.
    type Trace = Rc<RefCell<Vec<Event>>>;

    struct FakePort {
        trace: Trace,
        boot_mode: u32,
    }

    impl SocPort for FakePort {
        fn write_csr(&mut self, csr: Csr, value: usize) {
            self.trace.borrow_mut().push(Event::CsrWrite(csr, value));
        }

        fn read_mmio(&mut self, addr: usize) -> u32 {
            self.trace.borrow_mut().push(Event::MmioRead(addr));
            assert_eq!(addr, ice::BOOT_MODE_STATUS, "unexpected MMIO read");
            self.boot_mode
        }

        fn breakpoint(&mut self) {
            self.trace.borrow_mut().push(Event::Breakpoint);
        }
    }

    struct FakeSpl {
        trace: Trace,
        early_init: Result<(), i32>,
    }

    impl SplServices for FakeSpl {
        fn cpu_clk_config(&mut self, freq_mhz: u32) {
            self.trace.borrow_mut().push(Event::CpuClk(freq_mhz));
        }

        fn ddr_clk_config(&mut self, freq_mhz: u32) {
            self.trace.borrow_mut().push(Event::DdrClk(freq_mhz));
        }

        fn show_sys_clk(&mut self) {
            self.trace.borrow_mut().push(Event::ShowSysClk);
        }

        fn spl_early_init(&mut self) -> Result<(), i32> {
            self.trace.borrow_mut().push(Event::EarlyInit);
            self.early_init
        }

        fn arch_cpu_init_dm(&mut self) {
            self.trace.borrow_mut().push(Event::ArchCpuInitDm);
        }

        fn console_init(&mut self) {
            self.trace.borrow_mut().push(Event::ConsoleInit);
        }

        fn ddr_init(&mut self) {
            self.trace.borrow_mut().push(Event::DdrInit);
        }

        fn console_print(&mut self, args: fmt::Arguments) {
            self.trace.borrow_mut().push(Event::Print(args.to_string()));
        }
    }

    fn setup(boot_mode: u32, early_init: Result<(), i32>) -> (FakePort, FakeSpl, Trace) {
        let trace: Trace = Rc::new(RefCell::new(Vec::new()));
        let port = FakePort {
            trace: Rc::clone(&trace),
            boot_mode,
        };
        let spl = FakeSpl {
            trace: Rc::clone(&trace),
            early_init,
        };
        (port, spl, trace)
    }

    #[test]
    fn dev_pmp_writes() {
        let (mut port, _spl, trace) = setup(0, Ok(()));
        setup_dev_pmp(&mut port);
        assert_eq!(
            *trace.borrow(),
            vec![
                Event::CsrWrite(Csr::Pmpaddr2, 0xfdff_ffff),
                Event::CsrWrite(Csr::Pmpcfg0, 0x8898_0000_001b_1f1d),
            ]
        );
    }

    #[test]
    fn ddr_pmp_writes() {
        let (mut port, _spl, trace) = setup(0, Ok(()));
        setup_ddr_pmp(&mut port);
        assert_eq!(
            *trace.borrow(),
            vec![
                Event::CsrWrite(Csr::Pmpaddr0, 0x1fff_ffff),
                Event::CsrWrite(Csr::Pmpaddr3, 0),
                Event::CsrWrite(Csr::Pmpaddr4, 0),
                Event::CsrWrite(Csr::Pmpaddr5, 0),
                Event::CsrWrite(Csr::Pmpcfg0, 0x8898_0000_001b_1f1f),
            ]
        );
    }

    #[test]
    fn ddr_pmp_respects_brom_state() {
        let (mut port, _spl, trace) = setup(0, Ok(()));
        setup_ddr_pmp(&mut port);

        for event in trace.borrow().iter() {
            // The SDRAM entry belongs to the boot ROM
            assert!(!matches!(event, Event::CsrWrite(Csr::Pmpaddr1, _)));

            // The default image must not lock any entry below the boot ROM's own
            if let Event::CsrWrite(Csr::Pmpcfg0, value) = event {
                let image = PmpConfig::from_bits(*value);
                for entry in 0..6 {
                    assert_eq!(image.get_cfg(entry) & pmpcfg::L, 0, "entry {} locked", entry);
                }
            }
        }
    }

    #[test]
    fn performance_csrs_in_vendor_order() {
        let (mut port, _spl, trace) = setup(0, Ok(()));
        cpu_performance_enable(&mut port);
        assert_eq!(
            *trace.borrow(),
            vec![
                Event::CsrWrite(Csr::Mcor, 0x70013),
                Event::CsrWrite(Csr::Mccr2, 0xe0410009),
                Event::CsrWrite(Csr::Mhcr, 0x11ff),
                Event::CsrWrite(Csr::Mxstatus, 0x638000),
                Event::CsrWrite(Csr::Mhint, 0x16e30c),
            ]
        );
    }

    #[test]
    fn init_runs_in_order() {
        let (mut port, mut spl, trace) = setup(0, Ok(()));
        assert_eq!(board_init_f(&mut port, &mut spl), Ok(()));
        assert_eq!(
            *trace.borrow(),
            vec![
                Event::CsrWrite(Csr::Pmpaddr2, 0xfdff_ffff),
                Event::CsrWrite(Csr::Pmpcfg0, 0x8898_0000_001b_1f1d),
                Event::CpuClk(1200),
                Event::EarlyInit,
                Event::ArchCpuInitDm,
                Event::ConsoleInit,
                Event::DdrClk(1600),
                Event::DdrInit,
                Event::ShowSysClk,
                Event::CsrWrite(Csr::Pmpaddr0, 0x1fff_ffff),
                Event::CsrWrite(Csr::Pmpaddr3, 0),
                Event::CsrWrite(Csr::Pmpaddr4, 0),
                Event::CsrWrite(Csr::Pmpaddr5, 0),
                Event::CsrWrite(Csr::Pmpcfg0, 0x8898_0000_001b_1f1f),
            ]
        );
    }

    #[test]
    fn early_init_failure_is_fatal() {
        let (mut port, mut spl, trace) = setup(0, Err(5));
        assert_eq!(
            board_init_f(&mut port, &mut spl),
            Err(SplError::EarlyInit(5))
        );
        assert_eq!(
            SplError::EarlyInit(5).to_string(),
            "spl_early_init() failed: 5"
        );

        // The failure is reported on the console, code included, and nothing runs afterwards
        let events = trace.borrow();
        match events.last() {
            Some(Event::Print(msg)) => assert!(msg.contains('5'), "code missing from {:?}", msg),
            other => panic!("expected an error print, got {:?}", other),
        }
        assert_eq!(events[events.len() - 2], Event::EarlyInit);
        assert!(!events.iter().any(|event| matches!(
            event,
            Event::ArchCpuInitDm | Event::ConsoleInit | Event::DdrClk(_) | Event::DdrInit
        )));
    }

    #[test]
    fn debugger_attached_parks_the_hart() {
        for boot_mode in [0x3, 0x7, 0xf] {
            let (mut port, _spl, trace) = setup(boot_mode, Ok(()));
            let mut order = BootOrder::new();
            board_boot_order(&mut port, &mut order);

            assert!(order.is_empty());
            assert_eq!(
                *trace.borrow(),
                vec![Event::MmioRead(ice::BOOT_MODE_STATUS), Event::Breakpoint]
            );
        }
    }

    #[test]
    fn normal_boot_selects_mmc() {
        // Any status where the two JTAG bits are not both set boots normally
        for boot_mode in [0x0, 0x1, 0x2, 0x8] {
            let (mut port, _spl, trace) = setup(boot_mode, Ok(()));
            let mut order = BootOrder::new();
            board_boot_order(&mut port, &mut order);

            assert_eq!(order.len(), 1);
            assert_eq!(order.get(0), Some(BootDevice::Mmc1));

            let events = trace.borrow();
            assert!(!events.contains(&Event::Breakpoint));
            for (csr, value) in ice::PERF_CSRS {
                let writes = events
                    .iter()
                    .filter(|event| **event == Event::CsrWrite(csr, value))
                    .count();
                assert_eq!(writes, 1, "{:?} written {} times", csr, writes);
            }
        }
    }

    #[test]
    fn boot_order_capacity() {
        let mut order = BootOrder::new();
        assert!(order.is_empty());
        assert_eq!(order.get(0), None);

        for _ in 0..BootOrder::CAPACITY + 2 {
            order.push(BootDevice::Mmc1);
        }
        assert_eq!(order.len(), BootOrder::CAPACITY);
        assert_eq!(order.get(BootOrder::CAPACITY), None);
    }
}
