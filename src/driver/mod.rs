//! # Drivers
//!
//! Device drivers owned by the SPL. This early in the boot the board only needs the console
//! UART; every other device belongs to the framework or a later stage.

pub mod uart;
