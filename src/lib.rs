//! ICE EVB SPL board support
//!
//! Board-level bring-up for the T-HEAD C910 on the ICE evaluation board: PMP guards over the
//! peripheral and DRAM windows, clock and DRAM initialization sequencing, and the boot-order
//! decision that either selects the MMC boot device or parks the hart for a debugger.
//!
//! The hooks in [`spl`] are the board's contract with the SPL dispatcher; everything below them
//! goes through the [`arch::SocPort`] seam so the register traffic can be checked on the host.

// Mark the crate as no_std, but only when not running tests.
// We need std to be able to run tests in user-space on the host architecture.
#![cfg_attr(not(test), no_std)]

pub mod arch;
pub mod config;
pub mod driver;
pub mod logger;
pub mod platform;
pub mod spl;
