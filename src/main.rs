//! SPL entry point
//!
//! A thin binary over the board hooks: run `board_init_f`, park the hart on a fatal error, then
//! fill the boot order for the dispatcher. Everything hardware-specific lives in `entry` and
//! only builds for the board target.

// Mark the crate as no_std and no_main on the board target. Host builds keep std so the test
// suite and tooling can run anywhere.
#![cfg_attr(target_arch = "riscv64", no_std)]
#![cfg_attr(target_arch = "riscv64", no_main)]

#[cfg(all(target_arch = "riscv64", not(test)))]
mod entry;

// The SPL is only meaningful on the board; host builds exist to carry the test suite.
#[cfg(not(target_arch = "riscv64"))]
fn main() {}
