//! Platform abstraction
//!
//! One seam for everything board-global: the console sink the logger prints through and the
//! terminal failure path. The only platform today is the ICE EVB.

pub mod ice;

use core::fmt;

use log::Level;

use crate::logger;

/// Export the current platform.
pub type Plat = ice::IcePlatform;

pub trait Platform {
    fn name() -> &'static str;
    fn init();
    fn debug_print(level: Level, args: fmt::Arguments);
    fn exit_failure() -> !;
}

/// Bring up the board console and the logger.
pub fn init() {
    Plat::init();
    logger::init();
}
