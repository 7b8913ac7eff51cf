//! Physical Memory Protection
//!
//! NAPOT address encoding and the `pmpcfg0` register image programmed by the boot flow. The board
//! only uses the first eight PMP entries, so a single configuration register covers all of them.

// ——————————————————————————— PMP Configuration ———————————————————————————— //

/// PMP Configuration
///
/// Hold constants for the per-entry octets of the pmpcfg CSRs.
pub mod pmpcfg {
    /// Read access
    pub const R: u8 = 0b00000001;
    /// Write access
    pub const W: u8 = 0b00000010;
    /// Execute access
    pub const X: u8 = 0b00000100;
    /// Read, Write, and Execute access
    pub const RWX: u8 = R | W | X;

    /// Address is Top Of Range (TOR)
    pub const TOR: u8 = 0b00001000;
    /// Naturally aligned four-byte region
    pub const NA4: u8 = 0b00010000;
    /// Naturally aligned power of two
    pub const NAPOT: u8 = 0b00011000;
    /// Bit mask for the A attributes of pmpcfg
    pub const A_MASK: u8 = 0b00011000;

    /// Locked
    pub const L: u8 = 0b10000000;

    /// An inactive entry, ignored by the matching rules
    pub const INACTIVE: u8 = 0b00000000;
}

// —————————————————————————————— PMP Address ——————————————————————————————— //

/// Build a valid NAPOT pmpaddr value from a provided start and size.
///
/// This function checks for a minimum size of 8 and for proper alignment. If the requirements are
/// not satisfied None is returned instead.
pub const fn build_napot(start: usize, size: usize) -> Option<usize> {
    if size < 8 {
        // Minimum NAPOT size is 8
        return None;
    }
    if size & (size - 1) != 0 {
        // Size is not a power of 2
        return None;
    }
    if start & (size - 1) != 0 {
        // Start does not have an alignment of at least 'size'.
        return None;
    }

    Some((start >> 2) | ((size - 1) >> 3))
}

// ————————————————————————— Configuration Register ————————————————————————— //

/// An image of a `pmpcfg` register, eight entry octets packed from the low end.
///
/// The board inherits its configuration values from the vendor boot flow as whole-register
/// constants; building them octet by octet keeps the per-entry permissions readable, and the raw
/// values are pinned by tests.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct PmpConfig(usize);

impl PmpConfig {
    pub const EMPTY: PmpConfig = PmpConfig(0);

    pub const fn from_bits(bits: usize) -> Self {
        PmpConfig(bits)
    }

    /// Returns the image with the octet of entry `idx` replaced by `cfg`.
    pub const fn set(self, idx: usize, cfg: u8) -> Self {
        let shift = idx * 8;
        // Clear the old octet before or-ing in the new one
        let cleared = self.0 & !(0xff << shift);
        PmpConfig(cleared | ((cfg as usize) << shift))
    }

    /// The configuration octet of entry `idx`.
    pub const fn get_cfg(self, idx: usize) -> u8 {
        (self.0 >> (idx * 8)) as u8
    }

    /// The raw register value.
    pub const fn bits(self) -> usize {
        self.0
    }
}

// ————————————————————————————————— Tests —————————————————————————————————— //
