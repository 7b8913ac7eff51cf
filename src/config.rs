//! Configuration constants
//!
//! The constants in this file are parsed from environment variables at build time. A board
//! configuration is baked into the binary; there is nowhere to read one from at run time this
//! early in the boot.

use crate::platform::ice::BoardVariant;

// ———————————————————————————— Parsing Helpers ————————————————————————————— //

/// Check at compile time if an environment variable is set to a truthy value.
const fn is_enabled(env: Option<&'static str>) -> bool {
    match env {
        Some(env) => matches!(env.as_bytes(), b"true" | b"1"),
        None => false,
    }
}

// ———————————————————————— Configuration Parameters ———————————————————————— //

/// The desired log level.
pub const LOG_LEVEL: Option<&'static str> = option_env!("ICE_SPL_LOG_LEVEL");

/// If colors in logs are enabled.
pub const LOG_COLOR: bool = is_enabled(option_env!("ICE_SPL_LOG_COLOR"));

/// The board revision to build for.
///
/// `ice-rvb` selects the PMP image that locks the DRAM entries; every other value, including the
/// default, selects the generic ICE image.
pub const BOARD_VARIANT: BoardVariant = match option_env!("ICE_SPL_BOARD_VARIANT") {
    Some(s) => match s.as_bytes() {
        b"ice-rvb" | b"rvb" => BoardVariant::IceRvb,
        _ => BoardVariant::Ice,
    },
    None => BoardVariant::Ice,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enabled_flags() {
        assert!(is_enabled(Some("true")));
        assert!(is_enabled(Some("1")));
        assert!(!is_enabled(Some("false")));
        assert!(!is_enabled(Some("0")));
        assert!(!is_enabled(None));
    }

    #[test]
    fn default_variant_is_generic() {
        assert_eq!(BOARD_VARIANT, BoardVariant::Ice);
    }
}
