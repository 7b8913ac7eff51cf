//! Structured logging implementation

use core::sync::atomic::{AtomicBool, Ordering};

use log::{Level, LevelFilter, Metadata, Record};

use crate::config;
use crate::platform::{Plat, Platform};

// ————————————————————————————————— Logger ————————————————————————————————— //

pub struct Logger {}

impl Logger {
    const GLOBAL_LOG_LEVEL: LevelFilter = match config::LOG_LEVEL {
        Some(s) => match s.as_bytes() {
            b"trace" => LevelFilter::Trace,
            b"debug" => LevelFilter::Debug,
            b"info" => LevelFilter::Info,
            b"warn" => LevelFilter::Warn,
            b"error" => LevelFilter::Error,
            b"off" => LevelFilter::Off,
            _ => LevelFilter::Info,
        },
        _ => LevelFilter::Info,
    };
}

impl log::Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= Self::GLOBAL_LOG_LEVEL
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        Plat::debug_print(
            record.level(),
            format_args!(
                "[{} | {}] {}\n",
                level_display(record.level()),
                record.target(),
                record.args()
            ),
        );
    }

    fn flush(&self) {}
}

pub fn init() {
    static IS_INITIALIZED: AtomicBool = AtomicBool::new(false);

    match IS_INITIALIZED.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst) {
        Ok(_) => {
            log::set_logger(&Logger {}).unwrap();
            log::set_max_level(Logger::GLOBAL_LOG_LEVEL);
        }
        Err(_) => {
            log::warn!("Logger is already initialized, skipping init");
        }
    };
}

// ————————————————————————————————— Utils —————————————————————————————————— //

fn level_display(level: Level) -> &'static str {
    if config::LOG_COLOR {
        // We log with colors, using ANSI escape sequences
        match level {
            Level::Error => "\x1b[31;1mError\x1b[0m",
            Level::Warn => "\x1b[33;1mWarn\x1b[0m ",
            Level::Info => "\x1b[32;1mInfo\x1b[0m ",
            Level::Debug => "\x1b[34;1mDebug\x1b[0m",
            Level::Trace => "\x1b[35;1mTrace\x1b[0m",
        }
    } else {
        match level {
            Level::Error => "Error",
            Level::Warn => "Warn ",
            Level::Info => "Info ",
            Level::Debug => "Debug",
            Level::Trace => "Trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_level_is_info() {
        // Built without an explicit level the logger keeps info and above
        assert_eq!(Logger::GLOBAL_LOG_LEVEL, LevelFilter::Info);
    }

    #[test]
    fn plain_levels_align() {
        // Without colors every level tag has the same width, keeping columns aligned
        for level in [
            Level::Error,
            Level::Warn,
            Level::Info,
            Level::Debug,
            Level::Trace,
        ] {
            assert_eq!(level_display(level).len(), 5);
        }
    }
}
