//! Logger implementation for the `log` crate.
//!
//! Records go to the boot console as `[LEVEL target] message`. The level is
//! fixed at build time through the `SPM_LOG` environment variable
//! (`error`, `warn`, `info`, `debug`, `trace`; default `info`).

use core::fmt;

use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

use crate::drivers::uart::CONSOLE;
use crate::sprintln;

pub struct SpmLogger;

static LOGGER: SpmLogger = SpmLogger;

/// ANSI color per level.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColorCode {
    Red = 31,
    Yellow = 33,
    Blue = 34,
    Cyan = 36,
    BrightBlack = 90,
}

impl fmt::Display for ColorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\u{1B}[1;{}m", *self as u8)
    }
}

fn color(level: Level) -> ColorCode {
    match level {
        Level::Error => ColorCode::Red,
        Level::Warn => ColorCode::Yellow,
        Level::Info => ColorCode::Blue,
        Level::Debug => ColorCode::Cyan,
        Level::Trace => ColorCode::BrightBlack,
    }
}

/// Map the build setting to a level filter.
pub fn level_filter(setting: Option<&str>) -> LevelFilter {
    match setting {
        Some("off") => LevelFilter::Off,
        Some("error") => LevelFilter::Error,
        Some("warn") => LevelFilter::Warn,
        Some("debug") => LevelFilter::Debug,
        Some("trace") => LevelFilter::Trace,
        _ => LevelFilter::Info,
    }
}

impl Log for SpmLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        sprintln!(
            "{}[{} {}] {}\u{1B}[0m",
            color(record.level()),
            record.level(),
            record.target(),
            record.args()
        );
    }

    fn flush(&self) {}
}

/// Install the logger.
///
/// Must run after the console UART has been initialised, which in turn
/// must wait for the isolation hardware.
pub fn init() -> Result<(), SetLoggerError> {
    log::set_logger(&LOGGER)?;
    log::set_max_level(level_filter(option_env!("SPM_LOG")));
    Ok(())
}

/// Bring up the console UART, then install the logger.
///
/// Meant for the platform's `platform_init`, the first step allowed to touch
/// a peripheral.
///
/// # Safety
/// Same contract as [`Uart::init`](crate::drivers::uart::Uart::init).
pub unsafe fn init_with_console(base: usize, baud_div: u32) -> Result<(), SetLoggerError> {
    // SAFETY: forwarded to the caller
    unsafe { CONSOLE.lock().init(base, baud_div) };
    init()
}
