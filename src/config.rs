//! Build-Time Configuration
//!
//! # Isolation Level
//! Selected with the `SPM_ISOLATION_LEVEL` environment variable when the
//! crate is compiled (default `1`). Only levels 1 and 2 are supported; any
//! other value fails const evaluation and the build stops.
//!
//! # Features
//! - `memory-protect`: run the isolation memory-protection setup
//! - `core-debug`: report the isolation level during core init

use crate::irq::SecureIrqTable;

/// Partition isolation level.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[repr(u8)]
pub enum IsolationLevel {
    /// SPM and partitions isolated from the non-secure world only.
    Level1 = 1,
    /// Partitions additionally isolated from the SPM.
    Level2 = 2,
}

impl IsolationLevel {
    /// Map a raw level number to a supported level.
    pub const fn from_raw(level: u8) -> Option<Self> {
        match level {
            1 => Some(Self::Level1),
            2 => Some(Self::Level2),
            _ => None,
        }
    }

    /// Parse the textual build setting. `None` means "use the default".
    pub const fn parse(value: Option<&str>) -> Option<Self> {
        match value {
            None => Some(Self::Level1),
            Some(s) => match s.as_bytes() {
                [b'1'] => Some(Self::Level1),
                [b'2'] => Some(Self::Level2),
                _ => None,
            },
        }
    }

    #[inline]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

/// Isolation level this image is built for.
pub const ISOLATION_LEVEL: IsolationLevel =
    match IsolationLevel::parse(option_env!("SPM_ISOLATION_LEVEL")) {
        Some(level) => level,
        None => panic!("Only isolation levels 1 and 2 are supported"),
    };

/// True when the `memory-protect` feature is compiled in.
pub const MEMORY_PROTECT: bool = cfg!(feature = "memory-protect");

/// True when the `core-debug` feature is compiled in.
pub const CORE_DEBUG: bool = cfg!(feature = "core-debug");

/// True when the crate provides the firmware `#[panic_handler]`.
pub const PANIC_HANDLER: bool = cfg!(feature = "panic-handler");

/// Image version reported in the boot banner.
pub mod version {
    const fn parse_u16(s: &str) -> u16 {
        let bytes = s.as_bytes();
        let mut value: u16 = 0;
        let mut i = 0;
        while i < bytes.len() {
            value = value * 10 + (bytes[i] - b'0') as u16;
            i += 1;
        }
        value
    }

    pub const MAJOR: u16 = parse_u16(env!("CARGO_PKG_VERSION_MAJOR"));
    pub const MINOR: u16 = parse_u16(env!("CARGO_PKG_VERSION_MINOR"));
    /// Free-form suffix, e.g. a release tag.
    pub const STRING: &str = match option_env!("SPM_VERSION_STRING") {
        Some(s) => s,
        None => "",
    };
}

/// Configuration of one boot attempt.
///
/// Built once, at build time, and injected into the orchestrator.
#[derive(Clone, Copy, Debug)]
pub struct BootConfig {
    /// Lowest address the boot stack may grow down to.
    pub stack_limit: usize,
    /// Start of the non-secure image (its vector table).
    pub ns_code_start: usize,
    /// Interrupt lines that stay secure.
    pub secure_irqs: SecureIrqTable,
}

impl BootConfig {
    pub const fn new(stack_limit: usize, ns_code_start: usize, secure_irqs: SecureIrqTable) -> Self {
        Self {
            stack_limit,
            ns_code_start,
            secure_irqs,
        }
    }
}
