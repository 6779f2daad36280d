//! Interrupt Line Types
//!
//! Interrupt numbers follow the CMSIS convention: external lines are
//! non-negative, system exceptions are negative (SVCall = -5, PendSV = -2).
//!
//! # Secure IRQ Table
//! The table of lines owned by secure partitions is fixed at build time and
//! injected into the core initializer. Its order is the configuration order;
//! it is never sorted by priority.

use core::fmt;

/// An interrupt line (CMSIS `IRQn_Type`).
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
#[repr(transparent)]
pub struct IrqLine(i16);

impl IrqLine {
    /// Non-maskable interrupt.
    pub const NMI: Self = Self(-14);
    /// Hard fault.
    pub const HARD_FAULT: Self = Self(-13);
    /// Memory management fault.
    pub const MEM_MANAGE: Self = Self(-12);
    /// Bus fault.
    pub const BUS_FAULT: Self = Self(-11);
    /// Usage fault.
    pub const USAGE_FAULT: Self = Self(-10);
    /// Secure fault.
    pub const SECURE_FAULT: Self = Self(-9);
    /// Supervisor call.
    pub const SVCALL: Self = Self(-5);
    /// Debug monitor.
    pub const DEBUG_MONITOR: Self = Self(-4);
    /// Pendable service call.
    pub const PENDSV: Self = Self(-2);
    /// System tick.
    pub const SYSTICK: Self = Self(-1);

    /// Highest external line number the Armv8-M NVIC can implement.
    pub const MAX_EXTERNAL: u16 = 495;

    /// Create an external interrupt line.
    ///
    /// # Panics
    /// If `n` is above [`MAX_EXTERNAL`](Self::MAX_EXTERNAL). In a `static`
    /// table this is a build error.
    #[inline]
    pub const fn external(n: u16) -> Self {
        assert!(n <= Self::MAX_EXTERNAL, "external line out of NVIC range");
        Self(n as i16)
    }

    /// Create a line from its raw CMSIS number.
    #[inline]
    pub const fn from_raw(n: i16) -> Self {
        Self(n)
    }

    /// Raw CMSIS number.
    #[inline]
    pub const fn raw(self) -> i16 {
        self.0
    }

    /// True for processor exceptions (negative numbers).
    #[inline]
    pub const fn is_system_exception(self) -> bool {
        self.0 < 0
    }
}

impl fmt::Display for IrqLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IRQ{}", self.0)
    }
}

/// Interrupt priority ordinal. Lower is more urgent; 0 is the highest.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
#[repr(transparent)]
pub struct IrqPriority(u8);

impl IrqPriority {
    /// Highest configurable priority.
    pub const HIGHEST: Self = Self(0);

    #[inline]
    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    #[inline]
    pub const fn value(self) -> u8 {
        self.0
    }
}

/// Security domain an interrupt line is delivered to.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TargetState {
    Secure,
    NonSecure,
}

impl fmt::Display for TargetState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Secure => write!(f, "secure"),
            Self::NonSecure => write!(f, "non-secure"),
        }
    }
}

/// One secure interrupt line and the priority it is configured with.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct IrqConfigEntry {
    pub line: IrqLine,
    pub priority: IrqPriority,
}

impl IrqConfigEntry {
    pub const fn new(line: IrqLine, priority: IrqPriority) -> Self {
        Self { line, priority }
    }
}

/// Ordered, immutable list of interrupt lines that stay owned by the secure
/// side.
#[derive(Clone, Copy, Debug)]
pub struct SecureIrqTable {
    entries: &'static [IrqConfigEntry],
}

impl SecureIrqTable {
    /// Table with no secure interrupt lines.
    pub const EMPTY: Self = Self { entries: &[] };

    /// Wrap a build-time table.
    pub const fn new(entries: &'static [IrqConfigEntry]) -> Self {
        Self { entries }
    }

    /// Number of entries.
    #[inline]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no line is reserved for the secure side.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in configuration order.
    #[inline]
    pub fn iter(&self) -> core::slice::Iter<'static, IrqConfigEntry> {
        self.entries.iter()
    }

    /// True if `line` is reserved for the secure side.
    pub fn contains(&self, line: IrqLine) -> bool {
        self.entries.iter().any(|e| e.line == line)
    }
}

impl IntoIterator for SecureIrqTable {
    type Item = &'static IrqConfigEntry;
    type IntoIter = core::slice::Iter<'static, IrqConfigEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
