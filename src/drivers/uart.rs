//! CMSDK APB UART Driver
//!
//! Console output for boot diagnostics. Transmit only.
//!
//! # Registers
//! - DATA    0x00: transmit/receive data
//! - STATE   0x04: bit 0 = TX buffer full
//! - CTRL    0x08: bit 0 = TX enable
//! - BAUDDIV 0x10: baud rate divider
//!
//! # Security Considerations
//! - The UART is a peripheral: it must only be initialised after the
//!   isolation hardware has been programmed
//! - Output before `init` is silently dropped

use core::fmt::{self, Write};
use spin::Mutex;

/// Register offsets
mod regs {
    pub const DATA: usize = 0x00;
    pub const STATE: usize = 0x04;
    pub const CTRL: usize = 0x08;
    pub const BAUDDIV: usize = 0x10;
}

/// STATE / CTRL bits
mod flags {
    pub const TX_FULL: u32 = 1 << 0;
    pub const TX_ENABLE: u32 = 1 << 0;
}

/// CMSDK APB UART driver
pub struct Uart {
    base: usize,
    initialized: bool,
}

impl Uart {
    /// Create an uninitialised UART with no register block.
    pub const fn new() -> Self {
        Self {
            base: 0,
            initialized: false,
        }
    }

    /// Bind the UART to its register block and enable the transmitter.
    ///
    /// # Safety
    /// - `base` must be the address of a CMSDK UART register block
    /// - The block must be accessible from the secure state
    pub unsafe fn init(&mut self, base: usize, baud_div: u32) {
        self.base = base;
        // SAFETY: caller guarantees base points at the UART register block
        unsafe {
            core::ptr::write_volatile((base + regs::BAUDDIV) as *mut u32, baud_div);
            core::ptr::write_volatile((base + regs::CTRL) as *mut u32, flags::TX_ENABLE);
        }
        self.initialized = true;
    }

    /// True once `init` has run.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn write_byte(&self, byte: u8) {
        if !self.initialized {
            return;
        }

        // SAFETY: base was validated by the caller of init()
        unsafe {
            let state = (self.base + regs::STATE) as *const u32;
            let data = (self.base + regs::DATA) as *mut u32;

            while core::ptr::read_volatile(state) & flags::TX_FULL != 0 {
                core::hint::spin_loop();
            }

            core::ptr::write_volatile(data, byte as u32);
        }
    }

    /// Write a string, expanding `\n` to `\r\n`
    pub fn write_str(&self, s: &str) {
        for byte in s.bytes() {
            if byte == b'\n' {
                self.write_byte(b'\r');
            }
            self.write_byte(byte);
        }
    }
}

impl Default for Uart {
    fn default() -> Self {
        Self::new()
    }
}

impl Write for Uart {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        Uart::write_str(self, s);
        Ok(())
    }
}

/// Boot console
pub static CONSOLE: Mutex<Uart> = Mutex::new(Uart::new());

/// Print to the boot console
#[macro_export]
macro_rules! sprint {
    ($($arg:tt)*) => {{
        use core::fmt::Write;
        let mut uart = $crate::drivers::uart::CONSOLE.lock();
        let _ = write!(uart, $($arg)*);
    }};
}

/// Print a line to the boot console
#[macro_export]
macro_rules! sprintln {
    () => {
        $crate::sprint!("\n")
    };
    ($($arg:tt)*) => {{
        $crate::sprint!($($arg)*);
        $crate::sprint!("\n");
    }};
}
