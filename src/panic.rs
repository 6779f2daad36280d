//! Panic Handling
//!
//! A failed boot makes no further progress. The default handler parks the
//! core in a wait-for-interrupt loop; platforms may supply their own (for
//! example one that requests a system reset) as long as it never returns.

/// Terminal sink of a failed boot.
pub trait PanicHandler {
    fn panic(&self) -> !;
}

/// Halts the core forever.
#[derive(Clone, Copy, Debug, Default)]
pub struct Halt;

impl PanicHandler for Halt {
    fn panic(&self) -> ! {
        log::error!("Secure boot failed, system halted");
        halt()
    }
}

/// Halt the CPU in a low-power state
pub fn halt() -> ! {
    loop {
        #[cfg(all(target_arch = "arm", target_os = "none"))]
        // SAFETY: WFI is always safe to execute
        unsafe {
            core::arch::asm!("wfi", options(nomem, nostack));
        }

        #[cfg(not(all(target_arch = "arm", target_os = "none")))]
        core::hint::spin_loop();
    }
}

/// Rust panics in the secure image end the same way a failed boot does.
///
/// Opt-in through the `panic-handler` feature. Firmware that routes Rust
/// panics into its own [`PanicHandler`] (a reset, say) defines the lang item
/// itself and leaves the feature off.
#[cfg(all(feature = "panic-handler", not(test), target_os = "none"))]
#[panic_handler]
fn panic(info: &core::panic::PanicInfo) -> ! {
    crate::sprintln!();
    crate::sprintln!("!!! SPM PANIC !!!");

    if let Some(location) = info.location() {
        crate::sprintln!(
            "Location: {}:{}:{}",
            location.file(),
            location.line(),
            location.column()
        );
    }

    crate::sprintln!("Message: {}", info.message());
    crate::sprintln!("System halted.");

    halt()
}
