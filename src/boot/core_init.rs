//! Core Hardware Bring-Up
//!
//! Runs the hardware initialisation sub-sequence in its fixed order. The
//! first failing HAL call ends the sequence with the generic failure.
//!
//! # Ordering
//! 1. Fault handlers, reset config, debug authentication
//! 2. Isolation hardware (before any peripheral access)
//! 3. Platform init, coprocessors, boot data (outcome owned by the
//!    validator), non-secure code
//! 4. Every line to non-secure, then each secure line back to secure
//! 5. Interrupt enable

use log::{error, info};

use crate::arch::Arch;
use crate::config::{CORE_DEBUG, ISOLATION_LEVEL};
use crate::hal::{BootDataValidator, PlatformHal};
use crate::irq::{IrqConfigEntry, SecureIrqTable, TargetState};
use crate::status::{step_failed, BootFailure, BootStatus, BootStep};

/// Brings the processor, interrupt controller and isolation hardware into
/// their secure boot configuration.
#[derive(Clone, Copy, Debug)]
pub struct CoreInitializer {
    secure_irqs: SecureIrqTable,
    ns_code_start: usize,
}

impl CoreInitializer {
    pub const fn new(secure_irqs: SecureIrqTable, ns_code_start: usize) -> Self {
        Self {
            secure_irqs,
            ns_code_start,
        }
    }

    /// Secure interrupt lines configured by `init`.
    pub const fn secure_irqs(&self) -> &SecureIrqTable {
        &self.secure_irqs
    }

    /// Run the bring-up sequence.
    pub fn init<P, A>(&self, platform: &mut P, arch: &mut A) -> BootStatus
    where
        P: PlatformHal + BootDataValidator,
        A: Arch,
    {
        platform
            .enable_fault_handlers()
            .map_err(step_failed(BootStep::FaultHandlers))?;

        platform
            .system_reset_cfg()
            .map_err(step_failed(BootStep::ResetConfig))?;

        platform
            .init_debug()
            .map_err(step_failed(BootStep::DebugAuth))?;

        // No peripheral access before the isolation hardware is programmed
        platform
            .init_isolation_hw()
            .map_err(step_failed(BootStep::IsolationInit))?;

        platform
            .platform_init()
            .map_err(step_failed(BootStep::PlatformInit))?;

        arch.configure_coprocessors();

        info!("[Sec Thread] Secure image initializing!");
        if CORE_DEBUG {
            info!("Isolation level is: {}", ISOLATION_LEVEL.as_u8());
        }

        platform.validate_boot_data();

        arch.configure_ns_code(self.ns_code_start);

        platform
            .nvic_interrupt_target_state_cfg()
            .map_err(step_failed(BootStep::IrqRetarget))?;

        for entry in self.secure_irqs.iter() {
            Self::configure_secure_irq(platform, entry)?;
        }

        platform
            .nvic_interrupt_enable()
            .map_err(step_failed(BootStep::IrqEnable))?;

        Ok(())
    }

    /// Priority first, then target state, then check what the hardware
    /// actually applied.
    fn configure_secure_irq<P: PlatformHal>(platform: &mut P, entry: &IrqConfigEntry) -> BootStatus {
        platform
            .set_secure_irq_priority(entry.line, entry.priority)
            .map_err(step_failed(BootStep::SecureIrqPriority))?;

        let applied = platform.set_irq_target_state(entry.line, TargetState::Secure);
        if applied != TargetState::Secure {
            error!(
                "{} failed: {} is {} after secure retarget",
                BootStep::SecureIrqTarget,
                entry.line,
                applied
            );
            return Err(BootFailure);
        }

        Ok(())
    }
}
