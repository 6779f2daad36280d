//! Secure Exception Priorities
//!
//! SVCall is the entry point of every secure service request. Once PRIS is
//! set and SVCall holds priority 0, a secure call that has started cannot be
//! preempted by any non-secure interrupt.

use crate::arch::Arch;
use crate::hal::IrqControl;
use crate::irq::{IrqLine, IrqPriority};
use crate::status::{step_failed, BootStatus, BootStep};

/// Elevates and fixes the SVCall and PendSV priorities.
#[derive(Clone, Copy, Debug, Default)]
pub struct ExceptionPriorityConfigurator;

impl ExceptionPriorityConfigurator {
    pub const fn new() -> Self {
        Self
    }

    pub fn configure<P, A>(&self, platform: &mut P, arch: &mut A) -> BootStatus
    where
        P: IrqControl,
        A: Arch,
    {
        arch.prioritize_secure_exceptions();

        platform
            .set_secure_irq_priority(IrqLine::SVCALL, IrqPriority::HIGHEST)
            .map_err(step_failed(BootStep::SvcPriority))?;

        arch.set_pendsv_priority();

        Ok(())
    }
}
