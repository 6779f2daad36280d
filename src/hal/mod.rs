//! Platform Abstraction Layer
//!
//! The boot sequence never touches platform registers itself. Each hardware
//! concern is a separate capability trait so a platform (or a test double)
//! can supply it independently.
//!
//! # Contract
//! - Every call is synchronous
//! - Every call is idempotent
//! - Failure is reported through `HalResult`; the caller decides what it means.
//!   Boot data validation is the exception and handles its own failure

use crate::irq::{IrqLine, IrqPriority, TargetState};

pub use crate::status::{HalResult, PlatformError};

/// Fault and reset behaviour of the processor.
pub trait FaultControl {
    /// Enable the configurable fault handlers (MemManage, BusFault,
    /// UsageFault, SecureFault).
    fn enable_fault_handlers(&mut self) -> HalResult;

    /// Configure how system reset requests are handled.
    fn system_reset_cfg(&mut self) -> HalResult;
}

/// Debug authentication.
pub trait DebugControl {
    fn init_debug(&mut self) -> HalResult;
}

/// Isolation hardware (SAU, IDAU, MPC, PPC, MPU).
pub trait IsolationControl {
    /// Program the security attribution of memory and peripherals.
    ///
    /// Must run before any peripheral is accessed.
    fn init_isolation_hw(&mut self) -> HalResult;

    /// Set up memory protection between partitions.
    ///
    /// Only called when the `memory-protect` feature is enabled.
    fn setup_isolation_hw(&mut self) -> HalResult;
}

/// Platform specific bring-up.
///
/// The first step allowed to touch peripherals, so the usual place to bring
/// up the console with [`logger::init_with_console`](crate::logger::init_with_console).
pub trait PlatformControl {
    fn platform_init(&mut self) -> HalResult;
}

/// Interrupt controller (NVIC) configuration.
pub trait IrqControl {
    /// Retarget every interrupt line to the non-secure state, except the
    /// lines of secure peripherals.
    fn nvic_interrupt_target_state_cfg(&mut self) -> HalResult;

    /// Set the priority of a secure line or exception.
    fn set_secure_irq_priority(&mut self, line: IrqLine, priority: IrqPriority) -> HalResult;

    /// Request a target state for `line` and return the state the hardware
    /// actually applied.
    fn set_irq_target_state(&mut self, line: IrqLine, state: TargetState) -> TargetState;

    /// Enable secure peripheral interrupts at the controller.
    fn nvic_interrupt_enable(&mut self) -> HalResult;
}

/// Integrity check of the data handed over by the bootloader.
pub trait BootDataValidator {
    /// Check the bootloader hand-over data.
    ///
    /// Returns nothing: the validator owns its failure handling and marks
    /// invalid data itself. Boot continues either way.
    fn validate_boot_data(&mut self);
}

/// Secure partition database of the service dispatch layer.
pub trait ServiceDatabase {
    fn init_db(&mut self) -> HalResult;
}

/// Full platform capability set needed by the core initializer.
pub trait PlatformHal:
    FaultControl + DebugControl + IsolationControl + PlatformControl + IrqControl
{
}

impl<T> PlatformHal for T where
    T: FaultControl + DebugControl + IsolationControl + PlatformControl + IrqControl
{
}
