//! Architecture Layer
//!
//! Processor primitives used by the boot sequence. None of them can fail in
//! software: they either take effect or trap in hardware.
//!
//! # Execution Modes
//! - Thread: where the boot sequence runs after reset
//! - Handler: entered once, at the end of boot, for service dispatch

pub mod armv8m;

pub use armv8m::Armv8m;

/// Processor execution mode.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ExecutionMode {
    Thread,
    Handler,
}

/// Architecture primitives the boot sequence relies on.
pub trait Arch {
    /// Set the lower bound of the main stack.
    fn set_stack_limit(&mut self, limit: usize);

    /// Configure architecture specific coprocessors (FPU access).
    fn configure_coprocessors(&mut self);

    /// Point the non-secure world at its image: vector table and initial
    /// main stack pointer.
    fn configure_ns_code(&mut self, ns_code_start: usize);

    /// Raise secure exception priorities above every non-secure priority.
    fn prioritize_secure_exceptions(&mut self);

    /// Give PendSV its secure priority.
    fn set_pendsv_priority(&mut self);

    /// Leave thread mode for good and continue SPM initialisation in handler
    /// mode.
    fn enter_handler_mode(&mut self) -> !;
}
