//! Boot Status and Error Types
//!
//! Two layers of errors exist:
//! - `PlatformError`: what a platform HAL call reports
//! - `BootFailure`: the single generic failure the boot sequence knows about
//!
//! Every `PlatformError` collapses into `BootFailure` through `From`, so `?`
//! propagates the first failure straight to the orchestrator. Which step
//! failed is logged where it happens and never travels upward.

use core::fmt;

/// Error reported by a platform HAL call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformError {
    /// Generic system error.
    System,
    /// A parameter was rejected by the platform.
    InvalidParam,
    /// The operation is not supported on this platform.
    Unsupported,
    /// Platform-specific HAL status code.
    Hal(i32),
}

impl fmt::Display for PlatformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::System => write!(f, "system error"),
            Self::InvalidParam => write!(f, "invalid parameter"),
            Self::Unsupported => write!(f, "operation not supported"),
            Self::Hal(code) => write!(f, "hal status {}", code),
        }
    }
}

/// Result of a platform HAL call.
pub type HalResult<T = ()> = Result<T, PlatformError>;

/// The generic boot failure.
///
/// Deliberately opaque: it carries no cause. A partially initialised secure
/// processor cannot continue, so the cause has no use in control flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootFailure;

impl fmt::Display for BootFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "generic boot failure")
    }
}

impl From<PlatformError> for BootFailure {
    fn from(_: PlatformError) -> Self {
        BootFailure
    }
}

/// Two-valued outcome of a boot stage: `Ok(())` is success, `Err(BootFailure)`
/// is the generic failure.
pub type BootStatus = Result<(), BootFailure>;

/// Every step of the boot sequence, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum BootStep {
    StackLimit,
    FaultHandlers,
    ResetConfig,
    DebugAuth,
    IsolationInit,
    PlatformInit,
    Coprocessors,
    NsCodeConfig,
    IrqRetarget,
    SecureIrqPriority,
    SecureIrqTarget,
    IrqEnable,
    ServiceDatabase,
    IsolationMemoryProtect,
    SecureExceptionPriority,
    SvcPriority,
    PendSvPriority,
    HandlerMode,
}

impl BootStep {
    /// Short human readable name, used in log records.
    pub const fn name(self) -> &'static str {
        match self {
            Self::StackLimit => "stack limit",
            Self::FaultHandlers => "fault handlers",
            Self::ResetConfig => "system reset config",
            Self::DebugAuth => "debug authentication",
            Self::IsolationInit => "isolation hardware init",
            Self::PlatformInit => "platform init",
            Self::Coprocessors => "coprocessor config",
            Self::NsCodeConfig => "non-secure code config",
            Self::IrqRetarget => "interrupt retarget",
            Self::SecureIrqPriority => "secure irq priority",
            Self::SecureIrqTarget => "secure irq target state",
            Self::IrqEnable => "interrupt enable",
            Self::ServiceDatabase => "spm database init",
            Self::IsolationMemoryProtect => "isolation memory protect",
            Self::SecureExceptionPriority => "secure exception priority",
            Self::SvcPriority => "svcall priority",
            Self::PendSvPriority => "pendsv priority",
            Self::HandlerMode => "handler mode",
        }
    }
}

impl fmt::Display for BootStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Log a failed step and collapse its error into `BootFailure`.
///
/// Meant for `map_err` at the call site so the log record names the step.
pub(crate) fn step_failed(step: BootStep) -> impl FnOnce(PlatformError) -> BootFailure {
    move |err| {
        log::error!("{} failed: {}", step, err);
        BootFailure::from(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_errors_collapse_to_generic_failure() {
        for err in [
            PlatformError::System,
            PlatformError::InvalidParam,
            PlatformError::Unsupported,
            PlatformError::Hal(-3),
        ] {
            assert_eq!(BootFailure::from(err), BootFailure);
        }
    }

    #[test]
    fn test_question_mark_collapses() {
        fn step() -> BootStatus {
            Err(PlatformError::Unsupported)?;
            Ok(())
        }
        assert_eq!(step(), Err(BootFailure));
    }

    #[test]
    fn test_steps_ordered() {
        assert!(BootStep::IsolationInit < BootStep::PlatformInit);
        assert!(BootStep::IrqRetarget < BootStep::SecureIrqPriority);
        assert!(BootStep::IrqEnable < BootStep::SecureExceptionPriority);
        assert!(BootStep::SvcPriority < BootStep::HandlerMode);
    }
}
