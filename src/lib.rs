//! SPM Boot - Secure Partition Manager Boot Orchestrator
//!
//! The first code to run on the secure side of an Armv8-M (TrustZone-M)
//! processor after reset.
//!
//! # Responsibilities
//! - Bring up fault handling, reset behaviour and debug authentication
//! - Program the isolation hardware before any peripheral is touched
//! - Hand every non-secure interrupt line to the non-secure world and keep
//!   the secure peripheral lines secure
//! - Elevate the secure SVCall/PendSV priorities before service dispatch
//! - Enter handler mode, never to return
//!
//! # Failure Policy
//! The sequence is fail-fast. The first failing step ends the boot attempt in
//! the panic handler; there is no retry and no rollback.
//!
//! # Architecture
//! - Target: Armv8-M Mainline, secure state
//! - Platform specifics are supplied through the [`hal`] traits
//! - Processor primitives are supplied through [`arch::Arch`]

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_op_in_unsafe_fn)]

pub mod arch;
pub mod boot;
pub mod config;
pub mod drivers;
pub mod hal;
pub mod irq;
pub mod logger;
pub mod panic;
pub mod status;

pub use arch::{Arch, ExecutionMode};
pub use boot::{
    BootOrchestrator, CoreInitializer, ExceptionPriorityConfigurator, Stage, Terminal,
};
pub use config::{BootConfig, IsolationLevel, ISOLATION_LEVEL};
pub use irq::{IrqConfigEntry, IrqLine, IrqPriority, SecureIrqTable, TargetState};
pub use panic::{Halt, PanicHandler};
pub use status::{BootFailure, BootStatus, BootStep, PlatformError};
