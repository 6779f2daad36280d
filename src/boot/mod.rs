//! Secure Boot Sequence
//!
//! # Components
//! - `CoreInitializer`: hardware bring-up
//! - `ExceptionPriorityConfigurator`: secure SVCall/PendSV priorities
//! - `BootOrchestrator`: the state machine tying both to the SPM database,
//!   the optional memory protection and the final handler mode transition
//!
//! # Ordering Invariants
//! - Isolation hardware is programmed before any peripheral access
//! - All lines go non-secure before any secure line is configured
//! - Exception priorities are raised after interrupt enable and before any
//!   secure service dispatch
//! - The first failure ends the sequence

mod core_init;
mod orchestrator;
mod priorities;

#[cfg(test)]
pub(crate) mod testing;

pub use core_init::CoreInitializer;
pub use orchestrator::{boot, BootOrchestrator, Stage, Terminal, Transition};
pub use priorities::ExceptionPriorityConfigurator;
