//! Device drivers used by the boot image
//!
//! Only the console lives here. Every other peripheral belongs to the
//! platform and is reached through the HAL traits.

pub mod uart;
