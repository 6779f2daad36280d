//! Recording test doubles for the platform, architecture and panic layers.
//!
//! All doubles share one call log so tests can assert on the global order of
//! hardware operations.

use std::cell::RefCell;
use std::rc::Rc;
use std::vec::Vec;

use crate::arch::Arch;
use crate::config::BootConfig;
use crate::hal::{
    BootDataValidator, DebugControl, FaultControl, IrqControl, IsolationControl,
    PlatformControl, ServiceDatabase,
};
use crate::irq::{IrqConfigEntry, IrqLine, IrqPriority, SecureIrqTable, TargetState};
use crate::panic::PanicHandler;
use crate::status::{HalResult, PlatformError};

/// One observable operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    StackLimit(usize),
    FaultHandlers,
    ResetCfg,
    InitDebug,
    InitIsolation,
    PlatformInit,
    Coprocessors,
    ValidateBootData,
    NsCode(usize),
    IrqRetarget,
    IrqPriority(IrqLine, IrqPriority),
    IrqTarget(IrqLine, TargetState),
    IrqEnable,
    DbInit,
    SetupIsolation,
    PrioritizeSecure,
    PendSv,
    HandlerMode,
    Panic,
}

pub type CallLog = Rc<RefCell<Vec<Call>>>;

pub const STACK_LIMIT: usize = 0x3000_0400;
pub const NS_CODE_START: usize = 0x0020_0000;

pub static THREE_IRQS: [IrqConfigEntry; 3] = [
    IrqConfigEntry::new(IrqLine::external(12), IrqPriority::new(2)),
    IrqConfigEntry::new(IrqLine::external(5), IrqPriority::new(1)),
    IrqConfigEntry::new(IrqLine::external(33), IrqPriority::new(3)),
];

pub fn config() -> BootConfig {
    BootConfig::new(STACK_LIMIT, NS_CODE_START, SecureIrqTable::new(&THREE_IRQS))
}

/// Platform double. Every call succeeds unless a failure was injected.
#[derive(Debug)]
pub struct FakePlatform {
    log: CallLog,
    fail: Option<Call>,
    echo: Option<(IrqLine, TargetState)>,
    boot_data_rejected: bool,
}

impl FakePlatform {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            fail: None,
            echo: None,
            boot_data_rejected: false,
        }
    }

    /// Make `call` report a failure. For boot data validation the failure
    /// is only flagged, as a real validator would.
    pub fn fail_on(mut self, call: Call) -> Self {
        self.fail = Some(call);
        self
    }

    /// Make the target-state setter echo `state` for `line`.
    pub fn echo(mut self, line: IrqLine, state: TargetState) -> Self {
        self.echo = Some((line, state));
        self
    }

    /// True if the boot data validator flagged the hand-over data.
    pub fn boot_data_rejected(&self) -> bool {
        self.boot_data_rejected
    }

    fn record(&self, call: Call) -> HalResult {
        self.log.borrow_mut().push(call);
        if self.fail == Some(call) {
            Err(PlatformError::System)
        } else {
            Ok(())
        }
    }
}

impl FaultControl for FakePlatform {
    fn enable_fault_handlers(&mut self) -> HalResult {
        self.record(Call::FaultHandlers)
    }

    fn system_reset_cfg(&mut self) -> HalResult {
        self.record(Call::ResetCfg)
    }
}

impl DebugControl for FakePlatform {
    fn init_debug(&mut self) -> HalResult {
        self.record(Call::InitDebug)
    }
}

impl IsolationControl for FakePlatform {
    fn init_isolation_hw(&mut self) -> HalResult {
        self.record(Call::InitIsolation)
    }

    fn setup_isolation_hw(&mut self) -> HalResult {
        self.record(Call::SetupIsolation)
    }
}

impl PlatformControl for FakePlatform {
    fn platform_init(&mut self) -> HalResult {
        self.record(Call::PlatformInit)
    }
}

impl IrqControl for FakePlatform {
    fn nvic_interrupt_target_state_cfg(&mut self) -> HalResult {
        self.record(Call::IrqRetarget)
    }

    fn set_secure_irq_priority(&mut self, line: IrqLine, priority: IrqPriority) -> HalResult {
        self.record(Call::IrqPriority(line, priority))
    }

    fn set_irq_target_state(&mut self, line: IrqLine, state: TargetState) -> TargetState {
        let _ = self.record(Call::IrqTarget(line, state));
        match self.echo {
            Some((echo_line, applied)) if echo_line == line => applied,
            _ => state,
        }
    }

    fn nvic_interrupt_enable(&mut self) -> HalResult {
        self.record(Call::IrqEnable)
    }
}

impl BootDataValidator for FakePlatform {
    fn validate_boot_data(&mut self) {
        if self.record(Call::ValidateBootData).is_err() {
            self.boot_data_rejected = true;
        }
    }
}

impl ServiceDatabase for FakePlatform {
    fn init_db(&mut self) -> HalResult {
        self.record(Call::DbInit)
    }
}

/// Architecture double. Entering handler mode unwinds so `run()` can be
/// observed from a test.
#[derive(Debug)]
pub struct FakeArch {
    log: CallLog,
}

impl FakeArch {
    pub fn new(log: CallLog) -> Self {
        Self { log }
    }

    fn record(&self, call: Call) {
        self.log.borrow_mut().push(call);
    }
}

impl Arch for FakeArch {
    fn set_stack_limit(&mut self, limit: usize) {
        self.record(Call::StackLimit(limit));
    }

    fn configure_coprocessors(&mut self) {
        self.record(Call::Coprocessors);
    }

    fn configure_ns_code(&mut self, ns_code_start: usize) {
        self.record(Call::NsCode(ns_code_start));
    }

    fn prioritize_secure_exceptions(&mut self) {
        self.record(Call::PrioritizeSecure);
    }

    fn set_pendsv_priority(&mut self) {
        self.record(Call::PendSv);
    }

    fn enter_handler_mode(&mut self) -> ! {
        self.record(Call::HandlerMode);
        std::panic!("entered handler mode");
    }
}

/// Panic handler double. Records the call, then unwinds.
#[derive(Debug)]
pub struct FakePanic {
    log: CallLog,
}

impl FakePanic {
    pub fn new(log: CallLog) -> Self {
        Self { log }
    }
}

impl PanicHandler for FakePanic {
    fn panic(&self) -> ! {
        self.log.borrow_mut().push(Call::Panic);
        std::panic!("boot panic");
    }
}

pub fn new_log() -> CallLog {
    Rc::new(RefCell::new(Vec::new()))
}

/// Calls made by a fully successful core initialisation with `THREE_IRQS`.
pub fn core_init_calls() -> Vec<Call> {
    let mut calls = vec![
        Call::FaultHandlers,
        Call::ResetCfg,
        Call::InitDebug,
        Call::InitIsolation,
        Call::PlatformInit,
        Call::Coprocessors,
        Call::ValidateBootData,
        Call::NsCode(NS_CODE_START),
        Call::IrqRetarget,
    ];
    for entry in THREE_IRQS.iter() {
        calls.push(Call::IrqPriority(entry.line, entry.priority));
        calls.push(Call::IrqTarget(entry.line, TargetState::Secure));
    }
    calls.push(Call::IrqEnable);
    calls
}

/// Calls made by the exception priority configurator.
pub fn exception_priority_calls() -> Vec<Call> {
    vec![
        Call::PrioritizeSecure,
        Call::IrqPriority(IrqLine::SVCALL, IrqPriority::HIGHEST),
        Call::PendSv,
    ]
}

/// Position of `call` in `log`, if it was made.
pub fn position(log: &[Call], call: Call) -> Option<usize> {
    log.iter().position(|c| *c == call)
}
