//! Boot State Machine
//!
//! ```text
//!  Reset ──stack limit──▶ StackBounded ──core init──▶ CoreReady
//!    ──db init──▶ DatabaseReady ──memory protect?──▶ Protected
//!    ──exception priorities──▶ Prioritized ──▶ [HandlerMode]
//!
//!  any failure ──▶ [Panic]
//! ```
//!
//! Both terminal states end the machine: once reached, stepping again
//! executes nothing. `run` maps them onto the two non-returning exits, the
//! handler mode transition and the panic handler.

use log::{error, info};

use crate::arch::{Arch, ExecutionMode};
use crate::config::{version, BootConfig, MEMORY_PROTECT};
use crate::hal::{BootDataValidator, PlatformHal, ServiceDatabase};
use crate::panic::PanicHandler;
use crate::status::{step_failed, BootStatus, BootStep};

use super::core_init::CoreInitializer;
use super::priorities::ExceptionPriorityConfigurator;

/// Intermediate stage, named after what has been achieved so far.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Stage {
    Reset,
    StackBounded,
    CoreReady,
    DatabaseReady,
    Protected,
    Prioritized,
}

/// End of a boot attempt.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Terminal {
    /// Boot succeeded; control moves to handler mode.
    HandlerMode,
    /// A step failed; the panic handler takes over.
    Panic,
}

/// Where a single step leads.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Transition {
    Advance(Stage),
    Finish(Terminal),
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum State {
    Running(Stage),
    Finished(Terminal),
}

/// Drives one boot attempt from reset to a terminal state.
pub struct BootOrchestrator<P, A, H> {
    platform: P,
    arch: A,
    panic: H,
    config: BootConfig,
    core: CoreInitializer,
    exceptions: ExceptionPriorityConfigurator,
    memory_protect: bool,
    state: State,
    mode: ExecutionMode,
}

impl<P, A, H> BootOrchestrator<P, A, H>
where
    P: PlatformHal + BootDataValidator + ServiceDatabase,
    A: Arch,
    H: PanicHandler,
{
    pub fn new(platform: P, arch: A, panic: H, config: BootConfig) -> Self {
        Self {
            platform,
            arch,
            panic,
            config,
            core: CoreInitializer::new(config.secure_irqs, config.ns_code_start),
            exceptions: ExceptionPriorityConfigurator::new(),
            memory_protect: MEMORY_PROTECT,
            state: State::Running(Stage::Reset),
            mode: ExecutionMode::Thread,
        }
    }

    /// Current stage, or `None` once a terminal state was reached.
    pub fn stage(&self) -> Option<Stage> {
        match self.state {
            State::Running(stage) => Some(stage),
            State::Finished(_) => None,
        }
    }

    /// Terminal state, once reached.
    pub fn terminal(&self) -> Option<Terminal> {
        match self.state {
            State::Running(_) => None,
            State::Finished(terminal) => Some(terminal),
        }
    }

    /// Execution mode the boot sequence leaves the processor in.
    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    /// Execute the next step.
    pub fn step(&mut self) -> Transition {
        let stage = match self.state {
            State::Running(stage) => stage,
            State::Finished(terminal) => return Transition::Finish(terminal),
        };

        let transition = match stage {
            Stage::Reset => {
                self.arch.set_stack_limit(self.config.stack_limit);
                Transition::Advance(Stage::StackBounded)
            }
            Stage::StackBounded => Self::gate(
                self.core.init(&mut self.platform, &mut self.arch),
                Stage::CoreReady,
            ),
            Stage::CoreReady => {
                info!(
                    "Booting SPM v{}.{} {}",
                    version::MAJOR,
                    version::MINOR,
                    version::STRING
                );
                let status = self
                    .platform
                    .init_db()
                    .map_err(step_failed(BootStep::ServiceDatabase));
                Self::gate(status, Stage::DatabaseReady)
            }
            Stage::DatabaseReady => {
                let status = if self.memory_protect {
                    self.platform
                        .setup_isolation_hw()
                        .map_err(step_failed(BootStep::IsolationMemoryProtect))
                } else {
                    Ok(())
                };
                Self::gate(status, Stage::Protected)
            }
            Stage::Protected => Self::gate(
                self.exceptions.configure(&mut self.platform, &mut self.arch),
                Stage::Prioritized,
            ),
            Stage::Prioritized => {
                self.mode = ExecutionMode::Handler;
                Transition::Finish(Terminal::HandlerMode)
            }
        };

        self.state = match transition {
            Transition::Advance(next) => State::Running(next),
            Transition::Finish(terminal) => {
                if terminal == Terminal::Panic {
                    error!("Boot failed at stage {:?}", stage);
                }
                State::Finished(terminal)
            }
        };
        transition
    }

    /// Step until a terminal state is reached.
    pub fn run_to_terminal(&mut self) -> Terminal {
        loop {
            if let Transition::Finish(terminal) = self.step() {
                return terminal;
            }
        }
    }

    /// Run the whole boot sequence. Never returns.
    pub fn run(mut self) -> ! {
        match self.run_to_terminal() {
            Terminal::HandlerMode => self.arch.enter_handler_mode(),
            Terminal::Panic => self.panic.panic(),
        }
    }

    fn gate(status: BootStatus, next: Stage) -> Transition {
        match status {
            Ok(()) => Transition::Advance(next),
            Err(_) => Transition::Finish(Terminal::Panic),
        }
    }

    #[cfg(test)]
    fn with_memory_protect(mut self, enabled: bool) -> Self {
        self.memory_protect = enabled;
        self
    }
}

/// Boot the secure image. Called once, from the reset handler.
pub fn boot<P, A, H>(platform: P, arch: A, panic: H, config: BootConfig) -> !
where
    P: PlatformHal + BootDataValidator + ServiceDatabase,
    A: Arch,
    H: PanicHandler,
{
    BootOrchestrator::new(platform, arch, panic, config).run()
}
