//! Single-run controller shared by the stepping CLI and interactive
//! front-ends.
//!
//! A controller owns one [`Program`] and the one [`MachineState`] running it.
//! Once a terminal outcome is observed it is latched: further calls return
//! the same outcome and leave the state untouched until [`Controller::reset`]
//! or [`Controller::restart`].

use crate::execute::{run_until, step_traced};
use crate::{
    EngineConfig, MachineSnapshot, MachineState, NullTraceSink, Program, RunOutcome, RunState,
    StepOutcome, TraceSink,
};

/// Live run of one program.
#[derive(Debug, Clone)]
pub struct Controller {
    program: Program,
    state: MachineState,
    config: EngineConfig,
    latched: Option<StepOutcome>,
    steps: u64,
}

impl Controller {
    /// Starts a run of `program` with the default configuration.
    #[must_use]
    pub fn new(program: Program) -> Self {
        Self::with_config(program, EngineConfig::default())
    }

    /// Starts a run of `program` with an explicit configuration.
    #[must_use]
    pub fn with_config(program: Program, config: EngineConfig) -> Self {
        let state = MachineState::from_program(&program);
        Self {
            program,
            state,
            config,
            latched: None,
            steps: 0,
        }
    }

    /// Replaces the program and starts a fresh run of it.
    pub fn reset(&mut self, program: Program) {
        self.program = program;
        self.restart();
    }

    /// Starts a fresh run of the current program.
    pub fn restart(&mut self) {
        self.state.reset(&self.program);
        self.latched = None;
        self.steps = 0;
    }

    /// Executes the next instruction.
    pub fn advance_one(&mut self) -> StepOutcome {
        self.advance_one_traced(&mut NullTraceSink)
    }

    /// Executes the next instruction, reporting trace events to `sink` when
    /// tracing is enabled.
    pub fn advance_one_traced<S: TraceSink + ?Sized>(&mut self, sink: &mut S) -> StepOutcome {
        if let Some(terminal) = &self.latched {
            return terminal.clone();
        }

        let outcome = if self.config.tracing_enabled {
            step_traced(self.program.instructions(), &mut self.state, sink)
        } else {
            step_traced(self.program.instructions(), &mut self.state, &mut NullTraceSink)
        };
        self.record(&outcome, u64::from(!outcome.is_terminal()));
        outcome
    }

    /// Steps until a terminal outcome and returns it, ignoring any configured
    /// step limit.
    pub fn run_to_completion(&mut self) -> StepOutcome {
        if let Some(terminal) = &self.latched {
            return terminal.clone();
        }
        let outcome = run_until(
            self.program.instructions(),
            &mut self.state,
            None,
            &mut NullTraceSink,
        );
        self.record(&outcome.final_step, outcome.steps);
        outcome.final_step
    }

    /// Steps until a terminal outcome or the configured step limit.
    pub fn run(&mut self) -> RunOutcome {
        self.run_traced(&mut NullTraceSink)
    }

    /// Like [`Controller::run`], reporting trace events when tracing is
    /// enabled.
    pub fn run_traced<S: TraceSink + ?Sized>(&mut self, sink: &mut S) -> RunOutcome {
        if let Some(terminal) = &self.latched {
            return RunOutcome {
                steps: 0,
                final_step: terminal.clone(),
            };
        }

        let limit = self.config.step_limit;
        let outcome = if self.config.tracing_enabled {
            run_until(self.program.instructions(), &mut self.state, limit, sink)
        } else {
            run_until(
                self.program.instructions(),
                &mut self.state,
                limit,
                &mut NullTraceSink,
            )
        };
        self.record(&outcome.final_step, outcome.steps);
        outcome
    }

    fn record(&mut self, outcome: &StepOutcome, executed: u64) {
        self.steps += executed;
        if outcome.is_terminal() {
            self.latched = Some(outcome.clone());
        }
    }

    /// Copy of the current registers and memory.
    #[must_use]
    pub fn snapshot(&self) -> MachineSnapshot {
        MachineSnapshot::from(&self.state)
    }

    /// Current machine state.
    #[must_use]
    pub const fn state(&self) -> &MachineState {
        &self.state
    }

    /// Program being run.
    #[must_use]
    pub const fn program(&self) -> &Program {
        &self.program
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Current run state.
    #[must_use]
    pub fn run_state(&self) -> RunState {
        self.latched.as_ref().map_or(RunState::Running, RunState::after)
    }

    /// Instructions executed since the run started.
    #[must_use]
    pub const fn steps_executed(&self) -> u64 {
        self.steps
    }
}
