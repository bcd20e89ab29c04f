use mu0_core::{
    step_report, terminal_message, Controller, EngineConfig, MemoryDump, RunOutcome, StepOutcome,
};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

macro_rules! console_log {
    ($($t:tt)*) => (web_sys::console::log_1(&JsValue::from_str(&format!($($t)*))))
}

/// JS-compatible version of StepOutcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum WasmStepOutcome {
    Continued {
        line: u32,
        position: usize,
        instruction: String,
        comment: Option<String>,
        program_counter: usize,
        accumulator: i64,
        report: String,
    },
    Halted {
        line: u32,
        message: String,
    },
    Completed {
        message: String,
    },
    Fault {
        line: u32,
        address: u16,
        cause: String,
        message: String,
    },
}

impl WasmStepOutcome {
    fn from_core(outcome: &StepOutcome, controller: &Controller) -> Self {
        let message = terminal_message(outcome).unwrap_or_default();
        match outcome {
            StepOutcome::Continued {
                executed,
                position,
                program_counter,
                accumulator,
            } => Self::Continued {
                line: executed.source_line(),
                position: *position,
                instruction: executed.to_string(),
                comment: executed.comment().map(str::to_string),
                program_counter: *program_counter,
                accumulator: *accumulator,
                report: step_report(outcome, controller.state().memory()).unwrap_or_default(),
            },
            StepOutcome::Halted { line } => Self::Halted {
                line: *line,
                message,
            },
            StepOutcome::Completed => Self::Completed { message },
            StepOutcome::Fault {
                cause,
                address,
                line,
            } => Self::Fault {
                line: *line,
                address: address.get(),
                cause: cause.to_string(),
                message,
            },
        }
    }
}

/// JS-compatible version of RunOutcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WasmRunOutcome {
    pub steps: u64,
    pub final_step: WasmStepOutcome,
}

impl WasmRunOutcome {
    fn from_core(outcome: &RunOutcome, controller: &Controller) -> Self {
        Self {
            steps: outcome.steps,
            final_step: WasmStepOutcome::from_core(&outcome.final_step, controller),
        }
    }
}

fn load_controller(source: &str, step_limit: Option<u32>) -> Result<Controller, String> {
    let program = mu0_asm::parse(source).map_err(|error| error.to_string())?;
    let config = EngineConfig {
        step_limit: step_limit.map(u64::from),
        tracing_enabled: false,
    };
    Ok(Controller::with_config(program, config))
}

#[wasm_bindgen]
pub struct WasmMachine {
    controller: Controller,
}

#[wasm_bindgen]
impl WasmMachine {
    /// Parses `source` and prepares a run. `step_limit` bounds [`Self::run`].
    ///
    /// # Errors
    ///
    /// Returns the syntax error message when a line is rejected.
    #[wasm_bindgen(constructor)]
    pub fn new(source: &str, step_limit: Option<u32>) -> Result<Self, JsValue> {
        console_error_panic_hook::set_once();
        let controller = load_controller(source, step_limit).map_err(|e| JsValue::from_str(&e))?;
        console_log!(
            "Loaded {} instructions, {} initialized cells",
            controller.program().len(),
            controller.program().initial_memory().len()
        );
        Ok(Self { controller })
    }

    /// Replaces the program, keeping the step limit.
    ///
    /// # Errors
    ///
    /// Returns the syntax error message; the current program is kept.
    pub fn reset(&mut self, source: &str) -> Result<(), JsValue> {
        let program = mu0_asm::parse(source).map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.controller.reset(program);
        Ok(())
    }

    /// Starts the current program again from its initial memory.
    pub fn restart(&mut self) {
        self.controller.restart();
    }

    /// Executes a single instruction.
    /// Returns the step outcome as a JSON object.
    ///
    /// # Errors
    ///
    /// Returns an error when the outcome cannot be converted to a JS value.
    pub fn advance_one(&mut self) -> Result<JsValue, JsValue> {
        let outcome = self.controller.advance_one();
        let outcome = WasmStepOutcome::from_core(&outcome, &self.controller);
        Ok(serde_wasm_bindgen::to_value(&outcome)?)
    }

    /// Runs until `STOP`, the end of the program or a fault, ignoring the
    /// step limit.
    ///
    /// # Errors
    ///
    /// Returns an error when the outcome cannot be converted to a JS value.
    pub fn run_to_completion(&mut self) -> Result<JsValue, JsValue> {
        let outcome = self.controller.run_to_completion();
        let outcome = WasmStepOutcome::from_core(&outcome, &self.controller);
        console_log!("Run finished after {} steps", self.controller.steps_executed());
        Ok(serde_wasm_bindgen::to_value(&outcome)?)
    }

    /// Runs until a terminal outcome or the step limit.
    /// Returns the run outcome as a JSON object.
    ///
    /// # Errors
    ///
    /// Returns an error when the outcome cannot be converted to a JS value.
    pub fn run(&mut self) -> Result<JsValue, JsValue> {
        let outcome = self.controller.run();
        let outcome = WasmRunOutcome::from_core(&outcome, &self.controller);
        Ok(serde_wasm_bindgen::to_value(&outcome)?)
    }

    /// Returns registers and memory as a JSON object.
    ///
    /// # Errors
    ///
    /// Returns an error when the snapshot cannot be converted to a JS value.
    pub fn snapshot(&self) -> Result<JsValue, JsValue> {
        Ok(serde_wasm_bindgen::to_value(&self.controller.snapshot())?)
    }

    #[must_use]
    pub fn program_counter(&self) -> usize {
        self.controller.state().program_counter()
    }

    #[must_use]
    pub fn steps_executed(&self) -> u64 {
        self.controller.steps_executed()
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.controller.run_state().is_terminal()
    }

    /// Returns the populated memory addresses in ascending order.
    #[must_use]
    pub fn memory_addresses(&self) -> js_sys::Uint16Array {
        let addresses: Vec<u16> = self
            .controller
            .state()
            .memory()
            .iter()
            .map(|(address, _)| address.get())
            .collect();
        js_sys::Uint16Array::from(addresses.as_slice())
    }

    /// Returns the memory dump in the same format as the command line.
    #[must_use]
    pub fn dump(&self) -> String {
        MemoryDump(self.controller.state().memory()).to_string()
    }
}
