//! Run-to-end test execution for inline test blocks.
//!
//! ## Execution Model
//!
//! 1. Start a fresh [`Controller`] for the assembled program.
//! 2. Run until `STOP`, the end of the instructions, a fault or the
//!    configured step limit.
//! 3. Evaluate every `mu0test` block, in document order, against the final
//!    machine state and outcome.
//! 4. Report summary: passed, failed, total.
//!
//! A run cut short by the step limit fails every block, since its final state
//! is not meaningful.

use std::fmt;

use mu0_core::{Controller, EngineConfig, MachineState, Program, RunOutcome, StepOutcome};

use crate::test_format::{Assertion, EndState, ParsedTestBlock};

/// Result of evaluating a single assertion against machine state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssertionResult {
    /// The original assertion that was evaluated.
    pub assertion: Assertion,
    /// Whether the assertion passed.
    pub passed: bool,
    /// The actual value observed (for failure reporting).
    pub actual: String,
}

/// Result of evaluating a single test block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestBlockResult {
    /// 1-indexed source line where the test block starts.
    pub start_line: u32,
    /// 1-indexed source line where the test block ends.
    pub end_line: u32,
    /// Results for each assertion in the block.
    pub assertion_results: Vec<AssertionResult>,
    /// Why the block could not be evaluated, if it could not.
    pub interrupted: Option<String>,
}

impl TestBlockResult {
    /// Returns true if the block was evaluated and every assertion passed.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.interrupted.is_none() && self.assertion_results.iter().all(|r| r.passed)
    }
}

/// Result of running a program and evaluating all of its test blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestRunResult {
    /// Results for each test block in order.
    pub block_results: Vec<TestBlockResult>,
    /// How the run ended.
    pub outcome: RunOutcome,
}

impl TestRunResult {
    /// Returns true if every test block passed.
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.block_results.iter().all(TestBlockResult::passed)
    }

    /// Returns counts for summary reporting.
    #[must_use]
    pub fn summary(&self) -> TestSummary {
        let passed = self.block_results.iter().filter(|b| b.passed()).count();
        TestSummary {
            passed,
            failed: self.block_results.len() - passed,
            total: self.block_results.len(),
        }
    }
}

/// Summary counts for test run reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TestSummary {
    /// Number of test blocks that passed.
    pub passed: usize,
    /// Number of test blocks that failed.
    pub failed: usize,
    /// Total number of test blocks.
    pub total: usize,
}

/// Runs `program` once and evaluates every test block against the result.
///
/// `config.step_limit` bounds the run; tracing is ignored.
#[must_use]
pub fn run_tests(
    program: &Program,
    test_blocks: &[ParsedTestBlock],
    config: EngineConfig,
) -> TestRunResult {
    let mut controller = Controller::with_config(program.clone(), config);
    let outcome = controller.run();

    let interrupted = (!outcome.is_terminal())
        .then(|| format!("step limit reached after {} steps", outcome.steps));
    let end = end_state(&outcome.final_step);

    let block_results = test_blocks
        .iter()
        .map(|block| TestBlockResult {
            start_line: block.start_line,
            end_line: block.end_line,
            assertion_results: if interrupted.is_some() {
                Vec::new()
            } else {
                evaluate_assertions(controller.state(), end, &block.assertions)
            },
            interrupted: interrupted.clone(),
        })
        .collect();

    TestRunResult {
        block_results,
        outcome,
    }
}

const fn end_state(outcome: &StepOutcome) -> Option<EndState> {
    match outcome {
        StepOutcome::Continued { .. } => None,
        StepOutcome::Halted { .. } => Some(EndState::Halted),
        StepOutcome::Completed => Some(EndState::Completed),
        StepOutcome::Fault { .. } => Some(EndState::Fault),
    }
}

fn evaluate_assertions(
    state: &MachineState,
    end: Option<EndState>,
    assertions: &[Assertion],
) -> Vec<AssertionResult> {
    assertions
        .iter()
        .map(|assertion| evaluate_assertion(state, end, assertion))
        .collect()
}

fn evaluate_assertion(
    state: &MachineState,
    end: Option<EndState>,
    assertion: &Assertion,
) -> AssertionResult {
    let (passed, actual) = match assertion {
        Assertion::Accumulator { operator, expected } => {
            let actual = state.accumulator();
            (operator.holds(actual == *expected), actual.to_string())
        }
        Assertion::ProgramCounter { operator, expected } => {
            let actual = state.program_counter();
            (operator.holds(actual == *expected), actual.to_string())
        }
        Assertion::Memory {
            address,
            operator,
            expected,
        } => state.memory().get(*address).map_or_else(
            || (operator.holds(false), "absent".to_string()),
            |actual| (operator.holds(actual == *expected), actual.to_string()),
        ),
        Assertion::End { operator, expected } => (
            operator.holds(end == Some(*expected)),
            end.map_or_else(|| "running".to_string(), |end| end.to_string()),
        ),
    };

    AssertionResult {
        assertion: assertion.clone(),
        passed,
        actual,
    }
}

impl fmt::Display for TestBlockResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(reason) = &self.interrupted {
            return write!(
                f,
                "FAIL (lines {}-{}): {reason}",
                self.start_line, self.end_line
            );
        }

        let failures = self.assertion_results.iter().filter(|r| !r.passed).count();
        if failures == 0 {
            write!(
                f,
                "PASS (lines {}-{}): {} assertions",
                self.start_line,
                self.end_line,
                self.assertion_results.len()
            )
        } else {
            write!(
                f,
                "FAIL (lines {}-{}): {failures} assertion(s) failed",
                self.start_line, self.end_line
            )
        }
    }
}

impl fmt::Display for AssertionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.passed {
            write!(f, "  PASS: {}", self.assertion)
        } else {
            write!(f, "  FAIL: {} (got {})", self.assertion, self.actual)
        }
    }
}

impl fmt::Display for TestSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} passed, {} failed", self.passed, self.failed)
    }
}
