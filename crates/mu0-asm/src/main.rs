//! CLI entry point for the MU0 runner binary.

use std::env;
use std::ffi::OsString;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use mu0_asm::assembler::{assemble_file, Assembly};
use mu0_asm::test_format::{parse_test_block, ParsedTestBlock};
use mu0_asm::test_runner::run_tests;
use mu0_core::{
    step_report, terminal_message, Controller, EngineConfig, MemoryDump, RunOutcome, StepOutcome,
    TraceEvent, TraceSink,
};
#[cfg(test)]
use tempfile as _;

const USAGE_TEXT: &str = "\
Usage: mu0 [options] <source>

Runs an MU0 program. Files ending in .md are literate: only ```mu0 blocks
are assembled and ```mu0test blocks hold assertions.

Options:
  -s, --step           Show the machine state and wait for ENTER after each
                       instruction
  -t, --trace          Print execution trace events to stderr
      --max-steps <n>  Stop after n executed instructions
      --test           Run the program and check its mu0test blocks
  -h, --help           Show this help message

Examples:
  mu0 program.mu0
  mu0 -s program.mu0
  mu0 --test program.md
";

const EXIT_FAILURE: i32 = 1;

#[derive(Debug, PartialEq, Eq)]
struct RunArgs {
    source: PathBuf,
    step: bool,
    trace: bool,
    max_steps: Option<u64>,
    test: bool,
}

impl RunArgs {
    const fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            step_limit: self.max_steps,
            tracing_enabled: self.trace,
        }
    }
}

#[derive(Debug)]
enum ParseResult {
    Run(RunArgs),
    Help,
}

#[allow(clippy::while_let_on_iterator)]
fn parse_args(mut args: impl Iterator<Item = OsString>) -> Result<ParseResult, String> {
    let mut source: Option<PathBuf> = None;
    let mut step = false;
    let mut trace = false;
    let mut max_steps = None;
    let mut test = false;

    while let Some(arg) = args.next() {
        if arg == "--help" || arg == "-h" {
            return Ok(ParseResult::Help);
        }

        if arg == "-s" || arg == "--step" {
            step = true;
            continue;
        }

        if arg == "-t" || arg == "--trace" {
            trace = true;
            continue;
        }

        if arg == "--test" {
            test = true;
            continue;
        }

        if arg == "--max-steps" {
            let value = args
                .next()
                .ok_or_else(|| "missing value for --max-steps".to_string())?;
            let value = value.to_string_lossy();
            let limit = value
                .parse::<u64>()
                .map_err(|_| format!("invalid value for --max-steps: {value}"))?;
            max_steps = Some(limit);
            continue;
        }

        if arg.to_string_lossy().starts_with('-') {
            return Err(format!("unrecognized option \"{}\"", arg.to_string_lossy()));
        }

        if source.is_some() {
            return Err("multiple source files provided".to_string());
        }
        source = Some(PathBuf::from(arg));
    }

    let source = source.ok_or_else(|| "missing source file parameter".to_string())?;
    Ok(ParseResult::Run(RunArgs {
        source,
        step,
        trace,
        max_steps,
        test,
    }))
}

/// Prints trace events to stderr as they happen.
struct StderrTrace;

impl TraceSink for StderrTrace {
    fn on_event(&mut self, event: TraceEvent) {
        eprintln!("trace: {event}");
    }
}

fn load(path: &Path) -> Result<Assembly, i32> {
    assemble_file(path).map_err(|error| {
        eprintln!("{}", error.format_for_stderr());
        EXIT_FAILURE
    })
}

fn print_recognized<W: Write>(out: &mut W, assembly: &Assembly) -> io::Result<()> {
    writeln!(out, "### Parsing source file ...")?;
    for line in &assembly.recognized {
        writeln!(out, "Recognized: {}", line.text)?;
    }
    Ok(())
}

/// Runs a controller to a terminal outcome or its step limit, narrating
/// every instruction and waiting for a line on `input` after each one.
///
/// Closed input ends the run with an `UnexpectedEof` error.
fn step_through<R: BufRead, W: Write, S: TraceSink>(
    controller: &mut Controller,
    sink: &mut S,
    input: &mut R,
    out: &mut W,
) -> io::Result<RunOutcome> {
    let limit = controller.config().step_limit;
    let mut steps = 0u64;
    loop {
        let outcome = controller.advance_one_traced(&mut *sink);
        let Some(report) = step_report(&outcome, controller.state().memory()) else {
            return Ok(RunOutcome {
                steps,
                final_step: outcome,
            });
        };
        steps += 1;

        writeln!(out)?;
        writeln!(out, "{report}")?;
        if limit.is_some_and(|limit| steps >= limit) {
            return Ok(RunOutcome {
                steps,
                final_step: outcome,
            });
        }
        write!(out, "Press ENTER for next instruction")?;
        out.flush()?;
        let mut answer = String::new();
        if input.read_line(&mut answer)? == 0 {
            writeln!(out)?;
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("input closed after {steps} instructions"),
            ));
        }
    }
}

/// Runs the program, writing the narration to `out`.
fn run_program<R: BufRead, W: Write, S: TraceSink>(
    assembly: Assembly,
    args: &RunArgs,
    sink: &mut S,
    input: &mut R,
    out: &mut W,
) -> io::Result<RunOutcome> {
    print_recognized(out, &assembly)?;

    writeln!(out)?;
    writeln!(out, "### Memory dump before program execution:")?;
    writeln!(out, "{}", MemoryDump(assembly.program.initial_memory()))?;

    writeln!(out)?;
    writeln!(out, "### Running the program ...")?;
    let mut controller = Controller::with_config(assembly.program, args.engine_config());
    let outcome = if args.step {
        step_through(&mut controller, sink, input, out)?
    } else {
        controller.run_traced(sink)
    };

    if let Some(message) = terminal_message(&outcome.final_step) {
        writeln!(out)?;
        writeln!(out, "### {message}")?;
    }

    writeln!(out)?;
    writeln!(out, "### Memory dump after program end:")?;
    writeln!(out, "{}", MemoryDump(controller.state().memory()))?;

    Ok(outcome)
}

fn run(args: &RunArgs) -> Result<(), i32> {
    let assembly = load(&args.source)?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    let outcome = run_program(
        assembly,
        args,
        &mut StderrTrace,
        &mut stdin.lock(),
        &mut stdout.lock(),
    )
    .map_err(|error| {
        eprintln!("error: {error}");
        EXIT_FAILURE
    })?;

    match outcome.final_step {
        StepOutcome::Halted { .. } | StepOutcome::Completed => Ok(()),
        StepOutcome::Fault { .. } => {
            if let Some(error) = outcome.final_step.fault() {
                eprintln!("error: {error}");
            }
            Err(EXIT_FAILURE)
        }
        StepOutcome::Continued { .. } => {
            eprintln!(
                "error: step limit reached after {} instructions",
                outcome.steps
            );
            Err(EXIT_FAILURE)
        }
    }
}

fn run_test(args: &RunArgs) -> Result<(), i32> {
    let assembly = load(&args.source)?;

    if assembly.test_blocks.is_empty() {
        println!("No test blocks found in {}", args.source.display());
        return Ok(());
    }

    let parsed_blocks: Vec<ParsedTestBlock> = assembly
        .test_blocks
        .iter()
        .filter_map(|block| {
            parse_test_block(&block.content, block.start_line, block.end_line)
                .map_err(|error| {
                    eprintln!(
                        "{}:{}: error: malformed assertion: {error}",
                        args.source.display(),
                        block.start_line
                    );
                })
                .ok()
        })
        .collect();

    if parsed_blocks.len() != assembly.test_blocks.len() {
        return Err(EXIT_FAILURE);
    }

    let config = EngineConfig {
        tracing_enabled: false,
        ..args.engine_config()
    };
    let test_result = run_tests(&assembly.program, &parsed_blocks, config);

    for block_result in &test_result.block_results {
        println!("{block_result}");

        if !block_result.passed() {
            for assertion in &block_result.assertion_results {
                if !assertion.passed {
                    println!("{assertion}");
                }
            }
        }
    }

    let summary = test_result.summary();
    println!();
    println!("Test Summary: {summary} (total: {})", summary.total);

    if test_result.all_passed() {
        Ok(())
    } else {
        Err(EXIT_FAILURE)
    }
}

fn main() {
    let exit_code = match parse_args(env::args_os().skip(1)) {
        Ok(ParseResult::Help) => {
            println!("{USAGE_TEXT}");
            0
        }
        Ok(ParseResult::Run(args)) => {
            let result = if args.test {
                run_test(&args)
            } else {
                run(&args)
            };
            match result {
                Ok(()) => 0,
                Err(code) => code,
            }
        }
        Err(error) => {
            eprintln!("error: {error}");
            eprintln!("{USAGE_TEXT}");
            EXIT_FAILURE
        }
    };

    std::process::exit(exit_code);
}
