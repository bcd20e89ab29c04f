//! Opcode semantics and terminal-outcome coverage for the execution engine.

use mu0_core::{
    run_to_completion, step, Address, Controller, FaultCode, Instruction, MachineState, Memory,
    Opcode, Program, RunState, StepOutcome,
};
use proptest as _;
use rstest::rstest;
#[cfg(feature = "serde")]
use serde as _;
use thiserror as _;

fn addr(raw: u16) -> Address {
    Address::new(raw).expect("test address fits in 12 bits")
}

fn op(opcode: Opcode, raw: u16, line: u32) -> Instruction {
    Instruction::with_operand(opcode, addr(raw), line)
}

fn memory(cells: &[(u16, i64)]) -> Memory {
    cells.iter().map(|&(a, v)| (addr(a), v)).collect()
}

#[rstest]
#[case::load(Opcode::Load, 7, 3, 3)]
#[case::add(Opcode::Add, 7, 3, 10)]
#[case::sub(Opcode::Sub, 7, 3, 4)]
#[case::sub_goes_negative(Opcode::Sub, 1, 3, -2)]
#[case::add_exceeds_twelve_bits(Opcode::Add, 2047, 2047, 4094)]
fn memory_reading_opcodes(
    #[case] opcode: Opcode,
    #[case] accumulator: i64,
    #[case] cell: i64,
    #[case] expected: i64,
) {
    let program = [op(opcode, 0x10, 1)];
    let mut state = MachineState::with_memory(memory(&[(0x10, cell)]));
    state.set_accumulator(accumulator);

    let outcome = step(&program, &mut state);

    assert!(matches!(outcome, StepOutcome::Continued { .. }));
    assert_eq!(state.accumulator(), expected);
    assert_eq!(state.program_counter(), 1);
    assert_eq!(state.memory().get(addr(0x10)), Some(cell));
}

#[rstest]
#[case::load(Opcode::Load)]
#[case::add(Opcode::Add)]
#[case::sub(Opcode::Sub)]
fn reading_unwritten_cell_faults_instead_of_reading_zero(#[case] opcode: Opcode) {
    let program = [op(opcode, 0x44, 9)];
    let mut state = MachineState::default();

    let outcome = step(&program, &mut state);

    assert_eq!(
        outcome,
        StepOutcome::Fault {
            cause: FaultCode::InvalidMemoryAccess,
            address: addr(0x44),
            line: 9,
        }
    );
    assert_eq!(state.accumulator(), 0);
    assert_eq!(state.program_counter(), 0);
}

#[rstest]
#[case::jump_positive(Opcode::Jump, 5, 7)]
#[case::jump_negative(Opcode::Jump, -5, 7)]
#[case::jge_zero_taken(Opcode::Jge, 0, 7)]
#[case::jge_positive_taken(Opcode::Jge, 1, 7)]
#[case::jge_negative_falls_through(Opcode::Jge, -1, 1)]
#[case::jne_zero_falls_through(Opcode::Jne, 0, 1)]
#[case::jne_positive_taken(Opcode::Jne, 3, 7)]
#[case::jne_negative_taken(Opcode::Jne, -3, 7)]
fn branch_opcodes(#[case] opcode: Opcode, #[case] accumulator: i64, #[case] expected_pc: usize) {
    let program = [op(opcode, 0x7, 1)];
    let mut state = MachineState::default();
    state.set_accumulator(accumulator);

    let outcome = step(&program, &mut state);

    assert!(matches!(
        outcome,
        StepOutcome::Continued { program_counter, .. } if program_counter == expected_pc
    ));
    assert_eq!(state.accumulator(), accumulator);
}

#[test]
fn store_then_load_round_trips_negative_values() {
    let program = [
        op(Opcode::Load, 0x1, 1),
        op(Opcode::Sub, 0x2, 2),
        op(Opcode::Store, 0x3, 3),
        op(Opcode::Load, 0x3, 4),
        Instruction::stop(5),
    ];
    let mut state = MachineState::with_memory(memory(&[(0x1, 2), (0x2, 5)]));

    let outcome = run_to_completion(&program, &mut state);

    assert_eq!(outcome, StepOutcome::Halted { line: 5 });
    assert_eq!(state.accumulator(), -3);
    assert_eq!(state.memory().get(addr(0x3)), Some(-3));
}

#[test]
fn stop_at_position_zero_halts_without_counting_a_step() {
    let mut controller = Controller::new(Program::new(Memory::new(), vec![Instruction::stop(1)]));

    assert_eq!(controller.advance_one(), StepOutcome::Halted { line: 1 });
    assert_eq!(controller.run_state(), RunState::Halted);
    assert_eq!(controller.steps_executed(), 0);
}

#[test]
fn empty_program_completes_with_pc_equal_to_length() {
    let program = Program::default();
    let mut controller = Controller::new(program);

    assert_eq!(controller.advance_one(), StepOutcome::Completed);
    assert_eq!(controller.snapshot().program_counter, 0);
    assert_eq!(controller.program().len(), 0);
}

#[test]
fn falling_off_the_end_is_distinct_from_halting() {
    let program = Program::new(
        memory(&[(0x10, 1)]),
        vec![op(Opcode::Load, 0x10, 1), op(Opcode::Add, 0x10, 2)],
    );
    let mut controller = Controller::new(program);

    let outcome = controller.run_to_completion();

    assert_eq!(outcome, StepOutcome::Completed);
    assert_eq!(controller.snapshot().accumulator, 2);
    assert_eq!(controller.run_state(), RunState::Completed);
}

#[test]
fn countdown_loop_terminates_through_conditional_branch() {
    // counter = 3; loop: counter -= 1; JNE loop; STOP
    let program = Program::new(
        memory(&[(0x20, 3), (0x21, 1)]),
        vec![
            op(Opcode::Load, 0x20, 1),
            op(Opcode::Sub, 0x21, 2),
            op(Opcode::Store, 0x20, 3),
            op(Opcode::Jne, 0x1, 4),
            Instruction::stop(5),
        ],
    );
    let mut controller = Controller::new(program);

    let outcome = controller.run_to_completion();

    assert_eq!(outcome, StepOutcome::Halted { line: 5 });
    assert_eq!(controller.state().memory().get(addr(0x20)), Some(0));
    assert_eq!(controller.steps_executed(), 10);
}

#[test]
fn fault_stops_run_and_leaves_prior_writes_visible() {
    let program = Program::new(
        memory(&[(0x1, 4)]),
        vec![
            op(Opcode::Load, 0x1, 1),
            op(Opcode::Store, 0x2, 2),
            op(Opcode::Add, 0x3, 3),
            Instruction::stop(4),
        ],
    );
    let mut controller = Controller::new(program);

    let outcome = controller.run_to_completion();

    let error = outcome.fault().expect("run must fault");
    assert_eq!(error.line, 3);
    assert_eq!(error.address, addr(0x3));
    assert_eq!(controller.state().memory().get(addr(0x2)), Some(4));
    assert_eq!(controller.snapshot().program_counter, 2);
}
