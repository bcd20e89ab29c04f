#![no_main]

use libfuzzer_sys::fuzz_target;
use mu0_core::{
    decode, run_until, Address, Instruction, MachineState, Memory, NullTraceSink, Opcode, Program,
    WORD_MASK,
};

const STEP_LIMIT: u64 = 4096;

fn address(high: u8, low: u8) -> Address {
    Address::new(u16::from_be_bytes([high, low]) & WORD_MASK).unwrap_or(Address::MIN)
}

fuzz_target!(|data: &[u8]| {
    let Some((&seed_count, rest)) = data.split_first() else {
        return;
    };

    // Leading 4-byte records seed memory, the remaining 3-byte records are
    // instructions.
    let seed_len = (usize::from(seed_count % 16) * 4).min(rest.len());
    let (seeds, code) = rest.split_at(seed_len);

    let mut memory = Memory::new();
    for record in seeds.chunks_exact(4) {
        let raw = u16::from_be_bytes([record[2], record[3]]) & WORD_MASK;
        memory.write(address(record[0], record[1]), decode(raw));
    }

    let instructions: Vec<Instruction> = code
        .chunks_exact(3)
        .zip(1u32..)
        .map(|(record, line)| {
            let opcode = Opcode::ALL[usize::from(record[0]) % Opcode::ALL.len()];
            if opcode.takes_operand() {
                Instruction::with_operand(opcode, address(record[1], record[2]), line)
            } else {
                Instruction::stop(line)
            }
        })
        .collect();

    let program = Program::new(memory, instructions);
    let mut state = MachineState::from_program(&program);
    let outcome = run_until(
        program.instructions(),
        &mut state,
        Some(STEP_LIMIT),
        &mut NullTraceSink,
    );

    assert!(outcome.steps <= STEP_LIMIT);
    if !outcome.is_terminal() {
        assert_eq!(outcome.steps, STEP_LIMIT);
    }
});
