use crate::{Memory, Program, Value};

/// Architectural state of one run: accumulator, program counter and data
/// memory.
///
/// The program counter indexes the instruction sequence; it is unrelated to
/// data addresses even though both are written in the same hex syntax.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct MachineState {
    accumulator: Value,
    program_counter: usize,
    memory: Memory,
}

impl MachineState {
    /// Fresh state for `program`: `ACC = 0`, `PC = 0`, memory copied from the
    /// program's initial image.
    #[must_use]
    pub fn from_program(program: &Program) -> Self {
        Self::with_memory(program.initial_memory().clone())
    }

    /// Fresh state over an explicit memory image.
    #[must_use]
    pub const fn with_memory(memory: Memory) -> Self {
        Self {
            accumulator: 0,
            program_counter: 0,
            memory,
        }
    }

    /// Reads the accumulator.
    #[must_use]
    pub const fn accumulator(&self) -> Value {
        self.accumulator
    }

    /// Writes the accumulator.
    pub const fn set_accumulator(&mut self, value: Value) {
        self.accumulator = value;
    }

    /// Reads the program counter (a program position).
    #[must_use]
    pub const fn program_counter(&self) -> usize {
        self.program_counter
    }

    /// Writes the program counter.
    pub const fn set_program_counter(&mut self, position: usize) {
        self.program_counter = position;
    }

    /// Data memory.
    #[must_use]
    pub const fn memory(&self) -> &Memory {
        &self.memory
    }

    /// Mutable data memory.
    pub const fn memory_mut(&mut self) -> &mut Memory {
        &mut self.memory
    }

    /// Restores the state `program` starts from.
    pub fn reset(&mut self, program: &Program) {
        *self = Self::from_program(program);
    }
}

#[cfg(test)]
mod tests {
    use super::MachineState;
    use crate::{Address, Instruction, Memory, Program};

    fn addr(raw: u16) -> Address {
        Address::new(raw).expect("test address fits in 12 bits")
    }

    fn sample_program() -> Program {
        let memory: Memory = [(addr(0x10), 5)].into_iter().collect();
        Program::new(memory, vec![Instruction::stop(1)])
    }

    #[test]
    fn fresh_state_copies_initial_memory() {
        let program = sample_program();
        let state = MachineState::from_program(&program);

        assert_eq!(state.accumulator(), 0);
        assert_eq!(state.program_counter(), 0);
        assert_eq!(state.memory(), program.initial_memory());
    }

    #[test]
    fn mutations_do_not_touch_program_image() {
        let program = sample_program();
        let mut state = MachineState::from_program(&program);
        state.memory_mut().write(addr(0x10), 99);
        state.memory_mut().write(addr(0x11), 1);

        assert_eq!(program.initial_memory().get(addr(0x10)), Some(5));
        assert!(!program.initial_memory().contains(addr(0x11)));
    }

    #[test]
    fn reset_restores_boot_values() {
        let program = sample_program();
        let mut state = MachineState::from_program(&program);
        state.set_accumulator(-7);
        state.set_program_counter(3);
        state.memory_mut().write(addr(0x10), 0);

        state.reset(&program);

        assert_eq!(state, MachineState::from_program(&program));
    }
}
