#![no_main]

use libfuzzer_sys::fuzz_target;
use mu0_core::{Controller, EngineConfig};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(program) = mu0_asm::parse(text) else {
        return;
    };

    let mut controller = Controller::with_config(program, EngineConfig::with_step_limit(4096));
    let outcome = controller.run();

    assert!(outcome.steps <= 4096);
    assert_eq!(controller.steps_executed(), outcome.steps);
    if outcome.is_terminal() {
        assert!(controller.run_state().is_terminal());
        assert_eq!(controller.advance_one(), outcome.final_step);
    }
});
