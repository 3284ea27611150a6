#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Layout files come from users; malformed rows must be rejected, never panic.
    let _ = maze_config::read_maze_csv(data, "fuzz");
});
