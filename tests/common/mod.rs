//! Shared helpers for integration tests.

#![allow(dead_code)]

use redblack::{Llrb, NodeStore};
use simplelog::{Config, LevelFilter, TestLogger};

/// Routes `log` output through the test harness so it shows up for failing tests.
pub fn init_logger(level: LevelFilter) {
    let _ = TestLogger::init(level, Config::default());
}

/// Asserts every tree invariant, dumping the tree on failure.
pub fn assert_valid<V, S>(tree: &Llrb<i32, V, S>)
where
    V: std::fmt::Display,
    S: NodeStore<i32, V>,
{
    if let Err(error) = tree.validate() {
        panic!("invariant violated: {error}\n{tree}");
    }
}

/// The English name of a small number, used as a sample value.
pub fn name(number: i32) -> String {
    const NAMES: [&str; 11] = [
        "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten",
    ];
    usize::try_from(number)
        .ok()
        .and_then(|index| NAMES.get(index))
        .map_or_else(|| number.to_string(), |name| (*name).to_string())
}
