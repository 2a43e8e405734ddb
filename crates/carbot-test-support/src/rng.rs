//! Test randomness — deterministic `RandomSource` implementations.

use carbot_core::rng::RandomSource;

/// A source that always picks index 0. Suitable for tests that do not
/// depend on which entry is picked.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstPick;

impl RandomSource for FirstPick {
    fn next_index(&mut self, _len: usize) -> usize {
        0
    }
}

/// A source that returns indexes from a predetermined sequence. Panics
/// if the sequence is exhausted. Used in tests that need specific,
/// repeatable picks.
#[derive(Debug)]
pub struct SequencePick {
    values: Vec<usize>,
    index: usize,
}

impl SequencePick {
    /// Create a new `SequencePick` with the given indexes.
    #[must_use]
    pub fn new(values: Vec<usize>) -> Self {
        Self { values, index: 0 }
    }
}

impl RandomSource for SequencePick {
    fn next_index(&mut self, _len: usize) -> usize {
        let val = self.values[self.index];
        self.index += 1;
        val
    }
}
