//! Random choice abstraction.
//!
//! In production this wraps the thread-local generator. Tests inject a
//! scripted implementation so random picks are repeatable.

use rand::Rng as _;

/// Abstraction over uniform random index selection.
pub trait RandomSource: Send {
    /// Returns a uniformly distributed index in `[0, len)`.
    ///
    /// `len` must be greater than zero; callers check for empty
    /// collections before picking.
    fn next_index(&mut self, len: usize) -> usize;
}

/// Production source backed by the thread-local generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRngSource;

impl RandomSource for ThreadRngSource {
    fn next_index(&mut self, len: usize) -> usize {
        rand::rng().random_range(0..len)
    }
}
