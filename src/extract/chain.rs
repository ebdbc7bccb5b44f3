//! Ordered strategy chains
//!
//! Every fixed-order cascade in the extractors (brand, rank, seller name,
//! price, dispatch classification) is a slice of [`Strategy`] values sharing
//! one signature, evaluated until the first one produces a value.

use tracing::trace;

/// One named step of a cascade
pub struct Strategy<I, T> {
    name: &'static str,
    run: fn(I) -> Option<T>,
}

impl<I, T> Strategy<I, T> {
    pub const fn new(name: &'static str, run: fn(I) -> Option<T>) -> Self {
        Self { name, run }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn apply(&self, input: I) -> Option<T> {
        (self.run)(input)
    }
}

/// Runs `chain` in order and returns the first produced value with the name
/// of the strategy that produced it
pub fn first_success_named<I: Copy, T>(
    input: I,
    chain: &[Strategy<I, T>],
) -> Option<(&'static str, T)> {
    chain.iter().find_map(|strategy| {
        let value = strategy.apply(input)?;
        trace!(strategy = strategy.name, "strategy matched");
        Some((strategy.name, value))
    })
}

/// Runs `chain` in order and returns the first produced value
pub fn first_success<I: Copy, T>(input: I, chain: &[Strategy<I, T>]) -> Option<T> {
    first_success_named(input, chain).map(|(_, value)| value)
}
