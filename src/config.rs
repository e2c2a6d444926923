//! Engine settings.

use std::time::Duration;

/// Number of random turns in a shuffle.
pub const SHUFFLE_LENGTH: usize = 20;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    /// How long the presentation layer takes to play one turn.
    pub turn_duration: Duration,
    /// How long one shape transition step takes.
    pub shape_step_duration: Duration,
    pub shuffle_length: usize,
    /// Seed for shuffles; `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            turn_duration: Duration::from_millis(250),
            shape_step_duration: Duration::from_millis(600),
            shuffle_length: SHUFFLE_LENGTH,
            seed: None,
        }
    }
}

impl EngineConfig {
    /// A default configuration with a fixed shuffle seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }
}
