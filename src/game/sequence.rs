//! Sequence generation.
//!
//! A round's sequence is `level` channels drawn independently and
//! uniformly, with replacement, from the configured channel universe.
//! The same channel may therefore appear several times in a row.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use super::channel::{Channel, Pin};

/// The ordered list of channels the player must reproduce.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sequence {
    steps: Vec<Channel>,
}

impl Sequence {
    pub fn new(steps: Vec<Channel>) -> Self {
        Self { steps }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn steps(&self) -> &[Channel] {
        &self.steps
    }

    /// Expected button pins, in order.  This is what the referee checks.
    pub fn buttons(&self) -> Vec<Pin> {
        self.steps.iter().map(|c| c.button).collect()
    }

    pub fn leds(&self) -> Vec<Pin> {
        self.steps.iter().map(|c| c.led).collect()
    }

    pub fn names(&self) -> Vec<&str> {
        self.steps.iter().map(|c| c.name.as_str()).collect()
    }
}

/// Draws fresh sequences from an owned RNG.
pub struct SequenceGenerator {
    rng: StdRng,
}

impl SequenceGenerator {
    /// Generator seeded from the operating system.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic generator, for reproducible tests and replays.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Produce a sequence of exactly `level` channels from `channels`.
    ///
    /// `channels` must be non-empty (guaranteed by pinout validation);
    /// an empty universe yields an empty sequence rather than panicking.
    pub fn generate(&mut self, level: u32, channels: &[Channel]) -> Sequence {
        debug_assert!(!channels.is_empty(), "channel universe must not be empty");
        let steps = (0..level)
            .filter_map(|_| channels.choose(&mut self.rng).cloned())
            .collect();
        Sequence { steps }
    }
}
