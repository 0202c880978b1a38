//! Outbound game events.
//!
//! The game loops emit these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them: log to the console, count them in
//! tests, etc.

use crate::game::GameOverReason;
use crate::game::channel::Pin;
use crate::game::referee::Outcome;

/// Structured events emitted by the game core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// Pins are set up and the loops are about to start.
    Started { channels: usize },

    /// A sequence has been shown and the round now accepts input.
    RoundStarted { level: u32, length: usize },

    /// A press was registered.  Carries the outcome after the referee ran.
    Press {
        channel: String,
        button: Pin,
        outcome: Outcome,
    },

    /// The previous round was cleared.
    LevelUp { level: u32 },

    /// The game ended at `level` and is being reset.
    GameOver { level: u32, reason: GameOverReason },

    /// Orderly shutdown finished; pins are released.
    Stopped,
}
