//! Game domain: pure rules, zero I/O.
//!
//! This module holds the data model of a round (channels, sequences,
//! the shared [`GameState`](state::GameState) blackboard) and the two
//! pure algorithms the loops lean on: sequence generation and the
//! streaming round referee.

pub mod channel;
pub mod referee;
pub mod sequence;
pub mod state;

/// Why a game ended and was reset to level 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOverReason {
    /// A press did not match the expected button.
    WrongButton,
    /// The countdown ran out before the sequence was completed.
    Timeout,
    /// The last playable level was cleared.
    LevelCap,
}

impl core::fmt::Display for GameOverReason {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::WrongButton => write!(f, "wrong button"),
            Self::Timeout => write!(f, "timeout"),
            Self::LevelCap => write!(f, "level cap reached"),
        }
    }
}
