//! Round referee: streaming comparison of presses against the sequence.
//!
//! Called after every recorded press.  The input buffer and the expected
//! button list are aligned index by index:
//!
//! | input[i]  | expected[i] | effect                           |
//! |-----------|-------------|----------------------------------|
//! | press `p` | `e`, p == e | position satisfied               |
//! | press `p` | `e`, p != e | **Failure**, evaluation stops    |
//! | press `p` | (none)      | **Failure** (press past the end) |
//! | (none)    | `e`         | still waiting for this position  |
//!
//! The outcome is **Success** only once every expected position holds a
//! matching press; otherwise it stays **Pending**.  The function is pure,
//! so re-evaluating unchanged input always yields the same outcome.

use super::channel::Pin;

/// Tri-state result of the current round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Outcome {
    #[default]
    Pending,
    Success,
    Failure,
}

impl Outcome {
    /// Whether the round has been decided either way.
    pub fn is_decided(self) -> bool {
        self != Self::Pending
    }
}

/// Compare `input` against `expected`.
///
/// An empty `expected` means no round is installed yet; nothing can be
/// decided against it and the result is `Pending`.
pub fn evaluate(input: &[Pin], expected: &[Pin]) -> Outcome {
    if expected.is_empty() {
        return Outcome::Pending;
    }

    for (i, pressed) in input.iter().enumerate() {
        match expected.get(i) {
            Some(want) if want == pressed => {}
            _ => return Outcome::Failure,
        }
    }

    if input.len() == expected.len() {
        Outcome::Success
    } else {
        Outcome::Pending
    }
}
