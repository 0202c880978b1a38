//! Property tests for the sequence generator, the referee and the shared
//! round book.

use std::time::Duration;

use memgame::game::channel::{Channel, Pin};
use memgame::game::referee::{Outcome, evaluate};
use memgame::game::sequence::SequenceGenerator;
use memgame::game::state::{GameState, INPUT_CAPACITY, PressRecord};
use proptest::prelude::*;

fn universe(n: usize) -> Vec<Channel> {
    (0..n)
        .map(|i| Channel::new(format!("ch{i}"), (2 * i) as Pin, (2 * i + 1) as Pin))
        .collect()
}

fn buttons() -> impl Strategy<Value = Vec<Pin>> {
    proptest::collection::vec(0u8..8, 1..=INPUT_CAPACITY)
}

// ── Sequence generation ───────────────────────────────────────

proptest! {
    #[test]
    fn generated_sequence_has_level_steps_from_universe(
        seed in any::<u64>(),
        n in 1usize..=8,
        level in 1u32..=32,
    ) {
        let channels = universe(n);
        let seq = SequenceGenerator::seeded(seed).generate(level, &channels);
        prop_assert_eq!(seq.len(), level as usize);
        for step in seq.steps() {
            prop_assert!(channels.contains(step));
        }
        prop_assert_eq!(seq.buttons().len(), seq.leds().len());
    }

    #[test]
    fn same_seed_same_sequence(seed in any::<u64>(), level in 1u32..=16) {
        let channels = universe(4);
        let a = SequenceGenerator::seeded(seed).generate(level, &channels);
        let b = SequenceGenerator::seeded(seed).generate(level, &channels);
        prop_assert_eq!(a, b);
    }
}

// ── Referee ───────────────────────────────────────────────────

proptest! {
    #[test]
    fn every_proper_prefix_is_pending(expected in buttons()) {
        for cut in 0..expected.len() {
            prop_assert_eq!(evaluate(&expected[..cut], &expected), Outcome::Pending);
        }
    }

    #[test]
    fn full_match_is_success(expected in buttons()) {
        prop_assert_eq!(evaluate(&expected, &expected), Outcome::Success);
    }

    #[test]
    fn first_mismatch_fails_whatever_follows(
        expected in buttons(),
        at in any::<prop::sample::Index>(),
        tail in proptest::collection::vec(0u8..8, 0..4),
    ) {
        let at = at.index(expected.len());
        let mut input = expected[..at].to_vec();
        input.push(expected[at].wrapping_add(1));
        input.extend(tail);
        prop_assert_eq!(evaluate(&input, &expected), Outcome::Failure);
    }

    #[test]
    fn press_past_the_end_fails(expected in buttons(), extra in 0u8..8) {
        let mut input = expected.clone();
        input.push(extra);
        prop_assert_eq!(evaluate(&input, &expected), Outcome::Failure);
    }

    #[test]
    fn evaluation_is_idempotent(
        expected in buttons(),
        input in proptest::collection::vec(0u8..8, 0..=INPUT_CAPACITY),
    ) {
        prop_assert_eq!(evaluate(&input, &expected), evaluate(&input, &expected));
    }
}

// ── Round book ────────────────────────────────────────────────

proptest! {
    /// Feeding presses one at a time through the shared state ends in the
    /// same verdict as judging the whole input at once, and the verdict
    /// never changes after it is first reached.
    #[test]
    fn recorded_outcome_matches_batch_verdict(
        expected in buttons(),
        input in proptest::collection::vec(0u8..8, 1..=INPUT_CAPACITY),
    ) {
        let state = GameState::new(Duration::from_secs(15));
        let epoch = state.install_round(expected.clone());

        let mut fed = Vec::new();
        for press in input {
            match state.record_press(epoch, press) {
                PressRecord::Recorded(outcome) => {
                    fed.push(press);
                    prop_assert_eq!(outcome, evaluate(&fed, &expected));
                }
                PressRecord::RoundDecided(outcome) => {
                    prop_assert!(outcome.is_decided());
                    prop_assert_eq!(outcome, evaluate(&fed, &expected));
                }
                other => prop_assert!(false, "unexpected {:?}", other),
            }
        }
        prop_assert_eq!(state.snapshot().input, fed);
    }
}
