//! Shared game state touched by both long-running loops.
//!
//! `GameState` is the blackboard between the input sampler and the game
//! state machine.  Fields are grouped by who writes them:
//!
//! ```text
//!   InputSampler ──record_press──▶ ┌──────────────────────────┐
//!                                  │ RoundBook (mutex)        │
//!                                  │  epoch · expected ·      │
//!   StateMachine ──install_round─▶ │  input · outcome         │──▶ outcome_changed
//!                                  └──────────────────────────┘
//!   InputSampler ──tick_countdown─▶ countdown_ms (atomic)
//!   StateMachine ──level / restarting / reset ─▶ atomics
//! ```
//!
//! Appending a press and clearing the buffer take the same lock, and every
//! press carries the round epoch observed when its tick was dispatched, so
//! a buffer can never hold presses from two different rounds.

use core::sync::atomic::{AtomicBool, AtomicI64, AtomicU32, Ordering};
use core::time::Duration;

use log::debug;
use parking_lot::{Condvar, Mutex};

use super::channel::Pin;
use super::referee::{self, Outcome};

/// Maximum number of presses held for one round.
/// Presses past the sequence end fail the round, so this only needs
/// headroom above the longest playable sequence.
pub const INPUT_CAPACITY: usize = 32;

/// What happened to a press handed to [`GameState::record_press`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressRecord {
    /// Appended; carries the outcome after re-evaluation.
    Recorded(Outcome),
    /// The round was already decided; the press was ignored.
    RoundDecided(Outcome),
    /// The press belongs to a tick from an earlier round.
    StaleRound,
    /// The input buffer is full.
    BufferFull,
}

/// Point-in-time copy of the round data, for inspection and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundSnapshot {
    pub epoch: u64,
    pub expected: Vec<Pin>,
    pub input: Vec<Pin>,
    pub outcome: Outcome,
}

#[derive(Debug, Default)]
struct RoundBook {
    epoch: u64,
    expected: Vec<Pin>,
    input: heapless::Vec<Pin, INPUT_CAPACITY>,
    outcome: Outcome,
}

/// The shared aggregate.  Wrap in an `Arc` and hand a clone to each loop.
pub struct GameState {
    round: Mutex<RoundBook>,
    outcome_changed: Condvar,
    countdown_ms: AtomicI64,
    level: AtomicU32,
    restarting: AtomicBool,
    shutdown: AtomicBool,
    budget_ms: i64,
}

impl GameState {
    /// Fresh state at level 1 with a full countdown.
    pub fn new(round_budget: Duration) -> Self {
        let budget_ms = round_budget.as_millis() as i64;
        Self {
            round: Mutex::new(RoundBook::default()),
            outcome_changed: Condvar::new(),
            countdown_ms: AtomicI64::new(budget_ms),
            level: AtomicU32::new(1),
            restarting: AtomicBool::new(false),
            shutdown: AtomicBool::new(false),
            budget_ms,
        }
    }

    // ── Level ─────────────────────────────────────────────────

    pub fn level(&self) -> u32 {
        self.level.load(Ordering::Acquire)
    }

    /// Advance to the next level and return it.
    pub fn increment_level(&self) -> u32 {
        self.level.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// Back to level 1 with a full countdown.
    pub fn reset_progress(&self) {
        self.level.store(1, Ordering::Release);
        self.reset_countdown();
    }

    // ── Countdown ─────────────────────────────────────────────

    pub fn countdown_ms(&self) -> i64 {
        self.countdown_ms.load(Ordering::Acquire)
    }

    pub fn reset_countdown(&self) {
        self.countdown_ms.store(self.budget_ms, Ordering::Release);
    }

    /// Consume one sampler tick from the countdown.
    pub fn tick_countdown(&self, interval: Duration) {
        self.countdown_ms
            .fetch_sub(interval.as_millis() as i64, Ordering::AcqRel);
    }

    pub fn countdown_expired(&self) -> bool {
        self.countdown_ms() <= 0
    }

    // ── Restarting guard ──────────────────────────────────────

    pub fn is_restarting(&self) -> bool {
        self.restarting.load(Ordering::Acquire)
    }

    /// Suppress press registration until [`end_restart`](Self::end_restart).
    pub fn begin_restart(&self) {
        self.restarting.store(true, Ordering::Release);
    }

    pub fn end_restart(&self) {
        self.restarting.store(false, Ordering::Release);
    }

    // ── Round book ────────────────────────────────────────────

    /// Epoch of the round currently accepting presses.
    pub fn epoch(&self) -> u64 {
        self.round.lock().epoch
    }

    pub fn outcome(&self) -> Outcome {
        self.round.lock().outcome
    }

    /// Start a new round: clear the input buffer, install the expected
    /// buttons and reset the outcome.  Returns the new epoch.
    pub fn install_round(&self, expected: Vec<Pin>) -> u64 {
        let mut book = self.round.lock();
        book.epoch += 1;
        book.expected = expected;
        book.input.clear();
        book.outcome = Outcome::Pending;
        debug!("round {} installed ({} steps)", book.epoch, book.expected.len());
        book.epoch
    }

    /// Append a press for the round with the given `epoch` and re-run the
    /// referee.  A decided round keeps its outcome until the next
    /// [`install_round`](Self::install_round).
    pub fn record_press(&self, epoch: u64, button: Pin) -> PressRecord {
        let mut book = self.round.lock();
        if book.epoch != epoch {
            return PressRecord::StaleRound;
        }
        if book.outcome.is_decided() {
            return PressRecord::RoundDecided(book.outcome);
        }
        if book.input.push(button).is_err() {
            return PressRecord::BufferFull;
        }

        let outcome = referee::evaluate(&book.input, &book.expected);
        book.outcome = outcome;
        if outcome.is_decided() {
            self.outcome_changed.notify_all();
        }
        PressRecord::Recorded(outcome)
    }

    /// Block until the outcome leaves `Pending`, shutdown is requested, or
    /// `timeout` elapses.  Returns the outcome seen on wake-up.
    pub fn wait_for_outcome(&self, timeout: Duration) -> Outcome {
        let mut book = self.round.lock();
        if book.outcome == Outcome::Pending && !self.is_shutting_down() {
            let _ = self.outcome_changed.wait_for(&mut book, timeout);
        }
        book.outcome
    }

    pub fn snapshot(&self) -> RoundSnapshot {
        let book = self.round.lock();
        RoundSnapshot {
            epoch: book.epoch,
            expected: book.expected.clone(),
            input: book.input.to_vec(),
            outcome: book.outcome,
        }
    }

    // ── Shutdown ──────────────────────────────────────────────

    pub fn request_shutdown(&self) {
        self.shutdown.store(true, Ordering::Release);
        // Take the lock so a waiter between its check and its wait
        // cannot miss the notification.
        let _book = self.round.lock();
        self.outcome_changed.notify_all();
    }

    pub fn is_shutting_down(&self) -> bool {
        self.shutdown.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    fn state() -> GameState {
        GameState::new(Duration::from_secs(15))
    }

    #[test]
    fn starts_at_level_one_with_full_budget() {
        let s = state();
        assert_eq!(s.level(), 1);
        assert_eq!(s.countdown_ms(), 15_000);
        assert!(!s.is_restarting());
        assert_eq!(s.outcome(), Outcome::Pending);
    }

    #[test]
    fn countdown_ticks_down_exactly() {
        let s = state();
        for _ in 0..1500 {
            s.tick_countdown(Duration::from_millis(10));
        }
        assert_eq!(s.countdown_ms(), 0);
        assert!(s.countdown_expired());
    }

    #[test]
    fn press_for_old_epoch_is_dropped() {
        let s = state();
        let old = s.install_round(vec![1, 2]);
        let _new = s.install_round(vec![3]);
        assert_eq!(s.record_press(old, 1), PressRecord::StaleRound);
        assert!(s.snapshot().input.is_empty());
    }

    #[test]
    fn success_latches_until_next_round() {
        let s = state();
        let epoch = s.install_round(vec![4]);
        assert_eq!(s.record_press(epoch, 4), PressRecord::Recorded(Outcome::Success));
        assert_eq!(
            s.record_press(epoch, 9),
            PressRecord::RoundDecided(Outcome::Success)
        );
        assert_eq!(s.outcome(), Outcome::Success);

        s.install_round(vec![4, 4]);
        let snap = s.snapshot();
        assert!(snap.input.is_empty());
        assert_eq!(snap.outcome, Outcome::Pending);
    }

    #[test]
    fn buffer_full_is_reported() {
        let s = state();
        let expected = vec![7; INPUT_CAPACITY + 1];
        let epoch = s.install_round(expected);
        for _ in 0..INPUT_CAPACITY {
            assert_eq!(s.record_press(epoch, 7), PressRecord::Recorded(Outcome::Pending));
        }
        assert_eq!(s.record_press(epoch, 7), PressRecord::BufferFull);
    }

    #[test]
    fn reset_progress_restores_level_and_budget() {
        let s = state();
        s.increment_level();
        s.increment_level();
        s.tick_countdown(Duration::from_secs(20));
        s.reset_progress();
        assert_eq!(s.level(), 1);
        assert_eq!(s.countdown_ms(), 15_000);
    }

    #[test]
    fn waiter_wakes_on_decision() {
        let s = Arc::new(state());
        let epoch = s.install_round(vec![1]);
        let waiter = {
            let s = Arc::clone(&s);
            thread::spawn(move || s.wait_for_outcome(Duration::from_secs(5)))
        };
        thread::sleep(Duration::from_millis(20));
        s.record_press(epoch, 2);
        assert_eq!(waiter.join().unwrap(), Outcome::Failure);
    }

    #[test]
    fn waiter_times_out_while_pending() {
        let s = state();
        s.install_round(vec![1, 2]);
        assert_eq!(s.wait_for_outcome(Duration::from_millis(5)), Outcome::Pending);
    }
}
