//! GameState under concurrent access from a presser and a round installer.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use memgame::game::referee::Outcome;
use memgame::game::state::{GameState, INPUT_CAPACITY, PressRecord};

fn marker(epoch: u64) -> u8 {
    (epoch % 250) as u8
}

/// Every round expects a run of its own marker, so a buffer holding
/// presses from two rounds would show two different values.
#[test]
fn input_never_mixes_rounds() {
    let state = Arc::new(GameState::new(Duration::from_secs(15)));
    state.install_round(vec![marker(1); INPUT_CAPACITY]);
    let stop = Arc::new(AtomicBool::new(false));

    let presser = {
        let state = Arc::clone(&state);
        let stop = Arc::clone(&stop);
        thread::spawn(move || {
            let mut recorded = 0u64;
            while !stop.load(Ordering::Acquire) {
                let epoch = state.epoch();
                if let PressRecord::Recorded(_) = state.record_press(epoch, marker(epoch)) {
                    recorded += 1;
                }
            }
            recorded
        })
    };

    let installer = {
        let state = Arc::clone(&state);
        thread::spawn(move || {
            for _ in 0..2_000 {
                let next = state.epoch() + 1;
                state.install_round(vec![marker(next); INPUT_CAPACITY]);
                let snap = state.snapshot();
                assert!(snap.input.iter().all(|b| *b == marker(snap.epoch)));
            }
        })
    };

    for _ in 0..500 {
        let snap = state.snapshot();
        assert!(
            snap.input.iter().all(|b| *b == marker(snap.epoch)),
            "round {} holds foreign presses: {:?}",
            snap.epoch,
            snap.input
        );
        assert_ne!(snap.outcome, Outcome::Failure);
    }

    installer.join().unwrap();
    stop.store(true, Ordering::Release);
    assert!(presser.join().unwrap() > 0);
}

#[test]
fn stale_press_after_install_is_rejected() {
    let state = GameState::new(Duration::from_secs(15));
    let first = state.install_round(vec![1, 2]);
    assert_eq!(state.record_press(first, 1), PressRecord::Recorded(Outcome::Pending));

    state.install_round(vec![3]);
    assert_eq!(state.record_press(first, 2), PressRecord::StaleRound);

    let snap = state.snapshot();
    assert!(snap.input.is_empty());
    assert_eq!(snap.outcome, Outcome::Pending);
}

#[test]
fn shutdown_wakes_a_waiting_machine() {
    let state = Arc::new(GameState::new(Duration::from_secs(15)));
    state.install_round(vec![1, 2, 3]);

    let waiter = {
        let state = Arc::clone(&state);
        thread::spawn(move || state.wait_for_outcome(Duration::from_secs(10)))
    };
    thread::sleep(Duration::from_millis(20));
    state.request_shutdown();

    assert_eq!(waiter.join().unwrap(), Outcome::Pending);
    assert!(state.is_shutting_down());
}

#[test]
fn countdown_keeps_running_past_zero() {
    let state = GameState::new(Duration::from_millis(30));
    for _ in 0..5 {
        state.tick_countdown(Duration::from_millis(10));
    }
    assert_eq!(state.countdown_ms(), -20);
    assert!(state.countdown_expired());

    state.reset_countdown();
    assert_eq!(state.countdown_ms(), 30);
}
