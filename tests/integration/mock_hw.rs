//! Mock adapters for integration tests.
//!
//! `MockBoard` records every LED drive and lets tests hold buttons down;
//! `MockLog` and `EventRecorder` capture what the game writes out.

use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

use embedded_hal::digital::PinState;
use memgame::app::events::AppEvent;
use memgame::app::ports::{EventSink, PinMode, PinPort, SequenceLog};
use memgame::config::GameConfig;
use memgame::error::GpioError;
use memgame::game::channel::{Channel, Pin};
use memgame::game::sequence::Sequence;
use memgame::pins::{BUTTON_PRESSED, BUTTON_RELEASED};
use parking_lot::Mutex;

// ── MockBoard ─────────────────────────────────────────────────

#[derive(Default)]
struct BoardState {
    modes: HashMap<Pin, PinMode>,
    leds: HashMap<Pin, PinState>,
    held: HashSet<Pin>,
    drives: usize,
    drives_after_release: usize,
    releases: usize,
}

#[derive(Default)]
pub struct MockBoard {
    inner: Mutex<BoardState>,
}

#[allow(dead_code)]
impl MockBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hold(&self, button: Pin) {
        self.inner.lock().held.insert(button);
    }

    pub fn let_go(&self, button: Pin) {
        self.inner.lock().held.remove(&button);
    }

    pub fn led(&self, pin: Pin) -> Option<PinState> {
        self.inner.lock().leds.get(&pin).copied()
    }

    pub fn mode(&self, pin: Pin) -> Option<PinMode> {
        self.inner.lock().modes.get(&pin).copied()
    }

    pub fn releases(&self) -> usize {
        self.inner.lock().releases
    }

    pub fn drives(&self) -> usize {
        self.inner.lock().drives
    }

    pub fn drives_after_release(&self) -> usize {
        self.inner.lock().drives_after_release
    }
}

impl PinPort for MockBoard {
    fn set_pin_mode(&self, pin: Pin, mode: PinMode) -> Result<(), GpioError> {
        self.inner.lock().modes.insert(pin, mode);
        Ok(())
    }

    fn drive_led(&self, pin: Pin, level: PinState) {
        let mut s = self.inner.lock();
        if s.releases > 0 {
            s.drives_after_release += 1;
            return;
        }
        s.drives += 1;
        s.leds.insert(pin, level);
    }

    fn read_button(&self, pin: Pin) -> PinState {
        if self.inner.lock().held.contains(&pin) {
            BUTTON_PRESSED
        } else {
            BUTTON_RELEASED
        }
    }

    fn release(&self) {
        let mut s = self.inner.lock();
        s.releases += 1;
        let outputs: Vec<Pin> = s
            .modes
            .iter()
            .filter(|(_, m)| **m == PinMode::Output)
            .map(|(p, _)| *p)
            .collect();
        for pin in outputs {
            s.leds.insert(pin, memgame::pins::LED_OFF);
        }
    }
}

// ── MockLog ───────────────────────────────────────────────────

#[derive(Default)]
pub struct MockLog {
    lines: Mutex<Vec<(u32, Vec<String>)>>,
    closed: Mutex<bool>,
}

#[allow(dead_code)]
impl MockLog {
    pub fn levels(&self) -> Vec<u32> {
        self.lines.lock().iter().map(|(l, _)| *l).collect()
    }

    pub fn is_closed(&self) -> bool {
        *self.closed.lock()
    }
}

impl SequenceLog for MockLog {
    fn record(&self, level: u32, sequence: &Sequence) {
        if *self.closed.lock() {
            return;
        }
        let names = sequence.names().into_iter().map(str::to_owned).collect();
        self.lines.lock().push((level, names));
    }

    fn close(&self) {
        *self.closed.lock() = true;
    }
}

// ── EventRecorder ─────────────────────────────────────────────

#[derive(Default)]
pub struct EventRecorder {
    seen: Mutex<Vec<AppEvent>>,
}

#[allow(dead_code)]
impl EventRecorder {
    pub fn all(&self) -> Vec<AppEvent> {
        self.seen.lock().clone()
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.seen.lock().iter().filter(|e| pred(e)).count()
    }

    /// Block until `pred` has matched `n` events, or `timeout`.
    pub fn wait_for(&self, n: usize, timeout: Duration, pred: impl Fn(&AppEvent) -> bool) -> bool {
        wait_until(timeout, || self.count(&pred) >= n)
    }
}

impl EventSink for EventRecorder {
    fn emit(&self, event: &AppEvent) {
        self.seen.lock().push(event.clone());
    }
}

// ── Helpers ───────────────────────────────────────────────────

pub fn wait_until(timeout: Duration, mut cond: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(1));
    }
    cond()
}

pub fn channels() -> Vec<Channel> {
    vec![
        Channel::new("red", 17, 27),
        Channel::new("green", 22, 23),
        Channel::new("blue", 24, 25),
        Channel::new("yellow", 5, 6),
    ]
}

/// Millisecond-scale timings for whole-game tests.
pub fn fast_config() -> GameConfig {
    GameConfig {
        sample_interval_ms: 1,
        state_poll_interval_ms: 5,
        round_budget_ms: 5_000,
        flourish_step_ms: 0,
        pre_sequence_pause_ms: 0,
        step_on_ms: 0,
        step_gap_ms: 0,
        feedback_flash_ms: 0,
        tone_ms: 0,
        ..GameConfig::default()
    }
}
