//! In-memory simulated board.
//!
//! Backs `--simulate` runs and the unit tests.  Buttons are pressed and
//! released programmatically (the console adapter maps stdin lines onto
//! them); every port call is recorded so tests can assert on the command
//! history.

use core::time::Duration;
use std::collections::{HashMap, HashSet};

use embedded_hal::digital::PinState;
use heapless::HistoryBuffer;
use parking_lot::Mutex;

use crate::app::ports::{PinMode, PinPort};
use crate::error::GpioError;
use crate::game::channel::Pin;
use crate::pins::{BUTTON_PRESSED, BUTTON_RELEASED, LED_OFF};

/// One recorded port call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardCall {
    Mode(Pin, PinMode),
    Drive(Pin, PinState),
    Tone(u32, Duration),
    Release,
}

/// Port calls kept for inspection.  Older calls are overwritten, so a
/// long `--simulate` session runs in bounded memory.
pub const CALL_HISTORY: usize = 256;

#[derive(Default)]
struct Pins {
    modes: HashMap<Pin, PinMode>,
    leds: HashMap<Pin, PinState>,
    held: HashSet<Pin>,
    calls: HistoryBuffer<BoardCall, CALL_HISTORY>,
    released: bool,
}

/// Simulated GPIO header with an optional buzzer.
#[derive(Default)]
pub struct SimBoard {
    pins: Mutex<Pins>,
    buzzer: bool,
}

impl SimBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// A board that reports tone support.
    pub fn with_buzzer() -> Self {
        Self {
            buzzer: true,
            ..Self::default()
        }
    }

    /// Hold `button` down until [`release_button`](Self::release_button).
    pub fn press_button(&self, button: Pin) {
        self.pins.lock().held.insert(button);
    }

    pub fn release_button(&self, button: Pin) {
        self.pins.lock().held.remove(&button);
    }

    /// Last level driven on `led`, if it was ever driven.
    pub fn led_level(&self, led: Pin) -> Option<PinState> {
        self.pins.lock().leds.get(&led).copied()
    }

    pub fn mode_of(&self, pin: Pin) -> Option<PinMode> {
        self.pins.lock().modes.get(&pin).copied()
    }

    /// The most recent port calls, oldest first.
    pub fn calls(&self) -> Vec<BoardCall> {
        self.pins.lock().calls.oldest_ordered().cloned().collect()
    }
}

impl PinPort for SimBoard {
    fn set_pin_mode(&self, pin: Pin, mode: PinMode) -> Result<(), GpioError> {
        let mut pins = self.pins.lock();
        pins.modes.insert(pin, mode);
        pins.calls.write(BoardCall::Mode(pin, mode));
        Ok(())
    }

    fn drive_led(&self, pin: Pin, level: PinState) {
        let mut pins = self.pins.lock();
        if pins.released {
            return;
        }
        pins.leds.insert(pin, level);
        pins.calls.write(BoardCall::Drive(pin, level));
    }

    fn read_button(&self, pin: Pin) -> PinState {
        if self.pins.lock().held.contains(&pin) {
            BUTTON_PRESSED
        } else {
            BUTTON_RELEASED
        }
    }

    fn supports_tone(&self) -> bool {
        self.buzzer
    }

    fn play_tone(&self, frequency_hz: u32, duration: Duration) {
        if !self.buzzer {
            return;
        }
        let mut pins = self.pins.lock();
        if !pins.released {
            pins.calls.write(BoardCall::Tone(frequency_hz, duration));
        }
    }

    fn release(&self) {
        let mut pins = self.pins.lock();
        if pins.released {
            return;
        }
        let leds: Vec<Pin> = pins
            .modes
            .iter()
            .filter(|(_, m)| **m == PinMode::Output)
            .map(|(p, _)| *p)
            .collect();
        for led in leds {
            pins.leds.insert(led, LED_OFF);
            pins.calls.write(BoardCall::Drive(led, LED_OFF));
        }
        pins.released = true;
        pins.calls.write(BoardCall::Release);
    }
}
