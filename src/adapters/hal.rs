//! [`PinPort`] over `embedded-hal` 1.0 digital pins.
//!
//! For boards whose HAL hands out typed pin objects: the caller converts
//! each line into its final mode (push-pull output for LEDs, pull-up input
//! for buttons) and registers it under its logical pin number.
//! `set_pin_mode` then only checks that the pin was registered in the
//! matching role and parks LEDs at their off level.
//!
//! Not selected by the `memgame` binary; embedding callers construct it.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use embedded_hal::digital::{InputPin, OutputPin, PinState};
use log::warn;
use parking_lot::Mutex;

use crate::app::ports::{PinMode, PinPort};
use crate::error::GpioError;
use crate::game::channel::Pin;
use crate::pins::{BUTTON_RELEASED, LED_OFF};

pub struct HalBoard<O, I> {
    leds: HashMap<Pin, Mutex<O>>,
    buttons: HashMap<Pin, Mutex<I>>,
    released: AtomicBool,
}

impl<O, I> HalBoard<O, I>
where
    O: OutputPin + Send,
    I: InputPin + Send,
{
    pub fn new() -> Self {
        Self {
            leds: HashMap::new(),
            buttons: HashMap::new(),
            released: AtomicBool::new(false),
        }
    }

    pub fn with_led(mut self, pin: Pin, output: O) -> Self {
        self.leds.insert(pin, Mutex::new(output));
        self
    }

    pub fn with_button(mut self, pin: Pin, input: I) -> Self {
        self.buttons.insert(pin, Mutex::new(input));
        self
    }

    fn set(&self, pin: Pin, level: PinState) {
        match self.leds.get(&pin) {
            Some(out) => {
                if let Err(e) = out.lock().set_state(level) {
                    warn!("GPIO{pin} drive failed: {e:?}");
                }
            }
            None => warn!("{}", GpioError::UnknownPin(pin)),
        }
    }
}

impl<O, I> Default for HalBoard<O, I>
where
    O: OutputPin + Send,
    I: InputPin + Send,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<O, I> PinPort for HalBoard<O, I>
where
    O: OutputPin + Send,
    I: InputPin + Send,
{
    fn set_pin_mode(&self, pin: Pin, mode: PinMode) -> Result<(), GpioError> {
        match mode {
            PinMode::Output if self.leds.contains_key(&pin) => {
                self.set(pin, LED_OFF);
                Ok(())
            }
            PinMode::InputPullUp if self.buttons.contains_key(&pin) => Ok(()),
            _ => Err(GpioError::UnknownPin(pin)),
        }
    }

    fn drive_led(&self, pin: Pin, level: PinState) {
        if !self.released.load(Ordering::Acquire) {
            self.set(pin, level);
        }
    }

    fn read_button(&self, pin: Pin) -> PinState {
        let Some(input) = self.buttons.get(&pin) else {
            return BUTTON_RELEASED;
        };
        match input.lock().is_low() {
            Ok(true) => PinState::Low,
            Ok(false) => PinState::High,
            Err(e) => {
                warn!("GPIO{pin} read failed: {e:?}");
                BUTTON_RELEASED
            }
        }
    }

    fn release(&self) {
        if self.released.swap(true, Ordering::AcqRel) {
            return;
        }
        for pin in self.leds.keys() {
            self.set(*pin, LED_OFF);
        }
    }
}
