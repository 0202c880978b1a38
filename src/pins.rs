//! Electrical conventions for the game board.
//!
//! Single source of truth for pin polarity; every driver references this
//! module rather than hard-coding levels.  The pin *numbers* come from the
//! pinout file (see [`crate::config`]); only the wiring conventions live here.
//!
//! Wiring matches the usual breakout-board build: LEDs sink current into the
//! GPIO (cathode on the pin), buttons short the pin to ground against the
//! internal pull-up.  Pin numbers are BCM.

use embedded_hal::digital::PinState;

// ---------------------------------------------------------------------------
// LEDs (active-low)
// ---------------------------------------------------------------------------

/// Level that lights an LED.
pub const LED_ON: PinState = PinState::Low;
/// Level that extinguishes an LED.  Also the safe level on shutdown.
pub const LED_OFF: PinState = PinState::High;

// ---------------------------------------------------------------------------
// Buttons (active-low with pull-up)
// ---------------------------------------------------------------------------

/// Level a button reads while held down.
pub const BUTTON_PRESSED: PinState = PinState::Low;
/// Level a button reads at rest (pulled up).
pub const BUTTON_RELEASED: PinState = PinState::High;

/// Whether a raw button reading means "pressed".
pub fn is_pressed(level: PinState) -> bool {
    level == BUTTON_PRESSED
}

// ---------------------------------------------------------------------------
// Buzzer (sysfs PWM)
// ---------------------------------------------------------------------------

/// Buzzer duty cycle as a fraction of the period, in percent.
pub const BUZZER_DUTY_PERCENT: u64 = 50;

// ---------------------------------------------------------------------------
// sysfs layout
// ---------------------------------------------------------------------------

/// Root of the legacy sysfs GPIO interface.
pub const SYSFS_GPIO_ROOT: &str = "/sys/class/gpio";
/// Root of the sysfs PWM interface.
pub const SYSFS_PWM_ROOT: &str = "/sys/class/pwm";
