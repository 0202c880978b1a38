//! Port traits: the hexagonal boundary between game logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ GameService (domain)
//! ```
//!
//! Driven adapters (GPIO board, debug log file, event sinks) implement these
//! traits.  Both game loops share one instance of each, so every method takes
//! `&self` and implementations synchronise internally.

use core::time::Duration;

use embedded_hal::digital::PinState;

use crate::error::GpioError;
use crate::game::channel::Pin;
use crate::game::sequence::Sequence;

// ───────────────────────────────────────────────────────────────
// Pin port (driven adapter: domain ↔ GPIO)
// ───────────────────────────────────────────────────────────────

/// Direction/bias requested for a pin at setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PinMode {
    /// Push-pull output (LEDs).
    Output,
    /// Input with pull-up (buttons).
    InputPullUp,
}

/// Actuator/sensor port: raw pin drive and read.
///
/// Levels are electrical; polarity (active-low LEDs and buttons) is the
/// caller's business, see [`crate::pins`].  Drive and read are assumed
/// infallible at this boundary: adapters log failures and carry on.
pub trait PinPort: Send + Sync {
    /// Configure a pin before first use.
    fn set_pin_mode(&self, pin: Pin, mode: PinMode) -> Result<(), GpioError>;

    /// Drive an output pin to `level`.
    fn drive_led(&self, pin: Pin, level: PinState);

    /// Sample an input pin.
    fn read_button(&self, pin: Pin) -> PinState;

    /// Whether [`play_tone`](Self::play_tone) makes any sound.
    fn supports_tone(&self) -> bool {
        false
    }

    /// Sound the buzzer at `frequency_hz`, blocking for `duration`.
    /// Boards without a buzzer keep the default no-op.
    fn play_tone(&self, _frequency_hz: u32, _duration: Duration) {}

    /// Put every pin in its safe state and release the hardware.
    /// Drives issued after release are ignored.
    fn release(&self);
}

// ───────────────────────────────────────────────────────────────
// Sequence log port (driven adapter: domain → debug log)
// ───────────────────────────────────────────────────────────────

/// Append-only record of every generated sequence.
pub trait SequenceLog: Send + Sync {
    /// Record the sequence shown for `level`.
    fn record(&self, level: u32, sequence: &Sequence);

    /// Flush and close.  Later records are dropped.
    fn close(&self);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The game emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: &super::events::AppEvent);
}
