//! Channel: one LED/button position on the board.

/// BCM GPIO number.
pub type Pin = u8;

/// A configured (LED, button, optional tone) triple.
///
/// Immutable after startup.  The ordered list of channels defines the
/// universe that sequences are drawn from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Channel {
    /// Name from the pinout file (e.g. `"red"`).
    pub name: String,
    pub led: Pin,
    pub button: Pin,
    /// Buzzer frequency played with this channel, if any.
    pub tone_hz: Option<u32>,
}

impl Channel {
    pub fn new(name: impl Into<String>, led: Pin, button: Pin) -> Self {
        Self {
            name: name.into(),
            led,
            button,
            tone_hz: None,
        }
    }

    pub fn with_tone(mut self, hz: u32) -> Self {
        self.tone_hz = Some(hz);
        self
    }
}

impl core::fmt::Display for Channel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} (led={}, btn={})", self.name, self.led, self.button)
    }
}
