//! Unified error types for the memory game.
//!
//! A single `Error` enum that every fallible startup path converts into,
//! keeping the binary's error handling uniform.  Nothing inside the game
//! loops returns these: timeouts, level caps and wrong presses are game
//! transitions, not failures.

use core::fmt;
use std::path::PathBuf;

use crate::game::channel::Pin;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible setup operation funnels into this type.
#[derive(Debug)]
pub enum Error {
    /// Pinout or tuning configuration is missing or invalid.
    Config(ConfigError),
    /// A GPIO line could not be configured.
    Gpio(GpioError),
    /// Generic I/O failure outside the pin layer (debug log, stdin).
    Io(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Gpio(e) => write!(f, "gpio: {e}"),
            Self::Io(e) => write!(f, "io: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The pinout file does not exist.
    NotFound(PathBuf),
    /// The file exists but could not be read or parsed.
    Malformed(String),
    /// The pinout defines no channels at all.
    NoChannels,
    /// Two channels share the same LED pin.
    DuplicateLedPin(Pin),
    /// Two channels share the same button pin.
    DuplicateButtonPin(Pin),
    /// A tuning field is out of range.  Names the field.
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(path) => write!(
                f,
                "{} not found; for a successful usage create a config.json first",
                path.display()
            ),
            Self::Malformed(msg) => write!(f, "malformed configuration: {msg}"),
            Self::NoChannels => write!(f, "configuration defines no channels"),
            Self::DuplicateLedPin(pin) => {
                write!(f, "LED pin {pin} is assigned twice; check led pin values")
            }
            Self::DuplicateButtonPin(pin) => {
                write!(f, "button pin {pin} is assigned twice; check btn pin values")
            }
            Self::Invalid(field) => write!(f, "invalid value for {field}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// GPIO errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GpioError {
    /// Exporting the line to user space failed.
    ExportFailed { pin: Pin, reason: String },
    /// Setting direction or bias failed.
    ModeFailed { pin: Pin, reason: String },
    /// The PWM channel for the buzzer could not be opened.
    PwmUnavailable(String),
    /// The pin is not part of this board.
    UnknownPin(Pin),
}

impl fmt::Display for GpioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExportFailed { pin, reason } => write!(f, "export of GPIO{pin} failed: {reason}"),
            Self::ModeFailed { pin, reason } => write!(f, "mode of GPIO{pin} failed: {reason}"),
            Self::PwmUnavailable(msg) => write!(f, "buzzer PWM unavailable: {msg}"),
            Self::UnknownPin(pin) => write!(f, "GPIO{pin} is not wired on this board"),
        }
    }
}

impl std::error::Error for GpioError {}

impl From<GpioError> for Error {
    fn from(e: GpioError) -> Self {
        Self::Gpio(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
