//! Game configuration
//!
//! Two sources:
//!
//! - the **pinout** (`config.json`): an ordered mapping of channel name to
//!   `{ "Led": pin, "Btn": pin, "Sound": hz? }`, loaded once at startup;
//! - the **tuning** ([`GameConfig`]): timing parameters with sensible
//!   defaults, optionally overridden from a JSON file.

use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::game::channel::{Channel, Pin};
use crate::game::state::INPUT_CAPACITY;

// ═══════════════════════════════════════════════════════════════
//  Pinout
// ═══════════════════════════════════════════════════════════════

#[derive(Debug, Deserialize)]
struct RawChannel {
    #[serde(rename = "Led")]
    led: Pin,
    #[serde(rename = "Btn")]
    button: Pin,
    #[serde(rename = "Sound", default)]
    sound: Option<u32>,
}

/// Validated channel list.  Order follows the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pinout {
    channels: Vec<Channel>,
}

impl Pinout {
    /// Read and validate the pinout file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Malformed(format!("{}: {e}", path.display())))?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let map: serde_json::Map<String, serde_json::Value> =
            serde_json::from_str(text).map_err(|e| ConfigError::Malformed(e.to_string()))?;

        let mut channels = Vec::with_capacity(map.len());
        for (name, value) in map {
            let raw: RawChannel = serde_json::from_value(value)
                .map_err(|e| ConfigError::Malformed(format!("channel {name:?}: {e}")))?;
            if raw.sound == Some(0) {
                return Err(ConfigError::Malformed(format!(
                    "channel {name:?}: Sound must be a positive frequency"
                )));
            }
            channels.push(Channel {
                name,
                led: raw.led,
                button: raw.button,
                tone_hz: raw.sound,
            });
        }
        Self::from_channels(channels)
    }

    /// Validate an already-built channel list.
    pub fn from_channels(channels: Vec<Channel>) -> Result<Self, ConfigError> {
        if channels.is_empty() {
            return Err(ConfigError::NoChannels);
        }

        let mut leds = HashSet::new();
        let mut buttons = HashSet::new();
        for ch in &channels {
            if !leds.insert(ch.led) {
                return Err(ConfigError::DuplicateLedPin(ch.led));
            }
            if !buttons.insert(ch.button) {
                return Err(ConfigError::DuplicateButtonPin(ch.button));
            }
        }

        Ok(Self { channels })
    }

    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    pub fn into_channels(self) -> Vec<Channel> {
        self.channels
    }

    /// Whether any channel configures a buzzer tone.
    pub fn has_tones(&self) -> bool {
        self.channels.iter().any(|c| c.tone_hz.is_some())
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tuning
// ═══════════════════════════════════════════════════════════════

/// Timing parameters for the game loops and presentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // --- Loops ---
    /// Input sampler cadence (milliseconds)
    pub sample_interval_ms: u64,
    /// State machine poll cadence (milliseconds)
    pub state_poll_interval_ms: u64,

    // --- Rules ---
    /// Time the player has to enter a sequence (milliseconds)
    pub round_budget_ms: u64,
    /// Highest playable level; clearing it ends the game
    pub max_level: u32,

    // --- Presentation ---
    /// Per-LED on time during the flourish chase (milliseconds)
    pub flourish_step_ms: u64,
    /// Pause between the flourish and the sequence (milliseconds)
    pub pre_sequence_pause_ms: u64,
    /// On time of each sequence step (milliseconds)
    pub step_on_ms: u64,
    /// Dark gap after each sequence step (milliseconds)
    pub step_gap_ms: u64,
    /// LED flash when a press is registered (milliseconds)
    pub feedback_flash_ms: u64,
    /// Longest buzzer tone per step or press (milliseconds)
    pub tone_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            // Loops
            sample_interval_ms: 10,      // 100 Hz
            state_poll_interval_ms: 100, // 10 Hz

            // Rules
            round_budget_ms: 15_000,
            max_level: 10,

            // Presentation
            flourish_step_ms: 500,
            pre_sequence_pause_ms: 1000,
            step_on_ms: 5000,
            step_gap_ms: 500,
            feedback_flash_ms: 1000,
            tone_ms: 300,
        }
    }
}

impl GameConfig {
    /// Load tuning overrides from a JSON file.  Absent fields keep defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Malformed(format!("{}: {e}", path.display())))?;
        let config: Self =
            serde_json::from_str(&text).map_err(|e| ConfigError::Malformed(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the loops cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_interval_ms == 0 {
            return Err(ConfigError::Invalid("sample_interval_ms"));
        }
        if self.state_poll_interval_ms == 0 {
            return Err(ConfigError::Invalid("state_poll_interval_ms"));
        }
        if self.round_budget_ms == 0 {
            return Err(ConfigError::Invalid("round_budget_ms"));
        }
        if self.max_level == 0 || self.max_level as usize > INPUT_CAPACITY {
            return Err(ConfigError::Invalid("max_level"));
        }
        Ok(())
    }

    pub fn sample_interval(&self) -> Duration {
        Duration::from_millis(self.sample_interval_ms)
    }

    pub fn state_poll_interval(&self) -> Duration {
        Duration::from_millis(self.state_poll_interval_ms)
    }

    pub fn round_budget(&self) -> Duration {
        Duration::from_millis(self.round_budget_ms)
    }

    pub fn flourish_step(&self) -> Duration {
        Duration::from_millis(self.flourish_step_ms)
    }

    pub fn pre_sequence_pause(&self) -> Duration {
        Duration::from_millis(self.pre_sequence_pause_ms)
    }

    pub fn step_on(&self) -> Duration {
        Duration::from_millis(self.step_on_ms)
    }

    pub fn step_gap(&self) -> Duration {
        Duration::from_millis(self.step_gap_ms)
    }

    pub fn feedback_flash(&self) -> Duration {
        Duration::from_millis(self.feedback_flash_ms)
    }

    pub fn tone(&self) -> Duration {
        Duration::from_millis(self.tone_ms)
    }
}
