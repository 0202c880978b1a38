//! Sequence presenter and LED choreography.
//!
//! Everything here blocks the calling thread for its full duration.  A
//! round's presentation is atomic from the player's point of view, so no
//! step is interruptible.
//!
//! | Routine        | Pattern                                          |
//! |----------------|--------------------------------------------------|
//! | `flourish`     | chase: each LED in order on for one step, off    |
//! | `warm_up`      | the same chase, once at power-up                 |
//! | `play_sequence`| each step on (+ tone) for `step_on`, off, gap    |
//! | `flash`        | one LED on (+ tone) for the feedback time        |

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use log::debug;

use crate::app::ports::PinPort;
use crate::config::GameConfig;
use crate::game::channel::Channel;
use crate::game::sequence::Sequence;
use crate::pins::{LED_OFF, LED_ON};

/// Drives LEDs and the buzzer through the shared [`PinPort`].
/// Cheap to clone; clones share the board.
#[derive(Clone)]
pub struct Presenter {
    board: Arc<dyn PinPort>,
    channels: Arc<[Channel]>,
    config: GameConfig,
    tones_enabled: bool,
}

impl Presenter {
    /// Tones play only if the board has a buzzer *and* some channel
    /// configures a frequency.
    pub fn new(board: Arc<dyn PinPort>, channels: Arc<[Channel]>, config: GameConfig) -> Self {
        let tones_enabled =
            board.supports_tone() && channels.iter().any(|c| c.tone_hz.is_some());
        Self {
            board,
            channels,
            config,
            tones_enabled,
        }
    }

    pub fn tones_enabled(&self) -> bool {
        self.tones_enabled
    }

    /// Full round choreography: flourish, pause, then the sequence.
    pub fn present_round(&self, sequence: &Sequence) {
        self.flourish();
        pause(self.config.pre_sequence_pause());
        self.play_sequence(sequence, self.config.step_on(), self.config.step_gap());
    }

    /// Show each step for `step_on`, then dark for `gap`.
    pub fn play_sequence(&self, sequence: &Sequence, step_on: Duration, gap: Duration) {
        debug!("presenting {} steps: {:?}", sequence.len(), sequence.names());
        for channel in sequence.steps() {
            self.hold(channel, step_on);
            pause(gap);
        }
    }

    /// Attention-getting chase across every configured LED.
    pub fn flourish(&self) {
        let step = self.config.flourish_step();
        for channel in self.channels.iter() {
            self.board.drive_led(channel.led, LED_ON);
            pause(step);
            self.board.drive_led(channel.led, LED_OFF);
        }
    }

    /// Power-up lamp test.
    pub fn warm_up(&self) {
        debug!("warm-up over {} LEDs", self.channels.len());
        self.flourish();
    }

    /// Press feedback for one channel.
    pub fn flash(&self, channel: &Channel) {
        self.hold(channel, self.config.feedback_flash());
    }

    fn hold(&self, channel: &Channel, on_for: Duration) {
        let started = Instant::now();
        self.board.drive_led(channel.led, LED_ON);
        if let (true, Some(hz)) = (self.tones_enabled, channel.tone_hz) {
            self.board.play_tone(hz, self.config.tone().min(on_for));
        }
        pause(on_for.saturating_sub(started.elapsed()));
        self.board.drive_led(channel.led, LED_OFF);
    }
}

fn pause(d: Duration) {
    if !d.is_zero() {
        thread::sleep(d);
    }
}
