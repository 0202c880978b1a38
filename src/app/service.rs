//! Application service: wires the ports to the two game loops.
//!
//! ```text
//!                ┌──────────────── GameService ────────────────┐
//!  PinPort ◀───▶ │  sampler thread ──▶ GameState ◀── game thread │ ──▶ EventSink
//!                │   (InputSampler)              (Fsm + Presenter)│ ──▶ SequenceLog
//!                └──────────────────────────────────────────────┘
//! ```
//!
//! [`GameService::start`] configures the pins, plays the warm-up and
//! spawns both loops.  The returned [`RunningGame`] owns the threads and a
//! cleanup guard: stopping it (explicitly, by drop, or by unwinding)
//! releases the board and closes the debug log exactly once.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use log::{info, warn};

use crate::config::{GameConfig, Pinout};
use crate::drivers::presenter::Presenter;
use crate::drivers::sampler::InputSampler;
use crate::drivers::threads;
use crate::error::{GpioError, Result};
use crate::fsm::context::GameContext;
use crate::fsm::states::build_state_table;
use crate::fsm::{Fsm, StateId};
use crate::game::channel::Channel;
use crate::game::sequence::SequenceGenerator;
use crate::game::state::GameState;
use crate::pins::LED_OFF;

use super::events::AppEvent;
use super::ports::{EventSink, PinMode, PinPort, SequenceLog};

const SAMPLER_STACK_KB: usize = 64;
const MACHINE_STACK_KB: usize = 128;

/// How long `shutdown` waits for the state machine to notice the flag.
/// A presentation in progress is not interrupted; past this the thread is
/// left to finish against a released board.
const MACHINE_GRACE: Duration = Duration::from_millis(500);

// ───────────────────────────────────────────────────────────────
// Cleanup guard
// ───────────────────────────────────────────────────────────────

/// Releases the board and closes the debug log on first `run` or on drop.
struct CleanupGuard {
    board: Arc<dyn PinPort>,
    sequence_log: Arc<dyn SequenceLog>,
    events: Arc<dyn EventSink>,
    done: bool,
}

impl CleanupGuard {
    fn run(&mut self) {
        if self.done {
            return;
        }
        self.done = true;
        self.board.release();
        self.sequence_log.close();
        self.events.emit(&AppEvent::Stopped);
    }
}

impl Drop for CleanupGuard {
    fn drop(&mut self) {
        self.run();
    }
}

// ───────────────────────────────────────────────────────────────
// GameService
// ───────────────────────────────────────────────────────────────

pub struct GameService {
    channels: Arc<[Channel]>,
    config: GameConfig,
    board: Arc<dyn PinPort>,
    sequence_log: Arc<dyn SequenceLog>,
    events: Arc<dyn EventSink>,
    generator: SequenceGenerator,
}

impl GameService {
    pub fn new(
        pinout: Pinout,
        config: GameConfig,
        board: Arc<dyn PinPort>,
        sequence_log: Arc<dyn SequenceLog>,
        events: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            channels: pinout.into_channels().into(),
            config,
            board,
            sequence_log,
            events,
            generator: SequenceGenerator::from_entropy(),
        }
    }

    /// Replace the entropy-seeded generator (reproducible runs, tests).
    pub fn with_generator(mut self, generator: SequenceGenerator) -> Self {
        self.generator = generator;
        self
    }

    /// LEDs to outputs parked dark, buttons to pulled-up inputs.
    pub fn setup(&self) -> core::result::Result<(), GpioError> {
        for ch in self.channels.iter() {
            self.board.set_pin_mode(ch.led, PinMode::Output)?;
            self.board.drive_led(ch.led, LED_OFF);
            self.board.set_pin_mode(ch.button, PinMode::InputPullUp)?;
        }
        info!("configured {} channels", self.channels.len());
        Ok(())
    }

    /// Set up, warm up and launch both loops.
    ///
    /// On error nothing keeps running and the board is already released.
    pub fn start(self) -> Result<RunningGame> {
        let mut cleanup = CleanupGuard {
            board: self.board.clone(),
            sequence_log: self.sequence_log.clone(),
            events: self.events.clone(),
            done: false,
        };

        self.setup()?;
        let presenter = Presenter::new(self.board.clone(), self.channels.clone(), self.config.clone());
        if presenter.tones_enabled() {
            info!("tone playback enabled");
        }
        presenter.warm_up();

        let state = Arc::new(GameState::new(self.config.round_budget()));
        self.events.emit(&AppEvent::Started {
            channels: self.channels.len(),
        });

        let sampler = InputSampler::new(
            self.board.clone(),
            &self.channels,
            state.clone(),
            presenter.clone(),
            self.events.clone(),
            self.config.sample_interval(),
        )?;
        let sampler = threads::spawn_named("sampler", SAMPLER_STACK_KB, move || sampler.run())?;

        let poll = self.config.state_poll_interval();
        let mut ctx = GameContext::new(
            state.clone(),
            self.channels.clone(),
            self.config,
            presenter,
            self.generator,
            self.sequence_log,
            self.events,
        );
        let machine = threads::spawn_named("game", MACHINE_STACK_KB, move || {
            let mut fsm = Fsm::new(build_state_table(), StateId::AwaitingRound);
            fsm.run(&mut ctx, poll);
        });
        let machine = match machine {
            Ok(handle) => handle,
            Err(e) => {
                state.request_shutdown();
                join_logged("sampler", sampler);
                cleanup.run();
                return Err(e.into());
            }
        };

        Ok(RunningGame {
            state,
            sampler: Some(sampler),
            machine: Some(machine),
            cleanup,
        })
    }
}

// ───────────────────────────────────────────────────────────────
// RunningGame
// ───────────────────────────────────────────────────────────────

/// Handle on a started game.  Dropping it performs [`shutdown`](Self::shutdown).
pub struct RunningGame {
    state: Arc<GameState>,
    sampler: Option<JoinHandle<()>>,
    machine: Option<JoinHandle<()>>,
    cleanup: CleanupGuard,
}

impl RunningGame {
    /// Shared state, for observation.
    pub fn state(&self) -> &Arc<GameState> {
        &self.state
    }

    /// Orderly stop: both loops told to finish, sampler joined, board
    /// released, debug log closed.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        if self.cleanup.done {
            return;
        }
        info!("shutting down");
        self.state.request_shutdown();

        if let Some(sampler) = self.sampler.take() {
            join_logged("sampler", sampler);
        }
        if let Some(machine) = self.machine.take() {
            let deadline = Instant::now() + MACHINE_GRACE;
            while !machine.is_finished() && Instant::now() < deadline {
                thread::sleep(Duration::from_millis(10));
            }
            if machine.is_finished() {
                join_logged("game", machine);
            } else {
                warn!("game loop still presenting; releasing the board under it");
            }
        }

        self.cleanup.run();
    }
}

impl Drop for RunningGame {
    fn drop(&mut self) {
        self.stop();
    }
}

fn join_logged(name: &str, handle: JoinHandle<()>) {
    if handle.join().is_err() {
        warn!("{name} thread panicked");
    }
}
