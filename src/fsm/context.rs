//! Context threaded through every state handler.
//!
//! `GameContext` is owned by the state machine thread.  It holds the
//! collaborators the handlers drive (presenter, generator, debug log,
//! event sink) plus a shared handle on the [`GameState`] blackboard that
//! the input sampler writes to concurrently.

use std::sync::Arc;

use log::info;

use crate::app::events::AppEvent;
use crate::app::ports::{EventSink, SequenceLog};
use crate::config::GameConfig;
use crate::drivers::presenter::Presenter;
use crate::game::GameOverReason;
use crate::game::channel::Channel;
use crate::game::sequence::{Sequence, SequenceGenerator};
use crate::game::state::GameState;

pub struct GameContext {
    // -- Shared with the sampler --
    pub state: Arc<GameState>,

    // -- Collaborators --
    pub channels: Arc<[Channel]>,
    pub config: GameConfig,
    pub presenter: Presenter,
    pub generator: SequenceGenerator,
    pub sequence_log: Arc<dyn SequenceLog>,
    pub events: Arc<dyn EventSink>,

    // -- Round bookkeeping --
    /// Sequence of the round in progress.
    pub current: Sequence,
    /// Why the last game ended.  Set by the state that detects it.
    pub game_over_reason: Option<GameOverReason>,
}

impl GameContext {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        state: Arc<GameState>,
        channels: Arc<[Channel]>,
        config: GameConfig,
        presenter: Presenter,
        generator: SequenceGenerator,
        sequence_log: Arc<dyn SequenceLog>,
        events: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            state,
            channels,
            config,
            presenter,
            generator,
            sequence_log,
            events,
            current: Sequence::default(),
            game_over_reason: None,
        }
    }

    /// Generate, present and arm the round for the current level.
    ///
    /// Press registration is suppressed for the whole presentation.  The
    /// countdown restarts only once the sequence has been shown.
    pub fn start_round(&mut self) {
        self.state.begin_restart();

        let level = self.state.level();
        self.current = self.generator.generate(level, &self.channels);
        self.presenter.present_round(&self.current);
        self.sequence_log.record(level, &self.current);

        self.state.install_round(self.current.buttons());
        self.state.reset_countdown();
        self.state.end_restart();

        self.events.emit(&AppEvent::RoundStarted {
            level,
            length: self.current.len(),
        });
    }

    /// Tear the game down to level 1.  Leaves the restarting guard set;
    /// the next [`start_round`](Self::start_round) clears it.
    pub fn reset_game(&mut self) {
        self.state.begin_restart();

        let level = self.state.level();
        let reason = self.game_over_reason.unwrap_or(GameOverReason::WrongButton);
        info!("game over at level {level}: {reason}");
        self.events.emit(&AppEvent::GameOver { level, reason });

        self.state.reset_progress();
        self.presenter.flourish();
        self.presenter.flourish();
    }
}
