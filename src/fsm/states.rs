//! Concrete state handler functions and table builder.
//!
//! ```text
//!  AWAITING_ROUND ──[sequence shown]──▶ ROUND_ACTIVE
//!        ▲                                 │    │
//!        │                          [success]  [wrong press / timeout /
//!        │                                 ▼    level past cap]
//!        ├──────[level ≤ cap]────────── LEVEL_UP   │
//!        │                                 │       │
//!        │                       [level > cap]     │
//!        │                                 ▼       ▼
//!        └──────────[reset done]───────── GAME_OVER
//! ```

use log::{info, warn};

use super::context::GameContext;
use super::{StateDescriptor, StateId};
use crate::app::events::AppEvent;
use crate::game::GameOverReason;
use crate::game::referee::Outcome;

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

pub fn build_state_table() -> [StateDescriptor; StateId::COUNT] {
    [
        StateDescriptor {
            id: StateId::AwaitingRound,
            name: "AwaitingRound",
            on_enter: None,
            on_exit: None,
            on_update: awaiting_update,
        },
        StateDescriptor {
            id: StateId::RoundActive,
            name: "RoundActive",
            on_enter: None,
            on_exit: None,
            on_update: round_active_update,
        },
        StateDescriptor {
            id: StateId::LevelUp,
            name: "LevelUp",
            on_enter: Some(level_up_enter),
            on_exit: None,
            on_update: level_up_update,
        },
        StateDescriptor {
            id: StateId::GameOver,
            name: "GameOver",
            on_enter: Some(game_over_enter),
            on_exit: None,
            on_update: game_over_update,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  AWAITING_ROUND
// ═══════════════════════════════════════════════════════════════════════════

fn awaiting_update(ctx: &mut GameContext) -> Option<StateId> {
    ctx.start_round();
    Some(StateId::RoundActive)
}

// ═══════════════════════════════════════════════════════════════════════════
//  ROUND_ACTIVE: player entering the sequence
// ═══════════════════════════════════════════════════════════════════════════

fn round_active_update(ctx: &mut GameContext) -> Option<StateId> {
    if ctx.state.level() > ctx.config.max_level {
        return game_over(ctx, GameOverReason::LevelCap);
    }

    match ctx.state.outcome() {
        Outcome::Success => Some(StateId::LevelUp),
        Outcome::Failure => game_over(ctx, GameOverReason::WrongButton),
        Outcome::Pending if ctx.state.countdown_expired() => {
            info!(
                "ROUND: out of time ({} of {} pressed)",
                ctx.state.snapshot().input.len(),
                ctx.current.len()
            );
            game_over(ctx, GameOverReason::Timeout)
        }
        Outcome::Pending => None,
    }
}

fn game_over(ctx: &mut GameContext, reason: GameOverReason) -> Option<StateId> {
    ctx.game_over_reason = Some(reason);
    Some(StateId::GameOver)
}

// ═══════════════════════════════════════════════════════════════════════════
//  LEVEL_UP
// ═══════════════════════════════════════════════════════════════════════════

fn level_up_enter(ctx: &mut GameContext) {
    // Hold presses off until the next round is armed.
    ctx.state.begin_restart();
    let level = ctx.state.increment_level();
    info!("LEVEL: cleared, now level {level}");
    ctx.events.emit(&AppEvent::LevelUp { level });
}

fn level_up_update(ctx: &mut GameContext) -> Option<StateId> {
    if ctx.state.level() > ctx.config.max_level {
        return game_over(ctx, GameOverReason::LevelCap);
    }
    Some(StateId::AwaitingRound)
}

// ═══════════════════════════════════════════════════════════════════════════
//  GAME_OVER: reset to level 1
// ═══════════════════════════════════════════════════════════════════════════

fn game_over_enter(ctx: &mut GameContext) {
    if ctx.game_over_reason.is_none() {
        warn!("GAME_OVER entered without a reason");
    }
    ctx.reset_game();
}

fn game_over_update(ctx: &mut GameContext) -> Option<StateId> {
    ctx.game_over_reason = None;
    Some(StateId::AwaitingRound)
}
