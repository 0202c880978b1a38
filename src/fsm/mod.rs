//! Function-pointer finite state machine engine for the game rounds.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │  StateTable                                                    │
//! │  ┌───────────────┬──────────┬─────────┬───────────────────┐    │
//! │  │ StateId       │ on_enter │ on_exit │ on_update         │    │
//! │  ├───────────────┼──────────┼─────────┼───────────────────┤    │
//! │  │ AwaitingRound │ -        │ -       │ fn(ctx)->Option<> │    │
//! │  │ RoundActive   │ -        │ -       │ fn(ctx)->Option<> │    │
//! │  │ LevelUp       │ fn(ctx)  │ -       │ fn(ctx)->Option<> │    │
//! │  │ GameOver      │ fn(ctx)  │ -       │ fn(ctx)->Option<> │    │
//! │  └───────────────┴──────────┴─────────┴───────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each tick the engine calls `on_update` for the **current** state.
//! If it returns `Some(next_id)`, the engine runs `on_exit` for the
//! current state, then `on_enter` for the next, and updates the
//! current pointer.  All handlers receive `&mut GameContext`.
//!
//! [`Fsm::run`] drives the table until shutdown: after a tick that
//! transitioned it ticks again straight away, otherwise it parks on the
//! shared state until the round outcome changes or the poll interval
//! elapses.

pub mod context;
pub mod states;

use core::time::Duration;

use context::GameContext;
use log::{debug, info};

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

/// Enumeration of all game states.
/// Must stay in sync with the table built in [`states::build_state_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum StateId {
    AwaitingRound = 0,
    RoundActive = 1,
    LevelUp = 2,
    GameOver = 3,
}

impl StateId {
    /// Total number of states, used to size the table array.
    pub const COUNT: usize = 4;

    /// Convert an index back to `StateId`.  Out-of-range indices assert in
    /// debug builds and fall back to `GameOver`, which resets the game.
    pub fn from_index(idx: usize) -> Self {
        match idx {
            0 => Self::AwaitingRound,
            1 => Self::RoundActive,
            2 => Self::LevelUp,
            3 => Self::GameOver,
            _ => {
                debug_assert!(false, "invalid state index: {idx}");
                Self::GameOver
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// Signature for `on_enter` and `on_exit` actions.
pub type StateActionFn = fn(&mut GameContext);

/// Per-tick update handler.  `Some(next)` triggers a transition.
pub type StateUpdateFn = fn(&mut GameContext) -> Option<StateId>;

// ---------------------------------------------------------------------------
// State descriptor (one row in the table)
// ---------------------------------------------------------------------------

/// Static descriptor for a single state.
pub struct StateDescriptor {
    pub id: StateId,
    pub name: &'static str,
    pub on_enter: Option<StateActionFn>,
    pub on_exit: Option<StateActionFn>,
    pub on_update: StateUpdateFn,
}

// ---------------------------------------------------------------------------
// FSM engine
// ---------------------------------------------------------------------------

/// The game state machine.
pub struct Fsm {
    /// Fixed-size table indexed by `StateId as usize`.
    table: [StateDescriptor; StateId::COUNT],
    current: usize,
    tick_count: u64,
}

impl Fsm {
    pub fn new(table: [StateDescriptor; StateId::COUNT], initial: StateId) -> Self {
        Self {
            table,
            current: initial as usize,
            tick_count: 0,
        }
    }

    /// Run the initial `on_enter`.  Call once before the first `tick()`.
    pub fn start(&mut self, ctx: &mut GameContext) {
        info!("FSM starting in state: {}", self.table[self.current].name);
        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }

    /// Advance by one tick.  Returns `true` if a transition happened.
    pub fn tick(&mut self, ctx: &mut GameContext) -> bool {
        self.tick_count += 1;

        match (self.table[self.current].on_update)(ctx) {
            Some(next_id) => {
                self.transition(next_id, ctx);
                true
            }
            None => false,
        }
    }

    /// Tick until shutdown is requested on the shared state.
    pub fn run(&mut self, ctx: &mut GameContext, poll: Duration) {
        self.start(ctx);
        while !ctx.state.is_shutting_down() {
            if !self.tick(ctx) {
                ctx.state.wait_for_outcome(poll);
            }
        }
        debug!(
            "FSM stopped in {} after {} ticks",
            self.table[self.current].name, self.tick_count
        );
    }

    pub fn current_state(&self) -> StateId {
        StateId::from_index(self.current)
    }

    fn transition(&mut self, next_id: StateId, ctx: &mut GameContext) {
        let next_idx = next_id as usize;

        debug!(
            "FSM transition: {} -> {}",
            self.table[self.current].name, self.table[next_idx].name
        );

        if let Some(exit) = self.table[self.current].on_exit {
            exit(ctx);
        }

        self.current = next_idx;

        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }
}
