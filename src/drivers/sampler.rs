//! Input sampler: fixed-cadence button polling with per-tick fan-out.
//!
//! ```text
//!            tick(epoch) ──▶ worker "red"   ─┐
//!  sampler ─ tick(epoch) ──▶ worker "green" ─┼─▶ done ×N ──▶ countdown -= interval
//!            tick(epoch) ──▶ worker "blue"  ─┘
//! ```
//!
//! One persistent worker thread per channel.  Every tick the sampler hands
//! each worker the round epoch it observed, then waits for all of them
//! before touching the countdown, so each channel is read at most once per
//! tick and the countdown is decremented exactly once per tick.
//!
//! A worker registers a press on the released → pressed edge only.  The
//! feedback flash runs on the worker, so a tick lasts as long as its
//! slowest flash.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam::channel::{self, Receiver, Sender};
use log::{debug, warn};

use crate::app::events::AppEvent;
use crate::app::ports::{EventSink, PinPort};
use crate::drivers::presenter::Presenter;
use crate::drivers::threads;
use crate::game::channel::Channel;
use crate::game::state::{GameState, PressRecord};
use crate::pins;

const WORKER_STACK_KB: usize = 64;

#[derive(Debug, Clone, Copy)]
struct Tick {
    epoch: u64,
}

struct Worker {
    jobs: Sender<Tick>,
    handle: JoinHandle<()>,
}

/// Per-channel press detector, owned by one worker thread.
struct ChannelPoller {
    channel: Channel,
    board: Arc<dyn PinPort>,
    state: Arc<GameState>,
    presenter: Presenter,
    events: Arc<dyn EventSink>,
    was_pressed: bool,
}

impl ChannelPoller {
    fn poll(&mut self, tick: Tick) {
        let pressed = pins::is_pressed(self.board.read_button(self.channel.button));
        let edge = pressed && !self.was_pressed;
        self.was_pressed = pressed;
        if !edge || self.state.is_restarting() {
            return;
        }

        match self.state.record_press(tick.epoch, self.channel.button) {
            PressRecord::Recorded(outcome) => {
                self.events.emit(&AppEvent::Press {
                    channel: self.channel.name.clone(),
                    button: self.channel.button,
                    outcome,
                });
                self.presenter.flash(&self.channel);
            }
            PressRecord::RoundDecided(outcome) => {
                debug!("{}: press after round decided ({outcome:?})", self.channel.name);
            }
            PressRecord::StaleRound => {
                // The round changed under this tick.  Forget the edge so a
                // button still held is recorded against the new round.
                self.was_pressed = false;
                debug!("{}: press from previous round dropped", self.channel.name);
            }
            PressRecord::BufferFull => {
                warn!("{}: input buffer full, press dropped", self.channel.name);
            }
        }
    }
}

/// The sampler loop.  Owns its workers; dropping it stops and joins them.
pub struct InputSampler {
    state: Arc<GameState>,
    interval: Duration,
    workers: Vec<Worker>,
    done: Receiver<()>,
}

impl InputSampler {
    /// Spawn one worker per channel.
    pub fn new(
        board: Arc<dyn PinPort>,
        channels: &[Channel],
        state: Arc<GameState>,
        presenter: Presenter,
        events: Arc<dyn EventSink>,
        interval: Duration,
    ) -> std::io::Result<Self> {
        let (done_tx, done) = channel::unbounded();
        let mut workers = Vec::with_capacity(channels.len());

        for ch in channels {
            let (jobs, job_rx) = channel::bounded::<Tick>(1);
            let mut poller = ChannelPoller {
                channel: ch.clone(),
                board: board.clone(),
                state: state.clone(),
                presenter: presenter.clone(),
                events: events.clone(),
                was_pressed: false,
            };
            let done_tx = done_tx.clone();
            let handle = threads::spawn_named(
                format!("sample-{}", ch.name),
                WORKER_STACK_KB,
                move || {
                    for tick in job_rx.iter() {
                        poller.poll(tick);
                        if done_tx.send(()).is_err() {
                            break;
                        }
                    }
                },
            )?;
            workers.push(Worker { jobs, handle });
        }

        Ok(Self {
            state,
            interval,
            workers,
            done,
        })
    }

    /// One sampling pass: fan out to every worker, join, then advance the
    /// countdown unless a transition is in progress.
    pub fn tick(&self) {
        let tick = Tick {
            epoch: self.state.epoch(),
        };

        let mut dispatched = 0;
        for worker in &self.workers {
            if worker.jobs.send(tick).is_ok() {
                dispatched += 1;
            }
        }
        for _ in 0..dispatched {
            if self.done.recv().is_err() {
                break;
            }
        }

        if !self.state.is_restarting() {
            self.state.tick_countdown(self.interval);
        }
    }

    /// Sample at the configured cadence until shutdown is requested.
    pub fn run(self) {
        debug!(
            "sampler running: {} channels every {:?}",
            self.workers.len(),
            self.interval
        );
        while !self.state.is_shutting_down() {
            let started = Instant::now();
            self.tick();
            let spent = started.elapsed();
            if spent < self.interval {
                thread::sleep(self.interval - spent);
            }
        }
    }
}

impl Drop for InputSampler {
    fn drop(&mut self) {
        for Worker { jobs, handle } in self.workers.drain(..) {
            drop(jobs);
            if handle.join().is_err() {
                warn!("sampler worker panicked");
            }
        }
    }
}
