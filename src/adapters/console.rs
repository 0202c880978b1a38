//! Console press injector for the simulated board.
//!
//! With `--simulate` there are no physical buttons.  Each line typed on
//! stdin names a channel (by name, case-insensitive, or by its 1-based
//! position in the pinout) and taps its button: held down long enough for
//! the sampler to see the edge, then released.

use std::io::{self, BufRead};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::{info, warn};

use crate::adapters::sim::SimBoard;
use crate::drivers::threads;
use crate::game::channel::Channel;

/// Resolve one input line to a channel.
pub fn parse_tap<'a>(line: &str, channels: &'a [Channel]) -> Option<&'a Channel> {
    let word = line.trim();
    if word.is_empty() {
        return None;
    }
    if let Ok(n) = word.parse::<usize>() {
        return n.checked_sub(1).and_then(|i| channels.get(i));
    }
    channels.iter().find(|c| c.name.eq_ignore_ascii_case(word))
}

/// Read taps from `input` until it closes.
pub fn feed<R: BufRead>(input: R, board: &SimBoard, channels: &[Channel], hold: Duration) {
    for line in input.lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                warn!("console read failed: {e}");
                break;
            }
        };
        match parse_tap(&line, channels) {
            Some(ch) => {
                board.press_button(ch.button);
                thread::sleep(hold);
                board.release_button(ch.button);
            }
            None if line.trim().is_empty() => {}
            None => warn!("no channel called {:?}", line.trim()),
        }
    }
}

/// Detached stdin reader.  It blocks on stdin, so it is never joined.
pub fn spawn(board: Arc<SimBoard>, channels: Arc<[Channel]>, hold: Duration) -> io::Result<JoinHandle<()>> {
    let names: Vec<&str> = channels.iter().map(|c| c.name.as_str()).collect();
    info!("simulated board: type a channel name or number to press it {names:?}");
    threads::spawn_named("console", 32, move || {
        feed(io::stdin().lock(), &board, &channels, hold);
    })
}
