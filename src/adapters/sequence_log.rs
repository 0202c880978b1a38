//! Append-only debug log of generated sequences.
//!
//! One line per round:
//!
//! ```text
//! 2026-10-16 14:03:22.518: level = 3 sequence = ["red", "blue", "red"] leds = [17, 24, 17]
//! ```
//!
//! The file is opened in append mode and never truncated.  Every line is
//! flushed as soon as it is written, so the log survives a hard kill.

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Local;
use log::{debug, warn};
use parking_lot::Mutex;

use crate::app::ports::SequenceLog;
use crate::game::sequence::Sequence;

/// Format one log line (without the trailing newline).
pub fn format_line(timestamp: &str, level: u32, sequence: &Sequence) -> String {
    format!(
        "{timestamp}: level = {level} sequence = {:?} leds = {:?}",
        sequence.names(),
        sequence.leds()
    )
}

pub struct FileSequenceLog {
    path: PathBuf,
    writer: Mutex<Option<BufWriter<File>>>,
}

impl FileSequenceLog {
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        debug!("debug log: {}", path.display());
        Ok(Self {
            path,
            writer: Mutex::new(Some(BufWriter::new(file))),
        })
    }
}

impl SequenceLog for FileSequenceLog {
    fn record(&self, level: u32, sequence: &Sequence) {
        let mut guard = self.writer.lock();
        let Some(writer) = guard.as_mut() else {
            return;
        };
        let stamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f").to_string();
        let line = format_line(&stamp, level, sequence);
        if let Err(e) = writeln!(writer, "{line}").and_then(|()| writer.flush()) {
            warn!("debug log {}: {e}", self.path.display());
        }
    }

    fn close(&self) {
        if let Some(mut writer) = self.writer.lock().take() {
            if let Err(e) = writer.flush() {
                warn!("debug log {} flush on close: {e}", self.path.display());
            }
        }
    }
}

impl Drop for FileSequenceLog {
    fn drop(&mut self) {
        self.close();
    }
}
