//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by rendering each [`AppEvent`] as a one-line
//! record through the `log` facade (stderr via `env_logger` in the binary).

use log::{debug, info};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

/// The record [`LogEventSink`] writes for `event`.
pub fn render(event: &AppEvent) -> String {
    match event {
        AppEvent::Started { channels } => format!("START | channels={channels}"),
        AppEvent::RoundStarted { level, length } => {
            format!("ROUND | level={level} | steps={length}")
        }
        AppEvent::Press {
            channel,
            button,
            outcome,
        } => format!("PRESS | {channel} (GPIO{button}) | {outcome:?}"),
        AppEvent::LevelUp { level } => format!("LEVEL | up to {level}"),
        AppEvent::GameOver { level, reason } => {
            format!("OVER  | level={level} | {reason}")
        }
        AppEvent::Stopped => "STOP  | pins released".to_string(),
    }
}

impl EventSink for LogEventSink {
    fn emit(&self, event: &AppEvent) {
        match event {
            AppEvent::Press { .. } => debug!("{}", render(event)),
            _ => info!("{}", render(event)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameOverReason;
    use crate::game::referee::Outcome;

    #[test]
    fn renders_one_line_records() {
        assert_eq!(
            render(&AppEvent::RoundStarted { level: 3, length: 3 }),
            "ROUND | level=3 | steps=3"
        );
        assert_eq!(
            render(&AppEvent::Press {
                channel: "red".into(),
                button: 27,
                outcome: Outcome::Pending,
            }),
            "PRESS | red (GPIO27) | Pending"
        );
        let over = render(&AppEvent::GameOver {
            level: 4,
            reason: GameOverReason::Timeout,
        });
        assert!(over.starts_with("OVER  | level=4 | "));
        assert!(!over.contains('\n'));
    }
}
