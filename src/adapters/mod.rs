//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter        | Implements   | Connects to                        |
//! |----------------|--------------|------------------------------------|
//! | `sysfs`        | PinPort      | Linux sysfs GPIO + PWM buzzer      |
//! | `hal`          | PinPort      | any embedded-hal 1.0 digital pins  |
//! | `sim`          | PinPort      | in-memory board (`--simulate`)     |
//! | `console`      | -            | stdin taps onto the simulated board|
//! | `sequence_log` | SequenceLog  | append-only debug log file         |
//! | `log_sink`     | EventSink    | `log` facade                       |
//!
//! The binary picks `sysfs` or `sim`.  `hal` is for callers embedding the
//! library on a board whose HAL hands out typed pins; they build a
//! `HalBoard` and pass it to `GameService::new` themselves.

pub mod console;
pub mod hal;
pub mod log_sink;
pub mod sequence_log;
pub mod sim;
pub mod sysfs;
