//! Memory game library.
//!
//! Exposes the game core, adapters and configuration for the binary and
//! for integration testing.  Everything runs on the host; the sysfs
//! adapter is the only piece that needs real GPIO.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod drivers;
pub mod error;
pub mod fsm;
pub mod game;
pub mod pins;
