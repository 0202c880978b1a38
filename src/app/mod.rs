//! Application core: port traits, outbound events and the service that
//! runs the game.
//!
//! All interaction with hardware and files happens through the **port
//! traits** in [`ports`], so the whole game runs against the simulated
//! board in tests.

pub mod events;
pub mod ports;
pub mod service;
