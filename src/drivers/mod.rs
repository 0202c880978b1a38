//! Blocking drivers that sit between the game state and the pin port.

pub mod presenter;
pub mod sampler;
pub mod threads;
