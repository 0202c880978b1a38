//! Integration test driver for the `tests/integration/` submodules.
//!
//! Each `mod` below exercises one slice of the game against the mock
//! adapters in `mock_hw`.  Timings are shrunk to milliseconds so whole
//! games run in well under a second.

mod game_flow_tests;
mod mock_hw;
mod shared_state_tests;
