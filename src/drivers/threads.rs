//! Named thread spawning for the game loops.
//!
//! Every long-running loop and sampler worker gets a thread name (shown in
//! panics, `top -H` and debuggers) and an explicit stack size.  Spawn
//! failures are returned to the caller instead of panicking, since they
//! happen before any pin is driven and abort startup cleanly.

use std::io;
use std::thread::{Builder, JoinHandle};

/// Spawn `f` on a thread called `name` with a `stack_kb` KiB stack.
pub fn spawn_named<F, T>(name: impl Into<String>, stack_kb: usize, f: F) -> io::Result<JoinHandle<T>>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    let name = name.into();
    log::debug!("spawning '{name}' (stack={stack_kb}KB)");
    Builder::new()
        .name(name)
        .stack_size(stack_kb * 1024)
        .spawn(f)
}
