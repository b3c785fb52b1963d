//! Helper for spawning named worker threads
//!
//! Tick threads are named so they can be told apart in debuggers, panic
//! messages and `top -H` when several animated surfaces are alive.

use std::io;
use std::thread::{Builder, JoinHandle};

/// Spawn a thread with a name.
///
/// # Errors
/// Returns the OS error if the thread could not be created.
///
/// # Example
/// ```ignore
/// spawn_named("glimmer-tick", || { /* ... */ })?;
/// ```
pub fn spawn_named<F, T>(name: &str, f: F) -> io::Result<JoinHandle<T>>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    Builder::new().name(name.to_string()).spawn(f)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thread_carries_name() {
        let handle = spawn_named("glimmer-test", || {
            std::thread::current().name().map(str::to_string)
        })
        .unwrap();
        assert_eq!(handle.join().unwrap().as_deref(), Some("glimmer-test"));
    }
}
