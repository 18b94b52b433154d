//! Sleep abstraction so retry loops can be tested without real delays.

use std::time::Duration;

/// Blocks the current thread for a duration.
pub trait Sleeper {
    fn sleep(&self, duration: Duration);
}

/// Real sleeper backed by [`std::thread::sleep`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

impl<S: Sleeper + ?Sized> Sleeper for &S {
    fn sleep(&self, duration: Duration) {
        (**self).sleep(duration);
    }
}
