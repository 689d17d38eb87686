//! Keeping countdowns fresh while they are on screen.
//!
//! Each visible launch can own a [`CountdownTimer`], or a list of launches can
//! share one [`CountdownBoard`] that ticks them all from a single worker. Both
//! run on a [`Ticker`] and read the time from a [`Clock`].

use std::sync::{Mutex, MutexGuard, PoisonError};

mod board;
mod clock;
mod ticker;
mod timer;

pub use board::CountdownBoard;
pub use clock::{Clock, ManualClock, SystemClock};
pub use ticker::Ticker;
pub use timer::CountdownTimer;

/// Locks `mutex`, carrying on with the data if a previous holder panicked.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
