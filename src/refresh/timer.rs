use std::{
    io,
    ops::ControlFlow,
    sync::{Arc, Mutex},
    time::Duration,
};

use super::{lock, Clock, Ticker};
use crate::domain::Countdown;

/// A countdown refreshed by its own ticker.
///
/// The timer belongs to whatever shows the countdown: cancel or drop it when
/// the launch leaves the screen. It stops by itself once the countdown turns
/// terminal, and never starts for a countdown that is terminal already.
#[derive(Debug)]
pub struct CountdownTimer {
    countdown: Arc<Mutex<Countdown>>,
    ticker: Option<Ticker>,
}

impl CountdownTimer {
    /// Starts refreshing `countdown` from `clock` every `period`.
    ///
    /// `on_update` is called from the ticker thread whenever the displayed
    /// text changes.
    ///
    /// # Errors
    ///
    /// Returns an error if the ticker thread could not be started.
    pub fn start<C, F>(
        countdown: Countdown,
        clock: C,
        period: Duration,
        mut on_update: F,
    ) -> io::Result<Self>
    where
        C: Clock + 'static,
        F: FnMut(&Countdown) + Send + 'static,
    {
        let terminal = countdown.is_terminal();
        let name = format!("countdown-{}", countdown.launch_id());
        let countdown = Arc::new(Mutex::new(countdown));
        if terminal {
            return Ok(Self {
                countdown,
                ticker: None,
            });
        }

        let shared = Arc::clone(&countdown);
        let ticker = Ticker::spawn(&name, period, move || {
            let mut countdown = lock(&shared);
            if countdown.tick(clock.now()) {
                on_update(&countdown);
            }
            let terminal = countdown.is_terminal();
            drop(countdown);
            if terminal {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        })?;

        Ok(Self {
            countdown,
            ticker: Some(ticker),
        })
    }

    /// A copy of the countdown as it stands.
    #[must_use]
    pub fn state(&self) -> Countdown {
        lock(&self.countdown).clone()
    }

    /// The text currently displayed.
    #[must_use]
    pub fn display_text(&self) -> String {
        lock(&self.countdown).display_text().to_string()
    }

    /// Whether the countdown has finished.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        lock(&self.countdown).is_terminal()
    }

    /// Whether further refreshes are scheduled.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.ticker.as_ref().is_some_and(Ticker::is_running)
    }

    /// Stops refreshing. Safe to call more than once.
    pub fn cancel(&mut self) {
        if let Some(mut ticker) = self.ticker.take() {
            ticker.cancel();
        }
    }
}
