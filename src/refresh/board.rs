use std::{
    collections::HashMap,
    io,
    ops::ControlFlow,
    sync::{Arc, Mutex},
    time::Duration,
};

use super::{lock, Clock, Ticker};
use crate::domain::{Countdown, LaunchId};

/// Countdowns for a whole list of launches, refreshed by one shared ticker.
///
/// Long lists would otherwise need a worker per row. Rows are mounted when
/// they scroll into view and unmounted when they leave; terminal countdowns
/// stay mounted but are no longer recomputed.
#[derive(Debug)]
pub struct CountdownBoard {
    countdowns: Arc<Mutex<HashMap<LaunchId, Countdown>>>,
    ticker: Ticker,
}

impl CountdownBoard {
    /// Starts a board refreshing every `period` from `clock`.
    ///
    /// # Errors
    ///
    /// Returns an error if the ticker thread could not be started.
    pub fn start<C>(clock: C, period: Duration) -> io::Result<Self>
    where
        C: Clock + 'static,
    {
        let countdowns: Arc<Mutex<HashMap<LaunchId, Countdown>>> = Arc::default();
        let shared = Arc::clone(&countdowns);
        let ticker = Ticker::spawn("countdown-board", period, move || {
            let now = clock.now();
            let (changed, mounted) = {
                let mut countdowns = lock(&shared);
                let changed = countdowns
                    .values_mut()
                    .filter(|countdown| !countdown.is_terminal())
                    .map(|countdown| countdown.tick(now))
                    .filter(|changed| *changed)
                    .count();
                (changed, countdowns.len())
            };
            tracing::trace!(changed, mounted, "board tick");
            ControlFlow::Continue(())
        })?;
        Ok(Self { countdowns, ticker })
    }

    /// Adds `countdown`, replacing any countdown for the same launch.
    pub fn mount(&self, countdown: Countdown) {
        lock(&self.countdowns).insert(countdown.launch_id().clone(), countdown);
    }

    /// Removes the countdown for `id`, returning it if it was mounted.
    #[must_use]
    pub fn unmount(&self, id: &LaunchId) -> Option<Countdown> {
        lock(&self.countdowns).remove(id)
    }

    /// The text displayed for `id`.
    #[must_use]
    pub fn display_text(&self, id: &LaunchId) -> Option<String> {
        lock(&self.countdowns)
            .get(id)
            .map(|countdown| countdown.display_text().to_string())
    }

    /// Whether the countdown for `id` has finished.
    #[must_use]
    pub fn is_terminal(&self, id: &LaunchId) -> Option<bool> {
        lock(&self.countdowns).get(id).map(Countdown::is_terminal)
    }

    /// The number of mounted countdowns still being refreshed.
    #[must_use]
    pub fn active(&self) -> usize {
        lock(&self.countdowns)
            .values()
            .filter(|countdown| !countdown.is_terminal())
            .count()
    }

    /// The number of mounted countdowns.
    #[must_use]
    pub fn len(&self) -> usize {
        lock(&self.countdowns).len()
    }

    /// Whether no countdowns are mounted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        lock(&self.countdowns).is_empty()
    }

    /// Stops refreshing every countdown. Safe to call more than once.
    pub fn stop(&mut self) {
        self.ticker.cancel();
    }
}

#[cfg(test)]
mod tests {
    use std::{thread, time::Instant};

    use chrono::{DateTime, FixedOffset, Utc};

    use super::*;
    use crate::{
        domain::{countdown::WAITING_CONFIRMATION, ViewerZone},
        refresh::ManualClock,
    };

    fn at(s: &str) -> DateTime<Utc> {
        crate::domain::parse_net(s).unwrap()
    }

    fn countdown(id: &str, net: &str, now: DateTime<Utc>) -> Countdown {
        Countdown::with_instant(
            LaunchId::try_from(id).unwrap(),
            Some(at(net)),
            false,
            ViewerZone::Fixed(FixedOffset::east_opt(0).unwrap()),
            now,
        )
    }

    fn id(s: &str) -> LaunchId {
        LaunchId::try_from(s).unwrap()
    }

    fn wait_until(mut condition: impl FnMut() -> bool) -> bool {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            if condition() {
                return true;
            }
            thread::sleep(Duration::from_millis(2));
        }
        condition()
    }

    #[test]
    fn one_ticker_refreshes_every_row() {
        let now = at("2025-01-01T00:00:00Z");
        let clock = ManualClock::new(now);
        let board = CountdownBoard::start(clock.clone(), Duration::from_millis(2)).unwrap();

        board.mount(countdown("soon", "2025-01-01T00:00:30Z", now));
        board.mount(countdown("later", "2025-01-01T02:00:00Z", now));
        assert_eq!(board.len(), 2);
        assert_eq!(board.active(), 2);

        clock.set(at("2025-01-01T00:00:45Z"));
        assert!(wait_until(|| board.active() == 1));

        assert_eq!(board.is_terminal(&id("soon")), Some(true));
        assert_eq!(
            board.display_text(&id("soon")).as_deref(),
            Some(WAITING_CONFIRMATION)
        );
        assert!(wait_until(|| {
            board.display_text(&id("later")).as_deref() == Some("in 1h 59m")
        }));
    }

    #[test]
    fn unmounted_rows_are_dropped() {
        let now = at("2025-01-01T00:00:00Z");
        let mut board =
            CountdownBoard::start(ManualClock::new(now), Duration::from_millis(2)).unwrap();

        board.mount(countdown("L1", "2025-01-01T00:00:30Z", now));
        let removed = board.unmount(&id("L1")).unwrap();
        assert_eq!(removed.display_text(), "in 30s");
        assert!(board.is_empty());
        assert_eq!(board.display_text(&id("L1")), None);
        assert!(board.unmount(&id("L1")).is_none());

        board.stop();
        board.stop();
    }
}
