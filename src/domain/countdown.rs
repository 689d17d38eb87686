//! Time-remaining text for a launch.
//!
//! [`time_remaining`] is the pure computation; [`Countdown`] wraps it with the
//! per-item state a view keeps while the launch is on screen.

use chrono::{DateTime, FixedOffset, Local, TimeZone, Utc};

use crate::domain::{
    distance::{distance_in_words, distance_with_suffix},
    LaunchId, LaunchRecord,
};

/// Shown once the launch instant has been reached but not yet confirmed.
pub const WAITING_CONFIRMATION: &str = "Waiting confirmation...";

/// Shown when the launch instant cannot be parsed.
pub const UNKNOWN: &str = "Unknown";

/// The outcome of a single time-remaining computation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeRemaining {
    /// Text to display.
    pub text: String,
    /// Whether the countdown has finished and needs no further refreshes.
    pub terminal: bool,
}

impl TimeRemaining {
    const fn running(text: String) -> Self {
        Self {
            text,
            terminal: false,
        }
    }

    fn terminal(text: &str) -> Self {
        Self {
            text: text.to_string(),
            terminal: true,
        }
    }
}

/// Computes the time-remaining text for a launch at `net`, seen at `now`.
///
/// Calendar days are counted in `tz`, so a launch "the day after tomorrow"
/// is judged by the viewer's own calendar.
///
/// - Historical launches (`past`) read as a plain distance, e.g. "2 days".
/// - Launches more than one calendar day away read as "in 3 days".
/// - Closer launches count down as "in 5h 12m", "in 4m 10s" or "in 9s".
/// - Once the instant is reached the text becomes [`WAITING_CONFIRMATION`]
///   and the result is terminal.
///
/// The branch is picked by calendar days, not elapsed time. Across a
/// daylight-saving change two calendar days can be less than 48 hours apart,
/// so a launch "the day after tomorrow" may read "in about 23 hours".
#[must_use]
pub fn time_remaining<Tz: TimeZone>(
    net: DateTime<Utc>,
    now: DateTime<Utc>,
    past: bool,
    tz: &Tz,
) -> TimeRemaining {
    if past {
        return TimeRemaining::running(distance_in_words(net, now));
    }

    let days_until = calendar_days_between(now, net, tz);
    if days_until > 1 {
        return TimeRemaining::running(distance_with_suffix(net, now));
    }

    let delta = net - now;
    let hours = delta.num_hours();
    let minutes = delta.num_minutes() % 60;
    let seconds = delta.num_seconds() % 60;

    if hours >= 1 {
        TimeRemaining::running(format!("in {hours}h {minutes}m"))
    } else if minutes >= 1 {
        TimeRemaining::running(format!("in {minutes}m {seconds}s"))
    } else if seconds > 0 {
        TimeRemaining::running(format!("in {seconds}s"))
    } else {
        TimeRemaining::terminal(WAITING_CONFIRMATION)
    }
}

fn calendar_days_between<Tz: TimeZone>(from: DateTime<Utc>, to: DateTime<Utc>, tz: &Tz) -> i64 {
    let from = from.with_timezone(tz).date_naive();
    let to = to.with_timezone(tz).date_naive();
    to.signed_duration_since(from).num_days()
}

/// The time zone a viewer reads their calendar in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViewerZone {
    /// The zone reported by the runtime environment.
    #[default]
    Local,
    /// A fixed offset from UTC.
    Fixed(FixedOffset),
}

impl ViewerZone {
    fn compute(self, net: DateTime<Utc>, now: DateTime<Utc>, past: bool) -> TimeRemaining {
        match self {
            Self::Local => time_remaining(net, now, past, &Local),
            Self::Fixed(offset) => time_remaining(net, now, past, &offset),
        }
    }
}

/// The live countdown shown for one launch.
///
/// Created when the launch becomes visible and refreshed by [`Countdown::tick`]
/// until it becomes terminal. A terminal countdown never changes again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Countdown {
    launch_id: LaunchId,
    net: Option<DateTime<Utc>>,
    past: bool,
    zone: ViewerZone,
    display_text: String,
    terminal: bool,
}

impl Countdown {
    /// Starts a countdown for `launch`, computing its first text at `now`.
    ///
    /// A launch whose instant cannot be parsed shows [`UNKNOWN`] and is
    /// terminal from the start.
    #[must_use]
    pub fn new(launch: &LaunchRecord, past: bool, zone: ViewerZone, now: DateTime<Utc>) -> Self {
        let net = launch
            .instant()
            .inspect_err(|e| {
                tracing::debug!("Countdown for {} has no valid instant: {e}", launch.id);
            })
            .ok();
        Self::with_instant(launch.id.clone(), net, past, zone, now)
    }

    /// Starts a countdown for an already parsed instant.
    ///
    /// `None` stands for an instant that failed to parse.
    #[must_use]
    pub fn with_instant(
        launch_id: LaunchId,
        net: Option<DateTime<Utc>>,
        past: bool,
        zone: ViewerZone,
        now: DateTime<Utc>,
    ) -> Self {
        let mut countdown = Self {
            launch_id,
            net,
            past,
            zone,
            display_text: String::new(),
            terminal: false,
        };
        countdown.refresh(now);
        countdown
    }

    /// The launch this countdown belongs to.
    #[must_use]
    pub const fn launch_id(&self) -> &LaunchId {
        &self.launch_id
    }

    /// The text currently displayed.
    #[must_use]
    pub fn display_text(&self) -> &str {
        &self.display_text
    }

    /// Whether the countdown has finished.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        self.terminal
    }

    /// Recomputes the text at `now`.
    ///
    /// Returns `true` if the displayed text changed. Terminal countdowns are
    /// left untouched.
    pub fn tick(&mut self, now: DateTime<Utc>) -> bool {
        if self.terminal {
            return false;
        }
        let previous = std::mem::take(&mut self.display_text);
        self.refresh(now);
        tracing::trace!(launch = %self.launch_id, text = %self.display_text, "countdown tick");
        previous != self.display_text
    }

    fn refresh(&mut self, now: DateTime<Utc>) {
        let remaining = self.net.map_or_else(
            || TimeRemaining::terminal(UNKNOWN),
            |net| self.zone.compute(net, now, self.past),
        );
        if remaining.terminal {
            tracing::debug!(launch = %self.launch_id, "countdown reached '{}'", remaining.text);
        }
        self.display_text = remaining.text;
        self.terminal = remaining.terminal;
    }
}
