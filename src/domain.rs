//! Domain models for launch tracking.
//!
//! This module contains the launch records supplied by the feed, the
//! time-remaining computation, and the small value types the selection store
//! persists.

/// Time-remaining text and per-item countdown state.
pub mod countdown;
pub use countdown::{time_remaining, Countdown, TimeRemaining, ViewerZone};

/// Human-readable distances between instants.
pub mod distance;

mod favorite;
pub use favorite::Favorite;

mod launch;
pub use launch::{
    parse_feed, parse_net, InvalidNetError, LaunchId, LaunchRecord, LaunchStatus, Location, Pad,
    ParseLaunchIdError, Provider, GO_FOR_LAUNCH,
};

/// Calendar reminders and share links.
pub mod reminder;

mod settings;
pub use settings::{Settings, SettingsError};

mod theme;
pub use theme::{ParseThemeError, Theme};
