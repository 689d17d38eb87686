//! Live launch countdowns and persisted launch favorites.
//!
//! Launches come from an external feed as [`LaunchRecord`]s. For each one on
//! screen a [`Countdown`] turns the scheduled instant into "time remaining"
//! text, kept fresh by the workers in [`refresh`]. The [`SelectionStore`]
//! remembers which launches the user has favorited and which theme they
//! prefer, across restarts.

pub mod domain;
pub use domain::{
    Countdown, Favorite, LaunchId, LaunchRecord, LaunchStatus, Settings, Theme, ViewerZone,
};

pub mod refresh;
pub use refresh::{Clock, CountdownBoard, CountdownTimer, SystemClock};

/// Persistence of favorites and configuration.
pub mod storage;
pub use storage::{FileStorage, SelectionStore, SnapshotStorage};
