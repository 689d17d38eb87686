use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{parse_net, LaunchId, LaunchRecord, LaunchStatus};

/// The part of a launch kept alongside a favorite.
///
/// Holds enough to render the favorites list without going back to the
/// launch feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Favorite {
    /// Identifier of the favorited launch.
    pub id: LaunchId,
    /// Display name.
    pub name: String,
    /// Launch instant, verbatim from the feed.
    pub net: String,
    /// Status at the time the launch was favorited.
    pub status: LaunchStatus,
    /// Image reference, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Favorite {
    /// The parsed launch instant, if it is valid.
    #[must_use]
    pub fn instant(&self) -> Option<DateTime<Utc>> {
        parse_net(&self.net).ok()
    }
}

impl From<&LaunchRecord> for Favorite {
    fn from(record: &LaunchRecord) -> Self {
        Self {
            id: record.id.clone(),
            name: record.name.clone(),
            net: record.net.clone(),
            status: record.status.clone(),
            image: record.image.clone(),
        }
    }
}
