use std::{fmt, ops::Deref, str::FromStr};

use chrono::{DateTime, NaiveDateTime, Utc};
use non_empty_string::NonEmptyString;
use serde::{Deserialize, Serialize};

/// The status name a launch carries once it is cleared to fly.
pub const GO_FOR_LAUNCH: &str = "Go for Launch";

/// The opaque, unique identifier of a launch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LaunchId(NonEmptyString);

impl LaunchId {
    /// Creates a new `LaunchId`.
    ///
    /// # Errors
    ///
    /// Returns [`ParseLaunchIdError`] if the identifier is empty or only
    /// whitespace.
    pub fn new(id: String) -> Result<Self, ParseLaunchIdError> {
        if id.trim().is_empty() {
            return Err(ParseLaunchIdError);
        }
        NonEmptyString::new(id)
            .map(Self)
            .map_err(|_| ParseLaunchIdError)
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for LaunchId {
    type Error = ParseLaunchIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for LaunchId {
    type Error = ParseLaunchIdError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value.to_string())
    }
}

impl FromStr for LaunchId {
    type Err = ParseLaunchIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}

impl From<LaunchId> for String {
    fn from(id: LaunchId) -> Self {
        id.0.as_str().to_string()
    }
}

impl AsRef<str> for LaunchId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Deref for LaunchId {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}

impl fmt::Display for LaunchId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error returned when a launch identifier is empty.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("launch identifier must not be empty")]
pub struct ParseLaunchIdError;

/// Error returned when a launch instant cannot be parsed.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("invalid launch instant '{0}'")]
pub struct InvalidNetError(pub String);

/// Parses an ISO-8601 launch instant.
///
/// Timestamps carrying an offset are converted to UTC. Timestamps without an
/// offset are taken to already be in UTC, which is how launch feeds store
/// them.
///
/// # Errors
///
/// Returns [`InvalidNetError`] if the string is not a recognisable instant.
pub fn parse_net(net: &str) -> Result<DateTime<Utc>, InvalidNetError> {
    let trimmed = net.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(instant.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|_| InvalidNetError(net.to_string()))
}

/// The status of a launch, as reported by the launch feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchStatus {
    /// Discriminating status name, e.g. "Go for Launch", "TBD", "Success".
    pub name: String,

    /// Free-text explanation of the status.
    #[serde(default)]
    pub description: String,
}

impl LaunchStatus {
    /// Whether the launch is cleared to fly.
    #[must_use]
    pub fn is_go(&self) -> bool {
        self.name == GO_FOR_LAUNCH
    }
}

/// A named place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// Display name.
    pub name: String,
}

/// The pad a launch departs from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pad {
    /// Display name of the pad.
    pub name: String,
    /// Where the pad is.
    pub location: Location,
}

/// The organisation operating a launch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provider {
    /// Display name of the provider.
    pub name: String,
}

/// A launch as supplied by the launch feed.
///
/// Records are read-only: everything the crate computes is derived from them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchRecord {
    /// Unique identifier.
    pub id: LaunchId,

    /// Display name.
    pub name: String,

    /// Scheduled launch instant as ISO-8601 text, in UTC.
    ///
    /// Kept verbatim so that an unparseable value can still be displayed and
    /// stored; see [`LaunchRecord::instant`].
    pub net: String,

    /// Current launch status.
    pub status: LaunchStatus,

    /// Image reference, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    /// Launch pad, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pad: Option<Pad>,

    /// Launch provider, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub launch_service_provider: Option<Provider>,
}

impl LaunchRecord {
    /// The parsed launch instant.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidNetError`] if `net` is not a valid instant.
    pub fn instant(&self) -> Result<DateTime<Utc>, InvalidNetError> {
        parse_net(&self.net)
    }

    /// The name of the pad location, if known.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.pad.as_ref().map(|pad| pad.location.name.as_str())
    }
}

/// The shapes a launch feed document can take.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Feed {
    Page { results: Vec<LaunchRecord> },
    List(Vec<LaunchRecord>),
    Single(Box<LaunchRecord>),
}

/// Parses a launch feed document.
///
/// Accepts a single launch object, an array of launches, or a paginated
/// `{"results": [...]}` envelope.
///
/// # Errors
///
/// Returns an error if the document matches none of these shapes.
pub fn parse_feed(json: &str) -> Result<Vec<LaunchRecord>, serde_json::Error> {
    let feed: Feed = serde_json::from_str(json)?;
    Ok(match feed {
        Feed::Page { results } => results,
        Feed::List(list) => list,
        Feed::Single(record) => vec![*record],
    })
}
