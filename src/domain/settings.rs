use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Application settings.
///
/// These are read from a TOML file and control how launches are shared,
/// reminded of, and refreshed, and where the selection store keeps its
/// snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Settings {
    /// Base of the deep links produced when sharing a launch.
    share_base_url: String,

    /// Name of the calendar reminders are filed under.
    calendar_name: String,

    /// How long before lift-off a reminder alarm fires.
    reminder_lead_minutes: u32,

    /// Nominal period between countdown refreshes.
    refresh_interval_ms: u64,

    /// Where the selection store snapshot is kept.
    ///
    /// Relative paths are resolved against the directory of the settings
    /// file.
    pub state_file: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            share_base_url: default_share_base_url(),
            calendar_name: default_calendar_name(),
            reminder_lead_minutes: default_reminder_lead_minutes(),
            refresh_interval_ms: default_refresh_interval_ms(),
            state_file: default_state_file(),
        }
    }
}

impl Settings {
    /// Loads the settings from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path).map_err(SettingsError::Read)?;
        Ok(toml::from_str(&content)?)
    }

    /// Saves the settings to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(SettingsError::Write)
    }

    /// Returns the base URL for share links.
    #[must_use]
    pub fn share_base_url(&self) -> &str {
        &self.share_base_url
    }

    /// Returns the calendar reminders are filed under.
    #[must_use]
    pub fn calendar_name(&self) -> &str {
        &self.calendar_name
    }

    /// Returns the reminder lead time, in minutes.
    #[must_use]
    pub const fn reminder_lead_minutes(&self) -> u32 {
        self.reminder_lead_minutes
    }

    /// Returns the countdown refresh period.
    ///
    /// A zero period is raised to one millisecond.
    #[must_use]
    pub fn refresh_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.refresh_interval_ms.max(1))
    }

    /// Resolves the snapshot path against the settings file location.
    #[must_use]
    pub fn state_path(&self, settings_path: &Path) -> PathBuf {
        if self.state_file.is_absolute() {
            return self.state_file.clone();
        }
        settings_path
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join(&self.state_file)
    }
}

/// Errors raised when reading or writing a settings file.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// The file could not be read.
    #[error("Failed to read settings file: {0}")]
    Read(#[source] std::io::Error),
    /// The file could not be written.
    #[error("Failed to write settings file: {0}")]
    Write(#[source] std::io::Error),
    /// The file is not valid settings TOML.
    #[error("Failed to parse settings file: {0}")]
    Parse(#[from] toml::de::Error),
    /// The settings could not be rendered as TOML.
    #[error("Failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}

fn default_share_base_url() -> String {
    "https://launch4fun.app/launch".to_string()
}

fn default_calendar_name() -> String {
    "Launch4Fun".to_string()
}

const fn default_reminder_lead_minutes() -> u32 {
    30
}

const fn default_refresh_interval_ms() -> u64 {
    1_000
}

fn default_state_file() -> PathBuf {
    PathBuf::from("liftoff.json")
}

/// The serialized versions of the settings.
/// This allows for future changes to the settings format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default = "default_share_base_url")]
        share_base_url: String,

        #[serde(default = "default_calendar_name")]
        calendar_name: String,

        #[serde(default = "default_reminder_lead_minutes")]
        reminder_lead_minutes: u32,

        /// Nominal countdown refresh period, in milliseconds.
        #[serde(default = "default_refresh_interval_ms")]
        refresh_interval_ms: u64,

        #[serde(default = "default_state_file")]
        state_file: PathBuf,
    },
}

impl From<Versions> for Settings {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                share_base_url,
                calendar_name,
                reminder_lead_minutes,
                refresh_interval_ms,
                state_file,
            } => Self {
                share_base_url,
                calendar_name,
                reminder_lead_minutes,
                refresh_interval_ms,
                state_file,
            },
        }
    }
}

impl From<Settings> for Versions {
    fn from(settings: Settings) -> Self {
        Self::V1 {
            share_base_url: settings.share_base_url,
            calendar_name: settings.calendar_name,
            reminder_lead_minutes: settings.reminder_lead_minutes,
            refresh_interval_ms: settings.refresh_interval_ms,
            state_file: settings.state_file,
        }
    }
}
