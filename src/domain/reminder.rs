//! Inputs handed to the calendar and share collaborators.
//!
//! The side effects themselves (permissions, calendars, share sheets) live
//! outside this crate behind [`CalendarIntegration`] and [`ShareSheet`]. What
//! lives here is the data they are given and the rule that their failures end
//! as a [`Notice`] for the user, never as an error for the caller.

use std::fmt;

use chrono::{DateTime, Duration, Utc};

use crate::{
    domain::{InvalidNetError, LaunchRecord},
    Settings,
};

/// A calendar reminder for a launch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderRequest {
    /// The calendar the event is filed under; created if missing.
    pub calendar_name: String,
    /// Event title.
    pub title: String,
    /// Event start: the launch instant.
    pub starts_at: DateTime<Utc>,
    /// When the alarm fires.
    pub alarm_at: DateTime<Utc>,
}

impl ReminderRequest {
    /// Builds the reminder for `launch`, alarming
    /// [`Settings::reminder_lead_minutes`] before lift-off.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidNetError`] if the launch instant cannot be parsed.
    pub fn for_launch(launch: &LaunchRecord, settings: &Settings) -> Result<Self, InvalidNetError> {
        let starts_at = launch.instant()?;
        let lead = Duration::minutes(i64::from(settings.reminder_lead_minutes()));
        Ok(Self {
            calendar_name: settings.calendar_name().to_string(),
            title: launch.name.clone(),
            starts_at,
            alarm_at: starts_at - lead,
        })
    }
}

/// Whether the user let the app touch their calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    /// Access granted.
    Granted,
    /// Access refused.
    Denied,
}

/// The platform calendar.
pub trait CalendarIntegration {
    /// The error raised by the platform.
    type Error: fmt::Display;

    /// Asks the user for calendar access.
    fn request_permission(&mut self) -> Permission;

    /// Files `reminder`, creating its calendar if needed.
    ///
    /// # Errors
    ///
    /// Returns the platform error if the event could not be created.
    fn create_event(&mut self, reminder: &ReminderRequest) -> Result<(), Self::Error>;
}

/// The platform share mechanism.
pub trait ShareSheet {
    /// The error raised by the platform.
    type Error: fmt::Display;

    /// Shares `url` under the title `title`.
    ///
    /// # Errors
    ///
    /// Returns the platform error if sharing failed.
    fn share(&mut self, title: &str, url: &str) -> Result<(), Self::Error>;
}

/// A short-lived message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice(pub String);

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The deep link for a launch: `<base>/<name with spaces replaced by hyphens>`.
#[must_use]
pub fn share_link(base_url: &str, name: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), name.replace(' ', "-"))
}

/// Shares `launch` through `sheet`.
///
/// Returns a [`Notice`] describing the failure, if there was one.
pub fn share_launch<S: ShareSheet>(
    sheet: &mut S,
    launch: &LaunchRecord,
    settings: &Settings,
) -> Option<Notice> {
    let url = share_link(settings.share_base_url(), &launch.name);
    sheet.share(&launch.name, &url).err().map(|e| {
        tracing::warn!("Sharing {} failed: {e}", launch.id);
        Notice(format!("Could not share {}: {e}", launch.name))
    })
}

/// Adds a reminder for `launch` to the platform calendar.
///
/// Returns a [`Notice`] telling the user how it went.
pub fn remind_launch<C: CalendarIntegration>(
    calendar: &mut C,
    launch: &LaunchRecord,
    settings: &Settings,
) -> Notice {
    let reminder = match ReminderRequest::for_launch(launch, settings) {
        Ok(reminder) => reminder,
        Err(e) => {
            tracing::warn!("No reminder for {}: {e}", launch.id);
            return Notice(format!("{} has no launch time yet", launch.name));
        }
    };

    if calendar.request_permission() == Permission::Denied {
        return Notice("Calendar access was denied".to_string());
    }

    calendar.create_event(&reminder).map_or_else(
        |e| {
            tracing::warn!("Creating reminder for {} failed: {e}", launch.id);
            Notice(format!("Could not add a reminder: {e}"))
        },
        |()| Notice(format!("Reminder added for {}", launch.name)),
    )
}
