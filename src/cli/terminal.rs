//! Terminal capability detection and utilities

use owo_colors::{colors::css, OwoColorize};

/// Detects whether colored output should be enabled
pub fn supports_color() -> bool {
    supports_color::on(supports_color::Stream::Stdout).is_some()
}

/// Extension trait for colorizing output
pub trait Colorize {
    /// Color as cleared to launch (green)
    fn success(&self) -> String;
    /// Color as not yet cleared (orange)
    fn warning(&self) -> String;
    /// Highlight a favorite (gold)
    fn highlight(&self) -> String;
    /// Dim the text
    fn dim(&self) -> String;
}

impl Colorize for str {
    fn success(&self) -> String {
        if supports_color() {
            self.fg::<css::LimeGreen>().to_string()
        } else {
            self.to_string()
        }
    }

    fn warning(&self) -> String {
        if supports_color() {
            self.fg::<css::Orange>().to_string()
        } else {
            self.to_string()
        }
    }

    fn highlight(&self) -> String {
        if supports_color() {
            self.fg::<css::Gold>().to_string()
        } else {
            self.to_string()
        }
    }

    fn dim(&self) -> String {
        if supports_color() {
            self.dimmed().to_string()
        } else {
            self.to_string()
        }
    }
}

impl Colorize for String {
    fn success(&self) -> String {
        self.as_str().success()
    }

    fn warning(&self) -> String {
        self.as_str().warning()
    }

    fn highlight(&self) -> String {
        self.as_str().highlight()
    }

    fn dim(&self) -> String {
        self.as_str().dim()
    }
}

/// Colours a launch status the way status badges are coloured.
pub fn status_badge(status: &liftoff::LaunchStatus) -> String {
    if status.is_go() {
        status.name.success()
    } else {
        status.name.warning()
    }
}
