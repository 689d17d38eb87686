use std::path::{Path, PathBuf};

mod countdown;
mod favorite;
mod launches;
mod share;
mod terminal;
mod theme;

use clap::ArgAction;
use countdown::Countdown;
use favorite::Favorite;
use launches::Launches;
use liftoff::{
    domain::{parse_feed, LaunchId, LaunchRecord},
    FileStorage, SelectionStore, Settings, Theme,
};
use share::{Remind, Share};
use theme::ThemeCommand;

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global=true)]
    verbose: u8,

    /// The path to the settings file
    #[arg(short, long, default_value = "liftoff.toml", global = true)]
    settings: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        let context = Context::load(self.settings);
        self.command
            .unwrap_or_else(|| Command::Favorite(Favorite::default()))
            .run(&context)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Show the time remaining until a launch instant
    Countdown(Countdown),

    /// List the launches in a launch feed file
    Launches(Launches),

    /// Show or change favorite launches (default: list them)
    Favorite(Favorite),

    /// Show or change the theme
    Theme(ThemeCommand),

    /// Print the share link for a launch
    Share(Share),

    /// Print the calendar reminder for a launch
    Remind(Remind),
}

impl Command {
    fn run(self, context: &Context) -> anyhow::Result<()> {
        match self {
            Self::Countdown(command) => command.run(context)?,
            Self::Launches(command) => command.run(context)?,
            Self::Favorite(command) => command.run(context)?,
            Self::Theme(command) => command.run(context)?,
            Self::Share(command) => command.run(context)?,
            Self::Remind(command) => command.run(context)?,
        }
        Ok(())
    }
}

/// Settings shared by every command.
#[derive(Debug)]
pub struct Context {
    settings: Settings,
    settings_path: PathBuf,
}

impl Context {
    /// Loads the settings at `path`, falling back to defaults.
    fn load(settings_path: PathBuf) -> Self {
        let settings = Settings::load(&settings_path).unwrap_or_else(|e| {
            tracing::debug!("Failed to load settings: {e}");
            Settings::default()
        });
        Self {
            settings,
            settings_path,
        }
    }

    #[cfg(test)]
    const fn new(settings: Settings, settings_path: PathBuf) -> Self {
        Self {
            settings,
            settings_path,
        }
    }

    const fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Opens the selection store named by the settings.
    fn open_store(&self) -> SelectionStore<FileStorage> {
        let path = self.settings.state_path(&self.settings_path);
        tracing::debug!("Opening selection store at {}", path.display());
        SelectionStore::open(FileStorage::new(path), detect_host_scheme)
    }
}

/// Reads the terminal's colour scheme from `COLORFGBG`.
///
/// The variable holds `foreground;background` colour codes; backgrounds 0-6
/// and 8 are dark. Anything else, including no variable at all, reads as
/// light.
fn detect_host_scheme() -> Theme {
    let scheme = std::env::var("COLORFGBG")
        .ok()
        .and_then(|value| scheme_from_colorfgbg(&value))
        .unwrap_or_default();
    tracing::debug!("Host colour scheme is {scheme}");
    scheme
}

fn scheme_from_colorfgbg(value: &str) -> Option<Theme> {
    let background: u8 = value.rsplit(';').next()?.trim().parse().ok()?;
    Some(match background {
        0..=6 | 8 => Theme::Dark,
        _ => Theme::Light,
    })
}

/// Reads every launch in the feed file at `path`.
fn read_launches(path: &Path) -> anyhow::Result<Vec<LaunchRecord>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", path.display()))?;
    parse_feed(&content)
        .map_err(|e| anyhow::anyhow!("Failed to parse launches in {}: {e}", path.display()))
}

/// Finds the launch `id` in the feed file at `path`.
fn find_launch(path: &Path, id: &LaunchId) -> anyhow::Result<LaunchRecord> {
    read_launches(path)?
        .into_iter()
        .find(|launch| &launch.id == id)
        .ok_or_else(|| anyhow::anyhow!("No launch '{id}' in {}", path.display()))
}
