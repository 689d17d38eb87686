use std::path::PathBuf;

use liftoff::{domain::LaunchId, Countdown, ViewerZone};
use tracing::instrument;

use super::{find_launch, terminal::Colorize, Context};

#[derive(Debug, Default, clap::Parser)]
pub struct Favorite {
    #[command(subcommand)]
    action: Option<Action>,
}

#[derive(Debug, clap::Subcommand)]
enum Action {
    /// List favorite launches (default)
    List,

    /// Mark a launch from a feed file as a favorite
    Add {
        /// The launch feed file
        file: PathBuf,
        /// The launch identifier
        id: LaunchId,
    },

    /// Remove a launch from the favorites
    Remove {
        /// The launch identifier
        id: LaunchId,
    },

    /// Add a launch if it is not a favorite, remove it if it is
    Toggle {
        /// The launch feed file
        file: PathBuf,
        /// The launch identifier
        id: LaunchId,
    },
}

impl Favorite {
    #[instrument(skip(context))]
    pub fn run(self, context: &Context) -> anyhow::Result<()> {
        let mut store = context.open_store();

        match self.action.unwrap_or(Action::List) {
            Action::List => {
                let now = chrono::Utc::now();
                let favorites = store.favorites();
                if favorites.is_empty() {
                    println!("{}", "No favorite launches yet".dim());
                }
                for favorite in favorites {
                    let countdown = Countdown::with_instant(
                        favorite.id.clone(),
                        favorite.instant(),
                        favorite.instant().is_some_and(|net| net < now),
                        ViewerZone::Local,
                        now,
                    );
                    println!(
                        "{} {}  {}  {}",
                        "★".highlight(),
                        favorite.name,
                        super::terminal::status_badge(&favorite.status),
                        countdown.display_text().dim()
                    );
                }
            }
            Action::Add { file, id } => {
                let launch = find_launch(&file, &id)?;
                store.add_favorite(&launch);
                println!("{}", format!("★ Added {}", launch.name).highlight());
            }
            Action::Remove { id } => {
                let message = store.favorite(&id).map_or_else(
                    || format!("{id} was not a favorite").dim(),
                    |favorite| format!("Removed {}", favorite.name),
                );
                store.remove_favorite(&id);
                println!("{message}");
            }
            Action::Toggle { file, id } => {
                let launch = find_launch(&file, &id)?;
                if store.toggle_favorite(&launch) {
                    println!("{}", format!("★ Added {}", launch.name).highlight());
                } else {
                    println!("Removed {}", launch.name);
                }
            }
        }

        if !store.flush() {
            tracing::warn!("Favorites could not be saved; they will be retried next time");
        }
        Ok(())
    }
}
