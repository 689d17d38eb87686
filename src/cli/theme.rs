use liftoff::Theme;
use tracing::instrument;

use super::Context;

#[derive(Debug, Default, clap::Parser)]
pub struct ThemeCommand {
    #[command(subcommand)]
    action: Option<Action>,
}

#[derive(Debug, clap::Subcommand)]
enum Action {
    /// Print the current theme (default)
    Get,

    /// Switch to a theme
    Set {
        /// The theme: light or dark
        theme: Theme,
    },
}

impl ThemeCommand {
    #[instrument(skip(context))]
    pub fn run(self, context: &Context) -> anyhow::Result<()> {
        let mut store = context.open_store();
        match self.action.unwrap_or(Action::Get) {
            Action::Get => println!("{}", store.theme()),
            Action::Set { theme } => {
                store.set_theme(theme);
                if !store.flush() {
                    anyhow::bail!("Theme changed to {theme} but could not be saved");
                }
                println!("Theme set to {theme}");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use liftoff::Settings;

    use super::*;

    #[test]
    fn set_theme_is_remembered() {
        let tmp = tempfile::tempdir().unwrap();
        let context = Context::new(Settings::default(), tmp.path().join("liftoff.toml"));

        ThemeCommand {
            action: Some(Action::Set { theme: Theme::Dark }),
        }
        .run(&context)
        .unwrap();
        assert_eq!(context.open_store().theme(), Theme::Dark);

        ThemeCommand {
            action: Some(Action::Set { theme: Theme::Light }),
        }
        .run(&context)
        .unwrap();
        assert_eq!(context.open_store().theme(), Theme::Light);
    }
}
