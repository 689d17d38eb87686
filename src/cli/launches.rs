use std::path::PathBuf;

use liftoff::{Countdown, LaunchRecord, ViewerZone};
use tracing::instrument;

use super::{read_launches, terminal::Colorize, Context};

#[derive(Debug, clap::Parser)]
pub struct Launches {
    /// The launch feed file (a launch, a list of launches, or a results page)
    file: PathBuf,

    /// Show the launches as past launches
    #[arg(long)]
    past: bool,
}

impl Launches {
    #[instrument(skip(context))]
    pub fn run(self, context: &Context) -> anyhow::Result<()> {
        let launches = read_launches(&self.file)?;
        let store = context.open_store();
        let now = chrono::Utc::now();

        if launches.is_empty() {
            println!("{}", "No launches".dim());
        }

        for launch in &launches {
            let countdown = Countdown::new(launch, self.past, ViewerZone::Local, now);
            let marker = if store.is_favorite(&launch.id) {
                "★".highlight()
            } else {
                " ".to_string()
            };
            println!("{}", row(launch, &marker, &countdown));
        }
        Ok(())
    }
}

fn row(launch: &LaunchRecord, marker: &str, countdown: &Countdown) -> String {
    let mut line = format!(
        "{marker} {}  {}  {}",
        launch.name,
        super::terminal::status_badge(&launch.status),
        countdown.display_text()
    );
    if let Some(location) = launch.location() {
        line.push_str(&format!("  {}", location.dim()));
    }
    line
}

#[cfg(test)]
mod tests {
    use liftoff::Settings;

    use super::*;

    #[test]
    fn lists_a_results_page() {
        let tmp = tempfile::tempdir().unwrap();
        let feed = tmp.path().join("launches.json");
        std::fs::write(
            &feed,
            r#"{"results": [{"id": "L1", "name": "Falcon 9", "net": "TBD", "status": {"name": "TBD"}}]}"#,
        )
        .unwrap();
        let context = Context::new(Settings::default(), tmp.path().join("liftoff.toml"));

        Launches {
            file: feed,
            past: false,
        }
        .run(&context)
        .unwrap();
    }

    #[test]
    fn missing_file_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let context = Context::new(Settings::default(), tmp.path().join("liftoff.toml"));

        let result = Launches {
            file: tmp.path().join("missing.json"),
            past: true,
        }
        .run(&context);
        assert!(result.is_err());
    }
}
