use std::path::PathBuf;

use liftoff::domain::{
    reminder::{share_link, ReminderRequest},
    LaunchId,
};
use tracing::instrument;

use super::{find_launch, terminal::Colorize, Context};

#[derive(Debug, clap::Parser)]
pub struct Share {
    /// The launch feed file
    file: PathBuf,

    /// The launch identifier
    id: LaunchId,
}

impl Share {
    #[instrument(skip(context))]
    pub fn run(self, context: &Context) -> anyhow::Result<()> {
        let launch = find_launch(&self.file, &self.id)?;
        println!("{}", share_link(context.settings().share_base_url(), &launch.name));
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct Remind {
    /// The launch feed file
    file: PathBuf,

    /// The launch identifier
    id: LaunchId,
}

impl Remind {
    #[instrument(skip(context))]
    pub fn run(self, context: &Context) -> anyhow::Result<()> {
        let launch = find_launch(&self.file, &self.id)?;
        let reminder = ReminderRequest::for_launch(&launch, context.settings())
            .map_err(|e| anyhow::anyhow!("{} has no launch time yet: {e}", launch.name))?;

        let local = |instant: chrono::DateTime<chrono::Utc>| {
            instant
                .with_timezone(&chrono::Local)
                .format("%Y-%m-%d %H:%M %Z")
                .to_string()
        };
        println!("{}", reminder.title);
        println!("  Calendar: {}", reminder.calendar_name);
        println!("  Launch:   {}", local(reminder.starts_at));
        println!("  Alarm:    {}", local(reminder.alarm_at).dim());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use liftoff::Settings;

    use super::*;

    fn setup(net: &str) -> (tempfile::TempDir, Context, PathBuf) {
        let tmp = tempfile::tempdir().unwrap();
        let feed = tmp.path().join("launch.json");
        std::fs::write(
            &feed,
            format!(r#"{{"id": "L1", "name": "Falcon 9", "net": "{net}", "status": {{"name": "TBD"}}}}"#),
        )
        .unwrap();
        let context = Context::new(Settings::default(), tmp.path().join("liftoff.toml"));
        (tmp, context, feed)
    }

    #[test]
    fn remind_needs_a_launch_time() {
        let (_tmp, context, feed) = setup("TBD");
        let result = Remind {
            file: feed,
            id: LaunchId::try_from("L1").unwrap(),
        }
        .run(&context);
        assert!(result.is_err());
    }

    #[test]
    fn share_and_remind_known_launch() {
        let (_tmp, context, feed) = setup("2030-01-01T00:00:00Z");
        let id = LaunchId::try_from("L1").unwrap();

        Share {
            file: feed.clone(),
            id: id.clone(),
        }
        .run(&context)
        .unwrap();
        Remind { file: feed, id }.run(&context).unwrap();
    }
}
