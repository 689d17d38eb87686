use std::{thread, time::Duration};

use liftoff::{
    domain::{parse_net, LaunchId},
    CountdownTimer, SystemClock, ViewerZone,
};
use tracing::instrument;

use super::Context;

/// How often the watch loop checks whether the timer has finished.
const POLL: Duration = Duration::from_millis(100);

#[derive(Debug, clap::Parser)]
pub struct Countdown {
    /// The launch instant (ISO-8601, UTC)
    net: String,

    /// Treat the launch as historical and show the elapsed distance
    #[arg(long)]
    past: bool,

    /// Keep refreshing until the countdown finishes
    #[arg(long)]
    watch: bool,
}

impl Countdown {
    #[instrument(skip(context))]
    pub fn run(self, context: &Context) -> anyhow::Result<()> {
        let countdown = self.countdown(chrono::Utc::now())?;
        println!("{}", countdown.display_text());

        if !self.watch {
            return Ok(());
        }

        let timer = CountdownTimer::start(
            countdown,
            SystemClock,
            context.settings().refresh_interval(),
            |countdown| println!("{}", countdown.display_text()),
        )?;
        while timer.is_running() {
            thread::sleep(POLL);
        }
        Ok(())
    }

    fn countdown(&self, now: chrono::DateTime<chrono::Utc>) -> anyhow::Result<liftoff::Countdown> {
        let net = parse_net(&self.net)
            .inspect_err(|e| tracing::info!("{e}"))
            .ok();
        Ok(liftoff::Countdown::with_instant(
            LaunchId::try_from("countdown")?,
            net,
            self.past,
            ViewerZone::Local,
            now,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(net: &str, past: bool) -> Countdown {
        Countdown {
            net: net.to_string(),
            past,
            watch: false,
        }
    }

    #[test]
    fn prints_seconds_remaining() {
        let now = parse_net("2025-01-01T12:00:00Z").unwrap();
        let countdown = command("2025-01-01T12:00:30Z", false).countdown(now).unwrap();
        assert_eq!(countdown.display_text(), "in 30s");
    }

    #[test]
    fn invalid_instant_is_unknown() {
        let now = parse_net("2025-01-01T12:00:00Z").unwrap();
        let countdown = command("whenever", false).countdown(now).unwrap();
        assert_eq!(countdown.display_text(), "Unknown");
        assert!(countdown.is_terminal());
    }

    #[test]
    fn watch_returns_once_terminal() {
        let tmp = tempfile::tempdir().unwrap();
        let context = Context::new(
            liftoff::Settings::default(),
            tmp.path().join("liftoff.toml"),
        );
        let command = Countdown {
            net: "2000-01-01T00:00:00Z".to_string(),
            past: false,
            watch: true,
        };
        command.run(&context).unwrap();
    }
}
