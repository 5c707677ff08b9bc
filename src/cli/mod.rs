pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{parse_interval_ms, Config};

#[derive(Parser)]
#[command(name = "freshet")]
#[command(about = "Keep a small set of RSS/Atom feeds fresh by polling them", long_about = None)]
pub struct Cli {
    /// Config file to use instead of ~/.config/freshet/config.toml
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Polling interval (e.g. "500ms", "5s", "1m", or plain milliseconds)
    #[arg(short, long, global = true, value_parser = parse_interval_ms)]
    pub interval: Option<u64>,

    /// Number of feeds refreshed at the same time
    #[arg(short, long, global = true)]
    pub workers: Option<usize>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Apply command-line overrides on top of the loaded configuration.
    pub fn apply(&self, config: &mut Config) {
        if let Some(interval) = self.interval {
            config.polling.interval_ms = interval;
        }
        if let Some(workers) = self.workers {
            config.polling.workers = workers.max(1);
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Subscribe to feeds and keep polling them; more URLs can be typed on stdin
    Watch {
        /// Feed URLs to subscribe to at startup
        urls: Vec<String>,
    },
    /// Fetch and parse a feed once, without subscribing
    Check {
        /// URL of the feed to check
        url: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_watch_with_overrides() {
        let cli = Cli::parse_from([
            "freshet",
            "--interval",
            "2s",
            "-w",
            "3",
            "watch",
            "https://a.example.com/rss",
            "https://b.example.com/rss",
        ]);

        let mut config = Config::default();
        cli.apply(&mut config);
        assert_eq!(config.polling.interval_ms, 2000);
        assert_eq!(config.polling.workers, 3);

        match cli.command {
            Commands::Watch { urls } => assert_eq!(urls.len(), 2),
            _ => panic!("expected watch"),
        }
    }

    #[test]
    fn test_defaults_leave_config_alone() {
        let cli = Cli::parse_from(["freshet", "check", "https://a.example.com/rss"]);
        let mut config = Config::default();
        cli.apply(&mut config);
        assert_eq!(config.polling.interval_ms, 5000);
    }

    #[test]
    fn test_rejects_bad_interval() {
        assert!(Cli::try_parse_from(["freshet", "-i", "soon", "watch"]).is_err());
    }
}
