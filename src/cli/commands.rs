//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Singer tap for the Matomo reporting API
#[derive(Parser, Debug)]
#[command(name = "tap-matomo")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (JSON or YAML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the configuration specification
    Spec,

    /// Test connection to the API
    Check {
        /// Inline config JSON
        #[arg(long)]
        config_json: Option<String>,
    },

    /// Discover available streams
    Discover {
        /// Inline config JSON
        #[arg(long)]
        config_json: Option<String>,
    },

    /// Read data from streams
    Read {
        /// Streams to sync (comma-separated, empty = all)
        #[arg(long)]
        streams: Option<String>,

        /// Inline config JSON
        #[arg(long)]
        config_json: Option<String>,

        /// Maximum pages per stream
        #[arg(long)]
        max_pages: Option<usize>,
    },
}

/// Split a `--streams` value into names
pub fn parse_stream_list(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()
    })
    .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_read_command() {
        let cli = Cli::try_parse_from([
            "tap-matomo",
            "--config",
            "config.json",
            "read",
            "--streams",
            "VisitsDetails",
            "--max-pages",
            "3",
        ])
        .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("config.json")));
        match cli.command {
            Commands::Read {
                streams, max_pages, ..
            } => {
                assert_eq!(streams.as_deref(), Some("VisitsDetails"));
                assert_eq!(max_pages, Some(3));
            }
            other => panic!("Expected read command, got {other:?}"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["tap-matomo", "check", "--verbose", "--config-json", "{}"])
            .unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Check { config_json: Some(_) }));
    }

    #[test]
    fn test_parse_stream_list() {
        assert!(parse_stream_list(None).is_empty());
        assert_eq!(
            parse_stream_list(Some(" VisitsDetails, ,Other ")),
            vec!["VisitsDetails".to_string(), "Other".to_string()]
        );
    }
}
