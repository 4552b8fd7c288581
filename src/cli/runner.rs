//! CLI runner - executes commands

use crate::cli::commands::{parse_stream_list, Cli, Commands};
use crate::config::{MatomoConfig, PageSize};
use crate::engine::{SyncConfig, SyncEngine};
use crate::error::{Error, Result};
use crate::http::{HttpClient, HttpClientConfig};
use crate::output::MessageWriter;
use crate::streams::{select_streams, visits_details, Catalog};
use futures::TryStreamExt;
use serde_json::json;
use tracing::{debug, info};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Spec => self.spec(),
            Commands::Check { config_json } => self.check(config_json.as_deref()).await,
            Commands::Discover { config_json } => self.discover(config_json.as_deref()),
            Commands::Read {
                streams,
                config_json,
                max_pages,
            } => {
                self.read(streams.as_deref(), config_json.as_deref(), *max_pages)
                    .await
            }
        }
    }

    /// Load and validate configuration; inline JSON takes precedence over `--config`
    fn load_config(&self, inline: Option<&str>) -> Result<MatomoConfig> {
        let config = match (inline, &self.cli.config) {
            (Some(json_str), _) => MatomoConfig::from_json(json_str)?,
            (None, Some(path)) => MatomoConfig::from_file(path)?,
            (None, None) => {
                return Err(Error::config(
                    "No configuration supplied (use --config or --config-json)",
                ))
            }
        };

        config.validate()?;
        debug!("Loaded config: {config:?}");
        Ok(config)
    }

    /// Show the configuration specification
    fn spec(&self) -> Result<()> {
        let mut out = MessageWriter::stdout();
        out.write_json(&json!({
            "type": "SPEC",
            "spec": {
                "connectionSpecification": MatomoConfig::spec()
            }
        }))?;
        out.flush()
    }

    /// Check connection by fetching a single one-row page
    async fn check(&self, config_json: Option<&str>) -> Result<()> {
        let config = self
            .load_config(config_json)?
            .with_page_size(PageSize::Limited(1));
        info!("Checking connection to {}", config.api_url);

        let client = HttpClient::with_config(HttpClientConfig::from_settings(&config.http))?;
        let engine =
            SyncEngine::new(client, config).with_config(SyncConfig::new().with_max_pages(Some(1)));
        let stream = visits_details();

        let outcome = match engine.pages(&stream) {
            Ok(pages) => {
                futures::pin_mut!(pages);
                pages.try_next().await.map(|_| ())
            }
            Err(e) => Err(e),
        };

        let status = match outcome {
            Ok(()) => json!({
                "status": "SUCCEEDED",
                "message": "Connection successful"
            }),
            Err(e) => json!({
                "status": "FAILED",
                "message": format!("Connection failed: {e}")
            }),
        };

        let mut out = MessageWriter::stdout();
        out.write_json(&json!({
            "type": "CONNECTION_STATUS",
            "connectionStatus": status
        }))?;
        out.flush()
    }

    /// Print the stream catalog
    ///
    /// The catalog is static; a supplied configuration is still validated.
    fn discover(&self, config_json: Option<&str>) -> Result<()> {
        if config_json.is_some() || self.cli.config.is_some() {
            self.load_config(config_json)?;
        }

        let mut out = MessageWriter::stdout();
        out.write_json(&Catalog::discover())?;
        out.flush()
    }

    /// Sync the selected streams to stdout
    async fn read(
        &self,
        streams: Option<&str>,
        config_json: Option<&str>,
        max_pages: Option<usize>,
    ) -> Result<()> {
        let config = self.load_config(config_json)?;
        let streams = select_streams(&parse_stream_list(streams))?;

        let client = HttpClient::with_config(HttpClientConfig::from_settings(&config.http))?;
        let engine =
            SyncEngine::new(client, config).with_config(SyncConfig::new().with_max_pages(max_pages));

        let mut out = MessageWriter::stdout();
        let result = engine
            .sync_streams(&streams, &mut |message| out.write(&message))
            .await;
        out.flush()?;
        let stats = result?;

        info!(
            "Sync complete: {} records from {} pages across {} streams in {}ms",
            stats.records_synced, stats.pages_fetched, stats.streams_synced, stats.duration_ms
        );
        Ok(())
    }
}
