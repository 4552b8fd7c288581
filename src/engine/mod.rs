//! Execution engine module
//!
//! Main read loop and stream orchestration.
//!
//! # Overview
//!
//! The engine module provides:
//! - `SyncEngine` - Drives the fetch loop for one stream at a time
//! - `SyncConfig` - Configuration for sync operations
//! - Message types for output (Schema, Record)
//!
//! Each page is requested, validated, handed to the paginator and then
//! decoded; the next request is only built once the previous page's
//! records have been produced. Pages are pulled lazily, so at most one
//! page is held in memory.

mod types;

pub use types::{Message, Page, SyncConfig, SyncStats};

use crate::config::MatomoConfig;
use crate::decode::{JsonDecoder, Record};
use crate::error::Result;
use crate::http::Transport;
use crate::pagination::Paginator;
use crate::request::RequestBuilder;
use crate::streams::StreamDefinition;
use crate::validate::validate_response;
use chrono::Utc;
use futures::stream::{self, Stream, TryStreamExt};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Sync engine for orchestrating data extraction
pub struct SyncEngine<T: Transport> {
    /// Transport used for every page request
    transport: T,
    /// Fetch configuration
    config: MatomoConfig,
    /// Sync configuration
    sync_config: SyncConfig,
    /// Record extractor
    decoder: JsonDecoder,
}

impl<T: Transport> SyncEngine<T> {
    /// Create a new sync engine
    pub fn new(transport: T, config: MatomoConfig) -> Self {
        Self {
            transport,
            config,
            sync_config: SyncConfig::default(),
            decoder: JsonDecoder::new(),
        }
    }

    /// Set sync configuration
    #[must_use]
    pub fn with_config(mut self, sync_config: SyncConfig) -> Self {
        self.sync_config = sync_config;
        self
    }

    /// Fetch configuration
    pub fn config(&self) -> &MatomoConfig {
        &self.config
    }

    /// Lazy sequence of pages for a stream
    ///
    /// Ends after the paginator reports exhaustion, after the page cap, or
    /// at the first error (which is yielded as the final item).
    pub fn pages(&self, stream: &StreamDefinition) -> Result<impl Stream<Item = Result<Page>> + '_> {
        let state = PageState {
            transport: &self.transport,
            decoder: &self.decoder,
            builder: RequestBuilder::for_stream(&self.config, stream),
            paginator: Paginator::from_config(&self.config)?,
            max_pages: self.sync_config.max_pages,
            fetched: 0,
            done: false,
        };

        Ok(stream::try_unfold(state, PageState::next_page))
    }

    /// Lazy sequence of records for a stream, in page then source order
    pub fn records(
        &self,
        stream: &StreamDefinition,
    ) -> Result<impl Stream<Item = Result<Record>> + '_> {
        Ok(self
            .pages(stream)?
            .map_ok(|page| stream::iter(page.records.into_iter().map(Ok)))
            .try_flatten())
    }

    /// Sync one stream, handing a SCHEMA message and then every RECORD to `emit`
    ///
    /// Records already emitted stay emitted when a later page fails.
    pub async fn sync_stream<F>(&self, stream: &StreamDefinition, emit: &mut F) -> Result<SyncStats>
    where
        F: FnMut(Message) -> Result<()>,
    {
        let start = Instant::now();
        let mut stats = SyncStats::new();

        info!("Starting sync for stream: {}", stream.name);
        emit(Message::schema(stream))?;

        let pages = self.pages(stream)?;
        futures::pin_mut!(pages);

        while let Some(page) = pages.try_next().await? {
            stats.add_page();
            let count = page.records.len();
            debug!("Page {}: {count} records", page.number);

            for record in page.records {
                emit(Message::record(&stream.name, record, page.fetched_at))?;
            }
            stats.add_records(count);
        }

        stats.add_stream();
        #[allow(clippy::cast_possible_truncation)]
        stats.set_duration(start.elapsed().as_millis() as u64);

        info!(
            "Completed sync for {}: {} records in {} pages",
            stream.name, stats.records_synced, stats.pages_fetched
        );

        Ok(stats)
    }

    /// Sync several streams in order, stopping at the first failure
    pub async fn sync_streams<F>(&self, streams: &[StreamDefinition], emit: &mut F) -> Result<SyncStats>
    where
        F: FnMut(Message) -> Result<()>,
    {
        let mut total = SyncStats::new();
        for stream in streams {
            let stats = self.sync_stream(stream, emit).await?;
            total.merge(&stats);
        }
        Ok(total)
    }
}

/// Loop state threaded through the page stream
struct PageState<'a, T> {
    transport: &'a T,
    decoder: &'a JsonDecoder,
    builder: RequestBuilder,
    paginator: Paginator,
    max_pages: Option<usize>,
    fetched: usize,
    done: bool,
}

impl<'a, T: Transport> PageState<'a, T> {
    async fn next_page(mut self) -> Result<Option<(Page, Self)>> {
        if self.done {
            return Ok(None);
        }
        if let Some(max) = self.max_pages {
            if self.fetched >= max {
                warn!("Stopping after {max} pages (page cap reached)");
                return Ok(None);
            }
        }

        let cursor = self.paginator.cursor();
        let request = self.builder.build(cursor.as_ref());
        match &cursor {
            Some(c) => debug!("Fetching page {} ({c})", self.fetched + 1),
            None => debug!("Fetching page {}", self.fetched + 1),
        }

        let response = self.transport.execute(&request).await?;
        let fetched_at = Utc::now();
        self.fetched += 1;

        let payload = match validate_response(&response.body)? {
            Some(payload) => payload,
            None => self.decoder.parse(&response.body)?,
        };

        self.paginator.advance(&payload);
        if self.paginator.is_finished() {
            self.done = true;
        }

        let records = self.decoder.extract(payload)?.collect::<Result<Vec<_>>>()?;

        let page = Page {
            number: self.fetched,
            cursor,
            records,
            fetched_at,
        };
        Ok(Some((page, self)))
    }
}
