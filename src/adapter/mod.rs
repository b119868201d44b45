//! Source Adapter boundary
//!
//! Every supported results site implements [`SourceAdapter`]: discover the
//! event hierarchy, page through result listings, and fetch per-entity detail
//! payloads. Everything site-specific (markup selectors, payload decoding,
//! request headers, proxies) lives behind this trait; the engine only sees
//! identifiers, page chunks, and structured detail payloads.

pub mod http;

use crate::config::SourceConfig;
use async_trait::async_trait;
use thiserror::Error;

/// Failure classes an adapter call may raise
///
/// The engine's retry policy keys off these variants; adapters are expected
/// to map their transport and decode errors onto them (see [`http`] for the
/// reqwest helpers).
#[derive(Debug, Error)]
pub enum FetchError {
    /// Explicit "too many requests" signal from the source
    #[error("rate limited by source")]
    RateLimited,

    /// Non-success HTTP status (retryability decided by the policy)
    #[error("HTTP status {status}")]
    Http { status: u16 },

    /// Connection-level failure: timeout, refused connection, TLS error
    #[error("transport error: {0}")]
    Transport(String),

    /// Request succeeded but the payload was empty
    #[error("empty payload")]
    EmptyPayload,

    /// Payload could not be decoded or had an unexpected structure
    #[error("malformed payload: {0}")]
    Malformed(String),
}

/// Seed parameters consumed at crawl start, opaque to the engine
///
/// The engine passes these straight to [`SourceAdapter::discover_root`];
/// which of them matter depends on the site (some discover events by name
/// and year, others brute-force an identifier range).
#[derive(Debug, Clone)]
pub struct SeedParams {
    pub source_id: String,
    pub base_url: String,
    pub event_name: Option<String>,
    pub year: Option<u16>,
    pub id_range: Option<(u64, u64)>,
    pub page_limit: u64,
    pub proxy_range: Option<(u32, u32)>,
}

impl SeedParams {
    /// Builds seed parameters from the `[source]` config section
    pub fn from_config(source: &SourceConfig, page_limit: u64) -> Self {
        Self {
            source_id: source.id.clone(),
            base_url: source.base_url.clone(),
            event_name: source.event_name.clone(),
            year: source.year,
            id_range: source.start_id.zip(source.end_id),
            page_limit,
            proxy_range: source.proxy_start.zip(source.proxy_end),
        }
    }
}

/// One race instance within a master event (one year/edition)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRef {
    pub master_event_id: String,
    pub event_id: String,
    pub race_name: String,
    pub race_date: String,
}

/// One result listing under an event, paged by offset/limit
///
/// Typically a course or distance division; `list_id` must be unique across
/// the whole crawl (adapters usually namespace it with the event id).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRef {
    pub list_id: String,
    pub category: String,
    pub event: EventRef,
}

/// One individually fetchable participant record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafRef {
    /// Stable entity identifier within the source (entry id, bib lookup key)
    pub entity_id: String,
    /// Opaque locator the adapter needs to fetch the detail payload
    pub locator: String,
}

/// A page of leaf references plus the listing's declared total
#[derive(Debug, Clone)]
pub struct PageChunk {
    pub leaves: Vec<LeafRef>,
    pub declared_total: u64,
}

/// Capability contract implemented once per site
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    /// Discovers the top-level events to crawl from the seed parameters
    async fn discover_root(&self, seed: &SeedParams) -> Result<Vec<EventRef>, FetchError>;

    /// Discovers the result listings under one event
    async fn discover_children(&self, event: &EventRef) -> Result<Vec<ListRef>, FetchError>;

    /// Fetches one page of a result listing
    async fn fetch_page(
        &self,
        list: &ListRef,
        offset: u64,
        limit: u64,
    ) -> Result<PageChunk, FetchError>;

    /// Fetches the detail payload for one leaf entity
    ///
    /// The payload is a structured JSON value with the adapter's field
    /// extraction already applied; the engine's normalizer handles
    /// defaulting and enum mapping from there.
    async fn fetch_detail(&self, leaf: &LeafRef) -> Result<serde_json::Value, FetchError>;
}
