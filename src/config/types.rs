use serde::Deserialize;

/// Main configuration structure for Finishline
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub source: SourceConfig,
    pub output: OutputConfig,
}

/// Engine behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Number of concurrent fetch workers
    #[serde(rename = "max-concurrent-fetches")]
    pub max_concurrent_fetches: u32,

    /// Page size for offset/limit result listings
    #[serde(rename = "page-limit")]
    pub page_limit: u64,

    /// Maximum re-enqueues for a task failing with a retryable error
    #[serde(rename = "max-transient-retries")]
    pub max_transient_retries: u32,

    /// Maximum re-fetches for an empty-but-successful payload
    #[serde(rename = "max-empty-retries")]
    pub max_empty_retries: u32,

    /// Length of the scheduler-wide pause after a rate-limit signal (ms)
    #[serde(rename = "rate-limit-cooldown-ms")]
    pub rate_limit_cooldown_ms: u64,

    /// HTTP status codes treated as retryable transport failures
    #[serde(
        rename = "retry-status-codes",
        default = "default_retry_status_codes"
    )]
    pub retry_status_codes: Vec<u16>,
}

fn default_retry_status_codes() -> Vec<u16> {
    // Server-side and transit failures; 429 gets its own handling
    vec![500, 502, 503, 504, 522, 524, 408]
}

/// Target source configuration, passed through to the adapter's root discovery
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// Source identifier (scopes dedup keys)
    pub id: String,

    /// Base URL of the source's API or result pages
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Hierarchy/event name to crawl (e.g. a master event name)
    #[serde(rename = "event-name", default)]
    pub event_name: Option<String>,

    /// Year filter for recurring events
    #[serde(default)]
    pub year: Option<u16>,

    /// Lower bound for brute-force identifier enumeration
    #[serde(rename = "start-id", default)]
    pub start_id: Option<u64>,

    /// Upper bound (exclusive) for brute-force identifier enumeration
    #[serde(rename = "end-id", default)]
    pub end_id: Option<u64>,

    /// Slice of the proxy pool to draw from, opaque to the engine
    #[serde(rename = "proxy-start", default)]
    pub proxy_start: Option<u32>,

    #[serde(rename = "proxy-end", default)]
    pub proxy_end: Option<u32>,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path for the collected-records JSON dump
    #[serde(rename = "records-path")]
    pub records_path: String,

    /// Path for the reconciliation report CSV
    #[serde(rename = "report-path")]
    pub report_path: String,
}
