use std::path::PathBuf;

// Use the interfaces crate for core types
pub use interfaces::{Detection, Entry, FeedEndpoint, FeedMemory, NoveltyPolicy, SeenState};

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub user_agent: String,
    pub timeout_seconds: u64,
    pub max_feed_size_mb: usize,
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "RSS-Relay/1.0".to_string(),
            timeout_seconds: 30,
            max_feed_size_mb: 10,
            max_redirects: 5,
        }
    }
}

#[derive(Debug)]
pub struct ParsedFeed {
    pub title: Option<String>,
    pub entries: Vec<Entry>,
}

/// One fetch of one feed. A failed fetch carries the reason in `error` and no
/// entries, so it never changes what is remembered for the feed.
#[derive(Debug, Clone)]
pub struct FeedSnapshot {
    pub endpoint: FeedEndpoint,
    pub title: Option<String>,
    pub entries: Vec<Entry>,
    pub error: Option<String>,
}

impl FeedSnapshot {
    pub fn new(endpoint: impl Into<String>, title: Option<String>, entries: Vec<Entry>) -> Self {
        Self {
            endpoint: endpoint.into(),
            title,
            entries,
            error: None,
        }
    }

    pub fn failed(endpoint: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            title: None,
            entries: Vec::new(),
            error: Some(error.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// Key the feed's memory is stored under.
    pub fn identity(&self) -> String {
        interfaces::feed_identity(self.title.as_deref(), &self.endpoint)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("Directory document unavailable at {url}: {reason}")]
    SourceUnavailable { url: String, reason: String },

    #[error("Directory document malformed: {0}")]
    SourceMalformed(String),

    #[error("Feed unavailable at {url}: {reason}")]
    FeedUnavailable { url: String, reason: String },

    #[error("Feed parse error: {0}")]
    FeedMalformed(String),

    #[error("Feed size exceeds limit: {size_mb}MB")]
    FeedTooLarge { size_mb: usize },

    #[error("State file {} is corrupted: {source}", .path.display())]
    StateCorrupted {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Delivery failed: {0}")]
    DeliveryFailed(String),

    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RelayError>;
