use crate::types::{FeedEndpoint, FeedSnapshot};
use async_trait::async_trait;

/// Produces the list of feeds to check. Failures are logged by the
/// implementation and reported as an empty list.
#[async_trait]
pub trait DirectorySource: Send + Sync {
    async fn resolve(&self) -> Vec<FeedEndpoint>;
}

/// Fetches the current entries of one feed.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// Must not fail: a feed that cannot be fetched or parsed comes back as a
    /// snapshot with no entries and `error` set.
    async fn fetch(&self, endpoint: &str) -> FeedSnapshot;
}

/// Delivers a text message to the configured destination.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Delivery problems are logged and swallowed.
    async fn notify(&self, text: &str);
}
