use crate::config::RelayConfig;
use crate::fetcher::Fetcher;
use crate::message;
use crate::opml::OpmlResolver;
use crate::state::SeenStateStore;
use crate::telegram::TelegramNotifier;
use crate::traits::{DirectorySource, Notifier, SnapshotSource};
use crate::types::{NoveltyPolicy, Result, SeenState};
use chrono::Local;
use interfaces::NoveltyDetector;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    pub policy: NoveltyPolicy,
    pub notify_empty: bool,
    pub start_banner: bool,
    pub end_banner: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub feeds_total: usize,
    pub feeds_failed: usize,
    pub feeds_with_new_posts: usize,
    pub new_posts: usize,
    pub state_saved: bool,
}

/// Checks every feed once, relays what is new and remembers it.
///
/// Feeds are handled one after another in directory order; the notifier's
/// pause after each message is what keeps the destination within its rate
/// limit, so this loop must stay sequential.
pub struct FeedRelay {
    directory: Box<dyn DirectorySource>,
    source: Box<dyn SnapshotSource>,
    notifier: Box<dyn Notifier>,
    store: SeenStateStore,
    options: RunOptions,
}

impl FeedRelay {
    pub fn new(
        directory: Box<dyn DirectorySource>,
        source: Box<dyn SnapshotSource>,
        notifier: Box<dyn Notifier>,
        store: SeenStateStore,
        options: RunOptions,
    ) -> Self {
        Self {
            directory,
            source,
            notifier,
            store,
            options,
        }
    }

    /// Wire up the HTTP-backed components described by `config`.
    pub fn from_config(config: &RelayConfig) -> Result<Self> {
        let fetcher = Fetcher::new(config.fetch.clone())?;
        let resolver = OpmlResolver::new(fetcher.clone(), config.opml_url.clone());
        let notifier = TelegramNotifier::new(config.telegram.clone(), config.send_delay)?;
        if !notifier.is_enabled() {
            warn!("Telegram bot token or channel ID not set; messages will not be delivered");
        }

        Ok(Self::new(
            Box::new(resolver),
            Box::new(fetcher),
            Box::new(notifier),
            SeenStateStore::new(&config.state_file),
            config.run_options(),
        ))
    }

    pub async fn run(&self) -> RunSummary {
        info!("Starting RSS relay run ({} policy)", self.options.policy);
        let mut summary = RunSummary::default();

        let mut state = self.store.load();

        if self.options.start_banner {
            let today = Local::now().date_naive();
            self.notifier.notify(&message::start_banner(today)).await;
        }

        let endpoints = self.directory.resolve().await;
        if endpoints.is_empty() {
            info!("No feeds to check; leaving state untouched");
            return summary;
        }
        summary.feeds_total = endpoints.len();

        for endpoint in &endpoints {
            let outcome = self.process_feed(endpoint, &mut state).await;
            if outcome.failed {
                summary.feeds_failed += 1;
            }
            if outcome.new_posts > 0 {
                summary.feeds_with_new_posts += 1;
                summary.new_posts += outcome.new_posts;
            }
        }

        if summary.new_posts == 0 {
            info!("No new posts found for any feed.");
        }

        match self.store.save(&state) {
            Ok(()) => summary.state_saved = true,
            Err(e) => error!(
                "Failed to save state to {}: {}",
                self.store.path().display(),
                e
            ),
        }

        info!(
            "Process complete: {} feeds checked, {} failed, {} new posts",
            summary.feeds_total, summary.feeds_failed, summary.new_posts
        );

        if self.options.end_banner {
            self.notifier.notify(&message::end_banner()).await;
        }

        summary
    }

    async fn process_feed(&self, endpoint: &str, state: &mut SeenState) -> FeedOutcome {
        let snapshot = self.source.fetch(endpoint).await;
        let failed = !snapshot.is_success();
        if let Some(reason) = &snapshot.error {
            warn!("Feed {} contributed no entries: {}", endpoint, reason);
        }

        let identity = snapshot.identity();
        let detection = self
            .options
            .policy
            .detect(&snapshot.entries, state.get(&identity));
        debug!(
            "Feed {} ({}): {} entries, {} new",
            endpoint,
            identity,
            snapshot.entries.len(),
            detection.new_entries.len()
        );

        if let Some(memory) = detection.memory.clone() {
            state.insert(identity, memory);
        }

        if detection.has_new_entries() {
            info!(
                "Found {} new posts from {}",
                detection.new_entries.len(),
                endpoint
            );
            self.notifier
                .notify(&message::new_posts(endpoint, &detection.new_entries))
                .await;
        } else if self.options.notify_empty {
            self.notifier.notify(&message::no_posts(endpoint)).await;
        }

        FeedOutcome {
            failed,
            new_posts: detection.new_entries.len(),
        }
    }
}

struct FeedOutcome {
    failed: bool,
    new_posts: usize,
}
