pub mod config;
pub mod fetcher;
pub mod message;
pub mod opml;
pub mod parser;
pub mod relay;
pub mod state;
pub mod telegram;
pub mod traits;
pub mod types;

pub use config::{Cli, RelayConfig};
pub use fetcher::Fetcher;
pub use opml::OpmlResolver;
pub use parser::FeedParser;
pub use relay::{FeedRelay, RunOptions, RunSummary};
pub use state::SeenStateStore;
pub use telegram::{TelegramConfig, TelegramNotifier};
pub use traits::{DirectorySource, Notifier, SnapshotSource};
pub use types::*;
