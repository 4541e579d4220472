use crate::relay::RunOptions;
use crate::telegram::{TelegramConfig, DEFAULT_API_BASE};
use crate::types::{FetchConfig, NoveltyPolicy};
use clap::{ArgAction, Parser};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_OPML_URL: &str =
    "https://github.com/zeotrix/Security_Materials/raw/main/feedly-2022-06-10.opml";

/// Settings for one run, read once at startup.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub opml_url: String,
    pub state_file: PathBuf,
    pub policy: NoveltyPolicy,
    pub notify_empty: bool,
    pub start_banner: bool,
    pub end_banner: bool,
    pub send_delay: Duration,
    pub telegram: TelegramConfig,
    pub fetch: FetchConfig,
}

impl RelayConfig {
    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            policy: self.policy,
            notify_empty: self.notify_empty,
            start_banner: self.start_banner,
            end_banner: self.end_banner,
        }
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "rss-relay",
    version,
    about = "Check the feeds listed in an OPML file once and relay new posts to Telegram"
)]
pub struct Cli {
    /// OPML document listing the feeds to check
    #[arg(long, env = "OPML_URL", default_value = DEFAULT_OPML_URL)]
    pub opml_url: String,

    /// JSON file remembering delivered posts
    #[arg(long, env = "STATE_FILE", default_value = "last_posts.json")]
    pub state_file: PathBuf,

    /// How new posts are detected: "watermark" or "membership"
    #[arg(long, env = "NOVELTY_POLICY", default_value_t = NoveltyPolicy::Watermark)]
    pub policy: NoveltyPolicy,

    /// Also send a notice for feeds without new posts
    #[arg(long, env = "NOTIFY_EMPTY", default_value_t = false, action = ArgAction::Set)]
    pub notify_empty: bool,

    /// Send a dated greeting before checking the feeds
    #[arg(long, env = "START_BANNER", default_value_t = false, action = ArgAction::Set)]
    pub start_banner: bool,

    /// Send a closing notice once the run is complete
    #[arg(long, env = "END_BANNER", default_value_t = true, action = ArgAction::Set)]
    pub end_banner: bool,

    /// Pause after every message, in milliseconds
    #[arg(long, env = "SEND_DELAY_MS", default_value_t = 1000)]
    pub send_delay_ms: u64,

    #[arg(long, env = "TELEGRAM_BOT_TOKEN", hide_env_values = true)]
    pub telegram_bot_token: Option<String>,

    #[arg(long, env = "TELEGRAM_CHANNEL_ID", hide_env_values = true)]
    pub telegram_channel_id: Option<String>,

    #[arg(long, env = "TELEGRAM_API_BASE", default_value = DEFAULT_API_BASE)]
    pub telegram_api_base: String,

    #[arg(long, env = "USER_AGENT", default_value = "RSS-Relay/1.0")]
    pub user_agent: String,

    #[arg(long, env = "TIMEOUT_SECONDS", default_value_t = 30)]
    pub timeout_seconds: u64,

    #[arg(long, env = "MAX_FEED_SIZE_MB", default_value_t = 10)]
    pub max_feed_size_mb: usize,

    #[arg(long, env = "MAX_REDIRECTS", default_value_t = 5)]
    pub max_redirects: usize,
}

impl Cli {
    pub fn into_config(self) -> RelayConfig {
        RelayConfig {
            opml_url: self.opml_url,
            state_file: self.state_file,
            policy: self.policy,
            notify_empty: self.notify_empty,
            start_banner: self.start_banner,
            end_banner: self.end_banner,
            send_delay: Duration::from_millis(self.send_delay_ms),
            telegram: TelegramConfig {
                bot_token: self.telegram_bot_token,
                chat_id: self.telegram_channel_id,
                api_base: self.telegram_api_base,
            },
            fetch: FetchConfig {
                user_agent: self.user_agent,
                timeout_seconds: self.timeout_seconds,
                max_feed_size_mb: self.max_feed_size_mb,
                max_redirects: self.max_redirects,
            },
        }
    }
}
