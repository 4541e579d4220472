use clap::Parser;
use rss_relay::{Cli, FeedRelay};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Cli::parse().into_config();

    info!("Starting RSS Feed Monitor...");
    info!("State file: {}", config.state_file.display());

    let relay = FeedRelay::from_config(&config).map_err(|e| {
        error!("Failed to set up the relay: {}", e);
        e
    })?;

    let summary = relay.run().await;
    info!(
        "RSS relay finished: {}/{} feeds had new posts ({} posts)",
        summary.feeds_with_new_posts, summary.feeds_total, summary.new_posts
    );

    Ok(())
}
