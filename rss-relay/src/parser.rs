use crate::types::{Entry, ParsedFeed, RelayError, Result};
use feed_rs::parser;
use tracing::debug;

pub struct FeedParser;

impl FeedParser {
    /// Parse RSS or Atom bytes into the feed's declared title and its entries,
    /// kept in the order the feed lists them (newest first).
    pub fn parse_feed(content: &[u8]) -> Result<ParsedFeed> {
        debug!("Parsing feed content ({} bytes)", content.len());

        let feed = parser::parse(content)
            .map_err(|e| RelayError::FeedMalformed(format!("Failed to parse feed: {}", e)))?;

        let title = feed.title.map(|t| t.content);
        let entries = feed.entries.into_iter().map(Self::parse_entry).collect();

        Ok(ParsedFeed { title, entries })
    }

    fn parse_entry(entry: feed_rs::model::Entry) -> Entry {
        let title = entry.title.map(|t| t.content);
        let link = entry.links.into_iter().next().map(|link| link.href);

        Entry::from_parts(title, link)
    }
}
