use crate::fetcher::Fetcher;
use crate::traits::DirectorySource;
use crate::types::{FeedEndpoint, RelayError, Result};
use async_trait::async_trait;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::time::Duration;
use tracing::{error, info, warn};

/// Timeout for downloading the directory document.
const OPML_TIMEOUT_SECS: u64 = 10;

/// Collect the `xmlUrl` of every `<outline>` element, at any depth, in document
/// order. Outlines without the attribute (category folders) or with an empty
/// one are skipped.
pub fn parse_outline(content: &[u8]) -> Result<Vec<FeedEndpoint>> {
    let mut reader = Reader::from_reader(content);
    let mut endpoints = Vec::new();
    let mut depth: usize = 0;
    let mut saw_element = false;

    loop {
        let event = reader.read_event().map_err(|e| {
            RelayError::SourceMalformed(format!(
                "XML error at position {}: {}",
                reader.buffer_position(),
                e
            ))
        })?;

        match event {
            Event::Start(ref element) | Event::Empty(ref element) => {
                saw_element = true;
                if matches!(event, Event::Start(_)) {
                    depth += 1;
                }
                if element.local_name().as_ref() != b"outline" {
                    continue;
                }
                let attribute = element
                    .try_get_attribute("xmlUrl")
                    .map_err(|e| RelayError::SourceMalformed(e.to_string()))?;
                if let Some(attribute) = attribute {
                    let value = attribute
                        .unescape_value()
                        .map_err(|e| RelayError::SourceMalformed(e.to_string()))?;
                    let value = value.trim();
                    if !value.is_empty() {
                        endpoints.push(value.to_string());
                    }
                }
            }
            Event::End(_) => depth = depth.saturating_sub(1),
            Event::Eof => break,
            _ => {}
        }
    }

    if !saw_element {
        return Err(RelayError::SourceMalformed(
            "no elements found in document".to_string(),
        ));
    }
    if depth != 0 {
        return Err(RelayError::SourceMalformed(format!(
            "document ended with {} unclosed element(s)",
            depth
        )));
    }

    Ok(endpoints)
}

/// Resolves the feed list from an OPML document hosted at a URL.
pub struct OpmlResolver {
    fetcher: Fetcher,
    url: String,
}

impl OpmlResolver {
    pub fn new(fetcher: Fetcher, url: impl Into<String>) -> Self {
        Self {
            fetcher,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub async fn try_resolve(&self) -> Result<Vec<FeedEndpoint>> {
        info!("Downloading OPML file from {}...", self.url());

        let content = self
            .fetcher
            .download(self.url(), Some(Duration::from_secs(OPML_TIMEOUT_SECS)))
            .await
            .map_err(|e| RelayError::SourceUnavailable {
                url: self.url().to_string(),
                reason: e.to_string(),
            })?;

        parse_outline(&content)
    }
}

#[async_trait]
impl DirectorySource for OpmlResolver {
    async fn resolve(&self) -> Vec<FeedEndpoint> {
        match self.try_resolve().await {
            Ok(endpoints) => {
                if endpoints.is_empty() {
                    warn!("OPML file at {} lists no feeds", self.url());
                } else {
                    info!("Found {} RSS feeds in the OPML file.", endpoints.len());
                }
                endpoints
            }
            Err(e) => {
                error!("Error loading OPML file: {}", e);
                Vec::new()
            }
        }
    }
}
