use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Title given to entries that carry none.
pub const UNTITLED: &str = "Untitled";

/// Link given to entries that carry none.
pub const NO_LINK: &str = "No Link";

/// A retrievable feed location, usually a URL taken from a directory document.
pub type FeedEndpoint = String;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry {
    pub title: String,
    pub link: String,
}

impl Entry {
    pub fn new(title: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
        }
    }

    /// Builds an entry from optional parts, substituting the sentinels for
    /// whatever is missing.
    pub fn from_parts(title: Option<String>, link: Option<String>) -> Self {
        Self {
            title: title.unwrap_or_else(|| UNTITLED.to_owned()),
            link: link.unwrap_or_else(|| NO_LINK.to_owned()),
        }
    }
}

/// What is remembered about one feed between runs.
///
/// Serialized untagged, so the state file holds either a bare string
/// (watermark) or an array of strings (every title seen so far).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeedMemory {
    Watermark(String),
    Titles(Vec<String>),
}

impl FeedMemory {
    /// The newest delivered title. A title list is read in first-seen order,
    /// so its last element is the most recent one.
    pub fn watermark(&self) -> Option<&str> {
        match self {
            FeedMemory::Watermark(title) => Some(title.as_str()),
            FeedMemory::Titles(titles) => titles.last().map(String::as_str),
        }
    }

    pub fn titles(&self) -> Vec<String> {
        match self {
            FeedMemory::Watermark(title) => vec![title.clone()],
            FeedMemory::Titles(titles) => titles.clone(),
        }
    }
}

/// Feed identity -> memory. The only state persisted between runs.
pub type SeenState = BTreeMap<String, FeedMemory>;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Detection {
    /// New entries in chronological (oldest-first) order.
    pub new_entries: Vec<Entry>,
    /// Replacement memory for the feed. `None` leaves the stored memory as it was.
    pub memory: Option<FeedMemory>,
}

impl Detection {
    pub fn has_new_entries(&self) -> bool {
        !self.new_entries.is_empty()
    }
}

// Detectors are pure: given a fetch (newest-first, as the feed delivers it)
// and the stored memory they decide what is new and what to remember next.
// They never fail; a fetch that produced nothing yields an empty detection.

pub trait NoveltyDetector {
    fn detect(&self, entries: &[Entry], memory: Option<&FeedMemory>) -> Detection;
}

/// Key under which a feed's memory is stored: its declared title, or the
/// endpoint when the feed declares none.
///
/// Renaming a feed therefore starts it over with empty memory.
pub fn feed_identity(declared_title: Option<&str>, endpoint: &str) -> String {
    match declared_title {
        Some(title) if !title.trim().is_empty() => title.to_owned(),
        _ => endpoint.to_owned(),
    }
}
