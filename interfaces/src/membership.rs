use std::collections::HashSet;

use crate::defs::Detection;
use crate::defs::Entry;
use crate::defs::FeedMemory;
use crate::defs::NoveltyDetector;

/// Remembers every title ever delivered for a feed.
///
/// Entries are walked oldest-first and a title counts as new only if it has
/// never been seen, including earlier in the same fetch. The remembered list
/// keeps first-seen order and is never evicted.
pub struct MembershipDetector;

impl NoveltyDetector for MembershipDetector {
    fn detect(&self, entries: &[Entry], memory: Option<&FeedMemory>) -> Detection {
        if entries.is_empty() {
            return Detection::default();
        }

        let mut seen = HashSet::new();
        let mut titles = memory
            .map(FeedMemory::titles)
            .unwrap_or_default()
            .into_iter()
            .filter(|title| seen.insert(title.clone()))
            .collect::<Vec<String>>();

        let mut new_entries = Vec::new();
        for entry in entries.iter().rev() {
            if seen.insert(entry.title.clone()) {
                titles.push(entry.title.clone());
                new_entries.push(entry.clone());
            }
        }

        Detection {
            new_entries,
            memory: Some(FeedMemory::Titles(titles)),
        }
    }
}
