use crate::defs::Detection;
use crate::defs::Entry;
use crate::defs::FeedMemory;
use crate::defs::NoveltyDetector;

/// Remembers only the title of the newest delivered entry.
///
/// Scanning stops at the first entry whose title equals the watermark, so the
/// feed is assumed to grow at the head. If the watermark has dropped out of the
/// feed, or there is none yet, every current entry is reported.
pub struct WatermarkDetector;

impl NoveltyDetector for WatermarkDetector {
    fn detect(&self, entries: &[Entry], memory: Option<&FeedMemory>) -> Detection {
        let Some(newest) = entries.first() else {
            return Detection::default();
        };
        let watermark = memory.and_then(FeedMemory::watermark);

        let mut new_entries = entries
            .iter()
            .take_while(|entry| Some(entry.title.as_str()) != watermark)
            .cloned()
            .collect::<Vec<Entry>>();
        new_entries.reverse();

        Detection {
            new_entries,
            memory: Some(FeedMemory::Watermark(newest.title.clone())),
        }
    }
}
