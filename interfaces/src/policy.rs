use std::fmt;
use std::str::FromStr;

use crate::defs::Detection;
use crate::defs::Entry;
use crate::defs::FeedMemory;
use crate::defs::NoveltyDetector;
use crate::membership::MembershipDetector;
use crate::watermark::WatermarkDetector;

/// The novelty policy a deployment runs with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NoveltyPolicy {
    #[default]
    Watermark,
    Membership,
}

impl NoveltyDetector for NoveltyPolicy {
    fn detect(&self, entries: &[Entry], memory: Option<&FeedMemory>) -> Detection {
        match self {
            NoveltyPolicy::Watermark => WatermarkDetector.detect(entries, memory),
            NoveltyPolicy::Membership => MembershipDetector.detect(entries, memory),
        }
    }
}

impl fmt::Display for NoveltyPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoveltyPolicy::Watermark => f.write_str("watermark"),
            NoveltyPolicy::Membership => f.write_str("membership"),
        }
    }
}

impl FromStr for NoveltyPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "watermark" | "latest" => Ok(NoveltyPolicy::Watermark),
            "membership" | "set" => Ok(NoveltyPolicy::Membership),
            other => Err(format!(
                "unknown novelty policy '{}' (expected 'watermark' or 'membership')",
                other
            )),
        }
    }
}
