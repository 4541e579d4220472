//! Telegram (legacy Markdown) message bodies.

use crate::types::Entry;
use chrono::NaiveDate;

pub const END_BANNER: &str = "No more posts for today!";

/// One message listing every new entry of a feed, oldest first.
pub fn new_posts(endpoint: &str, entries: &[Entry]) -> String {
    let mut message = format!("**New Posts from {}**\n\n", endpoint);
    for entry in entries {
        message.push_str(&format!("**{}**\n", entry.title));
        message.push_str(&format!("Link: {}\n\n", entry.link));
    }
    message
}

pub fn no_posts(endpoint: &str) -> String {
    format!("**No Found Posts from {}**\n\n", endpoint)
}

pub fn start_banner(today: NaiveDate) -> String {
    format!(
        "Hello, everyone! 👋 Hope you're having a fantastic {}! ✨",
        today.format("%B %d, %Y")
    )
}

pub fn end_banner() -> String {
    END_BANNER.to_string()
}
