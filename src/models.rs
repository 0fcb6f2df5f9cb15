//! Data models for feed entries and scored articles.
//!
//! - [`FeedEntry`]: one item as published by a feed, before extraction
//! - [`Article`]: an entry after text extraction, metric scraping, scoring
//!   and (for featured articles) summarization
//!
//! Articles live for a single run. Only a reduced record of each one is
//! persisted, see [`crate::ledger`].

use chrono::{DateTime, Utc};

/// A raw feed entry, prior to extraction.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedEntry {
    pub title: String,
    /// Unique key of the article across runs.
    pub link: String,
    /// Publication date, else the entry's last update, if the feed gave either.
    pub published: Option<DateTime<Utc>>,
    pub author: Option<String>,
    /// Markup body taken from the full content, else summary, else description.
    pub body: String,
}

/// An article being scored and rendered during a run.
#[derive(Debug, Clone, PartialEq)]
pub struct Article {
    pub title: String,
    pub link: String,
    pub published: DateTime<Utc>,
    pub author: String,
    /// Plain text, markup stripped.
    pub content: String,
    /// Title of the feed the article came from.
    pub source: String,
    pub word_count: usize,
    pub comments: u32,
    pub quality_score: f64,
    /// Empty until the article is featured and summarized.
    pub summary: String,
    pub is_paywalled: bool,
}

impl Article {
    /// Author shown when the feed names none.
    pub const UNKNOWN_AUTHOR: &'static str = "Unknown";
}
