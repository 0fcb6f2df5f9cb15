//! RSS/Atom feed retrieval and entry filtering.
//!
//! Fetching is split in two phases, mirroring the other scrapers:
//!
//! 1. **Parsing**: download a feed and turn it into [`FeedEntry`] values
//! 2. **Filtering**: drop entries outside the lookback window or already in
//!    the ledger ([`filter_new_entries`], pure and network-free)

use crate::error::{DigestError, Result};
use crate::ledger::Ledger;
use crate::models::FeedEntry;
use chrono::{DateTime, Utc};
use feed_rs::parser;
use reqwest::Client;
use tracing::{debug, info, instrument};

/// A parsed feed: its display name and entries in published order.
#[derive(Debug, Clone)]
pub struct ParsedFeed {
    /// Feed title, or the feed URL when the feed has none.
    pub source_name: String,
    pub entries: Vec<FeedEntry>,
}

/// Parse RSS or Atom bytes. `feed_url` names the source when the feed
/// carries no title.
pub fn parse_feed(bytes: &[u8], feed_url: &str) -> Result<ParsedFeed> {
    let feed = parser::parse(bytes).map_err(|e| DigestError::FeedParse {
        url: feed_url.to_string(),
        reason: e.to_string(),
    })?;

    let source_name = feed
        .title
        .map(|t| t.content.trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| feed_url.to_string());

    let entries = feed
        .entries
        .into_iter()
        .filter_map(parse_entry)
        .collect::<Vec<_>>();

    debug!(%source_name, count = entries.len(), "Parsed feed");
    Ok(ParsedFeed {
        source_name,
        entries,
    })
}

fn parse_entry(entry: feed_rs::model::Entry) -> Option<FeedEntry> {
    let link = entry.links.first()?.href.trim().to_string();
    if link.is_empty() {
        return None;
    }

    let title = entry
        .title
        .map(|t| t.content.trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| "Untitled".to_string());

    // content:encoded / <content>, else <description> / <summary>
    let body = entry
        .content
        .and_then(|c| c.body)
        .or_else(|| entry.summary.map(|s| s.content))
        .unwrap_or_default();

    let author = entry
        .authors
        .first()
        .map(|a| a.name.trim().to_string())
        .filter(|name| !name.is_empty());

    Some(FeedEntry {
        title,
        link,
        published: entry.published.or(entry.updated),
        author,
        body,
    })
}

/// Download and parse one feed.
#[instrument(level = "info", skip_all, fields(%feed_url))]
pub async fn fetch_feed(client: &Client, feed_url: &str) -> Result<ParsedFeed> {
    let bytes = client
        .get(feed_url)
        .send()
        .await?
        .error_for_status()?
        .bytes()
        .await?;
    let feed = parse_feed(&bytes, feed_url)?;
    info!(source = %feed.source_name, entries = feed.entries.len(), "Fetched feed");
    Ok(feed)
}

/// Keep entries published at or after `cutoff` whose link the ledger has
/// never seen. Entries without a date count as published `now`.
pub fn filter_new_entries(
    entries: Vec<FeedEntry>,
    cutoff: DateTime<Utc>,
    now: DateTime<Utc>,
    ledger: &Ledger,
) -> Vec<FeedEntry> {
    let seen = ledger.seen_links();
    entries
        .into_iter()
        .filter(|entry| entry.published.unwrap_or(now) >= cutoff)
        .filter(|entry| {
            let is_new = !seen.contains(entry.link.as_str());
            if !is_new {
                debug!(link = %entry.link, "Skipping already processed entry");
            }
            is_new
        })
        .collect()
}
