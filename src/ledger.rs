//! Persisted record of article links already processed by earlier runs.
//!
//! # File format
//!
//! ```json
//! {
//!   "featured": [{"title": "...", "link": "...", "date_processed": "2025-08-10T09:30:00.123456", "quality_score": 62.5}],
//!   "reviewed": []
//! }
//! ```
//!
//! The ledger is read once at the start of a run and written once at the end.
//! There is no locking; concurrent runs against the same file are unsupported.

use crate::error::Result;
use crate::models::Article;
use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

/// Which list a processed article is appended to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    Featured,
    Reviewed,
}

/// Minimal record kept for each processed article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerRecord {
    pub title: String,
    pub link: String,
    pub date_processed: NaiveDateTime,
    pub quality_score: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    #[serde(default)]
    pub featured: Vec<LedgerRecord>,
    #[serde(default)]
    pub reviewed: Vec<LedgerRecord>,
}

impl Ledger {
    /// Read the ledger at `path`. A missing file is an empty ledger.
    #[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let ledger = match fs::read_to_string(path.as_ref()).await {
            Ok(json) => serde_json::from_str::<Ledger>(&json)?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("No ledger file yet; starting empty");
                Ledger::default()
            }
            Err(e) => return Err(e.into()),
        };
        info!(
            featured = ledger.featured.len(),
            reviewed = ledger.reviewed.len(),
            "Loaded ledger"
        );
        Ok(ledger)
    }

    /// Overwrite the file at `path` with the current state.
    #[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path.as_ref(), json).await?;
        info!(
            featured = self.featured.len(),
            reviewed = self.reviewed.len(),
            "Saved ledger"
        );
        Ok(())
    }

    /// Append a record per article to `bucket`, stamped with the local time.
    pub fn record(&mut self, articles: &[Article], bucket: Bucket) {
        self.record_at(articles, bucket, Local::now().naive_local());
    }

    fn record_at(&mut self, articles: &[Article], bucket: Bucket, processed: NaiveDateTime) {
        let list = match bucket {
            Bucket::Featured => &mut self.featured,
            Bucket::Reviewed => &mut self.reviewed,
        };
        list.extend(articles.iter().map(|article| LedgerRecord {
            title: article.title.clone(),
            link: article.link.clone(),
            date_processed: processed,
            quality_score: article.quality_score,
        }));
    }

    /// All links in either list, for repeated lookups during a fetch pass.
    pub fn seen_links(&self) -> HashSet<&str> {
        self.featured
            .iter()
            .chain(self.reviewed.iter())
            .map(|record| record.link.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.featured.len() + self.reviewed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
