//! One digest run, end to end.
//!
//! 1. **Load** the ledger
//! 2. **Fetch** new entries from every feed and extract metrics
//! 3. **Select** featured articles by quality score
//! 4. **Summarize** featured articles
//! 5. **Render** and write the HTML digest
//! 6. **Record** everything in the ledger and save it
//!
//! Work is strictly sequential. Fixed pauses between external calls come
//! from [`crate::config::Delays`].

use crate::api::{Summarizer, summarize_article};
use crate::config::DigestConfig;
use crate::error::Result;
use crate::ledger::{Bucket, Ledger};
use crate::models::{Article, FeedEntry};
use crate::outputs::html::{render_digest, write_digest};
use crate::scoring::{DEFAULT_FEATURED_COUNT, select_top};
use crate::scrapers::comments::scrape_comments;
use crate::scrapers::content::{detect_paywall, extract_text, word_count};
use crate::scrapers::feed::{fetch_feed, filter_new_entries};
use crate::utils::truncate_for_log;
use chrono::{DateTime, Duration, Local, Utc};
use futures::stream::{self, StreamExt};
use reqwest::Client;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tokio::time::sleep;
use tracing::{error, info, instrument, warn};

/// Default lookback window.
pub const DEFAULT_DAYS_BACK: u32 = 7;

/// Per-run parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunParams {
    pub days_back: u32,
    pub featured_count: usize,
}

impl Default for RunParams {
    fn default() -> Self {
        Self {
            days_back: DEFAULT_DAYS_BACK,
            featured_count: DEFAULT_FEATURED_COUNT,
        }
    }
}

/// Drop entries whose link was already taken earlier in this run, and
/// remember the links of the ones kept.
fn first_occurrences(entries: Vec<FeedEntry>, seen: &mut HashSet<String>) -> Vec<FeedEntry> {
    entries
        .into_iter()
        .filter(|entry| seen.insert(entry.link.clone()))
        .collect()
}

/// Scored, summarized and rendered articles of one run.
#[derive(Debug)]
pub struct Digest {
    pub featured: Vec<Article>,
    pub others: Vec<Article>,
    pub html: String,
}

#[derive(Debug, PartialEq, Eq)]
pub enum RunOutcome {
    /// Nothing passed the filters; no digest written, ledger untouched.
    NoNewArticles,
    Published {
        path: PathBuf,
        featured: usize,
        others: usize,
    },
}

pub struct Pipeline<S> {
    config: DigestConfig,
    http: Client,
    summarizer: S,
}

impl<S: Summarizer> Pipeline<S> {
    /// Build a pipeline whose page and feed requests use the configured
    /// User-Agent and timeout.
    pub fn new(config: DigestConfig, summarizer: S) -> Result<Self> {
        let http = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.page_timeout())
            .build()?;
        Ok(Self {
            config,
            http,
            summarizer,
        })
    }

    /// Fetch every configured feed and turn new entries into articles.
    /// A failing feed is logged and skipped.
    #[instrument(level = "info", skip_all, fields(days_back = days_back))]
    pub async fn fetch_recent_articles(&self, days_back: u32, ledger: &Ledger) -> Vec<Article> {
        let now = Utc::now();
        let cutoff = now - Duration::days(i64::from(days_back));
        let total = self.config.feeds.len();
        let mut seen_this_run: HashSet<String> = HashSet::new();
        let mut articles = Vec::new();

        for (i, feed_url) in self.config.feeds.iter().enumerate() {
            info!(feed = %feed_url, progress = %format!("{}/{}", i + 1, total), "Fetching feed");

            match fetch_feed(&self.http, feed_url).await {
                Ok(feed) => {
                    let fresh = first_occurrences(
                        filter_new_entries(feed.entries, cutoff, now, ledger),
                        &mut seen_this_run,
                    );
                    info!(source = %feed.source_name, new_entries = fresh.len(), "Filtered feed entries");

                    let source = feed.source_name.as_str();
                    let built: Vec<Article> = stream::iter(fresh)
                        .then(|entry| async move {
                            let article = self.build_article(entry, source, now).await;
                            sleep(self.config.delays.between_entries()).await;
                            article
                        })
                        .collect()
                        .await;
                    articles.extend(built);
                }
                Err(e) => {
                    error!(feed = %feed_url, error = %e, "Error fetching feed; skipping");
                }
            }

            sleep(self.config.delays.between_feeds()).await;
        }

        articles
    }

    async fn build_article(&self, entry: FeedEntry, source: &str, now: DateTime<Utc>) -> Article {
        let content = extract_text(&entry.body);
        info!(title = %truncate_for_log(&entry.title, 50), "Scraping metrics");

        let comments = scrape_comments(&self.http, &entry.link).await;
        if comments.is_failure() {
            warn!(link = %entry.link, outcome = %comments, "Comment count degraded to zero");
        }
        let is_paywalled = detect_paywall(&content, &entry.title);

        Article {
            word_count: word_count(&content),
            comments: comments.count(),
            published: entry.published.unwrap_or(now),
            author: entry
                .author
                .unwrap_or_else(|| Article::UNKNOWN_AUTHOR.to_string()),
            source: source.to_string(),
            title: entry.title,
            link: entry.link,
            content,
            quality_score: 0.0,
            summary: String::new(),
            is_paywalled,
        }
    }

    /// Score, select, summarize and render. Never fails.
    #[instrument(level = "info", skip_all, fields(articles = articles.len(), featured_count = featured_count))]
    pub async fn digest_articles(&self, articles: Vec<Article>, featured_count: usize) -> Digest {
        let (mut featured, others) = select_top(articles, featured_count);
        info!(featured = featured.len(), others = others.len(), "Selected featured articles");

        info!("Generating summaries");
        let mut generated = 0usize;
        for article in &mut featured {
            let outcome = summarize_article(&self.summarizer, article).await;
            if outcome.is_generated() {
                generated += 1;
            }
            article.summary = outcome.into_text();
            sleep(self.config.delays.between_summaries()).await;
        }
        info!(
            generated,
            unavailable = featured.len() - generated,
            "Summaries complete"
        );

        let html = render_digest(&featured, &others, &self.config, Local::now());
        Digest {
            featured,
            others,
            html,
        }
    }

    /// Run the whole pipeline once.
    #[instrument(level = "info", skip_all, fields(ledger = %ledger_path.display(), output_dir = %output_dir.display()))]
    pub async fn run(
        &self,
        ledger_path: &Path,
        output_dir: &Path,
        params: RunParams,
    ) -> Result<RunOutcome> {
        info!(days_back = params.days_back, "Starting digest generation");
        let mut ledger = Ledger::load(ledger_path).await?;
        info!(known_links = ledger.len(), "Ledger ready");

        let articles = self.fetch_recent_articles(params.days_back, &ledger).await;
        info!(count = articles.len(), "Found new articles");
        if articles.is_empty() {
            info!("No new articles found.");
            return Ok(RunOutcome::NoNewArticles);
        }

        let digest = self.digest_articles(articles, params.featured_count).await;
        let path = write_digest(&digest.html, output_dir, Local::now()).await?;

        ledger.record(&digest.featured, Bucket::Featured);
        ledger.record(&digest.others, Bucket::Reviewed);
        ledger.save(ledger_path).await?;
        info!("Digest generation complete");

        Ok(RunOutcome::Published {
            path,
            featured: digest.featured.len(),
            others: digest.others.len(),
        })
    }
}
