//! Comment-count scraping from live article pages.
//!
//! The count is a heuristic over rendered page text: numbers next to
//! "comment"/"reply" wording, with a fallback to links pointing at a
//! comments anchor. The result is typed so callers can tell "page had no
//! comment counter" apart from "page could not be fetched".

use super::content::visible_text;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use scraper::{Html, Selector};
use std::fmt;
use tracing::{debug, info, instrument, warn};

/// Tried in order; the first pattern with any match wins.
static COMMENT_PATTERNS: Lazy<[Regex; 4]> = Lazy::new(|| {
    [
        Regex::new(r"(?i)(\d+)\s+comments?(?:\s|$)").unwrap(),
        Regex::new(r"(?i)(\d+)\s+replies?(?:\s|$)").unwrap(),
        Regex::new(r"(?i)comments?\s*\((\d+)\)").unwrap(),
        Regex::new(r"(?i)replies?\s*\((\d+)\)").unwrap(),
    ]
});

static COMMENT_HREF: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)#?comments?").unwrap());
static NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)").unwrap());
static ANCHOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());

/// Outcome of scraping one article page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentCount {
    Found(u32),
    NoneFound,
    FetchFailed(String),
}

impl CommentCount {
    /// Numeric value used for scoring; zero unless comments were found.
    pub fn count(&self) -> u32 {
        match self {
            CommentCount::Found(n) => *n,
            CommentCount::NoneFound | CommentCount::FetchFailed(_) => 0,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, CommentCount::FetchFailed(_))
    }
}

impl fmt::Display for CommentCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommentCount::Found(n) => write!(f, "{n} comments"),
            CommentCount::NoneFound => write!(f, "no comment count"),
            CommentCount::FetchFailed(reason) => write!(f, "fetch failed: {reason}"),
        }
    }
}

/// Search a page's rendered text for a comment count. Script and style
/// contents are ignored.
pub fn count_comments_in_html(html: &str) -> Option<u32> {
    let document = Html::parse_document(html);
    let page_text = visible_text(&document);

    for pattern in COMMENT_PATTERNS.iter() {
        let best = pattern
            .captures_iter(&page_text)
            .filter_map(|caps| caps.get(1)?.as_str().parse::<u32>().ok())
            .max();
        if best.is_some() {
            return best;
        }
    }

    document
        .select(&ANCHOR)
        .filter(|link| {
            link.value()
                .attr("href")
                .is_some_and(|href| COMMENT_HREF.is_match(href))
        })
        .find_map(|link| {
            let text = link.text().collect::<String>();
            NUMBER.captures(&text)?.get(1)?.as_str().parse::<u32>().ok()
        })
}

/// Fetch `url` and count its comments. Never fails; errors become
/// [`CommentCount::FetchFailed`].
#[instrument(level = "info", skip_all, fields(%url))]
pub async fn scrape_comments(client: &Client, url: &str) -> CommentCount {
    let body = match fetch_page(client, url).await {
        Ok(body) => body,
        Err(e) => {
            warn!(error = %e, "Error scraping comments");
            return CommentCount::FetchFailed(e.to_string());
        }
    };

    match count_comments_in_html(&body) {
        Some(n) => {
            info!(comments = n, "Found comments");
            CommentCount::Found(n)
        }
        None => {
            debug!(bytes = body.len(), "No comment count on page");
            CommentCount::NoneFound
        }
    }
}

async fn fetch_page(client: &Client, url: &str) -> Result<String, reqwest::Error> {
    client.get(url).send().await?.error_for_status()?.text().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_plain_comment_phrase() {
        let html = "<html><body><p>Great post</p><span>12 comments</span></body></html>";
        assert_eq!(count_comments_in_html(html), Some(12));
    }

    #[test]
    fn test_takes_max_within_first_matching_pattern() {
        let html = "<div>3 comments </div><div>41 comments </div><div>7 comment </div>";
        assert_eq!(count_comments_in_html(html), Some(41));
    }

    #[test]
    fn test_earlier_pattern_wins_over_larger_later_match() {
        let html = "<p>2 comments </p><p>99 replies </p>";
        assert_eq!(count_comments_in_html(html), Some(2));
    }

    #[test]
    fn test_replies_and_parenthesized_forms() {
        assert_eq!(count_comments_in_html("<p>5 Replies</p>"), Some(5));
        assert_eq!(count_comments_in_html("<p>Comments (8)</p>"), Some(8));
        assert_eq!(count_comments_in_html("<p>Replies(4)</p>"), Some(4));
    }

    #[test]
    fn test_anchor_fallback() {
        let html = r##"<a href="/about">About 2025</a><a href="#comments">Discuss: 17</a>"##;
        assert_eq!(count_comments_in_html(html), Some(17));
    }

    #[test]
    fn test_ignores_counts_inside_scripts_and_styles() {
        let html = r#"<html><head><script>window.t = "99 comments ";</script></head>
            <body><p>2 comments </p></body></html>"#;
        assert_eq!(count_comments_in_html(html), Some(2));

        let html = "<html><head><style>/* 7 replies */</style></head><body><p>nothing</p></body></html>";
        assert_eq!(count_comments_in_html(html), None);

        let html = "<body><noscript>40 comments </noscript><template>8 comments </template></body>";
        assert_eq!(count_comments_in_html(html), None);
    }

    #[test]
    fn test_no_counter() {
        let html = "<html><body><p>No engagement markers here.</p></body></html>";
        assert_eq!(count_comments_in_html(html), None);
    }

    #[test]
    fn test_comment_count_value() {
        assert_eq!(CommentCount::Found(9).count(), 9);
        assert_eq!(CommentCount::NoneFound.count(), 0);
        let failed = CommentCount::FetchFailed("timeout".to_string());
        assert_eq!(failed.count(), 0);
        assert!(failed.is_failure());
        assert!(!CommentCount::NoneFound.is_failure());
    }

    #[tokio::test]
    async fn test_unreachable_page_is_fetch_failed() {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(2))
            .build()
            .unwrap();
        let outcome = scrape_comments(&client, "http://127.0.0.1:9/post").await;
        assert!(outcome.is_failure());
        assert_eq!(outcome.count(), 0);
    }
}
