//! Static HTML digest rendering.
//!
//! The page is self-contained: inline CSS, no scripts, no external assets.
//!
//! # Layout
//!
//! ```text
//! header        date, featured/additional counts
//! Featured      one block per featured article, in score order
//! Additional    other articles grouped by category
//!               categories by descending size, articles by descending score
//! footer
//! ```

use crate::config::DigestConfig;
use crate::error::Result;
use crate::models::Article;
use crate::utils::{digest_path, format_score, format_thousands};
use chrono::{DateTime, Local};
use html_escape::{encode_double_quoted_attribute, encode_text};
use itertools::Itertools;
use std::cmp::Reverse;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument};

const STYLE: &str = r#"
        body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; max-width: 900px; margin: 0 auto; padding: 20px; line-height: 1.6; color: #333; }
        .header { border-bottom: 2px solid #333; margin-bottom: 30px; padding-bottom: 20px; }
        .featured { background: #f8f9fa; padding: 25px; margin: 25px 0; border-radius: 10px; box-shadow: 0 2px 4px rgba(0,0,0,0.1); }
        .article { margin-bottom: 25px; }
        .title { font-size: 20px; font-weight: bold; margin-bottom: 12px; }
        .title a { text-decoration: none; color: #333; }
        .title a:hover { color: #007acc; }
        .meta { color: #666; font-size: 14px; margin-bottom: 15px; }
        .summary { line-height: 1.6; margin-bottom: 15px; font-size: 16px; }
        .metrics { font-size: 13px; color: #888; background: #f0f0f0; padding: 10px; border-radius: 5px; }
        .paywall-indicator { color: #ff6b35; font-weight: bold; font-size: 12px; }
        .other-articles { margin-top: 50px; }
        .category-section { margin-bottom: 35px; }
        .category-title { font-size: 22px; font-weight: bold; color: #333; margin-bottom: 15px; border-bottom: 2px solid #007acc; padding-bottom: 8px; text-transform: uppercase; letter-spacing: 1px; }
        .category-articles { display: grid; gap: 12px; }
        .other-article-item { padding: 15px; background: #f8f9fa; border-radius: 6px; }
        .other-article-item:hover { background: #f0f0f0; }
        .other-title { font-weight: bold; margin-bottom: 5px; }
        .other-title a { text-decoration: none; color: #333; }
        .other-title a:hover { color: #007acc; }
        .other-meta { font-size: 12px; color: #666; }
        .footer { margin-top: 50px; padding-top: 20px; border-top: 1px solid #ddd; color: #666; font-size: 14px; text-align: center; }
"#;

/// Group `others` by category. Categories are ordered by descending size
/// (ties in first-appearance order), articles by descending score.
pub fn group_by_category<'a>(
    others: &'a [Article],
    config: &'a DigestConfig,
) -> Vec<(&'a str, Vec<&'a Article>)> {
    let mut groups: Vec<(&str, Vec<&Article>)> = Vec::new();
    for article in others {
        let category = config.category_for(&article.source);
        match groups.iter_mut().find(|(name, _)| *name == category) {
            Some((_, articles)) => articles.push(article),
            None => groups.push((category, vec![article])),
        }
    }

    groups
        .into_iter()
        .sorted_by_key(|(_, articles)| Reverse(articles.len()))
        .map(|(category, articles)| {
            let articles = articles
                .into_iter()
                .sorted_by(|a, b| b.quality_score.total_cmp(&a.quality_score))
                .collect();
            (category, articles)
        })
        .collect()
}

/// Render the digest page.
pub fn render_digest(
    featured: &[Article],
    others: &[Article],
    config: &DigestConfig,
    generated_at: DateTime<Local>,
) -> String {
    let date = generated_at.format("%B %d, %Y").to_string();
    let mut html = String::new();

    html.push_str(&format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>AI Newsletter Digest - {date}</title>
    <style>{STYLE}    </style>
</head>
<body>
    <div class="header">
        <h1>🤖 AI Newsletter Digest</h1>
        <p><strong>{date}</strong> | {} Featured Articles | {} Additional Articles</p>
        <p><small>Automatically curated from leading AI newsletters based on content quality and engagement</small></p>
    </div>
"#,
        featured.len(),
        others.len()
    ));

    html.push_str("    <h2>📚 Featured Articles</h2>\n");
    for article in featured {
        html.push_str(&render_featured(article));
    }

    if !others.is_empty() {
        html.push_str(
            "    <div class=\"other-articles\">\n        <h2>📝 Additional Articles by Category</h2>\n",
        );
        for (category, articles) in group_by_category(others, config) {
            html.push_str(&format!(
                "        <div class=\"category-section\">\n            <div class=\"category-title\">{} ({} articles)</div>\n            <div class=\"category-articles\">\n",
                encode_text(category),
                articles.len()
            ));
            for article in articles {
                html.push_str(&render_other(article));
            }
            html.push_str("            </div>\n        </div>\n");
        }
        html.push_str("    </div>\n");
    }

    html.push_str(
        r#"    <div class="footer">
        <p>Generated automatically by AI Newsletter Digest</p>
        <p><small>Quality scoring based on content length and community engagement</small></p>
    </div>
</body>
</html>
"#,
    );
    html
}

fn render_featured(article: &Article) -> String {
    let paywall = if article.is_paywalled {
        r#" <span class="paywall-indicator">🔒 PAYWALLED</span>"#
    } else {
        ""
    };
    format!(
        r#"    <div class="featured">
        <div class="article">
            <div class="title"><a href="{link}" target="_blank">{title}</a>{paywall}</div>
            <div class="meta">By {author} | {source} | {published}</div>
            <div class="summary">{summary}</div>
            <div class="metrics">Quality Score: {score} | Words: {words} | 💬 {comments} comments</div>
        </div>
    </div>
"#,
        link = encode_double_quoted_attribute(&article.link),
        title = encode_text(&article.title),
        author = encode_text(&article.author),
        source = encode_text(&article.source),
        published = article.published.format("%B %d, %Y"),
        summary = encode_text(&article.summary),
        score = format_score(article.quality_score),
        words = format_thousands(article.word_count),
        comments = article.comments,
    )
}

fn render_other(article: &Article) -> String {
    let paywall = if article.is_paywalled { " 🔒" } else { "" };
    format!(
        r#"                <div class="other-article-item">
                    <div class="other-title"><a href="{link}" target="_blank">{title}</a>{paywall}</div>
                    <div class="other-meta">{author} | {source} | 💬 {comments} comments</div>
                </div>
"#,
        link = encode_double_quoted_attribute(&article.link),
        title = encode_text(&article.title),
        author = encode_text(&article.author),
        source = encode_text(&article.source),
        comments = article.comments,
    )
}

/// Write `html` to `ai_digest_YYYYMMDD_HHMMSS.html` in `output_dir`.
#[instrument(level = "info", skip_all, fields(output_dir = %output_dir.display()))]
pub async fn write_digest(
    html: &str,
    output_dir: &Path,
    completed_at: DateTime<Local>,
) -> Result<PathBuf> {
    let path = digest_path(output_dir, &completed_at);
    fs::write(&path, html).await?;
    info!(path = %path.display(), bytes = html.len(), "Digest saved");
    Ok(path)
}
