//! Command-line interface definitions for the digest generator.
//!
//! All options have defaults matching a weekly run from the current
//! directory. Credentials come from the environment (or a `.env` file).

use crate::pipeline::{DEFAULT_DAYS_BACK, RunParams};
use crate::scoring::DEFAULT_FEATURED_COUNT;
use clap::Parser;

/// Command-line arguments.
///
/// # Examples
///
/// ```sh
/// # Weekly digest with the built-in feed list
/// ai_digest
///
/// # Two-week lookback, ten featured articles, custom feed list
/// ai_digest --days-back 14 --featured-count 10 --config feeds.yaml
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML config file (feeds, categories, delays)
    #[arg(short, long)]
    pub config: Option<String>,

    /// JSON file tracking already processed articles
    #[arg(short, long, default_value = "processed_articles.json")]
    pub ledger: String,

    /// Directory the HTML digest is written to
    #[arg(short, long, default_value = ".")]
    pub output_dir: String,

    /// Only include articles published within this many days
    #[arg(short, long, default_value_t = DEFAULT_DAYS_BACK)]
    pub days_back: u32,

    /// Number of top-scored articles to feature and summarize
    #[arg(short, long, default_value_t = DEFAULT_FEATURED_COUNT)]
    pub featured_count: usize,

    /// Claude API key
    #[arg(long, env = "CLAUDE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Model override (defaults to the configured model)
    #[arg(long, env = "CLAUDE_MODEL")]
    pub model: Option<String>,

    /// Messages API endpoint override, e.g. for a local proxy
    #[arg(long, env = "CLAUDE_API_URL")]
    pub api_url: Option<String>,
}

impl Cli {
    pub fn run_params(&self) -> RunParams {
        RunParams {
            days_back: self.days_back,
            featured_count: self.featured_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["ai_digest"]);
        assert_eq!(cli.ledger, "processed_articles.json");
        assert_eq!(cli.output_dir, ".");
        assert_eq!(cli.config, None);
        assert_eq!(cli.run_params(), RunParams::default());
    }

    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::parse_from([
            "ai_digest",
            "-d",
            "14",
            "-f",
            "10",
            "-o",
            "/tmp/digests",
            "-c",
            "feeds.yaml",
        ]);
        assert_eq!(cli.days_back, 14);
        assert_eq!(cli.featured_count, 10);
        assert_eq!(cli.output_dir, "/tmp/digests");
        assert_eq!(cli.config.as_deref(), Some("feeds.yaml"));
    }

    #[test]
    fn test_cli_api_key_flag() {
        let cli = Cli::parse_from(["ai_digest", "--api-key", "sk-test", "--model", "m"]);
        assert_eq!(cli.api_key.as_deref(), Some("sk-test"));
        assert_eq!(cli.model.as_deref(), Some("m"));
    }

    #[test]
    fn test_cli_rejects_non_numeric_days() {
        assert!(Cli::try_parse_from(["ai_digest", "--days-back", "week"]).is_err());
    }
}
