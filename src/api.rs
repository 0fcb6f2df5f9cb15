//! Article summarization through the Anthropic Messages API.
//!
//! # Architecture
//!
//! - [`Summarizer`]: the capability the pipeline depends on
//! - [`ClaudeClient`]: production implementation over `reqwest`
//! - [`summarize_article`]: builds the prompt, calls a [`Summarizer`], and
//!   turns any failure into a placeholder instead of an error
//!
//! There are no retries. A failed call costs one placeholder summary.

use crate::error::ServiceError;
use crate::models::Article;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{error, info, instrument};

const MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 200;

/// Characters of article content included in a prompt.
pub const PROMPT_CONTENT_CHARS: usize = 4000;

/// Shown in the digest when a summary could not be generated.
pub const SUMMARY_PLACEHOLDER: &str = "Summary unavailable.";

/// Something that can turn a prompt into a short piece of text.
pub trait Summarizer {
    async fn summarize(&self, prompt: &str) -> Result<String, ServiceError>;
}

/// Client for the Messages API.
pub struct ClaudeClient {
    http: Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl std::fmt::Debug for ClaudeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClaudeClient")
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl ClaudeClient {
    pub fn new(http: Client, api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            http,
            api_key: api_key.into(),
            model: model.into(),
            endpoint: MESSAGES_URL.to_string(),
        }
    }

    /// Point the client at a different Messages-compatible endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: [Message<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

/// First text block of a Messages API response body.
fn first_text_block(body: &str) -> Result<String, ServiceError> {
    let response: MessagesResponse = serde_json::from_str(body)
        .map_err(|e| ServiceError::MalformedResponse(e.to_string()))?;
    response
        .content
        .into_iter()
        .find(|block| block.kind == "text")
        .and_then(|block| block.text)
        .ok_or_else(|| ServiceError::MalformedResponse("no text content in response".to_string()))
}

impl Summarizer for ClaudeClient {
    #[instrument(level = "info", skip_all, fields(model = %self.model))]
    async fn summarize(&self, prompt: &str) -> Result<String, ServiceError> {
        let request = MessagesRequest {
            model: &self.model,
            max_tokens: MAX_TOKENS,
            messages: [Message {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .http
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ServiceError::Api {
                status: status.as_u16(),
                body,
            });
        }
        first_text_block(&body)
    }
}

/// Prompt asking for a 2-3 sentence synopsis of `article`.
pub fn build_prompt(article: &Article) -> String {
    let excerpt: String = article.content.chars().take(PROMPT_CONTENT_CHARS).collect();
    format!(
        "Please provide a concise 2-3 sentence summary of this AI/tech article:\n\n\
         Title: {}\n\
         Author: {}\n\
         Source: {}\n\n\
         Content: {}...\n\n\
         Focus on the key insights, developments, or arguments presented.",
        article.title, article.author, article.source, excerpt
    )
}

/// Result of summarizing one article.
#[derive(Debug)]
pub enum SummaryOutcome {
    Generated(String),
    Unavailable(ServiceError),
}

impl SummaryOutcome {
    /// Text to show in the digest.
    pub fn into_text(self) -> String {
        match self {
            SummaryOutcome::Generated(text) => text,
            SummaryOutcome::Unavailable(_) => SUMMARY_PLACEHOLDER.to_string(),
        }
    }

    pub fn is_generated(&self) -> bool {
        matches!(self, SummaryOutcome::Generated(_))
    }
}

/// Summarize `article`, never failing.
#[instrument(level = "info", skip_all, fields(title = %article.title))]
pub async fn summarize_article<S: Summarizer>(summarizer: &S, article: &Article) -> SummaryOutcome {
    let t0 = Instant::now();
    let prompt = build_prompt(article);
    match summarizer.summarize(&prompt).await {
        Ok(text) => {
            info!(elapsed_ms = t0.elapsed().as_millis() as u64, "Generated summary");
            SummaryOutcome::Generated(text)
        }
        Err(e) => {
            error!(
                elapsed_ms = t0.elapsed().as_millis() as u64,
                error = %e,
                "Error summarizing article"
            );
            SummaryOutcome::Unavailable(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    struct Canned(Result<&'static str, u16>);

    impl Summarizer for Canned {
        async fn summarize(&self, _prompt: &str) -> Result<String, ServiceError> {
            match self.0 {
                Ok(text) => Ok(text.to_string()),
                Err(status) => Err(ServiceError::Api {
                    status,
                    body: "overloaded".to_string(),
                }),
            }
        }
    }

    fn article(content: String) -> Article {
        Article {
            title: "Agents in production".to_string(),
            link: "https://example.com/p/agents".to_string(),
            published: Utc.with_ymd_and_hms(2025, 8, 1, 0, 0, 0).unwrap(),
            author: "Sam Author".to_string(),
            content,
            source: "The AI Maker".to_string(),
            word_count: 0,
            comments: 0,
            quality_score: 0.0,
            summary: String::new(),
            is_paywalled: false,
        }
    }

    #[test]
    fn test_prompt_includes_metadata_and_truncates_content() {
        let content = format!("{}{}", "a".repeat(PROMPT_CONTENT_CHARS), "TAIL");
        let prompt = build_prompt(&article(content));
        assert!(prompt.contains("Title: Agents in production"));
        assert!(prompt.contains("Author: Sam Author"));
        assert!(prompt.contains("Source: The AI Maker"));
        assert!(prompt.contains("2-3 sentence"));
        assert!(!prompt.contains("TAIL"));
        assert!(prompt.contains(&format!("{}...", "a".repeat(PROMPT_CONTENT_CHARS))));
    }

    #[test]
    fn test_prompt_truncates_on_char_boundaries() {
        let content = "é".repeat(PROMPT_CONTENT_CHARS + 10);
        let prompt = build_prompt(&article(content));
        assert_eq!(prompt.matches('é').count(), PROMPT_CONTENT_CHARS);
    }

    #[test]
    fn test_first_text_block() {
        let body = r#"{"id":"msg_1","content":[{"type":"tool_use","id":"t"},{"type":"text","text":"Two sentences.\nReally. "}]}"#;
        assert_eq!(first_text_block(body).unwrap(), "Two sentences.\nReally. ");
    }

    #[test]
    fn test_first_text_block_malformed() {
        assert!(matches!(
            first_text_block("not json"),
            Err(ServiceError::MalformedResponse(_))
        ));
        assert!(matches!(
            first_text_block(r#"{"content":[]}"#),
            Err(ServiceError::MalformedResponse(_))
        ));
        assert!(matches!(
            first_text_block(r#"{"content":[{"type":"tool_use","id":"x"}]}"#),
            Err(ServiceError::MalformedResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_summarize_article_success() {
        let outcome = summarize_article(&Canned(Ok("A crisp synopsis.")), &article("body".into())).await;
        assert!(outcome.is_generated());
        assert_eq!(outcome.into_text(), "A crisp synopsis.");
    }

    #[tokio::test]
    async fn test_summarize_article_failure_is_placeholder() {
        let outcome = summarize_article(&Canned(Err(529)), &article("body".into())).await;
        assert!(matches!(
            outcome,
            SummaryOutcome::Unavailable(ServiceError::Api { status: 529, .. })
        ));
        assert_eq!(outcome.into_text(), SUMMARY_PLACEHOLDER);
    }

    #[tokio::test]
    async fn test_claude_client_unreachable_endpoint_is_transport_error() {
        let client = ClaudeClient::new(Client::new(), "test-key", "test-model")
            .with_endpoint("http://127.0.0.1:9/v1/messages");
        let err = client.summarize("hello").await.unwrap_err();
        assert!(matches!(err, ServiceError::Transport(_)));
    }
}
