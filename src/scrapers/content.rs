//! Plain-text extraction and the paywall heuristic.

use scraper::Html;

/// Phrases that show up in subscription prompts. Matched case-insensitively.
pub const PAYWALL_INDICATORS: [&str; 10] = [
    "subscribe to continue reading",
    "this post is for paid subscribers",
    "upgrade to paid",
    "become a paid subscriber",
    "this content is for subscribers only",
    "premium subscribers only",
    "subscribe now to read more",
    "paywall",
    "members only",
    "paid tier",
];

/// Articles shorter than this are assumed to be cut off by a paywall.
pub const MIN_FREE_WORDS: usize = 50;

/// Elements whose text a browser never renders.
const NON_RENDERED: [&str; 4] = ["script", "style", "noscript", "template"];

/// Concatenated text of a parsed document, skipping anything inside
/// [`NON_RENDERED`] elements.
pub fn visible_text(document: &Html) -> String {
    document
        .tree
        .root()
        .descendants()
        .filter_map(|node| {
            let text = node.value().as_text()?;
            let hidden = node.ancestors().any(|ancestor| {
                ancestor
                    .value()
                    .as_element()
                    .is_some_and(|el| NON_RENDERED.contains(&el.name()))
            });
            (!hidden).then_some(&**text)
        })
        .collect()
}

/// Strip markup from a feed body and return its trimmed text.
pub fn extract_text(markup: &str) -> String {
    if markup.is_empty() {
        return String::new();
    }
    let fragment = Html::parse_fragment(markup);
    visible_text(&fragment).trim().to_string()
}

/// Whitespace-delimited token count.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

pub fn detect_paywall(content: &str, title: &str) -> bool {
    let content_lower = content.to_lowercase();
    let title_lower = title.to_lowercase();

    let has_indicator = PAYWALL_INDICATORS
        .iter()
        .any(|indicator| content_lower.contains(indicator) || title_lower.contains(indicator));

    has_indicator || word_count(content) < MIN_FREE_WORDS
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(n: usize) -> String {
        vec!["word"; n].join(" ")
    }

    #[test]
    fn test_extract_text_strips_tags() {
        let html = "<p>Hello <b>world</b></p><p>again</p>";
        assert_eq!(extract_text(html), "Hello worldagain");
    }

    #[test]
    fn test_extract_text_plain_and_empty() {
        assert_eq!(extract_text("  just text  "), "just text");
        assert_eq!(extract_text(""), "");
    }

    #[test]
    fn test_extract_text_decodes_entities() {
        assert_eq!(extract_text("<p>Fish &amp; chips</p>"), "Fish & chips");
    }

    #[test]
    fn test_extract_text_skips_scripts_and_styles() {
        let html = "<style>p { color: red }</style><p>Shown</p><script>var hidden = 1;</script>";
        assert_eq!(extract_text(html), "Shown");
    }

    #[test]
    fn test_word_count() {
        assert_eq!(word_count(""), 0);
        assert_eq!(word_count("one"), 1);
        assert_eq!(word_count("  one\ttwo\nthree  "), 3);
    }

    #[test]
    fn test_short_content_is_paywalled() {
        assert!(detect_paywall(&words(49), "Long enough title"));
        assert!(detect_paywall("", "Anything"));
        assert!(!detect_paywall(&words(50), "Free post"));
    }

    #[test]
    fn test_paid_subscriber_phrase_is_paywalled_regardless_of_length() {
        let content = format!("{} This post is for paid subscribers {}", words(500), words(500));
        assert!(detect_paywall(&content, "Free post"));
    }

    #[test]
    fn test_indicator_in_title() {
        assert!(detect_paywall(&words(200), "Members Only: the weekly roundup"));
    }

    #[test]
    fn test_long_free_content_is_not_paywalled() {
        assert!(!detect_paywall(&words(800), "A long free essay"));
    }
}
