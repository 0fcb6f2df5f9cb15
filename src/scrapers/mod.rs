//! Everything that reads from the network or from third-party markup.
//!
//! | Module | Role |
//! |--------|------|
//! | [`feed`] | Download RSS/Atom feeds, filter entries by date and ledger |
//! | [`content`] | Strip markup, count words, flag paywalled posts |
//! | [`comments`] | Scrape a comment count from the live article page |
//!
//! Failures here never abort a run: a broken feed is skipped, an
//! unreachable article page scores zero comments.

pub mod comments;
pub mod content;
pub mod feed;
