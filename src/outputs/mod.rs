//! Output generation.
//!
//! - [`html`]: renders the digest page and writes it to disk
//!
//! # Output Structure
//!
//! ```text
//! output_dir/
//! ├── ai_digest_20250810_090000.html
//! └── ai_digest_20250817_090000.html
//! ```
//!
//! The ledger file is written by [`crate::ledger`], not here.

pub mod html;
