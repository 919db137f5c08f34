#![forbid(unsafe_code)]

//! Icon-aware text matching for the quickpick engine.
//!
//! This crate provides the text-side primitives for a filterable
//! selection list:
//! - [`icon::parse_icon_label`] - strip inline `$(name)` icon tokens,
//!   keeping a byte-offset map back to the raw label
//! - [`matching`] - fuzzy subsequence and contiguous substring engines
//!   returning byte-range [`MatchSpan`]s
//! - [`icon::match_label_with_icons`] - match on stripped text, report
//!   spans against the raw label
//! - [`cache::LabelCache`] - LRU cache so repeated filter passes skip
//!   re-parsing unchanged labels
//!
//! # Example
//! ```
//! use quickpick_text::{match_label_with_icons, parse_icon_label, MatchMode};
//!
//! let label = parse_icon_label("$(file) readme.md");
//! assert_eq!(label.text, " readme.md");
//!
//! let spans = match_label_with_icons("read", &label, MatchMode::Fuzzy, false).unwrap();
//! assert_eq!(spans[0].text("$(file) readme.md"), "read");
//! ```

pub mod cache;
pub mod icon;
pub mod matching;

pub use cache::{CacheStats, DEFAULT_CACHE_CAPACITY, LabelCache};
pub use icon::{ParsedLabel, match_label_with_icons, parse_icon_label, remap_spans, strip_icons};
pub use matching::{
    MatchKind, MatchMode, MatchSpan, Spans, fuzzy_match, match_quality, match_text,
    substring_match,
};
