#![forbid(unsafe_code)]

//! Query-to-text match engines.
//!
//! Two interchangeable strategies over plain (markup-free) text:
//!
//! - [`fuzzy_match`] - case-insensitive subsequence matching; every query
//!   character must appear in the text in order, not necessarily adjacent.
//!   Matched positions are coalesced into maximal contiguous runs.
//! - [`substring_match`] - case-insensitive contiguous search, first
//!   occurrence only.
//!
//! Both return `None` on no-match and never panic. All reported positions
//! are byte offsets into the *original* text, so results can be used to
//! slice it directly.
//!
//! [`match_quality`] classifies how a query relates to a text on the
//! Exact > Prefix > WordStart > Substring > Fuzzy ladder; the list
//! controller uses it for relevance ordering.
//!
//! # Example
//! ```
//! use quickpick_text::matching::{substring_match, MatchSpan};
//!
//! let spans = substring_match("ell", "hello").unwrap();
//! assert_eq!(spans.as_slice(), &[MatchSpan::new(1, 4)]);
//! assert!(substring_match("zz", "hello").is_none());
//! ```

use smallvec::SmallVec;
use unicode_segmentation::UnicodeSegmentation;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A half-open byte range of matched text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchSpan {
    /// Byte offset of the first matched byte.
    pub start: usize,
    /// Byte offset one past the last matched byte.
    pub end: usize,
}

impl MatchSpan {
    /// Create a new span.
    #[must_use]
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Length of the span in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Whether the span covers no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Extract the matched text from the source.
    #[must_use]
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.end]
    }
}

/// Span list for one match result.
///
/// A fuzzy result is almost always one or two runs, so the spans live
/// inline until a pathological query forces a spill.
pub type Spans = SmallVec<[MatchSpan; 4]>;

/// Engine selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    /// Subsequence matching with run coalescing.
    #[default]
    Fuzzy,
    /// Contiguous substring search, first occurrence.
    Contiguous,
}

/// How a query relates to a text, ordered weakest to strongest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MatchKind {
    /// No relation at all.
    NoMatch,
    /// Characters found in order but with gaps.
    Fuzzy,
    /// Query found as a contiguous substring.
    Substring,
    /// Every query character sits on a word start.
    WordStart,
    /// Text starts with the query.
    Prefix,
    /// Query equals the text.
    Exact,
}

// ---------------------------------------------------------------------------
// Engines
// ---------------------------------------------------------------------------

/// Run the selected engine.
#[must_use]
pub fn match_text(query: &str, text: &str, mode: MatchMode, boundary_mode: bool) -> Option<Spans> {
    match mode {
        MatchMode::Fuzzy => fuzzy_match(query, text, boundary_mode),
        MatchMode::Contiguous => substring_match(query, text),
    }
}

/// Case-insensitive subsequence match.
///
/// Every character of `query` must appear in `text` in order. Matched
/// positions are grouped into maximal byte-adjacent runs. Returns `None`
/// when any query character has no remaining occurrence, or when the
/// query is empty.
///
/// With `boundary_mode` set, a first pass only starts new runs on word
/// boundaries (word starts and lower-to-upper camelCase transitions).
/// When that pass covers the whole query its grouping is preferred;
/// otherwise the plain greedy pass decides. The mode changes grouping,
/// never whether the query matches.
#[must_use]
pub fn fuzzy_match(query: &str, text: &str, boundary_mode: bool) -> Option<Spans> {
    if query.is_empty() {
        return None;
    }
    if boundary_mode && let Some(spans) = fuzzy_match_at_boundaries(query, text) {
        return Some(spans);
    }
    fuzzy_match_greedy(query, text)
}

/// Case-insensitive contiguous substring search.
///
/// Returns a single span at the first occurrence, or `None` when absent
/// or when the query is empty.
#[must_use]
pub fn substring_match(query: &str, text: &str) -> Option<Spans> {
    if query.is_empty() {
        return None;
    }
    let needle: Vec<char> = query.chars().collect();
    let hay: Vec<(usize, char)> = text.char_indices().collect();
    if needle.len() > hay.len() {
        return None;
    }
    for start in 0..=(hay.len() - needle.len()) {
        let window = &hay[start..start + needle.len()];
        if needle
            .iter()
            .zip(window)
            .all(|(&qc, &(_, c))| chars_eq_ci(c, qc))
        {
            let (first, _) = window[0];
            let (last, last_char) = window[window.len() - 1];
            let mut spans = Spans::new();
            spans.push(MatchSpan::new(first, last + last_char.len_utf8()));
            return Some(spans);
        }
    }
    None
}

/// Classify how `query` relates to `text`.
///
/// Checks exact equality, then prefix, then word-start coverage, then
/// contiguous substring, then subsequence. Case-insensitive throughout.
#[must_use]
pub fn match_quality(query: &str, text: &str) -> MatchKind {
    if query.is_empty() {
        return MatchKind::NoMatch;
    }
    let query_lower = query.to_lowercase();
    let text_lower = text.to_lowercase();
    if query_lower == text_lower {
        return MatchKind::Exact;
    }
    if text_lower.starts_with(&query_lower) {
        return MatchKind::Prefix;
    }
    if word_start_match(query, text) {
        return MatchKind::WordStart;
    }
    if substring_match(query, text).is_some() {
        return MatchKind::Substring;
    }
    if fuzzy_match(query, text, false).is_some() {
        return MatchKind::Fuzzy;
    }
    MatchKind::NoMatch
}

// ---------------------------------------------------------------------------
// Internals
// ---------------------------------------------------------------------------

/// Case-insensitive character comparison via full lowercase expansion.
fn chars_eq_ci(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

/// Byte offsets at which a word starts.
///
/// Word-bound segment starts whose first character is alphanumeric,
/// plus lower-to-upper camelCase transitions inside words.
fn word_boundaries(text: &str) -> Vec<usize> {
    let mut bounds: Vec<usize> = text
        .split_word_bound_indices()
        .filter(|(_, word)| word.chars().next().is_some_and(char::is_alphanumeric))
        .map(|(i, _)| i)
        .collect();
    let mut prev: Option<char> = None;
    for (i, c) in text.char_indices() {
        if c.is_uppercase() && prev.is_some_and(char::is_lowercase) {
            bounds.push(i);
        }
        prev = Some(c);
    }
    bounds.sort_unstable();
    bounds.dedup();
    bounds
}

/// Greedy subsequence walk, coalescing adjacent hits into runs.
fn fuzzy_match_greedy(query: &str, text: &str) -> Option<Spans> {
    let mut spans = Spans::new();
    let mut query_chars = query.chars().peekable();
    let mut run_start: Option<usize> = None;
    let mut run_end = 0usize;

    for (i, c) in text.char_indices() {
        let Some(&qc) = query_chars.peek() else {
            break;
        };
        if !chars_eq_ci(c, qc) {
            continue;
        }
        query_chars.next();
        let char_end = i + c.len_utf8();
        match run_start {
            Some(_) if i == run_end => run_end = char_end,
            Some(start) => {
                spans.push(MatchSpan::new(start, run_end));
                run_start = Some(i);
                run_end = char_end;
            }
            None => {
                run_start = Some(i);
                run_end = char_end;
            }
        }
    }

    if query_chars.peek().is_some() {
        return None;
    }
    if let Some(start) = run_start {
        spans.push(MatchSpan::new(start, run_end));
    }
    Some(spans)
}

/// Boundary-preferring greedy pass: a new run may only begin on a word
/// boundary. Returns `None` when the query cannot be covered that way.
fn fuzzy_match_at_boundaries(query: &str, text: &str) -> Option<Spans> {
    let bounds = word_boundaries(text);
    let mut spans = Spans::new();
    let mut query_chars = query.chars().peekable();
    let mut run_start: Option<usize> = None;
    let mut run_end = 0usize;

    for (i, c) in text.char_indices() {
        let Some(&qc) = query_chars.peek() else {
            break;
        };
        if !chars_eq_ci(c, qc) {
            continue;
        }
        let continues_run = run_start.is_some() && i == run_end;
        if !continues_run && bounds.binary_search(&i).is_err() {
            continue;
        }
        query_chars.next();
        let char_end = i + c.len_utf8();
        match run_start {
            Some(_) if i == run_end => run_end = char_end,
            Some(start) => {
                spans.push(MatchSpan::new(start, run_end));
                run_start = Some(i);
                run_end = char_end;
            }
            None => {
                run_start = Some(i);
                run_end = char_end;
            }
        }
    }

    if query_chars.peek().is_some() {
        return None;
    }
    if let Some(start) = run_start {
        spans.push(MatchSpan::new(start, run_end));
    }
    Some(spans)
}

/// Whether every query character can be consumed at a word start, in order.
fn word_start_match(query: &str, text: &str) -> bool {
    let bounds = word_boundaries(text);
    let mut query_chars = query.chars().peekable();
    for &b in &bounds {
        let Some(&qc) = query_chars.peek() else {
            break;
        };
        if let Some(c) = text[b..].chars().next()
            && chars_eq_ci(c, qc)
        {
            query_chars.next();
        }
    }
    query_chars.peek().is_none()
}
