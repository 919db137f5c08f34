#![forbid(unsafe_code)]

//! Icon-aware label parsing.
//!
//! Labels may embed inline icon tokens of the form `$(name)`, where the
//! name consists of ASCII alphanumerics, `-`, and `~`. Matching should
//! ignore the tokens but highlight the raw label, so parsing produces the
//! stripped text together with a byte-offset table mapping every stripped
//! byte back to its position in the raw string.
//!
//! A token that never reaches its `)` before end-of-string or before an
//! invalid name character was not actually a token; the buffered text is
//! flushed verbatim. Parsing is total: there is no malformed input, only
//! input with fewer icons than it appeared to have.
//!
//! # Example
//! ```
//! use quickpick_text::icon::parse_icon_label;
//!
//! let parsed = parse_icon_label("a$(icon)b");
//! assert_eq!(parsed.text, "ab");
//! assert_eq!(parsed.offsets, vec![0, 8]);
//!
//! // No marker at all: fast path with an identity (empty) offset table.
//! let plain = parse_icon_label("plain");
//! assert_eq!(plain.text, "plain");
//! assert!(plain.offsets.is_empty());
//! ```

use std::ops::Range;

use crate::matching::{self, MatchMode, MatchSpan, Spans};

/// Marker that opens an icon token.
pub const ICON_START: &str = "$(";

/// Characters allowed inside an icon name.
fn is_icon_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '~'
}

// ---------------------------------------------------------------------------
// Parsed label
// ---------------------------------------------------------------------------

/// A label with icon tokens stripped and an offset table back to the raw
/// string.
///
/// `offsets` has one entry per byte of `text`; `offsets[i]` is the byte
/// index in the raw string that stripped byte `i` came from. The table is
/// non-decreasing. An **empty** table means the raw string contained no
/// icon marker at all and the mapping is the identity.
///
/// Icon tokens are pure ASCII, so the per-byte table is exact even when
/// the label itself contains multi-byte characters.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedLabel {
    /// The raw string with every icon token elided.
    pub text: String,
    /// Per-byte map from stripped text to raw string; empty = identity.
    pub offsets: Vec<usize>,
}

impl ParsedLabel {
    /// Whether the stripped text maps onto the raw string unchanged.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Raw byte index for stripped-text byte `i`.
    #[must_use]
    pub fn raw_offset(&self, i: usize) -> Option<usize> {
        if self.offsets.is_empty() {
            (i < self.text.len()).then_some(i)
        } else {
            self.offsets.get(i).copied()
        }
    }
}

/// Strip icon tokens from a label, discarding the offset table.
#[must_use]
pub fn strip_icons(raw: &str) -> String {
    parse_icon_label(raw).text
}

/// Parse a raw label into stripped text plus offset table.
///
/// Single left-to-right scan. On `$(` the scanner buffers a tentative
/// token; a valid terminator elides it, anything else flushes the buffer
/// into the output as literal text. Total over all inputs.
#[must_use]
pub fn parse_icon_label(raw: &str) -> ParsedLabel {
    let Some(first) = raw.find(ICON_START) else {
        return ParsedLabel {
            text: raw.to_owned(),
            offsets: Vec::new(),
        };
    };

    let bytes = raw.as_bytes();
    let len = bytes.len();
    let mut text = String::with_capacity(len);
    let mut offsets = Vec::with_capacity(len);

    flush_literal(raw, 0..first, &mut text, &mut offsets);
    let mut i = first;
    while i < len {
        if bytes[i] == b'$' && bytes.get(i + 1) == Some(&b'(') {
            let mut j = i + 2;
            while j < len && is_icon_name_char(bytes[j] as char) {
                j += 1;
            }
            if bytes.get(j) == Some(&b')') {
                // complete token: elide it
                i = j + 1;
            } else {
                // terminator never reached: the buffered token is literal
                flush_literal(raw, i..j, &mut text, &mut offsets);
                i = j;
            }
            continue;
        }
        // plain run up to the next potential marker
        let next = raw[i..].find(ICON_START).map_or(len, |p| i + p);
        flush_literal(raw, i..next, &mut text, &mut offsets);
        i = next;
    }

    ParsedLabel { text, offsets }
}

fn flush_literal(raw: &str, range: Range<usize>, text: &mut String, offsets: &mut Vec<usize>) {
    text.push_str(&raw[range.clone()]);
    offsets.extend(range);
}

// ---------------------------------------------------------------------------
// Offset remapping
// ---------------------------------------------------------------------------

/// Remap spans computed against (leading-trimmed) stripped text onto the
/// raw string.
///
/// `leading_trim` is the number of bytes trimmed off the front of the
/// stripped text before matching; it shifts every span before the table
/// lookup. A span whose start falls past the end of the table matched
/// only trimmed content and is dropped. With an empty (identity) table
/// the spans are returned shifted by `leading_trim` alone.
///
/// Output spans are valid sub-ranges of the raw string and preserve
/// input order.
#[must_use]
pub fn remap_spans(spans: &[MatchSpan], offsets: &[usize], leading_trim: usize) -> Spans {
    let mut out = Spans::new();
    for span in spans {
        if span.is_empty() {
            continue;
        }
        let start_idx = span.start + leading_trim;
        if offsets.is_empty() {
            out.push(MatchSpan::new(start_idx, span.end + leading_trim));
            continue;
        }
        if start_idx >= offsets.len() {
            // fell entirely on trimmed content
            continue;
        }
        let last_idx = (span.end - 1 + leading_trim).min(offsets.len() - 1);
        out.push(MatchSpan::new(offsets[start_idx], offsets[last_idx] + 1));
    }
    out
}

/// Match a query against a parsed label, reporting spans in raw-string
/// coordinates.
///
/// When the label contains icons the stripped text is first trimmed of
/// leading spaces (a token at string start leaves a space artifact after
/// elision), matched, then remapped through the offset table. A match
/// whose every span lands on trimmed content degrades to no match.
#[must_use]
pub fn match_label_with_icons(
    query: &str,
    label: &ParsedLabel,
    mode: MatchMode,
    boundary_mode: bool,
) -> Option<Spans> {
    if label.is_identity() {
        return matching::match_text(query, &label.text, mode, boundary_mode);
    }

    let trimmed = label.text.trim_start_matches(' ');
    let leading_trim = label.text.len() - trimmed.len();
    let spans = matching::match_text(query, trimmed, mode, boundary_mode)?;
    let remapped = remap_spans(&spans, &label.offsets, leading_trim);
    if remapped.is_empty() {
        None
    } else {
        Some(remapped)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn markerless_roundtrip_identity(s in "[a-zA-Z0-9 .,)-]{0,40}") {
            prop_assume!(!s.contains("$("));
            let parsed = parse_icon_label(&s);
            prop_assert_eq!(&parsed.text, &s);
            prop_assert!(parsed.offsets.is_empty());
        }

        #[test]
        fn stripped_text_never_longer(s in "[a-z$()-]{0,40}") {
            let parsed = parse_icon_label(&s);
            prop_assert!(parsed.text.len() <= s.len());
            if !parsed.offsets.is_empty() {
                prop_assert_eq!(parsed.offsets.len(), parsed.text.len());
            }
        }

        #[test]
        fn offsets_point_at_matching_bytes(s in "[a-z$()~ -]{0,40}") {
            let parsed = parse_icon_label(&s);
            if !parsed.offsets.is_empty() {
                let raw = s.as_bytes();
                let stripped = parsed.text.as_bytes();
                for (i, &raw_idx) in parsed.offsets.iter().enumerate() {
                    prop_assert_eq!(stripped[i], raw[raw_idx]);
                }
            }
        }

        #[test]
        fn remapped_spans_stay_in_raw(
            fragments in prop::collection::vec("[a-z]{1,6}", 1..4),
            query in "[a-z]{1,4}"
        ) {
            let raw = fragments.join("$(icon)");
            let parsed = parse_icon_label(&raw);
            if let Some(result) =
                match_label_with_icons(&query, &parsed, MatchMode::Fuzzy, false)
            {
                for span in &result {
                    prop_assert!(span.start < span.end);
                    prop_assert!(span.end <= raw.len());
                }
                for pair in result.windows(2) {
                    prop_assert!(pair[0].end <= pair[1].start);
                }
            }
        }
    }
}
