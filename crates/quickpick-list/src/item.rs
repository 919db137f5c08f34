#![forbid(unsafe_code)]

//! Item descriptors and the per-entry runtime record.
//!
//! Callers describe list content as a sequence of [`PickEntry`] values:
//! selectable items ([`PickItem`]) interleaved with separators
//! ([`SeparatorItem`]). The controller turns each item into a
//! [`ListElement`], the mutable record that carries filter and check
//! state across passes. Elements are created in bulk when the list is
//! replaced and only mutated in place afterwards; a filter pass never
//! creates or destroys them.

use quickpick_text::{MatchSpan, Spans, strip_icons};

/// Stable identity for a payload.
///
/// The controller indexes payloads by this key rather than by reference
/// identity, so equality survives a wholesale list replacement. Keys are
/// expected to be unique within one batch.
pub trait Keyed {
    /// The stable key for this payload.
    fn key(&self) -> &str;
}

impl Keyed for String {
    fn key(&self) -> &str {
        self
    }
}

// ---------------------------------------------------------------------------
// Descriptors
// ---------------------------------------------------------------------------

/// A selectable item as supplied by the caller.
///
/// Label, description, and detail may embed `$(name)` icon tokens and are
/// normalized on construction: embedded newlines collapse to single
/// spaces. `meta` participates in filtering but is never displayed.
#[derive(Debug, Clone)]
pub struct PickItem<T> {
    /// Primary display text.
    pub label: String,
    /// Secondary text shown next to the label.
    pub description: Option<String>,
    /// Tertiary text shown below the label.
    pub detail: Option<String>,
    /// Hidden search text.
    pub meta: Option<String>,
    /// Never hide this item on a non-matching filter pass.
    pub always_show: bool,
    /// Caller payload.
    pub payload: T,
}

impl<T> PickItem<T> {
    /// Create an item with the given label and payload.
    pub fn new(label: impl Into<String>, payload: T) -> Self {
        Self {
            label: collapse_newlines(&label.into()),
            description: None,
            detail: None,
            meta: None,
            always_show: false,
            payload,
        }
    }

    /// Set the description (builder).
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(collapse_newlines(&description.into()));
        self
    }

    /// Set the detail (builder).
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(collapse_newlines(&detail.into()));
        self
    }

    /// Set the hidden search text (builder).
    pub fn with_meta(mut self, meta: impl Into<String>) -> Self {
        self.meta = Some(meta.into());
        self
    }

    /// Mark the item as always visible (builder).
    pub fn always_show(mut self, value: bool) -> Self {
        self.always_show = value;
        self
    }
}

/// A separator between groups of items.
#[derive(Debug, Clone, Default)]
pub struct SeparatorItem {
    /// Optional group heading.
    pub label: Option<String>,
}

impl SeparatorItem {
    /// An unlabeled separator line.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A separator with a group heading.
    pub fn labeled(label: impl Into<String>) -> Self {
        Self {
            label: Some(collapse_newlines(&label.into())),
        }
    }
}

/// One entry of the caller-supplied list.
#[derive(Debug, Clone)]
pub enum PickEntry<T> {
    /// A selectable item.
    Item(PickItem<T>),
    /// A group separator.
    Separator(SeparatorItem),
}

// ---------------------------------------------------------------------------
// Runtime record
// ---------------------------------------------------------------------------

/// Per-item runtime state owned by the controller.
///
/// Wraps the descriptor with everything a filter pass mutates: the
/// hidden flag, per-field match spans (in raw-label coordinates), the
/// checked flag, and the association with a preceding separator.
/// `sort_key` is the icon-stripped, trimmed label used for comparison
/// sorting.
#[derive(Debug)]
pub struct ListElement<T> {
    item: PickItem<T>,
    sort_key: String,
    checked: bool,
    hidden: bool,
    label_spans: Option<Spans>,
    description_spans: Option<Spans>,
    detail_spans: Option<Spans>,
    separator: Option<usize>,
}

impl<T: Keyed> ListElement<T> {
    pub(crate) fn new(item: PickItem<T>) -> Self {
        let sort_key = strip_icons(&item.label).trim().to_owned();
        Self {
            item,
            sort_key,
            checked: false,
            hidden: false,
            label_spans: None,
            description_spans: None,
            detail_spans: None,
            separator: None,
        }
    }

    /// The wrapped descriptor.
    #[must_use]
    pub fn item(&self) -> &PickItem<T> {
        &self.item
    }

    /// The caller payload.
    #[must_use]
    pub fn payload(&self) -> &T {
        &self.item.payload
    }

    /// Stable key of the payload.
    #[must_use]
    pub fn key(&self) -> &str {
        self.item.payload.key()
    }

    /// Normalized display label (may contain icon tokens).
    #[must_use]
    pub fn label(&self) -> &str {
        &self.item.label
    }

    /// Description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.item.description.as_deref()
    }

    /// Detail, if any.
    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        self.item.detail.as_deref()
    }

    /// Hidden search text, if any.
    #[must_use]
    pub fn meta(&self) -> Option<&str> {
        self.item.meta.as_deref()
    }

    /// Icon-stripped, trimmed label used for comparison sorting.
    #[must_use]
    pub fn sort_key(&self) -> &str {
        &self.sort_key
    }

    /// Current check state.
    #[must_use]
    pub fn checked(&self) -> bool {
        self.checked
    }

    /// Whether the active filter hides this element.
    #[must_use]
    pub fn hidden(&self) -> bool {
        self.hidden
    }

    /// Label match spans from the last filter pass, in raw-label bytes.
    #[must_use]
    pub fn label_spans(&self) -> Option<&[MatchSpan]> {
        self.label_spans.as_deref()
    }

    /// Description match spans from the last filter pass.
    #[must_use]
    pub fn description_spans(&self) -> Option<&[MatchSpan]> {
        self.description_spans.as_deref()
    }

    /// Detail match spans from the last filter pass.
    #[must_use]
    pub fn detail_spans(&self) -> Option<&[MatchSpan]> {
        self.detail_spans.as_deref()
    }

    /// Entry index of the associated preceding separator, if any.
    #[must_use]
    pub fn separator_index(&self) -> Option<usize> {
        self.separator
    }

    /// Set the check state. Returns whether the value changed; the
    /// controller owns notification policy.
    pub(crate) fn set_checked(&mut self, value: bool) -> bool {
        if self.checked == value {
            return false;
        }
        self.checked = value;
        true
    }

    pub(crate) fn set_separator(&mut self, separator: Option<usize>) {
        self.separator = separator;
    }

    pub(crate) fn apply_filter_result(
        &mut self,
        label_spans: Option<Spans>,
        description_spans: Option<Spans>,
        detail_spans: Option<Spans>,
        hidden: bool,
    ) {
        self.label_spans = label_spans;
        self.description_spans = description_spans;
        self.detail_spans = detail_spans;
        self.hidden = hidden;
    }

    /// Reset to the no-query state: no spans, not hidden.
    pub(crate) fn clear_match_state(&mut self) {
        self.label_spans = None;
        self.description_spans = None;
        self.detail_spans = None;
        self.hidden = false;
    }
}

/// Replace each embedded newline (`\r\n`, `\n`, or `\r`) with one space.
fn collapse_newlines(s: &str) -> String {
    if !s.contains(['\n', '\r']) {
        return s.to_owned();
    }
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push(' ');
            }
            '\n' => out.push(' '),
            _ => out.push(c),
        }
    }
    out
}
