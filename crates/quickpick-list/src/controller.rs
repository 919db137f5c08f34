#![forbid(unsafe_code)]

//! Filterable, checkable selection list controller.
//!
//! [`ListController`] owns the full entry collection and the currently
//! visible projection. It filters items against a query with icon-aware
//! matching, optionally sorts the visible subset by match quality, and
//! tracks three aggregates over the dynamic set: checked count, visible
//! count, and all-visible-checked. Aggregate changes are pushed through a
//! synchronous [`EventBus`].
//!
//! # Invariants
//!
//! 1. Every visible index refers to a non-hidden item element.
//! 2. `visible` is a full re-derivation on every `set_items`/`filter`
//!    call, never an incremental patch.
//! 3. Bulk check mutations suppress per-item events and notify
//!    aggregates exactly once; the suppression flag is restored by an
//!    RAII guard even when a listener panics mid-loop.
//!
//! # Example
//! ```
//! use quickpick_list::{ListConfig, ListController, PickEntry, PickItem};
//!
//! let mut list = ListController::new(ListConfig::default());
//! list.set_items(vec![
//!     PickEntry::Item(PickItem::new("Alpha", "a".to_owned())),
//!     PickEntry::Item(PickItem::new("Beta", "b".to_owned())),
//! ]);
//! list.filter("al");
//! assert_eq!(list.visible_count(), 1);
//! ```

use std::cell::Cell;
use std::rc::Rc;

use rustc_hash::{FxHashMap, FxHashSet};

use quickpick_text::{
    CacheStats, LabelCache, MatchKind, MatchMode, match_label_with_icons, match_quality,
    match_text,
};

use crate::event::{EventBus, Subscription};
use crate::item::{Keyed, ListElement, PickEntry, PickItem, SeparatorItem};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

bitflags::bitflags! {
    /// Which item fields participate in filtering.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct MatchFields: u8 {
        /// Match against the label.
        const LABEL = 1 << 0;
        /// Match against the description.
        const DESCRIPTION = 1 << 1;
        /// Match against the detail.
        const DETAIL = 1 << 2;
        /// Match against the hidden search text.
        const META = 1 << 3;
    }
}

impl Default for MatchFields {
    fn default() -> Self {
        Self::LABEL | Self::META
    }
}

/// Controller behavior knobs.
#[derive(Debug, Clone)]
pub struct ListConfig {
    /// Fields consulted by `filter`.
    pub fields: MatchFields,
    /// Engine used for every field.
    pub mode: MatchMode,
    /// Prefer starting fuzzy runs on word boundaries.
    pub boundary_matching: bool,
    /// Sort the visible subset by match quality while a query is active.
    pub sort_by_label: bool,
    /// Joiner between a separator label and an item label in
    /// [`ListController::compound_label`].
    pub separator_label_separator: String,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            fields: MatchFields::default(),
            mode: MatchMode::Fuzzy,
            boundary_matching: false,
            sort_by_label: true,
            separator_label_separator: "/".to_owned(),
        }
    }
}

impl ListConfig {
    /// Set the matched fields (builder).
    #[must_use]
    pub fn with_fields(mut self, fields: MatchFields) -> Self {
        self.fields = fields;
        self
    }

    /// Set the match engine (builder).
    #[must_use]
    pub fn with_mode(mut self, mode: MatchMode) -> Self {
        self.mode = mode;
        self
    }

    /// Enable boundary-preferring fuzzy grouping (builder).
    #[must_use]
    pub fn with_boundary_matching(mut self, value: bool) -> Self {
        self.boundary_matching = value;
        self
    }

    /// Enable or disable relevance sorting (builder).
    #[must_use]
    pub fn with_sort_by_label(mut self, value: bool) -> Self {
        self.sort_by_label = value;
        self
    }

    /// Set the compound-label joiner (builder).
    #[must_use]
    pub fn with_separator_label_separator(mut self, sep: impl Into<String>) -> Self {
        self.separator_label_separator = sep.into();
        self
    }
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Aggregate and per-item notifications pushed by the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListEvent {
    /// The number of checked items (over the full set) changed.
    CheckedCountChanged(usize),
    /// The number of visible items changed.
    VisibleCountChanged(usize),
    /// Whether every visible item is checked changed.
    AllVisibleCheckedChanged(bool),
    /// The set of checked items changed in some way.
    CheckedItemsChanged,
    /// One item's check state changed outside a bulk operation.
    ItemCheckedChanged {
        /// Stable key of the item.
        key: String,
        /// New check state.
        checked: bool,
    },
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

/// One entry of the owned collection.
#[derive(Debug)]
enum Entry<T> {
    Element(ListElement<T>),
    Separator(SeparatorItem),
}

/// Filterable, checkable selection list over caller-supplied payloads.
#[derive(Debug)]
pub struct ListController<T: Keyed> {
    config: ListConfig,
    /// Full entry collection in insertion order.
    entries: Vec<Entry<T>>,
    /// Entry indices of the current filtered/sorted view.
    visible: Vec<usize>,
    /// Key -> entry index over the full set.
    index_by_key: FxHashMap<String, usize>,
    /// Key -> position within `visible`.
    visible_pos_by_key: FxHashMap<String, usize>,
    /// Keys of the externally-focused items.
    focused: Vec<String>,
    events: EventBus<ListEvent>,
    /// While set, check mutations skip per-item notifications.
    suppress_item_events: Rc<Cell<bool>>,
    labels: LabelCache,
    last_visible_count: usize,
    last_checked_count: usize,
    last_all_visible_checked: bool,
}

impl<T: Keyed> Default for ListController<T> {
    fn default() -> Self {
        Self::new(ListConfig::default())
    }
}

impl<T: Keyed> ListController<T> {
    /// Create an empty controller.
    #[must_use]
    pub fn new(config: ListConfig) -> Self {
        Self {
            config,
            entries: Vec::new(),
            visible: Vec::new(),
            index_by_key: FxHashMap::default(),
            visible_pos_by_key: FxHashMap::default(),
            focused: Vec::new(),
            events: EventBus::new(),
            suppress_item_events: Rc::new(Cell::new(false)),
            labels: LabelCache::default(),
            last_visible_count: 0,
            last_checked_count: 0,
            last_all_visible_checked: true,
        }
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &ListConfig {
        &self.config
    }

    /// Register a listener for [`ListEvent`]s.
    pub fn on_event(&self, callback: impl Fn(&ListEvent) + 'static) -> Subscription<ListEvent> {
        self.events.subscribe(callback)
    }

    // --- Content replacement ---

    /// Replace the full entry collection.
    ///
    /// Rebuilds the key index, restores original-order separator
    /// association, resets visibility to the full set, and clears the
    /// suppression flag and stored focus. Always notifies the visible
    /// count: the contents changed even when the count did not.
    pub fn set_items(&mut self, entries: Vec<PickEntry<T>>) {
        let _span = tracing::debug_span!("set_items", count = entries.len()).entered();

        self.suppress_item_events.set(false);
        self.focused.clear();
        self.entries = entries
            .into_iter()
            .map(|entry| match entry {
                PickEntry::Item(item) => Entry::Element(ListElement::new(item)),
                PickEntry::Separator(sep) => Entry::Separator(sep),
            })
            .collect();

        self.index_by_key.clear();
        for (i, entry) in self.entries.iter().enumerate() {
            if let Entry::Element(el) = entry
                && self.index_by_key.insert(el.key().to_owned(), i).is_some()
            {
                tracing::warn!(key = el.key(), "duplicate item key; later entry wins");
            }
        }

        self.assign_original_separators();
        self.visible = self.item_indices();
        self.rebuild_visible_index();
        self.sync_visibility_aggregates(true);
        self.sync_check_aggregates(false);
    }

    // --- Filtering ---

    /// Recompute visibility, match spans, separators, and order against
    /// `query`.
    ///
    /// A query that trims to empty, or a configuration with no enabled
    /// fields, clears the filter: every element becomes visible with no
    /// spans and original separator adjacency, without sorting.
    pub fn filter(&mut self, query: &str) {
        let _span =
            tracing::debug_span!("filter", query_len = query.len(), total = self.entries.len())
                .entered();

        let trimmed = query.trim();
        if trimmed.is_empty() || self.config.fields.is_empty() {
            self.clear_filter();
            return;
        }

        let fields = self.config.fields;
        let mode = self.config.mode;
        let boundary = self.config.boundary_matching;

        let labels = &mut self.labels;
        for entry in &mut self.entries {
            let Entry::Element(el) = entry else { continue };

            let mut label_spans = None;
            if fields.contains(MatchFields::LABEL) {
                let parsed = labels.get_or_parse(el.label());
                label_spans = match_label_with_icons(trimmed, &parsed, mode, boundary);
            }
            let mut description_spans = None;
            if fields.contains(MatchFields::DESCRIPTION)
                && let Some(description) = el.description()
            {
                let parsed = labels.get_or_parse(description);
                description_spans = match_label_with_icons(trimmed, &parsed, mode, boundary);
            }
            let mut detail_spans = None;
            if fields.contains(MatchFields::DETAIL)
                && let Some(detail) = el.detail()
            {
                let parsed = labels.get_or_parse(detail);
                detail_spans = match_label_with_icons(trimmed, &parsed, mode, boundary);
            }
            // Meta is never displayed, so spans are not worth keeping.
            let meta_matched = fields.contains(MatchFields::META)
                && el
                    .meta()
                    .is_some_and(|meta| match_text(trimmed, meta, mode, boundary).is_some());

            let matched = label_spans.is_some()
                || description_spans.is_some()
                || detail_spans.is_some()
                || meta_matched;
            let hidden = !(matched || el.item().always_show);
            el.apply_filter_result(label_spans, description_spans, detail_spans, hidden);
        }

        self.visible = self
            .entries
            .iter()
            .enumerate()
            .filter_map(|(i, entry)| match entry {
                Entry::Element(el) if !el.hidden() => Some(i),
                _ => None,
            })
            .collect();

        if self.config.sort_by_label {
            // Sorting destroys document-order adjacency, so separator
            // semantics are dropped rather than shown incorrectly.
            self.clear_separator_refs();
            self.sort_visible_by_relevance(&trimmed.to_lowercase());
        } else {
            self.assign_original_separators();
        }

        self.rebuild_visible_index();
        self.sync_visibility_aggregates(false);
        tracing::debug!(visible = self.visible.len(), "filter applied");
    }

    // --- Focus & check mutation ---

    /// Record the externally-focused subset for
    /// [`toggle_checkbox_on_focused`](Self::toggle_checkbox_on_focused).
    pub fn set_focused<I, S>(&mut self, keys: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.focused = keys.into_iter().map(Into::into).collect();
    }

    /// Keys of the currently focused items.
    #[must_use]
    pub fn focused(&self) -> &[String] {
        &self.focused
    }

    /// Set one item's check state. Unknown keys are ignored.
    ///
    /// Emits a per-item notification plus aggregate updates when the
    /// value actually changes. Returns whether it did.
    pub fn set_checked(&mut self, key: &str, value: bool) -> bool {
        let Some(&idx) = self.index_by_key.get(key) else {
            return false;
        };
        let changed = self.set_checked_at(idx, value);
        if changed {
            self.sync_check_aggregates(true);
        }
        changed
    }

    /// Check state of one item, or `None` for an unknown key.
    #[must_use]
    pub fn is_checked(&self, key: &str) -> Option<bool> {
        let &idx = self.index_by_key.get(key)?;
        self.element(idx).map(ListElement::checked)
    }

    /// Toggle the focused items as a block.
    ///
    /// `all_checked` is true when every focused item is checked
    /// (vacuously true for an empty focus set); every focused item is
    /// then set to `!all_checked`. Per-item notifications are suppressed
    /// for the loop; aggregates are notified once afterwards.
    pub fn toggle_checkbox_on_focused(&mut self) {
        let indices: Vec<usize> = self
            .focused
            .iter()
            .filter_map(|key| self.index_by_key.get(key).copied())
            .collect();
        let all_checked = indices
            .iter()
            .all(|&i| self.element(i).is_some_and(ListElement::checked));
        let new_value = !all_checked;

        let mut any_changed = false;
        {
            let _guard = self.suppress_notifications();
            for &i in &indices {
                any_changed |= self.set_checked_at(i, new_value);
            }
        }
        if any_changed {
            self.sync_check_aggregates(true);
        }
    }

    /// Set every visible item's check state.
    pub fn set_all_visible_checked(&mut self, value: bool) {
        let indices = self.visible.clone();
        let mut any_changed = false;
        {
            let _guard = self.suppress_notifications();
            for &i in &indices {
                any_changed |= self.set_checked_at(i, value);
            }
        }
        if any_changed {
            self.sync_check_aggregates(true);
        }
    }

    /// Replace the checked set wholesale, regardless of visibility.
    ///
    /// Every item whose key is in `keys` becomes checked, every other
    /// item unchecked. Keys never passed to [`set_items`](Self::set_items)
    /// are skipped silently.
    pub fn set_checked_keys<I, S>(&mut self, keys: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let want: FxHashSet<String> = keys
            .into_iter()
            .map(|key| key.as_ref().to_owned())
            .collect();
        let mut any_changed = false;
        {
            let _guard = self.suppress_notifications();
            for idx in 0..self.entries.len() {
                let Some(value) = self.element(idx).map(|el| want.contains(el.key())) else {
                    continue;
                };
                any_changed |= self.set_checked_at(idx, value);
            }
        }
        if any_changed {
            self.sync_check_aggregates(true);
        }
    }

    // --- Aggregate queries ---

    /// Number of checked items over the full set, visible or not.
    #[must_use]
    pub fn checked_count(&self) -> usize {
        self.elements().filter(|el| el.checked()).count()
    }

    /// Number of currently visible items.
    #[must_use]
    pub fn visible_count(&self) -> usize {
        self.visible.len()
    }

    /// Whether every visible item is checked. Vacuously true when
    /// nothing is visible.
    #[must_use]
    pub fn all_visible_checked(&self) -> bool {
        self.visible
            .iter()
            .all(|&i| self.element(i).is_some_and(ListElement::checked))
    }

    /// Keys of all checked items, in insertion order.
    #[must_use]
    pub fn checked_keys(&self) -> Vec<String> {
        self.elements()
            .filter(|el| el.checked())
            .map(|el| el.key().to_owned())
            .collect()
    }

    /// Descriptors of all checked items, in insertion order.
    #[must_use]
    pub fn checked_items(&self) -> Vec<&PickItem<T>> {
        self.elements()
            .filter(|el| el.checked())
            .map(ListElement::item)
            .collect()
    }

    /// The visible projection, in view order.
    #[must_use]
    pub fn visible(&self) -> Vec<&ListElement<T>> {
        self.visible
            .iter()
            .filter_map(|&i| self.element(i))
            .collect()
    }

    /// Number of items in the full set (separators excluded).
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.elements().count()
    }

    /// Whether the controller holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.item_count() == 0
    }

    /// Look up an element by key.
    #[must_use]
    pub fn element_by_key(&self, key: &str) -> Option<&ListElement<T>> {
        let &idx = self.index_by_key.get(key)?;
        self.element(idx)
    }

    /// Position of an item within the visible projection.
    #[must_use]
    pub fn visible_position(&self, key: &str) -> Option<usize> {
        self.visible_pos_by_key.get(key).copied()
    }

    /// The separator associated with an element, if any.
    #[must_use]
    pub fn separator_for(&self, element: &ListElement<T>) -> Option<&SeparatorItem> {
        match self.entries.get(element.separator_index()?)? {
            Entry::Separator(sep) => Some(sep),
            Entry::Element(_) => None,
        }
    }

    /// Item label prefixed with its group label, joined by the
    /// configured separator string.
    #[must_use]
    pub fn compound_label(&self, element: &ListElement<T>) -> String {
        match self.separator_for(element).and_then(|sep| sep.label.as_deref()) {
            Some(group) => format!(
                "{group}{}{}",
                self.config.separator_label_separator,
                element.label()
            ),
            None => element.label().to_owned(),
        }
    }

    /// Parse-cache statistics.
    #[must_use]
    pub fn cache_stats(&self) -> CacheStats {
        self.labels.stats()
    }

    // --- Internals ---

    fn element(&self, idx: usize) -> Option<&ListElement<T>> {
        match self.entries.get(idx)? {
            Entry::Element(el) => Some(el),
            Entry::Separator(_) => None,
        }
    }

    fn elements(&self) -> impl Iterator<Item = &ListElement<T>> {
        self.entries.iter().filter_map(|entry| match entry {
            Entry::Element(el) => Some(el),
            Entry::Separator(_) => None,
        })
    }

    fn item_indices(&self) -> Vec<usize> {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(i, entry)| matches!(entry, Entry::Element(_)).then_some(i))
            .collect()
    }

    /// Set the check state at an entry index, emitting the per-item
    /// event unless suppressed. Aggregates are the caller's problem.
    fn set_checked_at(&mut self, idx: usize, value: bool) -> bool {
        let suppressed = self.suppress_item_events.get();
        let Some(Entry::Element(el)) = self.entries.get_mut(idx) else {
            return false;
        };
        if !el.set_checked(value) {
            return false;
        }
        if !suppressed {
            let key = el.key().to_owned();
            self.events
                .emit(&ListEvent::ItemCheckedChanged { key, checked: value });
        }
        true
    }

    /// Raise the suppression flag; the guard restores the previous value
    /// on drop, panic or not.
    fn suppress_notifications(&self) -> NotificationGuard {
        NotificationGuard {
            previous: self.suppress_item_events.replace(true),
            flag: Rc::clone(&self.suppress_item_events),
        }
    }

    fn clear_filter(&mut self) {
        for entry in &mut self.entries {
            if let Entry::Element(el) = entry {
                el.clear_match_state();
            }
        }
        self.assign_original_separators();
        self.visible = self.item_indices();
        self.rebuild_visible_index();
        self.sync_visibility_aggregates(false);
    }

    /// Associate each visible element with the nearest preceding
    /// separator in original order; hidden elements lose their ref.
    fn assign_original_separators(&mut self) {
        let mut last_separator = None;
        for (i, entry) in self.entries.iter_mut().enumerate() {
            match entry {
                Entry::Separator(_) => last_separator = Some(i),
                Entry::Element(el) => {
                    let sep = if el.hidden() { None } else { last_separator };
                    el.set_separator(sep);
                }
            }
        }
    }

    fn clear_separator_refs(&mut self) {
        for entry in &mut self.entries {
            if let Entry::Element(el) = entry {
                el.set_separator(None);
            }
        }
    }

    /// Deterministic relevance order: label-matched items first, then
    /// match quality of the query against the sort key, earliest label
    /// hit, case-insensitive sort key, original position.
    fn sort_visible_by_relevance(&mut self, query_lower: &str) {
        struct Rank {
            matched: bool,
            quality: MatchKind,
            first_hit: usize,
            key_lower: String,
            original: usize,
        }

        let mut ranked: Vec<(usize, Rank)> = self
            .visible
            .iter()
            .filter_map(|&i| {
                let el = self.element(i)?;
                Some((
                    i,
                    Rank {
                        matched: el.label_spans().is_some(),
                        quality: match_quality(query_lower, el.sort_key()),
                        first_hit: el
                            .label_spans()
                            .and_then(|spans| spans.first())
                            .map_or(usize::MAX, |span| span.start),
                        key_lower: el.sort_key().to_lowercase(),
                        original: i,
                    },
                ))
            })
            .collect();

        ranked.sort_by(|(_, a), (_, b)| {
            b.matched
                .cmp(&a.matched)
                .then_with(|| b.quality.cmp(&a.quality))
                .then_with(|| a.first_hit.cmp(&b.first_hit))
                .then_with(|| a.key_lower.cmp(&b.key_lower))
                .then_with(|| a.original.cmp(&b.original))
        });

        self.visible = ranked.into_iter().map(|(i, _)| i).collect();
    }

    fn rebuild_visible_index(&mut self) {
        self.visible_pos_by_key.clear();
        for (pos, &idx) in self.visible.iter().enumerate() {
            if let Some(el) = self.element(idx) {
                self.visible_pos_by_key.insert(el.key().to_owned(), pos);
            }
        }
    }

    fn sync_visibility_aggregates(&mut self, force_visible: bool) {
        let visible_count = self.visible.len();
        if force_visible || visible_count != self.last_visible_count {
            self.last_visible_count = visible_count;
            self.events
                .emit(&ListEvent::VisibleCountChanged(visible_count));
        }
        let all = self.all_visible_checked();
        if all != self.last_all_visible_checked {
            self.last_all_visible_checked = all;
            self.events.emit(&ListEvent::AllVisibleCheckedChanged(all));
        }
    }

    fn sync_check_aggregates(&mut self, items_changed: bool) {
        let count = self.checked_count();
        if count != self.last_checked_count {
            self.last_checked_count = count;
            self.events.emit(&ListEvent::CheckedCountChanged(count));
        }
        let all = self.all_visible_checked();
        if all != self.last_all_visible_checked {
            self.last_all_visible_checked = all;
            self.events.emit(&ListEvent::AllVisibleCheckedChanged(all));
        }
        if items_changed {
            self.events.emit(&ListEvent::CheckedItemsChanged);
        }
    }
}

/// Restores the suppression flag on drop.
struct NotificationGuard {
    flag: Rc<Cell<bool>>,
    previous: bool,
}

impl Drop for NotificationGuard {
    fn drop(&mut self) {
        self.flag.set(self.previous);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(label: &str) -> PickEntry<String> {
        PickEntry::Item(PickItem::new(label, label.to_lowercase()))
    }

    fn labels(list: &ListController<String>) -> Vec<String> {
        list.visible()
            .iter()
            .map(|el| el.label().to_owned())
            .collect()
    }

    // ==========================================================
    // Configuration
    // ==========================================================

    #[test]
    fn default_config() {
        let config = ListConfig::default();
        assert_eq!(config.fields, MatchFields::LABEL | MatchFields::META);
        assert_eq!(config.mode, MatchMode::Fuzzy);
        assert!(config.sort_by_label);
        assert_eq!(config.separator_label_separator, "/");
    }

    // ==========================================================
    // Visibility
    // ==========================================================

    #[test]
    fn unfiltered_shows_everything_in_order() {
        let mut list = ListController::default();
        list.set_items(vec![item("One"), item("Two"), item("Three")]);
        assert_eq!(labels(&list), ["One", "Two", "Three"]);
        assert_eq!(list.visible_count(), 3);
    }

    #[test]
    fn filter_hides_non_matching() {
        let mut list = ListController::default();
        list.set_items(vec![item("apple"), item("banana")]);
        list.filter("app");
        assert_eq!(labels(&list), ["apple"]);
        assert!(list.element_by_key("banana").is_some_and(ListElement::hidden));
    }

    #[test]
    fn empty_query_clears_filter_without_sort() {
        let mut list = ListController::default();
        list.set_items(vec![item("zeta"), item("alpha")]);
        list.filter("a");
        list.filter("   ");
        assert_eq!(labels(&list), ["zeta", "alpha"]);
        assert!(list.element_by_key("zeta").is_some_and(|el| el.label_spans().is_none()));
    }

    #[test]
    fn no_enabled_fields_shows_everything() {
        let mut list = ListController::new(
            ListConfig::default().with_fields(MatchFields::empty()),
        );
        list.set_items(vec![item("apple"), item("banana")]);
        list.filter("zzz");
        assert_eq!(list.visible_count(), 2);
    }

    #[test]
    fn meta_matches_hide_show_only() {
        let mut list = ListController::default();
        list.set_items(vec![PickEntry::Item(
            PickItem::new("Display", "k".to_owned()).with_meta("hidden-needle"),
        )]);
        list.filter("needle");
        let visible = list.visible();
        assert_eq!(visible.len(), 1);
        assert!(visible[0].label_spans().is_none());
    }

    #[test]
    fn description_matching_opt_in() {
        let entry = || {
            PickEntry::Item(
                PickItem::new("Plain", "k".to_owned()).with_description("target text"),
            )
        };
        let mut without = ListController::default();
        without.set_items(vec![entry()]);
        without.filter("target");
        assert_eq!(without.visible_count(), 0);

        let mut with = ListController::new(ListConfig::default().with_fields(
            MatchFields::LABEL | MatchFields::DESCRIPTION,
        ));
        with.set_items(vec![entry()]);
        with.filter("target");
        assert_eq!(with.visible_count(), 1);
        assert!(with.visible()[0].description_spans().is_some());
    }

    #[test]
    fn contiguous_mode_rejects_gapped_query() {
        let mut list =
            ListController::new(ListConfig::default().with_mode(MatchMode::Contiguous));
        list.set_items(vec![item("hello")]);
        list.filter("hl");
        assert_eq!(list.visible_count(), 0);
        list.filter("ell");
        assert_eq!(list.visible_count(), 1);
    }

    #[test]
    fn label_spans_point_into_raw_label() {
        let mut list = ListController::default();
        list.set_items(vec![PickEntry::Item(PickItem::new(
            "$(file) readme",
            "k".to_owned(),
        ))]);
        list.filter("read");
        let visible = list.visible();
        let spans = visible[0].label_spans().unwrap();
        assert_eq!(spans[0].text("$(file) readme"), "read");
    }

    // ==========================================================
    // Sorting
    // ==========================================================

    #[test]
    fn matched_items_sort_before_always_show() {
        let mut list = ListController::default();
        list.set_items(vec![
            PickEntry::Item(PickItem::new("gamma", "g".to_owned()).always_show(true)),
            item("Alpha"),
        ]);
        list.filter("al");
        assert_eq!(labels(&list), ["Alpha", "gamma"]);
    }

    #[test]
    fn quality_orders_prefix_above_fuzzy() {
        let mut list = ListController::default();
        list.set_items(vec![item("haystack also"), item("also")]);
        list.filter("also");
        assert_eq!(labels(&list), ["also", "haystack also"]);
    }

    #[test]
    fn sort_disabled_preserves_original_order() {
        let mut list =
            ListController::new(ListConfig::default().with_sort_by_label(false));
        list.set_items(vec![item("beta two"), item("alpha two")]);
        list.filter("two");
        assert_eq!(labels(&list), ["beta two", "alpha two"]);
    }

    #[test]
    fn tie_break_is_deterministic() {
        let mut list = ListController::default();
        list.set_items(vec![item("par b"), item("par a")]);
        list.filter("par");
        assert_eq!(labels(&list), ["par a", "par b"]);
    }

    // ==========================================================
    // Separators
    // ==========================================================

    fn grouped() -> Vec<PickEntry<String>> {
        vec![
            PickEntry::Separator(SeparatorItem::labeled("Fruits")),
            item("apple"),
            item("banana"),
            PickEntry::Separator(SeparatorItem::labeled("Tools")),
            item("hammer"),
        ]
    }

    #[test]
    fn original_order_assigns_preceding_separator() {
        let mut list = ListController::default();
        list.set_items(grouped());
        let apple = list.element_by_key("apple").unwrap();
        assert_eq!(
            list.separator_for(apple).and_then(|s| s.label.as_deref()),
            Some("Fruits")
        );
        let hammer = list.element_by_key("hammer").unwrap();
        assert_eq!(
            list.separator_for(hammer).and_then(|s| s.label.as_deref()),
            Some("Tools")
        );
    }

    #[test]
    fn sorting_suppresses_separators() {
        let mut list = ListController::default();
        list.set_items(grouped());
        list.filter("a");
        for el in list.visible() {
            assert!(el.separator_index().is_none());
        }
    }

    #[test]
    fn unsorted_filter_reassigns_separators() {
        let mut list =
            ListController::new(ListConfig::default().with_sort_by_label(false));
        list.set_items(grouped());
        list.filter("hammer");
        let visible = list.visible();
        assert_eq!(visible.len(), 1);
        assert_eq!(
            list.separator_for(visible[0]).and_then(|s| s.label.as_deref()),
            Some("Tools")
        );
    }

    #[test]
    fn compound_label_joins_group_and_item() {
        let mut list = ListController::default();
        list.set_items(grouped());
        let apple = list.element_by_key("apple").unwrap();
        assert_eq!(list.compound_label(apple), "Fruits/apple");
        list.filter("a");
        let apple = list.element_by_key("apple").unwrap();
        assert_eq!(list.compound_label(apple), "apple");
    }

    // ==========================================================
    // Check state
    // ==========================================================

    #[test]
    fn checked_count_spans_full_set() {
        let mut list = ListController::default();
        list.set_items(vec![item("apple"), item("banana")]);
        list.set_checked("banana", true);
        list.filter("app");
        assert_eq!(list.visible_count(), 1);
        assert_eq!(list.checked_count(), 1);
        assert_eq!(list.checked_keys(), ["banana"]);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let mut list = ListController::default();
        list.set_items(vec![item("apple")]);
        assert!(!list.set_checked("ghost", true));
        assert!(list.is_checked("ghost").is_none());
        list.set_checked_keys(["ghost", "apple"]);
        assert_eq!(list.checked_keys(), ["apple"]);
    }

    #[test]
    fn set_checked_keys_is_authoritative() {
        let mut list = ListController::default();
        list.set_items(vec![item("a"), item("b"), item("c")]);
        list.set_checked("a", true);
        list.set_checked("b", true);
        list.set_checked_keys(["c"]);
        assert_eq!(list.checked_keys(), ["c"]);
    }

    #[test]
    fn set_all_visible_checked_skips_hidden() {
        let mut list = ListController::default();
        list.set_items(vec![item("apple"), item("banana")]);
        list.filter("app");
        list.set_all_visible_checked(true);
        assert_eq!(list.is_checked("apple"), Some(true));
        assert_eq!(list.is_checked("banana"), Some(false));
    }

    #[test]
    fn all_visible_checked_vacuous_truth() {
        let mut list = ListController::default();
        list.set_items(vec![item("apple")]);
        list.filter("zzz");
        assert_eq!(list.visible_count(), 0);
        assert!(list.all_visible_checked());
    }

    #[test]
    fn set_items_resets_check_state() {
        let mut list = ListController::default();
        list.set_items(vec![item("apple")]);
        list.set_checked("apple", true);
        list.set_items(vec![item("apple")]);
        assert_eq!(list.checked_count(), 0);
    }

    // ==========================================================
    // Block toggle
    // ==========================================================

    #[test]
    fn block_toggle_checks_then_unchecks() {
        let mut list = ListController::default();
        list.set_items(vec![item("a"), item("b")]);
        list.set_checked("b", true);
        list.set_focused(["a", "b"]);

        // Not all focused were checked, so the block becomes checked.
        list.toggle_checkbox_on_focused();
        assert_eq!(list.is_checked("a"), Some(true));
        assert_eq!(list.is_checked("b"), Some(true));

        // All focused checked now, so the block becomes unchecked.
        list.toggle_checkbox_on_focused();
        assert_eq!(list.is_checked("a"), Some(false));
        assert_eq!(list.is_checked("b"), Some(false));
    }

    #[test]
    fn block_toggle_with_empty_focus_is_noop() {
        let mut list = ListController::default();
        list.set_items(vec![item("a")]);
        list.toggle_checkbox_on_focused();
        assert_eq!(list.checked_count(), 0);
    }
}
