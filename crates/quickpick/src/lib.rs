#![forbid(unsafe_code)]

//! Quickpick public facade crate.
//!
//! Re-exports the common surface of the icon-aware matching engine and
//! the selection-list controller, plus a lightweight prelude for
//! day-to-day usage.
//!
//! # Example
//! ```
//! use quickpick::prelude::*;
//!
//! let mut list = ListController::new(ListConfig::default());
//! list.set_items(vec![
//!     PickEntry::Item(PickItem::new("$(repo) checkout", "checkout".to_owned())),
//!     PickEntry::Item(PickItem::new("$(repo) commit", "commit".to_owned())),
//! ]);
//!
//! list.filter("com");
//! assert_eq!(list.visible_count(), 1);
//! ```

// --- Text re-exports -------------------------------------------------------

pub use quickpick_text::{
    CacheStats, LabelCache, MatchKind, MatchMode, MatchSpan, ParsedLabel, Spans, fuzzy_match,
    match_label_with_icons, match_quality, match_text, parse_icon_label, remap_spans, strip_icons,
    substring_match,
};

// --- List re-exports -------------------------------------------------------

pub use quickpick_list::{
    EventBus, Keyed, ListConfig, ListController, ListElement, ListEvent, MatchFields, PickEntry,
    PickItem, SeparatorItem, Subscription,
};

// --- Prelude ---------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Keyed, ListConfig, ListController, ListEvent, MatchFields, MatchMode, MatchSpan,
        PickEntry, PickItem, SeparatorItem,
    };

    pub use crate::{list, text};
}

pub use quickpick_list as list;
pub use quickpick_text as text;
