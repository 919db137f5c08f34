#![forbid(unsafe_code)]

//! Filterable, checkable selection list for quickpick.
//!
//! This crate holds the stateful side of the engine:
//! - [`PickItem`] / [`PickEntry`] - caller-supplied item descriptors,
//!   optionally interleaved with separators
//! - [`ListElement`] - per-item runtime record (check state, hidden
//!   flag, match spans, separator association)
//! - [`ListController`] - owns the collection, filters it with the
//!   icon-aware engines from `quickpick-text`, sorts by match quality,
//!   and tracks checked/visible aggregates
//! - [`EventBus`] / [`ListEvent`] - synchronous change notifications
//!
//! # Example
//! ```
//! use quickpick_list::{ListConfig, ListController, PickEntry, PickItem};
//!
//! let mut list = ListController::new(ListConfig::default());
//! list.set_items(vec![
//!     PickEntry::Item(PickItem::new("$(file) readme.md", "readme".to_owned())),
//!     PickEntry::Item(PickItem::new("$(gear) settings", "settings".to_owned())),
//! ]);
//!
//! list.filter("set");
//! assert_eq!(list.visible_count(), 1);
//!
//! list.set_all_visible_checked(true);
//! assert_eq!(list.checked_keys(), vec!["settings".to_owned()]);
//! ```

pub mod controller;
pub mod event;
pub mod item;

pub use controller::{ListConfig, ListController, ListEvent, MatchFields};
pub use event::{EventBus, Subscription};
pub use item::{Keyed, ListElement, PickEntry, PickItem, SeparatorItem};

// Engine types surfaced through the controller configuration.
pub use quickpick_text::{MatchKind, MatchMode, MatchSpan};
