//! # Category Module
//!
//! Named ideological categories, each an axis-aligned box in the
//! (economic, culture, authority) space.
//!
//! ## Module layout
//!
//! - `builtin`: the `Category` record and the embedded definition set
//! - `store`: validated runtime store preserving declaration order
//!
//! Declaration order matters: when boxes overlap, classification resolves to
//! the category declared first.
//!
//! ## Example
//!
//! ```rust
//! use ideomap_core::category::CategoryStore;
//!
//! let store = CategoryStore::from_json_str(r#"{
//!     "left":  {"ranges": {"economic": [-10, -1], "culture": [-10, 10], "authority": [-10, 10]}},
//!     "right": {"ranges": {"economic": [1, 10],   "culture": [-10, 10], "authority": [-10, 10]}}
//! }"#).unwrap();
//!
//! assert_eq!(store.names(), vec!["left", "right"]);
//! assert!(store.get("left").is_ok());
//! assert!(store.get("centre").is_err());
//! ```

mod builtin;
mod store;

pub use builtin::{Category, BUILTIN_DEFINITIONS, DEFAULT_DEFINITIONS_FILE};
pub use store::CategoryStore;
