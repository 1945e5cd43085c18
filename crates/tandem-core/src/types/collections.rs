//! Fast hash collections for internal identifier keys.

pub use rustc_hash::{FxHashMap, FxHashSet};
