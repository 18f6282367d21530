//! Delimited paths into a hierarchical document.
//!
//! A [`PathKey`] is the address both registrations and subtree replacements
//! use. Parsing is lenient: empty segments (leading, doubled or trailing
//! separators) are dropped, so `"/a//b/"` and `"a/b"` name the same node.

mod path_key;
pub use path_key::*;
