//! Path-indexed change notification over hierarchical documents.
//!
//! Register callbacks on delimited paths (`"config/usb/enabled"`) of an
//! [`ObservableDocument`]. Whenever the document or one of its subtrees is
//! replaced, every registered path whose value changed is called with
//! `(old, new)`, deepest paths first.
//!
//! ```
//! use observable_tree::{JsonAdapter, ObservableDocument};
//! use serde_json::{json, Value};
//! use std::sync::{Arc, Mutex};
//!
//! let document = ObservableDocument::new(JsonAdapter::new(), Value::Null);
//! let seen = Arc::new(Mutex::new(Vec::new()));
//!
//! let sink = Arc::clone(&seen);
//! let mut handle = document.register("config/usb/enabled", move |old: &Value, new: &Value| {
//!     sink.lock().unwrap().push((old.clone(), new.clone()));
//! });
//!
//! document.replace(json!({"config": {"usb": {"enabled": 0}}}));
//! document.replace(json!({"config": {"usb": {"enabled": 0}}}));
//! document.replace(json!({"config": {"usb": {"enabled": 1}}}));
//! handle.cancel();
//!
//! assert_eq!(
//!     *seen.lock().unwrap(),
//!     vec![(Value::Null, json!(0)), (json!(0), json!(1))]
//! );
//! ```
//!
//! The document representation is pluggable through [`DocumentAdapter`];
//! [`JsonAdapter`] covers `serde_json::Value`.

mod adapter;
mod config;
mod document;
mod errors;
mod notify;
pub mod path;

pub use adapter::*;
pub use config::*;
pub use document::*;
pub use errors::*;
pub use notify::*;
pub use path::PathKey;

//-----------------------------------------------------------
// Test utils

#[cfg(test)]
pub(crate) mod test_utils;
