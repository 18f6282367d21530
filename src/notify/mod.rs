//! Change notification core.
//!
//! # Architecture
//!
//! ```text
//! NotificationTree (root)
//!   "config" -> Branch { registry: None, subtree }
//!                  "usb" -> Branch { registry: None, subtree }
//!                              "enabled" -> Branch { registry: Some(CallbackRegistry), subtree: None }
//! ```
//!
//! Every registration walks the tree segment by segment, creating branches on
//! demand, and ends at the [`CallbackRegistry`] for exactly that path. A
//! whole-document diff only visits branches that exist, so its cost follows the
//! registered paths and not the document size.
//!
//! A [`CancellationHandle`] holds a `Weak` reference to its registry. Storage
//! upgrades inside the registry never move the registry itself, so handles
//! stay valid across them, and a handle whose registry is gone resolves to a
//! no-op.

mod callback_registry;
mod notification_tree;
pub use callback_registry::*;
pub use notification_tree::*;
