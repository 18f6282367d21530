//! Thread-safe façade over a document and its notification tree.
//!
//! # Concurrency
//!
//! One mutex per document serializes registration, whole-document replacement
//! and subtree replacement. Callbacks run synchronously on the replacing
//! thread while that mutex is held, so a callback must not register on or
//! replace the same document. Cancelling from inside a callback is fine:
//! [`CancellationHandle::cancel`](crate::CancellationHandle::cancel) only
//! takes the lock of the callback's own registry.
//!
//! Panics from adapters or callbacks unwind through `replace`/`replace_at`.
//! The mutex guard is released on unwind and the stored document keeps the
//! value it had before the failed call.

mod observable_document;
pub use observable_document::*;
