//! Document adapter contract.
//!
//! The notification core never looks inside a document itself. Every read,
//! write and comparison goes through a [`DocumentAdapter`], so the same core
//! can observe JSON values, property trees or any other hierarchical value
//! type.
//!
//! Contract:
//! - `get`/`get_child` return the adapter's empty sentinel for absent
//!   locations and never fail on absence.
//! - `set` may be unsupported. The core calls it unconditionally after a
//!   subtree replacement and only logs when it was not applied.
//! - `equal` is value equality, not identity.
//! - `empty` recognises the canonical nil/absent marker.

mod json;
pub use json::*;


#[cfg(test)]
use mockall::automock;

use crate::PathKey;
use crate::Result;

#[cfg_attr(test, automock(type Value = serde_json::Value;))]
pub trait DocumentAdapter: Send + Sync + 'static {
    type Value: Clone + Send + 'static;

    /// Sub-value at `path`, or the empty sentinel if any segment is absent.
    fn get(
        &self,
        document: &Self::Value,
        path: &PathKey,
    ) -> Self::Value;

    /// Direct child of `document` named `segment`.
    fn get_child(
        &self,
        document: &Self::Value,
        segment: &str,
    ) -> Self::Value;

    /// Writes `value` at `path`. Returns whether the write was applied.
    fn set(
        &self,
        document: &mut Self::Value,
        path: &PathKey,
        value: Self::Value,
    ) -> bool;

    fn equal(
        &self,
        a: &Self::Value,
        b: &Self::Value,
    ) -> bool;

    fn empty(
        &self,
        value: &Self::Value,
    ) -> bool;
}

/// Adapter-specific conversion of a raw sub-value into `T`.
pub trait Projection<T>: DocumentAdapter {
    fn project(
        &self,
        path: &PathKey,
        value: Self::Value,
    ) -> Result<T>;
}
