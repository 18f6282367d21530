//! Observable Tree Error Hierarchy
//!
//! Notification itself never fails: usage mistakes (empty paths, repeated
//! cancellation, cancelling after teardown) are inert no-ops, and panics raised
//! by adapters or callbacks propagate to the caller untouched. The types here
//! cover the fallible edges around the core: configuration, document parsing
//! and typed projection.

use config::ConfigError;

#[doc(hidden)]
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Configuration loading or validation failures
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Document text could not be parsed by the adapter
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// The sub-value at `path` could not be projected into the requested type
    #[error("Typed projection failed at path '{path}': {source}")]
    Projection {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}
