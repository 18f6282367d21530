use std::fmt;

use parking_lot::Mutex;
use tracing::debug;
use tracing::trace;

use crate::path::DEFAULT_SEPARATOR;
use crate::CancellationHandle;
use crate::DiffOptions;
use crate::DocumentAdapter;
use crate::DocumentConfig;
use crate::NotificationTree;
use crate::PathKey;
use crate::Projection;
use crate::Result;

struct DocumentState<V> {
    root: V,
    tree: NotificationTree<V>,
}

/// A document value whose changes are reported to path observers.
///
/// # Example
///
/// ```
/// use observable_tree::{JsonAdapter, ObservableDocument};
/// use serde_json::{json, Value};
///
/// let document = ObservableDocument::new(JsonAdapter::new(), Value::Null);
/// let _handle = document.register("config/usb/enabled", |old: &Value, new: &Value| {
///     println!("enabled: {old} -> {new}");
/// });
///
/// document.replace(json!({"config": {"usb": {"enabled": 1}}}));
/// assert_eq!(document.get_at(&document.path("config/usb/enabled")), json!(1));
/// ```
pub struct ObservableDocument<A: DocumentAdapter> {
    adapter: A,
    separator: char,
    options: DiffOptions,
    state: Mutex<DocumentState<A::Value>>,
}

impl<A: DocumentAdapter> ObservableDocument<A> {
    /// Creates a document with the default `/` separator and diff options.
    pub fn new(
        adapter: A,
        initial: A::Value,
    ) -> Self {
        Self::build(adapter, initial, DEFAULT_SEPARATOR, DiffOptions::default())
    }

    /// Creates a document from a loaded [`DocumentConfig`].
    ///
    /// # Errors
    /// Returns a configuration error if the separator is invalid.
    pub fn with_config(
        adapter: A,
        initial: A::Value,
        config: &DocumentConfig,
    ) -> Result<Self> {
        let separator = config.path.separator_char()?;
        Ok(Self::build(adapter, initial, separator, config.notify.diff_options()))
    }

    fn build(
        adapter: A,
        initial: A::Value,
        separator: char,
        options: DiffOptions,
    ) -> Self {
        debug!(%separator, ?options, "Observable document created");
        Self {
            adapter,
            separator,
            options,
            state: Mutex::new(DocumentState {
                root: initial,
                tree: NotificationTree::new(),
            }),
        }
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    pub fn separator(&self) -> char {
        self.separator
    }

    /// Parses `raw` with this document's separator.
    pub fn path(
        &self,
        raw: &str,
    ) -> PathKey {
        PathKey::parse(raw, self.separator)
    }

    /// Registers `callback` at the path `raw`, parsed with this document's
    /// separator.
    pub fn register<F>(
        &self,
        raw: &str,
        callback: F,
    ) -> CancellationHandle
    where
        F: Fn(&A::Value, &A::Value) + Send + Sync + 'static,
    {
        self.register_at(&self.path(raw), callback)
    }

    /// Registers `callback` for changes of the value at exactly `path`.
    ///
    /// The empty path yields an inert handle.
    pub fn register_at<F>(
        &self,
        path: &PathKey,
        callback: F,
    ) -> CancellationHandle
    where
        F: Fn(&A::Value, &A::Value) + Send + Sync + 'static,
    {
        self.state.lock().tree.register_at(path, callback)
    }

    /// Replaces the whole document, notifying every registered path whose
    /// value changed. Returns true iff any of them changed.
    pub fn replace(
        &self,
        new_value: A::Value,
    ) -> bool {
        let mut guard = self.state.lock();
        let state = &mut *guard;

        let changed = state.tree.diff(&self.adapter, &state.root, &new_value, self.options);
        state.root = new_value;

        debug!(changed, "Document replaced");
        changed
    }

    /// Replaces the value at `path` and notifies observers of exactly that
    /// path. Observers above or below `path` are not notified.
    ///
    /// The write is handed to the adapter afterwards; an adapter that does not
    /// support writes leaves the stored document unchanged. The empty path
    /// replaces the whole document, like [`replace`](Self::replace).
    pub fn replace_at(
        &self,
        path: &PathKey,
        new_value: A::Value,
    ) -> bool {
        if path.is_empty() {
            return self.replace(new_value);
        }

        let mut guard = self.state.lock();
        let state = &mut *guard;

        let old_value = self.adapter.get(&state.root, path);
        let fired = state.tree.diff_at(&self.adapter, path, &old_value, &new_value);
        if !self.adapter.set(&mut state.root, path, new_value) {
            debug!(%path, "Subtree write not applied by adapter");
        }

        trace!(%path, fired, "Subtree replaced");
        fired
    }

    /// Copy of the current document.
    pub fn snapshot(&self) -> A::Value {
        self.state.lock().root.clone()
    }

    /// Copy of the value at `path`, or the adapter's empty value.
    pub fn get_at(
        &self,
        path: &PathKey,
    ) -> A::Value {
        let guard = self.state.lock();
        self.adapter.get(&guard.root, path)
    }

    /// Value at `path` converted through the adapter's typed projection.
    pub fn typed_get<T>(
        &self,
        path: &PathKey,
    ) -> Result<T>
    where
        A: Projection<T>,
    {
        let value = self.get_at(path);
        self.adapter.project(path, value)
    }

    /// Number of live callbacks registered at exactly `path`.
    pub fn observer_count(
        &self,
        path: &PathKey,
    ) -> usize {
        self.state.lock().tree.observer_count(path)
    }
}

impl<A> fmt::Debug for ObservableDocument<A>
where
    A: DocumentAdapter + fmt::Debug,
    A::Value: fmt::Debug,
{
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("ObservableDocument")
            .field("adapter", &self.adapter)
            .field("separator", &self.separator)
            .field("root", &state.root)
            .field("observers", &state.tree)
            .finish()
    }
}
