use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use tracing::trace;

use super::CallbackRegistry;
use super::CancellationHandle;
use crate::DocumentAdapter;
use crate::PathKey;

/// Switches for the two optional shortcuts of [`NotificationTree::diff`].
///
/// Neither changes which callbacks fire; turning both off gives a plain full
/// walk of every registered branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiffOptions {
    /// Skip the children of a node when old and new values are both empty.
    pub skip_empty_subtrees: bool,
    /// Forget registries whose callbacks have all been cancelled.
    pub drop_inactive_registries: bool,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            skip_empty_subtrees: true,
            drop_inactive_registries: true,
        }
    }
}

struct Branch<V> {
    /// Callbacks for exactly the path ending at this segment
    registry: Option<Arc<CallbackRegistry<V>>>,
    /// Registrations deeper than this segment
    subtree: Option<Box<NotificationTree<V>>>,
}

impl<V> Default for Branch<V> {
    fn default() -> Self {
        Self {
            registry: None,
            subtree: None,
        }
    }
}

impl<V> Branch<V> {
    fn subtree_mut(&mut self) -> &mut NotificationTree<V> {
        self.subtree.get_or_insert_with(Box::default)
    }
}

/// Registry tree mirroring the shape of the observed document.
///
/// Branches are created by registration and never removed; an emptied branch
/// only costs one map entry per later diff.
pub struct NotificationTree<V> {
    branches: BTreeMap<String, Branch<V>>,
}

impl<V> Default for NotificationTree<V> {
    fn default() -> Self {
        Self {
            branches: BTreeMap::new(),
        }
    }
}

impl<V: 'static> NotificationTree<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `callback` for exactly `path`, creating branches on the way.
    ///
    /// The empty path addresses no node and yields an inert handle.
    pub fn register_at<F>(
        &mut self,
        path: &PathKey,
        callback: F,
    ) -> CancellationHandle
    where
        F: Fn(&V, &V) + Send + Sync + 'static,
    {
        let Some((last, parents)) = path.segments().split_last() else {
            trace!("Ignoring registration at the empty path");
            return CancellationHandle::inert();
        };

        let mut node = self;
        for segment in parents {
            node = node.branches.entry(segment.clone()).or_default().subtree_mut();
        }
        let registry = node
            .branches
            .entry(last.clone())
            .or_default()
            .registry
            .get_or_insert_with(|| Arc::new(CallbackRegistry::new()));

        let handle = registry.register(callback);
        trace!(%path, slot_id = ?handle.slot_id(), "Registered path observer");
        handle
    }

    /// Registry at exactly `path`, without creating anything.
    pub fn registry_at(
        &self,
        path: &PathKey,
    ) -> Option<Arc<CallbackRegistry<V>>> {
        let (last, parents) = path.segments().split_last()?;
        let mut node = self;
        for segment in parents {
            node = node.branches.get(segment)?.subtree.as_deref()?;
        }
        node.branches.get(last)?.registry.clone()
    }

    /// Number of live callbacks registered at exactly `path`.
    pub fn observer_count(
        &self,
        path: &PathKey,
    ) -> usize {
        self.registry_at(path).map(|registry| registry.len()).unwrap_or(0)
    }

    /// Total number of branches in the tree.
    pub fn node_count(&self) -> usize {
        self.branches
            .values()
            .map(|branch| 1 + branch.subtree.as_ref().map(|subtree| subtree.node_count()).unwrap_or(0))
            .sum()
    }

    /// Compares `old` and `new` along every registered branch and fires the
    /// registries whose value changed, deepest first.
    ///
    /// Returns true iff any child of this node changed.
    pub fn diff<A>(
        &mut self,
        adapter: &A,
        old: &V,
        new: &V,
        options: DiffOptions,
    ) -> bool
    where
        A: DocumentAdapter<Value = V> + ?Sized,
    {
        if options.skip_empty_subtrees && adapter.empty(old) && adapter.empty(new) {
            return false;
        }

        let mut changed = false;
        for (segment, branch) in self.branches.iter_mut() {
            let old_child = adapter.get_child(old, segment);
            let new_child = adapter.get_child(new, segment);

            if let Some(subtree) = branch.subtree.as_mut() {
                if subtree.diff(adapter, &old_child, &new_child, options) {
                    // A changed descendant means this level changed as well
                    changed = true;
                    if let Some(registry) = &branch.registry {
                        registry.dispatch(&old_child, &new_child);
                    }
                    continue;
                }
            }

            let differs = !adapter.equal(&old_child, &new_child);
            changed |= differs;

            match branch.registry.as_ref().map(|registry| registry.is_active()) {
                Some(true) if differs => {
                    if let Some(registry) = &branch.registry {
                        registry.dispatch(&old_child, &new_child);
                    }
                }
                Some(false) if options.drop_inactive_registries => {
                    trace!(%segment, "Dropping inactive registry");
                    branch.registry = None;
                }
                _ => {}
            }
        }
        changed
    }

    /// Fires the registry at exactly `path` iff `old` and `new` differ.
    ///
    /// Descendants of `path` are not visited.
    pub fn diff_at<A>(
        &self,
        adapter: &A,
        path: &PathKey,
        old: &V,
        new: &V,
    ) -> bool
    where
        A: DocumentAdapter<Value = V> + ?Sized,
    {
        match self.registry_at(path) {
            Some(registry) if !adapter.equal(old, new) => {
                registry.dispatch(old, new);
                true
            }
            _ => false,
        }
    }
}

impl<V: 'static> fmt::Debug for NotificationTree<V> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let mut map = f.debug_map();
        for (segment, branch) in &self.branches {
            map.entry(
                segment,
                &(
                    branch.registry.as_ref().map(|registry| registry.len()),
                    branch.subtree.as_deref(),
                ),
            );
        }
        map.finish()
    }
}
