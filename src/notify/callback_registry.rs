//! Per-path callback storage.
//!
//! Most observed paths carry a single callback, so storage starts out as a
//! lone slot and only grows into a list once a second callback arrives. The
//! list is kept from then on, even when callbacks are cancelled again.

use std::cell::RefCell;
use std::fmt;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::sync::Weak;

use parking_lot::ReentrantMutex;
use tracing::trace;

/// Identifies one callback inside its registry.
pub type SlotId = u64;

pub(crate) type Callback<V> = Box<dyn Fn(&V, &V) + Send + Sync>;

/// Storage layout currently used by a [`CallbackRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageMode {
    Empty,
    Single,
    Multi,
}

struct Slot<V> {
    id: SlotId,
    /// Cleared on cancellation so an in-flight dispatch pass skips the slot.
    live: AtomicBool,
    callback: Callback<V>,
}

impl<V> Slot<V> {
    fn is_live(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }

    fn retire(&self) {
        self.live.store(false, Ordering::Release);
    }
}

enum Slots<V> {
    Empty,
    Single(Arc<Slot<V>>),
    Multi(Vec<Arc<Slot<V>>>),
}

impl<V> Default for Slots<V> {
    fn default() -> Self {
        Slots::Empty
    }
}

impl<V> Slots<V> {
    fn insert(
        &mut self,
        slot: Arc<Slot<V>>,
    ) {
        *self = match std::mem::take(self) {
            Slots::Empty => Slots::Single(slot),
            Slots::Single(existing) => Slots::Multi(vec![existing, slot]),
            Slots::Multi(mut slots) => {
                slots.push(slot);
                Slots::Multi(slots)
            }
        };
    }

    fn remove(
        &mut self,
        id: SlotId,
    ) -> Option<Arc<Slot<V>>> {
        if let Slots::Multi(slots) = self {
            let index = slots.iter().position(|slot| slot.id == id)?;
            return Some(slots.remove(index));
        }
        if !self.contains(id) {
            return None;
        }
        // A lone slot goes back to Empty, never to a one-element list
        match std::mem::take(self) {
            Slots::Single(slot) => Some(slot),
            _ => None,
        }
    }

    fn contains(
        &self,
        id: SlotId,
    ) -> bool {
        match self {
            Slots::Empty => false,
            Slots::Single(slot) => slot.id == id,
            Slots::Multi(slots) => slots.iter().any(|slot| slot.id == id),
        }
    }

    fn len(&self) -> usize {
        match self {
            Slots::Empty => 0,
            Slots::Single(_) => 1,
            Slots::Multi(slots) => slots.len(),
        }
    }

    fn mode(&self) -> StorageMode {
        match self {
            Slots::Empty => StorageMode::Empty,
            Slots::Single(_) => StorageMode::Single,
            Slots::Multi(_) => StorageMode::Multi,
        }
    }
}

/// Callbacks registered for exactly one path.
///
/// All state sits behind one reentrant lock. `dispatch` holds it for the whole
/// pass, so a cancellation from another thread waits for the pass to finish
/// and never observes it half done. A callback cancelling a slot of the same
/// registry re-enters the lock on its own thread; the cancelled slot is
/// skipped for the rest of the pass.
pub struct CallbackRegistry<V> {
    slots: ReentrantMutex<RefCell<Slots<V>>>,
    next_slot: AtomicU64,
}

impl<V: 'static> CallbackRegistry<V> {
    pub fn new() -> Self {
        Self {
            slots: ReentrantMutex::new(RefCell::new(Slots::Empty)),
            next_slot: AtomicU64::new(1),
        }
    }

    /// Stores `callback` and returns a handle that can later remove it.
    pub fn register<F>(
        self: &Arc<Self>,
        callback: F,
    ) -> CancellationHandle
    where
        F: Fn(&V, &V) + Send + Sync + 'static,
    {
        let id = self.next_slot.fetch_add(1, Ordering::Relaxed);
        let slot = Arc::new(Slot {
            id,
            live: AtomicBool::new(true),
            callback: Box::new(callback),
        });

        let mode = {
            let guard = self.slots.lock();
            let mut slots = guard.borrow_mut();
            slots.insert(slot);
            slots.mode()
        };
        trace!(slot_id = id, ?mode, "Callback registered");

        let owner: Weak<dyn SlotOwner> = Arc::downgrade(self) as Weak<dyn SlotOwner>;
        CancellationHandle {
            owner: Some(owner),
            slot: id,
        }
    }

    /// Removes the callback stored under `slot`. Unknown ids are ignored.
    pub fn cancel(
        &self,
        slot: SlotId,
    ) -> bool {
        let guard = self.slots.lock();
        let removed = guard.borrow_mut().remove(slot);
        match removed {
            Some(slot) => {
                slot.retire();
                trace!(slot_id = slot.id, "Callback cancelled");
                true
            }
            None => false,
        }
    }

    /// Invokes every live callback, in registration order.
    ///
    /// A panicking callback aborts the pass and unwinds to the caller.
    pub fn dispatch(
        &self,
        old: &V,
        new: &V,
    ) {
        let guard = self.slots.lock();
        // The RefCell borrow ends here so callbacks may cancel re-entrantly
        let pass: Vec<Arc<Slot<V>>> = match &*guard.borrow() {
            Slots::Empty => return,
            Slots::Single(slot) => vec![Arc::clone(slot)],
            Slots::Multi(slots) => slots.clone(),
        };
        trace!(callbacks = pass.len(), "Dispatching change");

        for slot in &pass {
            if slot.is_live() {
                (slot.callback)(old, new);
            }
        }
        drop(guard);
    }

    /// True iff at least one callback is still registered.
    pub fn is_active(&self) -> bool {
        self.len() > 0
    }

    pub fn len(&self) -> usize {
        self.slots.lock().borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        !self.is_active()
    }

    pub fn storage_mode(&self) -> StorageMode {
        self.slots.lock().borrow().mode()
    }

    fn contains(
        &self,
        slot: SlotId,
    ) -> bool {
        self.slots.lock().borrow().contains(slot)
    }
}

impl<V: 'static> Default for CallbackRegistry<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: 'static> fmt::Debug for CallbackRegistry<V> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("CallbackRegistry")
            .field("mode", &self.storage_mode())
            .field("callbacks", &self.len())
            .finish()
    }
}

/// Type-erased view of a registry, so handles do not carry the value type.
trait SlotOwner: Send + Sync {
    fn release(
        &self,
        slot: SlotId,
    ) -> bool;

    fn holds(
        &self,
        slot: SlotId,
    ) -> bool;
}

impl<V: 'static> SlotOwner for CallbackRegistry<V> {
    fn release(
        &self,
        slot: SlotId,
    ) -> bool {
        self.cancel(slot)
    }

    fn holds(
        &self,
        slot: SlotId,
    ) -> bool {
        self.contains(slot)
    }
}

/// Token for removing one registered callback.
///
/// The handle only holds a weak reference: it keeps neither the callback nor
/// the registry alive, and cancelling after the document is gone is a no-op.
/// Dropping a handle leaves the callback registered; see
/// [`CancellationHandle::into_guard`] for scoped registrations.
pub struct CancellationHandle {
    owner: Option<Weak<dyn SlotOwner>>,
    slot: SlotId,
}

impl CancellationHandle {
    /// A handle that refers to nothing. Cancelling it does nothing.
    pub fn inert() -> Self {
        Self { owner: None, slot: 0 }
    }

    /// Removes the callback if its registry is still alive.
    ///
    /// Returns whether a callback was removed. Every call after the first is
    /// a no-op.
    pub fn cancel(&mut self) -> bool {
        match self.owner.take().and_then(|owner| owner.upgrade()) {
            Some(owner) => owner.release(self.slot),
            None => false,
        }
    }

    /// True while the callback is still registered.
    pub fn is_connected(&self) -> bool {
        self.owner
            .as_ref()
            .and_then(Weak::upgrade)
            .map(|owner| owner.holds(self.slot))
            .unwrap_or(false)
    }

    pub fn is_inert(&self) -> bool {
        self.owner.is_none()
    }

    /// Slot id inside the owning registry, `None` for inert handles.
    pub fn slot_id(&self) -> Option<SlotId> {
        self.owner.as_ref().map(|_| self.slot)
    }

    /// Converts the handle into a guard that cancels when dropped.
    pub fn into_guard(self) -> CancellationGuard {
        CancellationGuard { handle: self }
    }
}

impl Default for CancellationHandle {
    fn default() -> Self {
        Self::inert()
    }
}

impl fmt::Debug for CancellationHandle {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("CancellationHandle")
            .field("slot", &self.slot_id())
            .finish_non_exhaustive()
    }
}

/// Cancels its callback when dropped.
#[derive(Debug)]
pub struct CancellationGuard {
    handle: CancellationHandle,
}

impl CancellationGuard {
    pub fn is_connected(&self) -> bool {
        self.handle.is_connected()
    }
}

impl Drop for CancellationGuard {
    fn drop(&mut self) {
        if self.handle.cancel() {
            trace!(slot_id = self.handle.slot, "Callback cancelled via guard");
        }
    }
}
