use std::marker::PhantomData;
use std::sync::Arc;

use parking_lot::Mutex;

/// Collects every `(old, new)` pair a callback receives.
pub(crate) struct Recorder<V> {
    events: Arc<Mutex<Vec<(V, V)>>>,
}

impl<V: Clone + Send + 'static> Recorder<V> {
    pub(crate) fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub(crate) fn callback(&self) -> impl Fn(&V, &V) + Send + Sync + 'static {
        let events = Arc::clone(&self.events);
        move |old: &V, new: &V| events.lock().push((old.clone(), new.clone()))
    }

    pub(crate) fn events(&self) -> Vec<(V, V)> {
        self.events.lock().clone()
    }

    pub(crate) fn count(&self) -> usize {
        self.events.lock().len()
    }

    pub(crate) fn clear(&self) {
        self.events.lock().clear();
    }
}

/// Records which tagged callback fired, in firing order.
pub(crate) struct FiringOrder<V> {
    tags: Arc<Mutex<Vec<&'static str>>>,
    _value: PhantomData<fn(&V)>,
}

impl<V> Default for FiringOrder<V> {
    fn default() -> Self {
        Self {
            tags: Arc::new(Mutex::new(Vec::new())),
            _value: PhantomData,
        }
    }
}

impl<V: 'static> FiringOrder<V> {
    pub(crate) fn tagged(
        &self,
        tag: &'static str,
    ) -> impl Fn(&V, &V) + Send + Sync + 'static {
        let tags = Arc::clone(&self.tags);
        move |_: &V, _: &V| tags.lock().push(tag)
    }

    pub(crate) fn tags(&self) -> Vec<&'static str> {
        self.tags.lock().clone()
    }
}
