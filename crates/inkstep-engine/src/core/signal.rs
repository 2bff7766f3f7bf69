//! Observable values for animation state that several consumers read.
//!
//! A `MotionValue` owns its current value and a list of listeners. Setting a
//! different value notifies every listener synchronously. Listeners are
//! removed explicitly with the id returned by `subscribe`, so their lifetime
//! is tied to whoever subscribed rather than to ambient state.

use std::fmt;

/// Handle returned by [`MotionValue::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u32);

type Listener<T> = Box<dyn FnMut(&T)>;

pub struct MotionValue<T> {
    value: T,
    listeners: Vec<(ListenerId, Listener<T>)>,
    next_id: u32,
}

impl<T: Clone + PartialEq> MotionValue<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            listeners: Vec::new(),
            next_id: 0,
        }
    }

    /// Current value.
    pub fn get(&self) -> T {
        self.value.clone()
    }

    /// Set the value. Listeners run only when the value actually changes.
    pub fn set(&mut self, value: T) {
        if self.value == value {
            return;
        }
        self.value = value;
        for (_, listener) in &mut self.listeners {
            listener(&self.value);
        }
    }

    /// Register a change listener.
    pub fn subscribe(&mut self, listener: impl FnMut(&T) + 'static) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns false if it was already gone.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(l, _)| *l != id);
        self.listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl<T: fmt::Debug> fmt::Debug for MotionValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MotionValue")
            .field("value", &self.value)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
