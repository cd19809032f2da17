//! Typed observer lists
//!
//! Listeners run synchronously, in registration order, inside the call that
//! triggers them.

use crate::core::ids::{BodyHandle, CompositeHandle};

/// What raised an event
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventSource {
    Engine,
    Body(BodyHandle),
    Composite(CompositeHandle),
}

/// Payload handed to listeners
#[derive(Clone, Debug)]
pub struct Event<T> {
    pub name: &'static str,
    pub source: EventSource,
    pub data: T,
}

/// Returned by `on`, used to unregister
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Callback<T> = Box<dyn FnMut(&Event<T>)>;

pub struct Observers<T> {
    name: &'static str,
    listeners: Vec<(ListenerId, Callback<T>)>,
    next_id: u64,
}

impl<T> Observers<T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            listeners: Vec::new(),
            next_id: 0,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn on(&mut self, callback: impl FnMut(&Event<T>) + 'static) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(callback)));
        id
    }

    /// Returns false if the listener was not registered
    pub fn off(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener, _)| *listener != id);
        self.listeners.len() != before
    }

    pub fn clear(&mut self) {
        self.listeners.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn trigger(&mut self, source: EventSource, data: T) {
        if self.listeners.is_empty() {
            return;
        }
        let event = Event {
            name: self.name,
            source,
            data,
        };
        for (_, callback) in self.listeners.iter_mut() {
            callback(&event);
        }
    }
}

impl<T> std::fmt::Debug for Observers<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observers")
            .field("name", &self.name)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn listeners_fire_in_registration_order_until_removed() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut observers: Observers<u32> = Observers::new("tick");

        let first = {
            let seen = seen.clone();
            observers.on(move |e| seen.borrow_mut().push(("first", e.data)))
        };
        {
            let seen = seen.clone();
            observers.on(move |e| {
                assert_eq!(e.name, "tick");
                seen.borrow_mut().push(("second", e.data))
            });
        }

        observers.trigger(EventSource::Engine, 1);
        assert!(observers.off(first));
        assert!(!observers.off(first));
        observers.trigger(EventSource::Engine, 2);

        assert_eq!(*seen.borrow(), vec![("first", 1), ("second", 1), ("second", 2)]);
    }
}
