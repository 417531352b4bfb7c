#![forbid(unsafe_code)]

//! Listener lifecycle: bind at mount, unbind exactly once at unmount.
//!
//! A [`ListenerRegistry`] is owned by one mounted widget instance. Every
//! `(target, event, listener)` it registers is recorded as a
//! [`ListenerBinding`] holding a strong reference to the listener, so the
//! listener lives exactly as long as it is attached.
//!
//! # Invariants
//!
//! 1. After [`unbind_all`](ListenerRegistry::unbind_all) no binding remains.
//! 2. Each recorded binding is removed from its target exactly once.
//! 3. The same `(target, event, listener)` is never registered twice.
//! 4. Dropping the registry unbinds whatever is still bound.

use std::rc::Rc;

use crate::logging::debug;

/// Something listeners can be attached to (a document, an element, a fake).
///
/// Handles are cheap clones compared by identity.
pub trait EventTarget: Clone + PartialEq {
    /// The host's listener type (`js_sys::Function`, `dyn Fn(&Event)`, ...).
    type Listener: ?Sized;

    fn add_listener(&self, event: &str, listener: &Self::Listener, capture: bool);

    fn remove_listener(&self, event: &str, listener: &Self::Listener, capture: bool);
}

/// One registered listener.
pub struct ListenerBinding<T: EventTarget> {
    target: T,
    event: String,
    listener: Rc<T::Listener>,
    capture: bool,
}

impl<T: EventTarget> ListenerBinding<T> {
    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn event(&self) -> &str {
        &self.event
    }

    pub fn listener(&self) -> &Rc<T::Listener> {
        &self.listener
    }

    pub fn capture(&self) -> bool {
        self.capture
    }

    fn matches(&self, target: &T, event: &str, listener: &Rc<T::Listener>) -> bool {
        self.target == *target && self.event == event && Rc::ptr_eq(&self.listener, listener)
    }
}

impl<T: EventTarget + std::fmt::Debug> std::fmt::Debug for ListenerBinding<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerBinding")
            .field("target", &self.target)
            .field("event", &self.event)
            .field("capture", &self.capture)
            .finish_non_exhaustive()
    }
}

/// Instance-scoped list of live bindings.
pub struct ListenerRegistry<T: EventTarget> {
    bindings: Vec<ListenerBinding<T>>,
}

impl<T: EventTarget> ListenerRegistry<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            bindings: Vec::new(),
        }
    }

    /// Register `listener` on `target` for every whitespace-separated name in
    /// `events`. Returns the number of bindings added.
    pub fn bind(
        &mut self,
        target: &T,
        events: &str,
        listener: &Rc<T::Listener>,
        capture: bool,
    ) -> usize {
        let mut added = 0;
        for event in events.split_whitespace() {
            if self.bindings.iter().any(|b| b.matches(target, event, listener)) {
                continue;
            }
            target.add_listener(event, listener, capture);
            self.bindings.push(ListenerBinding {
                target: target.clone(),
                event: event.to_string(),
                listener: Rc::clone(listener),
                capture,
            });
            added += 1;
        }
        debug!(added, total = self.bindings.len(), events, "listeners bound");
        added
    }

    /// Remove every recorded binding from its target. Returns how many were removed.
    pub fn unbind_all(&mut self) -> usize {
        let removed = self.bindings.len();
        for binding in self.bindings.drain(..) {
            binding
                .target
                .remove_listener(&binding.event, &binding.listener, binding.capture);
        }
        if removed > 0 {
            debug!(removed, "listeners unbound");
        }
        removed
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn bindings(&self) -> &[ListenerBinding<T>] {
        &self.bindings
    }
}

impl<T: EventTarget> Default for ListenerRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: EventTarget> Drop for ListenerRegistry<T> {
    fn drop(&mut self) {
        self.unbind_all();
    }
}
