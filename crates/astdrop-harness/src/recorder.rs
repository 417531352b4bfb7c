#![forbid(unsafe_code)]

use std::cell::RefCell;
use std::rc::Rc;

use astdrop_core::event::Origin;

/// One observed host callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Text {
        origin: Origin,
        text: String,
        category: Option<String>,
    },
    Error {
        origin: Origin,
        message: String,
    },
    DragChange(bool),
}

/// Records host callbacks in the order they arrive. Clones share one log.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    calls: Rc<RefCell<Vec<Call>>>,
}

impl Recorder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// An `on_text` callback logging into this recorder.
    pub fn text_callback<E: 'static>(&self) -> impl FnMut(Origin, &E, &str, Option<&str>) + 'static {
        let calls = Rc::clone(&self.calls);
        move |origin: Origin, _: &E, text: &str, category: Option<&str>| {
            calls.borrow_mut().push(Call::Text {
                origin,
                text: text.to_string(),
                category: category.map(str::to_string),
            });
        }
    }

    /// An `on_error` callback logging into this recorder.
    pub fn error_callback<E: 'static>(&self) -> impl FnMut(Origin, &E, &str) + 'static {
        let calls = Rc::clone(&self.calls);
        move |origin: Origin, _: &E, message: &str| {
            calls.borrow_mut().push(Call::Error {
                origin,
                message: message.to_string(),
            });
        }
    }

    pub fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    /// `(origin, text, category)` of every text callback.
    pub fn texts(&self) -> Vec<(Origin, String, Option<String>)> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                Call::Text {
                    origin,
                    text,
                    category,
                } => Some((*origin, text.clone(), category.clone())),
                _ => None,
            })
            .collect()
    }

    /// `(origin, message)` of every error callback.
    pub fn errors(&self) -> Vec<(Origin, String)> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                Call::Error { origin, message } => Some((*origin, message.clone())),
                _ => None,
            })
            .collect()
    }

    /// Every drag indicator transition, in order.
    pub fn drag_changes(&self) -> Vec<bool> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                Call::DragChange(dragging) => Some(*dragging),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.calls.borrow_mut().clear();
    }
}
