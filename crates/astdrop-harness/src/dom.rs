#![forbid(unsafe_code)]

//! A minimal fake DOM.
//!
//! [`FakeTarget`] counts every `addEventListener`/`removeEventListener` so
//! tests can assert that a widget leaves nothing behind. [`FakeEvent`]
//! records what the pipeline did to it (default prevented, propagation
//! stopped, drop effect).
//!
//! Listeners return `Result`; [`FakeTarget::dispatch`] surfaces the first
//! `Err`, standing in for an exception escaping a browser listener.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use astdrop_core::event::{
    ClipboardData, DragEvent, DropEffect, DroppedFile, IngestEvent, PasteEvent,
};
use astdrop_core::ingest::IngestError;
use astdrop_core::listener::EventTarget;

/// A fake listener. Returning `Err` models an exception thrown out of it.
pub type FakeListener = Rc<dyn Fn(&FakeEvent) -> Result<(), IngestError>>;

// ---------------------------------------------------------------------------
// Payloads
// ---------------------------------------------------------------------------

/// Clipboard contents as `(mime type, data)` pairs in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FakeClipboard {
    items: Vec<(String, String)>,
}

impl FakeClipboard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clipboard holding only `text/plain`.
    #[must_use]
    pub fn plain(text: &str) -> Self {
        Self::new().with("text/plain", text)
    }

    #[must_use]
    pub fn with(mut self, mime: &str, data: &str) -> Self {
        self.items.push((mime.to_string(), data.to_string()));
        self
    }
}

impl ClipboardData for FakeClipboard {
    fn types(&self) -> Vec<String> {
        self.items.iter().map(|(mime, _)| mime.clone()).collect()
    }

    fn get_data(&self, mime: &str) -> Option<String> {
        self.items
            .iter()
            .find(|(m, _)| m == mime)
            .map(|(_, data)| data.clone())
    }
}

/// A dropped file with known contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeFile {
    mime: String,
    contents: String,
}

impl FakeFile {
    pub fn new(mime: &str, contents: &str) -> Self {
        Self {
            mime: mime.to_string(),
            contents: contents.to_string(),
        }
    }

    pub fn contents(&self) -> &str {
        &self.contents
    }
}

impl DroppedFile for FakeFile {
    fn mime_type(&self) -> String {
        self.mime.clone()
    }
}

// ---------------------------------------------------------------------------
// FakeEvent
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct FakeEvent {
    kind: String,
    target_node: Option<String>,
    clipboard: Option<FakeClipboard>,
    files: Vec<FakeFile>,
    default_prevented: Cell<bool>,
    propagation_stopped: Cell<bool>,
    drop_effect: Cell<DropEffect>,
}

impl FakeEvent {
    pub fn new(kind: &str) -> Self {
        Self {
            kind: kind.to_string(),
            ..Self::default()
        }
    }

    /// A `paste` of `text` as `text/plain` into a `DIV`.
    pub fn paste(text: &str) -> Self {
        Self::new("paste")
            .with_clipboard(FakeClipboard::plain(text))
            .on_node("DIV")
    }

    /// A `drop` carrying `files`.
    pub fn drop_files(files: impl IntoIterator<Item = FakeFile>) -> Self {
        Self {
            files: files.into_iter().collect(),
            ..Self::new("drop")
        }
    }

    /// The file reader's `load` event that completes a drop.
    pub fn load() -> Self {
        Self::new("load")
    }

    #[must_use]
    pub fn with_clipboard(mut self, clipboard: FakeClipboard) -> Self {
        self.clipboard = Some(clipboard);
        self
    }

    #[must_use]
    pub fn on_node(mut self, node_name: &str) -> Self {
        self.target_node = Some(node_name.to_string());
        self
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn files(&self) -> &[FakeFile] {
        &self.files
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented.get()
    }

    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped.get()
    }

    pub fn drop_effect(&self) -> DropEffect {
        self.drop_effect.get()
    }
}

impl IngestEvent for FakeEvent {
    fn prevent_default(&self) {
        self.default_prevented.set(true);
    }

    fn stop_propagation(&self) {
        self.propagation_stopped.set(true);
    }
}

impl PasteEvent for FakeEvent {
    type Clipboard = FakeClipboard;

    fn clipboard_data(&self) -> Option<FakeClipboard> {
        self.clipboard.clone()
    }

    fn target_node_name(&self) -> Option<String> {
        self.target_node.clone()
    }
}

impl DragEvent for FakeEvent {
    type File = FakeFile;

    fn first_file(&self) -> Option<FakeFile> {
        self.files.first().cloned()
    }

    fn set_drop_effect(&self, effect: DropEffect) {
        self.drop_effect.set(effect);
    }
}

// ---------------------------------------------------------------------------
// FakeTarget
// ---------------------------------------------------------------------------

struct Registered {
    event: String,
    listener: FakeListener,
    capture: bool,
}

#[derive(Default)]
struct TargetState {
    listeners: RefCell<Vec<Registered>>,
    added: Cell<usize>,
    removed: Cell<usize>,
}

/// A document or element. Clones are the same node.
#[derive(Clone)]
pub struct FakeTarget {
    name: Rc<str>,
    state: Rc<TargetState>,
}

impl FakeTarget {
    pub fn new(name: &str) -> Self {
        Self {
            name: Rc::from(name),
            state: Rc::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Deliver `event` to every listener registered for its kind, capture
    /// listeners first. Returns the first error a listener raised.
    pub fn dispatch(&self, event: &FakeEvent) -> Result<(), IngestError> {
        let mut matching: Vec<(bool, FakeListener)> = self
            .state
            .listeners
            .borrow()
            .iter()
            .filter(|r| r.event == event.kind())
            .map(|r| (r.capture, Rc::clone(&r.listener)))
            .collect();
        matching.sort_by_key(|(capture, _)| !capture);

        let mut first_error = None;
        for (_, listener) in matching {
            if let Err(err) = listener(event) {
                first_error.get_or_insert(err);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Listeners currently attached.
    pub fn listener_count(&self) -> usize {
        self.state.listeners.borrow().len()
    }

    /// Listeners attached for `event`.
    pub fn listeners_for(&self, event: &str) -> usize {
        self.state
            .listeners
            .borrow()
            .iter()
            .filter(|r| r.event == event)
            .count()
    }

    /// Total `addEventListener` calls that attached something.
    pub fn add_count(&self) -> usize {
        self.state.added.get()
    }

    /// Total `removeEventListener` calls that detached something.
    pub fn remove_count(&self) -> usize {
        self.state.removed.get()
    }
}

impl PartialEq for FakeTarget {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }
}

impl std::fmt::Debug for FakeTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FakeTarget")
            .field("name", &self.name)
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl EventTarget for FakeTarget {
    type Listener = FakeListener;

    // Like the DOM, an identical (event, listener, capture) registration is ignored.
    fn add_listener(&self, event: &str, listener: &FakeListener, capture: bool) {
        let mut listeners = self.state.listeners.borrow_mut();
        let present = listeners
            .iter()
            .any(|r| r.event == event && r.capture == capture && Rc::ptr_eq(&r.listener, listener));
        if present {
            return;
        }
        listeners.push(Registered {
            event: event.to_string(),
            listener: Rc::clone(listener),
            capture,
        });
        self.state.added.set(self.state.added.get() + 1);
    }

    fn remove_listener(&self, event: &str, listener: &FakeListener, capture: bool) {
        let mut listeners = self.state.listeners.borrow_mut();
        let Some(index) = listeners
            .iter()
            .position(|r| r.event == event && r.capture == capture && Rc::ptr_eq(&r.listener, listener))
        else {
            return;
        };
        listeners.remove(index);
        self.state.removed.set(self.state.removed.get() + 1);
    }
}
