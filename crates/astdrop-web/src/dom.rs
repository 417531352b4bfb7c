#![forbid(unsafe_code)]

//! `web-sys` handles adapted to the core's host traits.

use astdrop_core::event::{
    ClipboardData, DragEvent, DropEffect, DroppedFile, IngestEvent, PasteEvent,
};
use astdrop_core::listener::EventTarget;
use astdrop_core::logging::warn;
use wasm_bindgen::{JsCast, JsValue};

/// Any DOM event the widget handles: `paste`, the drag family, and the
/// `load` event of the file reader that completes a drop.
#[derive(Debug, Clone)]
pub struct DomEvent(web_sys::Event);

impl DomEvent {
    pub fn new(event: web_sys::Event) -> Self {
        Self(event)
    }

    pub fn as_js(&self) -> &JsValue {
        self.0.as_ref()
    }

    pub fn kind(&self) -> String {
        self.0.type_()
    }

    fn data_transfer(&self) -> Option<web_sys::DataTransfer> {
        self.0
            .dyn_ref::<web_sys::DragEvent>()
            .and_then(web_sys::DragEvent::data_transfer)
    }
}

impl IngestEvent for DomEvent {
    fn prevent_default(&self) {
        self.0.prevent_default();
    }

    fn stop_propagation(&self) {
        self.0.stop_propagation();
    }
}

impl PasteEvent for DomEvent {
    type Clipboard = DomClipboard;

    fn clipboard_data(&self) -> Option<DomClipboard> {
        self.0
            .dyn_ref::<web_sys::ClipboardEvent>()
            .and_then(web_sys::ClipboardEvent::clipboard_data)
            .map(DomClipboard)
    }

    fn target_node_name(&self) -> Option<String> {
        self.0
            .target()
            .and_then(|t| t.dyn_into::<web_sys::Node>().ok())
            .map(|node| node.node_name())
    }
}

impl DragEvent for DomEvent {
    type File = DomFile;

    fn first_file(&self) -> Option<DomFile> {
        self.data_transfer()?.files()?.get(0).map(DomFile)
    }

    fn set_drop_effect(&self, effect: DropEffect) {
        if let Some(transfer) = self.data_transfer() {
            transfer.set_drop_effect(effect.as_str());
        }
    }
}

#[derive(Debug, Clone)]
pub struct DomClipboard(web_sys::DataTransfer);

impl ClipboardData for DomClipboard {
    fn types(&self) -> Vec<String> {
        self.0.types().iter().filter_map(|t| t.as_string()).collect()
    }

    fn get_data(&self, mime: &str) -> Option<String> {
        self.0.get_data(mime).ok()
    }
}

#[derive(Debug, Clone)]
pub struct DomFile(web_sys::File);

impl DomFile {
    pub fn as_blob(&self) -> &web_sys::Blob {
        self.0.as_ref()
    }
}

impl DroppedFile for DomFile {
    fn mime_type(&self) -> String {
        self.0.type_()
    }
}

/// A document or element listeners are attached to.
#[derive(Debug, Clone)]
pub struct DomTarget(web_sys::EventTarget);

impl DomTarget {
    pub fn new(target: impl Into<web_sys::EventTarget>) -> Self {
        Self(target.into())
    }
}

impl PartialEq for DomTarget {
    fn eq(&self, other: &Self) -> bool {
        AsRef::<JsValue>::as_ref(&self.0) == AsRef::<JsValue>::as_ref(&other.0)
    }
}

impl EventTarget for DomTarget {
    type Listener = js_sys::Function;

    fn add_listener(&self, event: &str, listener: &js_sys::Function, capture: bool) {
        if let Err(err) = self
            .0
            .add_event_listener_with_callback_and_bool(event, listener, capture)
        {
            warn!(event, error = ?err, "addEventListener failed");
        }
    }

    fn remove_listener(&self, event: &str, listener: &js_sys::Function, capture: bool) {
        if let Err(err) = self
            .0
            .remove_event_listener_with_callback_and_bool(event, listener, capture)
        {
            warn!(event, error = ?err, "removeEventListener failed");
        }
    }
}

/// A thrown JS `Error` carrying `message`.
pub fn js_error(message: &str) -> JsValue {
    js_sys::Error::new(message).into()
}
