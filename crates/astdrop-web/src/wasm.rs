#![forbid(unsafe_code)]

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use core::time::Duration;

use astdrop_core::event::Origin;
use astdrop_core::ingest::{PasteDropTarget, PendingDrop};
use astdrop_core::listener::ListenerRegistry;
use astdrop_core::logging::{debug, info};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use crate::dom::{DomEvent, DomFile, DomTarget, js_error};
use crate::{host_time, parse_options, timeout_millis};

type Listener = Closure<dyn FnMut(web_sys::Event) -> Result<(), JsValue>>;
type Release = Closure<dyn FnMut() -> Result<(), JsValue>>;

const DRAG_EVENTS: &str = "dragenter dragover dragleave drop";

// ---------------------------------------------------------------------------
// Shared state
// ---------------------------------------------------------------------------

/// State reachable from the DOM listeners.
///
/// Listeners hold it strongly; callbacks stored inside it hold it weakly.
struct Shared {
    target: RefCell<PasteDropTarget<DomEvent>>,
    delay: Duration,
    dragging: Cell<bool>,
    on_drag_change: RefCell<Option<js_sys::Function>>,
    // First exception thrown by a host callback during the current dispatch.
    thrown: RefCell<Option<JsValue>>,
    timer: Cell<Option<i32>>,
    release: RefCell<Option<Release>>,
}

impl Shared {
    /// Run `f` against the target, then report drag changes and rethrow the
    /// first exception a host callback raised meanwhile.
    fn dispatch<R>(
        &self,
        f: impl FnOnce(&mut PasteDropTarget<DomEvent>) -> R,
    ) -> Result<R, JsValue> {
        let result = {
            let mut target = self
                .target
                .try_borrow_mut()
                .map_err(|_| js_error("PasteDropWidget: re-entrant event dispatch"))?;
            f(&mut target)
        };
        self.sync_dragging();
        match self.thrown.borrow_mut().take() {
            Some(err) => Err(err),
            None => Ok(result),
        }
    }

    fn sync_dragging(&self) {
        let Ok(dragging) = self.target.try_borrow().map(|t| t.is_dragging()) else {
            return;
        };
        if self.dragging.replace(dragging) == dragging {
            return;
        }
        let callback = self.on_drag_change.borrow().clone();
        if let Some(callback) = callback {
            self.call(&callback, &js_sys::Array::of1(&JsValue::from_bool(dragging)));
        }
    }

    fn call(&self, callback: &js_sys::Function, args: &js_sys::Array) {
        if let Err(err) = callback.apply(&JsValue::NULL, args) {
            self.thrown.borrow_mut().get_or_insert(err);
        }
    }

    fn arm_release(&self) -> Result<(), JsValue> {
        self.cancel_release();
        let release = self.release.borrow();
        let Some(callback) = release.as_ref() else {
            return Ok(());
        };
        let handle = window()?.set_timeout_with_callback_and_timeout_and_arguments_0(
            callback.as_ref().unchecked_ref(),
            timeout_millis(self.delay),
        )?;
        self.timer.set(Some(handle));
        Ok(())
    }

    fn cancel_release(&self) {
        let Some(handle) = self.timer.take() else {
            return;
        };
        if let Ok(window) = window() {
            window.clear_timeout_with_handle(handle);
        }
    }
}

fn window() -> Result<web_sys::Window, JsValue> {
    web_sys::window().ok_or_else(|| js_error("PasteDropWidget: no global window"))
}

fn now() -> Duration {
    web_sys::window()
        .and_then(|w| w.performance())
        .map_or(Duration::ZERO, |p| host_time(p.now()))
}

// ---------------------------------------------------------------------------
// Listeners
// ---------------------------------------------------------------------------

fn paste_listener(shared: &Rc<Shared>) -> Listener {
    let shared = Rc::clone(shared);
    Closure::wrap(Box::new(move |event: web_sys::Event| -> Result<(), JsValue> {
        let event = DomEvent::new(event);
        let outcome = shared
            .dispatch(|t| t.handle_paste(&event))?
            .map_err(|err| js_error(err.message()))?;
        debug!(?outcome, "paste handled");
        Ok(())
    }) as Box<dyn FnMut(web_sys::Event) -> Result<(), JsValue>>)
}

fn drag_listener(shared: &Rc<Shared>) -> Listener {
    let shared = Rc::clone(shared);
    Closure::wrap(Box::new(move |event: web_sys::Event| -> Result<(), JsValue> {
        let event = DomEvent::new(event);
        match event.kind().as_str() {
            "dragenter" => {
                shared.cancel_release();
                shared.dispatch(|t| t.handle_drag_enter(&event, now()))?;
            }
            "dragover" => {
                shared.cancel_release();
                shared.dispatch(|t| t.handle_drag_over(&event, now()))?;
            }
            "dragleave" => {
                shared.dispatch(|t| t.handle_drag_leave(&event, now()))?;
                shared.arm_release()?;
            }
            "drop" => {
                shared.cancel_release();
                if let Some(pending) = shared.dispatch(|t| t.handle_drop(&event))? {
                    read_dropped(&shared, pending)?;
                }
            }
            _ => {}
        }
        Ok(())
    }) as Box<dyn FnMut(web_sys::Event) -> Result<(), JsValue>>)
}

fn release_callback(shared: &Rc<Shared>) -> Release {
    let shared = Rc::downgrade(shared);
    Closure::wrap(Box::new(move || -> Result<(), JsValue> {
        let Some(shared) = shared.upgrade() else {
            return Ok(());
        };
        shared.timer.set(None);
        shared.dispatch(|t| t.release_drag())?;
        Ok(())
    }) as Box<dyn FnMut() -> Result<(), JsValue>>)
}

/// Read the dropped file as text and finish the drop from the reader's `load`.
fn read_dropped(shared: &Rc<Shared>, pending: PendingDrop<DomFile>) -> Result<(), JsValue> {
    let reader = web_sys::FileReader::new()?;
    let file = pending.file().clone();
    let source = reader.clone();
    let shared = Rc::clone(shared);
    let onload = Closure::once_into_js(move |event: web_sys::Event| -> Result<(), JsValue> {
        let text = source.result()?.as_string().unwrap_or_default();
        let event = DomEvent::new(event);
        let delivery = shared
            .dispatch(|t| t.complete_drop(pending, &event, &text))?
            .map_err(|err| js_error(err.message()))?;
        debug!(?delivery, "drop handled");
        Ok(())
    });
    reader.set_onload(Some(onload.unchecked_ref()));
    reader.read_as_text(file.as_blob())
}

fn text_forwarder(
    shared: &Rc<Shared>,
    callback: js_sys::Function,
) -> impl FnMut(Origin, &DomEvent, &str, Option<&str>) + 'static {
    let shared = Rc::downgrade(shared);
    move |origin: Origin, event: &DomEvent, text: &str, category: Option<&str>| {
        let Some(shared) = Weak::upgrade(&shared) else {
            return;
        };
        let args = js_sys::Array::of4(
            &JsValue::from_str(origin.as_str()),
            event.as_js(),
            &JsValue::from_str(text),
            &category.map_or(JsValue::UNDEFINED, JsValue::from_str),
        );
        shared.call(&callback, &args);
    }
}

fn error_forwarder(
    shared: &Rc<Shared>,
    callback: js_sys::Function,
) -> impl FnMut(Origin, &DomEvent, &str) + 'static {
    let shared = Rc::downgrade(shared);
    move |origin: Origin, event: &DomEvent, message: &str| {
        let Some(shared) = Weak::upgrade(&shared) else {
            return;
        };
        let args = js_sys::Array::of3(
            &JsValue::from_str(origin.as_str()),
            event.as_js(),
            &JsValue::from_str(message),
        );
        shared.call(&callback, &args);
    }
}

// ---------------------------------------------------------------------------
// Widget
// ---------------------------------------------------------------------------

/// Paste/drop target for serialized ASTs.
///
/// Pastes are captured on the document; drags and drops on the mounted
/// container, also in the capture phase so descendants never see a handled
/// drop. A failed conversion is reported to `onError` and then thrown
/// from the listener.
#[wasm_bindgen]
pub struct PasteDropWidget {
    shared: Rc<Shared>,
    listeners: ListenerRegistry<DomTarget>,
    closures: Vec<Listener>,
}

#[wasm_bindgen]
impl PasteDropWidget {
    /// `options` is an options object, its JSON text, or `undefined`.
    #[wasm_bindgen(constructor)]
    pub fn new(options: JsValue) -> Result<PasteDropWidget, JsValue> {
        let json = if options.is_undefined() || options.is_null() {
            None
        } else if let Some(text) = options.as_string() {
            Some(text)
        } else {
            js_sys::JSON::stringify(&options)?.as_string()
        };
        let config = parse_options(json.as_deref()).map_err(|err| js_error(&err.to_string()))?;
        let target = PasteDropTarget::new(config);
        let delay = target.drag_state().delay();
        Ok(Self {
            shared: Rc::new(Shared {
                target: RefCell::new(target),
                delay,
                dragging: Cell::new(false),
                on_drag_change: RefCell::new(None),
                thrown: RefCell::new(None),
                timer: Cell::new(None),
                release: RefCell::new(None),
            }),
            listeners: ListenerRegistry::new(),
            closures: Vec::new(),
        })
    }

    /// `callback(origin, event, text, category)`. Passing `undefined` leaves
    /// pastes and drops to the browser.
    #[wasm_bindgen(js_name = onText)]
    pub fn on_text(&self, callback: Option<js_sys::Function>) -> Result<(), JsValue> {
        let mut target = self.target_mut()?;
        match callback {
            Some(callback) => target.set_on_text(text_forwarder(&self.shared, callback)),
            None => target.clear_on_text(),
        }
        Ok(())
    }

    /// `callback(origin, event, message)`.
    #[wasm_bindgen(js_name = onError)]
    pub fn on_error(&self, callback: Option<js_sys::Function>) -> Result<(), JsValue> {
        let mut target = self.target_mut()?;
        match callback {
            Some(callback) => target.set_on_error(error_forwarder(&self.shared, callback)),
            None => target.clear_on_error(),
        }
        Ok(())
    }

    /// `callback(dragging)`, called whenever the drop indicator toggles.
    #[wasm_bindgen(js_name = onDragChange)]
    pub fn on_drag_change(&self, callback: Option<js_sys::Function>) {
        *self.shared.on_drag_change.borrow_mut() = callback;
    }

    /// Attach the listeners. A widget mounts at most once at a time.
    pub fn mount(&mut self, container: web_sys::Element) -> Result<(), JsValue> {
        if self.is_mounted() {
            return Err(js_error("PasteDropWidget is already mounted"));
        }
        let document = window()?
            .document()
            .ok_or_else(|| js_error("PasteDropWidget: no document"))?;

        let paste = paste_listener(&self.shared);
        let drag = drag_listener(&self.shared);
        let paste_fn = Rc::new(paste.as_ref().unchecked_ref::<js_sys::Function>().clone());
        let drag_fn = Rc::new(drag.as_ref().unchecked_ref::<js_sys::Function>().clone());

        *self.shared.release.borrow_mut() = Some(release_callback(&self.shared));
        self.listeners
            .bind(&DomTarget::new(document), "paste", &paste_fn, true);
        self.listeners
            .bind(&DomTarget::new(container), DRAG_EVENTS, &drag_fn, true);
        self.closures.push(paste);
        self.closures.push(drag);
        info!(bindings = self.listeners.len(), "widget mounted");
        Ok(())
    }

    /// Detach every listener and cancel a pending drag release.
    pub fn unmount(&mut self) {
        let removed = self.listeners.unbind_all();
        self.shared.cancel_release();
        self.shared.release.borrow_mut().take();
        self.closures.clear();
        if removed > 0 {
            debug!(removed, "widget unmounted");
        }
    }

    #[wasm_bindgen(js_name = isMounted)]
    pub fn is_mounted(&self) -> bool {
        !self.closures.is_empty()
    }

    #[wasm_bindgen(js_name = isDragging)]
    pub fn is_dragging(&self) -> bool {
        self.shared.dragging.get()
    }

    /// Number of live `(target, event)` listener registrations.
    #[wasm_bindgen(js_name = bindingCount)]
    pub fn binding_count(&self) -> usize {
        self.listeners.len()
    }
}

impl PasteDropWidget {
    fn target_mut(&self) -> Result<std::cell::RefMut<'_, PasteDropTarget<DomEvent>>, JsValue> {
        self.shared
            .target
            .try_borrow_mut()
            .map_err(|_| js_error("PasteDropWidget: callbacks cannot change during dispatch"))
    }
}

impl Drop for PasteDropWidget {
    fn drop(&mut self) {
        self.unmount();
    }
}
