#![forbid(unsafe_code)]

//! The widget wired to the fake DOM.
//!
//! Mirrors the browser binding: the paste listener sits on the document, the
//! drag listener on the container, both in the capture phase, and a drop's file
//! read completes later. Here the read completes when the test calls
//! [`FakeWidget::finish_reads`] and the drag release fires when the test
//! advances the clock.

use std::cell::{Cell, RefCell, RefMut};
use std::collections::VecDeque;
use std::rc::Rc;

use core::time::Duration;

use astdrop_core::config::PasteDropConfig;
use astdrop_core::ingest::{DropDelivery, IngestError, PasteDropTarget, PendingDrop};
use astdrop_core::listener::ListenerRegistry;

use crate::clock::DeterministicClock;
use crate::dom::{FakeEvent, FakeFile, FakeListener, FakeTarget};
use crate::recorder::{Call, Recorder};

const DRAG_EVENTS: &str = "dragenter dragover dragleave drop";

struct Shared {
    target: RefCell<PasteDropTarget<FakeEvent>>,
    clock: Cell<DeterministicClock>,
    reads: RefCell<VecDeque<PendingDrop<FakeFile>>>,
    dragging: Cell<bool>,
    recorder: Recorder,
}

impl Shared {
    fn now(&self) -> Duration {
        self.clock.get().now()
    }

    fn dispatch<R>(&self, f: impl FnOnce(&mut PasteDropTarget<FakeEvent>) -> R) -> R {
        let result = f(&mut *self.target.borrow_mut());
        let dragging = self.target.borrow().is_dragging();
        if self.dragging.replace(dragging) != dragging {
            self.recorder.record(Call::DragChange(dragging));
        }
        result
    }
}

/// A paste/drop target mounted on fake DOM nodes.
pub struct FakeWidget {
    shared: Rc<Shared>,
    listeners: ListenerRegistry<FakeTarget>,
}

impl FakeWidget {
    /// A widget whose callbacks all log into `recorder`.
    pub fn new(config: PasteDropConfig, recorder: &Recorder) -> Self {
        let target = PasteDropTarget::new(config)
            .on_text(recorder.text_callback())
            .on_error(recorder.error_callback());
        Self {
            shared: Rc::new(Shared {
                target: RefCell::new(target),
                clock: Cell::new(DeterministicClock::new()),
                reads: RefCell::new(VecDeque::new()),
                dragging: Cell::new(false),
                recorder: recorder.clone(),
            }),
            listeners: ListenerRegistry::new(),
        }
    }

    /// The underlying pipeline, e.g. to swap callbacks.
    pub fn target(&self) -> RefMut<'_, PasteDropTarget<FakeEvent>> {
        self.shared.target.borrow_mut()
    }

    /// Attach listeners. Returns how many bindings were added; zero when
    /// already mounted.
    pub fn mount(&mut self, document: &FakeTarget, container: &FakeTarget) -> usize {
        if !self.listeners.is_empty() {
            return 0;
        }
        let paste: FakeListener = {
            let shared = Rc::clone(&self.shared);
            Rc::new(move |event: &FakeEvent| -> Result<(), IngestError> {
                shared.dispatch(|t| t.handle_paste(event)).map(|_| ())
            })
        };
        let drag: FakeListener = {
            let shared = Rc::clone(&self.shared);
            Rc::new(move |event: &FakeEvent| -> Result<(), IngestError> {
                let now = shared.now();
                match event.kind() {
                    "dragenter" => {
                        shared.dispatch(|t| t.handle_drag_enter(event, now));
                    }
                    "dragover" => {
                        shared.dispatch(|t| t.handle_drag_over(event, now));
                    }
                    "dragleave" => {
                        shared.dispatch(|t| t.handle_drag_leave(event, now));
                    }
                    "drop" => {
                        if let Some(pending) = shared.dispatch(|t| t.handle_drop(event)) {
                            shared.reads.borrow_mut().push_back(pending);
                        }
                    }
                    _ => {}
                }
                Ok(())
            })
        };
        let paste = Rc::new(paste);
        let drag = Rc::new(drag);
        self.listeners.bind(document, "paste", &paste, true)
            + self.listeners.bind(container, DRAG_EVENTS, &drag, true)
    }

    /// Detach every listener. Returns how many were removed.
    pub fn unmount(&mut self) -> usize {
        self.listeners.unbind_all()
    }

    pub fn binding_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_dragging(&self) -> bool {
        self.shared.dragging.get()
    }

    pub fn now(&self) -> Duration {
        self.shared.now()
    }

    /// Advance the clock by `dt` and fire a drag release that became due.
    pub fn advance(&self, dt: Duration) {
        self.step(|clock| clock.advance(dt));
    }

    /// Jump the clock to `now` and fire a drag release that became due.
    pub fn set_time(&self, now: Duration) {
        self.step(|clock| clock.set(now));
    }

    fn step(&self, f: impl FnOnce(&mut DeterministicClock)) {
        let mut clock = self.shared.clock.get();
        f(&mut clock);
        self.shared.clock.set(clock);
        let now = clock.now();
        self.shared.dispatch(|t| t.poll(now));
    }

    /// File reads still outstanding.
    pub fn pending_reads(&self) -> usize {
        self.shared.reads.borrow().len()
    }

    /// Complete every outstanding file read with the file's contents, in
    /// drop order. Each result is what the read's `load` handler produced.
    pub fn finish_reads(&self) -> Vec<Result<DropDelivery, IngestError>> {
        let mut results = Vec::new();
        loop {
            let Some(pending) = self.shared.reads.borrow_mut().pop_front() else {
                break;
            };
            let contents = pending.file().contents().to_string();
            let load = FakeEvent::load();
            results.push(
                self.shared
                    .dispatch(|t| t.complete_drop(pending, &load, &contents)),
            );
        }
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    #[test]
    fn mount_binds_five_listeners() {
        let document = FakeTarget::new("document");
        let container = FakeTarget::new("div");
        let mut widget = FakeWidget::new(PasteDropConfig::default(), &Recorder::new());
        assert_eq!(widget.mount(&document, &container), 5);
        assert_eq!(document.listeners_for("paste"), 1);
        assert_eq!(container.listener_count(), 4);
        assert_eq!(widget.mount(&document, &container), 0);
        assert_eq!(widget.unmount(), 5);
        assert_eq!(document.listener_count() + container.listener_count(), 0);
    }

    #[test]
    fn every_listener_is_bound_for_capture() {
        let document = FakeTarget::new("document");
        let container = FakeTarget::new("div");
        let mut widget = FakeWidget::new(PasteDropConfig::default(), &Recorder::new());
        widget.mount(&document, &container);

        let bindings: Vec<(&str, &str, bool)> = widget
            .listeners
            .bindings()
            .iter()
            .map(|b| (b.target().name(), b.event(), b.capture()))
            .collect();
        assert_eq!(
            bindings,
            vec![
                ("document", "paste", true),
                ("div", "dragenter", true),
                ("div", "dragover", true),
                ("div", "dragleave", true),
                ("div", "drop", true),
            ]
        );
    }

    #[test]
    fn advance_moves_the_clock() {
        let widget = FakeWidget::new(PasteDropConfig::default(), &Recorder::new());
        widget.advance(Duration::from_millis(7));
        widget.advance(Duration::from_millis(3));
        assert_eq!(widget.now(), Duration::from_millis(10));
        widget.set_time(Duration::from_secs(2));
        assert_eq!(widget.now(), Duration::from_secs(2));
    }
}
