#![forbid(unsafe_code)]

//! The paste/drop ingestion pipeline.
//!
//! [`PasteDropTarget`] turns host events into `(source text, category)` pairs
//! delivered to the host's text callback, or into failures delivered to its
//! error callback.
//!
//! # Outcomes
//!
//! | Input | Conversion | Result |
//! |-------|------------|--------|
//! | paste, no clipboard access | - | no-op |
//! | paste, no `text/plain` or no text callback | - | no-op |
//! | paste | ok | `on_text("paste", code)`, default suppressed |
//! | paste into a text input | fails | no-op, default kept |
//! | paste elsewhere | fails | `on_error`, then `Err` |
//! | drop, no file / unknown type / no text callback | - | no-op, default kept |
//! | drop `JSON` or `TEXT` | ok | `on_text("drop", code, "javascript")` |
//! | drop `JSON` | fails | `on_error`, then `Err` |
//! | drop `TEXT` | fails | `on_text("drop", raw, None)` |
//! | drop other category | - | `on_text("drop", raw, category)` |
//!
//! Returning `Err` is how a reported failure keeps propagating: the host
//! turns it into whatever its runtime treats as an unhandled error.
//!
//! # Asynchronous drops
//!
//! Reading a dropped file is the host's job. [`handle_drop`] returns a
//! [`PendingDrop`] naming the file to read; once the contents are available
//! the host calls [`complete_drop`] with them.
//!
//! [`handle_drop`]: PasteDropTarget::handle_drop
//! [`complete_drop`]: PasteDropTarget::complete_drop

use std::borrow::Cow;

use core::time::Duration;

use crate::category::{self, CategoryRegistry};
use crate::config::PasteDropConfig;
use crate::convert::{AstConverter, ConvertError, EstreeConverter};
use crate::drag::DragState;
use crate::event::{ClipboardData, DragEvent, DropEffect, DroppedFile, Origin, PasteEvent};
use crate::logging::{debug, debug_span, trace, warn};

/// Message prefix reported for a failed paste.
pub const PASTE_ERROR_PREFIX: &str = "Cannot process pasted AST: ";
/// Message prefix reported for a failed `JSON` drop.
pub const DROP_ERROR_PREFIX: &str = "Unable to handle dropped file: ";

const PLAIN_TEXT: &str = "text/plain";

/// `on_text(origin, event, text, category)`.
pub type TextCallback<E> = Box<dyn FnMut(Origin, &E, &str, Option<&str>)>;
/// `on_error(origin, event, message)`.
pub type ErrorCallback<E> = Box<dyn FnMut(Origin, &E, &str)>;

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// What a paste event amounted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasteOutcome {
    /// The event carries no clipboard.
    Unsupported,
    /// No plain text on the clipboard, or no text callback.
    Ignored,
    /// Converted and delivered.
    Delivered,
    /// Conversion failed on a text input; the paste proceeds as plain text.
    LeftToTextInput,
}

/// Which category a completed drop was delivered under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropDelivery {
    /// Converted source under [`category::JAVASCRIPT`].
    Converted,
    /// `TEXT` that failed to convert, delivered raw with no category.
    RawFallback,
    /// Non-convertible content delivered raw under its own category.
    Raw(String),
}

/// A drop waiting for the host to read its file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDrop<F> {
    file: F,
    category: String,
}

impl<F> PendingDrop<F> {
    pub fn file(&self) -> &F {
        &self.file
    }

    /// Category the file's MIME type classified as.
    pub fn category(&self) -> &str {
        &self.category
    }
}

/// A conversion failure that was reported to the host and must keep propagating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestError {
    origin: Origin,
    message: String,
    cause: ConvertError,
}

impl IngestError {
    fn new(origin: Origin, prefix: &str, cause: ConvertError) -> Self {
        Self {
            origin,
            message: format!("{prefix}{}", cause.message()),
            cause,
        }
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }

    /// Exactly the text passed to the error callback.
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn cause(&self) -> &ConvertError {
        &self.cause
    }
}

impl std::fmt::Display for IngestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for IngestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.cause)
    }
}

fn noop_error<E: 'static>() -> ErrorCallback<E> {
    Box::new(|_, _, _| {})
}

// ---------------------------------------------------------------------------
// PasteDropTarget
// ---------------------------------------------------------------------------

/// One widget's ingestion state: callbacks, classification, conversion and
/// the drag indicator.
pub struct PasteDropTarget<E, C = EstreeConverter> {
    config: PasteDropConfig,
    converter: C,
    registry: Cow<'static, CategoryRegistry>,
    on_text: Option<TextCallback<E>>,
    on_error: ErrorCallback<E>,
    drag: DragState,
}

impl<E: 'static> PasteDropTarget<E, EstreeConverter> {
    /// A target converting ESTree JSON with the config's formatting options.
    #[must_use]
    pub fn new(config: PasteDropConfig) -> Self {
        let converter = EstreeConverter::new(config.generate_options());
        Self::with_converter(config, converter)
    }
}

impl<E: 'static> Default for PasteDropTarget<E, EstreeConverter> {
    fn default() -> Self {
        Self::new(PasteDropConfig::default())
    }
}

impl<E: 'static, C: AstConverter> PasteDropTarget<E, C> {
    pub fn with_converter(config: PasteDropConfig, converter: C) -> Self {
        let global = CategoryRegistry::global();
        let registry = if config.categories.is_empty() {
            Cow::Borrowed(global)
        } else {
            Cow::Owned(global.extended(config.categories.iter().cloned()))
        };
        Self {
            drag: DragState::new(config.drag_leave_delay()),
            config,
            converter,
            registry,
            on_text: None,
            on_error: noop_error(),
        }
    }

    /// Classify with `registry` instead of the global one.
    #[must_use]
    pub fn with_registry(mut self, registry: CategoryRegistry) -> Self {
        self.registry = Cow::Owned(registry);
        self
    }

    #[must_use]
    pub fn on_text(mut self, f: impl FnMut(Origin, &E, &str, Option<&str>) + 'static) -> Self {
        self.set_on_text(f);
        self
    }

    #[must_use]
    pub fn on_error(mut self, f: impl FnMut(Origin, &E, &str) + 'static) -> Self {
        self.set_on_error(f);
        self
    }

    pub fn set_on_text(&mut self, f: impl FnMut(Origin, &E, &str, Option<&str>) + 'static) {
        self.on_text = Some(Box::new(f));
    }

    /// Without a text callback paste and drop are left to the host.
    pub fn clear_on_text(&mut self) {
        self.on_text = None;
    }

    pub fn set_on_error(&mut self, f: impl FnMut(Origin, &E, &str) + 'static) {
        self.on_error = Box::new(f);
    }

    /// Restore the no-op error callback.
    pub fn clear_on_error(&mut self) {
        self.on_error = noop_error();
    }

    pub fn has_text_callback(&self) -> bool {
        self.on_text.is_some()
    }

    pub fn config(&self) -> &PasteDropConfig {
        &self.config
    }

    pub fn registry(&self) -> &CategoryRegistry {
        &self.registry
    }

    pub fn converter(&self) -> &C {
        &self.converter
    }

    /// Whether the drop indicator should be shown.
    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    pub fn drag_state(&self) -> &DragState {
        &self.drag
    }

    /// Apply a drag release that is due at `now`. Returns whether dragging ended.
    pub fn poll(&mut self, now: Duration) -> bool {
        self.drag.poll(now)
    }

    /// Apply a pending drag release immediately (the host's timer fired).
    pub fn release_drag(&mut self) -> bool {
        self.drag.release()
    }

    fn deliver(&mut self, origin: Origin, event: &E, text: &str, category: Option<&str>) {
        if let Some(on_text) = self.on_text.as_mut() {
            on_text(origin, event, text, category);
        }
    }

    fn report(&mut self, origin: Origin, event: &E, prefix: &str, cause: ConvertError) -> IngestError {
        let err = IngestError::new(origin, prefix, cause);
        warn!(%origin, message = err.message(), "conversion failed");
        (self.on_error)(origin, event, err.message());
        err
    }
}

impl<E: PasteEvent + 'static, C: AstConverter> PasteDropTarget<E, C> {
    /// Handle a clipboard paste.
    pub fn handle_paste(&mut self, event: &E) -> Result<PasteOutcome, IngestError> {
        let span = debug_span!("paste");
        let _guard = span.enter();

        let Some(clipboard) = event.clipboard_data() else {
            return Ok(PasteOutcome::Unsupported);
        };
        if !clipboard.has_type(PLAIN_TEXT) || !self.has_text_callback() {
            return Ok(PasteOutcome::Ignored);
        }
        let Some(text) = clipboard.get_data(PLAIN_TEXT) else {
            return Ok(PasteOutcome::Ignored);
        };

        match self.converter.convert(&text) {
            Ok(code) => {
                event.stop_propagation();
                event.prevent_default();
                self.deliver(Origin::Paste, event, &code, None);
                Ok(PasteOutcome::Delivered)
            }
            Err(cause) => {
                let node = event.target_node_name();
                if node.as_deref().is_some_and(|n| self.config.is_text_input(n)) {
                    debug!(node = ?node, cause = %cause, "paste left to text input");
                    return Ok(PasteOutcome::LeftToTextInput);
                }
                Err(self.report(Origin::Paste, event, PASTE_ERROR_PREFIX, cause))
            }
        }
    }
}

impl<E: DragEvent + 'static, C: AstConverter> PasteDropTarget<E, C> {
    /// `dragenter`: show the indicator and discard any pending release.
    pub fn handle_drag_enter(&mut self, event: &E, now: Duration) -> bool {
        let released = self.drag.poll(now);
        event.prevent_default();
        self.drag.enter() || released
    }

    /// `dragover`: keep dragging and advertise a copy.
    pub fn handle_drag_over(&mut self, event: &E, now: Duration) -> bool {
        let released = self.drag.poll(now);
        self.drag.over();
        event.prevent_default();
        event.set_drop_effect(DropEffect::Copy);
        released
    }

    /// `dragleave`: release the indicator after the configured delay.
    pub fn handle_drag_leave(&mut self, _event: &E, now: Duration) -> bool {
        let released = self.drag.poll(now);
        self.drag.leave(now);
        released
    }

    /// `drop`: end dragging and classify the first file.
    ///
    /// Returns `None`, leaving the event's default alone, when there is no
    /// file, its type is not registered, or no text callback is set.
    pub fn handle_drop(&mut self, event: &E) -> Option<PendingDrop<E::File>> {
        self.drag.drop_received();
        let file = event.first_file()?;
        let mime = file.mime_type();
        let Some(category) = self.registry.classify(&mime) else {
            trace!(mime = mime.as_str(), "dropped file type not registered");
            return None;
        };
        let category = category.to_string();
        if !self.has_text_callback() {
            return None;
        }
        event.prevent_default();
        event.stop_propagation();
        debug!(mime = mime.as_str(), category = category.as_str(), "reading dropped file");
        Some(PendingDrop { file, category })
    }

    /// Finish a drop once the host has read the file as `text`.
    ///
    /// `event` is whatever the host's read completion produced; it is passed
    /// through to the callbacks.
    pub fn complete_drop<F>(
        &mut self,
        pending: PendingDrop<F>,
        event: &E,
        text: &str,
    ) -> Result<DropDelivery, IngestError> {
        let span = debug_span!("drop", category = pending.category.as_str());
        let _guard = span.enter();

        let declared = pending.category;
        if !category::is_convertible(&declared) {
            self.deliver(Origin::Drop, event, text, Some(&declared));
            return Ok(DropDelivery::Raw(declared));
        }

        match self.converter.convert(text) {
            Ok(code) => {
                self.deliver(Origin::Drop, event, &code, Some(category::JAVASCRIPT));
                Ok(DropDelivery::Converted)
            }
            Err(cause) if declared == category::JSON => {
                Err(self.report(Origin::Drop, event, DROP_ERROR_PREFIX, cause))
            }
            Err(cause) => {
                debug!(cause = %cause, "dropped text is not an AST, delivering raw");
                self.deliver(Origin::Drop, event, text, None);
                Ok(DropDelivery::RawFallback)
            }
        }
    }
}

impl<E, C: std::fmt::Debug> std::fmt::Debug for PasteDropTarget<E, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasteDropTarget")
            .field("config", &self.config)
            .field("converter", &self.converter)
            .field("registry_entries", &self.registry.len())
            .field("has_text_callback", &self.on_text.is_some())
            .field("drag", &self.drag)
            .finish()
    }
}
