#![forbid(unsafe_code)]

//! Host event abstraction.
//!
//! The pipeline never touches a real DOM. A host (the browser binding, or the
//! fakes in the test harness) implements these traits over its own event,
//! clipboard and file handles. Every method takes `&self`: host handles are
//! shared references whose mutators are interior, as in the DOM.

use serde::{Deserialize, Serialize};

/// Which input path produced a result or failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    Paste,
    Drop,
}

impl Origin {
    /// The tag passed to host callbacks.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Paste => "paste",
            Self::Drop => "drop",
        }
    }
}

impl std::fmt::Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value written to `dataTransfer.dropEffect`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DropEffect {
    #[default]
    None,
    Copy,
    Link,
    Move,
}

impl DropEffect {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Copy => "copy",
            Self::Link => "link",
            Self::Move => "move",
        }
    }
}

/// Operations common to every event the pipeline handles.
pub trait IngestEvent {
    /// Suppress the host's default handling.
    fn prevent_default(&self);
    /// Stop the event reaching further listeners.
    fn stop_propagation(&self);
}

/// Clipboard payload of a paste event.
pub trait ClipboardData {
    /// MIME types available on the clipboard, in host order.
    fn types(&self) -> Vec<String>;

    /// Content for `mime`, `None` if the host cannot provide it.
    fn get_data(&self, mime: &str) -> Option<String>;

    fn has_type(&self, mime: &str) -> bool {
        self.types().iter().any(|t| t == mime)
    }
}

/// A clipboard paste.
pub trait PasteEvent: IngestEvent {
    type Clipboard: ClipboardData;

    /// `None` when the host has no clipboard access for this event.
    fn clipboard_data(&self) -> Option<Self::Clipboard>;

    /// Node name of the element the paste targets (`"TEXTAREA"`, `"DIV"`, ...).
    fn target_node_name(&self) -> Option<String>;
}

/// A file dropped onto the widget.
pub trait DroppedFile {
    /// Declared MIME type; empty when the host does not know it.
    fn mime_type(&self) -> String;
}

/// A drag lifecycle event (`dragenter`, `dragover`, `dragleave`, `drop`).
pub trait DragEvent: IngestEvent {
    type File: DroppedFile;

    /// First file of the drop payload, if any.
    fn first_file(&self) -> Option<Self::File>;

    fn set_drop_effect(&self, effect: DropEffect);
}
