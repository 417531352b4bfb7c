#![forbid(unsafe_code)]

//! Host-agnostic core of the astdrop paste/drop widget.
//!
//! A widget instance accepts a serialized JavaScript AST (ESTree JSON) pasted
//! from the clipboard or dropped as a file, renders it as source text and
//! hands the result to the host.
//!
//! - [`category`]: MIME type → category classification.
//! - [`convert`]: the serialized-AST → source contract and its ESTree implementation.
//! - [`listener`]: bind/unbind bookkeeping for DOM-style event targets.
//! - [`ingest`]: the paste and drag/drop handlers.
//! - [`event`]: the traits a host implements over its own events.
//!
//! Nothing here reads a clock or touches a DOM; hosts pass time and events in.

pub mod category;
pub mod config;
pub mod convert;
pub mod debounce;
pub mod drag;
pub mod event;
pub mod ingest;
pub mod listener;
pub mod logging;

pub use category::{CategoryDescriptor, CategoryRegistry};
pub use config::{ConfigError, PasteDropConfig};
pub use convert::{AstConverter, ConvertError, EstreeConverter};
pub use event::{ClipboardData, DragEvent, DropEffect, DroppedFile, IngestEvent, Origin, PasteEvent};
pub use ingest::{DropDelivery, IngestError, PasteDropTarget, PasteOutcome, PendingDrop};
pub use listener::{EventTarget, ListenerBinding, ListenerRegistry};
