#![forbid(unsafe_code)]

//! Deterministic test harness for astdrop.
//!
//! - [`dom`]: fake targets, events, files and clipboards implementing the
//!   core's host traits.
//! - [`widget`]: the pipeline mounted on the fake DOM, with file reads and
//!   the drag release driven explicitly by the test.
//! - [`recorder`]: an ordered log of host callbacks.
//! - [`fixtures`]: canned ESTree payloads.
//!
//! # Quick Start
//!
//! ```
//! use astdrop_harness::{FakeEvent, FakeTarget, FakeWidget, Recorder, fixtures};
//! use astdrop_core::config::PasteDropConfig;
//!
//! let recorder = Recorder::new();
//! let (document, container) = (FakeTarget::new("document"), FakeTarget::new("div"));
//! let mut widget = FakeWidget::new(PasteDropConfig::default(), &recorder);
//! widget.mount(&document, &container);
//!
//! let ast = fixtures::expression_program(fixtures::call("f", &["x"]));
//! document.dispatch(&FakeEvent::paste(&fixtures::serialize(&ast))).unwrap();
//! assert_eq!(recorder.texts()[0].1, "f(x);");
//! ```

pub mod clock;
pub mod dom;
pub mod fixtures;
pub mod recorder;
pub mod widget;

pub use clock::DeterministicClock;
pub use dom::{FakeClipboard, FakeEvent, FakeFile, FakeListener, FakeTarget};
pub use recorder::{Call, Recorder};
pub use widget::FakeWidget;

use astdrop_codegen::{GenerateOptions, json_to_code};

/// The deterministic rendering a successful conversion of `serialized` must
/// deliver under `options`.
pub fn expected_rendering(serialized: &str, options: &GenerateOptions) -> Option<String> {
    json_to_code(serialized, options).ok()
}
