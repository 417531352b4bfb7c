#![forbid(unsafe_code)]

//! Browser binding for astdrop.
//!
//! Exports `PasteDropWidget` to JavaScript: construct it with an options
//! object, register `onText`/`onError`, then `mount(container)`. Pastes are
//! captured document-wide; drags and drops are handled on the container.
//! Every listener runs in the capture phase.
//!
//! ```js
//! const widget = new PasteDropWidget({ dragLeaveDelayMs: 50 });
//! widget.onText((origin, event, text, category) => editor.setValue(text));
//! widget.onDragChange((dragging) => overlay.hidden = !dragging);
//! widget.mount(document.getElementById("editor"));
//! ```
//!
//! Native builds compile the widget as a stub so the workspace checks and
//! tests on non-wasm targets.

use core::time::Duration;

use astdrop_core::config::{ConfigError, PasteDropConfig};

#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::PasteDropWidget;

/// Config from an optional JSON options string; absent means defaults.
pub fn parse_options(json: Option<&str>) -> Result<PasteDropConfig, ConfigError> {
    match json {
        Some(json) if !json.trim().is_empty() => PasteDropConfig::from_json(json),
        _ => Ok(PasteDropConfig::default()),
    }
}

/// `performance.now()` milliseconds as host time. Non-finite or negative
/// readings clamp to zero.
#[must_use]
pub fn host_time(millis: f64) -> Duration {
    if millis.is_finite() && millis > 0.0 {
        Duration::from_secs_f64(millis / 1000.0)
    } else {
        Duration::ZERO
    }
}

/// `setTimeout` delay for `delay`, saturating at `i32::MAX`.
#[must_use]
pub fn timeout_millis(delay: Duration) -> i32 {
    i32::try_from(delay.as_millis()).unwrap_or(i32::MAX)
}

/// Native builds compile this crate as a stub so `cargo check --workspace` stays
/// green on non-wasm targets.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default)]
pub struct PasteDropWidget {
    config: PasteDropConfig,
}

#[cfg(not(target_arch = "wasm32"))]
impl PasteDropWidget {
    pub fn new(options: Option<&str>) -> Result<Self, ConfigError> {
        Ok(Self {
            config: parse_options(options)?,
        })
    }

    pub fn config(&self) -> &PasteDropConfig {
        &self.config
    }
}
