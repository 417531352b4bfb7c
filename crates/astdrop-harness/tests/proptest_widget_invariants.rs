//! Property-based invariants of the mounted widget.
//!
//! 1. Any mount/unmount sequence ending unmounted leaves no listener behind,
//!    and removals match additions one for one.
//! 2. While every `dragleave` is answered by `dragenter` or `dragover`
//!    within the debounce window, the indicator never turns off.
//! 3. Pasting any serialized AST delivers exactly its rendering, once.
//! 4. Pasting arbitrary text never delivers anything but the rendering of
//!    a valid AST, and a failure is both reported and re-raised.

use std::time::Duration;

use astdrop_codegen::GenerateOptions;
use astdrop_core::config::PasteDropConfig;
use astdrop_core::event::Origin;
use astdrop_harness::{FakeEvent, FakeTarget, FakeWidget, Recorder, expected_rendering, fixtures};
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

fn identifier() -> impl Strategy<Value = String> {
    "[a-z_][a-zA-Z0-9_]{0,8}"
}

#[derive(Debug, Clone, Copy)]
enum Answer {
    Enter,
    Over,
}

fn answer() -> impl Strategy<Value = Answer> {
    prop_oneof![Just(Answer::Enter), Just(Answer::Over)]
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Listener parity
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn mount_unmount_sequences_leave_nothing(ops in prop::collection::vec(any::<bool>(), 0..20)) {
        let document = FakeTarget::new("document");
        let container = FakeTarget::new("div");
        let mut widget = FakeWidget::new(PasteDropConfig::default(), &Recorder::new());

        for mount in ops {
            if mount {
                widget.mount(&document, &container);
            } else {
                widget.unmount();
            }
            prop_assert!(widget.binding_count() == 0 || widget.binding_count() == 5);
        }
        widget.unmount();

        prop_assert_eq!(document.listener_count() + container.listener_count(), 0);
        prop_assert_eq!(document.add_count(), document.remove_count());
        prop_assert_eq!(container.add_count(), container.remove_count());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Drag debounce
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn answered_leaves_never_release(
        steps in prop::collection::vec((0u64..50, answer(), 0u64..200), 1..20),
    ) {
        let recorder = Recorder::new();
        let document = FakeTarget::new("document");
        let container = FakeTarget::new("div");
        let mut widget = FakeWidget::new(PasteDropConfig::default(), &recorder);
        widget.mount(&document, &container);

        container.dispatch(&FakeEvent::new("dragenter")).unwrap();
        for (gap, answer, dwell) in steps {
            container.dispatch(&FakeEvent::new("dragleave")).unwrap();
            widget.advance(Duration::from_millis(gap));
            let kind = match answer {
                Answer::Enter => "dragenter",
                Answer::Over => "dragover",
            };
            container.dispatch(&FakeEvent::new(kind)).unwrap();
            widget.advance(Duration::from_millis(dwell));
            prop_assert!(widget.is_dragging());
        }
        prop_assert_eq!(recorder.drag_changes(), vec![true]);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3–4. Paste delivery
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn pasted_ast_is_delivered_once(callee in identifier(), args in prop::collection::vec(identifier(), 0..4)) {
        let recorder = Recorder::new();
        let document = FakeTarget::new("document");
        let mut widget = FakeWidget::new(PasteDropConfig::default(), &recorder);
        widget.mount(&document, &FakeTarget::new("div"));

        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        let ast = fixtures::serialize(&fixtures::expression_program(fixtures::call(&callee, &args)));
        let event = FakeEvent::paste(&ast);
        prop_assert!(document.dispatch(&event).is_ok());

        let expected = format!("{callee}({});", args.join(", "));
        prop_assert_eq!(recorder.texts(), vec![(Origin::Paste, expected, None)]);
        prop_assert!(event.default_prevented());
    }

    #[test]
    fn arbitrary_paste_is_delivered_or_reported(text in "\\PC{0,40}") {
        let recorder = Recorder::new();
        let document = FakeTarget::new("document");
        let mut widget = FakeWidget::new(PasteDropConfig::default(), &recorder);
        widget.mount(&document, &FakeTarget::new("div"));

        let result = document.dispatch(&FakeEvent::paste(&text));

        match expected_rendering(&text, &GenerateOptions::default()) {
            Some(code) => {
                prop_assert!(result.is_ok());
                prop_assert_eq!(recorder.texts(), vec![(Origin::Paste, code, None)]);
                prop_assert!(recorder.errors().is_empty());
            }
            None => {
                prop_assert!(result.is_err());
                prop_assert!(recorder.texts().is_empty());
                prop_assert_eq!(recorder.errors().len(), 1);
            }
        }
    }
}
