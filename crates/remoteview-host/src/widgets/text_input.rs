//! The controlled text-input widget.
//!
//! An input's authoritative value lives in the remote program: every tree it
//! sends carries the value the field should display. But a round trip takes
//! real time, and a field that only updates after the server answers would
//! swallow fast typing. The controlled input closes that gap with a local
//! echo: each change event is committed to the widget's own value before the
//! interaction is forwarded, and each incoming tree re-synchronizes the echo
//! with the remote's authoritative value.
//!
//! The echo therefore never diverges from the authoritative value by more
//! than the keystrokes still in flight.

use remoteview_core::{EventCallback, EventSnapshot};

/// Local state of one mounted text input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ControlledInput {
    value: String,
}

impl ControlledInput {
    /// Creates an input displaying `initial`.
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            value: initial.into(),
        }
    }

    /// The value currently displayed.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Adopts the authoritative value from a freshly applied tree.
    pub fn sync_from_props(&mut self, value: &str) {
        if self.value != value {
            self.value = value.to_string();
        }
    }

    /// Handles one change event: commit the local echo, then forward.
    ///
    /// The commit happens first so the field already shows the new text
    /// while the round trip is in flight.
    pub fn change(&mut self, snapshot: &EventSnapshot, handler: &EventCallback) {
        if let Some(value) = &snapshot.target_value {
            self.value = value.clone();
        }
        handler(snapshot);
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
