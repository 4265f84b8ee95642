//! Outbound interaction messages and the evaluation call convention.
//!
//! When the user interacts with an event-bearing node, the generated callback
//! builds one [`OutboundMessage`] and hands it to the round-trip driver. The
//! driver serializes it to JSON and embeds it in a single expression-
//! evaluation call of the form:
//!
//! ```text
//! recv({"identifier":"cb1","event":{"target.value":"hey"}})
//! ```
//!
//! The interpreter's receive function looks up the correlation identifier,
//! runs the matching application logic, and returns the next serialized tree.
//!
//! # The `"target.value"` key is load-bearing
//!
//! The interpreter indexes the event payload with the literal string
//! `"target.value"` (the flattened path of the native event field). Renaming
//! it is a wire-protocol break, so it lives here as a `serde` rename on a
//! typed struct rather than as a stringly-built map.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The flattened snapshot of the native event that fired.
///
/// This is the host-internal representation. It is deliberately minimal: the
/// protocol only needs enough to reconstruct intent on the interpreter side,
/// and for input-like events that is the current field value. Events with no
/// meaningful value (e.g. a form submit) carry `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventSnapshot {
    /// The current value of the event's target field, when it has one.
    pub target_value: Option<String>,
}

impl EventSnapshot {
    /// Snapshot of an input-like event carrying a field value.
    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            target_value: Some(value.into()),
        }
    }

    /// Snapshot of an event with no associated field value.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Converts the snapshot into its wire payload.
    pub fn to_payload(&self) -> EventPayload {
        EventPayload {
            target_value: self.target_value.clone(),
        }
    }
}

/// The `event` object of an [`OutboundMessage`], in wire shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventPayload {
    /// Serializes under the fixed key `"target.value"`. Do not rename.
    #[serde(
        rename = "target.value",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub target_value: Option<String>,
}

/// One interaction, as sent to the remote interpreter.
///
/// Created synchronously inside a translator-generated callback, consumed
/// exactly once by the round-trip driver, then discarded. Never retained or
/// replayed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboundMessage {
    /// The correlation identifier copied from the tree node that declared
    /// the handler. Opaque to the host; any JSON value.
    pub identifier: Value,

    /// The flattened native-event payload.
    pub event: EventPayload,

    /// Optional host context (e.g. the current location path in multi-view
    /// setups). Omitted from the wire when absent.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub path: Option<String>,
}

/// Builds the expression that delivers `message` to the interpreter's
/// receive function.
///
/// # Errors
///
/// Returns a `serde_json::Error` if the message cannot be serialized, which
/// only happens for non-finite numbers smuggled into the identifier.
pub fn receive_call(
    receive_fn: &str,
    message: &OutboundMessage,
) -> Result<String, serde_json::Error> {
    let json = serde_json::to_string(message)?;
    Ok(format!("{receive_fn}({json})"))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
