//! The tree translator: normalized wire trees → native view trees.
//!
//! This module provides the pure half of the round trip. [`Translator`] maps
//! a [`UiNode`] to a [`ViewNode`]:
//!
//! - primitives pass through as text/number leaves;
//! - tags resolve either to a registered widget or to a native element name;
//! - data attributes are copied verbatim;
//! - every event handler (an opaque correlation identifier on the wire) is
//!   rewritten into a callback closure that captures a *clone* of the
//!   identifier taken at translation time.
//!
//! That last point is the central correctness invariant of the protocol: a
//! callback generated from one tree must always report the identifier that
//! tree declared, even if a later tree rebinds the same event to a different
//! identifier. Cloning the value into the closure (rather than sharing a
//! mutable cell) makes stale-identifier bugs unrepresentable.
//!
//! Translation has no I/O and no hidden mutable state. Translating the same
//! input twice yields structurally equal output (see the equality rules on
//! [`ViewNode`]); only the closure identities differ, and those are opaque.

pub mod registry;

use std::sync::Arc;

use thiserror::Error;
use tracing::trace;

use crate::view::{EventBinding, EventCallback, TagRef, ViewElement, ViewNode};
use crate::wire::message::{EventSnapshot, OutboundMessage};
use crate::wire::node::{UiElement, UiNode};
use registry::WidgetRegistry;

// ── Error type ────────────────────────────────────────────────────────────────

/// Errors produced during translation.
///
/// Translation failures are surfaced, never swallowed: the driver treats
/// them like a rejected evaluation (report, keep the last good tree).
#[derive(Debug, Error)]
pub enum TranslateError {
    /// The tag is written as a widget reference (uppercase initial) but no
    /// widget with that name is registered. There is no native fallback for
    /// widget references, so the whole render is aborted.
    #[error("unknown widget '{tag}'")]
    UnknownWidget { tag: String },
}

// ── Event sink ────────────────────────────────────────────────────────────────

/// Destination for the messages generated callbacks produce.
///
/// The round-trip driver implements this over its event queue; tests
/// implement it over a plain `Mutex<Vec<_>>`. `dispatch` must be cheap and
/// non-blocking; it is called synchronously from inside event callbacks.
pub trait EventSink: Send + Sync {
    /// Accepts one freshly built outbound message.
    fn dispatch(&self, message: OutboundMessage);
}

// ── Translator ────────────────────────────────────────────────────────────────

/// The pure mapping from wire trees to view trees.
///
/// A translator is a function of exactly three things: the input node, the
/// widget registry, and the event sink the generated callbacks deliver to.
/// Construct one per session and reuse it for every round trip.
pub struct Translator {
    registry: WidgetRegistry,
    sink: Arc<dyn EventSink>,
    context_path: Option<String>,
}

impl Translator {
    /// Creates a translator delivering callback messages to `sink`.
    pub fn new(registry: WidgetRegistry, sink: Arc<dyn EventSink>) -> Self {
        Self {
            registry,
            sink,
            context_path: None,
        }
    }

    /// Sets the context path stamped onto every outbound message.
    ///
    /// Multi-view hosts use this to tell the interpreter which view the
    /// interaction came from.
    pub fn with_context_path(mut self, path: impl Into<String>) -> Self {
        self.context_path = Some(path.into());
        self
    }

    /// Translates one normalized tree into a view tree.
    ///
    /// Recursion handles arbitrary depth and width; there is no fixed
    /// limit beyond the machine's stack, and UI nesting depth in practice
    /// is tiny compared to that.
    ///
    /// # Errors
    ///
    /// Returns [`TranslateError::UnknownWidget`] for an unresolvable widget
    /// reference anywhere in the tree. The error aborts the whole
    /// translation; partial trees are never returned.
    pub fn translate(&self, node: &UiNode) -> Result<ViewNode, TranslateError> {
        match node {
            UiNode::Text(s) => Ok(ViewNode::Text(s.clone())),
            UiNode::Number(n) => Ok(ViewNode::Number(*n)),
            UiNode::Element(element) => self.translate_element(element),
        }
    }

    fn translate_element(&self, element: &UiElement) -> Result<ViewNode, TranslateError> {
        let tag = self.resolve_tag(&element.tag)?;

        // Event handlers become callbacks. Each closure owns its own clone
        // of the identifier, captured right here at translation time.
        let events = element
            .handlers
            .iter()
            .map(|(event, identifier)| EventBinding {
                event: event.clone(),
                callback: self.make_callback(identifier.clone()),
            })
            .collect();

        let children = element
            .children
            .iter()
            .map(|child| self.translate(child))
            .collect::<Result<_, _>>()?;

        Ok(ViewNode::Element(ViewElement {
            tag,
            attrs: element.attrs.clone(),
            events,
            children,
        }))
    }

    /// Resolves a wire tag: widget references go through the registry,
    /// native names pass through for the view library to resolve.
    fn resolve_tag(&self, tag: &str) -> Result<TagRef, TranslateError> {
        if WidgetRegistry::is_widget_reference(tag) {
            match self.registry.resolve(tag) {
                Some(kind) => Ok(TagRef::Widget(kind)),
                None => Err(TranslateError::UnknownWidget {
                    tag: tag.to_string(),
                }),
            }
        } else {
            Ok(TagRef::Native(tag.to_string()))
        }
    }

    /// Builds the callback for one event binding.
    fn make_callback(&self, identifier: serde_json::Value) -> EventCallback {
        let sink = Arc::clone(&self.sink);
        let path = self.context_path.clone();
        Arc::new(move |snapshot: &EventSnapshot| {
            let message = OutboundMessage {
                identifier: identifier.clone(),
                event: snapshot.to_payload(),
                path: path.clone(),
            };
            trace!(identifier = %message.identifier, "interaction captured");
            sink.dispatch(message);
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
