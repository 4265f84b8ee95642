//! # remoteview-core
//!
//! Shared library for RemoteView containing the JSON wire model and the tree
//! translator.
//!
//! RemoteView renders a user interface whose state and logic live in a remote,
//! sandboxed interpreter. The interpreter describes the UI as a JSON tree; the
//! host (see the `remoteview-host` crate) materializes that tree as a native
//! view, watches for user interactions, and forwards each interaction back to
//! the interpreter as a JSON message. The interpreter answers with the next
//! tree, and the cycle repeats.
//!
//! This crate is the protocol half of that story. It defines:
//!
//! - **`wire`** – What travels between host and interpreter. Incoming trees
//!   are normalized into [`UiNode`] (two accepted JSON shapes, one semantic
//!   model); outgoing interactions are [`OutboundMessage`] values with a
//!   fixed JSON schema the interpreter depends on.
//!
//! - **`translate`** – The pure mapping from a [`UiNode`] to a [`ViewNode`],
//!   the host-side view-tree representation. Data fields are copied verbatim;
//!   event fields are rewritten into callback closures that capture the
//!   correlation identifier the interpreter chose for that handler.
//!
//! - **`view`** – The [`ViewNode`] tree itself, shaped so a view backend can
//!   walk it and hand it to whatever rendering primitive it wraps.
//!
//! This crate has zero dependencies on async runtimes, sockets, or UI
//! frameworks, which keeps the translation logic trivially unit-testable.

pub mod translate;
pub mod view;
pub mod wire;

// Re-export the most-used types at the crate root so callers can write
// `remoteview_core::UiNode` instead of `remoteview_core::wire::node::UiNode`.
pub use translate::registry::{WidgetKind, WidgetRegistry};
pub use translate::{EventSink, TranslateError, Translator};
pub use view::{EventBinding, EventCallback, TagRef, ViewElement, ViewNode};
pub use wire::message::{receive_call, EventPayload, EventSnapshot, OutboundMessage};
pub use wire::node::{UiElement, UiNode, WireError};
