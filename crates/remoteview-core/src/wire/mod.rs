//! The JSON wire protocol between the host and the remote interpreter.
//!
//! Two message families exist, one per direction:
//!
//! - **Interpreter → Host**: a serialized UI tree. See [`node`].
//! - **Host → Interpreter**: an interaction message. See [`message`].
//!
//! Everything on the wire is plain JSON. The interpreter side typically
//! produces and consumes it with its own standard library, so the schemas
//! here are deliberately boring: objects, arrays, strings, numbers.

pub mod message;
pub mod node;
