//! The three ports the round-trip driver is built against.
//!
//! Each port models one external collaborator of the protocol core:
//!
//! - [`RemoteEnvironment`]: the sandboxed interpreter holding application
//!   state and logic. Reachable only through three asynchronous calls, each
//!   settling exactly once.
//! - [`ViewBackend`]: the native view library owning the display surface.
//! - [`SourceFetcher`]: boot-time retrieval of the program source text.
//!
//! Production implementations live in the infrastructure layer; tests
//! substitute scripted stubs. The driver cannot tell the difference, which
//! is the point.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use remoteview_core::ViewNode;

// ── Remote environment ────────────────────────────────────────────────────────

/// Errors surfaced by a [`RemoteEnvironment`].
#[derive(Debug, Error)]
pub enum RemoteError {
    /// The environment never became ready, or went away mid-session.
    #[error("remote environment unavailable: {0}")]
    Unavailable(String),

    /// Executing the program source raised in the interpreter.
    #[error("source execution failed: {0}")]
    ExecFailed(String),

    /// An evaluation settled with a rejection.
    ///
    /// The payload is the remote error rendered to a string and carried
    /// verbatim. Rejections are never JSON-decoded: only successful
    /// evaluation results carry a serialized tree.
    #[error("evaluation rejected: {0}")]
    Rejected(String),
}

/// The sandboxed interpreter that owns application state and logic.
///
/// Every call is asynchronous and settles exactly once, resolved with a
/// value or rejected with an error. The driver guarantees it never issues a
/// second `eval` before the previous one settled; implementations may rely
/// on that.
#[async_trait]
pub trait RemoteEnvironment: Send + Sync {
    /// Resolves once the environment is initialized and able to execute.
    async fn ready(&self) -> Result<(), RemoteError>;

    /// Executes program source text for its side effects.
    ///
    /// Called exactly once per session, between readiness and the first
    /// evaluation.
    async fn exec(&self, source: &str) -> Result<(), RemoteError>;

    /// Evaluates a single expression and returns its JSON-decoded result.
    ///
    /// Successful results are the next serialized tree; implementations
    /// JSON-decode them. Rejections come back as [`RemoteError::Rejected`]
    /// with the raw error text, undecoded.
    async fn eval(&self, expr: &str) -> Result<Value, RemoteError>;
}

// ── View backend ──────────────────────────────────────────────────────────────

/// Errors surfaced by a [`ViewBackend`].
#[derive(Debug, Error)]
pub enum ViewError {
    /// A native tag name the backend cannot materialize.
    #[error("invalid native tag '{tag}'")]
    InvalidTag { tag: String },

    /// An operation that requires a mounted tree ran before `mount`.
    #[error("no tree is mounted")]
    NotMounted,

    /// There is no node at the addressed position.
    #[error("no node at path {path:?}")]
    NodeNotFound { path: Vec<usize> },

    /// The addressed node has no handler for the fired event.
    #[error("node at {path:?} has no '{event}' handler")]
    NoHandler { path: Vec<usize>, event: String },
}

/// The native view library owning the display surface.
///
/// A backend is an explicitly owned handle: each session holds its own, so
/// several independent sessions can coexist in one process. Whether `apply`
/// replaces the whole displayed tree or computes a patch against the
/// previous one is the backend's business; the contract is only that after
/// a successful `apply` the display reflects exactly the given tree.
pub trait ViewBackend: Send {
    /// Initial mount of the first translated tree.
    fn mount(&mut self, tree: ViewNode) -> Result<(), ViewError>;

    /// Replaces (or patches) the displayed tree with `tree`.
    fn apply(&mut self, tree: ViewNode) -> Result<(), ViewError>;

    /// The currently displayed tree, if one is mounted.
    fn current(&self) -> Option<&ViewNode>;
}

// ── Source fetcher ────────────────────────────────────────────────────────────

/// Errors surfaced by a [`SourceFetcher`].
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport-level failure (connection refused, DNS, TLS, ...).
    #[error("fetch failed: {0}")]
    Http(String),

    /// The server answered with a non-success status.
    #[error("fetch of '{url}' returned status {code}")]
    Status { code: u16, url: String },

    /// The response body could not be read as text.
    #[error("failed to read source body: {0}")]
    Io(String),
}

/// Boot-time retrieval of the remote program's source text.
#[async_trait]
pub trait SourceFetcher: Send + Sync {
    /// Fetches the source text at `url`.
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}
