//! The round-trip driver: boot, initial render, and the interaction loop.
//!
//! One driver owns one session. Its lifecycle follows the state machine in
//! [`crate::domain::state`]:
//!
//! 1. **Boot**: await remote readiness, fetch the program source, execute
//!    it exactly once. Any failure here is fatal to the session.
//! 2. **Initial render**: evaluate the entry expression, translate the
//!    returned tree, mount it.
//! 3. **Event cycle**: callbacks generated by the translator enqueue
//!    [`OutboundMessage`]s; the driver dequeues one at a time, evaluates
//!    `<receive_fn>(<json>)` remotely, translates the reply, and applies it
//!    to the view. A failed round trip is reported and the previous tree
//!    stays on screen.
//!
//! # Ordering
//!
//! Round trips are strictly sequential: evaluation *n+1* is issued only
//! after evaluation *n* settled and its tree was applied. Interactions that
//! arrive while a round trip is in flight wait in the event queue and are
//! replayed in FIFO order; nothing is dropped. The queue is the unbounded
//! channel between the translator's callbacks and this driver; sequentiality
//! falls out of the driver being the channel's only consumer.
//!
//! # Timeouts
//!
//! The remote environment offers no cancellation, so every evaluation is
//! wrapped in a timeout. A timed-out evaluation is reported like a rejection
//! and the driver returns to idle; the remote call itself runs to settlement
//! on its own schedule and its eventual result is discarded.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::time::timeout;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use remoteview_core::{
    receive_call, EventSink, OutboundMessage, TranslateError, Translator, UiNode, ViewNode,
    WidgetRegistry, WireError,
};

use crate::application::ports::{
    FetchError, RemoteEnvironment, RemoteError, SourceFetcher, ViewBackend, ViewError,
};
use crate::domain::{DriverState, SessionConfig};

// ── Error type ────────────────────────────────────────────────────────────────

/// Everything that can go wrong inside the driver.
///
/// Variants wrap the port and protocol error types so callers can match on
/// the failing stage; `Display` renders a self-contained message either way.
#[derive(Debug, Error)]
pub enum DriverError {
    /// An operation was called in the wrong lifecycle state.
    #[error("session is in state {actual:?}, expected {expected:?}")]
    InvalidState {
        actual: DriverState,
        expected: DriverState,
    },

    #[error("remote environment error: {0}")]
    Remote(#[from] RemoteError),

    #[error("source fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("malformed tree from remote: {0}")]
    Wire(#[from] WireError),

    #[error("translation failed: {0}")]
    Translate(#[from] TranslateError),

    #[error("view backend error: {0}")]
    View(#[from] ViewError),

    #[error("message serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    /// A remote evaluation did not settle within the configured bound.
    #[error("evaluation timed out after {0:?}")]
    EvalTimeout(Duration),
}

// ── Event queue ───────────────────────────────────────────────────────────────

/// The sink behind every translator-generated callback: an unbounded channel
/// whose single consumer is the driver.
struct EventQueue {
    tx: mpsc::UnboundedSender<OutboundMessage>,
}

impl EventSink for EventQueue {
    fn dispatch(&self, message: OutboundMessage) {
        // The receiver only goes away when the driver is dropped, at which
        // point there is nobody left to act on the interaction anyway.
        if self.tx.send(message).is_err() {
            warn!("session driver gone; interaction dropped");
        }
    }
}

// ── Driver ────────────────────────────────────────────────────────────────────

/// Orchestrates one session's request/response loop.
///
/// Generic over its three ports so production and test builds differ only in
/// what gets injected at construction.
pub struct RoundTripDriver<R, V, F> {
    remote: R,
    view: V,
    fetcher: F,
    config: SessionConfig,
    translator: Translator,
    events: mpsc::UnboundedReceiver<OutboundMessage>,
    state: DriverState,
    session_id: Uuid,
}

impl<R, V, F> RoundTripDriver<R, V, F>
where
    R: RemoteEnvironment,
    V: ViewBackend,
    F: SourceFetcher,
{
    /// Creates a driver with the standard widget registry.
    pub fn new(remote: R, view: V, fetcher: F, config: SessionConfig) -> Self {
        Self::with_registry(remote, view, fetcher, config, WidgetRegistry::default())
    }

    /// Creates a driver with a custom widget registry.
    pub fn with_registry(
        remote: R,
        view: V,
        fetcher: F,
        config: SessionConfig,
        registry: WidgetRegistry,
    ) -> Self {
        let (tx, events) = mpsc::unbounded_channel();
        let sink: Arc<dyn EventSink> = Arc::new(EventQueue { tx });

        let mut translator = Translator::new(registry, sink);
        if let Some(path) = &config.context_path {
            translator = translator.with_context_path(path.clone());
        }

        Self {
            remote,
            view,
            fetcher,
            config,
            translator,
            events,
            state: DriverState::Booting,
            session_id: Uuid::new_v4(),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> DriverState {
        self.state
    }

    /// This session's identifier (log correlation only).
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// The injected view backend.
    pub fn view(&self) -> &V {
        &self.view
    }

    /// Mutable access to the view backend, for hosts that deliver native
    /// events through it.
    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    // ── Boot ──────────────────────────────────────────────────────────────────

    /// Boots the session: readiness, source fetch, source execution.
    ///
    /// # Errors
    ///
    /// Any failure transitions the session to [`DriverState::Failed`] and is
    /// returned; the UI never mounts.
    pub async fn boot(&mut self) -> Result<(), DriverError> {
        self.expect_state(DriverState::Booting)?;
        info!(session = %self.session_id, url = %self.config.source_url, "booting session");

        if let Err(e) = self.try_boot().await {
            self.state = DriverState::Failed;
            error!(session = %self.session_id, error = %e, "boot failed; session is dead");
            return Err(e);
        }

        self.state = DriverState::Ready;
        info!(session = %self.session_id, "remote program loaded");
        Ok(())
    }

    async fn try_boot(&mut self) -> Result<(), DriverError> {
        self.remote.ready().await?;
        let source = self.fetcher.fetch(&self.config.source_url).await?;
        self.remote.exec(&source).await?;
        Ok(())
    }

    // ── Initial render ────────────────────────────────────────────────────────

    /// Evaluates the entry expression and mounts the first tree.
    ///
    /// # Errors
    ///
    /// A failure here is fatal like a boot failure: nothing was ever
    /// displayed, so there is no last good tree to fall back to. The session
    /// transitions to [`DriverState::Failed`].
    pub async fn initial_render(&mut self) -> Result<(), DriverError> {
        self.expect_state(DriverState::Ready)?;

        match self.try_initial_render().await {
            Ok(()) => {
                self.state = DriverState::Idle;
                info!(session = %self.session_id, "initial tree mounted");
                Ok(())
            }
            Err(e) => {
                self.state = DriverState::Failed;
                error!(session = %self.session_id, error = %e, "initial render failed");
                Err(e)
            }
        }
    }

    async fn try_initial_render(&mut self) -> Result<(), DriverError> {
        let entry = self.config.entry_expr.clone();
        let value = self.eval_with_timeout(&entry).await?;
        let tree = self.build_tree(&value)?;
        self.view.mount(tree)?;
        Ok(())
    }

    // ── Event cycle ───────────────────────────────────────────────────────────

    /// Waits for the next queued interaction and runs one full round trip.
    ///
    /// Returns `Ok(false)` when the event queue is closed (the session is
    /// over), `Ok(true)` after processing one message, including messages
    /// whose round trip failed, since those are reported and recovered from
    /// without ending the session.
    pub async fn pump_next(&mut self) -> Result<bool, DriverError> {
        self.expect_state(DriverState::Idle)?;

        let Some(message) = self.events.recv().await else {
            return Ok(false);
        };
        self.round_trip(message).await;
        Ok(true)
    }

    /// Runs the full session: boot, initial render, then the event loop
    /// until the queue closes.
    pub async fn run(&mut self) -> Result<(), DriverError> {
        self.boot().await?;
        self.initial_render().await?;
        while self.pump_next().await? {}
        info!(session = %self.session_id, "event queue closed; session finished");
        Ok(())
    }

    /// One round trip: serialize, evaluate, translate, apply.
    ///
    /// Failures are reported to the log and leave the previously displayed
    /// tree untouched; the driver always returns to idle so a single bad
    /// round trip never bricks the session.
    async fn round_trip(&mut self, message: OutboundMessage) {
        self.state = DriverState::AwaitingResponse;
        debug!(
            session = %self.session_id,
            identifier = %message.identifier,
            "round trip started"
        );

        if let Err(e) = self.try_round_trip(&message).await {
            warn!(
                session = %self.session_id,
                error = %e,
                "round trip failed; keeping last displayed tree"
            );
        }

        self.state = DriverState::Idle;
    }

    async fn try_round_trip(&mut self, message: &OutboundMessage) -> Result<(), DriverError> {
        let expr = receive_call(&self.config.receive_fn, message)?;
        let value = self.eval_with_timeout(&expr).await?;
        let tree = self.build_tree(&value)?;
        self.view.apply(tree)?;
        debug!(session = %self.session_id, "round trip applied");
        Ok(())
    }

    // ── Helpers ───────────────────────────────────────────────────────────────

    async fn eval_with_timeout(&self, expr: &str) -> Result<Value, DriverError> {
        match timeout(self.config.eval_timeout, self.remote.eval(expr)).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(DriverError::EvalTimeout(self.config.eval_timeout)),
        }
    }

    /// Normalizes and translates one evaluation result into a view tree.
    fn build_tree(&self, value: &Value) -> Result<ViewNode, DriverError> {
        let node = UiNode::from_value(value)?;
        Ok(self.translator.translate(&node)?)
    }

    fn expect_state(&self, expected: DriverState) -> Result<(), DriverError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(DriverError::InvalidState {
                actual: self.state,
                expected,
            })
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::SourceFetcher;
    use crate::infrastructure::memory_view::MemoryView;
    use crate::infrastructure::scripted_remote::ScriptedRemote;
    use crate::infrastructure::static_source::StaticSource;
    use async_trait::async_trait;
    use serde_json::json;

    type TestDriver = RoundTripDriver<ScriptedRemote, MemoryView, StaticSource>;

    fn driver_with(remote: ScriptedRemote) -> TestDriver {
        RoundTripDriver::new(
            remote,
            MemoryView::new(),
            StaticSource::new("def render(): pass"),
            SessionConfig::default(),
        )
    }

    /// A fetcher that always fails, for boot-failure tests.
    struct UnreachableSource;

    #[async_trait]
    impl SourceFetcher for UnreachableSource {
        async fn fetch(&self, url: &str) -> Result<String, FetchError> {
            Err(FetchError::Http(format!("connection refused: {url}")))
        }
    }

    // ── Boot ──────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_boot_reaches_ready_and_executes_source_once() {
        // Arrange
        let remote = ScriptedRemote::new();
        let probe = remote.clone();
        let mut driver = driver_with(remote);

        // Act
        driver.boot().await.expect("boot must succeed");

        // Assert
        assert_eq!(driver.state(), DriverState::Ready);
        assert_eq!(probe.log(), vec!["ready", "exec"]);
        assert_eq!(probe.executed_source().as_deref(), Some("def render(): pass"));
    }

    #[tokio::test]
    async fn test_boot_failure_on_fetch_is_fatal() {
        // Arrange: the source cannot be fetched
        let remote = ScriptedRemote::new();
        let mut driver = RoundTripDriver::new(
            remote,
            MemoryView::new(),
            UnreachableSource,
            SessionConfig::default(),
        );

        // Act
        let result = driver.boot().await;

        // Assert: Failed is terminal; a second boot attempt is rejected
        assert!(matches!(result, Err(DriverError::Fetch(_))));
        assert_eq!(driver.state(), DriverState::Failed);
        assert!(matches!(
            driver.boot().await,
            Err(DriverError::InvalidState { .. })
        ));
    }

    #[tokio::test]
    async fn test_boot_failure_on_exec_is_fatal() {
        let remote = ScriptedRemote::new();
        remote.fail_exec("SyntaxError: invalid syntax");
        let mut driver = driver_with(remote);

        let result = driver.boot().await;

        assert!(matches!(result, Err(DriverError::Remote(RemoteError::ExecFailed(_)))));
        assert_eq!(driver.state(), DriverState::Failed);
    }

    #[tokio::test]
    async fn test_boot_failure_on_readiness_is_fatal() {
        let remote = ScriptedRemote::new();
        remote.fail_ready("interpreter never initialized");
        let mut driver = driver_with(remote);

        assert!(driver.boot().await.is_err());
        assert_eq!(driver.state(), DriverState::Failed);
    }

    // ── Initial render ────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_initial_render_mounts_the_entry_trees_translation() {
        // Arrange
        let remote = ScriptedRemote::new();
        let probe = remote.clone();
        remote.push_tree(json!(["div", null, ["hello"]]));
        let mut driver = driver_with(remote);
        driver.boot().await.unwrap();

        // Act
        driver.initial_render().await.expect("render must succeed");

        // Assert: the entry expression was evaluated and the tree mounted
        assert_eq!(driver.state(), DriverState::Idle);
        assert!(probe.log().contains(&"eval:send()".to_string()));
        let mounted = driver.view().current().expect("a tree must be mounted");
        assert_eq!(mounted.child_count(), 1);
    }

    #[tokio::test]
    async fn test_initial_render_before_boot_is_rejected() {
        let mut driver = driver_with(ScriptedRemote::new());
        assert!(matches!(
            driver.initial_render().await,
            Err(DriverError::InvalidState { .. })
        ));
    }

    #[tokio::test]
    async fn test_initial_render_failure_is_fatal() {
        // Nothing was ever displayed, so there is no tree to fall back to.
        let remote = ScriptedRemote::new();
        remote.push_rejection("NameError: name 'send' is not defined");
        let mut driver = driver_with(remote);
        driver.boot().await.unwrap();

        let result = driver.initial_render().await;

        assert!(matches!(result, Err(DriverError::Remote(RemoteError::Rejected(_)))));
        assert_eq!(driver.state(), DriverState::Failed);
        assert!(driver.view().current().is_none());
    }

    #[tokio::test]
    async fn test_malformed_initial_tree_is_a_render_failure() {
        let remote = ScriptedRemote::new();
        remote.push_tree(json!(null));
        let mut driver = driver_with(remote);
        driver.boot().await.unwrap();

        assert!(matches!(
            driver.initial_render().await,
            Err(DriverError::Wire(_))
        ));
        assert_eq!(driver.state(), DriverState::Failed);
    }

    // ── Evaluation timeout ────────────────────────────────────────────────────

    #[tokio::test(start_paused = true)]
    async fn test_stuck_evaluation_times_out_instead_of_hanging() {
        // Arrange: the scripted evaluation takes a minute; the budget is 10 s.
        let remote = ScriptedRemote::new();
        remote.push_tree_delayed(json!(["div"]), Duration::from_secs(60));
        let mut driver = driver_with(remote);
        driver.boot().await.unwrap();

        // Act (paused time: the timeout fires deterministically first)
        let result = driver.initial_render().await;

        // Assert
        assert!(matches!(result, Err(DriverError::EvalTimeout(_))));
    }
}
