//! Session configuration.
//!
//! [`SessionConfig`] is the single source of truth for one session's runtime
//! settings. The core consumes no CLI arguments and no environment
//! variables; the embedder builds this struct once and hands it to the
//! driver.
//!
//! Keeping configuration as a plain struct (no global state, no environment
//! reads inside the domain) makes a session easy to embed in tests and in
//! multi-session hosts.

use std::time::Duration;

/// All runtime configuration for one RemoteView session.
///
/// # Example
///
/// ```rust
/// use remoteview_host::domain::SessionConfig;
///
/// // Defaults match the conventional interpreter-side program layout:
/// let cfg = SessionConfig::default();
/// assert_eq!(cfg.entry_expr, "send()");
/// assert_eq!(cfg.receive_fn, "recv");
/// ```
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Where the remote program's source text is fetched from at boot,
    /// e.g. `http://127.0.0.1:8000/main.py`.
    pub source_url: String,

    /// The entry expression evaluated once after the source is executed.
    /// Its result is the first serialized tree.
    pub entry_expr: String,

    /// The interpreter-side function that receives interaction messages.
    /// Each round trip evaluates `<receive_fn>(<json message>)`.
    pub receive_fn: String,

    /// Upper bound on any single remote evaluation.
    ///
    /// The remote environment offers no cancellation, so an evaluation that
    /// never settles would otherwise hang the session forever. On timeout
    /// the driver reports a failure and returns to idle; the evaluation
    /// itself keeps running remotely until it settles on its own.
    pub eval_timeout: Duration,

    /// Optional context path stamped onto every outbound message, for
    /// interpreter programs that serve more than one view.
    pub context_path: Option<String>,
}

impl Default for SessionConfig {
    /// Defaults suitable for local development against an interpreter
    /// program served next to the host.
    ///
    /// | Field        | Default                          |
    /// |--------------|----------------------------------|
    /// | source_url   | `http://127.0.0.1:8000/main.py`  |
    /// | entry_expr   | `send()`                         |
    /// | receive_fn   | `recv`                           |
    /// | eval_timeout | 10 seconds                       |
    /// | context_path | none                             |
    fn default() -> Self {
        Self {
            source_url: "http://127.0.0.1:8000/main.py".to_string(),
            entry_expr: "send()".to_string(),
            receive_fn: "recv".to_string(),
            eval_timeout: Duration::from_secs(10),
            context_path: None,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_entry_expr_is_send() {
        let cfg = SessionConfig::default();
        assert_eq!(cfg.entry_expr, "send()");
    }

    #[test]
    fn test_default_receive_fn_is_recv() {
        let cfg = SessionConfig::default();
        assert_eq!(cfg.receive_fn, "recv");
    }

    #[test]
    fn test_default_eval_timeout_is_10s() {
        let cfg = SessionConfig::default();
        assert_eq!(cfg.eval_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_default_has_no_context_path() {
        let cfg = SessionConfig::default();
        assert!(cfg.context_path.is_none());
    }

    #[test]
    fn test_config_can_be_cloned() {
        // Cloneability lets one config template spawn several sessions.
        let cfg = SessionConfig {
            source_url: "http://10.0.0.5/app.py".to_string(),
            context_path: Some("/todos".to_string()),
            ..SessionConfig::default()
        };
        let cloned = cfg.clone();
        assert_eq!(cloned.source_url, cfg.source_url);
        assert_eq!(cloned.context_path, cfg.context_path);
    }
}
