//! A scripted remote environment.
//!
//! Replays a queue of pre-programmed evaluation outcomes and records every
//! call it receives. Tests use the call log to assert ordering properties
//! (one evaluation in flight at a time, FIFO replay) and the script to
//! simulate rejections and slow evaluations.
//!
//! Handles are cheap clones of shared state, so a test can move one handle
//! into the driver and keep another for inspection.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::application::ports::{RemoteEnvironment, RemoteError};

/// One scripted evaluation outcome.
struct ScriptedEval {
    result: Result<Value, String>,
    delay: Option<Duration>,
}

#[derive(Default)]
struct Inner {
    script: Mutex<VecDeque<ScriptedEval>>,
    log: Mutex<Vec<String>>,
    executed_source: Mutex<Option<String>>,
    ready_error: Mutex<Option<String>>,
    exec_error: Mutex<Option<String>>,
}

/// A [`RemoteEnvironment`] that replays a script.
#[derive(Clone, Default)]
pub struct ScriptedRemote {
    inner: Arc<Inner>,
}

impl ScriptedRemote {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful evaluation resolving with `tree`.
    pub fn push_tree(&self, tree: Value) {
        self.push(ScriptedEval {
            result: Ok(tree),
            delay: None,
        });
    }

    /// Queues a successful evaluation that resolves only after `delay`.
    pub fn push_tree_delayed(&self, tree: Value, delay: Duration) {
        self.push(ScriptedEval {
            result: Ok(tree),
            delay: Some(delay),
        });
    }

    /// Queues a rejection carrying `error` verbatim.
    pub fn push_rejection(&self, error: impl Into<String>) {
        self.push(ScriptedEval {
            result: Err(error.into()),
            delay: None,
        });
    }

    /// Makes the readiness call fail with `error`.
    pub fn fail_ready(&self, error: impl Into<String>) {
        *self.inner.ready_error.lock().unwrap() = Some(error.into());
    }

    /// Makes source execution fail with `error`.
    pub fn fail_exec(&self, error: impl Into<String>) {
        *self.inner.exec_error.lock().unwrap() = Some(error.into());
    }

    /// The recorded call log, in order.
    ///
    /// Entries: `ready`, `exec`, `eval:<expr>` when an evaluation is issued,
    /// `settled:<expr>` when it settles. A well-behaved driver never
    /// interleaves two eval/settled pairs.
    pub fn log(&self) -> Vec<String> {
        self.inner.log.lock().unwrap().clone()
    }

    /// The source text passed to `exec`, if it was called.
    pub fn executed_source(&self) -> Option<String> {
        self.inner.executed_source.lock().unwrap().clone()
    }

    fn push(&self, eval: ScriptedEval) {
        self.inner.script.lock().unwrap().push_back(eval);
    }

    fn record(&self, entry: String) {
        self.inner.log.lock().unwrap().push(entry);
    }
}

#[async_trait]
impl RemoteEnvironment for ScriptedRemote {
    async fn ready(&self) -> Result<(), RemoteError> {
        self.record("ready".to_string());
        match self.inner.ready_error.lock().unwrap().clone() {
            Some(error) => Err(RemoteError::Unavailable(error)),
            None => Ok(()),
        }
    }

    async fn exec(&self, source: &str) -> Result<(), RemoteError> {
        self.record("exec".to_string());
        *self.inner.executed_source.lock().unwrap() = Some(source.to_string());
        match self.inner.exec_error.lock().unwrap().clone() {
            Some(error) => Err(RemoteError::ExecFailed(error)),
            None => Ok(()),
        }
    }

    async fn eval(&self, expr: &str) -> Result<Value, RemoteError> {
        self.record(format!("eval:{expr}"));
        let step = self.inner.script.lock().unwrap().pop_front();
        let Some(step) = step else {
            self.record(format!("settled:{expr}"));
            return Err(RemoteError::Rejected("script exhausted".to_string()));
        };
        if let Some(delay) = step.delay {
            tokio::time::sleep(delay).await;
        }
        self.record(format!("settled:{expr}"));
        step.result.map_err(RemoteError::Rejected)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
