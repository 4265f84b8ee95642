//! The driver's session state machine.
//!
//! ```text
//! Booting ──► Ready ──► Idle ◄──► AwaitingResponse
//!    │          │         ▲
//!    └──────────┴─────────┴────► Failed   (terminal)
//! ```
//!
//! The machine exists to enforce one property above all: **at most one
//! remote evaluation is in flight at any time**. The remote interpreter is a
//! single shared mutable resource; concurrent calls would race inside its
//! own state, so they are ruled out by construction rather than by a lock.

/// Lifecycle states of one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    /// Waiting for the remote environment's readiness signal and executing
    /// the program source. Entered once, at session start.
    Booting,
    /// Source executed; the initial render has not happened yet.
    Ready,
    /// Mounted and quiescent; interactions may start a round trip.
    Idle,
    /// One evaluation is in flight. New interactions wait in the queue.
    AwaitingResponse,
    /// Boot or initial render failed. Terminal: the UI never mounted (or
    /// never will remount), so there is nothing to keep interactive.
    Failed,
}

impl DriverState {
    /// Whether the session can never make progress again.
    pub fn is_terminal(self) -> bool {
        matches!(self, DriverState::Failed)
    }

    /// Whether a round trip may start from this state.
    pub fn accepts_interactions(self) -> bool {
        matches!(self, DriverState::Idle)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_failed_is_terminal() {
        assert!(DriverState::Failed.is_terminal());
        for state in [
            DriverState::Booting,
            DriverState::Ready,
            DriverState::Idle,
            DriverState::AwaitingResponse,
        ] {
            assert!(!state.is_terminal(), "{state:?} must not be terminal");
        }
    }

    #[test]
    fn test_only_idle_accepts_interactions() {
        assert!(DriverState::Idle.accepts_interactions());
        for state in [
            DriverState::Booting,
            DriverState::Ready,
            DriverState::AwaitingResponse,
            DriverState::Failed,
        ] {
            assert!(
                !state.accepts_interactions(),
                "{state:?} must not accept interactions"
            );
        }
    }
}
