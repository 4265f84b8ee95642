//! remoteview-host library crate.
//!
//! This crate runs the host side of a RemoteView session: it boots the remote
//! interpreter, drives the interaction round-trip loop, and owns the view
//! backend that displays each translated tree.
//!
//! # Architecture (clean architecture)
//!
//! ```text
//! Remote interpreter (JSON trees in, interaction messages out)
//!         ↕
//! [remoteview-host]
//!   ├── domain/           Pure types: SessionConfig, DriverState
//!   ├── application/      RoundTripDriver + the ports it drives
//!   ├── infrastructure/   HTTP source fetcher, in-memory view backend,
//!   │                     scripted remote stub
//!   └── widgets/          The controlled text-input leaf widget
//! ```
//!
//! # Layer rules
//!
//! - `domain` has no external dependencies (no I/O, no async, no frameworks).
//! - `application` depends on `domain` and `remoteview-core` only; all I/O
//!   reaches it through the injected port traits.
//! - `infrastructure` depends on the other layers plus `tokio` and `ureq`.
//!
//! # Why ports instead of concrete collaborators?
//!
//! Neither the remote environment nor the display mount point is an ambient
//! singleton here. Both are handles passed in at construction:
//! `RemoteEnvironment`, `ViewBackend`, and `SourceFetcher` are traits, so a
//! session can run against a production interpreter or a scripted stub, and
//! several independent sessions can coexist in one process.

/// Domain layer: pure configuration and state types (no I/O).
pub mod domain;

/// Application layer: the round-trip driver and its ports.
pub mod application;

/// Infrastructure layer: HTTP source fetching, the in-memory view backend,
/// and the scripted remote-environment stub.
pub mod infrastructure;

/// Leaf widgets bridging native events to the protocol.
pub mod widgets;
