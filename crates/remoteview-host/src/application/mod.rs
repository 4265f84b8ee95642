//! Application layer: the round-trip driver and the ports it drives.
//!
//! The driver's collaborators are traits ([`ports`]), so the application
//! layer can be exercised end to end against scripted stubs with no network
//! and no real interpreter.

pub mod driver;
pub mod ports;

pub use driver::{DriverError, RoundTripDriver};
pub use ports::{FetchError, RemoteEnvironment, RemoteError, SourceFetcher, ViewBackend, ViewError};
