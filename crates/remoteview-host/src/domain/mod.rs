//! Pure domain types for the host: session configuration and the driver's
//! state machine. Nothing in this layer performs I/O or depends on an async
//! runtime.

pub mod config;
pub mod state;

pub use config::SessionConfig;
pub use state::DriverState;
