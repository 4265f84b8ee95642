//! Host-side widget implementations.
//!
//! Widgets are the handful of components the translator substitutes for
//! uppercase-initial tags. Each one wraps a native element with behavior the
//! remote program should not have to re-implement per host.

pub mod text_input;

pub use text_input::ControlledInput;
