//! Infrastructure layer: concrete implementations of the application ports.
//!
//! - [`http_source`] / [`static_source`]: where the program source comes from.
//! - [`memory_view`]: an in-process view backend that holds the translated
//!   tree and routes fired events, including controlled-input behavior.
//! - [`scripted_remote`]: a remote environment that replays a script of
//!   evaluation outcomes, for tests and offline development.

pub mod http_source;
pub mod memory_view;
pub mod scripted_remote;
pub mod static_source;

pub use http_source::HttpSource;
pub use memory_view::MemoryView;
pub use scripted_remote::ScriptedRemote;
pub use static_source::StaticSource;
