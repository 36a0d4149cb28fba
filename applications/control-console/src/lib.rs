//! Soul Control Console Library
//!
//! Line-oriented stand-in transport for the playback control service:
//! configuration, command parsing and the JSON event printer.
//!
//! This library exposes the core components for testing purposes.

pub mod command;
pub mod config;
pub mod error;
pub mod listener;
pub mod shell;

// Re-export commonly used types for convenience
pub use command::Command;
pub use config::ConsoleConfig;
pub use error::{ConsoleError, Result};
pub use listener::ConsoleListener;
pub use shell::run_command;
