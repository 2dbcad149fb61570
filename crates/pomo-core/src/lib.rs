//! Pomo Core - Shared functionality for the pomo timer
//!
//! Standard paths, user configuration and display formatting used by the
//! session engine and the notification layer.

pub mod config;
pub mod format;
pub mod paths;

pub use config::Config;
pub use paths::Paths;
