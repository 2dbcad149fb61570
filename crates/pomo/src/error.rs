//! Error taxonomy for the session engine and its stores

use thiserror::Error;

/// Errors raised by pomo's core operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PomoError {
    #[error("Mode \"{0}\" does not exist")]
    ModeNotFound(String),

    #[error("Mode \"{0}\" already exists")]
    ModeExists(String),

    #[error("Invalid mode configuration: {0}")]
    InvalidModeConfig(String),

    #[error("Session size must be between 1 and {max}, got {0}", max = crate::session::MAX_SESSION_SIZE)]
    InvalidSessionSize(u32),

    #[error("Stats store error: {0}")]
    StatsIo(String),

    #[error("Notification failed: {0}")]
    Notification(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            PomoError::ModeNotFound("deep".into()).to_string(),
            "Mode \"deep\" does not exist"
        );
        assert_eq!(
            PomoError::InvalidSessionSize(0).to_string(),
            "Session size must be between 1 and 20, got 0"
        );
    }
}
