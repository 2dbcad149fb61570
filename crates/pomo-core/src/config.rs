//! Configuration management for pomo

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// User configuration, every field optional on disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Mode used when `start` is given no `--mode`
    #[serde(default = "default_mode")]
    pub default_mode: String,

    /// Number of work intervals per session
    #[serde(default = "default_session_size")]
    pub session_size: u32,

    /// Text shown when a work interval begins
    #[serde(default = "default_work_label")]
    pub work_label: String,

    /// Text shown when a break begins
    #[serde(default = "default_break_label")]
    pub break_label: String,

    /// Send desktop notifications at interval boundaries
    #[serde(default = "default_notifications")]
    pub notifications: bool,

    /// Program to call as `<program> <title> <message>` instead of the
    /// detected platform notifier
    #[serde(default)]
    pub notify_command: Option<String>,
}

fn default_mode() -> String {
    "default".to_string()
}

fn default_session_size() -> u32 {
    5
}

fn default_work_label() -> String {
    "It's time for work!".to_string()
}

fn default_break_label() -> String {
    "It's time for break!".to_string()
}

fn default_notifications() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_mode: default_mode(),
            session_size: default_session_size(),
            work_label: default_work_label(),
            break_label: default_break_label(),
            notifications: default_notifications(),
            notify_command: None,
        }
    }
}

impl Config {
    /// Load config from file, falling back to defaults when absent
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config: {}", path.display()))?;
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config: {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.session_size, 5);
        assert!(config.notifications);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"default_mode": "deep", "notifications": false}"#).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.default_mode, "deep");
        assert!(!config.notifications);
        assert_eq!(config.work_label, "It's time for work!");
    }

    #[test]
    fn test_notify_command() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"notify_command": "/usr/local/bin/ping-me"}"#).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.notify_command.as_deref(), Some("/usr/local/bin/ping-me"));
        assert_eq!(Config::default().notify_command, None);
    }

    #[test]
    fn test_malformed_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "not json").unwrap();

        assert!(Config::load(&path).is_err());
    }
}
