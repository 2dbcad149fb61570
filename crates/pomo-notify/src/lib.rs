//! pomo-notify - Desktop notifications for pomo
//!
//! Works on macOS (osascript/terminal-notifier), Linux (notify-send/kdialog)
//! and WSL. Delivery never blocks the caller: the helper program is started
//! on the calling thread and reaped on a background one, so a notification
//! sent right before the process exits is still delivered.

mod backend;

pub use backend::{Backend, Notification};

use anyhow::Result;
use std::process::Child;
use std::thread;
use tracing::{debug, warn};

/// Application name shown as the notification title and sender
pub const APP_NAME: &str = "Pomo";

/// Icon passed to backends that accept one
pub const DEFAULT_ICON: &str = "terminal";

/// Something that can show a titled message to the user.
///
/// Implementations must return promptly; an `Err` is advisory and callers
/// treat it as non-fatal.
pub trait NotificationSink {
    fn notify(&self, title: &str, body: &str) -> Result<()>;
}

/// Sends notifications through a platform backend
#[derive(Debug, Clone)]
pub struct DesktopNotifier {
    backend: Backend,
}

impl Default for DesktopNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl DesktopNotifier {
    /// Detect the platform backend once, up front
    pub fn new() -> Self {
        Self::with_backend(Backend::detect())
    }

    pub fn with_backend(backend: Backend) -> Self {
        debug!("Notification backend: {}", backend.name());
        Self { backend }
    }

    pub fn backend(&self) -> &Backend {
        &self.backend
    }

    /// Start the helper now; wait for it in the background.
    ///
    /// Returns the helper's pid, or `None` when nothing was spawned.
    pub fn dispatch(&self, notification: &Notification) -> Result<Option<u32>> {
        let Some(child) = self.backend.spawn(notification)? else {
            return Ok(None);
        };
        let pid = child.id();
        reap(child, self.backend.name().to_string());
        Ok(Some(pid))
    }
}

fn reap(mut child: Child, name: String) {
    let spawned = thread::Builder::new()
        .name("pomo-notify".to_string())
        .spawn(move || match child.wait() {
            Ok(status) if !status.success() => {
                warn!("Notification via {} exited with {}", name, status)
            }
            Ok(_) => {}
            Err(e) => warn!("Notification via {} failed: {}", name, e),
        });

    if let Err(e) = spawned {
        warn!("Failed to spawn notification reaper: {}", e);
    }
}

impl NotificationSink for DesktopNotifier {
    fn notify(&self, title: &str, body: &str) -> Result<()> {
        self.dispatch(&Notification::new(body).with_title(title))
            .map(|_| ())
    }
}

/// Swallows every notification
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl NotificationSink for Silent {
    fn notify(&self, _title: &str, _body: &str) -> Result<()> {
        Ok(())
    }
}
