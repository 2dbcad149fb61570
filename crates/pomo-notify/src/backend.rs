//! Notification backends for different platforms
//!
//! Each backend except the bell maps a notification onto one helper program
//! invocation. [`Backend::spawn`] starts that program and returns without
//! waiting for it.

use anyhow::{Context, Result};
use std::io::Write;
use std::process::{Child, Command, Stdio};

/// A notification to display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub message: String,
    /// Icon name or path, for backends that take one
    pub icon: Option<String>,
}

impl Notification {
    /// Notification titled with the app name and the default icon
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            title: crate::APP_NAME.to_string(),
            message: message.into(),
            icon: Some(crate::DEFAULT_ICON.to_string()),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}

/// Available notification backends
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Backend {
    /// macOS terminal-notifier
    TerminalNotifier,
    /// macOS osascript
    Osascript,
    /// Linux notify-send
    NotifySend,
    /// KDE kdialog
    Kdialog,
    /// WSL PowerShell toast
    Wsl,
    /// User-supplied program, called as `<program> <title> <message>`
    Custom(String),
    /// Terminal bell on stderr
    Bell,
}

impl Backend {
    /// Detect the best available backend for the current platform
    pub fn detect() -> Self {
        #[cfg(target_os = "macos")]
        {
            if Self::command_exists("terminal-notifier") {
                return Self::TerminalNotifier;
            }
            return Self::Osascript;
        }

        #[cfg(target_os = "linux")]
        {
            if std::env::var("WSL_DISTRO_NAME").is_ok() {
                return Self::Wsl;
            }
            if Self::command_exists("notify-send") {
                return Self::NotifySend;
            }
            if Self::command_exists("kdialog") {
                return Self::Kdialog;
            }
            return Self::Bell;
        }

        #[cfg(not(any(target_os = "macos", target_os = "linux")))]
        {
            Self::Bell
        }
    }

    #[allow(dead_code)]
    fn command_exists(cmd: &str) -> bool {
        Command::new("which")
            .arg(cmd)
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    pub fn name(&self) -> &str {
        match self {
            Self::TerminalNotifier => "terminal-notifier",
            Self::Osascript => "osascript",
            Self::NotifySend => "notify-send",
            Self::Kdialog => "kdialog",
            Self::Wsl => "wsl",
            Self::Custom(program) => program,
            Self::Bell => "bell",
        }
    }

    /// The helper invocation for `notification`, or `None` for the bell
    pub fn command(&self, notification: &Notification) -> Option<Command> {
        let title = notification.title.as_str();
        let message = notification.message.as_str();

        let cmd = match self {
            Self::TerminalNotifier => {
                let mut cmd = Command::new("terminal-notifier");
                cmd.args(["-title", title, "-message", message, "-group", "pomo"]);
                cmd.args(["-sound", "default"]);
                cmd
            }
            Self::Osascript => {
                let script = format!(
                    r#"display notification "{}" with title "{}" sound name "default""#,
                    message.replace('"', r#"\""#),
                    title.replace('"', r#"\""#)
                );
                let mut cmd = Command::new("osascript");
                cmd.args(["-e", &script]);
                cmd
            }
            Self::NotifySend => {
                let mut cmd = Command::new("notify-send");
                cmd.args([title, message, "-a", crate::APP_NAME]);
                if let Some(icon) = &notification.icon {
                    cmd.args(["-i", icon]);
                }
                cmd
            }
            Self::Kdialog => {
                let mut cmd = Command::new("kdialog");
                cmd.args(["--passivepopup", message, "5", "--title", title]);
                cmd
            }
            Self::Wsl => {
                let script = format!(
                    r#"[Windows.UI.Notifications.ToastNotificationManager, Windows.UI.Notifications, ContentType = WindowsRuntime] | Out-Null; $t = [Windows.UI.Notifications.ToastNotificationManager]::GetTemplateContent([Windows.UI.Notifications.ToastTemplateType]::ToastText02); $t.GetElementsByTagName('text')[0].AppendChild($t.CreateTextNode('{}')) | Out-Null; $t.GetElementsByTagName('text')[1].AppendChild($t.CreateTextNode('{}')) | Out-Null; [Windows.UI.Notifications.ToastNotificationManager]::CreateToastNotifier('{}').Show([Windows.UI.Notifications.ToastNotification]::new($t))"#,
                    title.replace('\'', "''"),
                    message.replace('\'', "''"),
                    crate::APP_NAME
                );
                let mut cmd = Command::new("powershell.exe");
                cmd.args(["-Command", &script]);
                cmd
            }
            Self::Custom(program) => {
                let mut cmd = Command::new(program);
                cmd.args([title, message]);
                cmd
            }
            Self::Bell => return None,
        };
        Some(cmd)
    }

    /// Start the helper and return its handle without waiting.
    ///
    /// The bell is written directly and yields `None`.
    pub fn spawn(&self, notification: &Notification) -> Result<Option<Child>> {
        let Some(mut cmd) = self.command(notification) else {
            let mut stderr = std::io::stderr();
            stderr.write_all(b"\x07")?;
            stderr.flush()?;
            return Ok(None);
        };

        let child = cmd
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("Failed to start {}", self.name()))?;
        Ok(Some(child))
    }
}
