//! Desktop notifications.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use tokio::process::Command;

use crate::config::NotificationConfig;

/// Something that can alert the user.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self) -> Result<()>;
}

/// Shells out to the platform notification tool.
#[derive(Debug, Clone)]
pub struct DesktopNotifier {
    title: String,
    message: String,
}

impl DesktopNotifier {
    pub fn new(config: &NotificationConfig) -> Self {
        Self {
            title: config.title.clone(),
            message: config.message.clone(),
        }
    }

    /// Build the command for the current OS, if it has one.
    fn command(&self) -> Option<Command> {
        match std::env::consts::OS {
            "macos" => {
                let script = format!(
                    "display notification \"{}\" with title \"{}\"",
                    escape_applescript(&self.message),
                    escape_applescript(&self.title)
                );
                let mut cmd = Command::new("osascript");
                cmd.arg("-e").arg(script);
                Some(cmd)
            }
            "linux" => {
                let mut cmd = Command::new("notify-send");
                cmd.arg("--urgency=critical").arg(&self.title).arg(&self.message);
                Some(cmd)
            }
            _ => None,
        }
    }
}

#[async_trait]
impl Notifier for DesktopNotifier {
    async fn notify(&self) -> Result<()> {
        let Some(mut cmd) = self.command() else {
            tracing::warn!(
                "Push notifications not supported for this system ({})",
                std::env::consts::OS
            );
            return Ok(());
        };

        let status = cmd
            .status()
            .await
            .context("Failed to launch notification command")?;
        if !status.success() {
            bail!("Notification command exited with {}", status);
        }
        Ok(())
    }
}

/// Escape a string for use inside an AppleScript double-quoted literal.
fn escape_applescript(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}
