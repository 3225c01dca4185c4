//! AppleScript plumbing - every System Events query goes through osascript.

use super::{OsError, OsResult};
use tokio::process::Command;

/// Run an AppleScript snippet and return its trimmed stdout.
pub async fn run_applescript(script: &str) -> OsResult<String> {
    let output = Command::new("osascript")
        .args(["-e", script])
        .output()
        .await?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        // System Events reports a missing Accessibility grant as error -1002.
        if stderr.contains("1002") {
            return Err(OsError::PermissionDenied(
                "add this terminal under System Settings > Privacy & Security > Accessibility"
                    .to_string(),
            ));
        }
        return Err(OsError::ScriptFailed(stderr));
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

pub(crate) async fn command_exists(command: &str) -> bool {
    Command::new("which")
        .arg(command)
        .output()
        .await
        .map(|output| output.status.success())
        .unwrap_or(false)
}

pub(crate) async fn run_checked(command: &str, args: &[&str]) -> OsResult<()> {
    let output = Command::new(command).args(args).output().await?;
    if output.status.success() {
        return Ok(());
    }
    Err(OsError::ScriptFailed(
        String::from_utf8_lossy(&output.stderr).to_string(),
    ))
}

/// Reject text that would break out of a quoted AppleScript string literal.
pub(crate) fn validate_script_text(text: &str, label: &str) -> OsResult<()> {
    if text.contains('"') || text.contains('\\') {
        return Err(OsError::InvalidArgument(format!(
            "{label} must not contain quotes or backslashes"
        )));
    }
    if text.chars().any(|ch| ch.is_control()) {
        return Err(OsError::InvalidArgument(format!(
            "{label} contains control characters"
        )));
    }
    Ok(())
}
