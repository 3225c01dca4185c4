//! Keyboard and pointer entry - clipboard paste, keystrokes, clicks.

use super::applescript::{command_exists, run_applescript, run_checked, validate_script_text};
use super::{OsError, OsResult, QQ_APP_NAME};
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::time::{sleep, Duration};

/// Put text on the clipboard via pbcopy. CJK-safe and needs no
/// Accessibility grant, unlike keystroke-by-keystroke typing.
pub async fn set_clipboard(text: &str) -> OsResult<()> {
    let mut child = Command::new("pbcopy").stdin(Stdio::piped()).spawn()?;
    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(text.as_bytes()).await?;
    }
    let status = child.wait().await?;
    if !status.success() {
        return Err(OsError::ScriptFailed("pbcopy exited nonzero".to_string()));
    }
    Ok(())
}

/// Send a keystroke to the QQ process, optionally with Command held.
pub async fn keystroke(key: &str, command_down: bool) -> OsResult<()> {
    validate_script_text(key, "key")?;
    let modifier = if command_down {
        " using command down"
    } else {
        ""
    };
    run_applescript(&format!(
        "tell application \"System Events\"\n    tell process \"{QQ_APP_NAME}\"\n        keystroke \"{key}\"{modifier}\n    end tell\nend tell"
    ))
    .await?;
    Ok(())
}

/// Press Return in the QQ process. Return goes by key code because QQ's
/// input field ignores the keystroke form.
pub async fn press_return() -> OsResult<()> {
    run_applescript(&format!(
        "tell application \"System Events\"\n    tell process \"{QQ_APP_NAME}\"\n        key code 36\n    end tell\nend tell"
    ))
    .await?;
    Ok(())
}

/// Paste text into the focused QQ input field (clipboard + Cmd+V).
pub async fn paste_text(text: &str) -> OsResult<()> {
    if text.contains('\0') {
        return Err(OsError::InvalidArgument(
            "text contains null byte".to_string(),
        ));
    }
    set_clipboard(text).await?;
    sleep(Duration::from_millis(100)).await;
    keystroke("v", true).await?;
    sleep(Duration::from_millis(300)).await;
    Ok(())
}

/// Click at an absolute screen coordinate.
pub async fn click_at(x: i32, y: i32) -> OsResult<()> {
    if x < 0 || y < 0 {
        return Err(OsError::InvalidArgument(format!(
            "click coordinates must be >= 0, got ({x}, {y})"
        )));
    }
    if !command_exists("cliclick").await {
        return Err(OsError::ScriptFailed(
            "no click backend found (install 'cliclick')".to_string(),
        ));
    }
    run_checked("cliclick", &[&format!("c:{x},{y}")]).await
}
