//! Screen capture via the macOS screencapture utility.

use super::{app, windows, OsError, OsResult};
use std::path::{Path, PathBuf};
use tokio::process::Command;

const SCREENSHOT_DIR: &str = "screenshots";

/// Capture the whole screen, or a region, to a PNG and return its path.
pub async fn capture_screen(
    region: Option<(i32, i32, i32, i32)>,
    path: Option<&Path>,
) -> OsResult<PathBuf> {
    let target = match path {
        Some(path) => path.to_path_buf(),
        None => {
            let ts = chrono::Local::now().format("%Y%m%d_%H%M%S");
            PathBuf::from(SCREENSHOT_DIR).join(format!("qq_{ts}.png"))
        }
    };
    if let Some(parent) = target.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    let mut args: Vec<String> = vec!["-x".to_string()];
    if let Some((x, y, w, h)) = region {
        args.push("-R".to_string());
        args.push(format!("{x},{y},{w},{h}"));
    }
    args.push(target.to_string_lossy().into_owned());

    let output = Command::new("screencapture").args(&args).output().await?;
    if !output.status.success() || !target.exists() {
        return Err(OsError::ScriptFailed(
            String::from_utf8_lossy(&output.stderr).to_string(),
        ));
    }
    Ok(target)
}

/// Activate QQ and capture its front window, falling back to the full
/// screen when window bounds are unavailable.
pub async fn capture_qq_window(path: Option<&Path>) -> OsResult<PathBuf> {
    app::activate().await?;
    let region = match windows::main_window().await? {
        Some(win) => Some((win.x, win.y, win.width, win.height)),
        None => {
            tracing::warn!("QQ window bounds unavailable, capturing full screen");
            None
        }
    };
    capture_screen(region, path).await
}
