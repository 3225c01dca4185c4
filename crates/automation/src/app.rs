//! QQ application lifecycle - running check, activation, launch.

use super::applescript::run_applescript;
use super::{OsResult, QQ_APP_NAME};
use sysinfo::System;
use tokio::task;
use tokio::time::{sleep, Duration};

/// Whether the QQ desktop client is currently running.
pub async fn is_running() -> bool {
    task::spawn_blocking(|| {
        let mut system = System::new();
        system.refresh_processes();
        system
            .processes()
            .values()
            .any(|process| process.name() == QQ_APP_NAME)
    })
    .await
    .unwrap_or(false)
}

/// Bring QQ to the foreground.
pub async fn activate() -> OsResult<()> {
    run_applescript(&format!(
        "tell application \"{QQ_APP_NAME}\"\n    activate\nend tell"
    ))
    .await?;
    // Window server needs a moment before the window accepts input.
    sleep(Duration::from_millis(500)).await;
    Ok(())
}

/// Launch QQ and bring it to the foreground.
pub async fn launch() -> OsResult<()> {
    run_applescript(&format!(
        "tell application \"{QQ_APP_NAME}\"\n    launch\n    activate\nend tell"
    ))
    .await?;
    sleep(Duration::from_secs(2)).await;
    Ok(())
}
