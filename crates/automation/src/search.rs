//! Contact search - drives the search box of the QQ NT main panel.

use super::windows::WindowDescriptor;
use super::{app, input, windows, OsError, OsResult};
use tokio::time::{sleep, Duration};

/// Vertical offset of the search box from the top of the main panel.
const SEARCH_BOX_OFFSET_Y: i32 = 70;

/// Search a contact or group by name and open its chat.
///
/// Flow: activate the main panel, click the search box, paste the name,
/// press Return to open the first result, then look for the chat window.
/// Returns the opened chat window when one appeared.
pub async fn open_contact(name: &str) -> OsResult<Option<WindowDescriptor>> {
    if !app::is_running().await {
        return Err(OsError::AppNotRunning);
    }
    app::activate().await?;

    let panel = windows::main_window()
        .await?
        .ok_or_else(|| OsError::NotFound("QQ main window".to_string()))?;

    input::click_at(panel.x + panel.width / 2, panel.y + SEARCH_BOX_OFFSET_Y).await?;
    sleep(Duration::from_millis(500)).await;

    input::paste_text(name).await?;
    sleep(Duration::from_secs(1)).await;

    input::press_return().await?;
    sleep(Duration::from_secs(1)).await;

    windows::find_chat_window().await
}
