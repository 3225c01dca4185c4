//! Collaborator seams consumed by the monitoring core.

use super::windows::{self, WindowDescriptor};
use super::{app, badge, input, OsError, OsResult};
use async_trait::async_trait;

/// Enumerates the target app's windows.
#[async_trait]
pub trait WindowLister: Send + Sync {
    async fn list(&self) -> OsResult<Vec<WindowDescriptor>>;
}

/// Reads the unread-count badge.
#[async_trait]
pub trait BadgeReader: Send + Sync {
    async fn read(&self) -> OsResult<u32>;
}

/// Delivers a reply into an open chat window.
#[async_trait]
pub trait MessageSender: Send + Sync {
    /// Bring the contact's chat window to the front and focus its input.
    async fn activate(&self, contact: &str) -> OsResult<()>;

    /// Type the text into the active chat; `dry_run` skips the final Return.
    async fn send(&self, text: &str, dry_run: bool) -> OsResult<()>;
}

/// Live window lister backed by System Events.
pub struct QqWindowLister;

#[async_trait]
impl WindowLister for QqWindowLister {
    async fn list(&self) -> OsResult<Vec<WindowDescriptor>> {
        windows::list_windows().await
    }
}

/// Live badge reader backed by the Dock's accessibility tree.
pub struct QqBadgeReader;

#[async_trait]
impl BadgeReader for QqBadgeReader {
    async fn read(&self) -> OsResult<u32> {
        badge::read_badge().await
    }
}

/// Live sender: raises the chat window, clicks its input area, pastes.
pub struct QqMessageSender;

#[async_trait]
impl MessageSender for QqMessageSender {
    async fn activate(&self, contact: &str) -> OsResult<()> {
        app::activate().await?;
        // The window may have been closed, or its title may have grown an
        // unread marker, since the event was detected.
        let win = windows::list_windows()
            .await?
            .into_iter()
            .find(|w| w.title == contact || w.title.starts_with(contact))
            .ok_or_else(|| OsError::NotFound(format!("chat window '{contact}'")))?;
        windows::raise_window(&win.title).await?;
        let (x, y) = win.input_point();
        input::click_at(x, y).await
    }

    async fn send(&self, text: &str, dry_run: bool) -> OsResult<()> {
        input::paste_text(text).await?;
        if dry_run {
            tracing::info!("dry-run: message typed but not sent");
            return Ok(());
        }
        input::press_return().await
    }
}
