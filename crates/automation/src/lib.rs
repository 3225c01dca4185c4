//! Structured OS automation layer for the QQ desktop client on macOS.
//!
//! Everything that touches the OS lives here: AppleScript execution, window
//! enumeration, Dock badge reads, clipboard text entry, pointer clicks,
//! screenshots, contact search. The monitoring core consumes this crate only
//! through the traits in [`traits`], so it stays testable with fakes.

pub mod app;
pub mod applescript;
pub mod badge;
pub mod input;
pub mod screen;
pub mod search;
pub mod traits;
pub mod windows;

/// Process and AppleScript application name of the QQ desktop client.
pub const QQ_APP_NAME: &str = "QQ";

/// OS capability error types
#[derive(Debug, thiserror::Error)]
pub enum OsError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("AppleScript failed: {0}")]
    ScriptFailed(String),

    #[error("Accessibility permission missing: {0}")]
    PermissionDenied(String),

    #[error("QQ is not running")]
    AppNotRunning,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type OsResult<T> = Result<T, OsError>;
