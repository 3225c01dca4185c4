//! New-message signal and event types flowing through the pipeline.

use chrono::{DateTime, Utc};
use qq_claw_automation::windows::WindowDescriptor;
use serde::{Deserialize, Serialize};

/// Contact placeholder for signals that carry no sender identity.
pub const UNKNOWN_CONTACT: &str = "unknown";

/// How a new-message signal was detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionMethod {
    Window,
    Badge,
}

/// A chat window that appeared since the last poll. QQ rewrites a window's
/// title when unread state changes, so a changed title surfaces here too.
#[derive(Debug, Clone)]
pub struct WindowDelta {
    pub descriptor: WindowDescriptor,
    pub detected_at: DateTime<Utc>,
}

/// A strict increase of the Dock unread badge.
#[derive(Debug, Clone)]
pub struct BadgeDelta {
    pub previous: u32,
    pub current: u32,
    pub detected_at: DateTime<Utc>,
}

impl BadgeDelta {
    pub fn magnitude(&self) -> u32 {
        self.current - self.previous
    }
}

/// A normalized new-message event. Created on delta detection, consumed
/// once by the scheduler, archived to the event log.
#[derive(Debug, Clone)]
pub struct MessageEvent {
    pub contact: String,
    pub detection_method: DetectionMethod,
    pub detected_at: DateTime<Utc>,
    /// Raw signal text the event was derived from, kept for the log.
    pub raw_signal: String,
}
