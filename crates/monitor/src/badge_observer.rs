//! Dock badge transitions.

use crate::events::BadgeDelta;
use chrono::{DateTime, Utc};

/// Tracks the unread badge and emits a delta only on a strict increase.
/// Decreases and repeats just move the baseline.
#[derive(Debug, Default)]
pub struct BadgeObserver {
    last: Option<u32>,
}

impl BadgeObserver {
    pub fn new() -> Self {
        Self { last: None }
    }

    pub fn observe(&mut self, count: u32, captured_at: DateTime<Utc>) -> Option<BadgeDelta> {
        let delta = match self.last {
            Some(previous) if count > previous => Some(BadgeDelta {
                previous,
                current: count,
                detected_at: captured_at,
            }),
            _ => None,
        };
        self.last = Some(count);
        delta
    }
}
