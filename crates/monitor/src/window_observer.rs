//! Window snapshot diffing.

use crate::events::WindowDelta;
use chrono::{DateTime, Utc};
use qq_claw_automation::windows::WindowDescriptor;
use std::collections::BTreeMap;

/// Diffs successive window snapshots and emits a delta for every chat
/// window title not present in the previous snapshot. The first snapshot
/// only establishes the baseline.
#[derive(Debug, Default)]
pub struct WindowObserver {
    known: Option<BTreeMap<String, WindowDescriptor>>,
}

impl WindowObserver {
    pub fn new() -> Self {
        Self { known: None }
    }

    /// Fold one poll result in; returns the deltas it produced. Non-chat
    /// windows (main panel, global search, untitled) never enter the
    /// snapshot.
    pub fn observe(
        &mut self,
        windows: Vec<WindowDescriptor>,
        captured_at: DateTime<Utc>,
    ) -> Vec<WindowDelta> {
        let snapshot: BTreeMap<String, WindowDescriptor> = windows
            .into_iter()
            .filter(WindowDescriptor::is_chat)
            .map(|w| (w.title.clone(), w))
            .collect();

        let deltas = match &self.known {
            None => Vec::new(),
            Some(previous) => snapshot
                .values()
                .filter(|w| !previous.contains_key(&w.title))
                .map(|w| WindowDelta {
                    descriptor: w.clone(),
                    detected_at: captured_at,
                })
                .collect(),
        };

        self.known = Some(snapshot);
        deltas
    }
}
