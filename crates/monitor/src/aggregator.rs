//! Normalizes detection deltas into message events.

use crate::events::{BadgeDelta, DetectionMethod, MessageEvent, WindowDelta, UNKNOWN_CONTACT};
use std::collections::HashSet;

/// Merges window and badge deltas into normalized events: resolves a
/// contact per signal, applies the target filter, and collapses same-tick
/// duplicates (first detected wins; windows are polled before the badge).
#[derive(Debug, Default)]
pub struct EventAggregator {
    targets: Vec<String>,
}

impl EventAggregator {
    pub fn new(targets: &[String]) -> Self {
        Self {
            targets: targets.iter().map(|t| t.to_lowercase()).collect(),
        }
    }

    pub fn merge(
        &self,
        window_deltas: Vec<WindowDelta>,
        badge_delta: Option<BadgeDelta>,
    ) -> Vec<MessageEvent> {
        let mut events = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        for delta in window_deltas {
            let contact = resolve_contact(&delta.descriptor.title);
            if !self.matches_target(&contact) {
                tracing::debug!("ignoring non-target window: {}", delta.descriptor.title);
                continue;
            }
            if !seen.insert(contact.clone()) {
                continue;
            }
            events.push(MessageEvent {
                contact,
                detection_method: DetectionMethod::Window,
                detected_at: delta.detected_at,
                raw_signal: delta.descriptor.title.clone(),
            });
        }

        if let Some(delta) = badge_delta {
            let contact = UNKNOWN_CONTACT.to_string();
            if self.matches_target(&contact) && seen.insert(contact.clone()) {
                events.push(MessageEvent {
                    contact,
                    detection_method: DetectionMethod::Badge,
                    detected_at: delta.detected_at,
                    raw_signal: format!("badge {} -> {}", delta.previous, delta.current),
                });
            }
        }

        events
    }

    /// Case-insensitive contains-match against any configured target; an
    /// empty target set passes everything.
    fn matches_target(&self, contact: &str) -> bool {
        if self.targets.is_empty() {
            return true;
        }
        let lower = contact.to_lowercase();
        self.targets.iter().any(|target| lower.contains(target))
    }
}

/// Strip QQ's trailing unread marker from a window title:
/// `"张三 (3)"` resolves to `"张三"`.
pub fn resolve_contact(title: &str) -> String {
    let trimmed = title.trim();
    if let Some(idx) = trimmed.rfind(" (") {
        let inner = &trimmed[idx + 2..];
        if let Some(digits) = inner.strip_suffix(')') {
            if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) {
                return trimmed[..idx].to_string();
            }
        }
    }
    trimmed.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use qq_claw_automation::windows::WindowDescriptor;

    fn window_delta(title: &str) -> WindowDelta {
        WindowDelta {
            descriptor: WindowDescriptor {
                title: title.to_string(),
                x: 0,
                y: 0,
                width: 720,
                height: 560,
            },
            detected_at: Utc::now(),
        }
    }

    fn badge_delta(previous: u32, current: u32) -> BadgeDelta {
        BadgeDelta {
            previous,
            current,
            detected_at: Utc::now(),
        }
    }

    #[test]
    fn target_filter_contains_match_case_insensitive() {
        let aggregator = EventAggregator::new(&["find!".to_string()]);
        let deltas = vec![
            window_delta("find! test"),
            window_delta("other"),
            window_delta("FIND!abc"),
        ];
        let events = aggregator.merge(deltas, None);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].contact, "find! test");
        assert_eq!(events[1].contact, "FIND!abc");
    }

    #[test]
    fn empty_target_set_passes_all() {
        let aggregator = EventAggregator::new(&[]);
        let events = aggregator.merge(vec![window_delta("anyone")], Some(badge_delta(0, 2)));
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].contact, UNKNOWN_CONTACT);
        assert_eq!(events[1].detection_method, DetectionMethod::Badge);
        assert_eq!(events[1].raw_signal, "badge 0 -> 2");
    }

    #[test]
    fn same_tick_signals_for_one_contact_collapse() {
        let aggregator = EventAggregator::new(&[]);
        let events = aggregator.merge(
            vec![window_delta("张三 (1)"), window_delta("张三 (2)")],
            None,
        );
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].contact, "张三");
        // First detected wins.
        assert_eq!(events[0].raw_signal, "张三 (1)");
    }

    #[test]
    fn badge_event_filtered_when_targets_configured() {
        let aggregator = EventAggregator::new(&["张三".to_string()]);
        let events = aggregator.merge(Vec::new(), Some(badge_delta(1, 4)));
        assert!(events.is_empty());
    }

    #[test]
    fn unread_marker_stripped() {
        assert_eq!(resolve_contact("张三 (3)"), "张三");
        assert_eq!(resolve_contact("find! test (12)"), "find! test");
        assert_eq!(resolve_contact("张三"), "张三");
        assert_eq!(resolve_contact("group (beta)"), "group (beta)");
        assert_eq!(resolve_contact(" padded "), "padded");
    }
}
