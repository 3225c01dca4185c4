//! Reply scheduling: delay sampling, the reply cap, and the pending queue.

use crate::config::MonitorConfig;
use crate::events::{MessageEvent, UNKNOWN_CONTACT};
use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Lifecycle of a reply task. `pending` is the only non-terminal state and
/// is never re-entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    Fired,
    Cancelled,
    Dropped,
}

/// A reply waiting for its fire time.
#[derive(Debug, Clone)]
pub struct ReplyTask {
    pub event: MessageEvent,
    pub fire_at: DateTime<Utc>,
    pub delay_used: f64,
    pub status: TaskStatus,
    pub dry_run: bool,
}

/// What the scheduler decided for one qualifying event.
#[derive(Debug, Clone, PartialEq)]
pub enum Disposition {
    /// Recorded only: observation mode, or no addressable contact.
    Observed,
    /// Task enqueued with the sampled delay in seconds.
    Scheduled { delay: f64 },
    /// Reply cap reached; the event never enters the queue.
    Dropped,
}

/// Owns the pending queue, the reply counter, and the delay sampler. The
/// single loop thread owns this exclusively, so there is no locking.
pub struct ReplyScheduler {
    reply_text: Option<String>,
    base_delay: f64,
    jitter: f64,
    max_replies: i64,
    dry_run: bool,
    /// Pending tasks kept sorted by `fire_at`.
    queue: Vec<ReplyTask>,
    fired: i64,
    rng: StdRng,
}

impl ReplyScheduler {
    pub fn new(config: &MonitorConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            reply_text: config.auto_reply.clone(),
            base_delay: config.base_delay as f64,
            jitter: config.jitter as f64,
            max_replies: config.max_replies,
            dry_run: config.dry_run,
            queue: Vec::new(),
            fired: 0,
            rng,
        }
    }

    pub fn reply_text(&self) -> Option<&str> {
        self.reply_text.as_deref()
    }

    /// Replies committed so far (fired tasks, dry-run included).
    pub fn reply_count(&self) -> i64 {
        self.fired
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// The cap counts fired plus still-pending tasks, so several events
    /// qualifying in one tick cannot overshoot it.
    fn cap_reached(&self) -> bool {
        self.max_replies > 0 && self.fired + self.queue.len() as i64 >= self.max_replies
    }

    /// Decide what to do with a qualifying event. Badge-only events resolve
    /// to no addressable contact and are recorded without a task.
    pub fn admit(&mut self, event: &MessageEvent, now: DateTime<Utc>) -> Disposition {
        if self.reply_text.is_none() || event.contact == UNKNOWN_CONTACT {
            return Disposition::Observed;
        }
        if self.cap_reached() {
            return Disposition::Dropped;
        }

        let delay = self.sample_delay();
        let fire_at = now + Duration::milliseconds((delay * 1000.0).round() as i64);
        let task = ReplyTask {
            event: event.clone(),
            fire_at,
            delay_used: delay,
            status: TaskStatus::Pending,
            dry_run: self.dry_run,
        };
        let position = self.queue.partition_point(|t| t.fire_at <= fire_at);
        self.queue.insert(position, task);

        Disposition::Scheduled { delay }
    }

    /// Sample `base ± jitter`, clipped to non-negative seconds.
    fn sample_delay(&mut self) -> f64 {
        let offset = if self.jitter > 0.0 {
            self.rng.gen_range(-self.jitter..=self.jitter)
        } else {
            0.0
        };
        (self.base_delay + offset).max(0.0)
    }

    /// Remove and return every task due at `now`, in fire order.
    pub fn take_due(&mut self, now: DateTime<Utc>) -> Vec<ReplyTask> {
        let split = self.queue.partition_point(|t| t.fire_at <= now);
        let mut due: Vec<ReplyTask> = self.queue.drain(..split).collect();
        for task in &mut due {
            task.status = TaskStatus::Fired;
        }
        due
    }

    /// Count a fired task against the cap, dry-run or not, success or not.
    pub fn mark_fired(&mut self) {
        self.fired += 1;
    }

    /// Drain the queue at shutdown, marking everything cancelled.
    pub fn cancel_pending(&mut self) -> Vec<ReplyTask> {
        self.queue
            .drain(..)
            .map(|mut task| {
                task.status = TaskStatus::Cancelled;
                task
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::DetectionMethod;

    fn event(contact: &str) -> MessageEvent {
        MessageEvent {
            contact: contact.to_string(),
            detection_method: DetectionMethod::Window,
            detected_at: Utc::now(),
            raw_signal: contact.to_string(),
        }
    }

    fn config(reply: Option<&str>) -> MonitorConfig {
        MonitorConfig {
            auto_reply: reply.map(str::to_string),
            seed: Some(7),
            ..MonitorConfig::default()
        }
    }

    #[test]
    fn observation_mode_never_schedules() {
        let mut scheduler = ReplyScheduler::new(&config(None));
        let disposition = scheduler.admit(&event("张三"), Utc::now());
        assert_eq!(disposition, Disposition::Observed);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn unknown_contact_is_observed_only() {
        let mut scheduler = ReplyScheduler::new(&config(Some("on my way")));
        let disposition = scheduler.admit(&event(UNKNOWN_CONTACT), Utc::now());
        assert_eq!(disposition, Disposition::Observed);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn fire_at_never_precedes_detection() {
        let mut scheduler = ReplyScheduler::new(&config(Some("on my way")));
        let now = Utc::now();
        scheduler.admit(&event("张三"), now);
        assert!(scheduler.queue[0].fire_at >= now);
    }

    #[test]
    fn cap_counts_pending_tasks_in_the_same_tick() {
        let mut cfg = config(Some("on my way"));
        cfg.max_replies = 1;
        let mut scheduler = ReplyScheduler::new(&cfg);
        let now = Utc::now();

        assert!(matches!(
            scheduler.admit(&event("张三"), now),
            Disposition::Scheduled { .. }
        ));
        assert_eq!(scheduler.admit(&event("李四"), now), Disposition::Dropped);
        assert_eq!(scheduler.pending(), 1);
    }

    #[test]
    fn cap_zero_is_unlimited() {
        let mut scheduler = ReplyScheduler::new(&config(Some("on my way")));
        let now = Utc::now();
        for i in 0..100 {
            let disposition = scheduler.admit(&event(&format!("contact{i}")), now);
            assert!(matches!(disposition, Disposition::Scheduled { .. }));
        }
        assert_eq!(scheduler.pending(), 100);
    }

    #[test]
    fn sampled_delays_stay_within_jitter_bounds() {
        let mut cfg = config(Some("on my way"));
        cfg.base_delay = 10;
        cfg.jitter = 5;
        let mut scheduler = ReplyScheduler::new(&cfg);

        let mut low = 0;
        let mut high = 0;
        for _ in 0..1000 {
            let delay = scheduler.sample_delay();
            assert!((5.0..=15.0).contains(&delay), "delay {delay} out of bounds");
            if delay < 10.0 {
                low += 1;
            } else {
                high += 1;
            }
        }
        // Roughly uniform: both halves well populated.
        assert!(low > 300, "only {low} samples below the midpoint");
        assert!(high > 300, "only {high} samples above the midpoint");
    }

    #[test]
    fn delay_clipped_to_non_negative() {
        let mut cfg = config(Some("on my way"));
        cfg.base_delay = 1;
        cfg.jitter = 10;
        let mut scheduler = ReplyScheduler::new(&cfg);
        for _ in 0..1000 {
            assert!(scheduler.sample_delay() >= 0.0);
        }
    }

    #[test]
    fn seeded_sampler_is_deterministic() {
        let mut a = ReplyScheduler::new(&config(Some("x")));
        let mut b = ReplyScheduler::new(&config(Some("x")));
        for _ in 0..50 {
            assert_eq!(a.sample_delay(), b.sample_delay());
        }
    }

    #[test]
    fn take_due_respects_fire_order_and_leaves_future_tasks() {
        let mut cfg = config(Some("on my way"));
        cfg.base_delay = 0;
        cfg.jitter = 0;
        let mut scheduler = ReplyScheduler::new(&cfg);
        let now = Utc::now();

        scheduler.admit(&event("张三"), now);
        scheduler.admit(&event("李四"), now + Duration::seconds(30));

        let due = scheduler.take_due(now);
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].event.contact, "张三");
        assert_eq!(due[0].status, TaskStatus::Fired);
        assert_eq!(scheduler.pending(), 1);
    }

    #[test]
    fn cancel_pending_drains_everything() {
        let mut scheduler = ReplyScheduler::new(&config(Some("on my way")));
        let now = Utc::now();
        scheduler.admit(&event("张三"), now);
        scheduler.admit(&event("李四"), now);

        let cancelled = scheduler.cancel_pending();
        assert_eq!(cancelled.len(), 2);
        assert!(cancelled.iter().all(|t| t.status == TaskStatus::Cancelled));
        assert_eq!(scheduler.pending(), 0);
    }
}
