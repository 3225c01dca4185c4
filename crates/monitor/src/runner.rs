//! The tick-driven monitoring loop.

use crate::aggregator::EventAggregator;
use crate::badge_observer::BadgeObserver;
use crate::config::MonitorConfig;
use crate::event_log::{EventLog, EventLogError, LogAction, LogRecord};
use crate::scheduler::{Disposition, ReplyScheduler, ReplyTask};
use crate::window_observer::WindowObserver;
use chrono::{DateTime, Utc};
use qq_claw_automation::traits::{BadgeReader, MessageSender, WindowLister};
use std::future::Future;
use std::sync::Arc;
use tokio::time::{interval, Duration, MissedTickBehavior};

/// Totals reported when the loop stops.
#[derive(Debug, Clone, Copy, Default)]
pub struct MonitorSummary {
    pub events_recorded: u64,
    pub replies_fired: i64,
    pub cancelled: usize,
}

/// Wires observers, aggregator, scheduler and log into one loop. The loop
/// thread owns every piece of mutable state exclusively.
pub struct Monitor {
    config: MonitorConfig,
    windows: WindowObserver,
    badge: BadgeObserver,
    aggregator: EventAggregator,
    scheduler: ReplyScheduler,
    log: EventLog,
    lister: Arc<dyn WindowLister>,
    badge_reader: Arc<dyn BadgeReader>,
    sender: Arc<dyn MessageSender>,
    events_recorded: u64,
}

impl Monitor {
    pub fn new(
        config: MonitorConfig,
        log: EventLog,
        lister: Arc<dyn WindowLister>,
        badge_reader: Arc<dyn BadgeReader>,
        sender: Arc<dyn MessageSender>,
    ) -> Self {
        Self {
            aggregator: EventAggregator::new(&config.targets),
            scheduler: ReplyScheduler::new(&config),
            windows: WindowObserver::new(),
            badge: BadgeObserver::new(),
            config,
            log,
            lister,
            badge_reader,
            sender,
            events_recorded: 0,
        }
    }

    /// Run until `shutdown` resolves. An in-flight tick always completes
    /// before shutdown handling begins, and no task fires afterwards.
    pub async fn run<F>(&mut self, shutdown: F) -> Result<MonitorSummary, EventLogError>
    where
        F: Future<Output = ()>,
    {
        let mut ticker = interval(Duration::from_secs(self.config.poll_interval as u64));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.tick(Utc::now()).await?;
                }
                _ = &mut shutdown => {
                    tracing::info!("stop signal received, shutting down");
                    break;
                }
            }
        }

        self.finish()
    }

    /// One poll-diff-schedule-fire cycle. Public so tests drive time
    /// explicitly instead of sleeping.
    pub async fn tick(&mut self, now: DateTime<Utc>) -> Result<(), EventLogError> {
        // Poll. A failed OS query is a soft failure: log, retry next tick.
        let window_deltas = match self.lister.list().await {
            Ok(windows) => self.windows.observe(windows, now),
            Err(err) => {
                tracing::warn!("window query failed: {err}");
                Vec::new()
            }
        };
        let badge_delta = match self.badge_reader.read().await {
            Ok(count) => self.badge.observe(count, now),
            Err(err) => {
                tracing::warn!("badge query failed: {err}");
                None
            }
        };

        for event in self.aggregator.merge(window_deltas, badge_delta) {
            self.events_recorded += 1;
            let disposition = self.scheduler.admit(&event, now);
            let (action, delay_used) = match disposition {
                Disposition::Observed => (LogAction::Observed, None),
                Disposition::Scheduled { delay } => (LogAction::Scheduled, Some(delay)),
                Disposition::Dropped => (LogAction::Dropped, None),
            };
            match action {
                LogAction::Scheduled => tracing::info!(
                    "new message from {} ({}), reply in {:.1}s",
                    event.contact,
                    event.raw_signal,
                    delay_used.unwrap_or_default()
                ),
                LogAction::Dropped => {
                    tracing::info!("new message from {}, reply cap reached", event.contact)
                }
                _ => tracing::info!(
                    "new message from {} ({})",
                    event.contact,
                    event.raw_signal
                ),
            }
            self.record(&event.contact, event.detection_method, action, delay_used, None)?;
        }

        for task in self.scheduler.take_due(now) {
            self.fire(task).await?;
        }

        Ok(())
    }

    async fn fire(&mut self, task: ReplyTask) -> Result<(), EventLogError> {
        // A task only exists when reply text is configured.
        let text = self.scheduler.reply_text().unwrap_or_default().to_string();

        let result = match self.sender.activate(&task.event.contact).await {
            Ok(()) => self.sender.send(&text, task.dry_run).await,
            Err(err) => Err(err),
        };

        // The cap governs automation volume: dry runs and failures both
        // consume a slot.
        self.scheduler.mark_fired();

        match result {
            Ok(()) => {
                tracing::info!("replied to {}", task.event.contact);
                self.record(
                    &task.event.contact,
                    task.event.detection_method,
                    LogAction::Sent,
                    Some(task.delay_used),
                    None,
                )
            }
            Err(err) => {
                tracing::warn!("reply to {} failed: {err}", task.event.contact);
                self.record(
                    &task.event.contact,
                    task.event.detection_method,
                    LogAction::Failed,
                    Some(task.delay_used),
                    Some(err.to_string()),
                )
            }
        }
    }

    /// Cancel whatever is still pending and report session totals. Called
    /// after the final tick; nothing fires past this point.
    pub fn finish(&mut self) -> Result<MonitorSummary, EventLogError> {
        let cancelled = self.scheduler.cancel_pending();
        for task in &cancelled {
            tracing::info!("cancelled pending reply to {}", task.event.contact);
            self.record(
                &task.event.contact,
                task.event.detection_method,
                LogAction::Cancelled,
                Some(task.delay_used),
                None,
            )?;
        }
        Ok(MonitorSummary {
            events_recorded: self.events_recorded,
            replies_fired: self.scheduler.reply_count(),
            cancelled: cancelled.len(),
        })
    }

    fn record(
        &self,
        contact: &str,
        detection_method: crate::events::DetectionMethod,
        action: LogAction,
        delay_used: Option<f64>,
        error: Option<String>,
    ) -> Result<(), EventLogError> {
        self.log.record(&LogRecord {
            timestamp: Utc::now(),
            contact: contact.to_string(),
            detection_method,
            action,
            delay_used,
            dry_run: self.config.dry_run,
            error,
        })
    }
}
