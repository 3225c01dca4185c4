//! The `monitor` command: wire the live collaborators into the core loop.

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use qq_claw_automation::app;
use qq_claw_automation::traits::{QqBadgeReader, QqMessageSender, QqWindowLister};
use qq_claw_monitor::{EventLog, Monitor, MonitorConfig};

use crate::cli::MonitorArgs;

pub async fn monitor(args: MonitorArgs) -> Result<()> {
    let config = MonitorConfig {
        targets: args.target,
        auto_reply: args.auto_reply,
        base_delay: args.delay,
        jitter: args.jitter,
        poll_interval: args.poll,
        max_replies: args.max_replies,
        dry_run: args.dry_run,
        seed: args.seed,
    };
    config.validate().context("invalid configuration")?;

    if !app::is_running().await {
        bail!("QQ is not running; start it with `qq-claw open`");
    }

    println!("QQ message monitor started");
    println!(
        "  targets:     {}",
        if config.targets.is_empty() {
            "all contacts".to_string()
        } else {
            config.targets.join(", ")
        }
    );
    println!(
        "  auto-reply:  {}",
        config.auto_reply.as_deref().unwrap_or("off (recording only)")
    );
    println!("  delay:       {}s ± {}s", config.base_delay, config.jitter);
    println!("  poll:        {}s", config.poll_interval);
    println!(
        "  max replies: {}",
        if config.max_replies == 0 {
            "unlimited".to_string()
        } else {
            config.max_replies.to_string()
        }
    );
    println!("  dry-run:     {}", config.dry_run);
    println!("  event log:   {}", args.log.display());
    println!("Press Ctrl+C to stop\n");

    let log = EventLog::new(&args.log).context("failed to open the event log")?;
    let mut monitor = Monitor::new(
        config,
        log,
        Arc::new(QqWindowLister),
        Arc::new(QqBadgeReader),
        Arc::new(QqMessageSender),
    );

    let summary = monitor
        .run(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    println!(
        "\nmonitor stopped: {} events recorded, {} replies fired, {} cancelled",
        summary.events_recorded, summary.replies_fired, summary.cancelled
    );
    Ok(())
}
