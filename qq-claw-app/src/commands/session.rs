//! One-shot session commands: open, read, list, search, reply.

use anyhow::{bail, Context, Result};
use qq_claw_automation::search as contact_search;
use qq_claw_automation::{app, input, screen, windows};
use tokio::time::{sleep, Duration};

use crate::cli::{ReadArgs, ReplyArgs, SearchArgs};

pub async fn open() -> Result<()> {
    if app::is_running().await {
        tracing::info!("QQ already running, activating");
        app::activate().await?;
    } else {
        tracing::info!("launching QQ");
        app::launch().await?;
    }
    Ok(())
}

pub async fn read(args: ReadArgs) -> Result<()> {
    let path = screen::capture_qq_window(args.output.as_deref())
        .await
        .context("failed to capture the chat window")?;
    println!("{}", path.display());
    Ok(())
}

pub async fn list() -> Result<()> {
    app::activate().await?;
    // Cmd+1 switches the main panel to the message list.
    input::keystroke("1", true).await?;
    sleep(Duration::from_millis(500)).await;
    let path = screen::capture_qq_window(None)
        .await
        .context("failed to capture the session list")?;
    println!("{}", path.display());
    Ok(())
}

pub async fn search(args: SearchArgs) -> Result<()> {
    match contact_search::open_contact(&args.name).await? {
        Some(win) => tracing::info!("opened chat window: {}", win.title),
        None => tracing::warn!("search ran but no chat window was detected"),
    }
    Ok(())
}

pub async fn reply(args: ReplyArgs) -> Result<()> {
    if !app::is_running().await {
        bail!("QQ is not running; start it with `qq-claw open`");
    }
    app::activate().await?;

    match windows::find_chat_window().await? {
        Some(win) => {
            tracing::info!("using chat window: {}", win.title);
            windows::raise_window(&win.title).await?;
            let (x, y) = win.input_point();
            input::click_at(x, y).await?;
        }
        None => {
            tracing::warn!("no chat window found, typing into the front window");
            if let Some(win) = windows::main_window().await? {
                let (x, y) = win.input_point();
                input::click_at(x, y).await?;
            }
        }
    }

    input::paste_text(&args.message).await?;
    if args.dry_run {
        println!("typed, not sent (dry-run)");
        return Ok(());
    }
    input::press_return().await?;
    println!("sent");
    Ok(())
}
