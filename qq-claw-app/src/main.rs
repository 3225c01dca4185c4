mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Command};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_target(false).init();

    let cli = Cli::parse();
    match cli.command {
        Command::Open => commands::open().await,
        Command::Read(args) => commands::read(args).await,
        Command::List => commands::list().await,
        Command::Search(args) => commands::search(args).await,
        Command::Reply(args) => commands::reply(args).await,
        Command::Monitor(args) => commands::monitor(args).await,
    }
}
