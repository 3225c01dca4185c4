use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "qq-claw")]
#[command(about = "Automated message watching and replying for the QQ desktop client", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Launch QQ or bring it to the foreground
    Open,
    /// Screenshot the current chat window
    Read(ReadArgs),
    /// Switch to the session list and screenshot it
    List,
    /// Search a contact or group and open its chat
    Search(SearchArgs),
    /// Send a message in the current chat window
    Reply(ReplyArgs),
    /// Watch for new messages and auto-reply
    Monitor(MonitorArgs),
}

#[derive(Debug, Args)]
pub struct ReadArgs {
    /// Output file path (defaults to a timestamped file under screenshots/)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Contact or group name to search for
    #[arg(long)]
    pub name: String,
}

#[derive(Debug, Args)]
pub struct ReplyArgs {
    /// Message text to send
    #[arg(short, long)]
    pub message: String,
    /// Type the message without sending it
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}

#[derive(Debug, Args)]
pub struct MonitorArgs {
    /// Only react to contacts containing this substring (repeatable)
    #[arg(short, long = "target")]
    pub target: Vec<String>,
    /// Reply text; omit to only record events
    #[arg(short = 'r', long = "auto-reply")]
    pub auto_reply: Option<String>,
    /// Reply delay in seconds
    #[arg(long, default_value_t = 15, allow_negative_numbers = true)]
    pub delay: i64,
    /// Random delay jitter in seconds (±)
    #[arg(long, default_value_t = 5, allow_negative_numbers = true)]
    pub jitter: i64,
    /// Poll interval in seconds
    #[arg(long, default_value_t = 5, allow_negative_numbers = true)]
    pub poll: i64,
    /// Maximum number of replies this session, 0 = unlimited
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub max_replies: i64,
    /// Type replies without sending them
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
    /// Seed for the delay sampler (deterministic runs)
    #[arg(long)]
    pub seed: Option<u64>,
    /// Event log path
    #[arg(long, default_value = "logs/events.jsonl")]
    pub log: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monitor_defaults_match_documented_values() {
        let cli = Cli::try_parse_from(["qq-claw", "monitor"]).unwrap();
        let Command::Monitor(args) = cli.command else {
            panic!("expected monitor command");
        };
        assert!(args.target.is_empty());
        assert!(args.auto_reply.is_none());
        assert_eq!(args.delay, 15);
        assert_eq!(args.jitter, 5);
        assert_eq!(args.poll, 5);
        assert_eq!(args.max_replies, 0);
        assert!(!args.dry_run);
        assert_eq!(args.log, PathBuf::from("logs/events.jsonl"));
    }

    #[test]
    fn monitor_accepts_repeated_targets_and_short_flags() {
        let cli = Cli::try_parse_from([
            "qq-claw", "monitor", "-t", "find!", "-t", "张三", "-r", "收到", "--dry-run",
        ])
        .unwrap();
        let Command::Monitor(args) = cli.command else {
            panic!("expected monitor command");
        };
        assert_eq!(args.target, ["find!", "张三"]);
        assert_eq!(args.auto_reply.as_deref(), Some("收到"));
        assert!(args.dry_run);
    }

    #[test]
    fn negative_delay_parses_for_validation_to_reject() {
        let cli = Cli::try_parse_from(["qq-claw", "monitor", "--delay", "-3"]).unwrap();
        let Command::Monitor(args) = cli.command else {
            panic!("expected monitor command");
        };
        assert_eq!(args.delay, -3);
    }

    #[test]
    fn reply_requires_message() {
        assert!(Cli::try_parse_from(["qq-claw", "reply"]).is_err());
        let cli = Cli::try_parse_from(["qq-claw", "reply", "-m", "你好"]).unwrap();
        assert!(matches!(cli.command, Command::Reply(_)));
    }
}
