//! Monitoring session configuration.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must not be negative (got {1})")]
    Negative(&'static str, i64),
    #[error("poll interval must be at least 1 second")]
    PollTooShort,
    #[error("target filter entries must not be empty")]
    EmptyTarget,
    #[error("auto-reply text must not be empty")]
    EmptyReply,
}

/// Everything the monitor loop needs, validated once before it starts.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Contact substring filters; empty means all contacts.
    pub targets: Vec<String>,
    /// Reply text; `None` means observation-only.
    pub auto_reply: Option<String>,
    /// Base reply delay in seconds.
    pub base_delay: i64,
    /// Random delay jitter in seconds (sampled in ±jitter).
    pub jitter: i64,
    /// Poll interval in seconds.
    pub poll_interval: i64,
    /// Reply cap for the session; 0 means unlimited.
    pub max_replies: i64,
    /// Type replies without sending them.
    pub dry_run: bool,
    /// Seed for the delay sampler; `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            targets: Vec::new(),
            auto_reply: None,
            base_delay: 15,
            jitter: 5,
            poll_interval: 5,
            max_replies: 0,
            dry_run: false,
            seed: None,
        }
    }
}

impl MonitorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_delay < 0 {
            return Err(ConfigError::Negative("delay", self.base_delay));
        }
        if self.jitter < 0 {
            return Err(ConfigError::Negative("jitter", self.jitter));
        }
        if self.max_replies < 0 {
            return Err(ConfigError::Negative("max-replies", self.max_replies));
        }
        if self.poll_interval < 1 {
            return Err(ConfigError::PollTooShort);
        }
        if self.targets.iter().any(|t| t.trim().is_empty()) {
            return Err(ConfigError::EmptyTarget);
        }
        if let Some(reply) = &self.auto_reply {
            if reply.trim().is_empty() {
                return Err(ConfigError::EmptyReply);
            }
        }
        Ok(())
    }
}
