//! Relay configuration
//!
//! One required setting: the destination topic for notifications. Its
//! absence is a startup-time failure, never a per-record one.

use crate::error::{RelayError, Result};

/// Environment variable naming the destination topic.
pub const TOPIC_ENV_VAR: &str = "NOTIFICATION_TOPIC";

/// Relay configuration.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Destination topic identifier for notifications
    pub topic: String,
}

impl RelayConfig {
    /// Create a config with an explicit topic.
    pub fn new(topic: impl Into<String>) -> Result<Self> {
        let topic = topic.into();
        if topic.trim().is_empty() {
            return Err(RelayError::config("notification topic must not be empty"));
        }
        Ok(Self { topic })
    }

    /// Resolve the config from the process environment.
    pub fn from_env() -> Result<Self> {
        let topic = std::env::var(TOPIC_ENV_VAR)
            .map_err(|_| RelayError::config(format!("{TOPIC_ENV_VAR} not set")))?;
        Self::new(topic)
    }
}
