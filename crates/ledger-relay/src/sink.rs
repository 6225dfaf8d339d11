//! Notification sink
//!
//! Delivers a formatted message to a named topic through an injected
//! [`TopicPublisher`], with a bounded retry policy: two total attempts, an
//! immediate second attempt only when the first failure is one of the fixed
//! retryable kinds. Every outcome is logged; failures are returned to the
//! caller but never abort batch processing.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Delivery failures, split into the fixed retryable set (transient service
/// conditions) and everything else.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    /// Publisher throttled the request. Retryable.
    #[error("throttled: {0}")]
    Throttling(String),

    /// Service temporarily unavailable. Retryable.
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Request expired before the service accepted it. Retryable.
    #[error("request expired: {0}")]
    RequestExpired(String),

    /// Malformed publish parameters (bad topic, oversized message)
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Topic does not exist
    #[error("topic not found: {0}")]
    NotFound(String),

    /// Caller lacks permission on the topic
    #[error("access denied: {0}")]
    AccessDenied(String),

    /// Any other delivery failure
    #[error("delivery failed: {0}")]
    Other(String),
}

impl DeliveryError {
    /// Whether this failure kind is eligible for the single retry.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Throttling(_) | Self::ServiceUnavailable(_) | Self::RequestExpired(_)
        )
    }
}

/// Seam to the pub/sub service. Implementations must be safe for concurrent
/// use; the relay itself publishes sequentially within a batch.
#[async_trait]
pub trait TopicPublisher: Send + Sync {
    /// Publish one message to a topic. One attempt, no internal retry.
    async fn publish(&self, topic: &str, message: &str) -> Result<(), DeliveryError>;
}

/// A publisher that writes messages to the log, for local runs and demos.
#[derive(Debug, Default)]
pub struct StdoutPublisher;

#[async_trait]
impl TopicPublisher for StdoutPublisher {
    async fn publish(&self, topic: &str, message: &str) -> Result<(), DeliveryError> {
        println!("[{topic}] {message}");
        Ok(())
    }
}

/// Topic-bound sink with the bounded retry policy.
pub struct NotificationSink {
    publisher: Arc<dyn TopicPublisher>,
    topic: String,
}

impl NotificationSink {
    /// Two total attempts: the initial publish plus at most one retry.
    pub const MAX_ATTEMPTS: u32 = 2;

    /// Create a sink bound to a topic.
    pub fn new(publisher: Arc<dyn TopicPublisher>, topic: impl Into<String>) -> Self {
        Self {
            publisher,
            topic: topic.into(),
        }
    }

    /// Topic this sink publishes to.
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Deliver one message.
    ///
    /// Retries immediately once on a retryable first-attempt failure. A
    /// non-retryable failure stops at once. Returns the last failure when
    /// both attempts are exhausted.
    pub async fn send(&self, message: &str) -> Result<(), DeliveryError> {
        let mut last_error = None;
        for attempt in 1..=Self::MAX_ATTEMPTS {
            match self.publisher.publish(&self.topic, message).await {
                Ok(()) => {
                    info!(topic = %self.topic, attempt, notification = message, "notification published");
                    return Ok(());
                }
                Err(e) if e.is_retryable() && attempt < Self::MAX_ATTEMPTS => {
                    warn!(topic = %self.topic, attempt, error = %e, "retryable delivery failure");
                    last_error = Some(e);
                }
                Err(e) => {
                    warn!(topic = %self.topic, attempt, error = %e, "delivery failed");
                    return Err(e);
                }
            }
        }
        // Both attempts failed on retryable errors.
        Err(last_error.unwrap_or_else(|| DeliveryError::Other("retry exhausted".to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockPublisher;

    #[test]
    fn test_retryable_set_is_closed() {
        assert!(DeliveryError::Throttling("t".into()).is_retryable());
        assert!(DeliveryError::ServiceUnavailable("s".into()).is_retryable());
        assert!(DeliveryError::RequestExpired("r".into()).is_retryable());

        assert!(!DeliveryError::InvalidParameter("i".into()).is_retryable());
        assert!(!DeliveryError::NotFound("n".into()).is_retryable());
        assert!(!DeliveryError::AccessDenied("a".into()).is_retryable());
        assert!(!DeliveryError::Other("o".into()).is_retryable());
    }

    #[tokio::test]
    async fn test_send_success_first_attempt() {
        let publisher = Arc::new(MockPublisher::new());
        let sink = NotificationSink::new(publisher.clone(), "registration-topic");

        sink.send("New User Registered. Name: Nova Lewis").await.unwrap();

        assert_eq!(publisher.attempt_count(), 1);
        assert_eq!(
            publisher.published(),
            vec![(
                "registration-topic".to_string(),
                "New User Registered. Name: Nova Lewis".to_string()
            )]
        );
    }

    #[tokio::test]
    async fn test_send_retries_once_per_retryable_kind() {
        for error in [
            DeliveryError::Throttling("slow down".into()),
            DeliveryError::ServiceUnavailable("503".into()),
            DeliveryError::RequestExpired("too old".into()),
        ] {
            let publisher = Arc::new(MockPublisher::new().fail_with(vec![error]));
            let sink = NotificationSink::new(publisher.clone(), "registration-topic");

            sink.send("msg").await.unwrap();
            assert_eq!(publisher.attempt_count(), 2);
        }
    }

    #[tokio::test]
    async fn test_send_non_retryable_stops_immediately() {
        let publisher = Arc::new(
            MockPublisher::new().fail_with(vec![DeliveryError::AccessDenied("no".into())]),
        );
        let sink = NotificationSink::new(publisher.clone(), "registration-topic");

        let err = sink.send("msg").await.unwrap_err();
        assert_eq!(err, DeliveryError::AccessDenied("no".into()));
        assert_eq!(publisher.attempt_count(), 1);
    }

    #[tokio::test]
    async fn test_send_exhausts_both_attempts() {
        let publisher = Arc::new(MockPublisher::new().fail_with(vec![
            DeliveryError::Throttling("first".into()),
            DeliveryError::Throttling("second".into()),
        ]));
        let sink = NotificationSink::new(publisher.clone(), "registration-topic");

        let err = sink.send("msg").await.unwrap_err();
        assert_eq!(err, DeliveryError::Throttling("second".into()));
        assert_eq!(publisher.attempt_count(), 2);
    }
}
