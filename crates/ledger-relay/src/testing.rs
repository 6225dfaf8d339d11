//! Testing utilities
//!
//! A mock publisher for exercising the relay without an external pub/sub
//! service: scripts failures per attempt and records every successful
//! publish with its topic.

use crate::sink::{DeliveryError, TopicPublisher};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

/// In-memory publisher recording calls and replaying scripted failures.
#[derive(Debug, Default, Clone)]
pub struct MockPublisher {
    published: Arc<Mutex<Vec<(String, String)>>>,
    failures: Arc<Mutex<VecDeque<DeliveryError>>>,
    attempts: Arc<Mutex<u32>>,
}

impl MockPublisher {
    /// Create a publisher that accepts every publish.
    pub fn new() -> Self {
        Self::default()
    }

    /// Script failures for the next attempts, in order. Once the queue is
    /// drained, publishes succeed.
    pub fn fail_with(self, failures: Vec<DeliveryError>) -> Self {
        *self.failures.lock() = failures.into();
        self
    }

    /// Messages successfully published, as `(topic, message)` pairs in
    /// publish order.
    pub fn published(&self) -> Vec<(String, String)> {
        self.published.lock().clone()
    }

    /// Total publish attempts, including failed ones.
    pub fn attempt_count(&self) -> u32 {
        *self.attempts.lock()
    }
}

#[async_trait]
impl TopicPublisher for MockPublisher {
    async fn publish(&self, topic: &str, message: &str) -> Result<(), DeliveryError> {
        *self.attempts.lock() += 1;
        if let Some(err) = self.failures.lock().pop_front() {
            return Err(err);
        }
        self.published
            .lock()
            .push((topic.to_string(), message.to_string()));
        Ok(())
    }
}
