//! Batch driver
//!
//! Orchestrates one pass over one transport batch: deaggregate, then per
//! payload decode → classify → evaluate → publish. No per-record or
//! per-notification failure ever aborts the pass; redelivering a whole
//! batch would duplicate already-processed events, so retry granularity is
//! per notification and the batch always reports success at the transport
//! layer.

use crate::classify::{classify, ClassifiedRecord};
use crate::config::RelayConfig;
use crate::decode::decode;
use crate::rules::RuleSet;
use crate::sink::{NotificationSink, TopicPublisher};
use crate::transport::{deaggregate, Envelope};
use std::sync::Arc;
use tracing::{debug, warn};

/// Batch-level outcome reported to the transport layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchResult {
    /// Fixed success status; partial notification failures are observable
    /// only through logs.
    pub status_code: u16,
}

impl BatchResult {
    /// The one status the relay ever reports.
    pub fn success() -> Self {
        Self { status_code: 200 }
    }
}

/// The notification relay.
pub struct Relay {
    sink: NotificationSink,
    rules: RuleSet,
}

impl Relay {
    /// Create a relay with the default ruleset.
    pub fn new(config: RelayConfig, publisher: Arc<dyn TopicPublisher>) -> Self {
        Self::with_rules(config, publisher, RuleSet::default())
    }

    /// Create a relay with an explicit ruleset.
    pub fn with_rules(
        config: RelayConfig,
        publisher: Arc<dyn TopicPublisher>,
        rules: RuleSet,
    ) -> Self {
        Self {
            sink: NotificationSink::new(publisher, config.topic),
            rules,
        }
    }

    /// Process one transport batch, start to finish.
    ///
    /// A payload that fails to decode is logged and skipped. Records that
    /// are not revision details, or that do not satisfy any rule, are
    /// skipped silently. Publish failures are handled inside the sink and
    /// never abort the pass.
    pub async fn process(&self, batch: &[Envelope]) -> BatchResult {
        let payloads = deaggregate(batch);
        debug!(
            envelopes = batch.len(),
            records = payloads.len(),
            "processing batch"
        );

        for payload in payloads {
            let record = match decode(&payload) {
                Ok(record) => record,
                Err(e) => {
                    warn!(error = %e, "skipping undecodable record");
                    continue;
                }
            };

            let revision = match classify(record) {
                ClassifiedRecord::NotRevisionDetail => continue,
                ClassifiedRecord::RevisionDetail(revision) => revision,
            };

            if let Some(message) = self.rules.evaluate(&revision) {
                if let Err(e) = self.sink.send(&message).await {
                    warn!(error = %e, "notification dropped after retry");
                }
            }
        }

        BatchResult::success()
    }
}
