//! # ledger-relay - Journal-Stream Notification Relay
//!
//! Consumes aggregated journal-stream records from a ledger's change-data
//! stream and publishes a human-readable notification for each first-version
//! insert into a watched table.
//!
//! ## Architecture
//!
//! ```text
//! transport batch
//!       │
//!       ▼
//! ┌────────────────┐   ┌──────────┐   ┌────────────┐   ┌───────────┐
//! │ Deaggregator   │──▶│ Decoder  │──▶│ Classifier │──▶│ RuleSet   │
//! │ (per envelope) │   │ (CBOR)   │   │ (revision?)│   │ (insert?) │
//! └────────────────┘   └──────────┘   └────────────┘   └─────┬─────┘
//!                                                            │ message
//!                                                            ▼
//!                                                   ┌─────────────────┐
//!                                                   │ NotificationSink│
//!                                                   │ (2 attempts)    │
//!                                                   └─────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! use ledger_relay::{Relay, RelayConfig, StdoutPublisher};
//! use std::sync::Arc;
//!
//! let config = RelayConfig::from_env()?;
//! let relay = Relay::new(config, Arc::new(StdoutPublisher));
//!
//! let batch = vec![]; // envelopes from the stream transport
//! let result = relay.process(&batch).await;
//! assert_eq!(result.status_code, 200);
//! # Ok(())
//! # }
//! ```
//!
//! Every per-record failure is skip-and-continue: a malformed payload, a
//! non-revision record or a failed delivery never aborts the batch, which
//! always reports success at the transport layer.

pub mod classify;
pub mod config;
pub mod decode;
pub mod error;
pub mod relay;
pub mod rules;
pub mod sink;
pub mod testing;
pub mod transport;
pub mod value;

pub use classify::{classify, ClassifiedRecord, RevisionDetail, TableInfo};
pub use config::RelayConfig;
pub use decode::decode;
pub use error::{RelayError, Result};
pub use relay::{BatchResult, Relay};
pub use rules::{RuleSet, TableRule};
pub use sink::{DeliveryError, NotificationSink, StdoutPublisher, TopicPublisher};
pub use transport::{deaggregate, Envelope};
pub use value::Value;
