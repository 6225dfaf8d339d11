//! Transport envelopes and batch deaggregation
//!
//! The host delivers a batch of envelopes, each carrying a base64-encoded
//! byte payload and an `aggregated` flag. An aggregated envelope packs
//! multiple logical records for efficiency as a sequence of length-prefixed
//! frames (4-byte big-endian length, then the record body). Deaggregation
//! expands the batch into the flat ordered sequence of individual payloads,
//! preserving submission order.
//!
//! Base64 belongs to this transport boundary; the record decoder only ever
//! sees raw binary.

use crate::error::{RelayError, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// One transport-level record as delivered by the host environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    /// Base64-encoded payload bytes
    pub data: String,

    /// Whether `data` packs multiple logical records
    #[serde(default)]
    pub aggregated: bool,

    /// Shard routing key, carried for log context only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partition_key: Option<String>,

    /// Transport sequence number, carried for log context only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence_number: Option<String>,
}

impl Envelope {
    /// Create a non-aggregated envelope from raw payload bytes.
    pub fn single(payload: &[u8]) -> Self {
        Self {
            data: STANDARD.encode(payload),
            aggregated: false,
            partition_key: None,
            sequence_number: None,
        }
    }

    /// Create an aggregated envelope packing the given records in order.
    pub fn aggregated(records: &[&[u8]]) -> Self {
        let mut packed = Vec::new();
        for record in records {
            packed.extend_from_slice(&(record.len() as u32).to_be_bytes());
            packed.extend_from_slice(record);
        }
        Self {
            data: STANDARD.encode(packed),
            aggregated: true,
            partition_key: None,
            sequence_number: None,
        }
    }

    /// Expand this envelope into its logical record payloads, in original
    /// sub-sequence order. A non-aggregated envelope yields exactly one.
    pub fn expand(&self) -> Result<Vec<Bytes>> {
        let raw = STANDARD
            .decode(&self.data)
            .map_err(|e| RelayError::envelope(format!("base64: {e}")))?;

        if !self.aggregated {
            return Ok(vec![Bytes::from(raw)]);
        }

        let mut payloads = Vec::new();
        let mut rest = &raw[..];
        while !rest.is_empty() {
            if rest.len() < 4 {
                return Err(RelayError::envelope("truncated frame header"));
            }
            let len = u32::from_be_bytes([rest[0], rest[1], rest[2], rest[3]]) as usize;
            rest = &rest[4..];
            if rest.len() < len {
                return Err(RelayError::envelope(format!(
                    "truncated frame body: want {len}, have {}",
                    rest.len()
                )));
            }
            payloads.push(Bytes::copy_from_slice(&rest[..len]));
            rest = &rest[len..];
        }
        Ok(payloads)
    }
}

/// Expand a batch of envelopes into the flat ordered sequence of record
/// payloads. Empty input yields empty output. A structurally invalid
/// envelope is logged and skipped so the rest of the batch survives.
pub fn deaggregate(envelopes: &[Envelope]) -> Vec<Bytes> {
    let mut payloads = Vec::with_capacity(envelopes.len());
    for envelope in envelopes {
        match envelope.expand() {
            Ok(records) => payloads.extend(records),
            Err(e) => {
                warn!(
                    partition_key = envelope.partition_key.as_deref().unwrap_or(""),
                    error = %e,
                    "skipping invalid envelope"
                );
            }
        }
    }
    payloads
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_envelope_roundtrip() {
        let envelope = Envelope::single(b"record-1");
        let payloads = envelope.expand().unwrap();
        assert_eq!(payloads, vec![Bytes::from_static(b"record-1")]);
    }

    #[test]
    fn test_aggregated_envelope_preserves_order() {
        let envelope = Envelope::aggregated(&[b"alpha", b"beta", b"gamma"]);
        let payloads = envelope.expand().unwrap();
        assert_eq!(
            payloads,
            vec![
                Bytes::from_static(b"alpha"),
                Bytes::from_static(b"beta"),
                Bytes::from_static(b"gamma"),
            ]
        );
    }

    #[test]
    fn test_deaggregate_flattens_in_order() {
        let batch = vec![
            Envelope::aggregated(&[b"a", b"b"]),
            Envelope::single(b"c"),
            Envelope::aggregated(&[b"d"]),
        ];
        let payloads = deaggregate(&batch);
        assert_eq!(
            payloads,
            vec![
                Bytes::from_static(b"a"),
                Bytes::from_static(b"b"),
                Bytes::from_static(b"c"),
                Bytes::from_static(b"d"),
            ]
        );
    }

    #[test]
    fn test_deaggregate_empty_batch() {
        assert!(deaggregate(&[]).is_empty());
    }

    #[test]
    fn test_bad_base64_rejected() {
        let envelope = Envelope {
            data: "not base64 !!!".to_string(),
            aggregated: false,
            partition_key: None,
            sequence_number: None,
        };
        assert!(matches!(
            envelope.expand(),
            Err(RelayError::InvalidEnvelope(_))
        ));
    }

    #[test]
    fn test_truncated_frame_rejected() {
        // Header claims 10 bytes, body has 3
        let mut packed = 10u32.to_be_bytes().to_vec();
        packed.extend_from_slice(b"abc");
        let envelope = Envelope {
            data: STANDARD.encode(packed),
            aggregated: true,
            partition_key: None,
            sequence_number: None,
        };
        assert!(matches!(
            envelope.expand(),
            Err(RelayError::InvalidEnvelope(_))
        ));
    }

    #[test]
    fn test_deaggregate_skips_invalid_envelope() {
        let batch = vec![
            Envelope::single(b"good"),
            Envelope {
                data: "!!!".to_string(),
                aggregated: false,
                partition_key: Some("shard-0".to_string()),
                sequence_number: None,
            },
            Envelope::single(b"also-good"),
        ];
        let payloads = deaggregate(&batch);
        assert_eq!(
            payloads,
            vec![Bytes::from_static(b"good"), Bytes::from_static(b"also-good")]
        );
    }

    #[test]
    fn test_envelope_json_shape() {
        let json = r#"{
            "data": "aGVsbG8=",
            "aggregated": false,
            "partition_key": "shard-1",
            "sequence_number": "49602202223557391954992952781210718954161044299731435522"
        }"#;
        let envelope: Envelope = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.expand().unwrap(), vec![Bytes::from_static(b"hello")]);
    }

    #[test]
    fn test_envelope_defaults() {
        let envelope: Envelope = serde_json::from_str(r#"{"data": ""}"#).unwrap();
        assert!(!envelope.aggregated);
        // Empty payload is a valid single record at the transport layer;
        // the decoder is the one to reject it.
        assert_eq!(envelope.expand().unwrap().len(), 1);
    }
}
