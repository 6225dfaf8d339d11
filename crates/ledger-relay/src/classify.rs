//! Revision classifier
//!
//! Decides whether one decoded record is a revision-detail event and, if
//! so, pulls out the row data, row metadata and containing-table identity.
//! Most stream records are not revision details (block summaries, control
//! records); those classify as [`ClassifiedRecord::NotRevisionDetail`] and
//! are skipped silently — that is the normal case, never a fault.
//!
//! Extraction walks `payload → revision → data`, `payload → revision →
//! metadata` and `payload → tableInfo` independently; any intermediate map
//! may be absent. Field names are bit-exact and case-sensitive.

use crate::value::Value;

/// `recordType` value that marks a row-revision event.
pub const REVISION_DETAILS_RECORD_TYPE: &str = "REVISION_DETAILS";

/// Identity of the table a revision belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableInfo {
    /// Table name, as recorded in the journal
    pub table_name: String,
    /// Ledger-assigned table id; empty when the record omits it
    pub table_id: String,
}

/// One classified revision-detail event. All three sub-values are optional;
/// the rule engine decides what a missing piece means.
#[derive(Debug, Clone, PartialEq)]
pub struct RevisionDetail {
    /// Row data at this revision
    pub data: Option<Value>,
    /// Row metadata (id, version, transaction info)
    pub metadata: Option<Value>,
    /// Containing-table identity
    pub table_info: Option<TableInfo>,
}

impl RevisionDetail {
    /// Revision counter from the row metadata, when present and integral.
    /// `0` denotes the row's initial insertion.
    pub fn version(&self) -> Option<i64> {
        self.metadata
            .as_ref()
            .and_then(|m| m.get("version"))
            .and_then(Value::as_i64)
    }
}

/// Outcome of classifying one decoded record.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassifiedRecord {
    /// Not a revision-detail event: silent skip
    NotRevisionDetail,
    /// A revision-detail event with whatever pieces the record carried
    RevisionDetail(RevisionDetail),
}

/// Classify one decoded record.
pub fn classify(record: Value) -> ClassifiedRecord {
    let Value::Struct(mut top) = record else {
        return ClassifiedRecord::NotRevisionDetail;
    };

    let is_revision = top
        .get("recordType")
        .and_then(Value::as_text)
        .is_some_and(|t| t == REVISION_DETAILS_RECORD_TYPE);
    if !is_revision {
        return ClassifiedRecord::NotRevisionDetail;
    }

    // Absence of payload is equivalent to absence of all three sub-values.
    let mut payload = match top.remove("payload") {
        Some(Value::Struct(fields)) => fields,
        _ => {
            return ClassifiedRecord::RevisionDetail(RevisionDetail {
                data: None,
                metadata: None,
                table_info: None,
            })
        }
    };

    let table_info = payload.remove("tableInfo").and_then(table_info_from);

    let (data, metadata) = match payload.remove("revision") {
        Some(Value::Struct(mut revision)) => {
            (revision.remove("data"), revision.remove("metadata"))
        }
        _ => (None, None),
    };

    ClassifiedRecord::RevisionDetail(RevisionDetail {
        data,
        metadata,
        table_info,
    })
}

fn table_info_from(value: Value) -> Option<TableInfo> {
    let Value::Struct(mut fields) = value else {
        return None;
    };
    let table_name = match fields.remove("tableName") {
        Some(Value::Text(name)) => name,
        _ => return None,
    };
    let table_id = match fields.remove("tableId") {
        Some(Value::Text(id)) => id,
        _ => String::new(),
    };
    Some(TableInfo {
        table_name,
        table_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn strukt(pairs: Vec<(&str, Value)>) -> Value {
        let mut fields = HashMap::new();
        for (k, v) in pairs {
            fields.insert(k.to_string(), v);
        }
        Value::Struct(fields)
    }

    fn revision_record(version: i64) -> Value {
        strukt(vec![
            ("recordType", Value::from(REVISION_DETAILS_RECORD_TYPE)),
            (
                "payload",
                strukt(vec![
                    (
                        "tableInfo",
                        strukt(vec![
                            ("tableName", Value::from("Person")),
                            ("tableId", Value::from("1SUXCa3wwV0GD7kV78RbSg")),
                        ]),
                    ),
                    (
                        "revision",
                        strukt(vec![
                            (
                                "data",
                                strukt(vec![
                                    ("FirstName", Value::from("Nova")),
                                    ("LastName", Value::from("Lewis")),
                                ]),
                            ),
                            (
                                "metadata",
                                strukt(vec![
                                    ("id", Value::from("D35qd3e2prnJYmtKW6kok1")),
                                    ("version", Value::from(version)),
                                ]),
                            ),
                        ]),
                    ),
                ]),
            ),
        ])
    }

    #[test]
    fn test_classify_revision_detail() {
        let ClassifiedRecord::RevisionDetail(rev) = classify(revision_record(0)) else {
            panic!("expected revision detail");
        };
        assert_eq!(rev.version(), Some(0));
        let info = rev.table_info.unwrap();
        assert_eq!(info.table_name, "Person");
        assert_eq!(info.table_id, "1SUXCa3wwV0GD7kV78RbSg");
        assert_eq!(
            rev.data.unwrap().get("FirstName").and_then(Value::as_text),
            Some("Nova")
        );
    }

    #[test]
    fn test_classify_block_summary() {
        let record = strukt(vec![
            ("recordType", Value::from("BLOCK_SUMMARY")),
            ("payload", strukt(vec![("transactionId", Value::from("tx1"))])),
        ]);
        assert_eq!(classify(record), ClassifiedRecord::NotRevisionDetail);
    }

    #[test]
    fn test_classify_missing_record_type() {
        let record = strukt(vec![("payload", strukt(vec![]))]);
        assert_eq!(classify(record), ClassifiedRecord::NotRevisionDetail);
    }

    #[test]
    fn test_classify_non_string_record_type() {
        let record = strukt(vec![("recordType", Value::from(7i64))]);
        assert_eq!(classify(record), ClassifiedRecord::NotRevisionDetail);
    }

    #[test]
    fn test_classify_non_struct_top_level() {
        assert_eq!(classify(Value::from("scalar")), ClassifiedRecord::NotRevisionDetail);
        assert_eq!(classify(Value::Null), ClassifiedRecord::NotRevisionDetail);
    }

    #[test]
    fn test_classify_record_type_is_case_sensitive() {
        let record = strukt(vec![("recordType", Value::from("revision_details"))]);
        assert_eq!(classify(record), ClassifiedRecord::NotRevisionDetail);
    }

    #[test]
    fn test_classify_missing_payload() {
        let record = strukt(vec![(
            "recordType",
            Value::from(REVISION_DETAILS_RECORD_TYPE),
        )]);
        let ClassifiedRecord::RevisionDetail(rev) = classify(record) else {
            panic!("expected revision detail");
        };
        assert!(rev.data.is_none());
        assert!(rev.metadata.is_none());
        assert!(rev.table_info.is_none());
    }

    #[test]
    fn test_classify_missing_revision_block() {
        let record = strukt(vec![
            ("recordType", Value::from(REVISION_DETAILS_RECORD_TYPE)),
            (
                "payload",
                strukt(vec![(
                    "tableInfo",
                    strukt(vec![("tableName", Value::from("Person"))]),
                )]),
            ),
        ]);
        let ClassifiedRecord::RevisionDetail(rev) = classify(record) else {
            panic!("expected revision detail");
        };
        assert!(rev.data.is_none());
        assert!(rev.metadata.is_none());
        let info = rev.table_info.unwrap();
        assert_eq!(info.table_name, "Person");
        assert_eq!(info.table_id, "");
    }

    #[test]
    fn test_classify_table_info_without_name() {
        let record = strukt(vec![
            ("recordType", Value::from(REVISION_DETAILS_RECORD_TYPE)),
            (
                "payload",
                strukt(vec![(
                    "tableInfo",
                    strukt(vec![("tableId", Value::from("id-only"))]),
                )]),
            ),
        ]);
        let ClassifiedRecord::RevisionDetail(rev) = classify(record) else {
            panic!("expected revision detail");
        };
        assert!(rev.table_info.is_none());
    }

    #[test]
    fn test_version_missing_or_non_integer() {
        let rev = RevisionDetail {
            data: None,
            metadata: Some(strukt(vec![("version", Value::from("zero"))])),
            table_info: None,
        };
        assert_eq!(rev.version(), None);

        let rev = RevisionDetail {
            data: None,
            metadata: None,
            table_info: None,
        };
        assert_eq!(rev.version(), None);
    }
}
