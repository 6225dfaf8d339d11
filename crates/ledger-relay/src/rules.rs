//! Notification rule engine
//!
//! A closed mapping from table name to a notification descriptor: which
//! fields a row must carry and the message template to render. Adding a
//! watched table means adding one descriptor; the dispatch logic never
//! changes.
//!
//! Only a first-version insert (`version == 0`) notifies. Every other
//! outcome — later revision, unwatched table, missing identity fields — is
//! a silent no-notification, not an error.

use crate::classify::RevisionDetail;
use crate::value::Value;

/// Notification descriptor for one watched table.
#[derive(Debug, Clone)]
pub struct TableRule {
    /// Exact table name to match
    pub table_name: &'static str,
    /// Fields the row data must carry before a message can be built
    pub required_fields: &'static [&'static str],
    /// Message template with `{Field}` placeholders
    pub template: &'static str,
}

/// The closed set of notification rules.
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<TableRule>,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::vehicle_registry()
    }
}

impl RuleSet {
    /// Create a rule set from explicit descriptors.
    pub fn new(rules: Vec<TableRule>) -> Self {
        Self { rules }
    }

    /// The vehicle-registration ruleset: Person and VehicleRegistration
    /// inserts.
    pub fn vehicle_registry() -> Self {
        Self::new(vec![
            TableRule {
                table_name: "Person",
                required_fields: &["FirstName", "LastName"],
                template: "New User Registered. Name: {FirstName} {LastName}",
            },
            TableRule {
                table_name: "VehicleRegistration",
                required_fields: &["VIN", "LicensePlateNumber"],
                template: "New Vehicle Registered. VIN: {VIN}, LicensePlateNumber: {LicensePlateNumber}",
            },
        ])
    }

    /// Look up the descriptor for a table name.
    pub fn rule_for(&self, table_name: &str) -> Option<&TableRule> {
        self.rules.iter().find(|r| r.table_name == table_name)
    }

    /// Decide whether a classified revision warrants a notification and, if
    /// so, format the message.
    ///
    /// Without a version the insert-vs-update question cannot be answered,
    /// so the revision is skipped.
    pub fn evaluate(&self, revision: &RevisionDetail) -> Option<String> {
        if revision.version()? != 0 {
            return None;
        }

        let table = revision.table_info.as_ref()?;
        let rule = self.rule_for(&table.table_name)?;

        let data = revision.data.as_ref()?;
        if !rule.required_fields.iter().all(|f| data.has_field(f)) {
            return None;
        }

        Some(render(rule.template, data))
    }
}

/// Render a template, interpolating `{Field}` placeholders with the field's
/// plain string representation. No escaping: messages are plain text for a
/// notification channel, not a structured payload. A placeholder naming an
/// absent field is left verbatim.
fn render(template: &str, data: &Value) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        rest = &rest[start + 1..];
        let Some(end) = rest.find('}') else {
            out.push('{');
            break;
        };
        let field = &rest[..end];
        match data.get(field) {
            Some(value) => out.push_str(&value.to_text()),
            None => {
                out.push('{');
                out.push_str(field);
                out.push('}');
            }
        }
        rest = &rest[end + 1..];
    }
    out.push_str(rest);
    out
}
