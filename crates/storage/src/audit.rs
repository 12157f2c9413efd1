use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::domain::ClientRecord;

pub const CLIENTS_TABLE: &str = "clients";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    Create,
    Update,
    Delete,
}

impl AuditAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "CREATE" => Some(Self::Create),
            "UPDATE" => Some(Self::Update),
            "DELETE" => Some(Self::Delete),
            _ => None,
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Actor-visible summary of a committed mutation. Advisory only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditDescription {
    pub table: String,
    pub action: AuditAction,
    pub detail: String,
    pub recorded_at: DateTime<Utc>,
}

impl AuditDescription {
    fn new(action: AuditAction, detail: String) -> Self {
        Self {
            table: CLIENTS_TABLE.to_string(),
            action,
            detail,
            recorded_at: Utc::now(),
        }
    }

    pub fn created(record: &ClientRecord) -> Self {
        Self::new(
            AuditAction::Create,
            format!("New client {} registered as {}", record.name, record.id),
        )
    }

    pub fn updated(previous: &ClientRecord, current: &ClientRecord) -> Self {
        let mut changed = Vec::new();
        if previous.email != current.email {
            changed.push("email");
        }
        if previous.phone != current.phone {
            changed.push("phone");
        }
        if previous.address != current.address {
            changed.push("address");
        }

        let mut detail = format!(
            "Updated {}: {} -> {}",
            current.id, previous.name, current.name
        );
        if !changed.is_empty() {
            detail.push_str(&format!(" (changed {})", changed.join(", ")));
        }
        Self::new(AuditAction::Update, detail)
    }

    pub fn deleted(record: &ClientRecord) -> Self {
        Self::new(
            AuditAction::Delete,
            format!("Record {} ({}) deleted", record.id, record.name),
        )
    }
}

impl fmt::Display for AuditDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} {}] {}", self.table, self.action, self.detail)
    }
}

/// Row persisted in the `audit_changes` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub id: i64,
    #[serde(flatten)]
    pub description: AuditDescription,
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use shared::domain::ClientId;

    use super::*;

    fn record(name: &str, phone: Option<&str>) -> ClientRecord {
        ClientRecord {
            id: ClientId(2),
            name: name.to_string(),
            email: "leela@pe.com".to_string(),
            phone: phone.map(str::to_string),
            address: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn update_detail_names_previous_and_new_name() {
        let audit =
            AuditDescription::updated(&record("Leela", None), &record("Turanga Leela", None));
        assert_eq!(audit.action, AuditAction::Update);
        assert_eq!(audit.detail, "Updated #2: Leela -> Turanga Leela");
    }

    #[test]
    fn update_detail_lists_changed_optional_fields() {
        let audit =
            AuditDescription::updated(&record("Leela", None), &record("Leela", Some("555")));
        assert_eq!(audit.detail, "Updated #2: Leela -> Leela (changed phone)");
    }

    #[test]
    fn action_round_trips_through_column_text() {
        for action in [AuditAction::Create, AuditAction::Update, AuditAction::Delete] {
            assert_eq!(AuditAction::parse(action.as_str()), Some(action));
        }
        assert_eq!(AuditAction::parse("upsert"), None);
    }
}
