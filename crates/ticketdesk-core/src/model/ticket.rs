// ── Ticket domain types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Alarm urgency classification.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Severity {
    Critical,
    Major,
    Minor,
}

/// Delivery / handling state of the notification email.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TicketStatus {
    Sent,
    Failed,
    Pending,
    Resolved,
}

impl TicketStatus {
    /// Still needs someone's attention.
    pub fn is_open(self) -> bool {
        matches!(self, Self::Failed | Self::Pending)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedBy {
    pub username: String,
    pub display_name: Option<String>,
}

impl CreatedBy {
    /// Display name when known, username otherwise.
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.username)
    }
}

/// One email notification sent in response to an alarm.
///
/// A local copy of the backend's record. `status == Resolved` implies
/// `resolved_at` is set for every ticket this crate resolves itself.
/// A resolved wire ticket without `resolvedAt` is still accepted (with a
/// warning) and keeps `resolved_at: None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: String,
    pub alarm_id: String,
    pub site_id: String,
    pub site_name: String,
    pub severity: Severity,
    pub alarm_type: String,
    pub description: String,
    pub recipients: Vec<String>,
    pub email_sent_at: DateTime<Utc>,
    pub email_subject: String,
    pub status: TicketStatus,
    pub created_by: CreatedBy,
    pub resolved_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

impl Ticket {
    pub fn is_resolved(&self) -> bool {
        self.status == TicketStatus::Resolved
    }

    /// Comma-joined recipient list, or `-` when there are none.
    pub fn recipients_label(&self) -> String {
        if self.recipients.is_empty() {
            "-".into()
        } else {
            self.recipients.join(", ")
        }
    }
}
