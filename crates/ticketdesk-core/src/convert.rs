// ── API-to-domain type conversions ──
//
// Bridges raw `ticketdesk_api` response types into canonical
// `ticketdesk_core::model` domain types. Enumerated strings are parsed
// into strong types; a value this build does not know is a conversion
// failure, not a silent default.

use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::warn;

use ticketdesk_api::TicketResponse;

use crate::model::{CreatedBy, Severity, Ticket, TicketStatus};

/// Why a wire ticket could not become a domain ticket.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("ticket {id}: invalid {field} {value:?}")]
pub struct ConversionError {
    pub id: String,
    pub field: &'static str,
    pub value: String,
}

/// Parse an ISO-8601 timestamp. Values without an offset are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

impl TryFrom<TicketResponse> for Ticket {
    type Error = ConversionError;

    fn try_from(raw: TicketResponse) -> Result<Self, Self::Error> {
        let invalid = |field: &'static str, value: &str| ConversionError {
            id: raw.id.clone(),
            field,
            value: value.to_owned(),
        };

        let severity: Severity = raw
            .severity
            .to_ascii_lowercase()
            .parse()
            .map_err(|_| invalid("severity", &raw.severity))?;
        let status: TicketStatus = raw
            .status
            .to_ascii_lowercase()
            .parse()
            .map_err(|_| invalid("status", &raw.status))?;
        let email_sent_at = parse_timestamp(&raw.email_sent_at)
            .ok_or_else(|| invalid("emailSentAt", &raw.email_sent_at))?;
        let resolved_at = match raw.resolved_at.as_deref() {
            Some(ts) if !ts.is_empty() => {
                Some(parse_timestamp(ts).ok_or_else(|| invalid("resolvedAt", ts))?)
            }
            _ => None,
        };
        if status == TicketStatus::Resolved && resolved_at.is_none() {
            warn!(id = %raw.id, "resolved ticket has no resolvedAt");
        }

        Ok(Ticket {
            id: raw.id,
            alarm_id: raw.alarm_id,
            site_id: raw.site_id,
            site_name: raw.site_name,
            severity,
            alarm_type: raw.alarm_type,
            description: raw.description,
            recipients: raw.recipients,
            email_sent_at,
            email_subject: raw.email_subject,
            status,
            created_by: CreatedBy {
                username: raw.created_by.username,
                display_name: raw.created_by.display_name,
            },
            resolved_at,
            notes: raw.notes.filter(|n| !n.is_empty()),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use ticketdesk_api::CreatedByResponse;

    fn raw() -> TicketResponse {
        TicketResponse {
            id: "t-1".into(),
            alarm_id: "a-1".into(),
            site_id: "s-1".into(),
            site_name: "Harbor".into(),
            severity: "critical".into(),
            alarm_type: "power".into(),
            description: String::new(),
            recipients: vec!["ops@example.com".into()],
            email_sent_at: "2024-01-15T08:30:00Z".into(),
            email_subject: "Power".into(),
            status: "sent".into(),
            created_by: CreatedByResponse {
                username: "system".into(),
                display_name: None,
            },
            resolved_at: None,
            notes: None,
        }
    }

    #[test]
    fn converts_well_formed_ticket() {
        let ticket = Ticket::try_from(raw()).unwrap();
        assert_eq!(ticket.severity, Severity::Critical);
        assert_eq!(ticket.status, TicketStatus::Sent);
        assert_eq!(
            ticket.email_sent_at,
            Utc.with_ymd_and_hms(2024, 1, 15, 8, 30, 0).unwrap()
        );
        assert_eq!(ticket.created_by.label(), "system");
    }

    #[test]
    fn enum_strings_are_case_insensitive() {
        let mut r = raw();
        r.severity = "MAJOR".into();
        r.status = "Resolved".into();
        r.resolved_at = Some("2024-01-15T09:00:00+01:00".into());
        let ticket = Ticket::try_from(r).unwrap();
        assert_eq!(ticket.severity, Severity::Major);
        assert_eq!(
            ticket.resolved_at,
            Some(Utc.with_ymd_and_hms(2024, 1, 15, 8, 0, 0).unwrap())
        );
    }

    #[test]
    fn resolved_without_timestamp_is_tolerated() {
        let mut r = raw();
        r.status = "resolved".into();
        r.resolved_at = None;
        let ticket = Ticket::try_from(r).unwrap();
        assert!(ticket.is_resolved());
        assert_eq!(ticket.resolved_at, None);
    }

    #[test]
    fn unknown_severity_is_rejected() {
        let mut r = raw();
        r.severity = "catastrophic".into();
        let err = Ticket::try_from(r).unwrap_err();
        assert_eq!(err.field, "severity");
        assert_eq!(err.id, "t-1");
    }

    #[test]
    fn naive_timestamps_are_utc() {
        assert_eq!(
            parse_timestamp("2024-01-15T08:30"),
            Some(Utc.with_ymd_and_hms(2024, 1, 15, 8, 30, 0).unwrap())
        );
        assert_eq!(
            parse_timestamp("2024-01-15T14:00:00.250"),
            Some(
                Utc.with_ymd_and_hms(2024, 1, 15, 14, 0, 0).unwrap()
                    + chrono::Duration::milliseconds(250)
            )
        );
        assert_eq!(parse_timestamp("yesterday"), None);
    }
}
