//! Wire types for the ticket API.
//!
//! Field names use camelCase via `#[serde(rename_all = "camelCase")]`.
//! Enumerated values (`severity`, `status`) stay as strings here and are
//! parsed into strong types by `ticketdesk-core`.

use serde::{Deserialize, Deserializer, Serialize};

/// Sentinel a filter value may carry to mean "do not filter".
pub const ALL: &str = "all";

// ── Tickets ──────────────────────────────────────────────────────────

/// One ticket as returned by `GET /tickets` and friends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketResponse {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(deserialize_with = "string_or_number")]
    pub alarm_id: String,
    #[serde(deserialize_with = "string_or_number")]
    pub site_id: String,
    pub site_name: String,
    /// One of: `critical`, `major`, `minor`.
    pub severity: String,
    pub alarm_type: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub recipients: Vec<String>,
    /// ISO 8601 date-time.
    pub email_sent_at: String,
    #[serde(default)]
    pub email_subject: String,
    /// One of: `sent`, `failed`, `pending`, `resolved`.
    pub status: String,
    pub created_by: CreatedByResponse,
    /// ISO 8601 date-time, present once resolved.
    #[serde(default)]
    pub resolved_at: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedByResponse {
    pub username: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// `GET /tickets` answers either `{ "tickets": [...] }` or a bare array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum TicketListBody {
    Wrapped { tickets: Vec<TicketResponse> },
    Bare(Vec<TicketResponse>),
}

impl From<TicketListBody> for Vec<TicketResponse> {
    fn from(body: TicketListBody) -> Self {
        match body {
            TicketListBody::Wrapped { tickets } | TicketListBody::Bare(tickets) => tickets,
        }
    }
}

/// Single-ticket responses: `{ "ticket": {...} }` or the ticket itself.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum TicketBody {
    Wrapped { ticket: Box<TicketResponse> },
    Bare(Box<TicketResponse>),
}

impl From<TicketBody> for TicketResponse {
    fn from(body: TicketBody) -> Self {
        match body {
            TicketBody::Wrapped { ticket } | TicketBody::Bare(ticket) => *ticket,
        }
    }
}

/// Body of `PATCH /tickets/{id}/resolve`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

// ── Query ────────────────────────────────────────────────────────────

/// Server-side filters for `GET /tickets`.
///
/// Every field is optional. A field that is `None` or holds the `"all"`
/// sentinel is left out of the query string entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketQuery {
    pub status: Option<String>,
    pub severity: Option<String>,
    pub site_id: Option<String>,
    pub alarm_type: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

impl TicketQuery {
    /// Query parameters in wire order, with absent and `"all"` values dropped.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let text = [
            ("status", self.status.as_deref()),
            ("severity", self.severity.as_deref()),
            ("siteId", self.site_id.as_deref()),
            ("alarmType", self.alarm_type.as_deref()),
            ("startDate", self.start_date.as_deref()),
            ("endDate", self.end_date.as_deref()),
        ];
        let numbers = [("page", self.page), ("limit", self.limit)];
        let sort = [
            ("sortBy", self.sort_by.as_deref()),
            ("sortOrder", self.sort_order.as_deref()),
        ];

        let mut params: Vec<(&'static str, String)> = text
            .into_iter()
            .filter_map(|(key, value)| keep(value).map(|v| (key, v)))
            .collect();
        params.extend(
            numbers
                .into_iter()
                .filter_map(|(key, value)| value.map(|v| (key, v.to_string()))),
        );
        params.extend(
            sort.into_iter()
                .filter_map(|(key, value)| keep(value).map(|v| (key, v))),
        );
        params
    }
}

fn keep(value: Option<&str>) -> Option<String> {
    value
        .filter(|v| !v.is_empty() && *v != ALL)
        .map(str::to_owned)
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(i64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Number(n) => n.to_string(),
    })
}
