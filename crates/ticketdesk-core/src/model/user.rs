// ── Authenticated user ──

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use ticketdesk_api::TokenClaims;

/// Roles known to the ticket backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Manager,
    Operator,
    Viewer,
    /// Any role string this build doesn't recognise. Never permitted.
    #[serde(untagged)]
    Other(String),
}

impl Role {
    /// Roles allowed to open ticket management.
    pub const TICKET_MANAGERS: [Role; 3] = [Role::Admin, Role::Manager, Role::Operator];

    pub fn can_manage_tickets(&self) -> bool {
        Self::TICKET_MANAGERS.contains(self)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Admin => "admin",
            Self::Manager => "manager",
            Self::Operator => "operator",
            Self::Viewer => "viewer",
            Self::Other(other) => other,
        };
        f.write_str(name)
    }
}

impl FromStr for Role {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Self::Admin,
            "manager" => Self::Manager,
            "operator" => Self::Operator,
            "viewer" => Self::Viewer,
            _ => Self::Other(s.trim().to_owned()),
        })
    }
}

/// The identity ticket management runs as.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub display_name: Option<String>,
    pub role: Role,
}

impl User {
    /// Build a user from token claims. Needs at least a username and role.
    pub fn from_claims(claims: &TokenClaims) -> Option<Self> {
        let username = claims.username.clone()?;
        let role = claims.role.as_deref()?.parse().ok()?;
        Some(Self {
            username,
            display_name: claims.name.clone(),
            role,
        })
    }

    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.username)
    }
}
