// ── Ticket data access ──
//
// `TicketService` mediates between the views and the ticket API. It owns
// token validation: every read checks the stored token's shape and
// expiry first, and an unusable token is cleared from the store before
// the auth error reaches the caller. Server responses never clear the
// token; a 401 is an ordinary failure of the operation in flight.

use std::sync::Arc;

use chrono::Utc;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, warn};

use ticketdesk_api::{Error as ApiError, TicketClient, TicketQuery, TokenClaims, TokenStore};

use crate::config::ServiceConfig;
use crate::error::{AuthFailure, CoreError};
use crate::model::{Ticket, User};

/// Which ticket operation an API failure belongs to.
#[derive(Debug, Clone, Copy)]
enum Operation<'a> {
    Fetch,
    Get(&'a str),
    Delete(&'a str),
    Resolve(&'a str),
}

/// Async facade over the ticket API with an injected token store.
pub struct TicketService {
    client: TicketClient,
    tokens: Arc<dyn TokenStore>,
}

impl TicketService {
    pub fn new(config: &ServiceConfig, tokens: Arc<dyn TokenStore>) -> Result<Self, CoreError> {
        let client = TicketClient::new(config.url.as_str(), &config.transport())?;
        Ok(Self { client, tokens })
    }

    /// Wrap an already-built client (tests, custom transports).
    pub fn with_client(client: TicketClient, tokens: Arc<dyn TokenStore>) -> Self {
        Self { client, tokens }
    }

    pub fn tokens(&self) -> &Arc<dyn TokenStore> {
        &self.tokens
    }

    pub fn api_url(&self) -> &url::Url {
        self.client.base_url()
    }

    // ── Token handling ───────────────────────────────────────────────

    fn stored_token(&self) -> Result<SecretString, CoreError> {
        self.tokens
            .get()
            .map_err(|e| CoreError::Storage {
                message: e.to_string(),
            })?
            .ok_or(CoreError::Auth {
                kind: AuthFailure::Missing,
            })
    }

    /// Stored token after shape and expiry checks. Clears the store on
    /// any validation failure.
    pub fn validated_token(&self) -> Result<(SecretString, TokenClaims), CoreError> {
        let token = match self.stored_token() {
            Ok(token) => token,
            Err(err) => {
                if err.needs_login() {
                    self.invalidate("no token stored");
                }
                return Err(err);
            }
        };

        match ticketdesk_api::inspect_token(&token, Utc::now()) {
            Ok(claims) => Ok((token, claims)),
            Err(err) => {
                self.invalidate(&err.to_string());
                Err(err.into())
            }
        }
    }

    /// User described by the stored token's claims, if it carries them.
    pub fn token_user(&self) -> Option<User> {
        let token = self.tokens.get().ok().flatten()?;
        let claims = ticketdesk_api::decode_claims(token.expose_secret()).ok()?;
        User::from_claims(&claims)
    }

    fn invalidate(&self, reason: &str) {
        warn!(reason, "discarding stored auth token");
        if let Err(e) = self.tokens.clear() {
            warn!(error = %e, "failed to clear auth token");
        }
    }

    // ── Operations ───────────────────────────────────────────────────

    /// Fetch tickets matching the server-side `query`.
    ///
    /// Fails with [`CoreError::Auth`] when the token is missing, malformed,
    /// or expired (the store is cleared first),
    /// [`CoreError::Forbidden`] with the server's detail on HTTP 403, and
    /// [`CoreError::Fetch`] otherwise.
    pub async fn get_all_tickets(&self, query: &TicketQuery) -> Result<Vec<Ticket>, CoreError> {
        let (token, _) = self.validated_token()?;

        let raw = self
            .client
            .list_tickets(&token, query)
            .await
            .map_err(|e| Self::classify(e, Operation::Fetch))?;
        debug!(count = raw.len(), "fetched tickets");

        raw.into_iter()
            .map(|r| {
                Ticket::try_from(r).map_err(|e| CoreError::Fetch {
                    message: e.to_string(),
                })
            })
            .collect()
    }

    /// Fetch one ticket by id. Same token rules as [`Self::get_all_tickets`].
    pub async fn get_ticket(&self, id: &str) -> Result<Ticket, CoreError> {
        let (token, _) = self.validated_token()?;

        let raw = self
            .client
            .get_ticket(&token, id)
            .await
            .map_err(|e| Self::classify(e, Operation::Get(id)))?;

        Ticket::try_from(raw).map_err(|e| CoreError::Fetch {
            message: e.to_string(),
        })
    }

    /// Delete a ticket. Any non-success response is [`CoreError::Delete`].
    pub async fn delete_ticket(&self, id: &str) -> Result<(), CoreError> {
        let token = self.stored_token()?;

        self.client
            .delete_ticket(&token, id)
            .await
            .map_err(|e| Self::classify(e, Operation::Delete(id)))
    }

    /// Resolve a ticket with optional notes and return the server's copy.
    /// Any non-success response is [`CoreError::Resolve`].
    pub async fn resolve_ticket(&self, id: &str, notes: Option<&str>) -> Result<Ticket, CoreError> {
        let token = self.stored_token()?;

        let raw = self
            .client
            .resolve_ticket(&token, id, notes)
            .await
            .map_err(|e| Self::classify(e, Operation::Resolve(id)))?;

        Ticket::try_from(raw).map_err(|e| CoreError::Resolve {
            id: id.to_owned(),
            message: e.to_string(),
        })
    }

    // ── Error classification ─────────────────────────────────────────

    fn classify(err: ApiError, op: Operation<'_>) -> CoreError {
        match op {
            Operation::Fetch => match err {
                ApiError::Forbidden { detail } => CoreError::Forbidden { detail },
                other => fetch_failure(other),
            },
            Operation::Get(id) => match err {
                ApiError::Forbidden { detail } => CoreError::Forbidden { detail },
                ref e if e.is_not_found() => CoreError::NotFound { id: id.to_owned() },
                other => fetch_failure(other),
            },
            Operation::Delete(id) => {
                warn!(id, error = %err, "delete failed");
                CoreError::Delete {
                    id: id.to_owned(),
                    message: err.to_string(),
                }
            }
            Operation::Resolve(id) => {
                warn!(id, error = %err, "resolve failed");
                CoreError::Resolve {
                    id: id.to_owned(),
                    message: err.to_string(),
                }
            }
        }
    }
}

fn fetch_failure(err: ApiError) -> CoreError {
    let unreachable = matches!(&err, ApiError::Transport(e) if e.is_connect() || e.is_timeout());
    if unreachable {
        err.into()
    } else {
        CoreError::Fetch {
            message: err.to_string(),
        }
    }
}
