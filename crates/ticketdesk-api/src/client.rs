// Async HTTP client for the ticket API.
//
// Base path: configurable, e.g. http://localhost:3000/api/
// Auth: `Authorization: Bearer <token>` on every request

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;
use crate::types::{ResolveRequest, TicketBody, TicketListBody, TicketQuery, TicketResponse};

// ── Error response shape from the ticket API ─────────────────────────

#[derive(serde::Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    detail: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl ErrorResponse {
    fn into_text(self) -> Option<String> {
        self.detail.or(self.message).filter(|s| !s.is_empty())
    }
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the ticket REST API.
///
/// Holds no credentials itself: every call takes the bearer token so the
/// caller can re-read its token store between requests.
pub struct TicketClient {
    http: reqwest::Client,
    base_url: Url,
}

impl TicketClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from a base URL and transport config.
    pub fn new(base_url: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::from_reqwest(base_url, http)
    }

    /// Wrap an existing `reqwest::Client` (caller manages default headers).
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self { http, base_url })
    }

    /// Ensure the base path ends in `/` so relative joins append to it.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        if url.cannot_be_a_base() {
            return Err(Error::InvalidUrl(
                url::ParseError::RelativeUrlWithCannotBeABaseBase,
            ));
        }

        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/"));
        Ok(url)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// `{base}/tickets[/{id}[/{action}]]`, with the id percent-encoded.
    fn tickets_url(&self, id: Option<&str>, action: Option<&str>) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|()| {
                Error::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase)
            })?;
            segments.pop_if_empty().push("tickets");
            if let Some(id) = id {
                segments.push(id);
            }
            if let Some(action) = action {
                segments.push(action);
            }
        }
        Ok(url)
    }

    // ── Ticket endpoints ─────────────────────────────────────────────

    /// `GET /tickets` with server-side filters.
    ///
    /// Accepts both the wrapped `{tickets: [...]}` and bare array shapes.
    pub async fn list_tickets(
        &self,
        token: &SecretString,
        query: &TicketQuery,
    ) -> Result<Vec<TicketResponse>, Error> {
        let url = self.tickets_url(None, None)?;
        let params = query.to_params();
        debug!("GET {url} params={params:?}");

        let resp = self
            .http
            .get(url)
            .bearer_auth(token.expose_secret())
            .query(&params)
            .send()
            .await?;
        let body: TicketListBody = self.handle_response(resp).await?;
        Ok(body.into())
    }

    /// `GET /tickets/{id}`.
    pub async fn get_ticket(&self, token: &SecretString, id: &str) -> Result<TicketResponse, Error> {
        let url = self.tickets_url(Some(id), None)?;
        debug!("GET {url}");

        let resp = self
            .http
            .get(url)
            .bearer_auth(token.expose_secret())
            .send()
            .await?;
        let body: TicketBody = self.handle_response(resp).await?;
        Ok(body.into())
    }

    /// `DELETE /tickets/{id}`. The success body is ignored.
    pub async fn delete_ticket(&self, token: &SecretString, id: &str) -> Result<(), Error> {
        let url = self.tickets_url(Some(id), None)?;
        debug!("DELETE {url}");

        let resp = self
            .http
            .delete(url)
            .bearer_auth(token.expose_secret())
            .send()
            .await?;
        self.handle_empty(resp).await
    }

    /// `PATCH /tickets/{id}/resolve` with optional notes; returns the
    /// updated ticket.
    pub async fn resolve_ticket(
        &self,
        token: &SecretString,
        id: &str,
        notes: Option<&str>,
    ) -> Result<TicketResponse, Error> {
        let url = self.tickets_url(Some(id), Some("resolve"))?;
        let body = ResolveRequest {
            notes: notes.map(str::to_owned),
        };
        let resp = self.patch(url, token, &body).await?;
        let body: TicketBody = self.handle_response(resp).await?;
        Ok(body.into())
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    async fn patch<B: Serialize + Sync>(
        &self,
        url: Url,
        token: &SecretString,
        body: &B,
    ) -> Result<reqwest::Response, Error> {
        debug!("PATCH {url}");

        Ok(self
            .http
            .patch(url)
            .bearer_auth(token.expose_secret())
            .json(body)
            .send()
            .await?)
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            serde_json::from_str(&body).map_err(|e| {
                let preview: String = body.chars().take(200).collect();
                Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body,
                }
            })
        } else {
            Err(self.parse_error(status, resp).await)
        }
    }

    async fn handle_empty(&self, resp: reqwest::Response) -> Result<(), Error> {
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(self.parse_error(status, resp).await)
        }
    }

    async fn parse_error(&self, status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Error::Unauthorized;
        }

        let raw = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorResponse>(&raw)
            .ok()
            .and_then(ErrorResponse::into_text)
            .or_else(|| (!raw.trim().is_empty()).then(|| raw.trim().to_owned()))
            .unwrap_or_else(|| status.to_string());

        if status == reqwest::StatusCode::FORBIDDEN {
            Error::Forbidden { detail: message }
        } else {
            Error::Api {
                status: status.as_u16(),
                message,
            }
        }
    }
}
