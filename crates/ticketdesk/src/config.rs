//! CLI configuration: thin wrapper around `ticketdesk_config` shared types.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides
//! (--profile, --api-url, --insecure, --timeout).

use std::sync::Arc;
use std::time::Duration;

use ticketdesk_core::{ServiceConfig, TicketService, TlsVerification, TokenStore};

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use ticketdesk_config::{
    Config, Profile, config_path, load_config_or_default, open_token_store, save_config,
};

/// Everything a command needs to talk to the ticket API.
pub struct Session {
    pub profile_name: String,
    pub profile: Profile,
    pub service: TicketService,
}

impl Session {
    pub fn tokens(&self) -> &Arc<dyn TokenStore> {
        self.service.tokens()
    }
}

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .unwrap_or_else(|| config.active_profile_name().to_owned())
}

/// Translate a `Profile` + global flags into a `ServiceConfig`.
///
/// CLI flag overrides take priority over profile values.
pub fn resolve_service_config(
    profile: &Profile,
    config: &Config,
    global: &GlobalOpts,
) -> Result<ServiceConfig, CliError> {
    let mut service = ticketdesk_config::profile_to_service_config(profile, &config.defaults)?;

    if let Some(ref url_str) = global.api_url {
        service.url = url_str.parse().map_err(|_| CliError::Validation {
            field: "api-url".into(),
            reason: format!("invalid URL: {url_str}"),
        })?;
    }
    if global.insecure {
        service.tls = TlsVerification::DangerAcceptInvalid;
    }
    if let Some(secs) = global.timeout {
        service.timeout = Duration::from_secs(secs);
    }

    Ok(service)
}

/// Load config, pick the profile, open its token store and build the service.
pub fn open_session(global: &GlobalOpts) -> Result<Session, CliError> {
    let cfg = load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);

    let profile = cfg.profile(&profile_name).map_err(|_| {
        let mut available: Vec<_> = cfg.profiles.keys().cloned().collect();
        available.sort();
        CliError::ProfileNotFound {
            name: profile_name.clone(),
            available: if available.is_empty() {
                "(none)".into()
            } else {
                available.join(", ")
            },
        }
    })?;

    let service_config = resolve_service_config(&profile, &cfg, global)?;
    let tokens = open_token_store(&profile, &profile_name);
    let service = TicketService::new(&service_config, tokens)?;

    tracing::debug!(profile = %profile_name, url = %service_config.url, "session ready");
    Ok(Session {
        profile_name,
        profile,
        service,
    })
}
