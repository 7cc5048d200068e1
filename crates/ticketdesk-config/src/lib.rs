//! Shared configuration for the ticketdesk CLI and TUI.
//!
//! TOML profiles, token storage selection (keyring / file / env), and
//! translation to `ticketdesk_core::ServiceConfig`. Both binaries depend
//! on this crate; the CLI adds `GlobalOpts`-aware wrappers on top.

mod tokens;

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use ticketdesk_core::{
    DEFAULT_API_URL, MemoryTokenStore, Role, ServiceConfig, TlsVerification, TokenStore, User,
};

pub use tokens::{FileTokenStore, KeyringTokenStore};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' not found")]
    UnknownProfile { name: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration shared by CLI and TUI.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named API profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

impl Config {
    /// Profile name to use when no `--profile` flag is given.
    pub fn active_profile_name(&self) -> &str {
        self.default_profile.as_deref().unwrap_or("default")
    }

    /// Named profile, or the built-in default profile when the config
    /// file defines none under that name and the name is `default`.
    pub fn profile(&self, name: &str) -> Result<Profile, ConfigError> {
        match self.profiles.get(name) {
            Some(p) => Ok(p.clone()),
            None if name == "default" => Ok(Profile::default()),
            None => Err(ConfigError::UnknownProfile { name: name.into() }),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default)]
    pub insecure: bool,

    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            insecure: false,
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}

/// Where a profile keeps its bearer token.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenStoreKind {
    /// System keyring (Secret Service, Keychain, Credential Manager).
    #[default]
    Keyring,
    /// Plain file under the platform data directory.
    File,
}

/// A named ticket API profile.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Profile {
    /// API base URL (e.g., "http://localhost:3000/api").
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Token storage backend.
    #[serde(default)]
    pub token_store: TokenStoreKind,

    /// Environment variable holding the token. Takes precedence over the store.
    pub token_env: Option<String>,

    /// Signed-in username. Falls back to the token's claims when unset.
    pub username: Option<String>,

    pub display_name: Option<String>,

    /// One of: admin, manager, operator, viewer.
    pub role: Option<String>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    pub insecure: Option<bool>,

    /// Override timeout.
    pub timeout: Option<u64>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            token_store: TokenStoreKind::default(),
            token_env: None,
            username: None,
            display_name: None,
            role: None,
            ca_cert: None,
            insecure: None,
            timeout: None,
        }
    }
}

fn default_api_url() -> String {
    DEFAULT_API_URL.into()
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "ticketdesk", "ticketdesk")
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback(".config").join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Directory for token files and logs.
pub fn data_dir() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback(".local/share"),
        |dirs| dirs.data_dir().to_path_buf(),
    )
}

fn dirs_fallback(kind: &str) -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(kind);
    p.push("ticketdesk");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from file + environment.
///
/// Environment keys use `TICKETDESK_` and `__` for nesting, e.g.
/// `TICKETDESK_DEFAULTS__TIMEOUT=5`.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

pub fn load_config_from(path: &std::path::Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("TICKETDESK_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &std::path::Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Profile translation ─────────────────────────────────────────────

/// Build a `ServiceConfig` from a profile and global defaults.
pub fn profile_to_service_config(
    profile: &Profile,
    defaults: &Defaults,
) -> Result<ServiceConfig, ConfigError> {
    let url: url::Url = profile
        .api_url
        .parse()
        .map_err(|_| ConfigError::Validation {
            field: "api_url".into(),
            reason: format!("invalid URL: {}", profile.api_url),
        })?;

    let tls = if profile.insecure.unwrap_or(defaults.insecure) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    let timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));

    Ok(ServiceConfig { url, tls, timeout })
}

/// The user configured on a profile, if it names both username and role.
pub fn profile_user(profile: &Profile) -> Option<User> {
    let username = profile.username.clone()?;
    let role: Role = profile.role.as_deref()?.parse().ok()?;
    Some(User {
        username,
        display_name: profile.display_name.clone(),
        role,
    })
}

/// Open the token store a profile points at.
///
/// A set `token_env` variable wins and yields a process-local store.
pub fn open_token_store(profile: &Profile, profile_name: &str) -> Arc<dyn TokenStore> {
    if let Some(ref env_name) = profile.token_env {
        if let Ok(token) = std::env::var(env_name) {
            return Arc::new(MemoryTokenStore::with_token(token));
        }
    }

    match profile.token_store {
        TokenStoreKind::Keyring => Arc::new(KeyringTokenStore::new(profile_name)),
        TokenStoreKind::File => Arc::new(FileTokenStore::for_profile(profile_name)),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_profile_targets_local_api() {
        let cfg = Config::default();
        let profile = cfg.profile("default").unwrap();
        assert_eq!(profile.api_url, "http://localhost:3000/api");

        let svc = profile_to_service_config(&profile, &cfg.defaults).unwrap();
        assert_eq!(svc.url.as_str(), "http://localhost:3000/api");
        assert_eq!(svc.timeout, Duration::from_secs(30));
        assert_eq!(svc.tls, TlsVerification::SystemDefaults);
    }

    #[test]
    fn unknown_profile_is_an_error() {
        let cfg = Config::default();
        assert!(matches!(
            cfg.profile("staging"),
            Err(ConfigError::UnknownProfile { .. })
        ));
    }

    #[test]
    fn profile_overrides_defaults() {
        let profile = Profile {
            api_url: "https://tickets.example.com/api".into(),
            insecure: Some(true),
            timeout: Some(5),
            ..Profile::default()
        };
        let svc = profile_to_service_config(&profile, &Defaults::default()).unwrap();
        assert_eq!(svc.tls, TlsVerification::DangerAcceptInvalid);
        assert_eq!(svc.timeout, Duration::from_secs(5));
    }

    #[test]
    fn invalid_url_is_validation_error() {
        let profile = Profile {
            api_url: "not a url".into(),
            ..Profile::default()
        };
        assert!(matches!(
            profile_to_service_config(&profile, &Defaults::default()),
            Err(ConfigError::Validation { .. })
        ));
    }

    #[test]
    fn profile_user_needs_username_and_role() {
        let mut profile = Profile {
            username: Some("jdoe".into()),
            role: Some("Manager".into()),
            ..Profile::default()
        };
        let user = profile_user(&profile).unwrap();
        assert_eq!(user.role, Role::Manager);

        profile.role = None;
        assert!(profile_user(&profile).is_none());
    }

    #[test]
    fn config_round_trips_through_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut cfg = Config::default();
        cfg.profiles.insert(
            "lab".into(),
            Profile {
                api_url: "http://lab:3000/api".into(),
                token_store: TokenStoreKind::File,
                role: Some("operator".into()),
                ..Profile::default()
            },
        );
        save_config_to(&cfg, &path).unwrap();

        let loaded = load_config_from(&path).unwrap();
        let lab = loaded.profile("lab").unwrap();
        assert_eq!(lab.api_url, "http://lab:3000/api");
        assert_eq!(lab.token_store, TokenStoreKind::File);
        assert_eq!(loaded.active_profile_name(), "default");
    }
}
