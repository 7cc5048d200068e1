// Persistent token stores.
//
// The login flow that issues tokens lives outside this workspace; these
// stores only hold whatever it (or `ticketdesk token set`) put there.

use std::io::Write;
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use ticketdesk_core::{ApiError, TOKEN_KEY, TokenStore};

const KEYRING_SERVICE: &str = "ticketdesk";

// ── Keyring ─────────────────────────────────────────────────────────

/// Token kept in the system keyring under `ticketdesk` / `{profile}/auth-token`.
#[derive(Debug)]
pub struct KeyringTokenStore {
    account: String,
}

impl KeyringTokenStore {
    pub fn new(profile_name: &str) -> Self {
        Self {
            account: format!("{profile_name}/{TOKEN_KEY}"),
        }
    }

    fn entry(&self) -> Result<keyring::Entry, ApiError> {
        keyring::Entry::new(KEYRING_SERVICE, &self.account)
            .map_err(|e| ApiError::TokenStore(format!("keyring unavailable: {e}")))
    }
}

impl TokenStore for KeyringTokenStore {
    fn get(&self) -> Result<Option<SecretString>, ApiError> {
        match self.entry()?.get_password() {
            Ok(token) => Ok(Some(SecretString::from(token))),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(ApiError::TokenStore(format!("keyring read failed: {e}"))),
        }
    }

    fn set(&self, token: &SecretString) -> Result<(), ApiError> {
        self.entry()?
            .set_password(token.expose_secret())
            .map_err(|e| ApiError::TokenStore(format!("keyring write failed: {e}")))
    }

    fn clear(&self) -> Result<(), ApiError> {
        match self.entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(ApiError::TokenStore(format!("keyring delete failed: {e}"))),
        }
    }
}

// ── File ────────────────────────────────────────────────────────────

/// Token kept in a file, `{data_dir}/{profile}.auth-token` by default.
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn for_profile(profile_name: &str) -> Self {
        Self::new(crate::data_dir().join(format!("{profile_name}.{TOKEN_KEY}")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn io_err(action: &str, path: &Path, e: &std::io::Error) -> ApiError {
    ApiError::TokenStore(format!("failed to {action} {}: {e}", path.display()))
}

impl TokenStore for FileTokenStore {
    fn get(&self) -> Result<Option<SecretString>, ApiError> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => {
                let token = raw.trim();
                Ok((!token.is_empty()).then(|| SecretString::from(token.to_owned())))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_err("read", &self.path, &e)),
        }
    }

    fn set(&self, token: &SecretString) -> Result<(), ApiError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| io_err("create", parent, &e))?;
        }

        let mut options = std::fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options
            .open(&self.path)
            .map_err(|e| io_err("open", &self.path, &e))?;

        // `mode` only applies on creation; tighten a pre-existing file
        // before the token goes in.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(std::fs::Permissions::from_mode(0o600))
                .map_err(|e| io_err("restrict", &self.path, &e))?;
        }

        file.write_all(token.expose_secret().as_bytes())
            .map_err(|e| io_err("write", &self.path, &e))?;

        debug!(path = %self.path.display(), "stored auth token");
        Ok(())
    }

    fn clear(&self) -> Result<(), ApiError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_err("remove", &self.path, &e)),
        }
    }
}
