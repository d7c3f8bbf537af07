//! Server settings loaded via OrthoConfig.
//!
//! Values come from CLI flags, `PROVISIONING_*` environment variables and
//! configuration files, in OrthoConfig's usual precedence. Session material
//! is validated here so the server bootstrap only deals with ready-to-use
//! values.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use actix_web::cookie::{Key, SameSite};
use ortho_config::OrthoConfig;
use serde::Deserialize;
use tracing::warn;
use zeroize::Zeroize;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_SESSION_KEY_PATH: &str = "/var/run/secrets/session_key";
/// Minimum key file length; `Key::derive_from` needs at least 32 bytes and
/// release deployments are expected to provide 64.
pub const SESSION_KEY_MIN_LEN: usize = 64;
const SAMESITE_EXPECTED: &str = "Strict|Lax|None";

/// Build mode for session validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Missing key files fall back to an ephemeral key.
    Debug,
    /// Key material must be supplied unless ephemeral keys are allowed.
    Release,
}

impl BuildMode {
    /// Determine the mode from `cfg!(debug_assertions)`.
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    const fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Errors raised while validating server settings.
#[derive(thiserror::Error, Debug)]
pub enum SettingsError {
    #[error("invalid bind address '{value}': {source}")]
    BindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
    #[error("invalid value for session_same_site='{value}'; expected {expected}")]
    SameSite {
        value: String,
        expected: &'static str,
    },
    #[error("failed to read session key at {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("session key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
    #[error("session_same_site=None requires session_cookie_secure=true")]
    InsecureSameSiteNone,
}

/// Ready-to-use session cookie configuration.
pub struct SessionSettings {
    pub key: Key,
    pub cookie_secure: bool,
    pub same_site: SameSite,
}

/// Configuration values for the provisioning server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "PROVISIONING")]
pub struct ServerSettings {
    /// Socket address to listen on. Defaults to `0.0.0.0:8080`.
    pub bind_addr: Option<String>,
    /// File holding the session key material.
    pub session_key_file: Option<PathBuf>,
    /// Permit a generated session key when the key file is unreadable.
    /// Defaults to `false`.
    pub session_allow_ephemeral: Option<bool>,
    /// Mark the session cookie `Secure`. Defaults to `true`.
    pub session_cookie_secure: Option<bool>,
    /// `SameSite` policy: `Strict`, `Lax` or `None`.
    pub session_same_site: Option<String>,
    /// JSON seed for the in-memory group directory.
    pub directory_seed: Option<PathBuf>,
}

impl ServerSettings {
    /// Parsed listen address.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value.parse().map_err(|source| SettingsError::BindAddr {
            value: value.to_owned(),
            source,
        })
    }

    /// Whether the session cookie carries the `Secure` attribute.
    pub fn cookie_secure(&self) -> bool {
        self.session_cookie_secure.unwrap_or(true)
    }

    /// Whether a missing key file may fall back to a generated key.
    pub fn allow_ephemeral(&self) -> bool {
        self.session_allow_ephemeral.unwrap_or(false)
    }

    /// Session key path, falling back to the mounted secret location.
    pub fn session_key_path(&self) -> PathBuf {
        self.session_key_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_KEY_PATH))
    }

    /// Configured `SameSite` policy. Debug builds default to `Lax`, release
    /// builds to `Strict`.
    pub fn same_site(&self, mode: BuildMode) -> Result<SameSite, SettingsError> {
        let Some(value) = self.session_same_site.as_deref() else {
            return Ok(if mode.is_debug() {
                SameSite::Lax
            } else {
                SameSite::Strict
            });
        };
        let same_site = parse_same_site(value).ok_or_else(|| SettingsError::SameSite {
            value: value.to_owned(),
            expected: SAMESITE_EXPECTED,
        })?;
        if same_site == SameSite::None && !self.cookie_secure() {
            return Err(SettingsError::InsecureSameSiteNone);
        }
        Ok(same_site)
    }

    /// Resolve the session key, cookie flags and `SameSite` policy.
    pub fn session_settings(&self, mode: BuildMode) -> Result<SessionSettings, SettingsError> {
        let same_site = self.same_site(mode)?;
        let key = self.session_key(mode)?;
        Ok(SessionSettings {
            key,
            cookie_secure: self.cookie_secure(),
            same_site,
        })
    }

    fn session_key(&self, mode: BuildMode) -> Result<Key, SettingsError> {
        let path = self.session_key_path();
        match std::fs::read(&path) {
            Ok(bytes) => derive_key(&path, bytes),
            Err(source) if mode.is_debug() || self.allow_ephemeral() => {
                warn!(path = %path.display(), error = %source, "using temporary session key");
                Ok(Key::generate())
            }
            Err(source) => Err(SettingsError::KeyRead { path, source }),
        }
    }
}

fn derive_key(path: &Path, mut bytes: Vec<u8>) -> Result<Key, SettingsError> {
    let length = bytes.len();
    if length < SESSION_KEY_MIN_LEN {
        bytes.zeroize();
        return Err(SettingsError::KeyTooShort {
            path: path.to_path_buf(),
            length,
            min_len: SESSION_KEY_MIN_LEN,
        });
    }
    let key = Key::derive_from(&bytes);
    bytes.zeroize();
    Ok(key)
}

fn parse_same_site(value: &str) -> Option<SameSite> {
    match value.trim().to_ascii_lowercase().as_str() {
        "strict" => Some(SameSite::Strict),
        "lax" => Some(SameSite::Lax),
        "none" => Some(SameSite::None),
        _ => None,
    }
}
