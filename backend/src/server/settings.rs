//! Application settings loaded via OrthoConfig, and the values derived from
//! them at start-up.
//!
//! Every setting reads from `CLEANBEE_*` environment variables (or a
//! configuration file / CLI flag through OrthoConfig). Optional settings fall
//! back to the defaults below; secrets are handed out wrapped in
//! [`Zeroizing`].

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use actix_web::cookie::{Key, SameSite};
use ortho_config::OrthoConfig;
use serde::Deserialize;
use tracing::warn;
use url::Url;
use zeroize::{Zeroize, Zeroizing};

use cleanbee::outbound::gemini::GeminiConfig;
use cleanbee::outbound::mapbox::MapboxConfig;
use cleanbee::outbound::persistence::PoolConfig;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
const DEFAULT_GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/";
const DEFAULT_MAPBOX_ENDPOINT: &str = "https://api.mapbox.com/";
const DEFAULT_CLASSIFIER_TIMEOUT_SECS: u64 = 30;
const DEFAULT_GEOCODER_TIMEOUT_SECS: u64 = 10;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
const SESSION_KEY_DEFAULT_PATH: &str = "/var/run/secrets/session_key";
const SESSION_KEY_MIN_LEN: usize = 64;
/// `Key::derive_from` panics on shorter input.
const SESSION_KEY_DERIVE_MIN_LEN: usize = 32;

/// Build mode for session configuration validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds tolerate a missing key file and use an ephemeral key.
    Debug,
    /// Release builds require a readable key of at least 64 bytes.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }
}

/// Errors raised while turning settings into runtime configuration.
#[derive(thiserror::Error, Debug)]
pub enum SettingsError {
    #[error("missing required setting: {name}")]
    Missing { name: &'static str },
    #[error("invalid value for {name}='{value}': {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
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
    #[error("session_allow_ephemeral must be false in release builds")]
    EphemeralNotAllowed,
}

/// Process-wide settings.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "CLEANBEE")]
pub struct AppSettings {
    /// PostgreSQL connection string.
    pub database_url: Option<String>,
    /// Listen address. Defaults to `0.0.0.0:8080`.
    pub bind_addr: Option<String>,
    pub gemini_api_key: Option<String>,
    /// Defaults to `gemini-1.5-flash`.
    pub gemini_model: Option<String>,
    pub gemini_endpoint: Option<String>,
    pub mapbox_token: Option<String>,
    pub mapbox_endpoint: Option<String>,
    pub classifier_timeout_secs: Option<u64>,
    pub geocoder_timeout_secs: Option<u64>,
    /// Defaults to `/var/run/secrets/session_key`.
    pub session_key_file: Option<PathBuf>,
    /// Defaults to `true`.
    pub session_cookie_secure: Option<bool>,
    /// Debug-only escape hatch for a missing key file.
    pub session_allow_ephemeral: Option<bool>,
    pub db_max_connections: Option<u32>,
}

/// Session cookie parameters.
#[derive(Clone)]
pub struct SessionSettings {
    pub key: Key,
    pub cookie_secure: bool,
    pub same_site: SameSite,
}

fn required(
    value: Option<&String>,
    name: &'static str,
) -> Result<Zeroizing<String>, SettingsError> {
    value
        .filter(|raw| !raw.trim().is_empty())
        .map(|raw| Zeroizing::new(raw.trim().to_owned()))
        .ok_or(SettingsError::Missing { name })
}

fn parse_url(
    value: Option<&str>,
    fallback: &str,
    name: &'static str,
) -> Result<Url, SettingsError> {
    let raw = value.unwrap_or(fallback);
    Url::parse(raw).map_err(|err| SettingsError::Invalid {
        name,
        value: raw.to_owned(),
        reason: err.to_string(),
    })
}

impl AppSettings {
    /// Listen address.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|err: std::net::AddrParseError| SettingsError::Invalid {
            name: "bind_addr",
            value: raw.to_owned(),
            reason: err.to_string(),
        })
    }

    /// Connection pool settings. Fails when no database URL is configured.
    pub fn pool_config(&self) -> Result<PoolConfig, SettingsError> {
        let url = required(self.database_url.as_ref(), "database_url")?;
        Ok(PoolConfig::new(url.as_str())
            .with_max_size(self.db_max_connections.unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)))
    }

    /// Vision model settings.
    pub fn gemini_config(&self) -> Result<GeminiConfig, SettingsError> {
        Ok(GeminiConfig {
            endpoint: parse_url(
                self.gemini_endpoint.as_deref(),
                DEFAULT_GEMINI_ENDPOINT,
                "gemini_endpoint",
            )?,
            model: self
                .gemini_model
                .clone()
                .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_owned()),
            api_key: required(self.gemini_api_key.as_ref(), "gemini_api_key")?,
            timeout: Duration::from_secs(
                self.classifier_timeout_secs
                    .unwrap_or(DEFAULT_CLASSIFIER_TIMEOUT_SECS),
            ),
        })
    }

    /// Geocoder settings.
    pub fn mapbox_config(&self) -> Result<MapboxConfig, SettingsError> {
        Ok(MapboxConfig {
            endpoint: parse_url(
                self.mapbox_endpoint.as_deref(),
                DEFAULT_MAPBOX_ENDPOINT,
                "mapbox_endpoint",
            )?,
            access_token: required(self.mapbox_token.as_ref(), "mapbox_token")?,
            timeout: Duration::from_secs(
                self.geocoder_timeout_secs
                    .unwrap_or(DEFAULT_GEOCODER_TIMEOUT_SECS),
            ),
        })
    }

    /// Session key and cookie flags.
    ///
    /// Release builds insist on a readable key file of at least 64 bytes;
    /// debug builds accept 32 bytes and fall back to a generated key with a
    /// warning when the file is missing.
    pub fn session_settings(&self, mode: BuildMode) -> Result<SessionSettings, SettingsError> {
        let allow_ephemeral = self.session_allow_ephemeral.unwrap_or(false);
        if allow_ephemeral && mode == BuildMode::Release {
            return Err(SettingsError::EphemeralNotAllowed);
        }
        let path = self
            .session_key_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(SESSION_KEY_DEFAULT_PATH));
        let key = match std::fs::read(&path) {
            Ok(mut bytes) => {
                let length = bytes.len();
                let min_len = match mode {
                    BuildMode::Release => SESSION_KEY_MIN_LEN,
                    BuildMode::Debug => SESSION_KEY_DERIVE_MIN_LEN,
                };
                if length < min_len {
                    bytes.zeroize();
                    return Err(SettingsError::KeyTooShort {
                        path,
                        length,
                        min_len,
                    });
                }
                let key = Key::derive_from(&bytes);
                bytes.zeroize();
                key
            }
            Err(error) if mode == BuildMode::Debug || allow_ephemeral => {
                warn!(
                    path = %path.display(),
                    error = %error,
                    "using temporary session key (dev only)"
                );
                Key::generate()
            }
            Err(source) => return Err(SettingsError::KeyRead { path, source }),
        };
        Ok(SessionSettings {
            key,
            cookie_secure: self.session_cookie_secure.unwrap_or(true),
            same_site: SameSite::Lax,
        })
    }
}
