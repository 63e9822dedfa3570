//! Configuration loading and credential resolution
//!
//! Settings resolve in priority order:
//! 1. Command-line argument or environment variable (highest priority)
//! 2. TOML config file
//! 3. Compiled default (fallback, where one exists)

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use tracing::{info, warn};

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 3000;

/// Default bind address
pub const DEFAULT_BIND: &str = "0.0.0.0";

/// Default database location (created on first run)
pub const DEFAULT_DATABASE_URL: &str = "sqlite://moodmix.db?mode=rwc";

/// Default timeout for each outbound provider call
pub const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 10;

/// On-disk TOML configuration
///
/// Every field is optional so a partial file only overrides what it names.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TomlConfig {
    pub bind: Option<String>,
    pub port: Option<u16>,
    pub database_url: Option<String>,
    #[serde(default)]
    pub spotify: SpotifyTomlConfig,
}

/// `[spotify]` table of the TOML configuration
#[derive(Clone, Default, Deserialize, Serialize)]
pub struct SpotifyTomlConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub refresh_token: Option<String>,
    /// Override for the accounts (token) service base URL
    pub accounts_url: Option<String>,
    /// Override for the Web API base URL
    pub api_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl fmt::Debug for SpotifyTomlConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpotifyTomlConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| "<redacted>"))
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
            .field("accounts_url", &self.accounts_url)
            .field("api_url", &self.api_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Load TOML configuration from `path`
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read TOML failed ({}): {}", path.display(), e)))?;
    let config: TomlConfig = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse TOML failed ({}): {}", path.display(), e)))?;

    info!("Loaded configuration from {}", path.display());
    Ok(config)
}

/// Static OAuth credentials used to obtain provider access tokens
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
}

impl fmt::Debug for ProviderCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .finish()
    }
}

/// Credential values supplied on the command line or via environment
#[derive(Debug, Clone, Default)]
pub struct CredentialOverrides {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub refresh_token: Option<String>,
}

/// Validate a credential value (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

/// Resolve one setting from the override tier, then the TOML tier
///
/// Returns `None` when neither tier holds a valid value.
pub fn resolve_setting(
    name: &str,
    override_value: Option<&str>,
    toml_value: Option<&str>,
) -> Option<String> {
    let override_value = override_value.filter(|v| is_valid_key(v));
    let toml_value = toml_value.filter(|v| is_valid_key(v));

    if override_value.is_some() && toml_value.is_some() {
        warn!(
            "{} found in multiple sources: environment/CLI, TOML. Using environment/CLI (highest priority).",
            name
        );
    }

    if let Some(value) = override_value {
        info!("{} loaded from environment/CLI", name);
        return Some(value.trim().to_string());
    }

    if let Some(value) = toml_value {
        info!("{} loaded from TOML config", name);
        return Some(value.trim().to_string());
    }

    None
}

/// Resolve provider credentials from overrides and TOML
///
/// Every credential is required; a missing one is a configuration error so
/// the service never starts without the ability to reach the provider.
pub fn resolve_provider_credentials(
    overrides: &CredentialOverrides,
    toml_config: &TomlConfig,
) -> Result<ProviderCredentials> {
    let spotify = &toml_config.spotify;

    let client_id = resolve_setting(
        "Spotify client ID",
        overrides.client_id.as_deref(),
        spotify.client_id.as_deref(),
    );
    let client_secret = resolve_setting(
        "Spotify client secret",
        overrides.client_secret.as_deref(),
        spotify.client_secret.as_deref(),
    );
    let refresh_token = resolve_setting(
        "Spotify refresh token",
        overrides.refresh_token.as_deref(),
        spotify.refresh_token.as_deref(),
    );

    let mut missing = Vec::new();
    if client_id.is_none() {
        missing.push("SPOTIFY_CLIENT_ID");
    }
    if client_secret.is_none() {
        missing.push("SPOTIFY_CLIENT_SECRET");
    }
    if refresh_token.is_none() {
        missing.push("SPOTIFY_REFRESH_TOKEN");
    }

    match (client_id, client_secret, refresh_token) {
        (Some(client_id), Some(client_secret), Some(refresh_token)) => Ok(ProviderCredentials {
            client_id,
            client_secret,
            refresh_token,
        }),
        _ => Err(Error::Config(format!(
            "Spotify credentials not configured (missing: {}). Configure using one of:\n\
             1. Environment: {}\n\
             2. TOML config: [spotify] client_id / client_secret / refresh_token",
            missing.join(", "),
            missing.join(", ")
        ))),
    }
}
