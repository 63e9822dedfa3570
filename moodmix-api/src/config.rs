//! Service configuration for moodmix-api
//!
//! Priority per setting: command line / environment > TOML > compiled default.

use clap::Parser;
use moodmix_common::config::{
    load_toml_config, resolve_provider_credentials, CredentialOverrides, ProviderCredentials,
    TomlConfig, DEFAULT_BIND, DEFAULT_DATABASE_URL, DEFAULT_PORT,
};
use moodmix_common::Result;
use std::path::PathBuf;

use crate::services::SpotifyClientConfig;

/// Deployment environment variable; `production` disables `.env` loading
pub const ENV_VAR: &str = "MOODMIX_ENV";

/// Whether a `.env` file should be read for the given `MOODMIX_ENV` value
///
/// Development shells get `.env`; production relies on the real environment.
pub fn should_load_dotenv(environment: Option<&str>) -> bool {
    !matches!(environment, Some(env) if env.trim().eq_ignore_ascii_case("production"))
}

/// Command-line arguments for moodmix-api
#[derive(Parser, Debug, Default)]
#[command(name = "moodmix-api")]
#[command(about = "App registration and Spotify recommendation proxy")]
#[command(version)]
pub struct Args {
    /// Optional TOML configuration file
    #[arg(short, long, env = "MOODMIX_CONFIG")]
    pub config: Option<PathBuf>,

    /// Port to listen on
    #[arg(short, long, env = "MOODMIX_PORT")]
    pub port: Option<u16>,

    /// Address to bind
    #[arg(long, env = "MOODMIX_BIND")]
    pub bind: Option<String>,

    /// sqlx SQLite URL of the app store
    #[arg(long, env = "MOODMIX_DATABASE_URL")]
    pub database_url: Option<String>,

    /// Spotify application client ID
    #[arg(long, env = "SPOTIFY_CLIENT_ID", hide_env_values = true)]
    pub spotify_client_id: Option<String>,

    /// Spotify application client secret
    #[arg(long, env = "SPOTIFY_CLIENT_SECRET", hide_env_values = true)]
    pub spotify_client_secret: Option<String>,

    /// Long-lived Spotify refresh token
    #[arg(long, env = "SPOTIFY_REFRESH_TOKEN", hide_env_values = true)]
    pub spotify_refresh_token: Option<String>,
}

/// Fully resolved startup configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub bind: String,
    pub port: u16,
    pub database_url: String,
    pub credentials: ProviderCredentials,
    pub spotify: SpotifyClientConfig,
}

impl ServiceConfig {
    /// Resolve configuration from arguments, loading the TOML file if named
    pub fn from_args(args: &Args) -> Result<Self> {
        let toml_config = match &args.config {
            Some(path) => load_toml_config(path)?,
            None => TomlConfig::default(),
        };
        Self::resolve(args, &toml_config)
    }

    /// Resolve configuration from arguments and an already-loaded TOML config
    pub fn resolve(args: &Args, toml_config: &TomlConfig) -> Result<Self> {
        let overrides = CredentialOverrides {
            client_id: args.spotify_client_id.clone(),
            client_secret: args.spotify_client_secret.clone(),
            refresh_token: args.spotify_refresh_token.clone(),
        };
        let credentials = resolve_provider_credentials(&overrides, toml_config)?;

        Ok(Self {
            bind: args
                .bind
                .clone()
                .or_else(|| toml_config.bind.clone())
                .unwrap_or_else(|| DEFAULT_BIND.to_string()),
            port: args.port.or(toml_config.port).unwrap_or(DEFAULT_PORT),
            database_url: args
                .database_url
                .clone()
                .or_else(|| toml_config.database_url.clone())
                .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            credentials,
            spotify: SpotifyClientConfig::from_toml(&toml_config.spotify),
        })
    }

    /// Socket address string for the listener
    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}
