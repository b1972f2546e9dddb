//! Configuration module for the FluentNow gateway
//!
//! This module handles server configuration from various sources: .env files, YAML files,
//! and environment variables. Priority: YAML > ENV vars > .env values > defaults.
//!
//! # Modules
//! - `yaml`: YAML configuration file loading
//! - `env`: Environment variable loading
//! - `merge`: Merging YAML and environment configurations
//! - `validation`: Configuration validation logic
//! - `utils`: Utility functions for configuration parsing
//!
//! # Example
//! ```rust,no_run
//! use fluentnow_gateway::config::ServerConfig;
//! use std::path::PathBuf;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Load from environment variables only
//! let config = ServerConfig::from_env()?;
//!
//! // Load from a YAML file merged over the environment
//! let config_path = PathBuf::from("config.yaml");
//! let config = ServerConfig::from_file(&config_path)?;
//!
//! println!("Server listening on {}", config.address());
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;

mod env;
mod merge;
mod utils;
mod validation;
mod yaml;

/// TLS configuration for HTTPS and WSS
#[derive(Debug, Clone)]
pub struct TlsConfig {
    /// Path to the TLS certificate file (PEM format)
    pub cert_path: PathBuf,
    /// Path to the TLS private key file (PEM format)
    pub key_path: PathBuf,
}

/// API secret authentication entry with a client identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthApiSecret {
    pub id: String,
    pub secret: String,
}

/// Server configuration
///
/// Contains everything needed to run the gateway:
/// - Server settings (host, port, TLS)
/// - Live session settings (Google Cloud project, region, token, model, voice)
/// - Authentication settings
/// - Security settings (CORS, rate limiting)
#[derive(Debug, Clone)]
pub struct ServerConfig {
    // Server settings
    pub host: String,
    pub port: u16,

    // TLS configuration (optional)
    pub tls: Option<TlsConfig>,

    // Live session settings
    /// Google Cloud project hosting the Live API.
    /// When unset, every conversation runs in demo mode.
    pub gcp_project: Option<String>,
    /// Vertex AI region (default "us-central1")
    pub gcp_region: String,
    /// OAuth access token sent as `Authorization: Bearer` to the Live API
    pub google_access_token: Option<String>,
    /// Live model id (without the resource prefix)
    pub live_model: String,
    /// Prebuilt voice used for every conversation
    pub live_voice: String,

    // Authentication configuration
    pub auth_api_secrets: Vec<AuthApiSecret>,
    pub auth_required: bool,

    // Security configuration
    /// CORS allowed origins (comma-separated list or "*" for all)
    /// Default: None (CORS disabled, same-origin only)
    pub cors_allowed_origins: Option<String>,

    // Rate limiting configuration
    /// Maximum requests per second per IP address
    /// Default: 60
    pub rate_limit_requests_per_second: u32,
    /// Maximum burst size for rate limiting
    /// Default: 10
    pub rate_limit_burst_size: u32,
}

/// Zeroize every secret field when the configuration is dropped.
impl Drop for ServerConfig {
    fn drop(&mut self) {
        use zeroize::Zeroize;

        if let Some(ref mut token) = self.google_access_token {
            token.zeroize();
        }
        for secret in &mut self.auth_api_secrets {
            secret.secret.zeroize();
        }
    }
}

impl ServerConfig {
    /// Load configuration from a YAML file with environment variable base
    ///
    /// Priority order (highest to lowest):
    /// 1. YAML file values
    /// 2. Environment variables (actual ENV vars override .env values)
    /// 3. .env file values
    /// 4. Default values
    ///
    /// After loading and merging, performs validation on the final configuration.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The YAML file cannot be read or is malformed
    /// - Environment variables have invalid formats
    /// - Configuration validation fails
    pub fn from_file(path: &PathBuf) -> Result<Self, Box<dyn std::error::Error>> {
        // .env is loaded into the process environment in main.rs, so the
        // environment already carries both layers here.
        let yaml_config = yaml::YamlConfig::from_file(path)?;
        let config = merge::merge_config(Some(yaml_config))?;
        config.validate()?;
        Ok(config)
    }

    /// Run every validation rule against a fully merged configuration.
    pub(crate) fn validate(&self) -> Result<(), Box<dyn std::error::Error>> {
        validation::validate_auth_api_secrets(&self.auth_api_secrets)?;
        validation::validate_auth_required(self.auth_required, &self.auth_api_secrets)?;
        validation::validate_live_settings(&self.gcp_region, &self.live_model, &self.live_voice)?;
        Ok(())
    }

    /// Get the server address as a string
    ///
    /// Returns the address in the format "host:port"
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Check if TLS is enabled
    pub fn is_tls_enabled(&self) -> bool {
        self.tls.is_some()
    }

    /// Check if API secret authentication is configured
    ///
    /// Returns true if at least one API secret entry is configured
    pub fn has_api_secret_auth(&self) -> bool {
        !self.auth_api_secrets.is_empty()
    }

    /// Whether a Google Cloud project is configured for live sessions.
    pub fn has_live_project(&self) -> bool {
        self.gcp_project.is_some()
    }
}

pub(crate) fn parse_auth_api_secrets_json(
    json_str: &str,
) -> Result<Vec<AuthApiSecret>, Box<dyn std::error::Error>> {
    #[derive(serde::Deserialize)]
    struct AuthApiSecretJson {
        id: String,
        secret: String,
    }

    let secrets: Vec<AuthApiSecretJson> = serde_json::from_str(json_str)
        .map_err(|e| format!("Invalid AUTH_API_SECRETS_JSON format: {e}"))?;

    Ok(secrets
        .into_iter()
        .map(|entry| AuthApiSecret {
            id: entry.id,
            secret: entry.secret,
        })
        .collect())
}
