use std::path::PathBuf;

use super::utils::{env_parse, env_var, parse_bool};
use super::{AuthApiSecret, ServerConfig, TlsConfig, parse_auth_api_secrets_json};
use crate::core::live::{DEFAULT_GEMINI_MODEL, DEFAULT_GEMINI_REGION, DEFAULT_GEMINI_VOICE};

/// Id given to a secret configured through `AUTH_API_SECRET` without `AUTH_API_SECRET_ID`.
pub(super) const DEFAULT_API_SECRET_ID: &str = "default";

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// Reads configuration from environment variables with sensible defaults.
    /// The `.env` file, if any, is expected to have been loaded into the process
    /// environment by the caller.
    ///
    /// # Environment Variables
    /// - `HOST` (default "0.0.0.0"), `PORT` (default 8000)
    /// - `TLS_CERT_PATH` + `TLS_KEY_PATH`: enable TLS when both are set
    /// - `GCP_PROJECT`: Google Cloud project; unset means demo mode
    /// - `GCP_REGION` (default "us-central1")
    /// - `GOOGLE_ACCESS_TOKEN`: bearer token for the Live API
    /// - `LIVE_MODEL`, `LIVE_VOICE`
    /// - `AUTH_REQUIRED` (default false)
    /// - `AUTH_API_SECRETS_JSON`, or `AUTH_API_SECRET` + `AUTH_API_SECRET_ID`
    /// - `CORS_ALLOWED_ORIGINS`
    /// - `RATE_LIMIT_REQUESTS_PER_SECOND` (default 60), `RATE_LIMIT_BURST_SIZE` (default 10)
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        let config = load_from_env()?;
        config.validate()?;
        Ok(config)
    }
}

/// Build a configuration from the process environment without validating it.
pub(super) fn load_from_env() -> Result<ServerConfig, Box<dyn std::error::Error>> {
    let tls = match (env_var("TLS_CERT_PATH"), env_var("TLS_KEY_PATH")) {
        (Some(cert), Some(key)) => Some(TlsConfig {
            cert_path: PathBuf::from(cert),
            key_path: PathBuf::from(key),
        }),
        (None, None) => None,
        _ => return Err("TLS_CERT_PATH and TLS_KEY_PATH must be set together".into()),
    };

    let auth_required = match env_var("AUTH_REQUIRED") {
        Some(raw) => parse_bool(&raw, "AUTH_REQUIRED")?,
        None => false,
    };

    Ok(ServerConfig {
        host: env_var("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
        port: env_parse("PORT", 8000u16)?,
        tls,
        gcp_project: env_var("GCP_PROJECT"),
        gcp_region: env_var("GCP_REGION").unwrap_or_else(|| DEFAULT_GEMINI_REGION.to_string()),
        google_access_token: env_var("GOOGLE_ACCESS_TOKEN"),
        live_model: env_var("LIVE_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
        live_voice: env_var("LIVE_VOICE").unwrap_or_else(|| DEFAULT_GEMINI_VOICE.to_string()),
        auth_api_secrets: load_auth_api_secrets()?,
        auth_required,
        cors_allowed_origins: env_var("CORS_ALLOWED_ORIGINS"),
        rate_limit_requests_per_second: env_parse("RATE_LIMIT_REQUESTS_PER_SECOND", 60u32)?,
        rate_limit_burst_size: env_parse("RATE_LIMIT_BURST_SIZE", 10u32)?,
    })
}

/// `AUTH_API_SECRETS_JSON` wins over the single `AUTH_API_SECRET` form.
fn load_auth_api_secrets() -> Result<Vec<AuthApiSecret>, Box<dyn std::error::Error>> {
    if let Some(json) = env_var("AUTH_API_SECRETS_JSON") {
        return parse_auth_api_secrets_json(&json);
    }

    Ok(env_var("AUTH_API_SECRET")
        .map(|secret| {
            vec![AuthApiSecret {
                id: env_var("AUTH_API_SECRET_ID")
                    .unwrap_or_else(|| DEFAULT_API_SECRET_ID.to_string()),
                secret,
            }]
        })
        .unwrap_or_default())
}
