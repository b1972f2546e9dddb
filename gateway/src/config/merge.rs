use std::path::PathBuf;

use super::env::{DEFAULT_API_SECRET_ID, load_from_env};
use super::yaml::YamlConfig;
use super::{AuthApiSecret, ServerConfig, TlsConfig};

/// Merge the environment (base) with YAML overrides.
///
/// Every value present in the YAML file replaces the environment value; absent
/// values leave the environment (or its default) in place.
pub(super) fn merge_config(
    yaml: Option<YamlConfig>,
) -> Result<ServerConfig, Box<dyn std::error::Error>> {
    let mut config = load_from_env()?;
    let Some(yaml) = yaml else {
        return Ok(config);
    };

    if let Some(server) = yaml.server {
        if let Some(host) = server.host {
            config.host = host;
        }
        if let Some(port) = server.port {
            config.port = port;
        }
        if let Some(tls) = server.tls {
            if tls.enabled == Some(false) {
                config.tls = None;
            } else {
                match (tls.cert_path, tls.key_path) {
                    (Some(cert), Some(key)) => {
                        config.tls = Some(TlsConfig {
                            cert_path: PathBuf::from(cert),
                            key_path: PathBuf::from(key),
                        });
                    }
                    (None, None) => {}
                    _ => return Err("server.tls needs both cert_path and key_path".into()),
                }
            }
        }
    }

    if let Some(live) = yaml.live {
        if let Some(project) = live.gcp_project.filter(|p| !p.trim().is_empty()) {
            config.gcp_project = Some(project);
        }
        if let Some(region) = live.gcp_region {
            config.gcp_region = region;
        }
        if let Some(token) = live.access_token {
            config.google_access_token = Some(token);
        }
        if let Some(model) = live.model {
            config.live_model = model;
        }
        if let Some(voice) = live.voice {
            config.live_voice = voice;
        }
    }

    if let Some(auth) = yaml.auth {
        if let Some(required) = auth.required {
            config.auth_required = required;
        }
        if !auth.api_secrets.is_empty() {
            config.auth_api_secrets = auth
                .api_secrets
                .into_iter()
                .map(|entry| AuthApiSecret {
                    id: entry.id,
                    secret: entry.secret,
                })
                .collect();
        } else if let Some(secret) = auth.api_secret {
            config.auth_api_secrets = vec![AuthApiSecret {
                id: DEFAULT_API_SECRET_ID.to_string(),
                secret,
            }];
        }
    }

    if let Some(security) = yaml.security {
        if let Some(origins) = security.cors_allowed_origins {
            config.cors_allowed_origins = Some(origins);
        }
        if let Some(rps) = security.rate_limit_requests_per_second {
            config.rate_limit_requests_per_second = rps;
        }
        if let Some(burst) = security.rate_limit_burst_size {
            config.rate_limit_burst_size = burst;
        }
    }

    Ok(config)
}
