use serde::Deserialize;
use std::path::PathBuf;

/// Complete YAML configuration structure
///
/// All fields are optional to allow partial configuration. Values present in the
/// file override the environment.
///
/// # Example YAML structure
/// ```yaml
/// server:
///   host: "0.0.0.0"
///   port: 8000
///   tls:
///     cert_path: "/etc/fluentnow/cert.pem"
///     key_path: "/etc/fluentnow/key.pem"
///
/// live:
///   gcp_project: "fluentnow-prod"
///   gcp_region: "us-central1"
///   access_token: "ya29...."
///   model: "gemini-live-2.5-flash-preview-native-audio"
///   voice: "Puck"
///
/// auth:
///   required: true
///   api_secrets:
///     - id: "web"
///       secret: "your-api-secret"
///
/// security:
///   cors_allowed_origins: "https://app.fluentnow.example"
///   rate_limit_requests_per_second: 60
///   rate_limit_burst_size: 10
/// ```
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct YamlConfig {
    pub server: Option<ServerYaml>,
    pub live: Option<LiveYaml>,
    pub auth: Option<AuthYaml>,
    pub security: Option<SecurityYaml>,
}

/// Server configuration from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ServerYaml {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub tls: Option<TlsYaml>,
}

/// TLS configuration from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct TlsYaml {
    /// `false` turns TLS off even when the environment enables it
    pub enabled: Option<bool>,
    pub cert_path: Option<String>,
    pub key_path: Option<String>,
}

/// Live session configuration from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct LiveYaml {
    pub gcp_project: Option<String>,
    pub gcp_region: Option<String>,
    pub access_token: Option<String>,
    pub model: Option<String>,
    pub voice: Option<String>,
}

/// Authentication configuration from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AuthYaml {
    pub required: Option<bool>,
    /// Preferred multi-secret form. If non-empty, it takes precedence over api_secret.
    #[serde(default)]
    pub api_secrets: Vec<AuthApiSecretYaml>,
    /// Single-secret shorthand. Ignored when api_secrets is non-empty.
    pub api_secret: Option<String>,
}

/// API secret authentication entry in YAML
#[derive(Debug, Clone, Deserialize)]
pub struct AuthApiSecretYaml {
    pub id: String,
    pub secret: String,
}

/// Security configuration from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct SecurityYaml {
    /// CORS allowed origins (comma-separated list or "*" for all)
    pub cors_allowed_origins: Option<String>,
    /// Maximum requests per second per IP address
    pub rate_limit_requests_per_second: Option<u32>,
    /// Maximum burst size for rate limiting
    pub rate_limit_burst_size: Option<u32>,
}

impl YamlConfig {
    /// Load configuration from a YAML file
    ///
    /// # Errors
    /// Returns an error if:
    /// - The file cannot be read
    /// - The YAML is malformed
    /// - Required fields have invalid types
    pub fn from_file(path: &PathBuf) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file {}: {e}", path.display()))?;

        let config: YamlConfig = serde_yaml::from_str(&contents)
            .map_err(|e| format!("Failed to parse YAML config: {e}"))?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_yaml_config_full() {
        let yaml = r#"
server:
  host: "0.0.0.0"
  port: 8000
  tls:
    cert_path: "/certs/cert.pem"
    key_path: "/certs/key.pem"

live:
  gcp_project: "fluentnow-prod"
  gcp_region: "asia-northeast1"
  access_token: "token"
  model: "custom-model"
  voice: "Charon"

auth:
  required: true
  api_secrets:
    - id: "web"
      secret: "a"

security:
  cors_allowed_origins: "*"
  rate_limit_requests_per_second: 100
  rate_limit_burst_size: 20
"#;

        let config: YamlConfig = serde_yaml::from_str(yaml).unwrap();

        let server = config.server.unwrap();
        assert_eq!(server.port, Some(8000));
        assert_eq!(
            server.tls.unwrap().cert_path.as_deref(),
            Some("/certs/cert.pem")
        );

        let live = config.live.unwrap();
        assert_eq!(live.gcp_project.as_deref(), Some("fluentnow-prod"));
        assert_eq!(live.gcp_region.as_deref(), Some("asia-northeast1"));
        assert_eq!(live.voice.as_deref(), Some("Charon"));

        let auth = config.auth.unwrap();
        assert_eq!(auth.required, Some(true));
        assert_eq!(auth.api_secrets.len(), 1);

        let security = config.security.unwrap();
        assert_eq!(security.cors_allowed_origins.as_deref(), Some("*"));
        assert_eq!(security.rate_limit_burst_size, Some(20));
    }

    #[test]
    fn test_yaml_config_empty() {
        let config: YamlConfig = serde_yaml::from_str("{}").unwrap();

        assert!(config.server.is_none());
        assert!(config.live.is_none());
        assert!(config.auth.is_none());
        assert!(config.security.is_none());
    }

    #[test]
    fn test_yaml_config_single_api_secret() {
        let yaml = "auth:\n  api_secret: \"solo\"\n";
        let config: YamlConfig = serde_yaml::from_str(yaml).unwrap();

        let auth = config.auth.unwrap();
        assert!(auth.api_secrets.is_empty());
        assert_eq!(auth.api_secret.as_deref(), Some("solo"));
    }

    #[test]
    fn test_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        fs::write(&config_path, "server:\n  host: \"localhost\"\n  port: 3000\n").unwrap();

        let config = YamlConfig::from_file(&config_path).unwrap();

        assert_eq!(
            config.server.as_ref().unwrap().host,
            Some("localhost".to_string())
        );
        assert_eq!(config.server.as_ref().unwrap().port, Some(3000));
    }

    #[test]
    fn test_from_file_invalid_yaml() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("invalid.yaml");

        fs::write(&config_path, "invalid: yaml: content:").unwrap();

        let result = YamlConfig::from_file(&config_path);

        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to parse YAML")
        );
    }
}
