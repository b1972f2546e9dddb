use super::AuthApiSecret;

/// Every API secret entry needs a non-empty id and secret, and ids must be unique.
pub(super) fn validate_auth_api_secrets(
    secrets: &[AuthApiSecret],
) -> Result<(), Box<dyn std::error::Error>> {
    for (index, entry) in secrets.iter().enumerate() {
        if entry.id.trim().is_empty() {
            return Err(format!("API secret entry {index} has an empty id").into());
        }
        if entry.secret.is_empty() {
            return Err(format!("API secret '{}' has an empty secret", entry.id).into());
        }
        if secrets[..index].iter().any(|other| other.id == entry.id) {
            return Err(format!("Duplicate API secret id '{}'", entry.id).into());
        }
    }
    Ok(())
}

/// Requiring auth without any way to authenticate locks every client out.
pub(super) fn validate_auth_required(
    auth_required: bool,
    secrets: &[AuthApiSecret],
) -> Result<(), Box<dyn std::error::Error>> {
    if auth_required && secrets.is_empty() {
        return Err(
            "AUTH_REQUIRED is enabled but no API secrets are configured \
             (set AUTH_API_SECRETS_JSON or AUTH_API_SECRET)"
                .into(),
        );
    }
    Ok(())
}

pub(super) fn validate_live_settings(
    region: &str,
    model: &str,
    voice: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    for (name, value) in [("GCP_REGION", region), ("LIVE_MODEL", model), ("LIVE_VOICE", voice)] {
        if value.trim().is_empty() {
            return Err(format!("{name} must not be empty").into());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret(id: &str, secret: &str) -> AuthApiSecret {
        AuthApiSecret {
            id: id.to_string(),
            secret: secret.to_string(),
        }
    }

    #[test]
    fn test_valid_secrets() {
        assert!(validate_auth_api_secrets(&[secret("web", "a"), secret("ios", "b")]).is_ok());
        assert!(validate_auth_api_secrets(&[]).is_ok());
    }

    #[test]
    fn test_empty_id_or_secret_rejected() {
        assert!(validate_auth_api_secrets(&[secret(" ", "a")]).is_err());
        assert!(validate_auth_api_secrets(&[secret("web", "")]).is_err());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let err = validate_auth_api_secrets(&[secret("web", "a"), secret("web", "b")]).unwrap_err();
        assert!(err.to_string().contains("Duplicate"));
    }

    #[test]
    fn test_auth_required_needs_secrets() {
        assert!(validate_auth_required(true, &[]).is_err());
        assert!(validate_auth_required(true, &[secret("web", "a")]).is_ok());
        assert!(validate_auth_required(false, &[]).is_ok());
    }

    #[test]
    fn test_live_settings_must_not_be_blank() {
        assert!(validate_live_settings("us-central1", "model", "Puck").is_ok());
        assert!(validate_live_settings("", "model", "Puck").is_err());
        assert!(validate_live_settings("us-central1", "model", " ").is_err());
    }
}
