use std::str::FromStr;

/// Parse a boolean configuration value.
///
/// Accepts `true/false`, `1/0` and `yes/no`, case-insensitively.
pub(super) fn parse_bool(value: &str, name: &str) -> Result<bool, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => Err(format!(
            "Invalid value for {name}: '{other}' (expected true/false, 1/0 or yes/no)"
        )),
    }
}

/// Read an environment variable, treating empty or whitespace-only values as unset.
pub(super) fn env_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Read and parse an environment variable, falling back to `default` when unset.
pub(super) fn env_parse<T>(name: &str, default: T) -> Result<T, String>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env_var(name) {
        Some(raw) => raw
            .parse()
            .map_err(|e| format!("Invalid value for {name}: '{raw}' ({e})")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool_accepted_forms() {
        for truthy in ["true", "TRUE", "1", "yes", " Yes "] {
            assert!(parse_bool(truthy, "FLAG").unwrap(), "{truthy}");
        }
        for falsy in ["false", "False", "0", "no", "NO"] {
            assert!(!parse_bool(falsy, "FLAG").unwrap(), "{falsy}");
        }
    }

    #[test]
    fn test_parse_bool_rejects_other_values() {
        let err = parse_bool("maybe", "AUTH_REQUIRED").unwrap_err();
        assert!(err.contains("AUTH_REQUIRED"));
        assert!(err.contains("maybe"));
    }
}
