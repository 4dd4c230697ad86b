use crate::utils::error::{Result, TrackingError};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(TrackingError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(TrackingError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(TrackingError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(TrackingError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(TrackingError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(TrackingError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_non_empty_list(field_name: &str, values: &[String]) -> Result<()> {
    if values.is_empty() {
        return Err(TrackingError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: "[]".to_string(),
            reason: "At least one entry is required".to_string(),
        });
    }
    for value in values {
        validate_non_empty_string(field_name, value)?;
    }
    Ok(())
}

/// Prefixes are compared against normalized numbers, so they must be uppercase alphanumerics.
pub fn validate_prefixes(field_name: &str, prefixes: &[String]) -> Result<()> {
    for prefix in prefixes {
        if prefix.is_empty()
            || !prefix
                .chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        {
            return Err(TrackingError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: prefix.clone(),
                reason: "Prefix must be uppercase letters or digits".to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("tracking_url_template", "https://example.com").is_ok());
        assert!(validate_url("tracking_url_template", "http://example.com").is_ok());
        assert!(validate_url("tracking_url_template", "").is_err());
        assert!(validate_url("tracking_url_template", "invalid-url").is_err());
        assert!(validate_url("tracking_url_template", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_path() {
        assert!(validate_path("store.path", "./orders.json").is_ok());
        assert!(validate_path("store.path", "").is_err());
        assert!(validate_path("store.path", "bad\0path").is_err());
    }

    #[test]
    fn test_validate_non_empty_list() {
        assert!(validate_non_empty_list("staff_roles", &["shop_manager".to_string()]).is_ok());
        assert!(validate_non_empty_list("staff_roles", &[]).is_err());
        assert!(validate_non_empty_list("staff_roles", &["  ".to_string()]).is_err());
    }

    #[test]
    fn test_validate_prefixes() {
        assert!(validate_prefixes("known_prefixes", &["9400".to_string(), "EC".to_string()]).is_ok());
        assert!(validate_prefixes("known_prefixes", &["94-00".to_string()]).is_err());
        assert!(validate_prefixes("known_prefixes", &["ec".to_string()]).is_err());
    }
}
