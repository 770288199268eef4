//! Setting value validation.

use url::Url;

use super::defaults::{
    API_KEY, LOGO_MAX_BYTES, SERVER_PORT, TITLE_API_BASE_URL, TITLE_MODEL, TITLE_TIMEOUT_SECS,
};

/// Upper bound for `LOGO_MAX_BYTES` (10 MiB).
const LOGO_MAX_BYTES_LIMIT: u64 = 10 * 1024 * 1024;

/// Validate a setting value. Returns `Ok(())` if valid, or an error message.
pub fn validate_setting(key: &str, value: &str) -> Result<(), String> {
    match key {
        API_KEY => {
            if value.trim().is_empty() {
                return Err("must not be empty".into());
            }
        }
        SERVER_PORT => validate_int_range(value, 1, 65535)?,
        TITLE_MODEL => {
            if value.trim().is_empty() || value.contains('/') {
                return Err("must be a bare model name".into());
            }
        }
        TITLE_API_BASE_URL => {
            let url = Url::parse(value).map_err(|e| e.to_string())?;
            if url.scheme() != "http" && url.scheme() != "https" {
                return Err("must be an http(s) URL".into());
            }
        }
        TITLE_TIMEOUT_SECS => validate_int_range(value, 1, 120)?,
        LOGO_MAX_BYTES => validate_int_range(value, 1, LOGO_MAX_BYTES_LIMIT)?,
        _ => {}
    }
    Ok(())
}

fn validate_int_range(value: &str, min: u64, max: u64) -> Result<(), String> {
    let v: u64 = value.trim().parse().map_err(|_| "must be an integer")?;
    if v < min || v > max {
        return Err(format!("must be between {min} and {max}"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_range() {
        assert!(validate_setting(SERVER_PORT, "8080").is_ok());
        assert!(validate_setting(SERVER_PORT, "0").is_err());
        assert!(validate_setting(SERVER_PORT, "70000").is_err());
        assert!(validate_setting(SERVER_PORT, "http").is_err());
    }

    #[test]
    fn base_url_must_be_http() {
        assert!(validate_setting(TITLE_API_BASE_URL, "https://example.com/v1beta").is_ok());
        assert!(validate_setting(TITLE_API_BASE_URL, "ftp://example.com").is_err());
        assert!(validate_setting(TITLE_API_BASE_URL, "not a url").is_err());
    }

    #[test]
    fn model_name_is_bare() {
        assert!(validate_setting(TITLE_MODEL, "gemini-2.5-flash").is_ok());
        assert!(validate_setting(TITLE_MODEL, "models/gemini").is_err());
        assert!(validate_setting(TITLE_MODEL, " ").is_err());
    }

    #[test]
    fn logo_cap_is_bounded() {
        assert!(validate_setting(LOGO_MAX_BYTES, "1048576").is_ok());
        assert!(validate_setting(LOGO_MAX_BYTES, "0").is_err());
        assert!(validate_setting(LOGO_MAX_BYTES, "20971520").is_err());
    }

    #[test]
    fn unknown_keys_pass() {
        assert!(validate_setting("SOMETHING_ELSE", "anything").is_ok());
    }
}
