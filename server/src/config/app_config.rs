//! Runtime application configuration loaded from the environment.

use std::fmt;
use std::time::Duration;

use title_client::GeminiConfig;

use super::defaults::{
    self, SettingDef, API_KEY, DEF_API_KEY, DEF_LOGO_MAX_BYTES, DEF_SERVER_PORT,
    DEF_TITLE_API_BASE_URL, DEF_TITLE_MODEL, DEF_TITLE_TIMEOUT_SECS, LOGO_MAX_BYTES, SERVER_PORT,
    TITLE_API_BASE_URL, TITLE_MODEL, TITLE_TIMEOUT_SECS,
};
use super::validation::validate_setting;
use super::{ConfigError, SettingInfo, SettingType};

/// Runtime configuration. Loaded once at startup.
#[derive(Clone)]
pub struct AppConfig {
    pub api_key: String,
    pub server_port: u16,
    pub title_model: String,
    pub title_api_base_url: String,
    pub title_timeout_secs: u64,
    pub logo_max_bytes: usize,
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &"********")
            .field("server_port", &self.server_port)
            .field("title_model", &self.title_model)
            .field("title_api_base_url", &self.title_api_base_url)
            .field("title_timeout_secs", &self.title_timeout_secs)
            .field("logo_max_bytes", &self.logo_max_bytes)
            .finish()
    }
}

impl AppConfig {
    /// Load configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    ///
    /// Unset or blank values take their defaults; a missing `API_KEY` is an error.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let g = |def: &SettingDef| -> Result<String, ConfigError> {
            let value = lookup(def.key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty());
            let value = match value {
                Some(v) => v,
                None if def.required => return Err(ConfigError::Missing(def.key)),
                None => def.default.to_string(),
            };
            validate_setting(def.key, &value).map_err(|reason| ConfigError::Invalid {
                key: def.key,
                reason,
            })?;
            Ok(value)
        };

        Ok(Self {
            api_key: g(&DEF_API_KEY)?,
            server_port: parse(SERVER_PORT, &g(&DEF_SERVER_PORT)?)?,
            title_model: g(&DEF_TITLE_MODEL)?,
            title_api_base_url: g(&DEF_TITLE_API_BASE_URL)?,
            title_timeout_secs: parse(TITLE_TIMEOUT_SECS, &g(&DEF_TITLE_TIMEOUT_SECS)?)?,
            logo_max_bytes: parse(LOGO_MAX_BYTES, &g(&DEF_LOGO_MAX_BYTES)?)?,
        })
    }

    /// Defaults for everything except the API key.
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        let d = |key| defaults::get_default(key).unwrap_or_default();
        Self {
            api_key: api_key.into(),
            server_port: d(SERVER_PORT).parse().unwrap_or(8080),
            title_model: d(TITLE_MODEL).to_string(),
            title_api_base_url: d(TITLE_API_BASE_URL).to_string(),
            title_timeout_secs: d(TITLE_TIMEOUT_SECS).parse().unwrap_or(15),
            logo_max_bytes: d(LOGO_MAX_BYTES)
                .parse()
                .unwrap_or(image_engine::DEFAULT_MAX_LOGO_BYTES),
        }
    }

    /// Settings for the Gemini title client.
    pub fn gemini_config(&self) -> GeminiConfig {
        GeminiConfig::new(self.api_key.clone())
            .with_model(self.title_model.clone())
            .with_base_url(self.title_api_base_url.clone())
            .with_timeout(Duration::from_secs(self.title_timeout_secs))
    }

    /// Current settings for display, with secrets masked.
    pub fn describe(&self) -> Vec<SettingInfo> {
        defaults::SETTINGS
            .iter()
            .map(|def| {
                let value = match def.key {
                    API_KEY => self.api_key.clone(),
                    SERVER_PORT => self.server_port.to_string(),
                    TITLE_MODEL => self.title_model.clone(),
                    TITLE_API_BASE_URL => self.title_api_base_url.clone(),
                    TITLE_TIMEOUT_SECS => self.title_timeout_secs.to_string(),
                    LOGO_MAX_BYTES => self.logo_max_bytes.to_string(),
                    _ => String::new(),
                };
                let has_value = !value.is_empty();
                let (setting_type, value) = if def.secret {
                    (SettingType::Secret, mask(&value))
                } else {
                    (SettingType::Normal, value)
                };
                SettingInfo {
                    key: def.key.to_string(),
                    value,
                    setting_type,
                    required: def.required,
                    description: def.description.to_string(),
                    has_value,
                }
            })
            .collect()
    }
}

fn parse<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::Invalid {
        key,
        reason: "out of range".into(),
    })
}

fn mask(secret: &str) -> String {
    if secret.is_empty() {
        String::new()
    } else {
        "*".repeat(secret.chars().count().min(8))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn missing_api_key_is_fatal() {
        let err = load(&[]).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("API_KEY")));
        assert_eq!(err.to_string(), "API_KEY environment variable not set");
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        assert!(matches!(
            load(&[("API_KEY", "   ")]),
            Err(ConfigError::Missing("API_KEY"))
        ));
    }

    #[test]
    fn defaults_fill_everything_else() {
        let config = load(&[("API_KEY", "k")]).unwrap();
        assert_eq!(config.server_port, 8080);
        assert_eq!(config.title_model, "gemini-2.5-flash");
        assert_eq!(config.title_timeout_secs, 15);
        assert_eq!(config.logo_max_bytes, 1024 * 1024);
    }

    #[test]
    fn overrides_are_applied() {
        let config = load(&[
            ("API_KEY", "k"),
            ("SERVER_PORT", "9090"),
            ("TITLE_MODEL", "gemini-test"),
            ("LOGO_MAX_BYTES", "2048"),
        ])
        .unwrap();
        assert_eq!(config.server_port, 9090);
        assert_eq!(config.title_model, "gemini-test");
        assert_eq!(config.logo_max_bytes, 2048);
    }

    #[test]
    fn invalid_value_names_the_key() {
        let err = load(&[("API_KEY", "k"), ("TITLE_TIMEOUT_SECS", "0")]).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                key: "TITLE_TIMEOUT_SECS",
                ..
            }
        ));
    }

    #[test]
    fn with_api_key_matches_env_defaults() {
        let a = AppConfig::with_api_key("k");
        let b = load(&[("API_KEY", "k")]).unwrap();
        assert_eq!(format!("{a:?}"), format!("{b:?}"));
    }

    #[test]
    fn describe_masks_the_secret() {
        let config = AppConfig::with_api_key("super-secret-value");
        let infos = config.describe();
        let key = infos.iter().find(|i| i.key == "API_KEY").unwrap();
        assert_eq!(key.setting_type, SettingType::Secret);
        assert_eq!(key.value, "********");
        assert!(key.has_value);
        assert!(!format!("{config:?}").contains("super-secret-value"));
    }
}
