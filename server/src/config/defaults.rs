//! All setting definitions with their default values.

/// A single setting definition.
#[derive(Debug, Clone, Copy)]
pub struct SettingDef {
    pub key: &'static str,
    pub default: &'static str,
    pub secret: bool,
    pub required: bool,
    pub description: &'static str,
}

pub const API_KEY: &str = "API_KEY";
pub const SERVER_PORT: &str = "SERVER_PORT";
pub const TITLE_MODEL: &str = "TITLE_MODEL";
pub const TITLE_API_BASE_URL: &str = "TITLE_API_BASE_URL";
pub const TITLE_TIMEOUT_SECS: &str = "TITLE_TIMEOUT_SECS";
pub const LOGO_MAX_BYTES: &str = "LOGO_MAX_BYTES";

pub const DEF_API_KEY: SettingDef = SettingDef {
    key: API_KEY,
    default: "",
    secret: true,
    required: true,
    description: "Gemini API key used for page title lookup",
};

pub const DEF_SERVER_PORT: SettingDef = SettingDef {
    key: SERVER_PORT,
    default: "8080",
    secret: false,
    required: false,
    description: "HTTP listen port",
};

pub const DEF_TITLE_MODEL: SettingDef = SettingDef {
    key: TITLE_MODEL,
    default: "gemini-2.5-flash",
    secret: false,
    required: false,
    description: "Model used for page title lookup",
};

pub const DEF_TITLE_API_BASE_URL: SettingDef = SettingDef {
    key: TITLE_API_BASE_URL,
    default: "https://generativelanguage.googleapis.com/v1beta",
    secret: false,
    required: false,
    description: "Base URL of the Gemini API",
};

pub const DEF_TITLE_TIMEOUT_SECS: SettingDef = SettingDef {
    key: TITLE_TIMEOUT_SECS,
    default: "15",
    secret: false,
    required: false,
    description: "Timeout for a single title lookup, in seconds",
};

pub const DEF_LOGO_MAX_BYTES: SettingDef = SettingDef {
    key: LOGO_MAX_BYTES,
    default: "1048576",
    secret: false,
    required: false,
    description: "Largest accepted logo upload, in bytes",
};

pub const SETTINGS: &[SettingDef] = &[
    DEF_API_KEY,
    DEF_SERVER_PORT,
    DEF_TITLE_MODEL,
    DEF_TITLE_API_BASE_URL,
    DEF_TITLE_TIMEOUT_SECS,
    DEF_LOGO_MAX_BYTES,
];

/// Get the definition of a setting key, or `None` if not defined.
pub fn get_def(key: &str) -> Option<&'static SettingDef> {
    SETTINGS.iter().find(|d| d.key == key)
}

/// Get the default value for a setting key, or `None` if not defined.
pub fn get_default(key: &str) -> Option<&'static str> {
    get_def(key).map(|d| d.default)
}
