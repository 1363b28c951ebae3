use serde::Deserialize;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

// ---------------------------------------------------------------------------
// Config structs
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Page size for the photo list; the backend caps it at 50.
    #[serde(default = "default_photo_list_limit")]
    pub photo_list_limit: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionConfig {
    /// JSON file holding the persisted `accessToken` / `refreshToken` keys.
    #[serde(default = "default_store_path")]
    pub store_path: String,
}

/// Client-side routes the pages navigate between.
#[derive(Debug, Deserialize, Clone)]
pub struct PagesConfig {
    #[serde(default = "default_login_page")]
    pub login: String,
    #[serde(default = "default_signup_page")]
    pub signup: String,
    #[serde(default = "default_home_page")]
    pub home: String,
    #[serde(default = "default_photo_page")]
    pub photo: String,
    #[serde(default = "default_user_page")]
    pub user: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub pages: PagesConfig,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            photo_list_limit: default_photo_list_limit(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
        }
    }
}

impl Default for PagesConfig {
    fn default() -> Self {
        Self {
            login: default_login_page(),
            signup: default_signup_page(),
            home: default_home_page(),
            photo: default_photo_page(),
            user: default_user_page(),
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

impl ApiConfig {
    /// Resolve the API base URL with `PHOTOSHARE_API_URL` taking priority over
    /// the config file field. Trailing slashes are dropped so paths can be
    /// appended verbatim.
    pub fn resolved_base_url(&self) -> String {
        std::env::var("PHOTOSHARE_API_URL")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| self.base_url.clone())
            .trim_end_matches('/')
            .to_string()
    }
}

impl SessionConfig {
    /// Store path with a leading `~/` expanded to `$HOME`.
    pub fn expanded_store_path(&self) -> std::path::PathBuf {
        if let Some(rest) = self.store_path.strip_prefix("~/") {
            if let Some(home) = std::env::var_os("HOME") {
                let mut path = std::path::PathBuf::from(home);
                path.push(rest);
                return path;
            }
        }
        std::path::PathBuf::from(&self.store_path)
    }
}

// ---------------------------------------------------------------------------
// Serde defaults
// ---------------------------------------------------------------------------

pub fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

pub fn default_photo_list_limit() -> u32 {
    50
}

pub fn default_store_path() -> String {
    "~/.photoshare/session.json".to_string()
}

pub fn default_login_page() -> String {
    "/templates/login.html".to_string()
}

pub fn default_signup_page() -> String {
    "/templates/signup.html".to_string()
}

pub fn default_home_page() -> String {
    "/templates/images.html".to_string()
}

pub fn default_photo_page() -> String {
    "/templates/photo.html".to_string()
}

pub fn default_user_page() -> String {
    "/templates/user.html".to_string()
}
