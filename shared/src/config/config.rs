use std::fs;
use std::path::Path;
use tracing::{debug, error, info, warn};

use crate::types::client_config::{AppConfig, ConfigError};

pub fn load_config(path: &str) -> Result<AppConfig, ConfigError> {
    info!("Loading configuration from: {}", path);

    let contents = fs::read_to_string(path)?;
    debug!("Processing file: {}", path);

    if contents.trim().is_empty() {
        error!("Configuration file is empty");
        return Err(ConfigError::InvalidConfig("empty file".into()));
    }

    let config: AppConfig = toml::from_str(&contents)?;

    info!("Configuration loaded successfully");
    debug!("Config: {:?}", config);

    validate_config(&config)?;

    info!("Config validated");

    Ok(config)
}

/// Like [`load_config`], but a missing file yields the built-in defaults.
/// A file that exists and fails to parse or validate is still an error.
pub fn load_config_or_default(path: &str) -> Result<AppConfig, ConfigError> {
    if !Path::new(path).exists() {
        warn!("Config file {} not found, using defaults", path);
        let config = AppConfig::default();
        validate_config(&config)?;
        return Ok(config);
    }
    load_config(path)
}

fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    let base_url = config.api.resolved_base_url();
    if base_url.is_empty() {
        return Err(ConfigError::InvalidConfig("api.base_url cannot be empty".into()));
    }

    if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
        return Err(ConfigError::InvalidConfig(
            "api.base_url must be an http:// or https:// URL".into(),
        ));
    }

    if config.api.photo_list_limit == 0 || config.api.photo_list_limit > 50 {
        return Err(ConfigError::InvalidConfig(
            "api.photo_list_limit must be between 1 and 50".into(),
        ));
    }

    if config.session.store_path.is_empty() {
        return Err(ConfigError::InvalidConfig(
            "session.store_path cannot be empty".into(),
        ));
    }

    for (name, route) in [
        ("login", &config.pages.login),
        ("signup", &config.pages.signup),
        ("home", &config.pages.home),
        ("photo", &config.pages.photo),
        ("user", &config.pages.user),
    ] {
        if !route.starts_with('/') {
            return Err(ConfigError::InvalidConfig(format!(
                "pages.{} must be an absolute path",
                name
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn empty_file_is_rejected() {
        let file = write_config("   \n");
        let err = load_config(file.path().to_str().unwrap()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidConfig(_)));
    }

    #[test]
    fn limit_above_backend_cap_is_rejected() {
        let file = write_config("[api]\nbase_url = \"http://api.test\"\nphoto_list_limit = 80\n");
        let err = load_config(file.path().to_str().unwrap()).unwrap_err();
        assert!(err.to_string().contains("photo_list_limit"));
    }

    #[test]
    fn https_base_url_is_accepted() {
        let file = write_config("[api]\nbase_url = \"https://photos.example.com\"\n");
        let cfg = load_config(file.path().to_str().unwrap()).unwrap();
        assert_eq!(cfg.api.base_url, "https://photos.example.com");
    }

    #[test]
    fn other_url_schemes_are_rejected() {
        let file = write_config("[api]\nbase_url = \"ftp://photos.example.com\"\n");
        let err = load_config(file.path().to_str().unwrap()).unwrap_err();
        assert!(err.to_string().contains("https://"));
    }

    #[test]
    fn relative_page_route_is_rejected() {
        let file = write_config("[pages]\nlogin = \"login.html\"\n");
        let err = load_config(file.path().to_str().unwrap()).unwrap_err();
        assert!(err.to_string().contains("pages.login"));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let cfg = load_config_or_default("/nonexistent/photoshare.toml").unwrap();
        assert_eq!(cfg.api.photo_list_limit, 50);
        assert_eq!(cfg.pages.login, "/templates/login.html");
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let file = write_config("[api\nbase_url = ");
        let err = load_config(file.path().to_str().unwrap()).unwrap_err();
        assert!(matches!(err, ConfigError::TomlParse(_)));
    }
}
