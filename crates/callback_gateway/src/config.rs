//! Process configuration
//!
//! All configuration is read from the environment once at startup and held
//! in an immutable [`AppConfig`] injected into the server and the analytics
//! bootstrapper. Nothing re-reads the environment at request time.

use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} environment variable not set")]
    MissingVar(&'static str),
    #[error("API_BASE_URL is not a valid URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),
}

/// Immutable process-wide configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Backend API origin the authorization code is exchanged against
    pub api_base_url: String,
    /// Analytics project key; analytics stays disabled when absent
    pub posthog_key: Option<String>,
    /// Development mode disables analytics
    pub dev_mode: bool,
}

impl AppConfig {
    /// Read configuration from the environment.
    ///
    /// `API_BASE_URL` is required and must parse as a URL. `POSTHOG_KEY`
    /// and `DEV_MODE` are optional.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_base_url = std::env::var("API_BASE_URL")
            .map_err(|_| ConfigError::MissingVar("API_BASE_URL"))?;
        let posthog_key = std::env::var("POSTHOG_KEY").ok();
        let dev_mode = parse_flag(std::env::var("DEV_MODE").ok().as_deref());

        Self::new(api_base_url, posthog_key, dev_mode)
    }

    /// Validate raw values into a config. The base URL keeps its origin
    /// form: any trailing slash is trimmed so paths can be appended.
    pub fn new(
        api_base_url: String,
        posthog_key: Option<String>,
        dev_mode: bool,
    ) -> Result<Self, ConfigError> {
        Url::parse(&api_base_url)?;

        Ok(Self {
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            posthog_key: posthog_key.filter(|key| !key.is_empty()),
            dev_mode,
        })
    }
}

fn parse_flag(value: Option<&str>) -> bool {
    matches!(value, Some("1") | Some("true") | Some("TRUE") | Some("True"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_base_url_is_accepted() {
        let config =
            AppConfig::new("https://api.example.com".to_string(), None, false).unwrap();
        assert_eq!(config.api_base_url, "https://api.example.com");
        assert!(config.posthog_key.is_none());
        assert!(!config.dev_mode);
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let config =
            AppConfig::new("https://api.example.com/".to_string(), None, false).unwrap();
        assert_eq!(config.api_base_url, "https://api.example.com");
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let result = AppConfig::new("not a url".to_string(), None, false);
        assert!(matches!(result, Err(ConfigError::InvalidBaseUrl(_))));
    }

    #[test]
    fn empty_posthog_key_counts_as_absent() {
        let config = AppConfig::new(
            "https://api.example.com".to_string(),
            Some(String::new()),
            false,
        )
        .unwrap();
        assert!(config.posthog_key.is_none());
    }

    #[test]
    fn dev_mode_flag_parsing() {
        assert!(parse_flag(Some("1")));
        assert!(parse_flag(Some("true")));
        assert!(!parse_flag(Some("0")));
        assert!(!parse_flag(Some("false")));
        assert!(!parse_flag(None));
    }
}
