//! Frontend configuration module
//!
//! The backend location is fixed when the bundle is built: set
//! `EXPENSA_API_URL` for `trunk build`, otherwise the client defaults apply.

use shared::config::{ClientConfig, ConfigError, parse_base_url};
use url::Url;

/// Frontend configuration resolved at build time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebConfig {
    pub api_base_url: Url,
}

impl WebConfig {
    /// Reads `EXPENSA_API_URL` as captured by the compiler.
    pub fn from_build_env() -> Result<Self, ConfigError> {
        Self::resolve(option_env!("EXPENSA_API_URL"))
    }

    fn resolve(api_url: Option<&str>) -> Result<Self, ConfigError> {
        let api_base_url = match api_url.map(str::trim).filter(|value| !value.is_empty()) {
            Some(value) => parse_base_url(value)?,
            None => ClientConfig::with_defaults().api_base_url,
        };
        Ok(Self { api_base_url })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_value_falls_back_to_client_default() {
        let config = WebConfig::resolve(None).unwrap();
        assert_eq!(config.api_base_url, ClientConfig::with_defaults().api_base_url);
        assert_eq!(WebConfig::resolve(Some("  ")).unwrap(), config);
    }

    #[test]
    fn build_value_is_normalized() {
        let config = WebConfig::resolve(Some("https://expenses.example.com/backend")).unwrap();
        assert_eq!(
            config.api_base_url.as_str(),
            "https://expenses.example.com/backend/"
        );
        assert!(WebConfig::resolve(Some("not a url")).is_err());
    }
}
