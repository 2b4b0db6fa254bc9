use serde::{Deserialize, Serialize};
use std::{
    env, fmt, fs,
    path::{Path, PathBuf},
    str::FromStr,
};
use thiserror::Error;
use url::Url;

const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/";
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Errors raised while resolving a [`ClientConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse configuration file {path}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("unsupported configuration format `{0}`. Use 'yaml', 'json' or 'toml'.")]
    UnsupportedFormat(String),
    #[error("invalid value for {key}: {message}")]
    InvalidValue { key: &'static str, message: String },
}

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => f.write_str("text"),
            Self::Json => f.write_str("json"),
        }
    }
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "text" | "pretty" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::InvalidValue {
                key: "log_format",
                message: format!("unknown log format `{other}`"),
            }),
        }
    }
}

/// Configuration for the Expensa clients.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the backend; API paths such as `api/expenses` are joined onto it.
    pub api_base_url: Url,

    /// Logging level used when `RUST_LOG` is not set.
    pub log_level: String,

    /// Logging output format.
    pub log_format: LogFormat,

    /// Where the terminal client persists its session. Defaults to the user config dir.
    pub session_path: Option<PathBuf>,

    /// Per-request timeout applied by native HTTP clients.
    pub request_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl ClientConfig {
    /// Generates a default configuration.
    ///
    /// # Panics
    /// Never in practice: the default base URL is a valid constant.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            api_base_url: Url::parse(DEFAULT_API_BASE_URL).expect("default API URL is valid"),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            log_format: LogFormat::Text,
            session_path: None,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }

    /// Loads the configuration from a file, environment variables, or defaults.
    ///
    /// Values read from the file win; environment variables only fill in
    /// settings that are still at their defaults.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, an environment
    /// override is malformed, or the resolved configuration fails validation.
    pub fn load_config(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match config_path {
            Some(path) => Self::from_file(path)?,
            None => Self::with_defaults(),
        };
        config.apply_env_overrides()?;
        config.api_base_url = parse_base_url(config.api_base_url.as_str())?;
        config.validate()?;
        Ok(config)
    }

    /// Parses a configuration file, choosing the format from its extension.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, has an unknown extension,
    /// or does not parse.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let parse_error = |message: String| ConfigError::Parse {
            path: path.to_path_buf(),
            message,
        };

        match extension.as_str() {
            "yaml" | "yml" => serde_yml::from_str(&content).map_err(|err| parse_error(err.to_string())),
            "json" => serde_json::from_str(&content).map_err(|err| parse_error(err.to_string())),
            "toml" => toml::from_str(&content).map_err(|err| parse_error(err.to_string())),
            other => Err(ConfigError::UnsupportedFormat(other.to_string())),
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        let defaults = Self::with_defaults();

        if self.api_base_url == defaults.api_base_url {
            if let Ok(value) = env::var("EXPENSA_API_URL") {
                self.api_base_url = parse_base_url(&value)?;
            }
        }
        if self.log_level == defaults.log_level {
            if let Ok(value) = env::var("EXPENSA_LOG_LEVEL") {
                self.log_level = value.trim().to_ascii_lowercase();
            }
        }
        if self.log_format == defaults.log_format {
            if let Ok(value) = env::var("EXPENSA_LOG_FORMAT") {
                self.log_format = value.parse()?;
            }
        }
        if self.session_path.is_none() {
            if let Ok(value) = env::var("EXPENSA_SESSION_PATH") {
                self.session_path = Some(PathBuf::from(value));
            }
        }
        if self.request_timeout_secs == defaults.request_timeout_secs {
            if let Ok(value) = env::var("EXPENSA_REQUEST_TIMEOUT_SECS") {
                self.request_timeout_secs =
                    value
                        .trim()
                        .parse()
                        .map_err(|_| ConfigError::InvalidValue {
                            key: "EXPENSA_REQUEST_TIMEOUT_SECS",
                            message: format!("`{value}` is not a number of seconds"),
                        })?;
            }
        }
        Ok(())
    }

    /// Validates the resolved configuration.
    ///
    /// # Errors
    /// Returns the first invalid setting found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !matches!(self.api_base_url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidValue {
                key: "api_base_url",
                message: format!("unsupported scheme `{}`", self.api_base_url.scheme()),
            });
        }
        if !LOG_LEVELS.contains(&self.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                key: "log_level",
                message: format!(
                    "`{}` is not one of {}",
                    self.log_level,
                    LOG_LEVELS.join(", ")
                ),
            });
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "request_timeout_secs",
                message: "must be greater than 0".to_string(),
            });
        }
        Ok(())
    }

    /// Resolved location of the persisted terminal session.
    #[cfg(not(target_arch = "wasm32"))]
    #[must_use]
    pub fn session_file(&self) -> PathBuf {
        self.session_path.clone().unwrap_or_else(default_session_path)
    }
}

/// Parses a backend base URL, normalizing it to end with `/` so relative API
/// paths join beneath it instead of replacing its last segment.
///
/// # Errors
/// Returns an error when the value is not an absolute URL.
pub fn parse_base_url(value: &str) -> Result<Url, ConfigError> {
    let trimmed = value.trim();
    let normalized = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    };
    Url::parse(&normalized).map_err(|err| ConfigError::InvalidValue {
        key: "api_base_url",
        message: err.to_string(),
    })
}

#[cfg(not(target_arch = "wasm32"))]
fn default_session_path() -> PathBuf {
    directories::BaseDirs::new()
        .map(|dirs| dirs.config_dir().join("expensa").join("session.json"))
        .unwrap_or_else(|| PathBuf::from("./session.json"))
}
