use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;
use url::Url;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub api: ApiConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub default_filter: String,
    pub log_requests: bool,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid API base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

pub const DEFAULT_API_URL: &str = "http://localhost:8080";

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = env::var("CONSULT_ADMIN_API_URL") {
            self.api.base_url = v;
        }
        if let Ok(v) = env::var("CONSULT_ADMIN_TIMEOUT_SECS") {
            self.api.timeout_secs = v.parse().unwrap_or(self.api.timeout_secs);
        }
        if let Ok(v) = env::var("CONSULT_ADMIN_USER_AGENT") {
            self.api.user_agent = v;
        }
        if let Ok(v) = env::var("CONSULT_ADMIN_LOG_REQUESTS") {
            self.logging.log_requests = v.parse().unwrap_or(self.logging.log_requests);
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            api: ApiConfig {
                base_url: DEFAULT_API_URL.to_string(),
                timeout_secs: 30,
                user_agent: default_user_agent(),
            },
            logging: LoggingConfig {
                default_filter: "consult_admin=debug,warn".to_string(),
                log_requests: true,
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            api: ApiConfig {
                base_url: DEFAULT_API_URL.to_string(),
                timeout_secs: 15,
                user_agent: default_user_agent(),
            },
            logging: LoggingConfig {
                default_filter: "consult_admin=info,warn".to_string(),
                log_requests: true,
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            api: ApiConfig {
                base_url: DEFAULT_API_URL.to_string(),
                timeout_secs: 10,
                user_agent: default_user_agent(),
            },
            logging: LoggingConfig {
                default_filter: "warn".to_string(),
                log_requests: false,
            },
        }
    }
}

impl ApiConfig {
    /// Config pointing at an explicit origin, with development defaults otherwise
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..AppConfig::development().api
        }
    }

    /// Parse the configured origin. A missing scheme defaults to http and a trailing
    /// slash is dropped so paths can be appended verbatim.
    pub fn parsed_base_url(&self) -> Result<Url, ConfigError> {
        let raw = self.base_url.trim();
        let (scheme, rest) = match raw.split_once("://") {
            Some((scheme, rest)) if scheme == "http" || scheme == "https" => (scheme, rest),
            _ => ("http", raw),
        };

        // Trailing slashes only come off after the scheme separator
        let rest = rest.trim_end_matches('/');
        if rest.is_empty() {
            return Err(ConfigError::InvalidBaseUrl {
                url: self.base_url.clone(),
                reason: "missing host".to_string(),
            });
        }
        let with_scheme = format!("{}://{}", scheme, rest);

        if with_scheme != self.base_url {
            tracing::debug!("Normalized API base URL from '{}' to '{}'", self.base_url, with_scheme);
        }

        let url = Url::parse(&with_scheme).map_err(|e| ConfigError::InvalidBaseUrl {
            url: self.base_url.clone(),
            reason: e.to_string(),
        })?;

        if url.host_str().is_none() {
            return Err(ConfigError::InvalidBaseUrl {
                url: self.base_url.clone(),
                reason: "missing host".to_string(),
            });
        }

        Ok(url)
    }
}

fn default_user_agent() -> String {
    format!("consult-admin/{}", env!("CARGO_PKG_VERSION"))
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

pub fn config() -> &'static AppConfig {
    &CONFIG
}
