//! Server configuration
//!
//! | Variable | Default |
//! |----------|---------|
//! | `ENVIRONMENT` | `development` |
//! | `HTTP_PORT` | `8080` |
//! | `GATEWAY_URL` | unset → demo mode (built-in data) |
//! | `GATEWAY_KEY` | required with `GATEWAY_URL` outside development |
//! | `GATEWAY_TIMEOUT_MS` | `10000` |
//! | `JWT_SECRET` | required outside development |
//! | `JWT_EXPIRATION_MINUTES` | `1440` |
//! | `PUBLIC_BASE_URL` | `http://localhost:8080` |
//! | `MENU_SESSION_IDLE_SECS` | `3600` |
//! | `LOG_LEVEL` | `info` |
//! | `LOG_DIR` | unset → stdout only |

use std::time::Duration;

use shared::error::{AppError, ErrorCode};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be set in {environment} environment")]
    MissingSecret { name: String, environment: String },

    #[error("{name} must not be empty in {environment} environment")]
    EmptySecret { name: String, environment: String },

    #[error("{name} must be at least {min} characters")]
    SecretTooShort { name: String, min: usize },
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        AppError::with_message(ErrorCode::ConfigError, err.to_string())
    }
}

const MIN_JWT_SECRET_LEN: usize = 32;

#[derive(Debug, Clone)]
pub struct Config {
    /// development | staging | production
    pub environment: String,
    pub http_port: u16,
    /// Hosted store endpoint; `None` runs in demo mode
    pub gateway_url: Option<String>,
    pub gateway_key: String,
    pub gateway_timeout_ms: u64,
    pub jwt_secret: String,
    pub jwt_expiration_minutes: i64,
    /// Origin used when building QR menu links
    pub public_base_url: String,
    pub menu_session_idle_secs: u64,
    pub log_level: String,
    pub log_dir: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Development defaults, nothing read from the environment
    pub fn development() -> Self {
        // Every secret has a development fallback, so this cannot fail.
        Self::from_lookup(|_| None).unwrap_or_else(|_| unreachable!())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let environment = lookup("ENVIRONMENT").unwrap_or_else(|| "development".into());
        let gateway_url = lookup("GATEWAY_URL").filter(|s| !s.trim().is_empty());

        let gateway_key = if gateway_url.is_some() {
            require_secret(&lookup, "GATEWAY_KEY", &environment)?
        } else {
            lookup("GATEWAY_KEY").unwrap_or_default()
        };

        let jwt_secret = require_secret(&lookup, "JWT_SECRET", &environment)?;
        if environment != "development" && jwt_secret.len() < MIN_JWT_SECRET_LEN {
            return Err(ConfigError::SecretTooShort {
                name: "JWT_SECRET".into(),
                min: MIN_JWT_SECRET_LEN,
            });
        }

        let http_port = lookup("HTTP_PORT")
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);

        Ok(Self {
            environment: environment.clone(),
            http_port,
            gateway_url,
            gateway_key,
            gateway_timeout_ms: lookup("GATEWAY_TIMEOUT_MS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(10_000),
            jwt_secret,
            jwt_expiration_minutes: lookup("JWT_EXPIRATION_MINUTES")
                .and_then(|v| v.parse().ok())
                .unwrap_or(1440),
            public_base_url: lookup("PUBLIC_BASE_URL")
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or_else(|| format!("http://localhost:{http_port}")),
            menu_session_idle_secs: lookup("MENU_SESSION_IDLE_SECS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(3600),
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".into()),
            log_dir: lookup("LOG_DIR").filter(|s| !s.is_empty()),
        })
    }

    pub fn is_demo(&self) -> bool {
        self.gateway_url.is_none()
    }

    pub fn gateway_timeout(&self) -> Duration {
        Duration::from_millis(self.gateway_timeout_ms)
    }

    pub fn menu_session_idle(&self) -> Duration {
        Duration::from_secs(self.menu_session_idle_secs)
    }
}

/// Secret env var: must be set and non-empty outside development.
fn require_secret(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    environment: &str,
) -> Result<String, ConfigError> {
    let val = match lookup(name) {
        Some(v) => v,
        None => {
            if environment != "development" {
                return Err(ConfigError::MissingSecret {
                    name: name.into(),
                    environment: environment.into(),
                });
            }
            format!("dev-{name}-not-for-production")
        }
    };
    if val.is_empty() && environment != "development" {
        return Err(ConfigError::EmptySecret {
            name: name.into(),
            environment: environment.into(),
        });
    }
    Ok(val)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_development_defaults() {
        let config = Config::development();
        assert_eq!(config.environment, "development");
        assert_eq!(config.http_port, 8080);
        assert!(config.is_demo());
        assert_eq!(config.gateway_timeout_ms, 10_000);
        assert_eq!(config.jwt_expiration_minutes, 1440);
        assert_eq!(config.menu_session_idle_secs, 3600);
        assert_eq!(config.public_base_url, "http://localhost:8080");
        assert!(config.jwt_secret.starts_with("dev-"));
    }

    #[test]
    fn test_production_requires_secrets() {
        let err = Config::from_lookup(lookup(&[("ENVIRONMENT", "production")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::MissingSecret {
                name: "JWT_SECRET".into(),
                environment: "production".into()
            }
        );

        let err = Config::from_lookup(lookup(&[
            ("ENVIRONMENT", "production"),
            ("GATEWAY_URL", "https://store.example.com"),
            ("JWT_SECRET", "x".repeat(40).as_str()),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::MissingSecret { name, .. } if name == "GATEWAY_KEY"));

        let err = Config::from_lookup(lookup(&[
            ("ENVIRONMENT", "production"),
            ("JWT_SECRET", "short"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::SecretTooShort { .. }));
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("HTTP_PORT", "9000"),
            ("GATEWAY_URL", "https://store.example.com"),
            ("GATEWAY_KEY", "anon"),
            ("PUBLIC_BASE_URL", "https://menu.example.com/"),
            ("MENU_SESSION_IDLE_SECS", "60"),
            ("LOG_DIR", ""),
        ]))
        .unwrap();
        assert_eq!(config.http_port, 9000);
        assert!(!config.is_demo());
        assert_eq!(config.gateway_key, "anon");
        assert_eq!(config.public_base_url, "https://menu.example.com");
        assert_eq!(config.menu_session_idle(), Duration::from_secs(60));
        assert_eq!(config.log_dir, None);
    }
}
