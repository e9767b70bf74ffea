use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::eligibility::domain::SchemeId;
use crate::eligibility::fairness::DEFAULT_WARN_MULTIPLIER;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub stores: StoreConfig,
    pub fairness: FairnessConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let model_dir = env::var("SCHEME_MODEL_DIR").unwrap_or_else(|_| "models".to_string());
        let metadata_dir =
            env::var("SCHEME_METADATA_DIR").unwrap_or_else(|_| "metadata".to_string());

        let warn_multiplier = match env::var("FAIRNESS_WARN_MULTIPLIER") {
            Ok(raw) => raw
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite() && *value >= 1.0)
                .ok_or(ConfigError::InvalidWarnMultiplier { value: raw })?,
            Err(_) => DEFAULT_WARN_MULTIPLIER,
        };

        let reference_scheme = match env::var("FAIRNESS_REFERENCE_SCHEME") {
            Ok(raw) => SchemeId::parse(&raw).ok_or(ConfigError::UnknownScheme { value: raw })?,
            Err(_) => SchemeId::PmKisan,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            stores: StoreConfig {
                model_dir: PathBuf::from(model_dir),
                metadata_dir: PathBuf::from(metadata_dir),
            },
            fairness: FairnessConfig {
                warn_multiplier,
                reference_scheme,
            },
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Filesystem roots for trained model artifacts and per-scheme metadata.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub model_dir: PathBuf,
    pub metadata_dir: PathBuf,
}

/// Batch-level fairness audit settings for the unified orchestrator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FairnessConfig {
    /// Gaps up to `allowed_diff * warn_multiplier` classify as WARN rather than FAIL.
    pub warn_multiplier: f64,
    /// Scheme whose metadata supplies the allowed gap and the batch disclaimer.
    pub reference_scheme: SchemeId,
}

impl Default for FairnessConfig {
    fn default() -> Self {
        Self {
            warn_multiplier: DEFAULT_WARN_MULTIPLIER,
            reference_scheme: SchemeId::PmKisan,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidWarnMultiplier { value: String },
    UnknownScheme { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidWarnMultiplier { value } => write!(
                f,
                "FAIRNESS_WARN_MULTIPLIER must be a finite number >= 1.0 (found '{value}')"
            ),
            ConfigError::UnknownScheme { value } => {
                write!(f, "FAIRNESS_REFERENCE_SCHEME '{value}' is not a known scheme")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidWarnMultiplier { .. }
            | ConfigError::UnknownScheme { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for key in [
            "APP_ENV",
            "APP_HOST",
            "APP_PORT",
            "APP_LOG_LEVEL",
            "SCHEME_MODEL_DIR",
            "SCHEME_METADATA_DIR",
            "FAIRNESS_WARN_MULTIPLIER",
            "FAIRNESS_REFERENCE_SCHEME",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.stores.model_dir, PathBuf::from("models"));
        assert_eq!(config.stores.metadata_dir, PathBuf::from("metadata"));
        assert_eq!(config.fairness, FairnessConfig::default());
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
        reset_env();
    }

    #[test]
    fn fairness_overrides_are_parsed() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("FAIRNESS_WARN_MULTIPLIER", "2.0");
        env::set_var("FAIRNESS_REFERENCE_SCHEME", "nsp");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.fairness.warn_multiplier, 2.0);
        assert_eq!(config.fairness.reference_scheme, SchemeId::Nsp);
        reset_env();
    }

    #[test]
    fn rejects_warn_multiplier_below_one() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("FAIRNESS_WARN_MULTIPLIER", "0.5");
        match AppConfig::load() {
            Err(ConfigError::InvalidWarnMultiplier { value }) => assert_eq!(value, "0.5"),
            other => panic!("expected invalid multiplier, got {other:?}"),
        }
        reset_env();
    }

    #[test]
    fn rejects_unknown_reference_scheme() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("FAIRNESS_REFERENCE_SCHEME", "mgnrega");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::UnknownScheme { .. })
        ));
        reset_env();
    }
}
