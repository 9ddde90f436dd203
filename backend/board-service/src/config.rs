/// Configuration management for Board Service
///
/// All settings come from environment variables (optionally seeded from a
/// `.env` file by `main`).
use rand::RngCore;
use std::fmt;

/// Minimum tracking secret length accepted in production
pub const MIN_PRODUCTION_SECRET_LEN: usize = 32;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Application settings
    pub app: AppConfig,
    /// Tracking token settings
    pub tracking: TrackingConfig,
    /// Post store selection
    pub store: StoreConfig,
    /// Basic-auth gate settings
    pub auth: AuthConfig,
    /// Log output settings
    pub logging: LoggingConfig,
}

/// Application settings
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Application environment (development, staging, production)
    pub env: String,
    /// Server host to bind to
    pub host: String,
    /// Server port to bind to
    pub port: u16,
    /// Number of HTTP workers
    pub workers: usize,
}

impl AppConfig {
    pub fn is_production(&self) -> bool {
        self.env.eq_ignore_ascii_case("production")
    }
}

#[derive(Debug, Clone)]
pub struct TrackingConfig {
    pub secret: TrackingSecret,
    /// True when no secret was configured and one was generated for this process
    pub generated: bool,
}

/// Digest key for tracking tokens. Never printed.
#[derive(Clone)]
pub struct TrackingSecret(Vec<u8>);

impl TrackingSecret {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn generate() -> Self {
        let mut bytes = vec![0u8; MIN_PRODUCTION_SECRET_LEN];
        rand::rngs::OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    pub fn expose(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for TrackingSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TrackingSecret(<{} bytes>)", self.0.len())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Memory,
    Postgres,
}

impl std::str::FromStr for StoreKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(StoreKind::Memory),
            "postgres" | "postgresql" => Ok(StoreKind::Postgres),
            other => Err(format!("unknown POST_STORE '{}'", other)),
        }
    }
}

/// Post store configuration
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub kind: StoreKind,
    /// Database URL, required for the postgres store
    pub database_url: Option<String>,
    /// Max connections in pool
    pub max_connections: u32,
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Path of the `user:argon2-hash` credentials file
    pub credentials_file: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub format: LogFormat,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        let app = AppConfig {
            env: std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
            host: std::env::var("BOARD_SERVICE_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parse_env_or_default("BOARD_SERVICE_PORT", 8000)?,
            workers: parse_env_or_default("BOARD_SERVICE_WORKERS", 2)?,
        };

        let tracking = match std::env::var("TRACKING_SECRET") {
            Ok(value) if !value.is_empty() => {
                if app.is_production() && value.len() < MIN_PRODUCTION_SECRET_LEN {
                    return Err(format!(
                        "TRACKING_SECRET must be at least {} bytes in production",
                        MIN_PRODUCTION_SECRET_LEN
                    ));
                }
                TrackingConfig {
                    secret: TrackingSecret::new(value.into_bytes()),
                    generated: false,
                }
            }
            _ if app.is_production() => {
                return Err("TRACKING_SECRET must be set in production".to_string())
            }
            _ => TrackingConfig {
                secret: TrackingSecret::generate(),
                generated: true,
            },
        };

        let kind: StoreKind = std::env::var("POST_STORE")
            .unwrap_or_else(|_| "memory".to_string())
            .parse()?;
        let database_url = std::env::var("DATABASE_URL").ok();
        if kind == StoreKind::Postgres && database_url.is_none() {
            return Err("DATABASE_URL must be set when POST_STORE=postgres".to_string());
        }

        let store = StoreConfig {
            kind,
            database_url,
            max_connections: parse_env_or_default("DATABASE_MAX_CONNECTIONS", 10)?,
        };

        let auth = AuthConfig {
            credentials_file: std::env::var("CREDENTIALS_FILE")
                .unwrap_or_else(|_| "./users.passwd".to_string()),
        };

        let format = match std::env::var("LOG_FORMAT") {
            Ok(value) if value.eq_ignore_ascii_case("json") => LogFormat::Json,
            Ok(value) if value.eq_ignore_ascii_case("text") => LogFormat::Text,
            Ok(value) => return Err(format!("unknown LOG_FORMAT '{}'", value)),
            Err(_) => LogFormat::Text,
        };

        Ok(Config {
            app,
            tracking,
            store,
            auth,
            logging: LoggingConfig { format },
        })
    }
}

fn parse_env_or_default<T>(key: &str, default: T) -> Result<T, String>
where
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    match std::env::var(key) {
        Ok(val) => val
            .parse()
            .map_err(|e| format!("Failed to parse {}='{}': {}", key, val, e)),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: &[&str] = &[
        "APP_ENV",
        "BOARD_SERVICE_HOST",
        "BOARD_SERVICE_PORT",
        "BOARD_SERVICE_WORKERS",
        "TRACKING_SECRET",
        "POST_STORE",
        "DATABASE_URL",
        "DATABASE_MAX_CONNECTIONS",
        "CREDENTIALS_FILE",
        "LOG_FORMAT",
    ];

    fn clear_env() {
        for var in VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear_env();
        let config = Config::from_env().unwrap();

        assert_eq!(config.app.env, "development");
        assert_eq!(config.app.port, 8000);
        assert_eq!(config.store.kind, StoreKind::Memory);
        assert_eq!(config.auth.credentials_file, "./users.passwd");
        assert_eq!(config.logging.format, LogFormat::Text);
        assert!(config.tracking.generated);
        assert_eq!(config.tracking.secret.expose().len(), MIN_PRODUCTION_SECRET_LEN);
    }

    #[test]
    #[serial]
    fn test_explicit_secret_is_used() {
        clear_env();
        std::env::set_var("TRACKING_SECRET", "dev-secret");
        let config = Config::from_env().unwrap();

        assert!(!config.tracking.generated);
        assert_eq!(config.tracking.secret.expose(), b"dev-secret");
        assert!(!format!("{:?}", config).contains("dev-secret"));
        clear_env();
    }

    #[test]
    #[serial]
    fn test_production_requires_strong_secret() {
        clear_env();
        std::env::set_var("APP_ENV", "production");
        assert!(Config::from_env().is_err());

        std::env::set_var("TRACKING_SECRET", "short");
        assert!(Config::from_env().is_err());

        std::env::set_var("TRACKING_SECRET", "x".repeat(MIN_PRODUCTION_SECRET_LEN));
        assert!(Config::from_env().is_ok());
        clear_env();
    }

    #[test]
    #[serial]
    fn test_postgres_store_requires_database_url() {
        clear_env();
        std::env::set_var("POST_STORE", "postgres");
        assert!(Config::from_env().is_err());

        std::env::set_var("DATABASE_URL", "postgres://localhost/board");
        let config = Config::from_env().unwrap();
        assert_eq!(config.store.kind, StoreKind::Postgres);
        clear_env();
    }

    #[test]
    #[serial]
    fn test_invalid_values_are_rejected() {
        clear_env();
        std::env::set_var("BOARD_SERVICE_PORT", "not-a-port");
        assert!(Config::from_env().is_err());
        clear_env();

        std::env::set_var("POST_STORE", "sqlite");
        assert!(Config::from_env().is_err());
        clear_env();

        std::env::set_var("LOG_FORMAT", "xml");
        assert!(Config::from_env().is_err());
        clear_env();
    }
}
