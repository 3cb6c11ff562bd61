/// Configuration management for Blog Service
///
/// All settings come from environment variables (a `.env` file is loaded by
/// `main` before this runs). Database settings are read separately by
/// `db_pool::DbConfig`.
use crypto_core::jwt::{is_secret_strong, JwtService, MIN_SECRET_LENGTH};
use db_pool::env_utils::{parse_env_flag, parse_env_list, parse_env_optional, parse_env_with_default};
use db_pool::DbConfig;
use std::fmt;
use thiserror::Error;

pub const SERVICE_NAME: &str = "blog-service";

/// Origin allowed when `CORS_ALLOWED_ORIGINS` is unset outside production
pub const DEV_ALLOWED_ORIGIN: &str = "http://localhost:5173";

/// Longest accepted token lifetime (ten years)
pub const MAX_TOKEN_TTL_HOURS: i64 = 24 * 365 * 10;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} is invalid: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub cors: CorsConfig,
    pub auth: AuthConfig,
    pub database: DbConfig,
}

/// Application settings
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Application environment (development, staging, production)
    pub env: String,
    pub host: String,
    pub port: u16,
    /// Actix worker count; actix picks one per core when unset
    pub workers: Option<usize>,
    pub run_migrations: bool,
}

/// CORS configuration
#[derive(Debug, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

/// Token settings
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    /// Token lifetime; tokens never expire when unset
    pub token_ttl_hours: Option<i64>,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"[REDACTED]")
            .field("token_ttl_hours", &self.token_ttl_hours)
            .finish()
    }
}

impl AuthConfig {
    /// Build the token service these settings describe
    pub fn jwt_service(&self) -> Result<JwtService, ConfigError> {
        let service = JwtService::new(&self.jwt_secret).map_err(|e| ConfigError::Invalid {
            key: "JWT_SECRET",
            reason: e.to_string(),
        })?;

        Ok(match self.token_ttl_hours {
            Some(hours) => {
                let ttl = chrono::Duration::try_hours(hours).ok_or(ConfigError::Invalid {
                    key: "JWT_TOKEN_TTL_HOURS",
                    reason: "out of range".to_string(),
                })?;
                service.with_ttl(ttl)
            }
            None => service,
        })
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());
        let production = env.eq_ignore_ascii_case("production");

        let app = AppConfig {
            env,
            host: std::env::var("BLOG_SERVICE_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parse_env_with_default("BLOG_SERVICE_PORT", 8080),
            workers: parse_env_optional::<usize>("HTTP_WORKERS").filter(|w| *w > 0),
            run_migrations: parse_env_flag("RUN_MIGRATIONS", true),
        };

        let cors = {
            let mut allowed_origins = parse_env_list("CORS_ALLOWED_ORIGINS");
            if allowed_origins.is_empty() {
                if production {
                    return Err(ConfigError::Missing("CORS_ALLOWED_ORIGINS"));
                }
                allowed_origins.push(DEV_ALLOWED_ORIGIN.to_string());
            }

            if production && allowed_origins.iter().any(|o| o == "*") {
                return Err(ConfigError::Invalid {
                    key: "CORS_ALLOWED_ORIGINS",
                    reason: "'*' is not allowed in production".to_string(),
                });
            }

            CorsConfig { allowed_origins }
        };

        let auth = {
            let jwt_secret = std::env::var("JWT_SECRET")
                .ok()
                .filter(|s| !s.is_empty())
                .ok_or(ConfigError::Missing("JWT_SECRET"))?;

            if !is_secret_strong(&jwt_secret) {
                if production {
                    return Err(ConfigError::Invalid {
                        key: "JWT_SECRET",
                        reason: format!("must be at least {} bytes", MIN_SECRET_LENGTH),
                    });
                }
                tracing::warn!(
                    min_length = MIN_SECRET_LENGTH,
                    "JWT_SECRET is shorter than recommended"
                );
            }

            let token_ttl_hours = match parse_env_optional::<i64>("JWT_TOKEN_TTL_HOURS") {
                Some(hours) if hours <= 0 || hours > MAX_TOKEN_TTL_HOURS => {
                    return Err(ConfigError::Invalid {
                        key: "JWT_TOKEN_TTL_HOURS",
                        reason: format!("must be between 1 and {} hours", MAX_TOKEN_TTL_HOURS),
                    })
                }
                other => other,
            };

            AuthConfig {
                jwt_secret,
                token_ttl_hours,
            }
        };

        let database = DbConfig::from_env(SERVICE_NAME).map_err(|reason| ConfigError::Invalid {
            key: "DATABASE_URL",
            reason,
        })?;

        Ok(Config {
            app,
            cors,
            auth,
            database,
        })
    }

    pub fn is_production(&self) -> bool {
        self.app.env.eq_ignore_ascii_case("production")
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.app.host, self.app.port)
    }
}
