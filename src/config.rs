//! Application configuration read from the environment.
//!
//! Every value has a development default so the site boots with no `.env`
//! at all; production only insists on a real `JWT_SECRET`.

use std::path::PathBuf;

/// Placeholder secret used when `JWT_SECRET` is unset.
pub const DEFAULT_JWT_SECRET: &str = "default-jwt-secret-change-in-production";

/// Default admin login used by the in-memory backend.
pub const DEFAULT_ADMIN_EMAIL: &str = "admin@akacorptech.com";
const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub admin_email: String,
    pub admin_name: String,
    /// Either a bcrypt hash (`ADMIN_HASH_PASSWORD`) or a plain password
    /// (`ADMIN_PASSWORD`) that gets hashed when the account is seeded.
    pub admin_password: AdminPassword,
    pub storage_dir: PathBuf,
    pub public_base_url: String,
    /// Login attempts allowed per client IP inside `login_window_secs`.
    pub login_max_attempts: usize,
    pub login_window_secs: i64,
}

#[derive(Debug, Clone)]
pub enum AdminPassword {
    Hashed(String),
    Plain(String),
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

impl AppConfig {
    pub fn from_env() -> Self {
        let admin_password = if let Ok(hash) = std::env::var("ADMIN_HASH_PASSWORD") {
            AdminPassword::Hashed(hash)
        } else {
            AdminPassword::Plain(env_or("ADMIN_PASSWORD", DEFAULT_ADMIN_PASSWORD))
        };

        let port = env_parse("PORT", 3001u16);
        let host = env_or("HOST", "127.0.0.1");

        Self {
            environment: env_or("ENVIRONMENT", "development"),
            public_base_url: std::env::var("PUBLIC_BASE_URL")
                .unwrap_or_else(|_| format!("http://{}:{}", host, port)),
            host,
            port,
            jwt_secret: env_or("JWT_SECRET", DEFAULT_JWT_SECRET),
            admin_email: env_or("ADMIN_EMAIL", DEFAULT_ADMIN_EMAIL).to_lowercase(),
            admin_name: env_or("ADMIN_NAME", "Site Admin"),
            admin_password,
            storage_dir: PathBuf::from(env_or("STORAGE_DIR", "uploads")),
            login_max_attempts: env_parse("LOGIN_MAX_ATTEMPTS", 5usize),
            login_window_secs: env_parse("LOGIN_WINDOW_SECS", 60i64),
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Refuse to start a production server with the placeholder secret.
    pub fn validate(&self) -> Result<(), String> {
        if self.is_production()
            && (self.jwt_secret.is_empty() || self.jwt_secret == DEFAULT_JWT_SECRET)
        {
            return Err(
                "JWT_SECRET must be set to a secure, unique value in production".to_string(),
            );
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for AppConfig {
    /// Development configuration independent of the process environment.
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            host: "127.0.0.1".to_string(),
            port: 3001,
            jwt_secret: DEFAULT_JWT_SECRET.to_string(),
            admin_email: DEFAULT_ADMIN_EMAIL.to_string(),
            admin_name: "Site Admin".to_string(),
            admin_password: AdminPassword::Plain(DEFAULT_ADMIN_PASSWORD.to_string()),
            storage_dir: PathBuf::from("uploads"),
            public_base_url: "http://127.0.0.1:3001".to_string(),
            login_max_attempts: 5,
            login_window_secs: 60,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid_outside_production() {
        let config = AppConfig::default();
        assert!(!config.is_production());
        assert!(config.validate().is_ok());
        assert_eq!(config.bind_addr(), "127.0.0.1:3001");
    }

    #[test]
    fn test_production_rejects_default_secret() {
        let config = AppConfig {
            environment: "production".to_string(),
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());

        let config = AppConfig {
            environment: "production".to_string(),
            jwt_secret: "a-real-secret".to_string(),
            ..AppConfig::default()
        };
        assert!(config.validate().is_ok());
    }
}
