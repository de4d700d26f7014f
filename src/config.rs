use std::str::FromStr;

use crate::error::AppError;

/// Five years.
pub const MAX_SESSION_EXPIRY_HOURS: i64 = 5 * 365 * 24;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub database_url: String,
    pub session_expiry_hours: i64,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable lookup, falling back to defaults.
    pub fn from_vars<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let session_expiry_hours: i64 = parse_var(&lookup, "SESSION_EXPIRY_HOURS", 24)?;
        if !(1..=MAX_SESSION_EXPIRY_HOURS).contains(&session_expiry_hours) {
            return Err(AppError::Config(format!(
                "SESSION_EXPIRY_HOURS must be between 1 and {}",
                MAX_SESSION_EXPIRY_HOURS
            )));
        }

        let db_max_connections: u32 = parse_var(&lookup, "DB_MAX_CONNECTIONS", 20)?;
        let db_min_connections: u32 = parse_var(&lookup, "DB_MIN_CONNECTIONS", 5)?;
        if db_max_connections == 0 || db_min_connections > db_max_connections {
            return Err(AppError::Config(format!(
                "Invalid pool bounds: min {} max {}",
                db_min_connections, db_max_connections
            )));
        }

        Ok(Config {
            server_host: lookup("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            server_port: parse_var(&lookup, "PORT", 4000)?,
            database_url: lookup("DATABASE_URL")
                .unwrap_or_else(|| "sqlite://postboard.db".to_string()),
            session_expiry_hours,
            db_max_connections,
            db_min_connections,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T, AppError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| AppError::Config(format!("Invalid {}: {}", key, e))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, AppError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.server_port, 4000);
        assert_eq!(config.server_address(), "127.0.0.1:4000");
        assert_eq!(config.database_url, "sqlite://postboard.db");
        assert_eq!(config.session_expiry_hours, 24);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("SERVER_HOST", "0.0.0.0"),
            ("PORT", "8081"),
            ("DATABASE_URL", "sqlite::memory:"),
            ("SESSION_EXPIRY_HOURS", "2"),
        ])
        .unwrap();
        assert_eq!(config.server_address(), "0.0.0.0:8081");
        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.session_expiry_hours, 2);
    }

    #[test]
    fn test_invalid_port() {
        let err = config_from(&[("PORT", "not-a-port")]).unwrap_err();
        assert!(matches!(err, AppError::Config(msg) if msg.contains("PORT")));
    }

    #[test]
    fn test_pool_bounds() {
        assert!(config_from(&[("DB_MAX_CONNECTIONS", "0")]).is_err());
        assert!(config_from(&[("DB_MAX_CONNECTIONS", "2"), ("DB_MIN_CONNECTIONS", "3")]).is_err());
    }

    #[test]
    fn test_non_positive_expiry() {
        assert!(config_from(&[("SESSION_EXPIRY_HOURS", "0")]).is_err());
    }

    #[test]
    fn test_expiry_upper_bound() {
        let max = MAX_SESSION_EXPIRY_HOURS.to_string();
        let config = config_from(&[("SESSION_EXPIRY_HOURS", max.as_str())]).unwrap();
        assert_eq!(config.session_expiry_hours, MAX_SESSION_EXPIRY_HOURS);

        let too_long = (MAX_SESSION_EXPIRY_HOURS + 1).to_string();
        assert!(config_from(&[("SESSION_EXPIRY_HOURS", too_long.as_str())]).is_err());

        let huge = i64::MAX.to_string();
        let err = config_from(&[("SESSION_EXPIRY_HOURS", huge.as_str())]).unwrap_err();
        assert!(matches!(err, AppError::Config(msg) if msg.contains("SESSION_EXPIRY_HOURS")));
    }
}
