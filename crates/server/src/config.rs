use log::{debug, info};
use std::{env, fmt::Display, net::SocketAddr, str::FromStr};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Environment variable {0} is required")]
    Missing(&'static str),

    #[error("Invalid {key} value: {message}")]
    Invalid { key: &'static str, message: String },
}

/// Runtime settings read from the environment
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub oidc_issuer_url: String,
    pub bind_address: SocketAddr,
    /// Token subjects provisioned as admins on first sight
    pub admin_subjects: Vec<String>,
    pub run_migrations: bool,
}

impl Config {
    /// Loads `.env` when present, then reads the process environment
    pub fn load() -> Result<Self, ConfigError> {
        if let Err(e) = dotenvy::dotenv() {
            debug!("No .env file loaded: {e}");
        }

        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            database_url: required(&lookup, "DATABASE_URL")?,
            oidc_issuer_url: required(&lookup, "OIDC_ISSUER_URL")?,
            bind_address: try_load(&lookup, "BIND_ADDRESS", "0.0.0.0:3000")?,
            admin_subjects: lookup("ADMIN_SUBJECTS")
                .map(|subjects| {
                    subjects
                        .split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(String::from)
                        .collect()
                })
                .unwrap_or_default(),
            run_migrations: try_load(&lookup, "RUN_MIGRATIONS", "true")?,
        })
    }
}

fn required(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<String, ConfigError> {
    lookup(key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or(ConfigError::Missing(key))
}

fn try_load<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: &str,
) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    lookup(key)
        .unwrap_or_else(|| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .trim()
        .parse()
        .map_err(|e: T::Err| ConfigError::Invalid {
            key,
            message: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    const REQUIRED: [(&str, &str); 2] = [
        ("DATABASE_URL", "postgres://localhost/learning"),
        ("OIDC_ISSUER_URL", "https://idp.example.com"),
    ];

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&REQUIRED)).unwrap();

        assert_eq!(config.bind_address, "0.0.0.0:3000".parse().unwrap());
        assert!(config.admin_subjects.is_empty());
        assert!(config.run_migrations);
    }

    #[test]
    fn test_missing_required() {
        let result = Config::from_lookup(lookup(&REQUIRED[1..]));
        assert_eq!(result.unwrap_err(), ConfigError::Missing("DATABASE_URL"));

        let result = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/learning"),
            ("OIDC_ISSUER_URL", "  "),
        ]));
        assert_eq!(result.unwrap_err(), ConfigError::Missing("OIDC_ISSUER_URL"));
    }

    #[test]
    fn test_overrides() {
        let mut vars = REQUIRED.to_vec();
        vars.extend([
            ("BIND_ADDRESS", "127.0.0.1:8080"),
            ("ADMIN_SUBJECTS", " alice, ,bob "),
            ("RUN_MIGRATIONS", "false"),
        ]);
        let config = Config::from_lookup(lookup(&vars)).unwrap();

        assert_eq!(config.bind_address.port(), 8080);
        assert_eq!(config.admin_subjects, vec!["alice", "bob"]);
        assert!(!config.run_migrations);
    }

    #[test]
    fn test_invalid_value() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("BIND_ADDRESS", "not an address"));

        assert!(matches!(
            Config::from_lookup(lookup(&vars)),
            Err(ConfigError::Invalid {
                key: "BIND_ADDRESS",
                ..
            })
        ));
    }
}
