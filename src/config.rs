use std::net::SocketAddr;

use anyhow::Context;

use crate::auth::DEFAULT_IDENTITY_URL;

pub const DEFAULT_DATABASE_URL: &str = "sqlite:skillswap.db?mode=rwc";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_CORS_ORIGINS: &str = "http://localhost:3000,http://127.0.0.1:3000";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub max_connections: u32,
    pub bind_addr: SocketAddr,
    pub identity_url: String,
    pub firebase_api_key: String,
    pub cors_origins: Vec<String>,
}

impl Config {
    /// Read the process environment, after loading `.env` if there is one.
    pub fn from_env() -> anyhow::Result<Config> {
        Config::from_vars(|key| dotenv::var(key).ok())
    }

    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Config> {
        let var_or = |key: &str, default: &str| var(key).unwrap_or_else(|| default.to_owned());

        Ok(Config {
            database_url: var_or("DATABASE_URL", DEFAULT_DATABASE_URL),
            max_connections: var_or("DATABASE_MAX_CONNECTIONS", "16")
                .parse()
                .context("DATABASE_MAX_CONNECTIONS must be a positive integer")?,
            bind_addr: var_or("BIND_ADDR", DEFAULT_BIND_ADDR)
                .parse()
                .context("BIND_ADDR must look like 0.0.0.0:8080")?,
            identity_url: var_or("IDENTITY_URL", DEFAULT_IDENTITY_URL),
            firebase_api_key: var("FIREBASE_API_KEY").context("FIREBASE_API_KEY is not set")?,
            cors_origins: var_or("CORS_ORIGINS", DEFAULT_CORS_ORIGINS)
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(str::to_owned)
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply() {
        let config = load(&[("FIREBASE_API_KEY", "k")]).unwrap();

        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.max_connections, 16);
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.identity_url, DEFAULT_IDENTITY_URL);
        assert_eq!(config.cors_origins, ["http://localhost:3000", "http://127.0.0.1:3000"]);
    }

    #[test]
    fn overrides_and_failures() {
        let config = load(&[
            ("FIREBASE_API_KEY", "k"),
            ("BIND_ADDR", "127.0.0.1:9000"),
            ("CORS_ORIGINS", " https://swap.example , "),
        ])
        .unwrap();
        assert_eq!(config.bind_addr.port(), 9000);
        assert_eq!(config.cors_origins, ["https://swap.example"]);

        assert!(Config::from_vars(|_| None).is_err());
        assert!(load(&[("FIREBASE_API_KEY", "k"), ("BIND_ADDR", "nope")]).is_err());
    }
}
