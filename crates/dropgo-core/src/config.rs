//! Configuration module
//!
//! Process configuration is read from the environment (optionally seeded from a `.env`
//! file). Unparseable numeric values fall back to their defaults rather than aborting.

use std::env;
use std::path::PathBuf;

const DEFAULT_PORT: u16 = 1080;
const DEFAULT_UPLOAD_DIR: &str = "./uploads";
const HTTP_CONCURRENCY_LIMIT: usize = 10_000;
const CATALOG_CONCURRENCY: usize = 16;
const TRANSFER_CHUNK_SIZE: usize = 64 * 1024;

/// Server and storage settings
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub server_port: u16,
    pub upload_dir: PathBuf,
    pub cors_origins: Vec<String>,
    pub environment: String,
    pub http_concurrency_limit: usize,
    /// Number of sidecars read concurrently while building the catalog.
    pub catalog_concurrency: usize,
    /// Read buffer size used when streaming upload bytes.
    pub transfer_chunk_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            server_port: DEFAULT_PORT,
            upload_dir: PathBuf::from(DEFAULT_UPLOAD_DIR),
            cors_origins: vec!["*".to_string()],
            environment: "development".to_string(),
            http_concurrency_limit: HTTP_CONCURRENCY_LIMIT,
            catalog_concurrency: CATALOG_CONCURRENCY,
            transfer_chunk_size: TRANSFER_CHUNK_SIZE,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let upload_dir = env::var("UPLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_UPLOAD_DIR));

        let config = ServerConfig {
            server_port: parse_env("PORT", DEFAULT_PORT),
            upload_dir,
            cors_origins,
            environment,
            http_concurrency_limit: parse_env("HTTP_CONCURRENCY_LIMIT", HTTP_CONCURRENCY_LIMIT),
            catalog_concurrency: parse_env("CATALOG_CONCURRENCY", CATALOG_CONCURRENCY),
            transfer_chunk_size: parse_env("TRANSFER_CHUNK_SIZE", TRANSFER_CHUNK_SIZE),
        };

        Ok(config)
    }

    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.server_port == 0 {
            return Err(anyhow::anyhow!("PORT must be between 1 and 65535"));
        }

        if self.upload_dir.as_os_str().is_empty() {
            return Err(anyhow::anyhow!("UPLOAD_DIR must not be empty"));
        }

        if self.http_concurrency_limit == 0 {
            return Err(anyhow::anyhow!("HTTP_CONCURRENCY_LIMIT must be at least 1"));
        }

        if self.catalog_concurrency == 0 {
            return Err(anyhow::anyhow!("CATALOG_CONCURRENCY must be at least 1"));
        }

        if self.transfer_chunk_size == 0 {
            return Err(anyhow::anyhow!("TRANSFER_CHUNK_SIZE must be at least 1"));
        }

        if self.is_production() && self.cors_origins.iter().any(|o| o == "*") {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.trim().parse::<T>().ok())
        .unwrap_or(default)
}

/// Application configuration.
#[derive(Clone, Debug, Default)]
pub struct Config(pub ServerConfig);

impl Config {
    fn as_server(&self) -> &ServerConfig {
        &self.0
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        Ok(Config(ServerConfig::from_env()?))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.as_server().validate()
    }

    // Convenience getters for common fields
    pub fn server_port(&self) -> u16 {
        self.as_server().server_port
    }

    pub fn upload_dir(&self) -> &PathBuf {
        &self.as_server().upload_dir
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.as_server().cors_origins
    }

    pub fn environment(&self) -> &str {
        &self.as_server().environment
    }

    pub fn http_concurrency_limit(&self) -> usize {
        self.as_server().http_concurrency_limit
    }

    pub fn catalog_concurrency(&self) -> usize {
        self.as_server().catalog_concurrency
    }

    pub fn transfer_chunk_size(&self) -> usize {
        self.as_server().transfer_chunk_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.server_port(), 1080);
        assert_eq!(config.upload_dir(), &PathBuf::from("./uploads"));
        assert!(!config.0.is_production());
    }

    #[test]
    fn test_wildcard_cors_rejected_in_production() {
        let config = Config(ServerConfig {
            environment: "Production".to_string(),
            ..Default::default()
        });
        assert!(config.0.is_production());
        assert!(config.validate().is_err());

        let config = Config(ServerConfig {
            environment: "prod".to_string(),
            cors_origins: vec!["https://files.example.com".to_string()],
            ..Default::default()
        });
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_limits_rejected() {
        for config in [
            ServerConfig {
                catalog_concurrency: 0,
                ..Default::default()
            },
            ServerConfig {
                transfer_chunk_size: 0,
                ..Default::default()
            },
            ServerConfig {
                server_port: 0,
                ..Default::default()
            },
        ] {
            assert!(config.validate().is_err());
        }
    }
}
