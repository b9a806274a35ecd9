use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite connection string, e.g. `sqlite://holocron.db?mode=rwc`
    #[serde(default = "default_database_url")]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
        }
    }
}

fn default_database_url() -> String {
    "sqlite://holocron.db?mode=rwc".to_string()
}

fn default_max_connections() -> u32 {
    5
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// HMAC secret used to sign access tokens. Left empty, a random secret is
    /// generated at startup.
    #[serde(default)]
    pub jwt_secret: String,
    /// Access token lifetime in minutes (default: 15)
    #[serde(default = "default_token_ttl_minutes")]
    pub token_ttl_minutes: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            token_ttl_minutes: default_token_ttl_minutes(),
        }
    }
}

fn generate_jwt_secret() -> String {
    let bytes: [u8; 32] = rand::random();
    hex::encode(bytes)
}

fn default_token_ttl_minutes() -> i64 {
    15
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Values taken from the command line or environment, applied on top of the
/// configuration file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub database_url: Option<String>,
    pub port: Option<u16>,
    pub jwt_secret: Option<String>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            info!("Loading configuration from {}", path.display());
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            Self::from_toml(&content)
        } else {
            info!("No config file found, using defaults");
            Ok(Config::default())
        }
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(content).with_context(|| "Failed to parse configuration file")?;
        config.validate()?;
        Ok(config)
    }

    pub fn apply(mut self, overrides: Overrides) -> Result<Self> {
        if let Some(url) = overrides.database_url {
            self.database.url = url;
        }
        if let Some(port) = overrides.port {
            self.server.port = port;
        }
        if let Some(secret) = overrides.jwt_secret {
            self.auth.jwt_secret = secret;
        }
        if self.auth.jwt_secret.is_empty() {
            // Tokens signed with this secret do not survive a restart
            warn!("No auth.jwt_secret configured; using a random secret for this process");
            self.auth.jwt_secret = generate_jwt_secret();
        }
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<()> {
        if !self.database.url.starts_with("sqlite:") {
            bail!(
                "Unsupported database URL '{}': only sqlite: URLs are supported",
                self.database.url
            );
        }
        if self.database.max_connections == 0 {
            bail!("database.max_connections must be at least 1");
        }
        if self.auth.token_ttl_minutes <= 0 {
            bail!("auth.token_ttl_minutes must be positive");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.database.url, "sqlite://holocron.db?mode=rwc");
        assert_eq!(config.auth.token_ttl_minutes, 15);
        assert!(config.auth.jwt_secret.is_empty());
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml(
            r#"
            [server]
            port = 8080

            [auth]
            jwt_secret = "s3cret"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.auth.jwt_secret, "s3cret");
        assert_eq!(config.database.max_connections, 5);
    }

    #[test]
    fn test_overrides_win() {
        let config = Config::default()
            .apply(Overrides {
                database_url: Some("sqlite::memory:".to_string()),
                port: Some(9000),
                jwt_secret: Some("from-env".to_string()),
            })
            .unwrap();

        assert_eq!(config.database.url, "sqlite::memory:");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.auth.jwt_secret, "from-env");
    }

    #[test]
    fn test_missing_secret_is_generated() {
        let config = Config::default().apply(Overrides::default()).unwrap();
        assert_eq!(config.auth.jwt_secret.len(), 64);

        let other = Config::default().apply(Overrides::default()).unwrap();
        assert_ne!(config.auth.jwt_secret, other.auth.jwt_secret);
    }

    #[test]
    fn test_rejects_non_sqlite_url() {
        let result = Config::default().apply(Overrides {
            database_url: Some("postgres://localhost/catalog".to_string()),
            ..Default::default()
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_non_positive_ttl() {
        let result = Config::from_toml(
            r#"
            [auth]
            token_ttl_minutes = 0
            "#,
        );
        assert!(result.is_err());
    }
}
