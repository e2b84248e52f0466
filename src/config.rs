use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Signing secret shipped in the default config. `validate()` refuses to
/// serve with it unless `UNIMART_JWT_SECRET` overrides it.
pub const DEV_JWT_SECRET: &str = "unimart-dev-secret-change-in-production";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub server: ServerConfig,

    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub database_path: String,

    pub log_level: String,

    /// Number of tokio worker threads (0 = number of CPU cores)
    pub worker_threads: usize,

    pub max_db_connections: u32,

    pub min_db_connections: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            database_path: "sqlite:data/unimart.db".to_string(),
            log_level: "info".to_string(),
            worker_threads: 2,
            max_db_connections: 5,
            min_db_connections: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,

    pub cors_allowed_origins: Vec<String>,

    /// Request body ceiling. Listings may carry inline-encoded images, which
    /// pass through opaquely but must not be unbounded.
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 5000,
            cors_allowed_origins: vec!["*".to_string()],
            max_body_bytes: 10 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// HS256 signing secret. Overridden by the `UNIMART_JWT_SECRET` env var.
    pub jwt_secret: String,

    /// Token lifetime in days.
    pub token_ttl_days: i64,

    pub min_password_length: usize,

    /// Argon2 memory cost in KiB (default: 8192 = 8MB)
    pub argon2_memory_cost_kib: u32,

    /// Argon2 time cost (iterations) - higher = more CPU work
    pub argon2_time_cost: u32,

    pub argon2_parallelism: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: DEV_JWT_SECRET.to_string(),
            token_ttl_days: 7,
            min_password_length: 6,
            argon2_memory_cost_kib: 8192,
            argon2_time_cost: 3,
            argon2_parallelism: 1,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        // .env is optional; ignore a missing file.
        let _ = dotenvy::dotenv();

        let paths = Self::config_paths();

        let mut config = None;
        for path in &paths {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                config = Some(Self::load_from_path(path)?);
                break;
            }
        }

        let mut config = config.unwrap_or_else(|| {
            info!("No config file found, using defaults");
            Self::default()
        });

        if let Ok(secret) = std::env::var("UNIMART_JWT_SECRET")
            && !secret.is_empty()
        {
            config.auth.jwt_secret = secret;
        }

        Ok(config)
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    fn default_config_path() -> PathBuf {
        PathBuf::from("config.toml")
    }

    pub fn create_default_if_missing() -> Result<bool> {
        let path = Self::default_config_path();
        if path.exists() {
            Ok(false)
        } else {
            let config = Self::default();
            config.save_to_path(&path)?;
            info!("Created default config file: {}", path.display());
            Ok(true)
        }
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("config.toml")];

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("unimart").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".unimart").join("config.toml"));
        }

        paths
    }

    pub fn validate(&self) -> Result<()> {
        if self.auth.jwt_secret.is_empty() {
            anyhow::bail!("auth.jwt_secret cannot be empty");
        }

        if self.auth.token_ttl_days <= 0 {
            anyhow::bail!("auth.token_ttl_days must be > 0");
        }

        if self.auth.min_password_length == 0 {
            anyhow::bail!("auth.min_password_length must be > 0");
        }

        if self.general.max_db_connections == 0 {
            anyhow::bail!("general.max_db_connections must be > 0");
        }

        Ok(())
    }

    /// True when the process still runs on the baked-in development secret.
    #[must_use]
    pub fn using_dev_secret(&self) -> bool {
        self.auth.jwt_secret == DEV_JWT_SECRET
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert!(config.using_dev_secret());
        assert_eq!(config.auth.token_ttl_days, 7);
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let config: Config = toml::from_str(
            r#"
            [server]
            port = 8080
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.auth.min_password_length, 6);
    }

    #[test]
    fn empty_secret_fails_validation() {
        let mut config = Config::default();
        config.auth.jwt_secret = String::new();
        assert!(config.validate().is_err());
    }
}
