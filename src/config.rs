use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DossierConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub retrieval: RetrievalConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    /// `"sqlite"` (production) or `"fake"` (in-memory, sample-seeded).
    pub backend: String,
    pub db_path: String,
    pub default_org: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RetrievalConfig {
    pub default_limit: usize,
    pub default_confidence: f64,
}

impl Default for DossierConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            storage: StorageConfig::default(),
            retrieval: RetrievalConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 7870,
            log_level: "info".into(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        let db_path = default_dossier_dir()
            .join("dossier.db")
            .to_string_lossy()
            .into_owned();
        Self {
            backend: "sqlite".into(),
            db_path,
            default_org: "default".into(),
        }
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            default_limit: 5,
            default_confidence: 0.9,
        }
    }
}

/// Returns `~/.dossier/`
pub fn default_dossier_dir() -> PathBuf {
    dirs::home_dir()
        .expect("home directory must exist")
        .join(".dossier")
}

/// Returns the default config file path: `~/.dossier/config.toml`
pub fn default_config_path() -> PathBuf {
    default_dossier_dir().join("config.toml")
}

impl DossierConfig {
    /// Load config from TOML file (if it exists) then apply env var overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path())
    }

    /// Load from a specific path, then apply env var overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents =
                std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str(&contents).context("failed to parse config TOML")?
        } else {
            info!("no config file at {}, using defaults", path.display());
            DossierConfig::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides (DOSSIER_DB, DOSSIER_BACKEND,
    /// DOSSIER_ORG, DOSSIER_LOG_LEVEL).
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("DOSSIER_DB") {
            self.storage.db_path = val;
        }
        if let Ok(val) = std::env::var("DOSSIER_BACKEND") {
            self.storage.backend = val;
        }
        if let Ok(val) = std::env::var("DOSSIER_ORG") {
            self.storage.default_org = val;
        }
        if let Ok(val) = std::env::var("DOSSIER_LOG_LEVEL") {
            self.server.log_level = val;
        }
    }

    /// Resolve the database path, expanding `~` if needed.
    pub fn resolved_db_path(&self) -> PathBuf {
        expand_tilde(&self.storage.db_path)
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        dirs::home_dir()
            .expect("home directory must exist")
            .join(rest)
    } else {
        PathBuf::from(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = DossierConfig::default();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.log_level, "info");
        assert_eq!(config.storage.backend, "sqlite");
        assert_eq!(config.storage.default_org, "default");
        assert_eq!(config.retrieval.default_limit, 5);
        assert!(config.storage.db_path.ends_with("dossier.db"));
    }

    #[test]
    fn parse_toml_config() {
        let toml_str = r#"
[server]
port = 9000
log_level = "debug"

[storage]
db_path = "/tmp/test.db"
default_org = "acme-realty"

[retrieval]
default_limit = 10
"#;
        let config: DossierConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.log_level, "debug");
        assert_eq!(config.storage.db_path, "/tmp/test.db");
        assert_eq!(config.storage.default_org, "acme-realty");
        assert_eq!(config.retrieval.default_limit, 10);
        // defaults still apply for unset fields
        assert_eq!(config.storage.backend, "sqlite");
        assert!((config.retrieval.default_confidence - 0.9).abs() < f64::EPSILON);
    }

    #[test]
    fn env_overrides_apply() {
        let mut config = DossierConfig::default();
        std::env::set_var("DOSSIER_DB", "/tmp/override.db");
        std::env::set_var("DOSSIER_BACKEND", "fake");
        std::env::set_var("DOSSIER_ORG", "env-org");
        std::env::set_var("DOSSIER_LOG_LEVEL", "trace");

        config.apply_env_overrides();

        assert_eq!(config.storage.db_path, "/tmp/override.db");
        assert_eq!(config.storage.backend, "fake");
        assert_eq!(config.storage.default_org, "env-org");
        assert_eq!(config.server.log_level, "trace");

        // Clean up
        std::env::remove_var("DOSSIER_DB");
        std::env::remove_var("DOSSIER_BACKEND");
        std::env::remove_var("DOSSIER_ORG");
        std::env::remove_var("DOSSIER_LOG_LEVEL");
    }
}
