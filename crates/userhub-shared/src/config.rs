//! Configuration management
//!
//! Sources are layered, later ones winning: built-in defaults,
//! `config/default.toml`, `config/{APP_ENV}.toml`, `USERHUB__*` environment
//! variables, and finally the flat `DATABASE_URL` / `RECOVER_DB` variables
//! that deployment manifests already set.
//!
//! `database.url` is a sqlx SQLite URL: `sqlite://relative.db` or
//! `sqlite:///absolute/path.db`. The SQLAlchemy spellings `sqlite:///./x.db`
//! and `sqlite:////abs/x.db` are rewritten to those forms; a bare
//! `sqlite:///x.db` keeps its sqlx meaning (absolute).

use std::path::PathBuf;
use std::time::Duration;

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;

use crate::constants::{
    DEFAULT_DATABASE_URL, DEFAULT_REPLICATION_BINARY, DEFAULT_REPLICATION_CONFIG,
    DEFAULT_SHUTDOWN_TIMEOUT_SECS,
};
use crate::error::AppError;
use crate::utils::parse_flag;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub app: AppSettings,
    pub database: DatabaseSettings,
    pub replication: ReplicationSettings,
    pub log: LogSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppSettings {
    pub env: String,
    pub host: String,
    pub port: u16,
    pub name: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseSettings {
    pub url: String,
    /// Explicit store file; derived from `url` when absent.
    pub path: Option<PathBuf>,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReplicationSettings {
    pub enabled: bool,
    pub recover_on_start: bool,
    pub binary: String,
    pub config_path: PathBuf,
    pub shutdown_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Pretty,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogSettings {
    pub format: LogFormat,
    pub directory: Option<PathBuf>,
    pub file_prefix: String,
}

impl DatabaseSettings {
    /// `url` with SQLAlchemy-style relative (`sqlite:///./`) and absolute
    /// (`sqlite:////`) prefixes rewritten to their sqlx equivalents.
    pub fn normalized_url(&self) -> String {
        if let Some(rest) = self.url.strip_prefix("sqlite:///./") {
            format!("sqlite://./{}", rest)
        } else if let Some(rest) = self.url.strip_prefix("sqlite:////") {
            format!("sqlite:///{}", rest)
        } else {
            self.url.clone()
        }
    }

    /// Location of the SQLite file backing `url`.
    ///
    /// Accepts both `sqlite://relative.db` and `sqlite:relative.db`; query
    /// parameters are ignored.
    pub fn file_path(&self) -> PathBuf {
        if let Some(path) = &self.path {
            return path.clone();
        }
        let url = self.normalized_url();
        let without_scheme = url
            .strip_prefix("sqlite://")
            .or_else(|| url.strip_prefix("sqlite:"))
            .unwrap_or(&url);
        let without_query = without_scheme.split('?').next().unwrap_or(without_scheme);
        PathBuf::from(without_query)
    }
}

impl ReplicationSettings {
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let recover_db = std::env::var("RECOVER_DB").ok().map(|v| parse_flag(&v));

        let config = Self::defaults()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(
                Environment::with_prefix("USERHUB")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("database.url", std::env::var("DATABASE_URL").ok())?
            .set_override_option("replication.recover_on_start", recover_db)?
            .build()?;
        Ok(config.try_deserialize()?)
    }

    /// Builder pre-populated with every default, so any source layered on
    /// top only needs to name the keys it changes.
    pub fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("app.env", "development")?
            .set_default("app.host", "127.0.0.1")?
            .set_default("app.port", 8000)?
            .set_default("app.name", "userhub-server")?
            .set_default("database.url", DEFAULT_DATABASE_URL)?
            .set_default("database.max_connections", 5)?
            .set_default("replication.enabled", true)?
            .set_default("replication.recover_on_start", false)?
            .set_default("replication.binary", DEFAULT_REPLICATION_BINARY)?
            .set_default("replication.config_path", DEFAULT_REPLICATION_CONFIG)?
            .set_default("replication.shutdown_timeout_secs", DEFAULT_SHUTDOWN_TIMEOUT_SECS)?
            .set_default("log.format", "json")?
            .set_default("log.file_prefix", "userhub.log")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn load_from_toml(toml: &str) -> AppConfig {
        AppConfig::defaults()
            .unwrap()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = load_from_toml("");
        assert_eq!(config.app.port, 8000);
        assert_eq!(config.database.url, "sqlite://database.db");
        assert!(!config.replication.recover_on_start);
        assert_eq!(config.replication.binary, "litestream");
        assert_eq!(config.replication.shutdown_timeout(), Duration::from_secs(5));
        assert_eq!(config.log.format, LogFormat::Json);
        assert!(config.log.directory.is_none());
    }

    #[test]
    fn test_file_overrides() {
        let config = load_from_toml(
            r#"
            [database]
            url = "sqlite:///app/database.db"

            [replication]
            recover_on_start = true
            config_path = "/etc/litestream.yml"

            [log]
            format = "pretty"
            "#,
        );
        assert!(config.replication.recover_on_start);
        assert_eq!(config.replication.config_path, PathBuf::from("/etc/litestream.yml"));
        assert_eq!(config.log.format, LogFormat::Pretty);
        assert_eq!(config.database.file_path(), PathBuf::from("/app/database.db"));
    }

    #[test]
    fn test_database_file_path() {
        let settings = |url: &str, path: Option<&str>| DatabaseSettings {
            url: url.to_string(),
            path: path.map(PathBuf::from),
            max_connections: 1,
        };

        assert_eq!(settings("sqlite://database.db", None).file_path(), PathBuf::from("database.db"));
        assert_eq!(settings("sqlite:data/app.db?mode=rwc", None).file_path(), PathBuf::from("data/app.db"));
        assert_eq!(
            settings("sqlite://ignored.db", Some("/var/lib/userhub.db")).file_path(),
            PathBuf::from("/var/lib/userhub.db")
        );
    }

    #[test]
    fn test_sqlalchemy_style_urls() {
        let settings = |url: &str| DatabaseSettings {
            url: url.to_string(),
            path: None,
            max_connections: 1,
        };

        let relative = settings("sqlite:///./database.db");
        assert_eq!(relative.normalized_url(), "sqlite://./database.db");
        assert_eq!(relative.file_path(), PathBuf::from("./database.db"));

        let absolute = settings("sqlite:////app/database.db");
        assert_eq!(absolute.normalized_url(), "sqlite:///app/database.db");
        assert_eq!(absolute.file_path(), PathBuf::from("/app/database.db"));

        assert_eq!(settings("sqlite://database.db").normalized_url(), "sqlite://database.db");
    }
}
