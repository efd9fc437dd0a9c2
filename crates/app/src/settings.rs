//! Handles settings for the application. Configuration is read from an
//! optional `settings.toml` and `OPSVC__*` environment variables, the latter
//! taking precedence (`OPSVC__SERVER__PORT=8080`).
//!
//! See `settings.toml` for the configuration.
use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct App {
    pub level: String,
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub bind: Option<String>,
    pub port: u16,
    pub database: String,
    pub query_timeout_secs: Option<u64>,
}

impl Server {
    pub fn database(&self) -> Result<Database, ConfigError> {
        Database::parse(&self.database)
    }

    pub fn query_timeout(&self) -> Option<Duration> {
        self.query_timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: App,
    pub server: Server,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Database {
    Memory,
    Sqlite(String),
    Postgres(String),
}

impl Database {
    /// `memory`, a postgres url, a sqlite url or a bare sqlite file path.
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(ConfigError::Message(
                "server.database must not be empty".to_string(),
            ));
        }
        if value.eq_ignore_ascii_case("memory") {
            return Ok(Database::Memory);
        }
        if value.starts_with("postgres://") || value.starts_with("postgresql://") {
            return Ok(Database::Postgres(value.to_string()));
        }
        if value.starts_with("sqlite:") {
            return Ok(Database::Sqlite(value.to_string()));
        }
        Ok(Database::Sqlite(format!("sqlite:{value}?mode=rwc")))
    }

    pub fn url(&self) -> &str {
        match self {
            Database::Memory => "sqlite::memory:",
            Database::Sqlite(url) | Database::Postgres(url) => url,
        }
    }
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .set_default("app.level", "info")?
            .set_default("server.port", 3000)?
            .set_default("server.database", "memory")?
            .add_source(File::with_name("settings").required(false))
            .add_source(
                Environment::with_prefix("OPSVC")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_database() {
        assert_eq!(Database::parse("memory").unwrap(), Database::Memory);
        assert_eq!(Database::Memory.url(), "sqlite::memory:");
    }

    #[test]
    fn sqlite_path_becomes_url() {
        let db = Database::parse("./data/ops.db").unwrap();
        assert_eq!(db.url(), "sqlite:./data/ops.db?mode=rwc");
    }

    #[test]
    fn urls_are_kept() {
        let db = Database::parse("postgres://user:pw@localhost/ops").unwrap();
        assert_eq!(db, Database::Postgres("postgres://user:pw@localhost/ops".to_string()));
        let db = Database::parse("sqlite:ops.db").unwrap();
        assert_eq!(db.url(), "sqlite:ops.db");
    }

    #[test]
    fn empty_database_is_rejected() {
        assert!(Database::parse("  ").is_err());
    }
}
