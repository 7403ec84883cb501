//! Process configuration read from the environment.

use std::{
    env,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::PathBuf,
    sync::Arc,
};

use thiserror::Error;

use crate::{
    core::store::MemoryPlayerStore,
    persist::{PlayerStore, StoreResult, sqlite::SqlitePlayerStore},
};

/// Port used when `PORT` is unset.
pub const DEFAULT_PORT: u16 = 3000;
/// Connection string used when `DATABASE_URL` is unset.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://leaderboard.db";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("PORT must be a number between 1 and 65535, got {0:?}")]
    InvalidPort(String),
    #[error("BIND_ADDR must be an IP address, got {0:?}")]
    InvalidBindAddr(String),
    #[error("DATABASE_URL must not be empty")]
    EmptyDatabaseUrl,
}

/// Where player records live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    /// Sharded in-process maps; nothing survives a restart.
    Memory,
    /// SQLite database that lives only as long as the process.
    SqliteInMemory,
    /// SQLite database file.
    SqliteFile(PathBuf),
}

impl StoreBackend {
    /// Maps a connection string onto a backend.
    ///
    /// `memory` and `mem://` select the in-process store, `sqlite::memory:`
    /// an in-memory SQLite database, and `sqlite://<path>`, `sqlite:<path>`
    /// or a bare path a SQLite file.
    pub fn parse(url: &str) -> Result<Self, ConfigError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(ConfigError::EmptyDatabaseUrl);
        }
        if url.eq_ignore_ascii_case("memory") || url.starts_with("mem://") {
            return Ok(Self::Memory);
        }
        if url == "sqlite::memory:" || url == ":memory:" {
            return Ok(Self::SqliteInMemory);
        }
        let path = url
            .strip_prefix("sqlite://")
            .or_else(|| url.strip_prefix("sqlite:"))
            .unwrap_or(url);
        if path.is_empty() {
            return Err(ConfigError::EmptyDatabaseUrl);
        }
        Ok(Self::SqliteFile(PathBuf::from(path)))
    }

    /// Opens the store this backend names.
    pub fn open(&self) -> StoreResult<Arc<dyn PlayerStore>> {
        let store: Arc<dyn PlayerStore> = match self {
            Self::Memory => Arc::new(MemoryPlayerStore::new()),
            Self::SqliteInMemory => Arc::new(SqlitePlayerStore::open_in_memory()?),
            Self::SqliteFile(path) => Arc::new(SqlitePlayerStore::open(path)?),
        };
        Ok(store)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub bind_addr: IpAddr,
    pub port: u16,
    pub database_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .ok()
                .filter(|p| *p != 0)
                .ok_or(ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };
        let bind_addr = match lookup("BIND_ADDR") {
            Some(raw) => raw
                .trim()
                .parse::<IpAddr>()
                .map_err(|_| ConfigError::InvalidBindAddr(raw))?,
            None => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        };
        let database_url =
            lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());
        if database_url.trim().is_empty() {
            return Err(ConfigError::EmptyDatabaseUrl);
        }
        Ok(Self {
            bind_addr,
            port,
            database_url,
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }

    pub fn backend(&self) -> Result<StoreBackend, ConfigError> {
        StoreBackend::parse(&self.database_url)
    }
}
