use std::{collections::HashMap, path::PathBuf};

use levelboard::{
    config::{Config, ConfigError, DEFAULT_PORT, StoreBackend},
    persist::PlayerStore,
};

fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn defaults_apply_when_unset() {
    let cfg = Config::from_lookup(lookup(&[])).expect("config");
    assert_eq!(cfg.port, DEFAULT_PORT);
    assert_eq!(
        cfg.backend().expect("backend"),
        StoreBackend::SqliteFile(PathBuf::from("leaderboard.db"))
    );
    assert_eq!(cfg.socket_addr().port(), DEFAULT_PORT);
}

#[test]
fn port_and_url_are_read() {
    let cfg = Config::from_lookup(lookup(&[
        ("PORT", "8081"),
        ("DATABASE_URL", "memory"),
        ("BIND_ADDR", "127.0.0.1"),
    ]))
    .expect("config");
    assert_eq!(cfg.port, 8081);
    assert_eq!(cfg.backend().expect("backend"), StoreBackend::Memory);
    assert_eq!(cfg.socket_addr().to_string(), "127.0.0.1:8081");
}

#[test]
fn bad_values_are_rejected() {
    assert_eq!(
        Config::from_lookup(lookup(&[("PORT", "http")])),
        Err(ConfigError::InvalidPort("http".to_string()))
    );
    assert_eq!(
        Config::from_lookup(lookup(&[("PORT", "0")])),
        Err(ConfigError::InvalidPort("0".to_string()))
    );
    assert_eq!(
        Config::from_lookup(lookup(&[("DATABASE_URL", "  ")])),
        Err(ConfigError::EmptyDatabaseUrl)
    );
    assert!(matches!(
        Config::from_lookup(lookup(&[("BIND_ADDR", "nowhere")])),
        Err(ConfigError::InvalidBindAddr(_))
    ));
}

#[test]
fn connection_strings_map_to_backends() {
    assert_eq!(StoreBackend::parse("mem://"), Ok(StoreBackend::Memory));
    assert_eq!(
        StoreBackend::parse("sqlite::memory:"),
        Ok(StoreBackend::SqliteInMemory)
    );
    assert_eq!(
        StoreBackend::parse("sqlite:///var/lib/lb.db"),
        Ok(StoreBackend::SqliteFile(PathBuf::from("/var/lib/lb.db")))
    );
    assert_eq!(
        StoreBackend::parse("sqlite:data.db"),
        Ok(StoreBackend::SqliteFile(PathBuf::from("data.db")))
    );
    assert_eq!(
        StoreBackend::parse("./plain.db"),
        Ok(StoreBackend::SqliteFile(PathBuf::from("./plain.db")))
    );
    assert_eq!(StoreBackend::parse("sqlite://"), Err(ConfigError::EmptyDatabaseUrl));
}

#[test]
fn backends_open() {
    StoreBackend::Memory.open().expect("memory").ping().expect("ping");
    StoreBackend::SqliteInMemory
        .open()
        .expect("sqlite")
        .ping()
        .expect("ping");
}
