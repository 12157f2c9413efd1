use std::collections::HashMap;

use super::*;

fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn normalizes_plain_file_path_to_sqlite_url() {
    assert_eq!(
        normalize_database_url("./data/test.db"),
        "sqlite://./data/test.db"
    );
}

#[test]
fn normalizes_single_colon_sqlite_path() {
    assert_eq!(
        normalize_database_url("sqlite:data\\clients.db"),
        "sqlite://data/clients.db"
    );
}

#[test]
fn keeps_memory_and_full_urls() {
    assert_eq!(normalize_database_url("sqlite::memory:"), "sqlite::memory:");
    assert_eq!(
        normalize_database_url(" sqlite://./a.db "),
        "sqlite://./a.db"
    );
}

#[test]
fn blank_url_falls_back_to_default() {
    assert_eq!(
        normalize_database_url("   "),
        Settings::default().database_url
    );
}

#[test]
fn prefixed_env_wins_over_bare_name() {
    let mut settings = Settings::default();
    settings.apply_env(env(&[
        ("DATABASE_URL", "sqlite://bare.db"),
        ("APP__DATABASE_URL", "sqlite://prefixed.db"),
        ("APP__STORE_BACKEND", "MEMORY"),
        ("APP__ACTIVITY_LOG_CAPACITY", "12"),
        ("APP__ACTIVITY_LOG_ORDER", "chronological"),
    ]));

    assert_eq!(settings.database_url, "sqlite://prefixed.db");
    assert_eq!(settings.backend, BackendKind::Memory);
    assert_eq!(settings.store_config(), StoreConfig::Memory);
    assert_eq!(
        settings.dashboard_config(),
        DashboardConfig {
            log_capacity: 12,
            log_order: DisplayOrder::Chronological,
        }
    );
}

#[test]
fn malformed_env_values_are_ignored() {
    let mut settings = Settings::default();
    settings.apply_env(env(&[
        ("APP__STORE_BACKEND", "postgres"),
        ("APP__ACTIVITY_LOG_CAPACITY", "lots"),
        ("APP__ACTIVITY_LOG_ORDER", "sideways"),
    ]));
    assert_eq!(settings, Settings::default());
}

#[test]
fn reads_overrides_from_config_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join(DEFAULT_CONFIG_FILE);
    fs::write(
        &path,
        "backend = \"sqlite\"\ndatabase_url = \"crew.db\"\nactivity_log_capacity = 5\nactivity_log_order = \"chronological\"\n",
    )
    .expect("write config");

    let mut settings = Settings::default();
    let raw = fs::read_to_string(&path).expect("read");
    settings.apply_file(toml::from_str(&raw).expect("parse"));

    assert_eq!(settings.activity_log_capacity, 5);
    assert_eq!(settings.activity_log_order, DisplayOrder::Chronological);
    assert_eq!(
        settings.store_config(),
        StoreConfig::Sqlite {
            database_url: "sqlite://crew.db".to_string()
        }
    );
}

#[test]
fn rejects_unknown_config_keys() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join(DEFAULT_CONFIG_FILE);
    fs::write(&path, "smtp_relay = \"mail.nny\"\n").expect("write config");

    let err = load_settings(&path).expect_err("unknown key");
    assert!(err.to_string().contains("invalid config file"));
}

#[test]
fn missing_config_file_uses_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let settings = load_settings(&dir.path().join("absent.toml")).expect("defaults");
    assert_eq!(settings.activity_log_capacity, DEFAULT_CAPACITY);
}
