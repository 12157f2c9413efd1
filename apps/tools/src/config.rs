use std::{fs, path::Path};

use anyhow::Context;
use clap::ValueEnum;
use dashboard::{activity_log::DEFAULT_CAPACITY, DashboardConfig, DisplayOrder};
use serde::Deserialize;
use storage::StoreConfig;

pub const DEFAULT_CONFIG_FILE: &str = "dashboard.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    Memory,
    Sqlite,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub backend: BackendKind,
    pub database_url: String,
    pub activity_log_capacity: usize,
    pub activity_log_order: DisplayOrder,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            backend: BackendKind::Sqlite,
            database_url: "sqlite://./data/clients.db".into(),
            activity_log_capacity: DEFAULT_CAPACITY,
            activity_log_order: DisplayOrder::NewestFirst,
        }
    }
}

/// Optional overrides read from `dashboard.toml`.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    backend: Option<BackendKind>,
    database_url: Option<String>,
    activity_log_capacity: Option<usize>,
    activity_log_order: Option<DisplayOrder>,
}

impl Settings {
    pub fn store_config(&self) -> StoreConfig {
        match self.backend {
            BackendKind::Memory => StoreConfig::Memory,
            BackendKind::Sqlite => StoreConfig::Sqlite {
                database_url: normalize_database_url(&self.database_url),
            },
        }
    }

    pub fn dashboard_config(&self) -> DashboardConfig {
        DashboardConfig {
            log_capacity: self.activity_log_capacity,
            log_order: self.activity_log_order,
        }
    }

    fn apply_file(&mut self, file_cfg: FileSettings) {
        if let Some(v) = file_cfg.backend {
            self.backend = v;
        }
        if let Some(v) = file_cfg.database_url {
            self.database_url = v;
        }
        if let Some(v) = file_cfg.activity_log_capacity {
            self.activity_log_capacity = v;
        }
        if let Some(v) = file_cfg.activity_log_order {
            self.activity_log_order = v;
        }
    }

    /// Later keys in each pair win, so `APP__*` overrides the bare name.
    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        for key in ["DATABASE_URL", "APP__DATABASE_URL"] {
            if let Some(v) = lookup(key) {
                self.database_url = v;
            }
        }

        if let Some(v) = lookup("APP__STORE_BACKEND") {
            match BackendKind::from_str(&v, true) {
                Ok(backend) => self.backend = backend,
                Err(_) => tracing::warn!("ignoring unknown APP__STORE_BACKEND '{v}'"),
            }
        }

        if let Some(v) = lookup("APP__ACTIVITY_LOG_CAPACITY") {
            match v.parse::<usize>() {
                Ok(parsed) => self.activity_log_capacity = parsed,
                Err(_) => tracing::warn!("ignoring non-numeric APP__ACTIVITY_LOG_CAPACITY '{v}'"),
            }
        }

        if let Some(v) = lookup("APP__ACTIVITY_LOG_ORDER") {
            match v.parse::<DisplayOrder>() {
                Ok(order) => self.activity_log_order = order,
                Err(err) => tracing::warn!("ignoring APP__ACTIVITY_LOG_ORDER: {err}"),
            }
        }
    }
}

/// Defaults, then the config file if present, then the process environment.
pub fn load_settings(config_path: &Path) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    match fs::read_to_string(config_path) {
        Ok(raw) => {
            let file_cfg: FileSettings = toml::from_str(&raw)
                .with_context(|| format!("invalid config file '{}'", config_path.display()))?;
            settings.apply_file(file_cfg);
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to read config file '{}'", config_path.display()))
        }
    }

    settings.apply_env(|key| std::env::var(key).ok());
    Ok(settings)
}

/// Accepts bare file paths and `sqlite:` paths as well as full urls.
pub fn normalize_database_url(raw_database_url: &str) -> String {
    let raw_database_url = raw_database_url.trim();

    if raw_database_url.is_empty() {
        return Settings::default().database_url;
    }

    if raw_database_url.starts_with("sqlite::memory:")
        || raw_database_url.starts_with("sqlite://")
        || raw_database_url.contains("://")
    {
        return raw_database_url.to_string();
    }

    if let Some(path) = raw_database_url.strip_prefix("sqlite:") {
        let path = path.replace('\\', "/");
        return format!("sqlite://{path}");
    }

    format!("sqlite://{}", raw_database_url.replace('\\', "/"))
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
