//! Configuration service implementation.
//!
//! Loads [`AppConfig`] from `config.toml`, applies environment overrides and
//! caches the result.

use std::sync::{Arc, RwLock};

use arcana_core::config::AppConfig;
use arcana_core::error::Result;

use crate::paths::ArcanaPaths;
use crate::storage::AtomicFile;

/// Overrides `[backend] base_url`.
pub const ENV_BACKEND_URL: &str = "ARCANA_BACKEND_URL";
/// Overrides `[logging] level`.
pub const ENV_LOG_LEVEL: &str = "ARCANA_LOG";

/// Configuration service that loads and caches the application configuration.
#[derive(Clone)]
pub struct ConfigService {
    file: Arc<AtomicFile<AppConfig>>,
    config: Arc<RwLock<Option<AppConfig>>>,
}

impl ConfigService {
    pub fn new(paths: &ArcanaPaths) -> Self {
        Self {
            file: Arc::new(AtomicFile::toml(paths.config_file())),
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Gets the configuration, loading it on first access.
    ///
    /// An unreadable file is logged and replaced by defaults so the client can
    /// still start.
    pub fn get_config(&self) -> AppConfig {
        if let Ok(guard) = self.config.read() {
            if let Some(cached) = guard.as_ref() {
                return cached.clone();
            }
        }

        let loaded = match self.load() {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = %self.file.path().display(), error = %e, "invalid config file, using defaults");
                apply_env_overrides(AppConfig::default(), |key| std::env::var(key).ok())
            }
        };

        if let Ok(mut guard) = self.config.write() {
            *guard = Some(loaded.clone());
        }
        loaded
    }

    /// Reads the file and applies environment overrides.
    ///
    /// # Returns
    ///
    /// - `Ok(AppConfig)`: Parsed configuration, defaults for a missing file
    /// - `Err(_)`: The file exists but is not valid TOML for `AppConfig`
    pub fn load(&self) -> Result<AppConfig> {
        let config = self.file.load()?.unwrap_or_default();
        Ok(apply_env_overrides(config, |key| std::env::var(key).ok()))
    }

    /// Writes `config` to disk and refreshes the cache.
    pub fn save(&self, config: &AppConfig) -> Result<()> {
        self.file.save(config)?;
        self.invalidate_cache();
        tracing::info!(path = %self.file.path().display(), "configuration saved");
        Ok(())
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        if let Ok(mut guard) = self.config.write() {
            *guard = None;
        }
    }
}

/// Applies `ARCANA_*` overrides read through `lookup`.
pub fn apply_env_overrides<F>(mut config: AppConfig, lookup: F) -> AppConfig
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(ENV_BACKEND_URL).filter(|v| !v.trim().is_empty()) {
        config.backend.base_url = url.trim().trim_end_matches('/').to_string();
    }
    if let Some(level) = lookup(ENV_LOG_LEVEL).filter(|v| !v.trim().is_empty()) {
        config.logging.level = level.trim().to_string();
    }
    config
}
