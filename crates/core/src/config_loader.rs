use crate::config::AppConfig;
use anyhow::Result;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use std::path::Path;

/// Default location of the TOML configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "config/Config.toml";

/// Prefix for environment overrides; `__` separates nested keys
/// (e.g. `MARKET_INTEL_PROCESSING__CHUNK_SIZE=250`).
pub const ENV_PREFIX: &str = "MARKET_INTEL_";

pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads application configuration from the default path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration files cannot be read or parsed.
    pub fn load() -> Result<AppConfig> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    /// Loads application configuration by merging built-in defaults, a TOML
    /// file, and environment variables. A missing file is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration files cannot be read or parsed.
    pub fn load_from(path: &str) -> Result<AppConfig> {
        let config: AppConfig = Self::base(path)
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;

        tracing::debug!("Loaded configuration from {}", path);
        Ok(config)
    }

    /// Loads application configuration with a specific profile layered over
    /// the base file (`Config.toml` + `Config.{profile}.toml`).
    ///
    /// # Errors
    ///
    /// Returns an error if configuration files cannot be read or parsed.
    pub fn load_with_profile(path: &str, profile: &str) -> Result<AppConfig> {
        let config: AppConfig = Self::base(path)
            .merge(Toml::file(profile_path(path, profile)))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;

        tracing::debug!("Loaded configuration from {} (profile: {})", path, profile);
        Ok(config)
    }

    fn base(path: &str) -> Figment {
        Figment::from(Serialized::defaults(AppConfig::default())).merge(Toml::file(path))
    }
}

/// Derives the profile file next to `path`: `config/Config.toml` -> `config/Config.dev.toml`.
fn profile_path(path: &str, profile: &str) -> String {
    let path = Path::new(path);
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("Config");
    let file_name = format!("{stem}.{profile}.toml");

    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            parent.join(file_name).to_string_lossy().into_owned()
        }
        _ => file_name,
    }
}
