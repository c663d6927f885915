//! Settings file loading for urania front ends.
//!
//! A settings file is TOML with an `[engine]` table mirroring
//! [`EngineSettings`] and an optional `[log]` table. Missing keys fall back to
//! the engine defaults, except that an `orbs` table replaces the default orbs
//! wholesale.

use anyhow::Context;
use log::{debug, info};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use urania::EngineSettings;

/// Environment variable naming a settings file.
pub const CONFIG_ENV: &str = "URANIA_CONFIG";

/// Tried in order when neither an explicit path nor the environment names one.
const DEFAULT_PATHS: [&str; 2] = ["configs/urania.toml", "../../configs/urania.toml"];

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub engine: EngineSettings,
    /// `env_logger` filter, overridden by `RUST_LOG`
    pub log_filter: Option<String>,
    /// File the settings came from, `None` for built-in defaults
    pub source: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct LogToml {
    #[serde(default)]
    filter: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct RootConfigToml {
    #[serde(default)]
    engine: EngineSettings,
    #[serde(default)]
    log: LogToml,
}

/// Locate and read the settings text.
///
/// An explicit path or `URANIA_CONFIG` must exist. Otherwise the default
/// locations are tried and `None` means none of them exists.
pub fn read_config_text(explicit: Option<&Path>) -> anyhow::Result<Option<(PathBuf, String)>> {
    if let Some(path) = explicit {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Could not read settings file {}", path.display()))?;
        return Ok(Some((path.to_path_buf(), text)));
    }

    if let Some(value) = std::env::var_os(CONFIG_ENV) {
        let path = PathBuf::from(value);
        let text = fs::read_to_string(&path)
            .with_context(|| format!("Could not read {CONFIG_ENV}={}", path.display()))?;
        return Ok(Some((path, text)));
    }

    for p in &DEFAULT_PATHS {
        if let Ok(text) = fs::read_to_string(p) {
            return Ok(Some((PathBuf::from(p), text)));
        }
    }
    Ok(None)
}

/// Parse and validate settings text.
pub fn parse_config(text: &str) -> anyhow::Result<AppConfig> {
    let root: RootConfigToml = toml::from_str(text).context("Failed to parse urania settings")?;
    root.engine
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid [engine] settings: {e}"))?;
    Ok(AppConfig {
        engine: root.engine,
        log_filter: root.log.filter,
        source: None,
    })
}

/// Read settings from the first available source, or the built-in defaults.
///
/// Nothing is logged, so a binary can call this before its logger exists
/// and take the `[log]` filter from the result.
pub fn read_config(explicit: Option<&Path>) -> anyhow::Result<AppConfig> {
    match read_config_text(explicit)? {
        Some((path, text)) => {
            let mut config =
                parse_config(&text).with_context(|| format!("in settings file {}", path.display()))?;
            config.source = Some(path);
            Ok(config)
        }
        None => Ok(AppConfig {
            engine: EngineSettings::default(),
            log_filter: None,
            source: None,
        }),
    }
}

/// [`read_config`], logging where the settings came from.
pub fn load_config(explicit: Option<&Path>) -> anyhow::Result<AppConfig> {
    let config = read_config(explicit)?;
    log_source(&config);
    Ok(config)
}

pub fn log_source(config: &AppConfig) {
    match &config.source {
        Some(path) => info!("loaded settings from {}", path.display()),
        None => debug!("no settings file in {:?}, using defaults", DEFAULT_PATHS),
    }
}

pub fn load_engine_settings(explicit: Option<&Path>) -> anyhow::Result<EngineSettings> {
    Ok(load_config(explicit)?.engine)
}
