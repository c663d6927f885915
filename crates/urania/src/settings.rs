use crate::aspects::{AspectKind, AspectSettings};
use crate::ephemeris::cache::DEFAULT_CACHE_CAPACITY;
use crate::error::EngineError;
use crate::houses::HouseSystem;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Engine configuration. Every section falls back to its defaults when
/// missing from a settings file.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    pub house_system: HouseSystem,
    /// Orbs for natal and transit aspects
    pub aspects: AspectSettings,
    pub synastry: SynastrySettings,
    pub provider: ProviderSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynastrySettings {
    /// Keys missing here fall back to [`AspectSettings::synastry`]
    #[serde(deserialize_with = "synastry_aspects")]
    pub aspects: AspectSettings,
    /// How many cross aspects to report as key aspects
    pub key_aspect_count: usize,
}

impl Default for SynastrySettings {
    fn default() -> Self {
        Self {
            aspects: AspectSettings::synastry(),
            key_aspect_count: 8,
        }
    }
}

#[derive(Deserialize)]
struct PartialAspectSettings {
    orbs: Option<BTreeMap<AspectKind, f64>>,
    include_minor: Option<bool>,
}

fn synastry_aspects<'de, D: Deserializer<'de>>(deserializer: D) -> Result<AspectSettings, D::Error> {
    let partial = PartialAspectSettings::deserialize(deserializer)?;
    let mut aspects = AspectSettings::synastry();
    if let Some(orbs) = partial.orbs {
        aspects.orbs = orbs;
    }
    if let Some(include_minor) = partial.include_minor {
        aspects.include_minor = include_minor;
    }
    Ok(aspects)
}

/// Decorators wrapped around the position provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    /// Per-lookup deadline; `None` disables the timeout worker
    pub timeout_ms: Option<u64>,
    pub cache: bool,
    pub cache_capacity: usize,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            timeout_ms: None,
            cache: true,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

impl EngineSettings {
    pub fn validate(&self) -> Result<(), EngineError> {
        self.aspects.validate()?;
        self.synastry.aspects.validate()?;
        if self.synastry.key_aspect_count == 0 {
            return Err(EngineError::InvalidInput("key_aspect_count must be at least 1".into()));
        }
        if self.provider.timeout_ms == Some(0) {
            return Err(EngineError::InvalidInput("provider timeout_ms must be positive".into()));
        }
        if self.provider.cache && self.provider.cache_capacity == 0 {
            return Err(EngineError::InvalidInput("cache_capacity must be positive".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let settings = EngineSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.house_system, HouseSystem::Placidus);
        assert_eq!(settings.synastry.key_aspect_count, 8);
    }

    #[test]
    fn rejects_zero_key_aspects() {
        let mut settings = EngineSettings::default();
        settings.synastry.key_aspect_count = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let settings: EngineSettings = serde_json::from_str(r#"{"house_system":"koch"}"#).unwrap();
        assert_eq!(settings.house_system, HouseSystem::Koch);
        assert_eq!(settings.synastry, SynastrySettings::default());
    }

    #[test]
    fn partial_synastry_aspects_keep_synastry_orbs() {
        let settings: EngineSettings =
            serde_json::from_str(r#"{"synastry":{"aspects":{"include_minor":true}}}"#).unwrap();
        let aspects = &settings.synastry.aspects;
        assert!(aspects.include_minor);
        assert_eq!(aspects.orbs, AspectSettings::synastry().orbs);
        assert_eq!(aspects.orb_for(AspectKind::Trine), Some(8.0));
        assert_eq!(aspects.orb_for(AspectKind::Sextile), Some(6.0));
        assert_eq!(aspects.orb_for(AspectKind::Quincunx), Some(3.0));

        // the natal section is untouched
        assert_eq!(settings.aspects, AspectSettings::default());
    }

    #[test]
    fn synastry_orbs_table_replaces_defaults() {
        let settings: EngineSettings =
            serde_json::from_str(r#"{"synastry":{"aspects":{"orbs":{"trine":9.0}}}}"#).unwrap();
        let aspects = &settings.synastry.aspects;
        assert_eq!(aspects.orbs.len(), 1);
        assert_eq!(aspects.orb_for(AspectKind::Trine), Some(9.0));
        assert!(!aspects.include_minor);
    }
}
