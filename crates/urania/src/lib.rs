//! Natal charts, transits and synastry computed from an injected position
//! provider.

pub mod angles;
pub mod aspects;
pub mod chart;
pub mod ephemeris;
pub mod error;
pub mod houses;
pub mod settings;
pub mod synastry;
pub mod time;
pub mod western;

pub use aspects::{Aspect, AspectKind, AspectPhase, AspectSettings, ChartLayer, Strength};
pub use chart::{BirthData, BodyPosition, Chart, ChartFlag, HouseCusp, LunarPhase, MoonPhase, TransitReport, TransitResult};
pub use ephemeris::{AnalyticEphemeris, Body, GeoLocation, Position, PositionProvider};
pub use error::EngineError;
pub use houses::HouseSystem;
pub use settings::{EngineSettings, ProviderSettings, SynastrySettings};
pub use synastry::{Category, CategoryResult, CompatibilityResult, Rating, Stars, WeightedAspect};
pub use time::{Instant, Zone};

use aspects::AspectCalculator;
use chart::{ChartCalculator, TransitCalculator};
use ephemeris::{CachedProvider, TimeoutProvider};
use log::{debug, warn};
use std::time::Duration;
use synastry::SynastryCalculator;

/// Entry point for all chart computations.
///
/// The engine holds no mutable state of its own; the provider may cache.
pub struct Engine<P: PositionProvider> {
    provider: P,
    settings: EngineSettings,
}

impl<P: PositionProvider> Engine<P> {
    pub fn new(provider: P, settings: EngineSettings) -> Result<Self, EngineError> {
        settings.validate()?;
        debug!(
            "engine using provider '{}', {} houses",
            provider.name(),
            settings.house_system
        );
        Ok(Self { provider, settings })
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Natal chart for a birth moment and place.
    pub fn build_chart(&self, birth: &BirthData) -> Result<Chart, EngineError> {
        ChartCalculator::new(&self.provider, self.settings.house_system).build(birth)
    }

    /// Sky at `at` measured against `natal`.
    pub fn compute_transits(&self, natal: &Chart, at: Instant) -> Result<TransitReport, EngineError> {
        TransitCalculator::new(&self.provider, &self.settings.aspects).compute(natal, at)
    }

    /// Compatibility of two charts. Never fails.
    pub fn compute_synastry(&self, a: &Chart, b: &Chart) -> CompatibilityResult {
        SynastryCalculator::new(&self.settings.synastry).compute(a, b)
    }

    /// Build both charts and compare them. A provider outage degrades to an
    /// unrated result; other failures are returned.
    pub fn synastry_for(&self, a: &BirthData, b: &BirthData) -> Result<CompatibilityResult, EngineError> {
        let charts = self.build_chart(a).and_then(|ca| Ok((ca, self.build_chart(b)?)));
        match charts {
            Ok((ca, cb)) => Ok(self.compute_synastry(&ca, &cb)),
            Err(EngineError::ProviderUnavailable(reason)) => {
                warn!("synastry unavailable: {reason}");
                Ok(CompatibilityResult::unavailable(&format!(
                    "planetary positions could not be retrieved ({reason})"
                )))
            }
            Err(e) => Err(e),
        }
    }

    pub fn position_at(&self, body: Body, instant: Instant) -> Result<Position, EngineError> {
        Ok(self.provider.position_at(body, instant)?)
    }

    /// Aspects between the bodies of one chart.
    pub fn natal_aspects(&self, chart: &Chart) -> Vec<Aspect> {
        AspectCalculator::new().natal_aspects(&chart.aspect_points(ChartLayer::Natal), &self.settings.aspects)
    }
}

impl Engine<Box<dyn PositionProvider>> {
    /// Engine over the built-in analytic ephemeris, decorated per
    /// `settings.provider`.
    pub fn analytic(settings: EngineSettings) -> Result<Self, EngineError> {
        Self::decorated(AnalyticEphemeris::new(), settings)
    }

    /// Wrap `inner` in the timeout and cache layers the settings ask for.
    /// The cache sits outside the timeout so hits never touch the worker.
    pub fn decorated<P: PositionProvider + 'static>(inner: P, settings: EngineSettings) -> Result<Self, EngineError> {
        settings.validate()?;
        let provider = &settings.provider;

        let mut boxed: Box<dyn PositionProvider> = match provider.timeout_ms {
            Some(ms) => Box::new(TimeoutProvider::new(inner, Duration::from_millis(ms))?),
            None => Box::new(inner),
        };
        if provider.cache {
            boxed = Box::new(CachedProvider::with_capacity(boxed, provider.cache_capacity));
        }

        Self::new(boxed, settings)
    }
}
