use crate::angles::normalize;
use crate::ephemeris::provider::{check_range, EphemerisError, PositionProvider};
use crate::ephemeris::types::{Body, Position};
use crate::time::Instant;
use std::thread;
use std::time::Duration;

/// Deterministic provider for tests and what-if charts.
///
/// Every body moves linearly: `lon = base + speed * (jd - epoch)`.
#[derive(Debug, Clone)]
pub struct FixedPositions {
    epoch: Instant,
    motions: [(f64, f64); 10],
    range: (f64, f64),
    failure: Option<String>,
    delay: Option<Duration>,
}

impl FixedPositions {
    /// All bodies at 0° with zero speed.
    pub fn new(epoch: Instant) -> Self {
        Self {
            epoch,
            motions: [(0.0, 0.0); 10],
            range: (f64::MIN, f64::MAX),
            failure: None,
            delay: None,
        }
    }

    /// Set a body's longitude at the epoch and its daily motion.
    pub fn with_body(mut self, body: Body, lon: f64, speed: f64) -> Self {
        self.motions[body.index()] = (lon, speed);
        self
    }

    pub fn with_range(mut self, start: f64, end: f64) -> Self {
        self.range = (start, end);
        self
    }

    /// Every lookup fails with `ProviderUnavailable`.
    pub fn failing(mut self, reason: &str) -> Self {
        self.failure = Some(reason.to_string());
        self
    }

    /// Sleep before answering each lookup.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

impl PositionProvider for FixedPositions {
    fn position_at(&self, body: Body, instant: Instant) -> Result<Position, EphemerisError> {
        if let Some(delay) = self.delay {
            thread::sleep(delay);
        }
        if let Some(reason) = &self.failure {
            return Err(EphemerisError::ProviderUnavailable(reason.clone()));
        }
        check_range(instant, self.range)?;

        let (base, speed) = self.motions[body.index()];
        Ok(Position {
            lon: normalize(base + speed * (instant.jd - self.epoch.jd)),
            lat: 0.0,
            speed_lon: speed,
        })
    }

    fn supported_range(&self) -> (f64, f64) {
        self.range
    }

    fn name(&self) -> &str {
        "fixed"
    }
}
