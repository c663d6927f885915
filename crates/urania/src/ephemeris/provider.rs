use crate::ephemeris::types::{Body, Position};
use crate::time::Instant;
use std::sync::Arc;
use thiserror::Error;

/// Errors a position provider can report
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EphemerisError {
    #[error("julian day {jd} is outside the supported range {start}..={end}")]
    OutOfRange { jd: f64, start: f64, end: f64 },
    #[error("position source unavailable: {0}")]
    ProviderUnavailable(String),
    #[error("no data for body {0}")]
    UnsupportedBody(Body),
}

/// Source of instantaneous body positions.
///
/// Implementations must be deterministic: the same `(body, instant)` always
/// yields the same position. Instants outside the supported range fail with
/// [`EphemerisError::OutOfRange`]; unreachable or slow backends fail with
/// [`EphemerisError::ProviderUnavailable`].
pub trait PositionProvider: Send + Sync {
    fn position_at(&self, body: Body, instant: Instant) -> Result<Position, EphemerisError>;

    /// Inclusive Julian Day span this provider answers for
    fn supported_range(&self) -> (f64, f64);

    fn name(&self) -> &str;
}

impl<P: PositionProvider + ?Sized> PositionProvider for Arc<P> {
    fn position_at(&self, body: Body, instant: Instant) -> Result<Position, EphemerisError> {
        (**self).position_at(body, instant)
    }

    fn supported_range(&self) -> (f64, f64) {
        (**self).supported_range()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<P: PositionProvider + ?Sized> PositionProvider for Box<P> {
    fn position_at(&self, body: Body, instant: Instant) -> Result<Position, EphemerisError> {
        (**self).position_at(body, instant)
    }

    fn supported_range(&self) -> (f64, f64) {
        (**self).supported_range()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Shared range guard for providers with a fixed span
pub(crate) fn check_range(instant: Instant, (start, end): (f64, f64)) -> Result<(), EphemerisError> {
    if instant.jd.is_finite() && instant.jd >= start && instant.jd <= end {
        Ok(())
    } else {
        Err(EphemerisError::OutOfRange {
            jd: instant.jd,
            start,
            end,
        })
    }
}
