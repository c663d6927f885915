use crate::ephemeris::EphemerisError;
use crate::houses::HouseSystem;
use thiserror::Error;

/// Errors surfaced by the engine's public operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// Missing or out-of-range birth data. Caller error, never retried.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// The instant lies outside the position provider's supported span.
    #[error("julian day {jd} is outside the supported range {start}..={end}")]
    OutOfRange { jd: f64, start: f64, end: f64 },
    /// The house system cannot be constructed at this latitude.
    #[error("house system {system} is undefined at latitude {latitude}")]
    HouseSystemUndefined { system: HouseSystem, latitude: f64 },
    /// The position source could not be reached or timed out.
    #[error("position provider unavailable: {0}")]
    ProviderUnavailable(String),
}

impl EngineError {
    pub fn is_provider_unavailable(&self) -> bool {
        matches!(self, EngineError::ProviderUnavailable(_))
    }
}

impl From<EphemerisError> for EngineError {
    fn from(e: EphemerisError) -> Self {
        match e {
            EphemerisError::OutOfRange { jd, start, end } => {
                EngineError::OutOfRange { jd, start, end }
            }
            EphemerisError::ProviderUnavailable(reason) => EngineError::ProviderUnavailable(reason),
            EphemerisError::UnsupportedBody(body) => {
                EngineError::InvalidInput(format!("provider has no data for {body}"))
            }
        }
    }
}
