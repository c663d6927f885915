use crate::angles::normalize;
use crate::ephemeris::provider::{check_range, EphemerisError, PositionProvider};
use crate::ephemeris::types::{Body, Position};
use crate::time::Instant;
use log::{debug, warn};
use std::env;
use std::path::{Path, PathBuf};
use swisseph::swe::calc_ut;

// Swiss Ephemeris body codes
const BODY_CODES: &[(Body, i32)] = &[
    (Body::Sun, 0),
    (Body::Moon, 1),
    (Body::Mercury, 2),
    (Body::Venus, 3),
    (Body::Mars, 4),
    (Body::Jupiter, 5),
    (Body::Saturn, 6),
    (Body::Uranus, 7),
    (Body::Neptune, 8),
    (Body::Pluto, 9),
];

/// FLG_SWIEPH | FLG_SPEED
const CALC_FLAGS: i32 = 2 | 256;

/// Span covered by the standard sepl/semo data files (1800–2399 AD)
const SWISS_RANGE: (f64, f64) = (2_378_496.5, 2_597_641.5);

/// Position provider backed by the Swiss Ephemeris library.
pub struct SwissEphemerisAdapter {
    ephemeris_path: PathBuf,
}

impl SwissEphemerisAdapter {
    /// Create an adapter. The data path falls back to `SWISS_EPHEMERIS_PATH`
    /// and then to `/usr/local/share/swisseph`.
    pub fn new(ephemeris_path: Option<PathBuf>) -> Result<Self, EphemerisError> {
        let path = ephemeris_path.unwrap_or_else(|| {
            env::var("SWISS_EPHEMERIS_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("/usr/local/share/swisseph"))
        });

        if !path.exists() {
            return Err(EphemerisError::ProviderUnavailable(format!(
                "ephemeris path {} does not exist",
                path.display()
            )));
        }
        debug!("Swiss Ephemeris data at {}", path.display());

        Ok(Self { ephemeris_path: path })
    }

    pub fn ephemeris_path(&self) -> &Path {
        &self.ephemeris_path
    }
}

impl PositionProvider for SwissEphemerisAdapter {
    fn position_at(&self, body: Body, instant: Instant) -> Result<Position, EphemerisError> {
        check_range(instant, SWISS_RANGE)?;

        let code = BODY_CODES
            .iter()
            .find(|(b, _)| *b == body)
            .map(|(_, code)| *code)
            .ok_or(EphemerisError::UnsupportedBody(body))?;

        let result = calc_ut(instant.jd, code as u32, CALC_FLAGS as u32).map_err(|e| {
            warn!("Swiss Ephemeris failed for {body} at {instant}: {e}");
            EphemerisError::ProviderUnavailable(format!("Swiss Ephemeris error: {e}"))
        })?;

        let out = result.out;
        Ok(Position {
            lon: normalize(out[0]),
            lat: out[1],
            speed_lon: out[3],
        })
    }

    fn supported_range(&self) -> (f64, f64) {
        SWISS_RANGE
    }

    fn name(&self) -> &str {
        "swisseph"
    }
}
