use crate::angles::signed_delta;
use crate::chart::data::{BirthData, BodyPosition, Chart, ChartFlag, HouseCusp};
use crate::ephemeris::{Body, EphemerisError, Position, PositionProvider};
use crate::error::EngineError;
use crate::houses::{compute_houses, house_of, HouseSystem};
use crate::time::{local_sidereal_deg, mean_obliquity_deg, Instant};
use crate::western::{degree_in_sign, ZodiacSign};
use log::{debug, warn};

/// Speeds below this (deg/day) count as stationary.
const STATIONARY_SPEED: f64 = 1e-9;

/// Builds natal charts from birth data.
pub struct ChartCalculator<'a, P: PositionProvider + ?Sized> {
    provider: &'a P,
    house_system: HouseSystem,
}

impl<'a, P: PositionProvider + ?Sized> ChartCalculator<'a, P> {
    pub fn new(provider: &'a P, house_system: HouseSystem) -> Self {
        Self {
            provider,
            house_system,
        }
    }

    pub fn build(&self, birth: &BirthData) -> Result<Chart, EngineError> {
        birth.validate()?;
        let instant = birth.instant()?;

        let mut flags = Vec::new();
        if !birth.time_known() {
            flags.push(ChartFlag::BirthTimeUnknown);
        }

        let ramc = local_sidereal_deg(instant, birth.location.lon);
        let eps = mean_obliquity_deg(instant);
        let angles = compute_houses(ramc, birth.location.lat, eps, self.house_system)?;

        let (bodies, body_flags) = sample_bodies(self.provider, instant, &angles.cusps)?;
        flags.extend(body_flags);

        let mut house = 0u8;
        let cusps = angles.cusps.map(|lon| {
            house += 1;
            HouseCusp::new(house, lon)
        });

        debug!(
            "chart at {instant}: asc {:.3}, mc {:.3}, {} system, {} flags",
            angles.ascendant,
            angles.midheaven,
            self.house_system,
            flags.len()
        );

        Ok(Chart {
            birth: birth.clone(),
            instant,
            house_system: self.house_system,
            bodies,
            cusps,
            ascendant: angles.ascendant,
            midheaven: angles.midheaven,
            flags,
        })
    }
}

/// Query all ten bodies at `instant`, classify retrograde motion and place
/// each body in the houses given by `cusps`.
///
/// Each body is also sampled one day later (one day earlier at the end of the
/// provider's range) and the sign of that difference is checked against the
/// provider speed.
pub(crate) fn sample_bodies<P: PositionProvider + ?Sized>(
    provider: &P,
    instant: Instant,
    cusps: &[f64; 12],
) -> Result<([BodyPosition; 10], Vec<ChartFlag>), EngineError> {
    let mut flags = Vec::new();
    let mut bodies = Vec::with_capacity(Body::ALL.len());

    for body in Body::ALL {
        let now = provider.position_at(body, instant)?;
        let daily_motion = one_day_motion(provider, body, instant, &now)?;

        let retrograde = now.speed_lon < 0.0;
        let uncertain = now.speed_lon.abs() >= STATIONARY_SPEED
            && daily_motion != 0.0
            && daily_motion.signum() != now.speed_lon.signum();
        if uncertain {
            warn!(
                "{body} at {instant}: speed {:.6} disagrees with one-day motion {:.6}",
                now.speed_lon, daily_motion
            );
            flags.push(ChartFlag::RetrogradeDisagreement(body));
        }

        bodies.push(BodyPosition {
            body,
            lon: now.lon,
            lat: now.lat,
            sign: ZodiacSign::from_longitude(now.lon),
            degree: degree_in_sign(now.lon),
            speed: now.speed_lon,
            retrograde,
            retrograde_uncertain: uncertain,
            house: house_of(now.lon, cusps),
        });
    }

    let bodies: [BodyPosition; 10] = bodies
        .try_into()
        .map_err(|_| EngineError::InvalidInput("provider returned an incomplete body set".into()))?;
    Ok((bodies, flags))
}

/// Wrapped longitude change over one day around `instant`.
fn one_day_motion<P: PositionProvider + ?Sized>(
    provider: &P,
    body: Body,
    instant: Instant,
    now: &Position,
) -> Result<f64, EngineError> {
    match provider.position_at(body, instant.add_days(1.0)) {
        Ok(next) => Ok(signed_delta(now.lon, next.lon)),
        Err(EphemerisError::OutOfRange { .. }) => {
            let prev = provider.position_at(body, instant.add_days(-1.0))?;
            Ok(signed_delta(prev.lon, now.lon))
        }
        Err(e) => Err(e.into()),
    }
}
