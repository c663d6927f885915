use crate::aspects::{AspectPoint, ChartLayer};
use crate::ephemeris::{Body, GeoLocation};
use crate::error::EngineError;
use crate::houses::HouseSystem;
use crate::time::{local_noon, parse_zone_label, Instant};
use crate::western::{sign_ruler, ZodiacSign};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Civil birth moment and place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BirthData {
    pub date: NaiveDate,
    /// Local wall-clock time; `None` when unknown
    #[serde(default)]
    pub time: Option<NaiveTime>,
    pub location: GeoLocation,
    /// Zone label: a fixed offset such as `UTC-4` or `+05:30`, or an IANA
    /// region such as `America/New_York`
    pub zone: String,
}

impl BirthData {
    pub fn new(date: NaiveDate, time: Option<NaiveTime>, location: GeoLocation, zone: impl Into<String>) -> Self {
        Self {
            date,
            time,
            location,
            zone: zone.into(),
        }
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if !self.location.is_valid() {
            return Err(EngineError::InvalidInput(format!(
                "location out of range: lat {}, lon {}",
                self.location.lat, self.location.lon
            )));
        }
        if self.zone.trim().is_empty() {
            return Err(EngineError::InvalidInput("zone label is empty".into()));
        }
        Ok(())
    }

    /// Resolve to a single instant. Unknown times resolve to local noon.
    pub fn instant(&self) -> Result<Instant, EngineError> {
        let zone = parse_zone_label(&self.zone)?;
        Instant::from_civil(self.date, self.time.unwrap_or_else(local_noon), zone)
    }

    pub fn time_known(&self) -> bool {
        self.time.is_some()
    }
}

/// A body's placement in a chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyPosition {
    pub body: Body,
    pub lon: f64,
    pub lat: f64,
    pub sign: ZodiacSign,
    /// Degrees into the sign, [0, 30)
    pub degree: f64,
    /// Degrees per day
    pub speed: f64,
    pub retrograde: bool,
    /// Provider speed and the one-day finite difference disagree in sign
    pub retrograde_uncertain: bool,
    /// 1-12
    pub house: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HouseCusp {
    /// 1-12
    pub house: u8,
    pub lon: f64,
    pub sign: ZodiacSign,
    /// Traditional ruler of the cusp sign
    pub ruler: Body,
    /// Modern ruler; differs for Scorpio, Aquarius and Pisces
    pub modern_ruler: Body,
}

impl HouseCusp {
    pub fn new(house: u8, lon: f64) -> Self {
        let sign = ZodiacSign::from_longitude(lon);
        Self {
            house,
            lon,
            sign,
            ruler: sign_ruler(sign, false),
            modern_ruler: sign_ruler(sign, true),
        }
    }
}

/// Quality notes attached to a computed chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "flag", content = "body", rename_all = "snake_case")]
pub enum ChartFlag {
    /// No birth time was given; noon was assumed
    BirthTimeUnknown,
    RetrogradeDisagreement(Body),
}

/// Immutable natal chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chart {
    pub birth: BirthData,
    pub instant: Instant,
    pub house_system: HouseSystem,
    /// Canonical body order
    pub bodies: [BodyPosition; 10],
    /// Houses 1..=12
    pub cusps: [HouseCusp; 12],
    pub ascendant: f64,
    pub midheaven: f64,
    pub flags: Vec<ChartFlag>,
}

impl Chart {
    pub fn body(&self, body: Body) -> &BodyPosition {
        &self.bodies[body.index()]
    }

    pub fn cusp(&self, house: u8) -> Option<&HouseCusp> {
        self.cusps.get(usize::from(house).checked_sub(1)?)
    }

    pub fn cusp_longitudes(&self) -> [f64; 12] {
        self.cusps.map(|c| c.lon)
    }

    pub fn has_flag(&self, flag: ChartFlag) -> bool {
        self.flags.contains(&flag)
    }

    /// Traditional ruler of the sign on the 10th cusp.
    pub fn tenth_house_ruler(&self) -> Body {
        self.cusps[9].ruler
    }

    /// Bodies as aspect inputs tagged with `layer`. Speeds are kept.
    pub fn aspect_points(&self, layer: ChartLayer) -> Vec<AspectPoint> {
        self.bodies
            .iter()
            .map(|p| AspectPoint {
                layer,
                body: p.body,
                lon: p.lon,
                speed: p.speed,
            })
            .collect()
    }
}
