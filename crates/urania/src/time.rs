//! Astronomical time: Julian Day instants, obliquity and sidereal time.
//!
//! Instants are Julian Days on the UT scale. The analytic ephemeris treats
//! them as dynamical time as well; the difference (ΔT, about a minute over the
//! supported range) is below its accuracy.

use crate::angles::normalize;
use crate::error::EngineError;
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Julian Day of the J2000.0 epoch (2000-01-01 12:00 TT).
pub const J2000_JD: f64 = 2_451_545.0;

/// Julian Day of the Unix epoch (1970-01-01 00:00 UTC).
const UNIX_EPOCH_JD: f64 = 2_440_587.5;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// A point in time as a continuous Julian Day count (UT).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Instant {
    pub jd: f64,
}

impl Instant {
    pub fn from_jd(jd: f64) -> Self {
        Self { jd }
    }

    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        let seconds = dt.timestamp() as f64 + f64::from(dt.timestamp_subsec_nanos()) * 1e-9;
        Self {
            jd: UNIX_EPOCH_JD + seconds / SECONDS_PER_DAY,
        }
    }

    /// Resolve a civil date and wall-clock time in a zone.
    pub fn from_civil(date: NaiveDate, time: NaiveTime, zone: Zone) -> Result<Self, EngineError> {
        zone.to_utc(NaiveDateTime::new(date, time)).map(Self::from_utc)
    }

    /// Convert back to UTC, rounded to the nearest millisecond.
    pub fn to_utc(&self) -> Option<DateTime<Utc>> {
        let millis = ((self.jd - UNIX_EPOCH_JD) * SECONDS_PER_DAY * 1000.0).round();
        if !millis.is_finite() {
            return None;
        }
        Utc.timestamp_millis_opt(millis as i64).single()
    }

    pub fn add_days(&self, days: f64) -> Self {
        Self { jd: self.jd + days }
    }

    /// Julian centuries since J2000.0.
    pub fn centuries_since_j2000(&self) -> f64 {
        (self.jd - J2000_JD) / 36_525.0
    }
}

impl fmt::Display for Instant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_utc() {
            Some(dt) => write!(f, "{} (JD {:.5})", dt.to_rfc3339(), self.jd),
            None => write!(f, "JD {:.5}", self.jd),
        }
    }
}

/// Mean obliquity of the ecliptic of date, in degrees.
///
/// Source: Meeus, Astronomical Algorithms, eq. 22.2.
pub fn mean_obliquity_deg(instant: Instant) -> f64 {
    let t = instant.centuries_since_j2000();
    23.439_291_111 - 0.013_004_166_7 * t - 1.638_9e-7 * t * t + 5.036_1e-7 * t * t * t
}

/// Greenwich mean sidereal time in degrees, [0, 360).
///
/// Source: Meeus, Astronomical Algorithms, eq. 12.4.
pub fn greenwich_sidereal_deg(instant: Instant) -> f64 {
    let d = instant.jd - J2000_JD;
    let t = instant.centuries_since_j2000();
    normalize(280.460_618_37 + 360.985_647_366_29 * d + 0.000_387_933 * t * t - t * t * t / 38_710_000.0)
}

/// Local mean sidereal time (RAMC) in degrees for an east-positive longitude.
pub fn local_sidereal_deg(instant: Instant, east_longitude_deg: f64) -> f64 {
    normalize(greenwich_sidereal_deg(instant) + east_longitude_deg)
}

/// A parsed zone label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    Fixed(FixedOffset),
    /// IANA region such as `America/New_York`, with its historical DST rules
    Region(Tz),
}

impl Zone {
    /// Convert a local wall-clock time to UTC.
    ///
    /// A time repeated when clocks fall back resolves to its earlier
    /// occurrence. A time skipped when clocks spring forward is rejected.
    pub fn to_utc(self, local: NaiveDateTime) -> Result<DateTime<Utc>, EngineError> {
        match self {
            Zone::Fixed(offset) => offset
                .from_local_datetime(&local)
                .single()
                .map(|dt| dt.with_timezone(&Utc))
                .ok_or_else(|| EngineError::InvalidInput(format!("cannot resolve {local} at {offset}"))),
            Zone::Region(tz) => {
                let resolved = tz.from_local_datetime(&local);
                if resolved.single().is_none() {
                    debug!("{local} is ambiguous or skipped in {tz}");
                }
                resolved
                    .earliest()
                    .map(|dt| dt.with_timezone(&Utc))
                    .ok_or_else(|| EngineError::InvalidInput(format!("{local} does not exist in {tz}")))
            }
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Zone::Fixed(offset) => write!(f, "{offset}"),
            Zone::Region(tz) => f.write_str(tz.name()),
        }
    }
}

/// Parse a zone label.
///
/// Accepts `UTC`, `GMT`, `Z`, offsets such as `UTC-4`, `UTC+5:30`,
/// `GMT+0100`, `+05:30` or `-0400`, and IANA region names.
pub fn parse_zone_label(label: &str) -> Result<Zone, EngineError> {
    let trimmed = label.trim();
    if let Some(offset) = parse_fixed_offset(trimmed) {
        return Ok(Zone::Fixed(offset));
    }
    trimmed
        .parse::<Tz>()
        .map(Zone::Region)
        .map_err(|_| EngineError::InvalidInput(format!("unsupported zone label '{label}'")))
}

fn parse_fixed_offset(label: &str) -> Option<FixedOffset> {
    let upper = label.to_ascii_uppercase();
    let rest = upper
        .strip_prefix("UTC")
        .or_else(|| upper.strip_prefix("GMT"))
        .unwrap_or(&upper);

    if rest.is_empty() || rest == "Z" {
        return FixedOffset::east_opt(0);
    }

    let (sign, digits) = match rest.as_bytes()[0] {
        b'+' => (1, &rest[1..]),
        b'-' => (-1, &rest[1..]),
        _ => return None,
    };
    if !digits.is_ascii() {
        return None;
    }

    let (hours, minutes) = if let Some((h, m)) = digits.split_once(':') {
        (h, m)
    } else if digits.len() == 4 {
        digits.split_at(2)
    } else {
        (digits, "0")
    };
    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if !(0..=14).contains(&hours) || !(0..60).contains(&minutes) {
        return None;
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

/// Local noon, the assumed time when a birth time is unknown.
pub fn local_noon() -> NaiveTime {
    NaiveTime::MIN + Duration::hours(12)
}
