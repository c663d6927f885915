//! House systems and the chart angles.
//!
//! Every function here takes the local sidereal time (RAMC), the geographic
//! latitude and the obliquity, all in degrees.

mod quadrant;

use crate::angles::{arc_forward, in_arc, normalize};
use crate::error::EngineError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Method used to divide the ecliptic into twelve houses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HouseSystem {
    #[default]
    Placidus,
    Koch,
    Porphyry,
    Regiomontanus,
    Campanus,
    Equal,
    WholeSign,
}

impl HouseSystem {
    pub const ALL: [HouseSystem; 7] = [
        HouseSystem::Placidus,
        HouseSystem::Koch,
        HouseSystem::Porphyry,
        HouseSystem::Regiomontanus,
        HouseSystem::Campanus,
        HouseSystem::Equal,
        HouseSystem::WholeSign,
    ];

    pub fn name(self) -> &'static str {
        match self {
            HouseSystem::Placidus => "placidus",
            HouseSystem::Koch => "koch",
            HouseSystem::Porphyry => "porphyry",
            HouseSystem::Regiomontanus => "regiomontanus",
            HouseSystem::Campanus => "campanus",
            HouseSystem::Equal => "equal",
            HouseSystem::WholeSign => "whole_sign",
        }
    }

    /// Time-based systems that break down where some ecliptic degrees never
    /// rise or set.
    pub fn needs_semi_arcs(self) -> bool {
        matches!(self, HouseSystem::Placidus | HouseSystem::Koch)
    }
}

impl fmt::Display for HouseSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HouseSystem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase().replace(['-', ' '], "_");
        let key = if key == "wholesign" { "whole_sign".to_string() } else { key };
        HouseSystem::ALL
            .iter()
            .copied()
            .find(|h| h.name() == key)
            .ok_or_else(|| {
                let valid: Vec<&str> = HouseSystem::ALL.iter().map(|h| h.name()).collect();
                format!("unknown house system '{s}', expected one of {valid:?}")
            })
    }
}

/// Twelve cusp longitudes (index 0 is house 1) plus the two angles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HouseAngles {
    pub cusps: [f64; 12],
    pub ascendant: f64,
    pub midheaven: f64,
}

/// Ecliptic degree rising on the eastern horizon.
pub fn ascendant(ramc: f64, lat: f64, eps: f64) -> f64 {
    asc1(ramc + 90.0, lat, eps)
}

/// Ecliptic degree culminating on the upper meridian.
pub fn midheaven(ramc: f64, eps: f64) -> f64 {
    let (sin_t, cos_t) = ramc.to_radians().sin_cos();
    normalize(sin_t.atan2(cos_t * eps.to_radians().cos()).to_degrees())
}

/// Ecliptic longitude of the point with oblique ascension `oa` under pole
/// height `pole`. With `pole` = latitude and `oa` = RAMC + 90 this is the
/// Ascendant.
pub(crate) fn asc1(oa: f64, pole: f64, eps: f64) -> f64 {
    let (sin_x, cos_x) = oa.to_radians().sin_cos();
    let (sin_e, cos_e) = eps.to_radians().sin_cos();
    let y = sin_x;
    let x = cos_x * cos_e - pole.to_radians().tan() * sin_e;
    normalize(y.atan2(x).to_degrees())
}

/// Ecliptic longitude of the ecliptic point with right ascension `ra`.
pub(crate) fn ecliptic_from_ra(ra: f64, eps: f64) -> f64 {
    let (sin_a, cos_a) = ra.to_radians().sin_cos();
    normalize(sin_a.atan2(cos_a * eps.to_radians().cos()).to_degrees())
}

/// Solve the angles and cusps for one house system.
pub fn compute_houses(ramc: f64, lat: f64, eps: f64, system: HouseSystem) -> Result<HouseAngles, EngineError> {
    let undefined = || EngineError::HouseSystemUndefined { system, latitude: lat };

    if !(ramc.is_finite() && lat.is_finite() && eps.is_finite()) {
        return Err(EngineError::InvalidInput("non-finite house input".into()));
    }
    if lat.abs() >= 90.0 {
        return Err(undefined());
    }
    if system.needs_semi_arcs() && lat.abs() >= 90.0 - eps {
        return Err(undefined());
    }

    let asc = ascendant(ramc, lat, eps);
    let mc = midheaven(ramc, eps);

    let cusps = match system {
        HouseSystem::Placidus => quadrant::placidus(ramc, lat, eps, asc, mc).ok_or_else(undefined)?,
        HouseSystem::Koch => quadrant::koch(ramc, lat, eps, asc, mc).ok_or_else(undefined)?,
        HouseSystem::Porphyry => quadrant::porphyry(asc, mc),
        HouseSystem::Regiomontanus => quadrant::regiomontanus(ramc, lat, eps, asc, mc),
        HouseSystem::Campanus => quadrant::campanus(ramc, lat, eps, asc, mc),
        HouseSystem::Equal => equal_from(asc),
        HouseSystem::WholeSign => equal_from((asc / 30.0).floor() * 30.0),
    };

    if !strictly_increasing(&cusps) {
        return Err(undefined());
    }

    Ok(HouseAngles {
        cusps,
        ascendant: asc,
        midheaven: mc,
    })
}

fn equal_from(start: f64) -> [f64; 12] {
    let mut cusps = [0.0; 12];
    for (i, cusp) in cusps.iter_mut().enumerate() {
        *cusp = normalize(start + 30.0 * i as f64);
    }
    cusps
}

/// Each cusp lies forward of the previous one and the twelve arcs close the
/// circle exactly once.
fn strictly_increasing(cusps: &[f64; 12]) -> bool {
    let mut total = 0.0;
    for i in 0..12 {
        if !cusps[i].is_finite() {
            return false;
        }
        let arc = arc_forward(cusps[i], cusps[(i + 1) % 12]);
        if arc <= 0.0 {
            return false;
        }
        total += arc;
    }
    (total - 360.0).abs() < 1e-6
}

/// House number (1–12) whose cusp interval contains `lon`.
pub fn house_of(lon: f64, cusps: &[f64; 12]) -> u8 {
    (0..12)
        .find(|&i| in_arc(lon, cusps[i], cusps[(i + 1) % 12]))
        .map(|i| i as u8 + 1)
        .unwrap_or(1)
}
