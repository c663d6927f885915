//! Quadrant house systems. Houses 1, 4, 7 and 10 start at the angles; the
//! intermediate cusps 11, 12, 2 and 3 are solved here and 5, 6, 8, 9 are
//! their opposites.

use super::{asc1, ecliptic_from_ra};
use crate::angles::{arc_forward, normalize, signed_delta};

const PLACIDUS_MAX_ITERATIONS: usize = 200;
const PLACIDUS_TOLERANCE_DEG: f64 = 1e-9;

/// Assemble twelve cusps from the angles and the four intermediate cusps.
fn assemble(asc: f64, mc: f64, c11: f64, c12: f64, c2: f64, c3: f64) -> [f64; 12] {
    [
        asc,
        c2,
        c3,
        normalize(mc + 180.0),
        normalize(c11 + 180.0),
        normalize(c12 + 180.0),
        normalize(asc + 180.0),
        normalize(c2 + 180.0),
        normalize(c3 + 180.0),
        mc,
        c11,
        c12,
    ]
}

/// Semi-arc trisection in time. Returns `None` if a cusp point never rises or
/// the iteration does not settle.
pub(super) fn placidus(ramc: f64, lat: f64, eps: f64, asc: f64, mc: f64) -> Option<[f64; 12]> {
    let c11 = placidus_cusp(ramc, lat, eps, 1.0 / 3.0, true)?;
    let c12 = placidus_cusp(ramc, lat, eps, 2.0 / 3.0, true)?;
    let c2 = placidus_cusp(ramc, lat, eps, 2.0 / 3.0, false)?;
    let c3 = placidus_cusp(ramc, lat, eps, 1.0 / 3.0, false)?;
    Some(assemble(asc, mc, c11, c12, c2, c3))
}

/// One intermediate cusp. Above the horizon the cusp sits `fraction` of its
/// diurnal semi-arc east of the meridian; below it sits `fraction` of its
/// nocturnal semi-arc east of the lower meridian.
fn placidus_cusp(ramc: f64, lat: f64, eps: f64, fraction: f64, above: bool) -> Option<f64> {
    let tan_lat = lat.to_radians().tan();
    let tan_eps = eps.to_radians().tan();

    let target = |dsa: f64| {
        if above {
            ramc + fraction * dsa
        } else {
            ramc + 180.0 - fraction * (180.0 - dsa)
        }
    };

    let mut ra = target(90.0);
    for _ in 0..PLACIDUS_MAX_ITERATIONS {
        let tan_dec = tan_eps * ra.to_radians().sin();
        let cos_h = -tan_lat * tan_dec;
        if !(-1.0..=1.0).contains(&cos_h) {
            return None;
        }
        let dsa = cos_h.acos().to_degrees();
        let next = target(dsa);
        if signed_delta(ra, next).abs() < PLACIDUS_TOLERANCE_DEG {
            return Some(ecliptic_from_ra(next, eps));
        }
        ra = next;
    }
    None
}

/// Birthplace system: trisects the time the MC degree takes to rise to the
/// meridian, using its ascensional difference.
pub(super) fn koch(ramc: f64, lat: f64, eps: f64, asc: f64, mc: f64) -> Option<[f64; 12]> {
    let sin_dec_mc = eps.to_radians().sin() * mc.to_radians().sin();
    let tan_dec_mc = sin_dec_mc / (1.0 - sin_dec_mc * sin_dec_mc).sqrt();
    let sin_ad = lat.to_radians().tan() * tan_dec_mc;
    if !(-1.0..=1.0).contains(&sin_ad) {
        return None;
    }
    let ad3 = sin_ad.asin().to_degrees() / 3.0;

    let c11 = asc1(ramc + 30.0 - 2.0 * ad3, lat, eps);
    let c12 = asc1(ramc + 60.0 - ad3, lat, eps);
    let c2 = asc1(ramc + 120.0 + ad3, lat, eps);
    let c3 = asc1(ramc + 150.0 + 2.0 * ad3, lat, eps);
    Some(assemble(asc, mc, c11, c12, c2, c3))
}

/// Trisects each ecliptic quadrant between the angles.
pub(super) fn porphyry(asc: f64, mc: f64) -> [f64; 12] {
    let upper = arc_forward(mc, asc);
    let lower = arc_forward(asc, normalize(mc + 180.0));
    assemble(
        asc,
        mc,
        normalize(mc + upper / 3.0),
        normalize(mc + 2.0 * upper / 3.0),
        normalize(asc + lower / 3.0),
        normalize(asc + 2.0 * lower / 3.0),
    )
}

/// Equal 30° divisions of the celestial equator, projected through great
/// circles meeting at the north and south points of the horizon.
pub(super) fn regiomontanus(ramc: f64, lat: f64, eps: f64, asc: f64, mc: f64) -> [f64; 12] {
    let tan_lat = lat.to_radians().tan();
    let pole1 = (tan_lat * 0.5).atan().to_degrees();
    let pole2 = (tan_lat * 30f64.to_radians().cos()).atan().to_degrees();

    assemble(
        asc,
        mc,
        asc1(ramc + 30.0, pole1, eps),
        asc1(ramc + 60.0, pole2, eps),
        asc1(ramc + 120.0, pole2, eps),
        asc1(ramc + 150.0, pole1, eps),
    )
}

/// Equal 30° divisions of the prime vertical.
pub(super) fn campanus(ramc: f64, lat: f64, eps: f64, asc: f64, mc: f64) -> [f64; 12] {
    let (sin_lat, cos_lat) = lat.to_radians().sin_cos();
    let sqrt3 = 3f64.sqrt();
    let pole1 = (sin_lat / 2.0).asin().to_degrees();
    let pole2 = (sqrt3 / 2.0 * sin_lat).asin().to_degrees();
    let offset1 = (sqrt3 / cos_lat).atan().to_degrees();
    let offset2 = (1.0 / sqrt3 / cos_lat).atan().to_degrees();

    assemble(
        asc,
        mc,
        asc1(ramc + 90.0 - offset1, pole1, eps),
        asc1(ramc + 90.0 - offset2, pole2, eps),
        asc1(ramc + 90.0 + offset2, pole2, eps),
        asc1(ramc + 90.0 + offset1, pole1, eps),
    )
}
