//! Closed-form ephemeris: Keplerian planets and a truncated lunar series.
//!
//! Planet elements: E. M. Standish, "Keplerian Elements for Approximate
//! Positions of the Major Planets" (JPL), table 1, valid 1800–2050 AD.
//! Moon: Meeus, Astronomical Algorithms, chapter 47, terms above 0.002°.
//! Accuracy is at the arc-minute level for the planets and a few hundredths
//! of a degree for the Moon, which is enough for sign, house and orb work.

use crate::angles::{normalize, signed_delta};
use crate::ephemeris::provider::{check_range, EphemerisError, PositionProvider};
use crate::ephemeris::types::{Body, Position};
use crate::time::Instant;

/// 1800-01-01 00:00
pub const ANALYTIC_RANGE_START_JD: f64 = 2_378_496.5;
/// 2051-01-01 00:00, the end of 2050
pub const ANALYTIC_RANGE_END_JD: f64 = 2_470_172.5;

/// Half-width of the central difference used for speeds (one hour)
const SPEED_STEP_DAYS: f64 = 1.0 / 24.0;

/// Orbital elements at J2000 and their rates per Julian century.
struct Elements {
    /// semi-major axis (au)
    a: [f64; 2],
    /// eccentricity
    e: [f64; 2],
    /// inclination (deg)
    i: [f64; 2],
    /// mean longitude (deg)
    l: [f64; 2],
    /// longitude of perihelion (deg)
    peri: [f64; 2],
    /// longitude of ascending node (deg)
    node: [f64; 2],
}

const MERCURY: Elements = Elements {
    a: [0.387_099_27, 0.000_000_37],
    e: [0.205_635_93, 0.000_019_06],
    i: [7.004_979_02, -0.005_947_49],
    l: [252.250_323_50, 149_472.674_111_75],
    peri: [77.457_796_28, 0.160_476_89],
    node: [48.330_765_93, -0.125_340_81],
};

const VENUS: Elements = Elements {
    a: [0.723_335_66, 0.000_003_90],
    e: [0.006_776_72, -0.000_041_07],
    i: [3.394_676_05, -0.000_788_90],
    l: [181.979_099_50, 58_517.815_387_29],
    peri: [131.602_467_18, 0.002_683_29],
    node: [76.679_842_55, -0.277_694_18],
};

const EARTH_MOON_BARYCENTER: Elements = Elements {
    a: [1.000_002_61, 0.000_005_62],
    e: [0.016_711_23, -0.000_043_92],
    i: [-0.000_015_31, -0.012_946_68],
    l: [100.464_571_66, 35_999.372_449_81],
    peri: [102.937_681_93, 0.323_273_64],
    node: [0.0, 0.0],
};

const MARS: Elements = Elements {
    a: [1.523_710_34, 0.000_018_47],
    e: [0.093_394_10, 0.000_078_82],
    i: [1.849_691_42, -0.008_131_31],
    l: [-4.553_432_05, 19_140.302_684_99],
    peri: [-23.943_629_59, 0.444_410_88],
    node: [49.559_538_91, -0.292_573_43],
};

const JUPITER: Elements = Elements {
    a: [5.202_887_00, -0.000_116_07],
    e: [0.048_386_24, -0.000_132_53],
    i: [1.304_396_95, -0.001_837_14],
    l: [34.396_440_51, 3_034.746_127_75],
    peri: [14.728_479_83, 0.212_526_68],
    node: [100.473_909_09, 0.204_691_06],
};

const SATURN: Elements = Elements {
    a: [9.536_675_94, -0.001_250_60],
    e: [0.053_861_79, -0.000_509_91],
    i: [2.485_991_87, 0.001_936_09],
    l: [49.954_244_23, 1_222.493_622_01],
    peri: [92.598_878_31, -0.418_972_16],
    node: [113.662_424_48, -0.288_677_94],
};

const URANUS: Elements = Elements {
    a: [19.189_164_64, -0.001_961_76],
    e: [0.047_257_44, -0.000_043_97],
    i: [0.772_637_83, -0.002_429_39],
    l: [313.238_104_51, 428.482_027_85],
    peri: [170.954_276_30, 0.408_052_81],
    node: [74.016_925_03, 0.042_405_89],
};

const NEPTUNE: Elements = Elements {
    a: [30.069_922_76, 0.000_262_91],
    e: [0.008_590_48, 0.000_051_05],
    i: [1.770_043_47, 0.000_353_72],
    l: [-55.120_029_69, 218.459_453_25],
    peri: [44.964_762_27, -0.322_414_64],
    node: [131.784_225_74, -0.005_086_64],
};

const PLUTO: Elements = Elements {
    a: [39.482_116_75, -0.000_315_96],
    e: [0.248_827_30, 0.000_051_70],
    i: [17.140_012_06, 0.000_048_18],
    l: [238.929_038_33, 145.207_805_15],
    peri: [224.068_916_29, -0.040_629_42],
    node: [110.303_936_84, -0.011_834_82],
};

/// Lunar longitude terms: multipliers of D, M, M', F and the sine coefficient
/// in 1e-6 degrees.
const MOON_LONGITUDE_TERMS: &[(i8, i8, i8, i8, f64)] = &[
    (0, 0, 1, 0, 6_288_774.0),
    (2, 0, -1, 0, 1_274_027.0),
    (2, 0, 0, 0, 658_314.0),
    (0, 0, 2, 0, 213_618.0),
    (0, 1, 0, 0, -185_116.0),
    (0, 0, 0, 2, -114_332.0),
    (2, 0, -2, 0, 58_793.0),
    (2, -1, -1, 0, 57_066.0),
    (2, 0, 1, 0, 53_322.0),
    (2, -1, 0, 0, 45_758.0),
    (0, 1, -1, 0, -40_923.0),
    (1, 0, 0, 0, -34_720.0),
    (0, 1, 1, 0, -30_383.0),
    (2, 0, 0, -2, 15_327.0),
    (0, 0, 1, 2, -12_528.0),
    (0, 0, 1, -2, 10_980.0),
    (4, 0, -1, 0, 10_675.0),
    (0, 0, 3, 0, 10_034.0),
    (4, 0, -2, 0, 8_548.0),
    (2, 1, -1, 0, -7_888.0),
    (2, 1, 0, 0, -6_766.0),
    (1, 0, -1, 0, -5_163.0),
    (1, 1, 0, 0, 4_987.0),
    (2, -1, 1, 0, 4_036.0),
    (2, 0, 2, 0, 3_994.0),
    (4, 0, 0, 0, 3_861.0),
    (2, 0, -3, 0, 3_665.0),
    (0, 1, -2, 0, -2_689.0),
    (2, 0, -1, 2, -2_602.0),
    (2, -1, -2, 0, 2_390.0),
    (1, 0, 1, 0, -2_348.0),
    (2, -2, 0, 0, 2_236.0),
    (0, 1, 2, 0, -2_120.0),
    (0, 2, 0, 0, -2_069.0),
];

/// Lunar latitude terms, same layout as the longitude table.
const MOON_LATITUDE_TERMS: &[(i8, i8, i8, i8, f64)] = &[
    (0, 0, 0, 1, 5_128_122.0),
    (0, 0, 1, 1, 280_602.0),
    (0, 0, 1, -1, 277_693.0),
    (2, 0, 0, -1, 173_237.0),
    (2, 0, -1, 1, 55_413.0),
    (2, 0, -1, -1, 46_271.0),
    (2, 0, 0, 1, 32_573.0),
    (0, 0, 2, 1, 17_198.0),
    (2, 0, 1, -1, 9_266.0),
    (0, 0, 2, -1, 8_822.0),
    (2, -1, 0, -1, 8_216.0),
    (2, 0, -2, -1, 4_324.0),
    (2, 0, 1, 1, 4_200.0),
    (2, 1, 0, -1, -3_359.0),
    (2, -1, -1, 1, 2_463.0),
    (2, -1, 0, 1, 2_211.0),
    (2, -1, -1, -1, 2_065.0),
    (0, 1, -1, -1, -1_870.0),
    (4, 0, -1, -1, 1_828.0),
    (0, 1, 0, 1, -1_794.0),
];

/// Built-in provider backed by closed-form series. Stateless and `Sync`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnalyticEphemeris;

impl AnalyticEphemeris {
    pub fn new() -> Self {
        Self
    }

    /// Longitude and latitude without range checking.
    fn ecliptic(&self, body: Body, jd: f64) -> (f64, f64) {
        let t = (jd - crate::time::J2000_JD) / 36_525.0;
        match body {
            Body::Moon => moon_ecliptic(t),
            Body::Sun => {
                let earth = heliocentric(&EARTH_MOON_BARYCENTER, t);
                to_ecliptic_of_date([-earth[0], -earth[1], -earth[2]], t)
            }
            planet => {
                let earth = heliocentric(&EARTH_MOON_BARYCENTER, t);
                let p = heliocentric(planet_elements(planet), t);
                to_ecliptic_of_date([p[0] - earth[0], p[1] - earth[1], p[2] - earth[2]], t)
            }
        }
    }
}

impl PositionProvider for AnalyticEphemeris {
    fn position_at(&self, body: Body, instant: Instant) -> Result<Position, EphemerisError> {
        check_range(instant, self.supported_range())?;

        let (lon, lat) = self.ecliptic(body, instant.jd);
        let (before, _) = self.ecliptic(body, instant.jd - SPEED_STEP_DAYS);
        let (after, _) = self.ecliptic(body, instant.jd + SPEED_STEP_DAYS);
        let speed_lon = signed_delta(before, after) / (2.0 * SPEED_STEP_DAYS);

        Ok(Position { lon, lat, speed_lon })
    }

    fn supported_range(&self) -> (f64, f64) {
        (ANALYTIC_RANGE_START_JD, ANALYTIC_RANGE_END_JD)
    }

    fn name(&self) -> &str {
        "analytic"
    }
}

fn planet_elements(body: Body) -> &'static Elements {
    match body {
        Body::Mercury => &MERCURY,
        Body::Venus => &VENUS,
        Body::Mars => &MARS,
        Body::Jupiter => &JUPITER,
        Body::Saturn => &SATURN,
        Body::Uranus => &URANUS,
        Body::Neptune => &NEPTUNE,
        Body::Pluto => &PLUTO,
        // the luminaries are handled by the caller
        Body::Sun | Body::Moon => &EARTH_MOON_BARYCENTER,
    }
}

/// Heliocentric ecliptic J2000 rectangular coordinates (au).
fn heliocentric(el: &Elements, t: f64) -> [f64; 3] {
    let a = el.a[0] + el.a[1] * t;
    let e = el.e[0] + el.e[1] * t;
    let i = (el.i[0] + el.i[1] * t).to_radians();
    let l = el.l[0] + el.l[1] * t;
    let peri = el.peri[0] + el.peri[1] * t;
    let node = el.node[0] + el.node[1] * t;

    let w = (peri - node).to_radians();
    let m = signed_delta(0.0, l - peri).to_radians();
    let ea = solve_kepler(m, e);

    let xp = a * (ea.cos() - e);
    let yp = a * (1.0 - e * e).sqrt() * ea.sin();

    let (sw, cw) = w.sin_cos();
    let (sn, cn) = node.to_radians().sin_cos();
    let (si, ci) = i.sin_cos();

    [
        (cw * cn - sw * sn * ci) * xp + (-sw * cn - cw * sn * ci) * yp,
        (cw * sn + sw * cn * ci) * xp + (-sw * sn + cw * cn * ci) * yp,
        (sw * si) * xp + (cw * si) * yp,
    ]
}

/// Newton iteration for Kepler's equation `E − e sin E = M` (radians).
fn solve_kepler(m: f64, e: f64) -> f64 {
    let mut ea = m + e * m.sin();
    for _ in 0..50 {
        let step = (ea - e * ea.sin() - m) / (1.0 - e * ea.cos());
        ea -= step;
        if step.abs() < 1e-13 {
            break;
        }
    }
    ea
}

/// Geocentric vector → (longitude, latitude) referred to the mean equinox of date.
fn to_ecliptic_of_date(v: [f64; 3], t: f64) -> (f64, f64) {
    let lon_j2000 = v[1].atan2(v[0]).to_degrees();
    let lat = v[2].atan2(v[0].hypot(v[1])).to_degrees();
    // general precession in longitude
    let precession = 1.396_971_278 * t + 0.000_308_6 * t * t;
    (normalize(lon_j2000 + precession), lat)
}

fn moon_ecliptic(t: f64) -> (f64, f64) {
    let t2 = t * t;
    let lp = 218.316_447_7 + 481_267.881_234_21 * t - 0.001_578_6 * t2;
    let d = 297.850_192_1 + 445_267.111_403_4 * t - 0.001_881_9 * t2;
    let m = 357.529_109_2 + 35_999.050_290_9 * t - 0.000_153_6 * t2;
    let mp = 134.963_396_4 + 477_198.867_505_5 * t + 0.008_741_4 * t2;
    let f = 93.272_095_0 + 483_202.017_523_3 * t - 0.003_653_9 * t2;
    let ecc = 1.0 - 0.002_516 * t - 0.000_007_4 * t2;

    let a1 = 119.75 + 131.849 * t;
    let a2 = 53.09 + 479_264.290 * t;
    let a3 = 313.45 + 481_266.484 * t;

    let series = |terms: &[(i8, i8, i8, i8, f64)]| -> f64 {
        terms
            .iter()
            .map(|&(cd, cm, cmp, cf, coeff)| {
                let arg = f64::from(cd) * d + f64::from(cm) * m + f64::from(cmp) * mp + f64::from(cf) * f;
                let damping = ecc.powi(i32::from(cm.abs()));
                coeff * damping * arg.to_radians().sin()
            })
            .sum()
    };

    let sin = |deg: f64| deg.to_radians().sin();

    let sigma_l = series(MOON_LONGITUDE_TERMS) + 3_958.0 * sin(a1) + 1_962.0 * sin(lp - f) + 318.0 * sin(a2);
    let sigma_b = series(MOON_LATITUDE_TERMS) - 2_235.0 * sin(lp)
        + 382.0 * sin(a3)
        + 175.0 * sin(a1 - f)
        + 175.0 * sin(a1 + f)
        + 127.0 * sin(lp - mp)
        - 115.0 * sin(lp + mp);

    (normalize(lp + sigma_l / 1e6), sigma_b / 1e6)
}
