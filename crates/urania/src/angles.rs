//! Wrapped angle arithmetic on the ecliptic circle.
//!
//! Every 0°/360° wraparound in the crate goes through these helpers so that
//! retrograde sampling, aspect matching and house containment agree at the
//! boundary.

/// Normalize an angle in degrees to [0, 360).
pub fn normalize(deg: f64) -> f64 {
    let r = deg.rem_euclid(360.0);
    // rem_euclid can return exactly 360.0 for tiny negative inputs
    if r >= 360.0 {
        0.0
    } else {
        r
    }
}

/// Signed shortest rotation from `from` to `to`, in (-180, 180].
pub fn signed_delta(from: f64, to: f64) -> f64 {
    let d = normalize(to - from);
    if d > 180.0 {
        d - 360.0
    } else {
        d
    }
}

/// Minimal angular separation `min(|Δ|, 360 − |Δ|)`, always in [0, 180].
/// Exactly symmetric in its arguments.
pub fn separation(a: f64, b: f64) -> f64 {
    if a <= b {
        signed_delta(a, b).abs()
    } else {
        signed_delta(b, a).abs()
    }
}

/// Forward (counter-clockwise) arc from `a` to `b`, in [0, 360).
pub fn arc_forward(a: f64, b: f64) -> f64 {
    normalize(b - a)
}

/// True when `lon` lies in the half-open circular interval `[start, end)`.
pub fn in_arc(lon: f64, start: f64, end: f64) -> bool {
    let width = arc_forward(start, end);
    width > 0.0 && arc_forward(start, lon) < width
}

/// Rate of change of the separation between two moving points, in degrees/day.
///
/// `from`/`to` are longitudes and `from_speed`/`to_speed` their speeds. At the
/// two degenerate points (0° and 180°) the separation can only grow or shrink
/// respectively, whatever the direction of relative motion.
pub fn separation_rate(from: f64, to: f64, from_speed: f64, to_speed: f64) -> f64 {
    let delta = signed_delta(from, to);
    let relative = to_speed - from_speed;
    if delta == 0.0 {
        relative.abs()
    } else if delta == 180.0 {
        -relative.abs()
    } else {
        delta.signum() * relative
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_wraps_both_directions() {
        assert_eq!(normalize(370.0), 10.0);
        assert_eq!(normalize(-10.0), 350.0);
        assert_eq!(normalize(360.0), 0.0);
        assert!(normalize(-1e-15) < 360.0);
    }

    #[test]
    fn signed_delta_crosses_zero_aries() {
        assert!((signed_delta(359.0, 1.0) - 2.0).abs() < 1e-12);
        assert!((signed_delta(1.0, 359.0) + 2.0).abs() < 1e-12);
        assert_eq!(signed_delta(0.0, 180.0), 180.0);
        assert_eq!(signed_delta(180.0, 0.0), 180.0);
    }

    #[test]
    fn separation_is_bounded() {
        for i in 0..72 {
            for j in 0..72 {
                let s = separation(i as f64 * 5.0, j as f64 * 5.0 + 0.3);
                assert!((0.0..=180.0).contains(&s), "separation {s}");
            }
        }
    }

    #[test]
    fn in_arc_handles_wrap() {
        assert!(in_arc(355.0, 350.0, 20.0));
        assert!(in_arc(5.0, 350.0, 20.0));
        assert!(!in_arc(20.0, 350.0, 20.0));
        assert!(!in_arc(100.0, 350.0, 20.0));
    }

    #[test]
    fn separation_rate_sign() {
        // `to` ahead and pulling away
        assert!(separation_rate(10.0, 20.0, 0.0, 1.0) > 0.0);
        // `to` ahead and falling back
        assert!(separation_rate(10.0, 20.0, 0.0, -1.0) < 0.0);
        // exact conjunction always separates
        assert!(separation_rate(10.0, 10.0, 1.0, 0.0) > 0.0);
    }
}
