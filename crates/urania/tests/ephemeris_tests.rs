use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use urania::angles::{separation, signed_delta};
use urania::ephemeris::{
    AnalyticEphemeris, CachedProvider, EphemerisError, FixedPositions, Position, PositionProvider, TimeoutProvider,
};
use urania::{Body, Engine, EngineError, EngineSettings, Instant};

#[test]
fn test_sun_at_equinox_and_solstice() {
    let ephemeris = AnalyticEphemeris::new();

    // 2024-03-20 03:06 UTC
    let equinox = ephemeris.position_at(Body::Sun, Instant::from_jd(2_460_389.629)).unwrap();
    assert!(signed_delta(0.0, equinox.lon).abs() < 0.1, "sun at {}", equinox.lon);

    // 2000-06-21 01:48 UTC
    let solstice = ephemeris.position_at(Body::Sun, Instant::from_jd(2_451_716.575)).unwrap();
    assert!((solstice.lon - 90.0).abs() < 0.1, "sun at {}", solstice.lon);
}

#[test]
fn test_inner_planets_stay_near_the_sun() {
    let ephemeris = AnalyticEphemeris::new();
    let mut jd = 2_440_000.5;
    while jd < 2_465_000.0 {
        let at = Instant::from_jd(jd);
        let sun = ephemeris.position_at(Body::Sun, at).unwrap().lon;
        let mercury = ephemeris.position_at(Body::Mercury, at).unwrap().lon;
        let venus = ephemeris.position_at(Body::Venus, at).unwrap().lon;
        assert!(separation(sun, mercury) < 29.0, "mercury elongation at JD {jd}");
        assert!(separation(sun, venus) < 48.5, "venus elongation at JD {jd}");
        jd += 97.0;
    }
}

#[test]
fn test_mars_retrograde_at_2020_opposition() {
    let ephemeris = AnalyticEphemeris::new();
    // 2020-10-13, Mars opposite the Sun
    let at = Instant::from_jd(2_459_135.5);
    let mars = ephemeris.position_at(Body::Mars, at).unwrap();
    let sun = ephemeris.position_at(Body::Sun, at).unwrap();
    assert!(mars.speed_lon < 0.0, "mars speed {}", mars.speed_lon);
    assert!(separation(mars.lon, sun.lon) > 170.0);
}

#[test]
fn test_mercury_turns_retrograde_within_a_year() {
    let ephemeris = AnalyticEphemeris::new();
    let retrograde_days = (0..365)
        .map(|d| Instant::from_jd(2_458_849.5 + f64::from(d)))
        .filter(|&at| ephemeris.position_at(Body::Mercury, at).unwrap().speed_lon < 0.0)
        .count();
    // three stations of roughly three weeks each
    assert!((40..=90).contains(&retrograde_days), "{retrograde_days} retrograde days");
}

#[test]
fn test_analytic_range_is_enforced() {
    let ephemeris = AnalyticEphemeris::new();
    let (start, end) = ephemeris.supported_range();
    assert!(ephemeris.position_at(Body::Pluto, Instant::from_jd(start)).is_ok());
    assert!(matches!(
        ephemeris.position_at(Body::Pluto, Instant::from_jd(end + 1.0)),
        Err(EphemerisError::OutOfRange { .. })
    ));
    assert!(matches!(
        ephemeris.position_at(Body::Moon, Instant::from_jd(f64::NAN)),
        Err(EphemerisError::OutOfRange { .. })
    ));
}

struct Counting {
    calls: AtomicUsize,
}

impl PositionProvider for Counting {
    fn position_at(&self, body: Body, _instant: Instant) -> Result<Position, EphemerisError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Position {
            lon: body.index() as f64 * 10.0,
            lat: 0.0,
            speed_lon: 1.0,
        })
    }

    fn supported_range(&self) -> (f64, f64) {
        (f64::MIN, f64::MAX)
    }

    fn name(&self) -> &str {
        "counting"
    }
}

#[test]
fn test_cache_answers_repeated_lookups() {
    let cached = CachedProvider::new(Counting {
        calls: AtomicUsize::new(0),
    });
    let at = Instant::from_jd(2_451_545.0);

    for _ in 0..5 {
        for body in Body::ALL {
            cached.position_at(body, at).unwrap();
        }
    }
    assert_eq!(cached.inner().calls.load(Ordering::SeqCst), 10);
    assert_eq!(cached.len(), 10);

    cached.position_at(Body::Sun, at.add_days(1.0)).unwrap();
    assert_eq!(cached.inner().calls.load(Ordering::SeqCst), 11);
}

#[test]
fn test_cache_is_transparent() {
    let plain = AnalyticEphemeris::new();
    let cached = CachedProvider::new(AnalyticEphemeris::new());
    let at = Instant::from_jd(2_455_000.25);
    for body in Body::ALL {
        let a = plain.position_at(body, at).unwrap();
        let b = cached.position_at(body, at).unwrap();
        let c = cached.position_at(body, at).unwrap();
        assert_eq!(a, b);
        assert_eq!(b, c);
    }
    assert_eq!(cached.name(), plain.name());
}

#[test]
fn test_timeout_provider_shared_across_threads() {
    let provider = TimeoutProvider::new(AnalyticEphemeris::new(), Duration::from_secs(10)).unwrap();
    let at = Instant::from_jd(2_451_545.0);
    let expected = AnalyticEphemeris::new().position_at(Body::Jupiter, at).unwrap();

    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                let got = provider.position_at(Body::Jupiter, at).unwrap();
                assert_eq!(got, expected);
            });
        }
    });
}

#[test]
fn test_engine_position_at() {
    let engine = Engine::analytic(EngineSettings::default()).unwrap();
    let venus = engine.position_at(Body::Venus, Instant::from_jd(2_451_545.0)).unwrap();
    assert!((0.0..360.0).contains(&venus.lon));

    let fixed = FixedPositions::new(Instant::from_jd(2_451_545.0)).failing("maintenance");
    let engine = Engine::new(fixed, EngineSettings::default()).unwrap();
    let err = engine.position_at(Body::Venus, Instant::from_jd(2_451_545.0)).unwrap_err();
    assert_eq!(err, EngineError::ProviderUnavailable("maintenance".into()));
}
