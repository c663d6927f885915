use std::collections::BTreeSet;
use urania::aspects::{AspectCalculator, AspectPoint, PhaseMode};
use urania::{AspectKind, AspectPhase, AspectSettings, Body, ChartLayer, Strength};

fn points(layer: ChartLayer, lons: [f64; 10], speed: f64) -> Vec<AspectPoint> {
    Body::ALL
        .iter()
        .zip(lons)
        .map(|(&body, lon)| AspectPoint { layer, body, lon, speed })
        .collect()
}

fn spread(start: f64, step: f64) -> [f64; 10] {
    let mut lons = [0.0; 10];
    for (i, lon) in lons.iter_mut().enumerate() {
        *lon = (start + step * i as f64).rem_euclid(360.0);
    }
    lons
}

#[test]
fn test_conjunction_within_orb() {
    let calculator = AspectCalculator::new();
    let a = AspectPoint { layer: ChartLayer::Natal, body: Body::Sun, lon: 100.0, speed: 1.0 };
    let b = AspectPoint { layer: ChartLayer::Natal, body: Body::Moon, lon: 102.0, speed: 13.0 };

    let aspect = calculator
        .calculate_aspect(&a, &b, &AspectSettings::default(), PhaseMode::Motion)
        .unwrap();

    assert_eq!(aspect.kind, AspectKind::Conjunction);
    assert!((aspect.orb - 2.0).abs() < 1e-9);
    assert_eq!(aspect.strength, Strength::Strong);
    // the Moon pulls away from the Sun
    assert_eq!(aspect.phase, AspectPhase::Separating);
}

#[test]
fn test_opposition_near_180() {
    let calculator = AspectCalculator::new();
    let a = AspectPoint { layer: ChartLayer::Natal, body: Body::Sun, lon: 100.0, speed: 1.0 };
    let b = AspectPoint { layer: ChartLayer::Natal, body: Body::Saturn, lon: 278.0, speed: 0.03 };

    let aspect = calculator
        .calculate_aspect(&a, &b, &AspectSettings::default(), PhaseMode::Motion)
        .unwrap();

    assert_eq!(aspect.kind, AspectKind::Opposition);
    assert!((aspect.separation - 178.0).abs() < 1e-9);
    assert!((aspect.orb + 2.0).abs() < 1e-9);
    // the Sun has already passed the point opposite Saturn
    assert_eq!(aspect.phase, AspectPhase::Separating);
}

#[test]
fn test_no_aspect_outside_orbs() {
    let calculator = AspectCalculator::new();
    let a = AspectPoint { layer: ChartLayer::Natal, body: Body::Sun, lon: 0.0, speed: 1.0 };
    let b = AspectPoint { layer: ChartLayer::Natal, body: Body::Mars, lon: 40.0, speed: 0.5 };
    assert!(calculator
        .calculate_aspect(&a, &b, &AspectSettings::default(), PhaseMode::Motion)
        .is_none());
}

#[test]
fn test_minor_aspects_opt_in() {
    let calculator = AspectCalculator::new();
    let a = AspectPoint { layer: ChartLayer::Natal, body: Body::Sun, lon: 10.0, speed: 1.0 };
    let b = AspectPoint { layer: ChartLayer::Natal, body: Body::Mars, lon: 161.0, speed: 0.5 };

    let mut settings = AspectSettings::default();
    assert!(calculator.calculate_aspect(&a, &b, &settings, PhaseMode::Static).is_none());

    settings.include_minor = true;
    let aspect = calculator.calculate_aspect(&a, &b, &settings, PhaseMode::Static).unwrap();
    assert_eq!(aspect.kind, AspectKind::Quincunx);
    assert!(!aspect.kind.is_major());
}

#[test]
fn test_cross_aspects_symmetric_as_sets() {
    let calculator = AspectCalculator::new();
    let first = points(ChartLayer::First, spread(3.0, 41.0), 0.0);
    let second = points(ChartLayer::Second, spread(17.0, 67.0), 0.0);
    let settings = AspectSettings::synastry();

    let ab = calculator.cross_aspects(&first, &second, &settings, PhaseMode::Static);
    let ba = calculator.cross_aspects(&second, &first, &settings, PhaseMode::Static);
    assert!(!ab.is_empty());

    let key = |from: Body, to: Body, kind: AspectKind, orb: f64| (from, to, kind, orb.to_bits());
    let forward: BTreeSet<_> = ab.iter().map(|a| key(a.from.body, a.to.body, a.kind, a.orb)).collect();
    let backward: BTreeSet<_> = ba.iter().map(|a| key(a.to.body, a.from.body, a.kind, a.orb)).collect();
    assert_eq!(forward, backward);
}

#[test]
fn test_orbs_bounded_and_sorted() {
    let calculator = AspectCalculator::new();
    let mut settings = AspectSettings::default();
    settings.include_minor = true;
    let first = points(ChartLayer::Transit, spread(5.0, 29.0), 0.7);
    let second = points(ChartLayer::Natal, spread(355.0, 53.0), 0.0);

    let aspects = calculator.cross_aspects(&first, &second, &settings, PhaseMode::Motion);
    assert!(!aspects.is_empty());
    for aspect in &aspects {
        assert!((0.0..=180.0).contains(&aspect.separation));
        assert!(aspect.abs_orb() <= aspect.tolerance + 1e-12);
        assert_eq!(aspect.exact_angle, aspect.kind.angle());
        assert_eq!(aspect.days_to_exact.is_some(), aspect.phase == AspectPhase::Applying);
    }
    for pair in aspects.windows(2) {
        assert!(pair[0].abs_orb() <= pair[1].abs_orb());
    }
}

#[test]
fn test_natal_aspects_use_each_pair_once() {
    let calculator = AspectCalculator::new();
    let natal = points(ChartLayer::Natal, spread(0.0, 60.0), 1.0);
    let aspects = calculator.natal_aspects(&natal, &AspectSettings::default());
    for aspect in &aspects {
        assert!(aspect.from.body < aspect.to.body);
    }
    let pairs: BTreeSet<_> = aspects.iter().map(|a| (a.from.body, a.to.body)).collect();
    assert_eq!(pairs.len(), aspects.len());
}
