use urania::angles::{arc_forward, normalize, signed_delta};
use urania::houses::{ascendant, compute_houses, house_of, midheaven};
use urania::{EngineError, HouseSystem};

const EPS: f64 = 23.4393;

#[test]
fn test_quadrant_systems_agree_on_the_equator() {
    for ramc in [0.0, 45.0, 133.0, 271.5] {
        let reference = compute_houses(ramc, 0.0, EPS, HouseSystem::Placidus).unwrap();
        for system in [HouseSystem::Koch, HouseSystem::Regiomontanus, HouseSystem::Campanus] {
            let other = compute_houses(ramc, 0.0, EPS, system).unwrap();
            for (a, b) in reference.cusps.iter().zip(other.cusps.iter()) {
                assert!(signed_delta(*a, *b).abs() < 1e-6, "{system} at ramc {ramc}");
            }
        }
    }
}

#[test]
fn test_angles_sit_on_cusps_one_four_seven_ten() {
    for system in [
        HouseSystem::Placidus,
        HouseSystem::Koch,
        HouseSystem::Porphyry,
        HouseSystem::Regiomontanus,
        HouseSystem::Campanus,
    ] {
        let houses = compute_houses(200.0, 51.5, EPS, system).unwrap();
        assert!(signed_delta(houses.cusps[0], houses.ascendant).abs() < 1e-9);
        assert!(signed_delta(houses.cusps[9], houses.midheaven).abs() < 1e-9);
        assert!(signed_delta(houses.cusps[3], normalize(houses.midheaven + 180.0)).abs() < 1e-9);
        assert!(signed_delta(houses.cusps[6], normalize(houses.ascendant + 180.0)).abs() < 1e-9);
    }
}

#[test]
fn test_opposite_cusps() {
    let houses = compute_houses(77.0, -33.9, EPS, HouseSystem::Placidus).unwrap();
    for i in 0..6 {
        let gap = signed_delta(houses.cusps[i], houses.cusps[i + 6]).abs();
        assert!((gap - 180.0).abs() < 1e-9, "cusps {} and {}", i + 1, i + 7);
    }
}

#[test]
fn test_porphyry_trisects_quadrants() {
    let houses = compute_houses(310.0, 40.0, EPS, HouseSystem::Porphyry).unwrap();
    let upper = arc_forward(houses.cusps[9], houses.cusps[0]);
    for i in [9, 10, 11] {
        let step = arc_forward(houses.cusps[i], houses.cusps[(i + 1) % 12]);
        assert!((step - upper / 3.0).abs() < 1e-9);
    }
}

#[test]
fn test_equal_and_whole_sign() {
    let equal = compute_houses(15.0, 35.0, EPS, HouseSystem::Equal).unwrap();
    for i in 0..12 {
        let step = arc_forward(equal.cusps[i], equal.cusps[(i + 1) % 12]);
        assert!((step - 30.0).abs() < 1e-9);
    }
    assert_eq!(equal.cusps[0], equal.ascendant);

    let whole = compute_houses(15.0, 35.0, EPS, HouseSystem::WholeSign).unwrap();
    assert_eq!(whole.cusps[0] % 30.0, 0.0);
    assert!(arc_forward(whole.cusps[0], whole.ascendant) < 30.0);
    assert_eq!(whole.midheaven, midheaven(15.0, EPS));
}

#[test]
fn test_ascendant_rises_in_the_east() {
    for lat in [-50.0, -10.0, 0.0, 25.0, 60.0] {
        for ramc in (0..360).step_by(15) {
            let ramc = f64::from(ramc);
            let asc = ascendant(ramc, lat, EPS);
            let mc = midheaven(ramc, EPS);
            let ahead = arc_forward(mc, asc);
            assert!(ahead > 0.0 && ahead < 180.0, "lat {lat} ramc {ramc}");
        }
    }
}

#[test]
fn test_polar_latitudes() {
    let polar = 90.0 - EPS + 0.5;
    for system in [HouseSystem::Placidus, HouseSystem::Koch] {
        let err = compute_houses(100.0, polar, EPS, system).unwrap_err();
        assert!(matches!(err, EngineError::HouseSystemUndefined { system: s, .. } if s == system));
    }
    assert!(compute_houses(100.0, polar, EPS, HouseSystem::Equal).is_ok());
    assert!(compute_houses(100.0, 90.0, EPS, HouseSystem::Equal).is_err());
    assert!(matches!(
        compute_houses(f64::NAN, 10.0, EPS, HouseSystem::Equal),
        Err(EngineError::InvalidInput(_))
    ));
}

#[test]
fn test_house_of_respects_cusp_boundaries() {
    let houses = compute_houses(123.0, 48.2, EPS, HouseSystem::Placidus).unwrap();
    for (i, &cusp) in houses.cusps.iter().enumerate() {
        assert_eq!(usize::from(house_of(cusp, &houses.cusps)), i + 1);
        assert_eq!(usize::from(house_of(normalize(cusp + 1e-6), &houses.cusps)), i + 1);
        let before = usize::from(house_of(normalize(cusp - 1e-6), &houses.cusps));
        assert_eq!(before, if i == 0 { 12 } else { i });
    }
}
