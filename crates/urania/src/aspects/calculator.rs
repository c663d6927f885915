use crate::angles::{separation, separation_rate};
use crate::aspects::types::{
    Aspect, AspectEndpoint, AspectKind, AspectPhase, AspectSettings, ChartLayer, Strength,
};
use crate::ephemeris::Body;
use std::cmp::Ordering;

/// Below this relative motion (deg/day) two points count as not moving apart.
const STATIONARY_RATE: f64 = 1e-12;

/// A body's longitude and speed as seen from one layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AspectPoint {
    pub layer: ChartLayer,
    pub body: Body,
    pub lon: f64,
    pub speed: f64,
}

impl AspectPoint {
    fn endpoint(&self) -> AspectEndpoint {
        AspectEndpoint {
            layer: self.layer,
            body: self.body,
        }
    }
}

/// Whether the calculator classifies applying/separating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseMode {
    Motion,
    Static,
}

/// Aspect calculator
#[derive(Debug, Default)]
pub struct AspectCalculator;

impl AspectCalculator {
    pub fn new() -> Self {
        Self
    }

    /// Best matching kind for a separation: the admitted kind with the smallest
    /// absolute orb. Returns `(kind, signed orb, tolerance)`.
    pub fn match_aspect(&self, separation: f64, settings: &AspectSettings) -> Option<(AspectKind, f64, f64)> {
        let mut best: Option<(AspectKind, f64, f64)> = None;
        for (kind, tolerance) in settings.active_kinds() {
            let orb = separation - kind.angle();
            if orb.abs() > tolerance {
                continue;
            }
            match best {
                Some((_, best_orb, _)) if best_orb.abs() <= orb.abs() => {}
                _ => best = Some((kind, orb, tolerance)),
            }
        }
        best
    }

    /// Classify the relationship between two points, if any.
    pub fn calculate_aspect(
        &self,
        from: &AspectPoint,
        to: &AspectPoint,
        settings: &AspectSettings,
        mode: PhaseMode,
    ) -> Option<Aspect> {
        let sep = separation(from.lon, to.lon);
        let (kind, orb, tolerance) = self.match_aspect(sep, settings)?;

        let (phase, days_to_exact) = match mode {
            PhaseMode::Static => (AspectPhase::Static, None),
            PhaseMode::Motion => {
                let rate = separation_rate(from.lon, to.lon, from.speed, to.speed);
                classify_phase(orb, rate)
            }
        };

        Some(Aspect {
            from: from.endpoint(),
            to: to.endpoint(),
            kind,
            exact_angle: kind.angle(),
            separation: sep,
            orb,
            tolerance,
            phase,
            strength: Strength::from_orb(orb, tolerance),
            days_to_exact,
        })
    }

    /// Every pair across two point sets, sorted.
    pub fn cross_aspects(
        &self,
        first: &[AspectPoint],
        second: &[AspectPoint],
        settings: &AspectSettings,
        mode: PhaseMode,
    ) -> Vec<Aspect> {
        let mut aspects: Vec<Aspect> = first
            .iter()
            .flat_map(|a| {
                second
                    .iter()
                    .filter_map(move |b| self.calculate_aspect(a, b, settings, mode))
            })
            .collect();
        sort_aspects(&mut aspects);
        aspects
    }

    /// Every unordered pair within one point set, sorted.
    pub fn natal_aspects(&self, points: &[AspectPoint], settings: &AspectSettings) -> Vec<Aspect> {
        let mut aspects = Vec::new();
        for (i, a) in points.iter().enumerate() {
            for b in &points[i + 1..] {
                if let Some(aspect) = self.calculate_aspect(a, b, settings, PhaseMode::Motion) {
                    aspects.push(aspect);
                }
            }
        }
        sort_aspects(&mut aspects);
        aspects
    }
}

/// Applying when |orb| shrinks. `rate` is d(separation)/dt.
fn classify_phase(orb: f64, rate: f64) -> (AspectPhase, Option<f64>) {
    if rate.abs() < STATIONARY_RATE {
        return (AspectPhase::Static, None);
    }
    if orb == 0.0 {
        return (AspectPhase::Separating, None);
    }
    let orb_rate = orb.signum() * rate;
    if orb_rate < 0.0 {
        (AspectPhase::Applying, Some(orb.abs() / orb_rate.abs()))
    } else {
        (AspectPhase::Separating, None)
    }
}

/// Canonical order: absolute orb ascending, then body pair.
pub fn sort_aspects(aspects: &mut [Aspect]) {
    aspects.sort_by(compare_by_orb);
}

pub(crate) fn compare_by_orb(a: &Aspect, b: &Aspect) -> Ordering {
    a.abs_orb()
        .total_cmp(&b.abs_orb())
        .then_with(|| (a.from.body, a.to.body).cmp(&(b.from.body, b.to.body)))
}
