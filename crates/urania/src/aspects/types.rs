use crate::ephemeris::Body;
use crate::error::EngineError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Angular relationship kinds, ordered by exact angle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AspectKind {
    Conjunction,
    Semisextile,
    Semisquare,
    Sextile,
    Square,
    Trine,
    Sesquiquadrate,
    Quincunx,
    Opposition,
}

impl AspectKind {
    pub const ALL: [AspectKind; 9] = [
        AspectKind::Conjunction,
        AspectKind::Semisextile,
        AspectKind::Semisquare,
        AspectKind::Sextile,
        AspectKind::Square,
        AspectKind::Trine,
        AspectKind::Sesquiquadrate,
        AspectKind::Quincunx,
        AspectKind::Opposition,
    ];

    pub const MAJOR: [AspectKind; 5] = [
        AspectKind::Conjunction,
        AspectKind::Sextile,
        AspectKind::Square,
        AspectKind::Trine,
        AspectKind::Opposition,
    ];

    /// Exact angle in degrees
    pub fn angle(self) -> f64 {
        match self {
            AspectKind::Conjunction => 0.0,
            AspectKind::Semisextile => 30.0,
            AspectKind::Semisquare => 45.0,
            AspectKind::Sextile => 60.0,
            AspectKind::Square => 90.0,
            AspectKind::Trine => 120.0,
            AspectKind::Sesquiquadrate => 135.0,
            AspectKind::Quincunx => 150.0,
            AspectKind::Opposition => 180.0,
        }
    }

    pub fn is_major(self) -> bool {
        Self::MAJOR.contains(&self)
    }

    /// Harmony weight used by compatibility scoring.
    pub fn harmony(self) -> f64 {
        match self {
            AspectKind::Conjunction | AspectKind::Trine => 5.0,
            AspectKind::Sextile => 4.0,
            AspectKind::Opposition => 3.0,
            AspectKind::Square => 2.0,
            _ => 1.0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            AspectKind::Conjunction => "conjunction",
            AspectKind::Semisextile => "semisextile",
            AspectKind::Semisquare => "semisquare",
            AspectKind::Sextile => "sextile",
            AspectKind::Square => "square",
            AspectKind::Trine => "trine",
            AspectKind::Sesquiquadrate => "sesquiquadrate",
            AspectKind::Quincunx => "quincunx",
            AspectKind::Opposition => "opposition",
        }
    }
}

impl fmt::Display for AspectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which position set an aspect endpoint comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartLayer {
    Natal,
    Transit,
    /// First chart of a synastry comparison
    First,
    /// Second chart of a synastry comparison
    Second,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AspectEndpoint {
    pub layer: ChartLayer,
    pub body: Body,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AspectPhase {
    /// Orb is shrinking
    Applying,
    /// Orb is growing
    Separating,
    /// Motion not considered, or no relative motion
    Static,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strength {
    Strong,
    Moderate,
    Weak,
}

impl Strength {
    /// Tier by thirds of the tolerance.
    pub fn from_orb(orb: f64, tolerance: f64) -> Self {
        let orb = orb.abs();
        if orb <= tolerance / 3.0 {
            Strength::Strong
        } else if orb <= 2.0 * tolerance / 3.0 {
            Strength::Moderate
        } else {
            Strength::Weak
        }
    }
}

/// A classified angular relationship between two bodies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aspect {
    pub from: AspectEndpoint,
    pub to: AspectEndpoint,
    pub kind: AspectKind,
    pub exact_angle: f64,
    /// Minimal angular distance, [0, 180]
    pub separation: f64,
    /// `separation - exact_angle`
    pub orb: f64,
    /// Orb tolerance that admitted this aspect
    pub tolerance: f64,
    pub phase: AspectPhase,
    pub strength: Strength,
    /// Estimated days until exact, only for applying aspects
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_to_exact: Option<f64>,
}

impl Aspect {
    pub fn abs_orb(&self) -> f64 {
        self.orb.abs()
    }
}

/// Orb tolerances per aspect kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AspectSettings {
    pub orbs: BTreeMap<AspectKind, f64>,
    /// Match the minor kinds too
    pub include_minor: bool,
}

impl Default for AspectSettings {
    fn default() -> Self {
        Self {
            orbs: BTreeMap::from([
                (AspectKind::Conjunction, 8.0),
                (AspectKind::Sextile, 4.0),
                (AspectKind::Square, 6.0),
                (AspectKind::Trine, 6.0),
                (AspectKind::Opposition, 8.0),
                (AspectKind::Semisextile, 2.0),
                (AspectKind::Semisquare, 2.0),
                (AspectKind::Sesquiquadrate, 2.0),
                (AspectKind::Quincunx, 3.0),
            ]),
            include_minor: false,
        }
    }
}

impl AspectSettings {
    /// Wider orbs used when comparing two charts.
    pub fn synastry() -> Self {
        let mut settings = Self::default();
        settings.orbs.insert(AspectKind::Sextile, 6.0);
        settings.orbs.insert(AspectKind::Square, 8.0);
        settings.orbs.insert(AspectKind::Trine, 8.0);
        settings
    }

    /// Tolerance for a kind, or `None` when the kind is not matched.
    pub fn orb_for(&self, kind: AspectKind) -> Option<f64> {
        if !kind.is_major() && !self.include_minor {
            return None;
        }
        self.orbs.get(&kind).copied()
    }

    /// Kinds that take part in matching, in angle order.
    pub fn active_kinds(&self) -> impl Iterator<Item = (AspectKind, f64)> + '_ {
        AspectKind::ALL
            .iter()
            .filter_map(move |&kind| self.orb_for(kind).map(|orb| (kind, orb)))
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        for (kind, orb) in &self.orbs {
            if !orb.is_finite() || *orb <= 0.0 || *orb >= 30.0 {
                return Err(EngineError::InvalidInput(format!(
                    "orb for {kind} must be in (0, 30), got {orb}"
                )));
            }
        }
        if self.active_kinds().next().is_none() {
            return Err(EngineError::InvalidInput("no aspect kinds enabled".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strength_tiers() {
        assert_eq!(Strength::from_orb(1.0, 6.0), Strength::Strong);
        assert_eq!(Strength::from_orb(-2.0, 6.0), Strength::Strong);
        assert_eq!(Strength::from_orb(3.5, 6.0), Strength::Moderate);
        assert_eq!(Strength::from_orb(5.9, 6.0), Strength::Weak);
    }

    #[test]
    fn minor_kinds_are_opt_in() {
        let mut settings = AspectSettings::default();
        assert_eq!(settings.orb_for(AspectKind::Quincunx), None);
        settings.include_minor = true;
        assert_eq!(settings.orb_for(AspectKind::Quincunx), Some(3.0));
        assert_eq!(settings.active_kinds().count(), 9);
    }

    #[test]
    fn synastry_orbs_are_wider() {
        let s = AspectSettings::synastry();
        assert_eq!(s.orb_for(AspectKind::Sextile), Some(6.0));
        assert_eq!(s.orb_for(AspectKind::Trine), Some(8.0));
        assert_eq!(s.orb_for(AspectKind::Conjunction), Some(8.0));
    }

    #[test]
    fn rejects_bad_orbs() {
        let mut s = AspectSettings::default();
        s.orbs.insert(AspectKind::Trine, -1.0);
        assert!(s.validate().is_err());
        s.orbs.insert(AspectKind::Trine, f64::NAN);
        assert!(s.validate().is_err());
        assert!(AspectSettings::default().validate().is_ok());
    }
}
