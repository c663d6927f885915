use crate::angles::arc_forward;
use crate::aspects::{Aspect, AspectCalculator, AspectPoint, AspectSettings, ChartLayer, PhaseMode};
use crate::chart::calculator::sample_bodies;
use crate::chart::data::{BodyPosition, Chart, ChartFlag};
use crate::ephemeris::{Body, PositionProvider};
use crate::error::EngineError;
use crate::time::Instant;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Eight-fold division of the synodic month by Sun–Moon elongation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoonPhase {
    New,
    WaxingCrescent,
    FirstQuarter,
    WaxingGibbous,
    Full,
    WaningGibbous,
    LastQuarter,
    WaningCrescent,
}

impl MoonPhase {
    const ORDER: [MoonPhase; 8] = [
        MoonPhase::New,
        MoonPhase::WaxingCrescent,
        MoonPhase::FirstQuarter,
        MoonPhase::WaxingGibbous,
        MoonPhase::Full,
        MoonPhase::WaningGibbous,
        MoonPhase::LastQuarter,
        MoonPhase::WaningCrescent,
    ];

    /// Phase for an elongation in [0, 360), 45° per phase.
    pub fn from_elongation(elongation: f64) -> Self {
        let index = (elongation / 45.0).floor() as usize;
        Self::ORDER[index.min(7)]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LunarPhase {
    /// Moon longitude minus Sun longitude, [0, 360)
    pub elongation: f64,
    pub phase: MoonPhase,
    /// Illuminated fraction of the disc, percent
    pub illumination: f64,
}

impl LunarPhase {
    pub fn from_longitudes(sun: f64, moon: f64) -> Self {
        let elongation = arc_forward(sun, moon);
        Self {
            elongation,
            phase: MoonPhase::from_elongation(elongation),
            illumination: (1.0 - elongation.to_radians().cos()) / 2.0 * 100.0,
        }
    }
}

/// Sky at one instant measured against a natal chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitResult {
    pub instant: Instant,
    /// Transit bodies, houses counted from the natal cusps
    pub positions: [BodyPosition; 10],
    /// Transit-to-natal aspects, closest first
    pub aspects: Vec<Aspect>,
    pub lunar_phase: LunarPhase,
    pub flags: Vec<ChartFlag>,
}

impl TransitResult {
    pub fn position(&self, body: Body) -> &BodyPosition {
        &self.positions[body.index()]
    }
}

/// Outcome of a transit request. A provider outage yields `Unavailable`
/// rather than an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TransitReport {
    Available(TransitResult),
    Unavailable { reason: String },
}

impl TransitReport {
    pub fn result(&self) -> Option<&TransitResult> {
        match self {
            TransitReport::Available(result) => Some(result),
            TransitReport::Unavailable { .. } => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, TransitReport::Available(_))
    }
}

pub struct TransitCalculator<'a, P: PositionProvider + ?Sized> {
    provider: &'a P,
    settings: &'a AspectSettings,
    aspects: AspectCalculator,
}

impl<'a, P: PositionProvider + ?Sized> TransitCalculator<'a, P> {
    pub fn new(provider: &'a P, settings: &'a AspectSettings) -> Self {
        Self {
            provider,
            settings,
            aspects: AspectCalculator::new(),
        }
    }

    pub fn compute(&self, natal: &Chart, at: Instant) -> Result<TransitReport, EngineError> {
        match self.compute_result(natal, at) {
            Ok(result) => Ok(TransitReport::Available(result)),
            Err(EngineError::ProviderUnavailable(reason)) => {
                warn!("transits at {at} unavailable: {reason}");
                Ok(TransitReport::Unavailable { reason })
            }
            Err(e) => Err(e),
        }
    }

    fn compute_result(&self, natal: &Chart, at: Instant) -> Result<TransitResult, EngineError> {
        let (positions, flags) = sample_bodies(self.provider, at, &natal.cusp_longitudes())?;

        let transit_points: Vec<AspectPoint> = positions
            .iter()
            .map(|p| AspectPoint {
                layer: ChartLayer::Transit,
                body: p.body,
                lon: p.lon,
                speed: p.speed,
            })
            .collect();
        // natal points are fixed in the sky
        let natal_points: Vec<AspectPoint> = natal
            .aspect_points(ChartLayer::Natal)
            .into_iter()
            .map(|p| AspectPoint { speed: 0.0, ..p })
            .collect();

        let aspects = self
            .aspects
            .cross_aspects(&transit_points, &natal_points, self.settings, PhaseMode::Motion);

        let lunar_phase = LunarPhase::from_longitudes(
            positions[Body::Sun.index()].lon,
            positions[Body::Moon.index()].lon,
        );

        debug!(
            "transits at {at}: {} aspects, moon {:?} ({:.1}%)",
            aspects.len(),
            lunar_phase.phase,
            lunar_phase.illumination
        );

        Ok(TransitResult {
            instant: at,
            positions,
            aspects,
            lunar_phase,
            flags,
        })
    }
}
