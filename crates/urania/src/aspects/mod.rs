pub mod calculator;
pub mod types;

pub use calculator::{sort_aspects, AspectCalculator, AspectPoint, PhaseMode};
pub use types::{
    Aspect, AspectEndpoint, AspectKind, AspectPhase, AspectSettings, ChartLayer, Strength,
};
