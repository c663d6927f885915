pub mod calculator;
pub mod types;
pub mod weights;

pub use calculator::SynastryCalculator;
pub use types::{Category, CategoryResult, CompatibilityResult, Rating, Stars, WeightedAspect};
