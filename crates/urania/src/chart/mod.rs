pub mod calculator;
pub mod data;
pub mod transit;

pub use calculator::ChartCalculator;
pub use data::{BirthData, BodyPosition, Chart, ChartFlag, HouseCusp};
pub use transit::{LunarPhase, MoonPhase, TransitCalculator, TransitReport, TransitResult};
