#[cfg(feature = "swisseph")]
pub mod adapter;
pub mod analytic;
pub mod cache;
pub mod fixed;
pub mod provider;
pub mod timeout;
pub mod types;

#[cfg(feature = "swisseph")]
pub use adapter::SwissEphemerisAdapter;
pub use analytic::AnalyticEphemeris;
pub use cache::CachedProvider;
pub use fixed::FixedPositions;
pub use provider::{EphemerisError, PositionProvider};
pub use timeout::TimeoutProvider;
pub use types::{Body, GeoLocation, Position};
