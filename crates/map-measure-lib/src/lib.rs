//! Map Measure Library - Geodesic Measurement Engine
//!
//! This library computes distance, perimeter, and area measurements from
//! points drawn on an interactive map, converts and formats them in metric or
//! imperial units, and manages their lifecycle as live map overlays.
//!
//! # Architecture
//!
//! - **[`geodesic`]**: pure spherical-earth math (Haversine distances,
//!   tangent-plane Shoelace areas)
//! - **[`units`]**: unit systems, concrete units, conversion and formatting
//! - **[`Measurement`]**: value object built from a finalized point set
//! - **[`MeasurementManager`]**: the canonical collection plus the
//!   in-progress drawing buffer, with change subscriptions
//! - **[`MeasurementDisplay`]**: binds measurements to overlays on an
//!   external map behind the [`MapBackend`] trait
//!
//! The engine is single-threaded and synchronous; all operations run to
//! completion on the caller's thread. Malformed geometric input never errors:
//! degenerate point sets produce zero-valued, correctly formatted results,
//! and unknown ids yield `None`/`false` sentinels.

pub mod display;
pub mod geodesic;
pub mod manager;
pub mod measurement;
pub mod units;

// Public API exports
pub use display::{
    DEFAULT_OVERLAY_COLOR, MapBackend, MeasurementDisplay, OverlayStyle, StylePatch, format_area,
    format_distance,
};
pub use geodesic::{
    haversine_distance, lat_lng, path_length, point_from_lng_lat, ring_area, ring_perimeter,
};
pub use manager::{MeasurementManager, MeasurementUpdate, SubscriptionId};
pub use measurement::{
    Measurement, MeasurementKind, MeasurementOptions, generate_measurement_id,
};
pub use units::{
    MeasurementUnit, UnitAxis, UnitSystem, convert_between_systems, convert_unit,
    format_measurement,
};

/// Error types for the measurement engine
///
/// The geometric core degrades instead of erroring (see the crate docs);
/// these variants cover the genuinely fallible edges around it.
#[derive(Debug, thiserror::Error)]
pub enum MeasureError {
    #[error("invalid color string: {0:?}")]
    InvalidColor(String),
}

pub type Result<T> = std::result::Result<T, MeasureError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_exports() {
        // Verify that the engine's entry points are accessible
        let _: fn() -> MeasurementManager = MeasurementManager::new;
        let _: fn() -> String = generate_measurement_id;
        let _: fn(f64, MeasurementUnit, MeasurementUnit) -> f64 = convert_unit;
    }
}
