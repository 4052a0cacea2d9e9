//! Unit systems, concrete measurement units, conversion, and formatting
//!
//! Conversions are stateless and go through a base unit (meters for lengths,
//! square meters for areas). Formatting switches to the larger unit of a
//! system once a fixed threshold is crossed and always prints two decimals.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::measurement::MeasurementKind;

/// Feet per meter
pub const FEET_PER_METER: f64 = 3.28084;
/// Square feet per square meter
pub const SQUARE_FEET_PER_SQUARE_METER: f64 = 10.7639;
/// Meters per kilometer
pub const METERS_PER_KILOMETER: f64 = 1000.0;
/// Meters per statute mile
pub const METERS_PER_MILE: f64 = 1609.34;
/// Square meters per hectare
pub const SQUARE_METERS_PER_HECTARE: f64 = 10_000.0;
/// Square meters per acre
pub const SQUARE_METERS_PER_ACRE: f64 = 4046.86;

/// Switch from meters to kilometers at this many meters
const KILOMETER_THRESHOLD_M: f64 = 1000.0;
/// Switch from feet to miles at this many feet
const MILE_THRESHOLD_FT: f64 = 5280.0;
/// Switch from square meters to hectares at this many square meters
const HECTARE_THRESHOLD_M2: f64 = 10_000.0;
/// Switch from square feet to acres at this many square feet
const ACRE_THRESHOLD_FT2: f64 = 43_560.0;

/// Coarse-grained display preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum UnitSystem {
    Metric,
    Imperial,
}

/// Whether a unit (or measurement) lives on the length or the area axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum UnitAxis {
    Length,
    Area,
}

/// A concrete display unit, independent of the coarse [`UnitSystem`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MeasurementUnit {
    Meters,
    Kilometers,
    Feet,
    Miles,
    SquareMeters,
    Hectares,
    SquareFeet,
    Acres,
}

impl MeasurementUnit {
    /// Classify the unit as a length or an area unit
    #[inline]
    pub fn axis(&self) -> UnitAxis {
        match self {
            Self::Meters | Self::Kilometers | Self::Feet | Self::Miles => UnitAxis::Length,
            Self::SquareMeters | Self::Hectares | Self::SquareFeet | Self::Acres => UnitAxis::Area,
        }
    }

    /// Fixed factor converting one of this unit into the axis base unit
    /// (meters or square meters)
    #[inline]
    pub fn factor_to_base(&self) -> f64 {
        match self {
            Self::Meters => 1.0,
            Self::Kilometers => METERS_PER_KILOMETER,
            Self::Feet => 1.0 / FEET_PER_METER,
            Self::Miles => METERS_PER_MILE,
            Self::SquareMeters => 1.0,
            Self::Hectares => SQUARE_METERS_PER_HECTARE,
            Self::SquareFeet => 1.0 / SQUARE_FEET_PER_SQUARE_METER,
            Self::Acres => SQUARE_METERS_PER_ACRE,
        }
    }
}

/// Convert a base-unit value between the metric and imperial systems
///
/// Identity when the systems match. The measurement kind selects the axis:
/// lengths scale by [`FEET_PER_METER`], areas by
/// [`SQUARE_FEET_PER_SQUARE_METER`].
pub fn convert_between_systems(
    value: f64,
    kind: MeasurementKind,
    from: UnitSystem,
    to: UnitSystem,
) -> f64 {
    if from == to {
        return value;
    }
    let factor = match kind.axis() {
        UnitAxis::Length => FEET_PER_METER,
        UnitAxis::Area => SQUARE_FEET_PER_SQUARE_METER,
    };
    match (from, to) {
        (UnitSystem::Metric, UnitSystem::Imperial) => value * factor,
        (UnitSystem::Imperial, UnitSystem::Metric) => value / factor,
        _ => value,
    }
}

/// Convert a value between two concrete units via the axis base unit
///
/// Mixing a length unit with an area unit is a programmer error; it is
/// asserted in debug builds and unchecked in release builds.
pub fn convert_unit(value: f64, from: MeasurementUnit, to: MeasurementUnit) -> f64 {
    debug_assert!(
        from.axis() == to.axis(),
        "cannot convert between {from:?} and {to:?}: different unit axes"
    );
    value * from.factor_to_base() / to.factor_to_base()
}

/// Format a base-unit value for display in the given system
///
/// Two decimal places; switches to the larger unit of the system past a fixed
/// threshold (1000 m, 5280 ft, 10 000 m², 43 560 ft²).
pub fn format_measurement(value: f64, kind: MeasurementKind, system: UnitSystem) -> String {
    match (kind.axis(), system) {
        (UnitAxis::Length, UnitSystem::Metric) => {
            if value >= KILOMETER_THRESHOLD_M {
                format!("{:.2} km", value / METERS_PER_KILOMETER)
            } else {
                format!("{value:.2} m")
            }
        }
        (UnitAxis::Length, UnitSystem::Imperial) => {
            let feet = value * FEET_PER_METER;
            if feet >= MILE_THRESHOLD_FT {
                format!("{:.2} mi", feet / MILE_THRESHOLD_FT)
            } else {
                format!("{feet:.2} ft")
            }
        }
        (UnitAxis::Area, UnitSystem::Metric) => {
            if value >= HECTARE_THRESHOLD_M2 {
                format!("{:.2} ha", value / SQUARE_METERS_PER_HECTARE)
            } else {
                format!("{value:.2} m²")
            }
        }
        (UnitAxis::Area, UnitSystem::Imperial) => {
            let sq_feet = value * SQUARE_FEET_PER_SQUARE_METER;
            if sq_feet >= ACRE_THRESHOLD_FT2 {
                format!("{:.2} ac", sq_feet / ACRE_THRESHOLD_FT2)
            } else {
                format!("{sq_feet:.2} ft²")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use MeasurementKind::{Area, Length};
    use UnitSystem::{Imperial, Metric};

    #[test]
    fn test_system_conversion_identity() {
        assert_eq!(convert_between_systems(123.4, Length, Metric, Metric), 123.4);
        assert_eq!(convert_between_systems(123.4, Area, Imperial, Imperial), 123.4);
    }

    #[test]
    fn test_system_conversion_factors() {
        assert!((convert_between_systems(1000.0, Length, Metric, Imperial) - 3280.84).abs() < 0.01);
        assert!((convert_between_systems(5280.0, Length, Imperial, Metric) - 1609.34).abs() < 0.01);
        assert!((convert_between_systems(10_000.0, Area, Metric, Imperial) - 107_639.0).abs() < 0.1);
        assert!((convert_between_systems(43_560.0, Area, Imperial, Metric) - 4046.87).abs() < 0.01);
    }

    #[test]
    fn test_system_conversion_round_trip() {
        for value in [0.0, 1.0, 45.0, 1234.5678, 1e9] {
            let there = convert_between_systems(value, Length, Metric, Imperial);
            let back = convert_between_systems(there, Length, Imperial, Metric);
            assert!((back - value).abs() <= value.abs() * 1e-6 + 1e-9);

            let there = convert_between_systems(value, Area, Metric, Imperial);
            let back = convert_between_systems(there, Area, Imperial, Metric);
            assert!((back - value).abs() <= value.abs() * 1e-6 + 1e-9);
        }
    }

    #[test]
    fn test_unit_conversion_through_base() {
        use MeasurementUnit::*;
        assert!((convert_unit(1.0, Kilometers, Meters) - 1000.0).abs() < 1e-9);
        assert!((convert_unit(1609.34, Meters, Miles) - 1.0).abs() < 1e-9);
        assert!((convert_unit(1.0, Miles, Feet) - 5279.99).abs() < 0.05);
        assert!((convert_unit(1.0, Hectares, SquareMeters) - 10_000.0).abs() < 1e-9);
        assert!((convert_unit(4046.86, SquareMeters, Acres) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_unit_axis_classification() {
        use MeasurementUnit::*;
        for unit in [Meters, Kilometers, Feet, Miles] {
            assert_eq!(unit.axis(), UnitAxis::Length);
        }
        for unit in [SquareMeters, Hectares, SquareFeet, Acres] {
            assert_eq!(unit.axis(), UnitAxis::Area);
        }
    }

    #[test]
    fn test_format_metric_length() {
        assert_eq!(format_measurement(1500.0, Length, Metric), "1.50 km");
        assert_eq!(format_measurement(45.0, Length, Metric), "45.00 m");
        assert_eq!(format_measurement(0.0, Length, Metric), "0.00 m");
        assert_eq!(format_measurement(999.99, Length, Metric), "999.99 m");
        assert_eq!(format_measurement(1000.0, Length, Metric), "1.00 km");
    }

    #[test]
    fn test_format_imperial_length() {
        // 1610 m is just past one mile (5282.15 ft)
        assert_eq!(format_measurement(1610.0, Length, Imperial), "1.00 mi");
        assert_eq!(format_measurement(2000.0, Length, Imperial), "1.24 mi");
        assert_eq!(format_measurement(10.0, Length, Imperial), "32.81 ft");
    }

    #[test]
    fn test_format_metric_area() {
        assert_eq!(format_measurement(5000.0, Area, Metric), "0.50 ha");
        assert_eq!(format_measurement(9999.0, Area, Metric), "9999.00 m²");
        assert_eq!(format_measurement(10_000.0, Area, Metric), "1.00 ha");
    }

    #[test]
    fn test_format_imperial_area() {
        // 4047 m² is just past one acre (43 561.5 ft²)
        assert_eq!(format_measurement(4047.0, Area, Imperial), "1.00 ac");
        assert_eq!(format_measurement(1.0, Area, Imperial), "10.76 ft²");
    }
}
