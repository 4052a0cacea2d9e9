//! Measurement value objects and their factory
//!
//! A [`Measurement`] is an immutable-by-convention value object: its `value`
//! is always stored in the base unit (meters or square meters) and its
//! `formatted` string is a derived cache recomputable from
//! `(value, kind, unit_system)`. The constructor computes both from the point
//! set, so a freshly built measurement is always internally consistent.

use std::time::{SystemTime, UNIX_EPOCH};

use geo::Point;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::geodesic;
use crate::units::{self, UnitAxis, UnitSystem};

/// What a point set is measuring
///
/// `Length` and `Distance` measure an open polyline; `Area` and `Perimeter`
/// treat the points as a closed polygon ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MeasurementKind {
    Length,
    Area,
    Distance,
    Perimeter,
}

impl MeasurementKind {
    /// The unit axis of this kind's value (perimeters are lengths)
    #[inline]
    pub fn axis(&self) -> UnitAxis {
        match self {
            Self::Area => UnitAxis::Area,
            Self::Length | Self::Distance | Self::Perimeter => UnitAxis::Length,
        }
    }

    /// Whether the point set is interpreted as a closed polygon ring
    #[inline]
    pub fn is_polygon(&self) -> bool {
        matches!(self, Self::Area | Self::Perimeter)
    }
}

/// Optional metadata merged into a measurement at construction time
#[derive(Debug, Clone, Default)]
pub struct MeasurementOptions {
    pub id: Option<String>,
    pub label: Option<String>,
    pub color: Option<String>,
}

/// A finalized measurement over a set of geographic points
///
/// `value` is in the base unit of the kind's axis (meters or square meters)
/// regardless of `unit_system`; `formatted` is the display string derived
/// from the value and the unit system.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Measurement {
    pub kind: MeasurementKind,
    pub points: Vec<Point<f64>>,
    pub value: f64,
    pub unit_system: UnitSystem,
    pub formatted: String,
    pub id: Option<String>,
    pub label: Option<String>,
    pub color: Option<String>,
}

impl Measurement {
    /// Build a measurement from a point set
    ///
    /// Computes `value` with the geodesic function matching the kind (path
    /// length, ring area, or ring perimeter) and derives `formatted` for the
    /// given unit system. The points are stored as an owned copy. Degenerate
    /// point sets yield a zero value with a correctly formatted zero string.
    pub fn new(kind: MeasurementKind, points: Vec<Point<f64>>, unit_system: UnitSystem) -> Self {
        let value = match kind {
            MeasurementKind::Length | MeasurementKind::Distance => geodesic::path_length(&points),
            MeasurementKind::Area => geodesic::ring_area(&points),
            MeasurementKind::Perimeter => geodesic::ring_perimeter(&points),
        };
        let formatted = units::format_measurement(value, kind, unit_system);
        Self {
            kind,
            points,
            value,
            unit_system,
            formatted,
            id: None,
            label: None,
            color: None,
        }
    }

    /// Build a measurement with optional id/label/color metadata
    pub fn with_options(
        kind: MeasurementKind,
        points: Vec<Point<f64>>,
        unit_system: UnitSystem,
        options: MeasurementOptions,
    ) -> Self {
        let mut measurement = Self::new(kind, points, unit_system);
        measurement.id = options.id;
        measurement.label = options.label;
        measurement.color = options.color;
        measurement
    }

    /// Return a copy of this measurement displayed in another unit system
    ///
    /// The stored base-unit `value` is unchanged (base-unit invariant); only
    /// `unit_system` and the derived `formatted` string differ. Returns an
    /// unchanged clone when the system already matches; never mutates `self`.
    pub fn convert_to(&self, to_system: UnitSystem) -> Measurement {
        if self.unit_system == to_system {
            return self.clone();
        }
        let mut converted = self.clone();
        converted.unit_system = to_system;
        converted.recompute_formatted();
        converted
    }

    /// Re-derive the `formatted` cache from the current value and unit system
    ///
    /// Must be called after any partial update that touches `value` or
    /// `unit_system`; `formatted` is never the source of truth.
    pub(crate) fn recompute_formatted(&mut self) {
        self.formatted = units::format_measurement(self.value, self.kind, self.unit_system);
    }
}

/// Generate a collection id of the form `"{epoch-ms}-{random 0-9999}"`
pub fn generate_measurement_id() -> String {
    let epoch_ms = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis())
        .unwrap_or(0);

    let mut bytes = [0u8; 2];
    let suffix = match getrandom::fill(&mut bytes) {
        Ok(()) => u16::from_le_bytes(bytes) % 10_000,
        // Entropy source unavailable; fall back to the clock
        Err(_) => (epoch_ms % 10_000) as u16,
    };

    format!("{epoch_ms}-{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geodesic::lat_lng;

    #[test]
    fn test_single_point_length_is_formatted_zero() {
        let m = Measurement::new(
            MeasurementKind::Length,
            vec![lat_lng(51.5, -0.1)],
            UnitSystem::Metric,
        );
        assert_eq!(m.value, 0.0);
        assert_eq!(m.formatted, "0.00 m");
    }

    #[test]
    fn test_two_point_area_is_formatted_zero() {
        let m = Measurement::new(
            MeasurementKind::Area,
            vec![lat_lng(51.5, -0.1), lat_lng(51.6, -0.1)],
            UnitSystem::Metric,
        );
        assert_eq!(m.value, 0.0);
        assert_eq!(m.formatted, "0.00 m²");
    }

    #[test]
    fn test_value_is_stored_in_base_unit() {
        let points = vec![lat_lng(51.5074, -0.1278), lat_lng(48.8566, 2.3522)];
        let metric = Measurement::new(MeasurementKind::Distance, points.clone(), UnitSystem::Metric);
        let imperial = Measurement::new(MeasurementKind::Distance, points, UnitSystem::Imperial);

        // Same base-unit value regardless of the display system
        assert_eq!(metric.value, imperial.value);
        assert_ne!(metric.formatted, imperial.formatted);
    }

    #[test]
    fn test_convert_to_other_system() {
        let points = vec![lat_lng(51.5074, -0.1278), lat_lng(48.8566, 2.3522)];
        let metric = Measurement::new(MeasurementKind::Length, points, UnitSystem::Metric);
        let imperial = metric.convert_to(UnitSystem::Imperial);

        assert_eq!(imperial.unit_system, UnitSystem::Imperial);
        assert_eq!(imperial.value, metric.value);
        assert_eq!(imperial.points, metric.points);
        assert!(imperial.formatted.ends_with("mi"));
        // Input untouched
        assert_eq!(metric.unit_system, UnitSystem::Metric);
        assert!(metric.formatted.ends_with("km"));
    }

    #[test]
    fn test_convert_to_same_system_is_identity() {
        let m = Measurement::new(
            MeasurementKind::Length,
            vec![lat_lng(51.5, -0.1), lat_lng(51.6, -0.1)],
            UnitSystem::Metric,
        );
        assert_eq!(m.convert_to(UnitSystem::Metric), m);
    }

    #[test]
    fn test_with_options_merges_metadata() {
        let m = Measurement::with_options(
            MeasurementKind::Area,
            Vec::new(),
            UnitSystem::Metric,
            MeasurementOptions {
                id: Some("fixed-id".into()),
                label: Some("field".into()),
                color: Some("#ff0000".into()),
            },
        );
        assert_eq!(m.id.as_deref(), Some("fixed-id"));
        assert_eq!(m.label.as_deref(), Some("field"));
        assert_eq!(m.color.as_deref(), Some("#ff0000"));
    }

    #[test]
    fn test_generated_id_shape() {
        let id = generate_measurement_id();
        let (epoch_ms, suffix) = id.split_once('-').expect("id has two parts");
        assert!(epoch_ms.parse::<u128>().expect("epoch millis") > 0);
        assert!(suffix.parse::<u16>().expect("random suffix") < 10_000);
    }
}
