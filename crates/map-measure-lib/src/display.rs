//! Overlay bridge between measurements and an external map
//!
//! The map rendering library is an external collaborator, abstracted behind
//! the [`MapBackend`] trait: whatever can create polyline and polygon
//! overlays, attach tooltips, restyle, and remove layers can render
//! measurements. [`MeasurementDisplay`] keeps its id → overlay mapping 1:1
//! with the manager's collection: every displayed measurement has exactly one
//! live overlay, and replacement always removes the old overlay first.

use std::collections::HashMap;

use geo::Point;

use crate::measurement::Measurement;
use crate::units::{
    FEET_PER_METER, MeasurementUnit, SQUARE_FEET_PER_SQUARE_METER, UnitAxis,
};

/// Default overlay stroke color
pub const DEFAULT_OVERLAY_COLOR: &str = "#3388ff";

// Display-local unit-switching thresholds, intentionally separate constants
// from the formatting engine's (see `format_distance`/`format_area`).
const DISPLAY_KM_THRESHOLD_M: f64 = 1000.0;
const DISPLAY_MI_THRESHOLD_FT: f64 = 5280.0;
const DISPLAY_HA_THRESHOLD_M2: f64 = 10_000.0;
const DISPLAY_AC_THRESHOLD_FT2: f64 = 43_560.0;

/// Styling applied to measurement overlays
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayStyle {
    /// Stroke color, `#rrggbb`
    pub color: String,
    /// Stroke width in pixels
    pub weight: f32,
    /// Polygon fill color, `#rrggbb`
    pub fill_color: String,
    /// Polygon fill opacity, 0.0 to 1.0
    pub fill_opacity: f32,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            color: DEFAULT_OVERLAY_COLOR.to_string(),
            weight: 2.0,
            fill_color: DEFAULT_OVERLAY_COLOR.to_string(),
            fill_opacity: 0.2,
        }
    }
}

/// Partial style merged into the display's current style
#[derive(Debug, Clone, Default)]
pub struct StylePatch {
    pub color: Option<String>,
    pub weight: Option<f32>,
    pub fill_color: Option<String>,
    pub fill_opacity: Option<f32>,
}

impl OverlayStyle {
    fn apply(&mut self, patch: &StylePatch) {
        if let Some(color) = &patch.color {
            self.color = color.clone();
        }
        if let Some(weight) = patch.weight {
            self.weight = weight;
        }
        if let Some(fill_color) = &patch.fill_color {
            self.fill_color = fill_color.clone();
        }
        if let Some(fill_opacity) = patch.fill_opacity {
            self.fill_opacity = fill_opacity;
        }
    }
}

/// The overlay operations an external map must provide
///
/// Modeled on the usual interactive-map surface: polyline/polygon overlay
/// creation returning an opaque handle, permanent tooltips anchored at a
/// coordinate, restyling, and layer removal.
pub trait MapBackend {
    /// Opaque handle to a rendered overlay
    type Overlay;

    fn polyline(&mut self, points: &[Point<f64>], style: &OverlayStyle) -> Self::Overlay;
    fn polygon(&mut self, points: &[Point<f64>], style: &OverlayStyle) -> Self::Overlay;
    fn bind_tooltip(&mut self, overlay: &mut Self::Overlay, text: &str, anchor: Point<f64>);
    fn set_style(&mut self, overlay: &mut Self::Overlay, style: &OverlayStyle);
    fn remove_layer(&mut self, overlay: Self::Overlay);
}

/// Renders measurements as overlays on an external map
///
/// All operations are early-return no-ops (with sentinel results) until a map
/// is installed with [`Self::set_map`].
pub struct MeasurementDisplay<B: MapBackend> {
    map: Option<B>,
    overlays: HashMap<String, B::Overlay>,
    style: OverlayStyle,
}

impl<B: MapBackend> Default for MeasurementDisplay<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: MapBackend> MeasurementDisplay<B> {
    pub fn new() -> Self {
        Self {
            map: None,
            overlays: HashMap::new(),
            style: OverlayStyle::default(),
        }
    }

    /// Install the target map; display operations are no-ops until this is
    /// called
    pub fn set_map(&mut self, map: B) {
        self.map = Some(map);
    }

    /// The installed map backend, if any
    #[inline]
    pub fn map(&self) -> Option<&B> {
        self.map.as_ref()
    }

    /// Number of currently tracked overlays
    #[inline]
    pub fn overlay_count(&self) -> usize {
        self.overlays.len()
    }

    /// The current base style
    #[inline]
    pub fn style(&self) -> &OverlayStyle {
        &self.style
    }

    /// Render a measurement, replacing any existing overlay for its id
    ///
    /// Polyline for the length kinds, polygon for the area kinds, each with a
    /// permanent tooltip showing `measurement.formatted` (at the middle
    /// vertex of a path, at the unweighted vertex mean of a polygon). The
    /// measurement's `color` overrides the base stroke color. Returns the id
    /// under which the overlay is tracked, or `None` when no map is set or
    /// the measurement has no id.
    pub fn display_measurement(&mut self, measurement: &Measurement) -> Option<String> {
        let map = self.map.as_mut()?;
        let id = measurement.id.clone()?;

        // Replace, never merge: exactly one live overlay per id
        if let Some(existing) = self.overlays.remove(&id) {
            map.remove_layer(existing);
        }

        let mut style = self.style.clone();
        if let Some(color) = &measurement.color {
            style.color = color.clone();
        }

        let mut overlay = if measurement.kind.is_polygon() {
            map.polygon(&measurement.points, &style)
        } else {
            map.polyline(&measurement.points, &style)
        };

        if let Some(anchor) = tooltip_anchor(measurement) {
            map.bind_tooltip(&mut overlay, &measurement.formatted, anchor);
        }

        self.overlays.insert(id.clone(), overlay);
        Some(id)
    }

    /// Remove the overlay for an id; false for an unknown id or no map
    pub fn remove_measurement(&mut self, id: &str) -> bool {
        let Some(map) = self.map.as_mut() else {
            return false;
        };
        match self.overlays.remove(id) {
            Some(overlay) => {
                map.remove_layer(overlay);
                true
            }
            None => false,
        }
    }

    /// Remove every tracked overlay from the map
    pub fn clear_measurements(&mut self) {
        let Some(map) = self.map.as_mut() else {
            return;
        };
        for (_, overlay) in self.overlays.drain() {
            map.remove_layer(overlay);
        }
    }

    /// Merge a partial style into the base style and re-apply it to every
    /// tracked overlay
    pub fn update_style(&mut self, patch: &StylePatch) {
        self.style.apply(patch);
        if let Some(map) = self.map.as_mut() {
            for overlay in self.overlays.values_mut() {
                map.set_style(overlay, &self.style);
            }
        }
    }

    /// Re-render a changed measurement (remove then display); false if the
    /// measurement has no id or no map is set
    pub fn update_measurement(&mut self, measurement: &Measurement) -> bool {
        let Some(id) = &measurement.id else {
            return false;
        };
        self.remove_measurement(id);
        self.display_measurement(measurement).is_some()
    }
}

/// Tooltip anchor: middle vertex for paths, unweighted vertex mean for
/// polygons (not the true geometric centroid)
fn tooltip_anchor(measurement: &Measurement) -> Option<Point<f64>> {
    let points = &measurement.points;
    if points.is_empty() {
        return None;
    }
    if measurement.kind.is_polygon() {
        let n = points.len() as f64;
        let lng = points.iter().map(|p| p.x()).sum::<f64>() / n;
        let lat = points.iter().map(|p| p.y()).sum::<f64>() / n;
        Some(Point::new(lng, lat))
    } else {
        Some(points[points.len() / 2])
    }
}

/// Format a length in meters for display in a concrete unit
///
/// Display-local helper on the [`MeasurementUnit`] axis, with its own
/// thresholds (1000 m → km, 5280 ft → mi), independent of the formatting
/// engine's [`UnitSystem`]-based thresholds.
pub fn format_distance(value_m: f64, unit: MeasurementUnit) -> String {
    debug_assert!(
        unit.axis() == UnitAxis::Length,
        "format_distance expects a length unit, got {unit:?}"
    );
    match unit {
        MeasurementUnit::Feet | MeasurementUnit::Miles => {
            let feet = value_m * FEET_PER_METER;
            if feet >= DISPLAY_MI_THRESHOLD_FT {
                format!("{:.2} mi", feet / DISPLAY_MI_THRESHOLD_FT)
            } else {
                format!("{feet:.2} ft")
            }
        }
        _ => {
            if value_m >= DISPLAY_KM_THRESHOLD_M {
                format!("{:.2} km", value_m / DISPLAY_KM_THRESHOLD_M)
            } else {
                format!("{value_m:.2} m")
            }
        }
    }
}

/// Format an area in square meters for display in a concrete unit
///
/// Display-local helper on the [`MeasurementUnit`] axis (10 000 m² → ha,
/// 43 560 ft² → ac).
pub fn format_area(value_m2: f64, unit: MeasurementUnit) -> String {
    debug_assert!(
        unit.axis() == UnitAxis::Area,
        "format_area expects an area unit, got {unit:?}"
    );
    match unit {
        MeasurementUnit::SquareFeet | MeasurementUnit::Acres => {
            let sq_feet = value_m2 * SQUARE_FEET_PER_SQUARE_METER;
            if sq_feet >= DISPLAY_AC_THRESHOLD_FT2 {
                format!("{:.2} ac", sq_feet / DISPLAY_AC_THRESHOLD_FT2)
            } else {
                format!("{sq_feet:.2} ft²")
            }
        }
        _ => {
            if value_m2 >= DISPLAY_HA_THRESHOLD_M2 {
                format!("{:.2} ha", value_m2 / DISPLAY_HA_THRESHOLD_M2)
            } else {
                format!("{value_m2:.2} m²")
            }
        }
    }
}
