//! Stateful measurement collection and in-progress drawing buffer
//!
//! [`MeasurementManager`] owns the canonical collection of finalized
//! measurements (insertion-ordered, keyed by id) plus the buffer of points
//! the user is currently drawing. Consumers subscribe for a snapshot of the
//! collection after every mutation. Managers are plain values: instantiate
//! one per map and pass it where it is needed, there is no ambient singleton.

use geo::Point;
use indexmap::IndexMap;

use crate::geodesic::{self, point_from_lng_lat};
use crate::measurement::{Measurement, generate_measurement_id};
use crate::units::{MeasurementUnit, UnitSystem};

/// Handle returned by [`MeasurementManager::subscribe`], used to cancel the
/// subscription later
pub type SubscriptionId = u64;

type Listener = Box<dyn FnMut(&[Measurement])>;

/// Partial update merged into a stored measurement
///
/// Unset fields keep their current value. `formatted` is deliberately absent:
/// it is a derived cache and is re-computed after every merge.
#[derive(Default)]
pub struct MeasurementUpdate {
    pub points: Option<Vec<Point<f64>>>,
    pub value: Option<f64>,
    pub unit_system: Option<UnitSystem>,
    pub label: Option<String>,
    pub color: Option<String>,
}

/// Owner of the live measurement collection and the current drawing buffer
pub struct MeasurementManager {
    current_points: Vec<Point<f64>>,
    measurements: IndexMap<String, Measurement>,
    active_unit: MeasurementUnit,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: SubscriptionId,
}

impl Default for MeasurementManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl MeasurementManager {
    pub fn new() -> Self {
        Self {
            current_points: Vec::new(),
            measurements: IndexMap::new(),
            active_unit: MeasurementUnit::Meters,
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    // --- In-progress drawing buffer ---

    /// Append a point to the current drawing. No upper bound is enforced.
    pub fn add_point(&mut self, point: Point<f64>) {
        self.current_points.push(point);
    }

    /// Append a GeoJSON-ordered `[lng, lat]` pair to the current drawing
    ///
    /// The explicit boundary adapter for callers holding tuple-ordered
    /// coordinates; internally everything is a [`Point`].
    pub fn add_point_lng_lat(&mut self, lng_lat: [f64; 2]) {
        self.add_point(point_from_lng_lat(lng_lat));
    }

    /// The points of the in-progress drawing, in insertion order
    #[inline]
    pub fn current_points(&self) -> &[Point<f64>] {
        &self.current_points
    }

    /// Perimeter of the in-progress drawing treated as a closed ring, in
    /// meters; 0 for fewer than 3 points
    pub fn current_perimeter(&self) -> f64 {
        geodesic::ring_perimeter(&self.current_points)
    }

    /// Area of the in-progress drawing treated as a closed ring, in square
    /// meters; 0 for fewer than 3 points
    pub fn current_area(&self) -> f64 {
        geodesic::ring_area(&self.current_points)
    }

    /// Reset the in-progress drawing without touching stored measurements
    pub fn clear_current_drawing(&mut self) {
        self.current_points.clear();
    }

    // --- Measurement collection ---

    /// Store a finalized measurement and notify subscribers
    ///
    /// Assigns a generated id when the measurement has none. Returns the
    /// stored measurement, id included.
    pub fn add_measurement(&mut self, mut measurement: Measurement) -> Measurement {
        let id = measurement
            .id
            .get_or_insert_with(generate_measurement_id)
            .clone();
        tracing::debug!(id = %id, kind = ?measurement.kind, "adding measurement");
        self.measurements.insert(id, measurement.clone());
        self.notify();
        measurement
    }

    /// Look up a stored measurement by id
    #[inline]
    pub fn get_measurement(&self, id: &str) -> Option<&Measurement> {
        self.measurements.get(id)
    }

    /// Snapshot of all stored measurements in insertion order
    pub fn all_measurements(&self) -> Vec<Measurement> {
        self.measurements.values().cloned().collect()
    }

    /// Number of stored measurements
    #[inline]
    pub fn len(&self) -> usize {
        self.measurements.len()
    }

    /// Whether the collection is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.measurements.is_empty()
    }

    /// Merge a partial update into a stored measurement and notify
    ///
    /// Re-derives the `formatted` cache after the merge. Returns the updated
    /// measurement, or `None` (without notifying) for an unknown id.
    pub fn update_measurement(
        &mut self,
        id: &str,
        update: MeasurementUpdate,
    ) -> Option<Measurement> {
        let measurement = self.measurements.get_mut(id)?;
        if let Some(points) = update.points {
            measurement.points = points;
        }
        if let Some(value) = update.value {
            measurement.value = value;
        }
        if let Some(unit_system) = update.unit_system {
            measurement.unit_system = unit_system;
        }
        if let Some(label) = update.label {
            measurement.label = Some(label);
        }
        if let Some(color) = update.color {
            measurement.color = Some(color);
        }
        measurement.recompute_formatted();
        let updated = measurement.clone();
        tracing::debug!(id, "updated measurement");
        self.notify();
        Some(updated)
    }

    /// Remove a stored measurement; false for an unknown id
    pub fn remove_measurement(&mut self, id: &str) -> bool {
        // shift_remove keeps the remaining insertion order intact
        let removed = self.measurements.shift_remove(id).is_some();
        if removed {
            tracing::debug!(id, "removed measurement");
            self.notify();
        }
        removed
    }

    /// Remove every stored measurement, leaving the drawing buffer intact
    pub fn clear_measurements(&mut self) {
        self.measurements.clear();
        tracing::debug!("cleared measurement collection");
        self.notify();
    }

    /// Destructive full reset: clears the drawing buffer AND every stored
    /// measurement
    ///
    /// Prefer [`Self::clear_current_drawing`] or [`Self::clear_measurements`]
    /// unless both effects are wanted.
    pub fn clear(&mut self) {
        self.clear_current_drawing();
        self.clear_measurements();
    }

    // --- Active display unit ---

    /// Track the globally active display unit
    ///
    /// Stored measurements are not recomputed; the unit only informs
    /// consumers formatting values for display.
    pub fn set_active_unit(&mut self, unit: MeasurementUnit) {
        self.active_unit = unit;
    }

    #[inline]
    pub fn active_unit(&self) -> MeasurementUnit {
        self.active_unit
    }

    // --- Subscriptions ---

    /// Subscribe to collection changes
    ///
    /// The listener receives an insertion-ordered snapshot after every
    /// mutating collection operation, synchronously and in registration
    /// order. Mutating the manager from inside a listener cannot compile
    /// (every mutating operation takes `&mut self`), so notification is never
    /// reentrant.
    pub fn subscribe(&mut self, listener: impl FnMut(&[Measurement]) + 'static) -> SubscriptionId {
        let id = self.next_subscription;
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Cancel a subscription; false if the id is unknown
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    fn notify(&mut self) {
        if self.listeners.is_empty() {
            return;
        }
        let snapshot: Vec<Measurement> = self.measurements.values().cloned().collect();
        for (_, listener) in &mut self.listeners {
            listener(&snapshot);
        }
    }
}
