//! Retained overlay store
//!
//! An immediate-mode map repaints every frame, while the measurement display
//! expects a retained overlay surface with stable handles (create, restyle,
//! remove). [`OverlayStore`] bridges the two: it implements [`MapBackend`] by
//! retaining geometry, style, and tooltip per handle, and the rendering
//! plugin paints the retained set each frame in insertion order.

use geo::Point;
use indexmap::IndexMap;
use map_measure_lib::{MapBackend, OverlayStyle};

/// Stable handle to a retained overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OverlayHandle(u64);

/// Geometry of a retained overlay
#[derive(Debug, Clone)]
pub enum OverlayGeometry {
    /// Open polyline through the points
    Polyline(Vec<Point<f64>>),
    /// Closed polygon ring through the points
    Polygon(Vec<Point<f64>>),
}

/// Permanent label anchored at a geographic coordinate
#[derive(Debug, Clone)]
pub struct Tooltip {
    pub text: String,
    pub anchor: Point<f64>,
}

/// A single retained overlay: geometry plus presentation state
#[derive(Debug, Clone)]
pub struct RetainedOverlay {
    pub geometry: OverlayGeometry,
    pub style: OverlayStyle,
    pub tooltip: Option<Tooltip>,
}

/// Insertion-ordered set of retained overlays keyed by handle
#[derive(Debug, Default)]
pub struct OverlayStore {
    overlays: IndexMap<u64, RetainedOverlay>,
    next_handle: u64,
}

impl OverlayStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of retained overlays
    #[inline]
    pub fn len(&self) -> usize {
        self.overlays.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.overlays.is_empty()
    }

    /// Iterate the retained overlays in insertion (paint) order
    pub fn iter(&self) -> impl Iterator<Item = &RetainedOverlay> {
        self.overlays.values()
    }

    fn insert(&mut self, geometry: OverlayGeometry, style: &OverlayStyle) -> OverlayHandle {
        self.next_handle += 1;
        let handle = self.next_handle;
        self.overlays.insert(
            handle,
            RetainedOverlay {
                geometry,
                style: style.clone(),
                tooltip: None,
            },
        );
        OverlayHandle(handle)
    }
}

impl MapBackend for OverlayStore {
    type Overlay = OverlayHandle;

    fn polyline(&mut self, points: &[Point<f64>], style: &OverlayStyle) -> OverlayHandle {
        self.insert(OverlayGeometry::Polyline(points.to_vec()), style)
    }

    fn polygon(&mut self, points: &[Point<f64>], style: &OverlayStyle) -> OverlayHandle {
        self.insert(OverlayGeometry::Polygon(points.to_vec()), style)
    }

    fn bind_tooltip(&mut self, overlay: &mut OverlayHandle, text: &str, anchor: Point<f64>) {
        if let Some(retained) = self.overlays.get_mut(&overlay.0) {
            retained.tooltip = Some(Tooltip {
                text: text.to_string(),
                anchor,
            });
        }
    }

    fn set_style(&mut self, overlay: &mut OverlayHandle, style: &OverlayStyle) {
        if let Some(retained) = self.overlays.get_mut(&overlay.0) {
            retained.style = style.clone();
        }
    }

    fn remove_layer(&mut self, overlay: OverlayHandle) {
        if self.overlays.shift_remove(&overlay.0).is_none() {
            tracing::warn!(handle = overlay.0, "removing an overlay that is not in the store");
        }
    }
}
