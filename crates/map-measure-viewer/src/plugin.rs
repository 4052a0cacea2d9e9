//! Walkers plugin for painting measurement overlays on the map view
//!
//! The plugin shares a [`MeasurementDisplay`] (over the retained
//! [`OverlayStore`]) with the rest of the application and paints the retained
//! overlays each frame: polylines and filled polygons projected to screen
//! space, plus tooltip labels at their geographic anchors.

use std::sync::{Arc, RwLock};

use egui::{Color32, CornerRadius, FontId, Pos2, Stroke};
use geo::Point;
use map_measure_lib::{MeasureError, MeasurementDisplay};
use walkers::{Plugin, Projector};

use crate::store::{OverlayGeometry, OverlayStore, RetainedOverlay};

/// Display handle shared between the application and the plugin
pub type SharedDisplay = Arc<RwLock<MeasurementDisplay<OverlayStore>>>;

/// Plugin for rendering measurement overlays on the map
pub struct MeasurementPlugin {
    /// Reference to the shared measurement display
    display: SharedDisplay,
    /// Font used for tooltip labels
    tooltip_font: FontId,
}

impl MeasurementPlugin {
    /// Create a new measurement plugin over a shared display
    pub fn new(display: SharedDisplay) -> Self {
        Self {
            display,
            tooltip_font: FontId::proportional(12.0),
        }
    }

    /// Render a single retained overlay
    fn render_overlay(
        &self,
        overlay: &RetainedOverlay,
        projector: &Projector,
        painter: &egui::Painter,
    ) {
        let stroke_color =
            parse_hex_color(&overlay.style.color).unwrap_or(Color32::from_rgb(0x33, 0x88, 0xff));
        let stroke = Stroke::new(overlay.style.weight, stroke_color);

        match &overlay.geometry {
            OverlayGeometry::Polyline(points) => {
                let screen_points = project_points(points, projector);
                if screen_points.len() >= 2 {
                    painter.add(egui::Shape::line(screen_points, stroke));
                }
            }
            OverlayGeometry::Polygon(points) => {
                let screen_points = project_points(points, projector);
                if screen_points.len() >= 3 {
                    let fill = parse_hex_color(&overlay.style.fill_color)
                        .unwrap_or(stroke_color)
                        .gamma_multiply(overlay.style.fill_opacity);
                    painter.add(egui::Shape::Path(egui::epaint::PathShape {
                        points: screen_points,
                        closed: true,
                        fill,
                        stroke: stroke.into(),
                    }));
                }
            }
        }

        if let Some(tooltip) = &overlay.tooltip {
            self.render_tooltip(&tooltip.text, tooltip.anchor, projector, painter);
        }
    }

    /// Paint a permanent tooltip label at a geographic anchor
    fn render_tooltip(
        &self,
        text: &str,
        anchor: Point<f64>,
        projector: &Projector,
        painter: &egui::Painter,
    ) {
        let screen_pos = project_point(anchor, projector);
        let galley = painter.layout_no_wrap(
            text.to_string(),
            self.tooltip_font.clone(),
            Color32::from_gray(40),
        );
        let rect = egui::Rect::from_center_size(screen_pos, galley.size() + egui::vec2(8.0, 4.0));
        painter.rect_filled(rect, CornerRadius::same(3), Color32::from_white_alpha(230));
        painter.galley(
            rect.min + egui::vec2(4.0, 2.0),
            galley,
            Color32::from_gray(40),
        );
    }
}

impl Plugin for MeasurementPlugin {
    fn run(
        self: Box<Self>,
        ui: &mut egui::Ui,
        _response: &egui::Response,
        projector: &Projector,
        _map_memory: &walkers::MapMemory,
    ) {
        profiling::scope!("MeasurementPlugin::run");

        let display = match self.display.read() {
            Ok(display) => display,
            Err(_) => {
                tracing::warn!("measurement display lock poisoned; skipping frame");
                return;
            }
        };
        let Some(store) = display.map() else {
            return;
        };

        let painter = ui.painter();
        for overlay in store.iter() {
            self.render_overlay(overlay, projector, painter);
        }
    }
}

/// Convert a WGS84 point to screen space
#[inline]
fn project_point(point: Point<f64>, projector: &Projector) -> Pos2 {
    let position = walkers::lat_lon(point.y(), point.x());
    let screen_vec = projector.project(position);
    Pos2::new(screen_vec.x, screen_vec.y)
}

fn project_points(points: &[Point<f64>], projector: &Projector) -> Vec<Pos2> {
    points
        .iter()
        .map(|point| project_point(*point, projector))
        .collect()
}

/// Parse a `#rrggbb` color string into an opaque [`Color32`]
pub fn parse_hex_color(color: &str) -> map_measure_lib::Result<Color32> {
    let hex = color
        .strip_prefix('#')
        .ok_or_else(|| MeasureError::InvalidColor(color.to_string()))?;
    if hex.len() != 6 || !hex.is_ascii() {
        return Err(MeasureError::InvalidColor(color.to_string()));
    }
    let parse_channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&hex[range], 16)
            .map_err(|_| MeasureError::InvalidColor(color.to_string()))
    };
    Ok(Color32::from_rgb(
        parse_channel(0..2)?,
        parse_channel(2..4)?,
        parse_channel(4..6)?,
    ))
}
