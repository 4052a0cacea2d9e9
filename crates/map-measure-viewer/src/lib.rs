//! Map Measure Viewer - walkers/egui map integration
//!
//! Adapts the measurement engine's retained overlay model to the
//! immediate-mode `walkers` map widget: [`OverlayStore`] implements the
//! engine's `MapBackend` by retaining overlays, and [`MeasurementPlugin`]
//! paints the retained set on the map each frame.
//!
//! ```ignore
//! let display: SharedDisplay = Arc::new(RwLock::new(MeasurementDisplay::new()));
//! display.write().unwrap().set_map(OverlayStore::new());
//! // each frame:
//! Map::new(Some(&mut tiles), &mut map_memory, position)
//!     .with_plugin(MeasurementPlugin::new(display.clone()))
//!     .ui(ui);
//! ```

mod plugin;
mod store;

pub use plugin::{MeasurementPlugin, SharedDisplay, parse_hex_color};
pub use store::{OverlayGeometry, OverlayHandle, OverlayStore, RetainedOverlay, Tooltip};
