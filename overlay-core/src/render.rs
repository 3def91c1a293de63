//! Render commands and the projections that feed them.
//!
//! Markers are always redrawn wholesale (clear, then add every marker), so
//! issuing the same commands twice leaves the map unchanged.

use std::fmt::Debug;

use serde::Serialize;

use crate::{
    cache::NationwideSnapshot,
    codes::{IconDescriptor, code_to_icon},
    model::DEFAULT_TEMPERATURE_UNIT,
};

pub const MARKER_WIDTH: u32 = 64;
pub const MARKER_HEIGHT: u32 = 54;
pub const BUBBLE_SIZE: u32 = 40;

/// Drawing surface the overlay talks to.
pub trait MapRenderer: Send + Debug {
    /// Remove every nationwide marker.
    fn clear_layer(&mut self);

    fn add_marker(&mut self, marker: &MarkerSpec);

    /// Replace the center panel contents.
    fn set_panel(&mut self, panel: &PanelView);
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerPopup {
    pub title: String,
    pub condition: String,
    pub temperature: String,
    pub coordinates: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerSpec {
    pub region_id: u8,
    pub lat: f64,
    pub lon: f64,
    /// Text drawn under the bubble.
    pub label: String,
    pub icon: IconDescriptor,
    /// (width, height) in pixels.
    pub size: (u32, u32),
    /// Pixel inside the marker box pinned to (lat, lon): the bubble center.
    pub anchor: (u32, u32),
    pub popup: MarkerPopup,
}

/// Center panel contents.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct PanelView {
    pub loading: bool,
    pub condition: Option<String>,
    pub temperature: Option<String>,
    pub wind: Option<String>,
    pub observed_at: Option<String>,
    pub error: Option<String>,
}

pub fn project_markers(snapshot: &NationwideSnapshot) -> Vec<MarkerSpec> {
    snapshot
        .entries()
        .iter()
        .map(|entry| {
            let region = &entry.region;
            let reading = entry.reading.as_ref();
            let icon = code_to_icon(reading.and_then(|r| r.weather_code));

            let temperature = match reading {
                Some(r) => r.temperature_text(),
                None => format!("- {DEFAULT_TEMPERATURE_UNIT}"),
            };

            MarkerSpec {
                region_id: region.id,
                lat: region.lat,
                lon: region.lon,
                label: region.label.to_string(),
                popup: MarkerPopup {
                    title: format!("{}（{}）", region.label, region.city),
                    condition: icon.label.clone(),
                    temperature,
                    coordinates: format!("{:.6}, {:.6}", region.lat, region.lon),
                },
                icon,
                size: (MARKER_WIDTH, MARKER_HEIGHT),
                anchor: (MARKER_WIDTH / 2, BUBBLE_SIZE / 2),
            }
        })
        .collect()
}

/// Replace everything on the marker layer with `markers`.
pub fn draw_markers(renderer: &mut dyn MapRenderer, markers: &[MarkerSpec]) {
    renderer.clear_layer();
    for marker in markers {
        renderer.add_marker(marker);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        catalog::RegionCatalog,
        testing::{RecordingRenderer, reading},
    };

    fn snapshot() -> NationwideSnapshot {
        let catalog = RegionCatalog::japan();
        let readings = (0..catalog.len())
            .map(|i| if i == 1 { None } else { Some(reading(3, 4.5)) })
            .collect();
        NationwideSnapshot::align(catalog.points(), readings).expect("aligned")
    }

    #[test]
    fn markers_follow_catalog_order() {
        let markers = project_markers(&snapshot());
        assert_eq!(markers.len(), 47);

        let sapporo = &markers[0];
        assert_eq!(sapporo.label, "北海道");
        assert_eq!(sapporo.popup.title, "北海道（札幌）");
        assert_eq!(sapporo.popup.coordinates, "43.063968, 141.347899");
        assert_eq!(sapporo.popup.temperature, "4.5 °C");
        assert_eq!(sapporo.icon.icon, "cloud");
        assert_eq!(sapporo.anchor, (32, 20));
        assert_eq!(sapporo.size, (64, 54));
    }

    #[test]
    fn missing_reading_still_gets_a_marker() {
        let markers = project_markers(&snapshot());
        let aomori = &markers[1];
        assert_eq!(aomori.icon.icon, "help_outline");
        assert_eq!(aomori.popup.temperature, "- °C");
        assert!(aomori.popup.condition.contains("null"));
    }

    #[test]
    fn drawing_twice_is_idempotent() {
        let markers = project_markers(&snapshot());
        let mut renderer = RecordingRenderer::default();

        draw_markers(&mut renderer, &markers);
        let first = renderer.markers();
        draw_markers(&mut renderer, &markers);

        assert_eq!(renderer.markers(), first);
        assert_eq!(renderer.markers().len(), 47);
        assert_eq!(renderer.clears(), 2);
    }
}
