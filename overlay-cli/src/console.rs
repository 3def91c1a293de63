use chrono::Local;
use overlay_core::{MapRenderer, MarkerSpec, PanelView};

/// Prints render commands to stdout as they arrive.
#[derive(Debug, Default)]
pub struct ConsoleRenderer {
    markers: usize,
    verbose: bool,
}

impl ConsoleRenderer {
    pub fn new(verbose: bool) -> Self {
        Self {
            markers: 0,
            verbose,
        }
    }
}

fn stamp() -> String {
    Local::now().format("%H:%M:%S%.3f").to_string()
}

pub fn format_panel(panel: &PanelView) -> String {
    if let Some(err) = &panel.error {
        return err.clone();
    }

    let mut parts = Vec::new();
    if let Some(condition) = &panel.condition {
        parts.push(condition.clone());
    }
    if let Some(temp) = &panel.temperature {
        parts.push(temp.clone());
    }
    if let Some(wind) = &panel.wind {
        parts.push(format!("風速 {wind}"));
    }
    if let Some(at) = &panel.observed_at {
        parts.push(format!("({at})"));
    }
    if panel.loading {
        parts.push("取得中…".to_string());
    }
    if parts.is_empty() {
        parts.push("-".to_string());
    }
    parts.join("  ")
}

pub fn format_marker(marker: &MarkerSpec) -> String {
    format!(
        "{:<12} {:<18} {:<10} {}",
        marker.popup.title, marker.icon.icon, marker.popup.temperature, marker.popup.condition
    )
}

impl MapRenderer for ConsoleRenderer {
    fn clear_layer(&mut self) {
        if self.markers > 0 {
            println!("{} [layer] cleared {} markers", stamp(), self.markers);
        }
        self.markers = 0;
    }

    fn add_marker(&mut self, marker: &MarkerSpec) {
        self.markers += 1;
        if self.verbose {
            println!("{} [marker] {}", stamp(), format_marker(marker));
        } else if self.markers == 1 {
            println!("{} [layer] drawing nationwide markers", stamp());
        }
    }

    fn set_panel(&mut self, panel: &PanelView) {
        println!("{} [panel] {}", stamp(), format_panel(panel));
    }
}
