use serde::Serialize;

use crate::{codes::code_to_text, error::FetchError, model::WeatherReading, render::PanelView};

/// Prefix of the panel message shown when the center fetch fails.
pub const CENTER_ERROR_PREFIX: &str = "取得失敗: ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CenterPhase {
    Idle,
    Loading,
    Ready,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
enum CenterOutcome {
    #[default]
    Empty,
    Ready {
        reading: WeatherReading,
        text: String,
    },
    Failed {
        message: String,
    },
}

/// What the center panel knows. A reading and an error never coexist;
/// `loading` can overlap either while a newer fetch is outstanding.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct CenterWeatherState {
    outcome: CenterOutcome,
    loading: bool,
}

impl CenterWeatherState {
    pub fn reading(&self) -> Option<&WeatherReading> {
        match &self.outcome {
            CenterOutcome::Ready { reading, .. } => Some(reading),
            _ => None,
        }
    }

    pub fn display_text(&self) -> &str {
        match &self.outcome {
            CenterOutcome::Ready { text, .. } => text,
            _ => "",
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.outcome {
            CenterOutcome::Failed { message } => Some(message),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn phase(&self) -> CenterPhase {
        match (&self.outcome, self.loading) {
            (_, true) => CenterPhase::Loading,
            (CenterOutcome::Empty, false) => CenterPhase::Idle,
            (CenterOutcome::Ready { .. }, false) => CenterPhase::Ready,
            (CenterOutcome::Failed { .. }, false) => CenterPhase::Failed,
        }
    }

    /// A fetch went out. The previous reading stays on screen; a previous
    /// error does not.
    pub(crate) fn begin_loading(&mut self) {
        if matches!(self.outcome, CenterOutcome::Failed { .. }) {
            self.outcome = CenterOutcome::Empty;
        }
        self.loading = true;
    }

    /// Record a finished fetch. Loading ends either way; an error replaces
    /// whatever reading was shown.
    pub fn apply(&mut self, result: Result<WeatherReading, FetchError>) {
        self.outcome = match result {
            Ok(reading) => {
                let text = code_to_text(reading.weather_code);
                CenterOutcome::Ready { reading, text }
            }
            Err(err) => CenterOutcome::Failed {
                message: format!("{CENTER_ERROR_PREFIX}{err}"),
            },
        };
        self.loading = false;
    }

    pub fn panel(&self) -> PanelView {
        let reading = self.reading();
        PanelView {
            loading: self.loading,
            condition: reading.map(|_| self.display_text().to_string()),
            temperature: reading.map(WeatherReading::temperature_text),
            wind: reading.map(WeatherReading::wind_text),
            observed_at: reading.map(|r| match r.observed_time() {
                Some(t) => t.format("%m/%d %H:%M").to_string(),
                None => r.observed_at.clone(),
            }),
            error: self.error_message().map(str::to_string),
        }
    }
}

/// Whether nationwide markers belong on the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Visibility {
    #[default]
    Hidden,
    Shown,
}

impl Visibility {
    pub fn for_zoom(zoom: u8, threshold: u8) -> Self {
        if zoom <= threshold {
            Visibility::Shown
        } else {
            Visibility::Hidden
        }
    }
}

/// Everything the controller owns that rendering is derived from.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct OverlayState {
    pub zoom: u8,
    pub center: CenterWeatherState,
    pub nationwide: Visibility,
}
