use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Decimal digits kept when a coordinate is sent to the weather endpoint.
pub const COORD_DECIMALS: i32 = 5;

pub const DEFAULT_TEMPERATURE_UNIT: &str = "°C";
pub const DEFAULT_WIND_SPEED_UNIT: &str = "km/h";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Coordinate rounded to [`COORD_DECIMALS`] digits.
    pub fn rounded(self) -> Self {
        let factor = 10f64.powi(COORD_DECIMALS);
        Self {
            lat: (self.lat * factor).round() / factor,
            lon: (self.lon * factor).round() / factor,
        }
    }

    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lon)
    }
}

/// Map viewport: center and integer zoom level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub center_lat: f64,
    pub center_lon: f64,
    pub zoom: u8,
}

impl Viewport {
    pub fn new(center_lat: f64, center_lon: f64, zoom: u8) -> Self {
        Self {
            center_lat,
            center_lon,
            zoom,
        }
    }

    pub fn center(&self) -> Coordinate {
        Coordinate::new(self.center_lat, self.center_lon)
    }
}

/// One representative point of the nationwide layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RegionPoint {
    pub id: u8,
    pub label: &'static str,
    pub city: &'static str,
    pub lat: f64,
    pub lon: f64,
}

impl RegionPoint {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lon)
    }
}

/// Current conditions at one point, as reported by the endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    /// Local time string as sent by the endpoint, e.g. `2025-01-05T14:15`.
    pub observed_at: String,
    pub temperature: Option<f64>,
    pub temperature_unit: String,
    pub weather_code: Option<i32>,
    pub wind_speed: Option<f64>,
    pub wind_speed_unit: String,
}

impl WeatherReading {
    pub fn temperature_text(&self) -> String {
        measurement(self.temperature, &self.temperature_unit)
    }

    pub fn wind_text(&self) -> String {
        measurement(self.wind_speed, &self.wind_speed_unit)
    }

    pub fn observed_time(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.observed_at, "%Y-%m-%dT%H:%M")
            .or_else(|_| NaiveDateTime::parse_from_str(&self.observed_at, "%Y-%m-%dT%H:%M:%S"))
            .ok()
    }
}

fn measurement(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(v) => format!("{v} {unit}"),
        None => format!("- {unit}"),
    }
}
