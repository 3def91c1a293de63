use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    error::FetchError,
    model::{Coordinate, DEFAULT_TEMPERATURE_UNIT, DEFAULT_WIND_SPEED_UNIT, WeatherReading},
};

use super::WeatherSource;

pub const DEFAULT_ENDPOINT: &str = "https://api.open-meteo.com/v1/forecast";

const SINGLE_FIELDS: &str = "temperature_2m,weather_code,wind_speed_10m";
const BATCH_FIELDS: &str = "temperature_2m,weather_code";

#[derive(Debug, Clone)]
pub struct OpenMeteoProvider {
    endpoint: String,
    timezone: String,
    http: Client,
}

impl OpenMeteoProvider {
    pub fn new(endpoint: String, timezone: String, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            endpoint,
            timezone,
            http,
        })
    }

    async fn get(&self, params: &[(&'static str, String)]) -> Result<String, FetchError> {
        let res = self.http.get(&self.endpoint).query(params).send().await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            log::warn!(
                "Open-Meteo request failed with status {}: {}",
                status,
                truncate_body(&body)
            );
            return Err(FetchError::Http {
                status: status.as_u16(),
            });
        }

        Ok(body)
    }
}

#[async_trait]
impl WeatherSource for OpenMeteoProvider {
    async fn fetch_single(&self, at: Coordinate) -> Result<WeatherReading, FetchError> {
        let body = self.get(&single_params(at, &self.timezone)).await?;
        parse_single(&body)
    }

    async fn fetch_batch(
        &self,
        points: &[Coordinate],
    ) -> Result<Vec<Option<WeatherReading>>, FetchError> {
        if points.is_empty() {
            return Ok(Vec::new());
        }

        let body = self.get(&batch_params(points, &self.timezone)).await?;
        parse_batch(&body, points.len())
    }
}

fn single_params(at: Coordinate, timezone: &str) -> Vec<(&'static str, String)> {
    query(&[at], SINGLE_FIELDS, timezone)
}

fn batch_params(points: &[Coordinate], timezone: &str) -> Vec<(&'static str, String)> {
    query(points, BATCH_FIELDS, timezone)
}

fn query(points: &[Coordinate], fields: &str, timezone: &str) -> Vec<(&'static str, String)> {
    let rounded: Vec<Coordinate> = points.iter().map(|c| c.rounded()).collect();

    vec![
        ("latitude", join_axis(&rounded, |c| c.lat)),
        ("longitude", join_axis(&rounded, |c| c.lon)),
        ("current", fields.to_string()),
        ("timezone", timezone.to_string()),
    ]
}

fn join_axis(points: &[Coordinate], axis: impl Fn(&Coordinate) -> f64) -> String {
    points
        .iter()
        .map(|c| format!("{:.5}", axis(c)))
        .collect::<Vec<_>>()
        .join(",")
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OmBody {
    Many(Vec<OmPoint>),
    One(OmPoint),
}

#[derive(Debug, Deserialize)]
struct OmPoint {
    current: Option<OmCurrent>,
    current_units: Option<OmUnits>,
}

#[derive(Debug, Deserialize)]
struct OmCurrent {
    time: String,
    temperature_2m: Option<f64>,
    weather_code: Option<i32>,
    wind_speed_10m: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct OmUnits {
    temperature_2m: Option<String>,
    wind_speed_10m: Option<String>,
}

impl OmPoint {
    fn into_reading(self) -> Option<WeatherReading> {
        let current = self.current?;
        let units = self.current_units.unwrap_or_default();

        Some(WeatherReading {
            observed_at: current.time,
            temperature: current.temperature_2m,
            temperature_unit: units
                .temperature_2m
                .unwrap_or_else(|| DEFAULT_TEMPERATURE_UNIT.to_string()),
            weather_code: current.weather_code,
            wind_speed: current.wind_speed_10m,
            wind_speed_unit: units
                .wind_speed_10m
                .unwrap_or_else(|| DEFAULT_WIND_SPEED_UNIT.to_string()),
        })
    }
}

fn parse_single(body: &str) -> Result<WeatherReading, FetchError> {
    let point = match serde_json::from_str::<OmBody>(body)? {
        OmBody::One(point) => point,
        OmBody::Many(mut points) if points.len() == 1 => points.remove(0),
        OmBody::Many(points) => {
            return Err(FetchError::Parse(format!(
                "expected one point, got {}",
                points.len()
            )));
        }
    };

    point
        .into_reading()
        .ok_or_else(|| FetchError::Parse("response has no `current` block".to_string()))
}

fn parse_batch(body: &str, expected: usize) -> Result<Vec<Option<WeatherReading>>, FetchError> {
    match serde_json::from_str::<OmBody>(body)? {
        OmBody::Many(points) => {
            if points.len() != expected {
                return Err(FetchError::Parse(format!(
                    "expected {expected} points, got {}",
                    points.len()
                )));
            }
            Ok(points.into_iter().map(OmPoint::into_reading).collect())
        }
        OmBody::One(point) => {
            let reading = point.into_reading().ok_or_else(|| {
                FetchError::Parse("single-object batch reply has no `current` block".to_string())
            })?;
            if expected > 1 {
                log::warn!(
                    "Open-Meteo answered a {expected}-point request with a single object; \
                     only the first point is populated"
                );
            }
            let mut readings = vec![None; expected];
            if let Some(first) = readings.first_mut() {
                *first = Some(reading);
            }
            Ok(readings)
        }
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
