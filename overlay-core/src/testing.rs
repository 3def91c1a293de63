//! Test doubles shared by the module tests.

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;

use crate::{
    error::FetchError,
    model::{Coordinate, WeatherReading},
    provider::WeatherSource,
    render::{MapRenderer, MarkerSpec, PanelView},
};

pub fn reading(code: i32, temperature: f64) -> WeatherReading {
    WeatherReading {
        observed_at: "2025-01-05T14:15".to_string(),
        temperature: Some(temperature),
        temperature_unit: "°C".to_string(),
        weather_code: Some(code),
        wind_speed: Some(3.4),
        wind_speed_unit: "km/h".to_string(),
    }
}

type Scripted<T> = (Duration, Result<T, FetchError>);

/// Weather source answering from scripted queues. With nothing scripted,
/// single fetches return clear sky at 18.2 °C and batches fill every slot.
#[derive(Debug, Default)]
pub struct FakeSource {
    single: Mutex<VecDeque<Scripted<WeatherReading>>>,
    batch: Mutex<VecDeque<Scripted<()>>>,
    single_calls: Mutex<Vec<Coordinate>>,
    batch_calls: Mutex<Vec<usize>>,
}

impl FakeSource {
    pub fn push_single(&self, delay: Duration, result: Result<WeatherReading, FetchError>) {
        self.single.lock().unwrap().push_back((delay, result));
    }

    /// `Ok(())` answers with a full batch.
    pub fn push_batch(&self, delay: Duration, result: Result<(), FetchError>) {
        self.batch.lock().unwrap().push_back((delay, result));
    }

    pub fn single_calls(&self) -> Vec<Coordinate> {
        self.single_calls.lock().unwrap().clone()
    }

    pub fn batch_calls(&self) -> usize {
        self.batch_calls.lock().unwrap().len()
    }

    pub fn batch_sizes(&self) -> Vec<usize> {
        self.batch_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl WeatherSource for FakeSource {
    async fn fetch_single(&self, at: Coordinate) -> Result<WeatherReading, FetchError> {
        self.single_calls.lock().unwrap().push(at);
        let scripted = self.single.lock().unwrap().pop_front();
        let (delay, result) = scripted.unwrap_or((Duration::ZERO, Ok(reading(0, 18.2))));
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        result
    }

    async fn fetch_batch(
        &self,
        points: &[Coordinate],
    ) -> Result<Vec<Option<WeatherReading>>, FetchError> {
        self.batch_calls.lock().unwrap().push(points.len());
        let scripted = self.batch.lock().unwrap().pop_front();
        let (delay, result) = scripted.unwrap_or((Duration::ZERO, Ok(())));
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        result.map(|()| points.iter().map(|_| Some(reading(1, 9.0))).collect())
    }
}

#[derive(Debug, Default)]
struct RenderLog {
    layer: Vec<MarkerSpec>,
    clears: usize,
    panels: Vec<PanelView>,
}

/// Renderer that remembers what is currently drawn. Clones share state.
#[derive(Debug, Default, Clone)]
pub struct RecordingRenderer {
    log: Arc<Mutex<RenderLog>>,
}

impl RecordingRenderer {
    pub fn markers(&self) -> Vec<MarkerSpec> {
        self.log.lock().unwrap().layer.clone()
    }

    pub fn clears(&self) -> usize {
        self.log.lock().unwrap().clears
    }

    pub fn panels(&self) -> Vec<PanelView> {
        self.log.lock().unwrap().panels.clone()
    }

    pub fn last_panel(&self) -> Option<PanelView> {
        self.log.lock().unwrap().panels.last().cloned()
    }
}

impl MapRenderer for RecordingRenderer {
    fn clear_layer(&mut self) {
        let mut log = self.log.lock().unwrap();
        log.layer.clear();
        log.clears += 1;
    }

    fn add_marker(&mut self, marker: &MarkerSpec) {
        self.log.lock().unwrap().layer.push(marker.clone());
    }

    fn set_panel(&mut self, panel: &PanelView) {
        self.log.lock().unwrap().panels.push(panel.clone());
    }
}
