//! Core library for the weather map overlay.
//!
//! This crate defines:
//! - The overlay controller: center-point weather with debounced refresh and
//!   nationwide markers shown below a zoom threshold
//! - The session-long nationwide snapshot cache
//! - An Open-Meteo client behind the `WeatherSource` trait
//! - Weather code tables, the region catalog and render projections
//!
//! It is used by `overlay-cli`, but any map front end can drive it by feeding
//! a `ViewportTracker` and implementing `MapRenderer`.

pub mod cache;
pub mod catalog;
pub mod codes;
pub mod config;
pub mod controller;
pub mod debounce;
pub mod error;
pub mod model;
pub mod provider;
pub mod render;
pub mod state;
pub mod viewport;

#[cfg(test)]
mod testing;

pub use cache::{NationwideCache, NationwideSnapshot, RegionWeather};
pub use catalog::RegionCatalog;
pub use codes::{IconDescriptor, code_to_icon, code_to_text};
pub use config::Config;
pub use controller::{ControllerSettings, OverlayController, OverlayHandle};
pub use error::FetchError;
pub use model::{Coordinate, RegionPoint, Viewport, WeatherReading};
pub use provider::{WeatherSource, source_from_config};
pub use render::{MapRenderer, MarkerSpec, PanelView};
pub use state::{CenterPhase, CenterWeatherState, OverlayState, Visibility};
pub use viewport::{ViewportSignal, ViewportSubscription, ViewportTracker};
