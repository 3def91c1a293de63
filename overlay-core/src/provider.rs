use crate::{
    Config,
    error::FetchError,
    model::{Coordinate, WeatherReading},
    provider::openmeteo::OpenMeteoProvider,
};
use anyhow::Context;
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

pub mod openmeteo;

/// A "current conditions" endpoint.
#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    /// Current conditions at one point.
    async fn fetch_single(&self, at: Coordinate) -> Result<WeatherReading, FetchError>;

    /// Current conditions at many points in one request.
    ///
    /// All-or-nothing: on success the result has exactly `points.len()`
    /// entries and entry `i` belongs to `points[i]`. An entry is `None` when
    /// the endpoint had nothing usable for that point.
    async fn fetch_batch(
        &self,
        points: &[Coordinate],
    ) -> Result<Vec<Option<WeatherReading>>, FetchError>;
}

/// Construct the configured weather source.
pub fn source_from_config(config: &Config) -> anyhow::Result<Arc<dyn WeatherSource>> {
    config.validate()?;

    let provider = OpenMeteoProvider::new(
        config.endpoint.clone(),
        config.timezone.clone(),
        config.request_timeout(),
    )
    .with_context(|| format!("Failed to set up weather source for {}", config.endpoint))?;

    Ok(Arc::new(provider))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn trait_is_object_safe_and_shareable() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn WeatherSource>();
    }

    #[test]
    fn source_from_default_config() {
        let source = source_from_config(&Config::default());
        assert!(source.is_ok());
    }

    #[test]
    fn source_from_config_rejects_invalid_config() {
        let cfg = Config {
            request_timeout_secs: 0,
            ..Config::default()
        };
        let err = source_from_config(&cfg).unwrap_err();
        assert!(err.to_string().contains("request_timeout_secs"));
    }
}
