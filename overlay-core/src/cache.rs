use std::{future::Future, pin::Pin, sync::Arc};

use serde::Serialize;

use crate::{
    error::FetchError,
    model::{RegionPoint, WeatherReading},
    provider::WeatherSource,
};

/// One catalog point with whatever the batch fetch returned for it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionWeather {
    pub region: RegionPoint,
    pub reading: Option<WeatherReading>,
}

/// Batch result for the whole catalog, one entry per point, catalog order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NationwideSnapshot {
    entries: Vec<RegionWeather>,
}

impl NationwideSnapshot {
    /// Pair `readings` with the points they were requested for.
    pub fn align(
        points: &[RegionPoint],
        readings: Vec<Option<WeatherReading>>,
    ) -> Result<Self, FetchError> {
        if readings.len() != points.len() {
            return Err(FetchError::Parse(format!(
                "batch returned {} entries for {} regions",
                readings.len(),
                points.len()
            )));
        }

        let entries = points
            .iter()
            .zip(readings)
            .map(|(region, reading)| RegionWeather {
                region: *region,
                reading,
            })
            .collect();

        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[RegionWeather] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries that actually carry a reading.
    pub fn populated(&self) -> usize {
        self.entries.iter().filter(|e| e.reading.is_some()).count()
    }
}

pub type RefreshFuture =
    Pin<Box<dyn Future<Output = Result<NationwideSnapshot, FetchError>> + Send>>;

/// Lazily populated, session-long holder of the nationwide snapshot.
///
/// There is no expiry: once a refresh succeeds the snapshot is served until
/// [`NationwideCache::invalidate`] or a later failed refresh clears it. At
/// most one refresh is outstanding at a time.
#[derive(Debug)]
pub struct NationwideCache {
    source: Arc<dyn WeatherSource>,
    snapshot: Option<NationwideSnapshot>,
    in_flight: bool,
}

impl NationwideCache {
    pub fn new(source: Arc<dyn WeatherSource>) -> Self {
        Self {
            source,
            snapshot: None,
            in_flight: false,
        }
    }

    pub fn get(&self) -> Option<&NationwideSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn is_refreshing(&self) -> bool {
        self.in_flight
    }

    /// Start a refresh unless a snapshot is cached or one is already running.
    ///
    /// The caller drives the returned future and hands its output to
    /// [`NationwideCache::store`].
    pub fn ensure(&mut self, points: &[RegionPoint]) -> Option<RefreshFuture> {
        if self.snapshot.is_some() || self.in_flight {
            return None;
        }
        self.in_flight = true;
        Some(self.refresh(points))
    }

    /// One batch fetch across `points`. Does not touch the cache.
    pub fn refresh(&self, points: &[RegionPoint]) -> RefreshFuture {
        let source = Arc::clone(&self.source);
        let points = points.to_vec();

        Box::pin(async move {
            let coords: Vec<_> = points.iter().map(RegionPoint::coordinate).collect();
            let readings = source.fetch_batch(&coords).await?;
            NationwideSnapshot::align(&points, readings)
        })
    }

    /// Record the outcome of a refresh started by [`NationwideCache::ensure`].
    /// A failure leaves the cache empty so the next need fetches again.
    pub fn store(
        &mut self,
        result: Result<NationwideSnapshot, FetchError>,
    ) -> Option<&NationwideSnapshot> {
        self.in_flight = false;
        match result {
            Ok(snapshot) => {
                log::info!(
                    "nationwide snapshot cached: {}/{} regions with data",
                    snapshot.populated(),
                    snapshot.len()
                );
                self.snapshot = Some(snapshot);
            }
            Err(err) => {
                log::warn!("nationwide weather fetch failed ({}): {err}", err.kind());
                self.snapshot = None;
            }
        }
        self.snapshot.as_ref()
    }

    pub fn invalidate(&mut self) {
        self.snapshot = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{catalog::RegionCatalog, testing::FakeSource};
    use std::time::Duration;

    fn cache() -> (Arc<FakeSource>, NationwideCache) {
        let source = Arc::new(FakeSource::default());
        let cache = NationwideCache::new(source.clone());
        (source, cache)
    }

    #[tokio::test]
    async fn populates_once_and_reuses() {
        let (source, mut cache) = cache();
        let catalog = RegionCatalog::japan();
        assert!(cache.get().is_none());

        let fetch = cache
            .ensure(catalog.points())
            .expect("first need starts a refresh");
        assert!(cache.is_refreshing());
        assert!(cache.ensure(catalog.points()).is_none(), "no second refresh while in flight");

        let snapshot = cache.store(fetch.await).expect("refresh succeeded");
        assert_eq!(snapshot.len(), 47);
        assert_eq!(snapshot.entries()[12].region.city, "東京");

        assert!(cache.ensure(catalog.points()).is_none(), "cached snapshot is reused");
        assert_eq!(source.batch_calls(), 1);
    }

    #[tokio::test]
    async fn failure_clears_and_allows_retry() {
        let (source, mut cache) = cache();
        let catalog = RegionCatalog::japan();
        source.push_batch(Duration::ZERO, Err(FetchError::Http { status: 503 }));

        let fetch = cache.ensure(catalog.points()).expect("refresh starts");
        assert!(cache.store(fetch.await).is_none());
        assert!(!cache.is_refreshing());

        let fetch = cache
            .ensure(catalog.points())
            .expect("next need fetches again");
        assert!(cache.store(fetch.await).is_some());
        assert_eq!(source.batch_calls(), 2);
    }

    #[tokio::test]
    async fn failed_refresh_drops_existing_snapshot() {
        let (source, mut cache) = cache();
        let catalog = RegionCatalog::japan();

        let fetch = cache.ensure(catalog.points()).expect("refresh starts");
        cache.store(fetch.await);
        assert!(cache.get().is_some());

        source.push_batch(Duration::ZERO, Err(FetchError::Transport("offline".into())));
        let result = cache.refresh(catalog.points()).await;
        assert!(cache.store(result).is_none());
        assert!(cache.get().is_none());
    }

    #[tokio::test]
    async fn invalidate_forces_refetch() {
        let (source, mut cache) = cache();
        let catalog = RegionCatalog::japan();

        let fetch = cache.ensure(catalog.points()).expect("refresh starts");
        cache.store(fetch.await);
        cache.invalidate();

        assert!(cache.get().is_none());
        assert!(cache.ensure(catalog.points()).is_some());
        assert_eq!(source.batch_calls(), 1, "future not yet driven");
    }

    #[tokio::test]
    async fn late_result_repopulates_after_invalidate() {
        let (source, mut cache) = cache();
        let catalog = RegionCatalog::japan();

        let fetch = cache.ensure(catalog.points()).expect("refresh starts");
        cache.invalidate();
        assert!(cache.is_refreshing(), "invalidate does not cancel the refresh");
        assert!(cache.ensure(catalog.points()).is_none());

        assert!(cache.store(fetch.await).is_some());
        assert!(!cache.is_refreshing());
        assert_eq!(source.batch_calls(), 1);
    }

    #[test]
    fn align_rejects_length_mismatch() {
        let catalog = RegionCatalog::japan();
        let err = NationwideSnapshot::align(catalog.points(), vec![None; 3]).unwrap_err();
        assert!(matches!(err, FetchError::Parse(_)));
    }
}
