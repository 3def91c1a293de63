//! The overlay controller: one task that owns all overlay state.
//!
//! Viewport signals, the debounce deadline and fetch completions are all
//! handled inside [`OverlayController::run`]. Fetches run as spawned tasks and
//! report back over a channel, so state is only ever touched from the loop
//! and rendering always reflects the state the loop just produced.
//!
//! Owners reach a running controller through an [`OverlayHandle`].
//!
//! Center fetches carry a sequence number; a completion that is not the
//! most recently dispatched one is dropped, so a slow early response can
//! never overwrite a newer one.

use std::{sync::Arc, time::Duration};

use anyhow::Result;
use tokio::{
    sync::{mpsc, watch},
    task::JoinHandle,
};

use crate::{
    Config,
    cache::{NationwideCache, NationwideSnapshot},
    catalog::RegionCatalog,
    debounce::Debouncer,
    error::FetchError,
    model::{Coordinate, WeatherReading},
    provider::{WeatherSource, source_from_config},
    render::{MapRenderer, draw_markers, project_markers},
    state::{OverlayState, Visibility},
    viewport::{ViewportSignal, ViewportSubscription},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerSettings {
    /// Nationwide markers are shown at this zoom level and below.
    pub zoom_threshold: u8,
    /// Quiet period after the last settle before the center is fetched.
    pub debounce: Duration,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            zoom_threshold: 13,
            debounce: Duration::from_millis(250),
        }
    }
}

#[derive(Debug)]
enum Request {
    InvalidateNationwide,
}

/// Sends requests to a running [`OverlayController`]. Cheap to clone.
#[derive(Debug, Clone)]
pub struct OverlayHandle {
    requests: mpsc::UnboundedSender<Request>,
}

impl OverlayHandle {
    /// Drop the cached nationwide snapshot. Markers on screen are refetched
    /// right away; hidden ones the next time the layer is shown. Returns
    /// `false` once the controller has stopped.
    pub fn invalidate_nationwide(&self) -> bool {
        self.requests.send(Request::InvalidateNationwide).is_ok()
    }
}

#[derive(Debug)]
enum Completion {
    Center {
        seq: u64,
        at: Coordinate,
        result: Result<WeatherReading, FetchError>,
    },
    Nationwide(Result<NationwideSnapshot, FetchError>),
}

#[derive(Debug)]
pub struct OverlayController {
    settings: ControllerSettings,
    source: Arc<dyn WeatherSource>,
    catalog: Arc<RegionCatalog>,
    cache: NationwideCache,
    viewport: ViewportSubscription,
    renderer: Box<dyn MapRenderer>,
    state: OverlayState,
    published: watch::Sender<OverlayState>,
    debounce: Debouncer,
    center_seq: u64,
    completions_tx: mpsc::UnboundedSender<Completion>,
    completions_rx: mpsc::UnboundedReceiver<Completion>,
    requests_tx: mpsc::UnboundedSender<Request>,
    requests_rx: mpsc::UnboundedReceiver<Request>,
}

impl OverlayController {
    pub fn new(
        settings: ControllerSettings,
        source: Arc<dyn WeatherSource>,
        catalog: Arc<RegionCatalog>,
        viewport: ViewportSubscription,
        renderer: Box<dyn MapRenderer>,
    ) -> Self {
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        let (requests_tx, requests_rx) = mpsc::unbounded_channel();
        let state = OverlayState::default();

        Self {
            settings,
            cache: NationwideCache::new(Arc::clone(&source)),
            source,
            catalog,
            viewport,
            renderer,
            published: watch::Sender::new(state.clone()),
            state,
            debounce: Debouncer::new(settings.debounce),
            center_seq: 0,
            completions_tx,
            completions_rx,
            requests_tx,
            requests_rx,
        }
    }

    /// Controller wired to the configured weather source and the built-in
    /// catalog.
    pub fn from_config(
        config: &Config,
        viewport: ViewportSubscription,
        renderer: Box<dyn MapRenderer>,
    ) -> Result<Self> {
        let source = source_from_config(config)?;
        Ok(Self::new(
            config.controller_settings(),
            source,
            Arc::new(RegionCatalog::japan()),
            viewport,
            renderer,
        ))
    }

    pub fn state(&self) -> &OverlayState {
        &self.state
    }

    /// Receives a copy of the state after every change.
    pub fn watch_state(&self) -> watch::Receiver<OverlayState> {
        self.published.subscribe()
    }

    pub fn handle(&self) -> OverlayHandle {
        OverlayHandle {
            requests: self.requests_tx.clone(),
        }
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// Mount, then process events until the viewport tracker goes away.
    pub async fn run(mut self) {
        self.mount();

        loop {
            tokio::select! {
                signal = self.viewport.next() => match signal {
                    Some(ViewportSignal::ZoomChanged(_)) => self.on_zoom_changed(),
                    Some(ViewportSignal::Settled(_)) => self.on_settled(),
                    None => break,
                },
                () = self.debounce.elapsed() => self.refresh_center(),
                Some(done) = self.completions_rx.recv() => self.apply(done),
                Some(request) = self.requests_rx.recv() => self.on_request(request),
            }
        }

        log::debug!("viewport tracker closed; overlay controller stopped");
    }

    fn mount(&mut self) {
        let vp = self.viewport.current();
        log::info!(
            "overlay mounted at ({:.5}, {:.5}) zoom {}",
            vp.center_lat,
            vp.center_lon,
            vp.zoom
        );
        self.state.zoom = vp.zoom;
        self.refresh_center();
        self.update_nationwide();
    }

    fn on_zoom_changed(&mut self) {
        self.state.zoom = self.viewport.current().zoom;
        self.update_nationwide();
    }

    fn on_settled(&mut self) {
        log::trace!("viewport settled; center refresh in {:?}", self.debounce.delay());
        self.debounce.schedule();
    }

    fn on_request(&mut self, request: Request) {
        match request {
            Request::InvalidateNationwide => {
                if self.cache.is_refreshing() {
                    log::debug!("nationwide cache invalidated during a refresh");
                }
                self.cache.invalidate();
                self.update_nationwide();
            }
        }
    }

    fn refresh_center(&mut self) {
        let at = self.viewport.current().center().rounded();
        self.center_seq += 1;
        let seq = self.center_seq;
        log::debug!("center fetch #{seq} at ({}, {})", at.lat, at.lon);

        self.state.center.begin_loading();
        self.render_panel();

        let source = Arc::clone(&self.source);
        let tx = self.completions_tx.clone();
        tokio::spawn(async move {
            let result = source.fetch_single(at).await;
            let _ = tx.send(Completion::Center { seq, at, result });
        });
    }

    fn update_nationwide(&mut self) {
        let next = Visibility::for_zoom(self.state.zoom, self.settings.zoom_threshold);
        if next != self.state.nationwide {
            log::info!(
                "nationwide layer {:?} -> {:?} at zoom {}",
                self.state.nationwide,
                next,
                self.state.zoom
            );
            self.state.nationwide = next;
        }

        match next {
            Visibility::Hidden => self.renderer.clear_layer(),
            Visibility::Shown if self.cache.get().is_some() => self.render_markers(),
            Visibility::Shown => match self.cache.ensure(self.catalog.points()) {
                Some(fetch) => {
                    log::info!("fetching nationwide weather for {} regions", self.catalog.len());
                    let tx = self.completions_tx.clone();
                    tokio::spawn(async move {
                        let _ = tx.send(Completion::Nationwide(fetch.await));
                    });
                }
                None => log::debug!("nationwide fetch already in flight"),
            },
        }

        self.publish();
    }

    fn apply(&mut self, done: Completion) {
        match done {
            Completion::Center { seq, at, result } => {
                if seq != self.center_seq {
                    log::debug!(
                        "dropping stale center result #{seq} (latest #{})",
                        self.center_seq
                    );
                    return;
                }
                if let Err(err) = &result {
                    log::warn!(
                        "center weather at ({}, {}) failed ({}): {err}",
                        at.lat,
                        at.lon,
                        err.kind()
                    );
                }
                self.state.center.apply(result);
                self.render_panel();
            }
            Completion::Nationwide(result) => {
                let cached = self.cache.store(result).is_some();
                if self.state.nationwide == Visibility::Shown {
                    if cached {
                        self.render_markers();
                    } else {
                        self.renderer.clear_layer();
                    }
                }
                self.publish();
            }
        }
    }

    fn render_markers(&mut self) {
        if let Some(snapshot) = self.cache.get() {
            let markers = project_markers(snapshot);
            draw_markers(self.renderer.as_mut(), &markers);
        }
    }

    fn render_panel(&mut self) {
        let panel = self.state.center.panel();
        self.renderer.set_panel(&panel);
        self.publish();
    }

    fn publish(&self) {
        self.published.send_replace(self.state.clone());
    }
}
