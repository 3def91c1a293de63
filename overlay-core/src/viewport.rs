//! Live map viewport and its two completion signals.
//!
//! The map adapter feeds intermediate positions with [`ViewportTracker::move_to`]
//! and [`ViewportTracker::set_zoom`] while a gesture animates, then calls
//! [`ViewportTracker::zoom_end`] / [`ViewportTracker::move_end`] once it stops.
//! Signals travel over `watch` channels: a slow consumer sees only the most
//! recent one of each kind, never a backlog.

use tokio::sync::watch;

use crate::model::Viewport;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewportSignal {
    /// Zoom animation finished at a new level.
    ZoomChanged(Viewport),
    /// A pan or zoom gesture finished.
    Settled(Viewport),
}

#[derive(Debug)]
pub struct ViewportTracker {
    live: watch::Sender<Viewport>,
    zoom_end: watch::Sender<Viewport>,
    settled: watch::Sender<Viewport>,
}

impl ViewportTracker {
    pub fn new(initial: Viewport) -> Self {
        Self {
            live: watch::Sender::new(initial),
            zoom_end: watch::Sender::new(initial),
            settled: watch::Sender::new(initial),
        }
    }

    pub fn current_viewport(&self) -> Viewport {
        *self.live.borrow()
    }

    /// Intermediate center update; emits nothing.
    pub fn move_to(&self, lat: f64, lon: f64) {
        self.live.send_modify(|v| {
            v.center_lat = lat;
            v.center_lon = lon;
        });
    }

    /// Intermediate zoom update; emits nothing.
    pub fn set_zoom(&self, zoom: u8) {
        self.live.send_modify(|v| v.zoom = zoom);
    }

    /// Zoom animation finished. Emits `ZoomChanged` only when the level
    /// differs from the one last announced; returns whether it did.
    pub fn zoom_end(&self) -> bool {
        let now = self.current_viewport();
        if self.zoom_end.borrow().zoom == now.zoom {
            return false;
        }
        self.zoom_end.send_replace(now);
        true
    }

    /// Gesture finished; always emits `Settled`.
    pub fn move_end(&self) {
        self.settled.send_replace(self.current_viewport());
    }

    /// Complete pan gesture.
    pub fn pan_to(&self, lat: f64, lon: f64) {
        self.move_to(lat, lon);
        self.move_end();
    }

    /// Complete zoom gesture. A zoom also counts as movement, so `Settled`
    /// follows the zoom signal.
    pub fn zoom_to(&self, zoom: u8) {
        self.set_zoom(zoom);
        self.zoom_end();
        self.move_end();
    }

    pub fn subscribe(&self) -> ViewportSubscription {
        ViewportSubscription {
            live: self.live.subscribe(),
            zoom: self.zoom_end.subscribe(),
            settled: self.settled.subscribe(),
        }
    }
}

/// Consumer side of a [`ViewportTracker`]. Only signals emitted after the
/// subscription was created are delivered.
#[derive(Debug, Clone)]
pub struct ViewportSubscription {
    live: watch::Receiver<Viewport>,
    zoom: watch::Receiver<Viewport>,
    settled: watch::Receiver<Viewport>,
}

impl ViewportSubscription {
    /// Live viewport, read now.
    pub fn current(&self) -> Viewport {
        *self.live.borrow()
    }

    /// Next signal of either kind, or `None` once the tracker is gone. When
    /// both are pending the zoom signal comes first, matching the order the
    /// map emits them in.
    pub async fn next(&mut self) -> Option<ViewportSignal> {
        tokio::select! {
            biased;
            res = self.zoom.changed() => {
                res.ok()?;
                Some(ViewportSignal::ZoomChanged(*self.zoom.borrow_and_update()))
            }
            res = self.settled.changed() => {
                res.ok()?;
                Some(ViewportSignal::Settled(*self.settled.borrow_and_update()))
            }
        }
    }
}
