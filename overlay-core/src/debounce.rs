use std::{future, pin::Pin, time::Duration};

use tokio::time::{Sleep, sleep};

/// Single-slot timer: at most one deadline is armed at any time, and arming
/// a new one discards the old.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    slot: Option<Pin<Box<Sleep>>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self { delay, slot: None }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Cancel any pending deadline and arm a fresh one `delay` from now.
    pub fn schedule(&mut self) {
        self.slot = Some(Box::pin(sleep(self.delay)));
    }

    /// Resolves when the armed deadline passes, disarming the slot. Never
    /// resolves while nothing is armed. Cancel-safe.
    pub async fn elapsed(&mut self) {
        match self.slot.as_mut() {
            Some(timer) => {
                timer.as_mut().await;
                self.slot = None;
            }
            None => future::pending().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{Instant, timeout};

    fn assert_close(elapsed: Duration, ms: u64) {
        let expected = Duration::from_millis(ms);
        assert!(
            elapsed >= expected && elapsed < expected + Duration::from_millis(5),
            "elapsed {elapsed:?}, expected about {expected:?}"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn fires_after_delay() {
        let mut d = Debouncer::new(Duration::from_millis(250));
        d.schedule();

        let start = Instant::now();
        d.elapsed().await;
        assert_close(start.elapsed(), 250);

        // disarmed after firing
        assert!(timeout(Duration::from_secs(5), d.elapsed()).await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn rescheduling_pushes_the_deadline() {
        let mut d = Debouncer::new(Duration::from_millis(250));
        let start = Instant::now();
        d.schedule();

        // interrupted before it fires
        assert!(timeout(Duration::from_millis(200), d.elapsed()).await.is_err());

        d.schedule();
        d.elapsed().await;
        assert_close(start.elapsed(), 450);
    }

    #[tokio::test(start_paused = true)]
    async fn idle_never_fires() {
        let mut d = Debouncer::new(Duration::from_millis(10));
        assert!(timeout(Duration::from_secs(5), d.elapsed()).await.is_err());
    }
}
