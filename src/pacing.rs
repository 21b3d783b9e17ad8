//! Randomized pacing between per-item detail fetches.
//!
//! Listing pages are fetched once per source per run and are not paced; the
//! repeated per-item article fetches are, since those are the requests that
//! look like abuse at volume. The delay is drawn uniformly from a
//! configurable interval (1-3 seconds unless overridden on the CLI).

use rand::Rng;
use std::time::Duration;
use tokio::time::sleep;
use tracing::debug;

use crate::utils::BoxError;

/// Inserts a randomized delay before each outbound detail-page request.
///
/// Cheap to copy; every adapter that performs nested fetches holds its own
/// copy and calls [`Pacer::pace`] immediately before each detail GET.
#[derive(Debug, Clone, Copy)]
pub struct Pacer {
    min_ms: u64,
    max_ms: u64,
}

impl Pacer {
    /// Build a pacer sleeping between `min_secs` and `max_secs` per call.
    ///
    /// # Errors
    ///
    /// Fails when the bounds are negative or inverted.
    pub fn new(min_secs: f64, max_secs: f64) -> Result<Self, BoxError> {
        if min_secs < 0.0 || max_secs < min_secs {
            return Err(format!(
                "invalid politeness delay bounds: min={min_secs}s max={max_secs}s"
            )
            .into());
        }
        Ok(Self {
            min_ms: (min_secs * 1000.0) as u64,
            max_ms: (max_secs * 1000.0) as u64,
        })
    }

    /// Block the calling adapter for a random duration within the interval.
    pub async fn pace(&self) {
        let wait_ms = self.draw_ms();
        debug!(wait_ms, "Pacing before detail fetch");
        sleep(Duration::from_millis(wait_ms)).await;
    }

    // The rng handle is thread-local and must not be held across an await.
    fn draw_ms(&self) -> u64 {
        rand::rng().random_range(self.min_ms..=self.max_ms)
    }
}
