use chrono::Utc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::errors::AnalysisError;
use crate::models::{AnalysisOutcome, DisplayState, ImagePayload, PickedImage};
use crate::services::{formatter, NutritionAnalyzer};

/// Runs pick-and-analyze actions and owns the displayed result.
///
/// Every invocation takes a sequence number. A finished analysis is only
/// applied while its number is still the latest one issued, so the most
/// recently started request always wins, whatever order responses arrive in.
/// [`AnalysisHandler::cancel`] advances the counter to drop in-flight work.
///
/// Sequence numbers are only issued and compared while the state lock is
/// held. The lock is never held across an await.
pub struct AnalysisHandler {
    analyzer: Arc<dyn NutritionAnalyzer>,
    timeout: Duration,
    latest: AtomicU64,
    state: Mutex<DisplayState>,
}

/// Clears `loading` if an analysis future is dropped before it applies its result
struct InFlight<'a> {
    handler: &'a AnalysisHandler,
    seq: u64,
    settled: bool,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let mut state = self.handler.lock_state();
        if self.handler.latest.load(Ordering::SeqCst) == self.seq {
            log::warn!("⚠️ Analysis #{} dropped before completion", self.seq);
            state.loading = false;
            state.updated_at = Utc::now();
        }
    }
}

impl AnalysisHandler {
    pub fn new(analyzer: Arc<dyn NutritionAnalyzer>, timeout: Duration) -> Self {
        Self {
            analyzer,
            timeout,
            latest: AtomicU64::new(0),
            state: Mutex::new(DisplayState::default()),
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, DisplayState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Entry point for the image source. A cancelled pick changes nothing.
    pub async fn handle_pick(&self, picked: PickedImage) -> Option<AnalysisOutcome> {
        match picked.into_parts() {
            Some((uri, payload)) => Some(self.analyze(uri, payload).await),
            None => {
                log::debug!("🚫 Image pick cancelled");
                None
            }
        }
    }

    pub async fn analyze(&self, image_uri: String, image: ImagePayload) -> AnalysisOutcome {
        let seq = {
            let mut state = self.lock_state();
            let seq = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
            log::info!("📸 Starting analysis #{} for {}", seq, image_uri);
            state.image_uri = Some(image_uri);
            state.loading = true;
            state.nutrition = None;
            state.notification = None;
            state.updated_at = Utc::now();
            seq
        };
        let mut in_flight = InFlight {
            handler: self,
            seq,
            settled: false,
        };

        let result = match tokio::time::timeout(self.timeout, self.analyzer.analyze(image)).await {
            Ok(result) => result,
            Err(_) => Err(AnalysisError::Timeout(self.timeout)),
        };

        let formatted = match result {
            Ok(text) => formatter::format(&text).map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };

        let mut state = self.lock_state();
        in_flight.settled = true;
        if self.latest.load(Ordering::SeqCst) != seq {
            log::debug!("⏭️ Discarding stale result of analysis #{}", seq);
            return AnalysisOutcome::Superseded;
        }

        state.loading = false;
        state.updated_at = Utc::now();

        match formatted {
            Ok(nutrition) => {
                log::info!("✅ Analysis #{} displayed: {}", seq, nutrition.title);
                state.nutrition = Some(nutrition.clone());
                state.notification = None;
                AnalysisOutcome::Displayed(nutrition)
            }
            Err(message) => {
                let notification = format!("Failed to analyze image: {}", message);
                log::error!("❌ Analysis #{} failed: {}", seq, message);
                state.nutrition = None;
                state.notification = Some(notification.clone());
                AnalysisOutcome::Failed(notification)
            }
        }
    }

    /// Drops the applicability of any in-flight analysis and leaves the loading state
    pub fn cancel(&self) {
        let mut state = self.lock_state();
        let seq = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        log::info!("🛑 Analysis cancelled (now at #{})", seq);

        state.loading = false;
        state.updated_at = Utc::now();
    }

    pub fn snapshot(&self) -> DisplayState {
        self.lock_state().clone()
    }
}
