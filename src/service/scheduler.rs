//! Refresh lifecycle: periodic cycles, in-flight guard, start/stop

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, Notify};
use tokio::task::JoinHandle;

use super::engine::SyncEngine;
use crate::fetcher::DocumentSource;
use crate::presenter::{ApplyStats, PlaceholderView};

/// Result of one cycle trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    Completed(ApplyStats),
    /// Cycle ran but failed; last-good content is kept
    Failed,
    /// Another cycle was in flight; this trigger was dropped, not queued
    Skipped,
}

/// Owns the refresh timer and the single in-flight cycle guard.
///
/// `start` runs one cycle immediately and then one per period. A trigger
/// that arrives while a cycle is in flight is skipped entirely; a running
/// cycle is never cancelled. All scheduler state lives on this instance.
pub struct RefreshScheduler<S, V> {
    engine: Arc<Mutex<SyncEngine<S, V>>>,
    in_flight: Arc<AtomicBool>,
    period: Duration,
    shutdown: Arc<Notify>,
    handle: Option<JoinHandle<()>>,
}

impl<S, V> RefreshScheduler<S, V>
where
    S: DocumentSource + 'static,
    V: PlaceholderView + Send + 'static,
{
    pub fn new(engine: SyncEngine<S, V>, period: Duration) -> Self {
        Self {
            engine: Arc::new(Mutex::new(engine)),
            in_flight: Arc::new(AtomicBool::new(false)),
            period,
            shutdown: Arc::new(Notify::new()),
            handle: None,
        }
    }

    /// Spawn the refresh loop. The first cycle runs immediately.
    pub fn start(&mut self) {
        if self.handle.is_some() {
            tracing::warn!("Refresh loop already running");
            return;
        }

        let engine = Arc::clone(&self.engine);
        let in_flight = Arc::clone(&self.in_flight);
        let shutdown = Arc::clone(&self.shutdown);
        let period = self.period;

        self.handle = Some(tokio::spawn(async move {
            tracing::info!(period_ms = period.as_millis() as u64, "Refresh loop started");
            let mut ticker = tokio::time::interval(period);

            loop {
                tokio::select! {
                    _ = shutdown.notified() => {
                        tracing::info!("Refresh loop stopping");
                        break;
                    }
                    _ = ticker.tick() => {
                        run_guarded(&engine, &in_flight).await;
                    }
                }
            }
        }));
    }

    /// Signal shutdown and wait for the loop to end.
    ///
    /// A cycle already in flight runs to completion first.
    pub async fn stop(&mut self) {
        self.shutdown.notify_one();
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                tracing::warn!(error = %e, "Refresh loop ended abnormally");
            }
        }
    }

    /// Trigger one cycle outside the timer, subject to the same guard
    pub async fn refresh_now(&self) -> CycleOutcome {
        run_guarded(&self.engine, &self.in_flight).await
    }
}

async fn run_guarded<S, V>(
    engine: &Mutex<SyncEngine<S, V>>,
    in_flight: &AtomicBool,
) -> CycleOutcome
where
    S: DocumentSource,
    V: PlaceholderView + Send,
{
    if in_flight
        .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
        .is_err()
    {
        tracing::debug!("Cycle already in flight, skipping");
        return CycleOutcome::Skipped;
    }

    let outcome = match engine.lock().await.run_cycle().await {
        Ok(stats) => {
            tracing::info!(
                updated = stats.updated,
                unchanged = stats.unchanged,
                missing = stats.missing,
                "Cycle completed"
            );
            CycleOutcome::Completed(stats)
        }
        Err(e) => {
            tracing::warn!(error = %e, "Cycle failed, keeping last good content");
            CycleOutcome::Failed
        }
    };

    // Cleared unconditionally, success or failure
    in_flight.store(false, Ordering::SeqCst);
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::FetchError;
    use crate::model::RenderMode;
    use crate::parser::ContentParser;
    use crate::presenter::ViewError;
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;

    struct EmptyView;

    impl PlaceholderView for EmptyView {
        fn placeholder_keys(&self) -> Vec<String> {
            Vec::new()
        }

        fn read_content(&self, _key: &str) -> Option<String> {
            None
        }

        fn write_content(
            &mut self,
            _key: &str,
            _value: &str,
            _mode: RenderMode,
        ) -> Result<(), ViewError> {
            Ok(())
        }
    }

    /// Source that blocks each fetch until the gate is released
    struct GatedSource {
        gate: Arc<Notify>,
        fetches: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl DocumentSource for GatedSource {
        async fn fetch(&self) -> Result<String, FetchError> {
            self.gate.notified().await;
            self.fetches.fetch_add(1, Ordering::SeqCst);
            Ok("HERO\n- Subtitle: \"Fun!\"\n".to_string())
        }
    }

    struct FailingSource;

    #[async_trait]
    impl DocumentSource for FailingSource {
        async fn fetch(&self) -> Result<String, FetchError> {
            Err(FetchError::Status {
                status: reqwest::StatusCode::NOT_FOUND,
                url: "http://localhost/c.txt".to_string(),
            })
        }
    }

    struct CountingSource {
        fetches: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl DocumentSource for CountingSource {
        async fn fetch(&self) -> Result<String, FetchError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            Ok(String::new())
        }
    }

    #[tokio::test]
    async fn test_overlapping_trigger_is_skipped() {
        let gate = Arc::new(Notify::new());
        let fetches = Arc::new(AtomicUsize::new(0));
        let source = GatedSource {
            gate: Arc::clone(&gate),
            fetches: Arc::clone(&fetches),
        };
        let engine = SyncEngine::new(source, ContentParser::new(), EmptyView);
        let scheduler = Arc::new(RefreshScheduler::new(engine, Duration::from_secs(3600)));

        let first = {
            let scheduler = Arc::clone(&scheduler);
            tokio::spawn(async move { scheduler.refresh_now().await })
        };

        // Wait until the first cycle is actually in flight
        while !scheduler.in_flight.load(Ordering::SeqCst) {
            tokio::task::yield_now().await;
        }

        assert_eq!(scheduler.refresh_now().await, CycleOutcome::Skipped);

        gate.notify_one();
        let outcome = first.await.unwrap();
        assert!(matches!(outcome, CycleOutcome::Completed(_)));
        assert_eq!(fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_guard_cleared_after_failure() {
        let engine = SyncEngine::new(FailingSource, ContentParser::new(), EmptyView);
        let scheduler = RefreshScheduler::new(engine, Duration::from_secs(3600));

        assert_eq!(scheduler.refresh_now().await, CycleOutcome::Failed);
        assert!(!scheduler.in_flight.load(Ordering::SeqCst));
        // Next trigger runs again instead of being skipped
        assert_eq!(scheduler.refresh_now().await, CycleOutcome::Failed);
    }

    #[tokio::test]
    async fn test_start_runs_cycles_until_stop() {
        let fetches = Arc::new(AtomicUsize::new(0));
        let source = CountingSource {
            fetches: Arc::clone(&fetches),
        };
        let engine = SyncEngine::new(source, ContentParser::new(), EmptyView);
        let mut scheduler = RefreshScheduler::new(engine, Duration::from_millis(10));

        scheduler.start();
        tokio::time::sleep(Duration::from_millis(55)).await;
        scheduler.stop().await;

        let ran = fetches.load(Ordering::SeqCst);
        assert!(ran >= 2, "expected several cycles, got {}", ran);

        // No further cycles after stop
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(fetches.load(Ordering::SeqCst), ran);
    }

    #[tokio::test]
    async fn test_start_twice_keeps_single_loop() {
        let fetches = Arc::new(AtomicUsize::new(0));
        let source = CountingSource {
            fetches: Arc::clone(&fetches),
        };
        let engine = SyncEngine::new(source, ContentParser::new(), EmptyView);
        let mut scheduler = RefreshScheduler::new(engine, Duration::from_secs(3600));

        scheduler.start();
        scheduler.start();
        tokio::time::sleep(Duration::from_millis(20)).await;
        scheduler.stop().await;

        // Only the immediate tick of the single loop fired
        assert_eq!(fetches.load(Ordering::SeqCst), 1);
    }
}
