//! Sequential, rate-limited batch orchestration
//!
//! Drives repeated [`BatchSource`] calls across the full (or limited) result
//! set. Strictly sequential by design: NCBI associates rate-limit and
//! session state with the WebEnv token, so concurrent batches against the
//! same token are disallowed. The only suspension point is the mandatory
//! inter-batch delay, which runs between windows and never after the last
//! one. No retry logic lives here; the first failing batch halts the loop.

use crate::config::FetchPolicy;
use crate::error::Result;
use crate::fetch::BatchSource;
use crate::session::SearchSession;
use crate::types::{BatchWindow, SequenceRecord};

/// Compute the contiguous, non-overlapping batch windows covering
/// `min(limit, count)` records in pages of at most `max_batch` each.
///
/// Returns no windows when the effective count is zero.
pub fn plan_windows(count: u64, limit: Option<u64>, max_batch: u64) -> Vec<BatchWindow> {
    let mut remaining = match limit {
        Some(limit) => limit.min(count),
        None => count,
    };
    let mut windows = Vec::new();
    let mut start = 0;
    while remaining > 0 {
        let size = remaining.min(max_batch);
        windows.push(BatchWindow { start, size });
        remaining -= size;
        start += size;
    }
    windows
}

/// Drives the paginated retrieval loop against a [`BatchSource`]
pub struct RetrievalOrchestrator<S> {
    source: S,
    policy: FetchPolicy,
}

impl<S: BatchSource> RetrievalOrchestrator<S> {
    /// Create an orchestrator over the given source and pacing policy
    pub fn new(source: S, policy: FetchPolicy) -> Self {
        Self { source, policy }
    }

    /// Fetch every record in the session's result set, up to `limit`.
    ///
    /// Records are forwarded in ascending offset order, exactly as the
    /// remote service yields them (no reordering, no deduplication), and
    /// materialized here into a single collection because both downstream
    /// writers need multiple passes.
    ///
    /// # Errors
    ///
    /// The first failing batch call (or parse failure inside a batch)
    /// propagates immediately and abandons the remaining windows. Records
    /// from earlier batches are dropped with the partial collection; callers
    /// that need partial-result salvage must consume per-batch streams
    /// themselves.
    pub async fn fetch_all(
        &self,
        session: &SearchSession,
        limit: Option<u64>,
    ) -> Result<Vec<SequenceRecord>> {
        let windows = plan_windows(session.count(), limit, self.policy.max_batch_size);
        if windows.is_empty() {
            tracing::info!("nothing to fetch: effective record count is zero");
            return Ok(Vec::new());
        }

        tracing::info!(
            batches = windows.len(),
            total = session.count(),
            limit = ?limit,
            "starting paginated retrieval"
        );

        let mut records = Vec::new();
        for (index, window) in windows.iter().enumerate() {
            tracing::debug!(batch = index + 1, window = %window, "fetching batch");

            let stream = self.source.fetch_batch(session, *window).await?;
            let before = records.len();
            for record in stream {
                records.push(record?);
            }
            tracing::debug!(
                batch = index + 1,
                yielded = records.len() - before,
                "batch complete"
            );

            // Pace the session: sleep between windows, never after the last.
            if index + 1 < windows.len() {
                tokio::time::sleep(self.policy.min_request_delay).await;
            }
        }

        tracing::info!(records = records.len(), "retrieval complete");
        Ok(records)
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::fetch::RecordStream;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio::time::Instant;

    fn record(accession: &str, length: u64) -> SequenceRecord {
        SequenceRecord {
            accession: accession.to_string(),
            length,
            description: format!("{accession} description"),
        }
    }

    fn session(count: u64) -> SearchSession {
        SearchSession::new("MCID_TEST".to_string(), "1".to_string(), count)
    }

    fn policy(delay_ms: u64) -> FetchPolicy {
        FetchPolicy {
            max_batch_size: 500,
            min_request_delay: Duration::from_millis(delay_ms),
        }
    }

    /// Well-behaved fake: yields `window.size` records per call and records
    /// every window together with the (virtual) instant it was requested.
    struct FakeSource {
        calls: Mutex<Vec<(BatchWindow, Instant)>>,
        /// Fail the nth call (zero-based) with a remote-fetch error
        fail_at: Option<usize>,
    }

    impl FakeSource {
        fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail_at: None,
            }
        }

        fn failing_at(call: usize) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail_at: Some(call),
            }
        }

        fn windows(&self) -> Vec<BatchWindow> {
            self.calls.lock().unwrap().iter().map(|(w, _)| *w).collect()
        }

        fn instants(&self) -> Vec<Instant> {
            self.calls.lock().unwrap().iter().map(|(_, t)| *t).collect()
        }
    }

    #[async_trait]
    impl BatchSource for FakeSource {
        async fn fetch_batch(
            &self,
            _session: &SearchSession,
            window: BatchWindow,
        ) -> crate::error::Result<RecordStream> {
            let call_index = {
                let mut calls = self.calls.lock().unwrap();
                calls.push((window, Instant::now()));
                calls.len() - 1
            };
            if self.fail_at == Some(call_index) {
                return Err(Error::RemoteFetch("synthetic batch failure".to_string()));
            }
            let records = (window.start..window.end())
                .map(|i| record(&format!("ACC{i:05}"), 2000 - i))
                .collect();
            Ok(RecordStream::from_records(records))
        }
    }

    #[test]
    fn plan_windows_covers_full_count() {
        // 1200 matches, no limit: three contiguous pages.
        let windows = plan_windows(1200, None, 500);
        assert_eq!(
            windows,
            vec![
                BatchWindow { start: 0, size: 500 },
                BatchWindow {
                    start: 500,
                    size: 500
                },
                BatchWindow {
                    start: 1000,
                    size: 200
                },
            ]
        );
    }

    #[test]
    fn plan_windows_respects_limit() {
        let windows = plan_windows(1200, Some(300), 500);
        assert_eq!(windows, vec![BatchWindow { start: 0, size: 300 }]);
    }

    #[test]
    fn plan_windows_limit_above_count_is_clamped() {
        let windows = plan_windows(120, Some(10_000), 500);
        assert_eq!(windows, vec![BatchWindow { start: 0, size: 120 }]);
    }

    #[test]
    fn plan_windows_zero_count_plans_nothing() {
        assert!(plan_windows(0, None, 500).is_empty());
        assert!(plan_windows(1200, Some(0), 500).is_empty());
    }

    #[test]
    fn plan_windows_batch_count_is_ceiling_division() {
        for (count, limit, expected) in [
            (1u64, None, 1usize),
            (500, None, 1),
            (501, None, 2),
            (2500, None, 5),
            (2500, Some(1001), 3),
        ] {
            let windows = plan_windows(count, limit, 500);
            assert_eq!(windows.len(), expected, "count={count} limit={limit:?}");
            // Contiguity: each window starts where the previous ended.
            for pair in windows.windows(2) {
                assert_eq!(pair[1].start, pair[0].end());
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn fetch_all_yields_every_record_in_order() {
        let source = FakeSource::new();
        let orchestrator = RetrievalOrchestrator::new(source, policy(340));

        let records = orchestrator.fetch_all(&session(1200), None).await.unwrap();

        assert_eq!(records.len(), 1200);
        assert_eq!(records[0].accession, "ACC00000");
        assert_eq!(records[499].accession, "ACC00499");
        assert_eq!(records[1199].accession, "ACC01199");
        assert_eq!(
            orchestrator.source.windows(),
            vec![
                BatchWindow { start: 0, size: 500 },
                BatchWindow {
                    start: 500,
                    size: 500
                },
                BatchWindow {
                    start: 1000,
                    size: 200
                },
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn delay_runs_between_batches_but_not_after_the_last() {
        let source = FakeSource::new();
        let orchestrator = RetrievalOrchestrator::new(source, policy(340));

        let start = Instant::now();
        orchestrator.fetch_all(&session(1200), None).await.unwrap();
        let elapsed = start.elapsed();

        // Paused clock: elapsed virtual time is exactly the slept time,
        // (batches - 1) * min_request_delay.
        assert_eq!(elapsed, Duration::from_millis(680));

        let instants = orchestrator.source.instants();
        assert_eq!(instants.len(), 3);
        assert_eq!(instants[1] - instants[0], Duration::from_millis(340));
        assert_eq!(instants[2] - instants[1], Duration::from_millis(340));
    }

    #[tokio::test(start_paused = true)]
    async fn single_batch_has_no_delay() {
        let source = FakeSource::new();
        let orchestrator = RetrievalOrchestrator::new(source, policy(340));

        let start = Instant::now();
        let records = orchestrator
            .fetch_all(&session(1200), Some(300))
            .await
            .unwrap();

        assert_eq!(records.len(), 300);
        assert_eq!(start.elapsed(), Duration::ZERO, "no delay after the only batch");
        assert_eq!(
            orchestrator.source.windows(),
            vec![BatchWindow { start: 0, size: 300 }]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn zero_count_issues_no_batch_calls() {
        let source = FakeSource::new();
        let orchestrator = RetrievalOrchestrator::new(source, policy(340));

        let records = orchestrator.fetch_all(&session(0), None).await.unwrap();

        assert!(records.is_empty());
        assert!(orchestrator.source.windows().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn failure_halts_after_successful_batch() {
        let source = FakeSource::failing_at(1);
        let orchestrator = RetrievalOrchestrator::new(source, policy(340));

        let err = orchestrator
            .fetch_all(&session(1200), None)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::RemoteFetch(_)));
        // The second call failed; the third window was never attempted.
        assert_eq!(orchestrator.source.windows().len(), 2);
    }
}
