//! Concurrency-limited dispatch of chunks to the enrichment service.
//!
//! Calls run as tokio tasks; a semaphore bounds how many are in flight.
//! Each permit is held by its task and released exactly once when the call
//! finishes, whatever the outcome. Results are collected by the dispatching
//! task into a table keyed by chunk id, so completion order never affects
//! the returned order.

use crate::config::DispatchConfig;
use crate::dispatch::barrier::CompletionBarrier;
use crate::dispatch::chunk::{Chunk, ChunkState};
use crate::enrichment::EnrichmentError;
use crate::error::{EnrichError, Result};
use std::collections::{BTreeMap, HashMap};
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::{Id, JoinError, JoinSet};

/// Counters for one dispatch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchStats {
    pub submitted: usize,
    pub ready: usize,
    pub failed: usize,
    pub peak_in_flight: usize,
}

/// Settled chunks in id order, with the run's counters.
#[derive(Debug, Clone)]
pub struct Dispatched<T> {
    pub chunks: Vec<Chunk<T>>,
    pub stats: DispatchStats,
}

impl<T> Dispatched<T> {
    /// Payloads of ready chunks, in id order.
    pub fn payloads(&self) -> impl Iterator<Item = &T> {
        self.chunks.iter().filter_map(Chunk::payload)
    }
}

/// Decrements the in-flight gauge when a call ends, including on panic.
struct InFlightGuard(Arc<AtomicUsize>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

type CallResult<T> = std::result::Result<T, EnrichmentError>;
type Joined<T> = std::result::Result<(Id, (usize, CallResult<T>)), JoinError>;

/// Dispatches chunks under a strict in-flight cap.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    max_concurrent: usize,
    quiescence: Duration,
    call_timeout: Option<Duration>,
}

/// Results table and bookkeeping owned by the dispatching task.
struct RunState<T> {
    table: BTreeMap<usize, Chunk<T>>,
    tasks: HashMap<Id, usize>,
    barrier: CompletionBarrier,
    stats: DispatchStats,
    fatal: Option<String>,
}

impl Dispatcher {
    /// Creates a dispatcher admitting at most `max_concurrent` calls at once.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when `max_concurrent` is 0.
    pub fn new(max_concurrent: usize) -> Result<Self> {
        if max_concurrent == 0 {
            return Err(EnrichError::ConfigInvalidValue {
                key: "dispatch.concurrency".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        Ok(Self {
            max_concurrent,
            quiescence: Duration::ZERO,
            call_timeout: None,
        })
    }

    /// Creates a dispatcher with the configured quiescence and timeout.
    pub fn from_config(config: &DispatchConfig, max_concurrent: usize) -> Result<Self> {
        Ok(Self::new(max_concurrent)?
            .with_quiescence(config.quiescence())
            .with_call_timeout(config.call_timeout()))
    }

    pub fn with_quiescence(mut self, quiescence: Duration) -> Self {
        self.quiescence = quiescence;
        self
    }

    /// Calls running longer than `timeout` fail their chunk.
    pub fn with_call_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.call_timeout = timeout;
        self
    }

    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    /// Runs `call` for every text and waits for all of them to settle.
    ///
    /// Chunk ids are the positions in `texts`. Recoverable call errors and
    /// timeouts mark the chunk failed. A fatal error stops further
    /// admissions, lets in-flight calls finish and is returned as
    /// [`EnrichError::FatalDispatch`].
    pub async fn dispatch<T, F, Fut>(&self, texts: Vec<String>, call: F) -> Result<Dispatched<T>>
    where
        T: Send + 'static,
        F: Fn(usize, String) -> Fut,
        Fut: Future<Output = CallResult<T>> + Send + 'static,
    {
        let semaphore = Arc::new(Semaphore::new(self.max_concurrent));
        let in_flight = Arc::new(AtomicUsize::new(0));
        let mut join_set: JoinSet<(usize, CallResult<T>)> = JoinSet::new();
        let mut run = RunState {
            table: texts
                .into_iter()
                .enumerate()
                .map(|(id, text)| (id, Chunk::new(id, text)))
                .collect(),
            tasks: HashMap::new(),
            barrier: CompletionBarrier::new(self.quiescence),
            stats: DispatchStats::default(),
            fatal: None,
        };
        let ids: Vec<usize> = run.table.keys().copied().collect();

        'admit: for id in ids {
            // Absorb finished calls while waiting so a fatal error stops admission.
            let permit = loop {
                if run.fatal.is_some() {
                    break 'admit;
                }
                tokio::select! {
                    biased;
                    Some(joined) = join_set.join_next_with_id(), if !join_set.is_empty() => {
                        run.absorb(joined);
                    }
                    permit = semaphore.clone().acquire_owned() => {
                        break permit.map_err(|e| {
                            EnrichError::Other(format!("Dispatch semaphore closed: {e}"))
                        })?;
                    }
                }
            };

            let Some(chunk) = run.table.get_mut(&id) else {
                continue;
            };
            chunk.state = ChunkState::InFlight;
            let future = call(id, chunk.text.clone());

            let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            run.stats.peak_in_flight = run.stats.peak_in_flight.max(now);
            run.stats.submitted += 1;
            run.barrier.admit();
            tracing::debug!(chunk = id, in_flight = now, "dispatching chunk");

            let guard = InFlightGuard(in_flight.clone());
            let timeout = self.call_timeout;
            let handle = join_set.spawn(async move {
                let _permit = permit;
                let _guard = guard;
                let result = match timeout {
                    Some(limit) => tokio::time::timeout(limit, future).await.unwrap_or_else(|_| {
                        Err(EnrichmentError::Recoverable(format!(
                            "call timed out after {}ms",
                            limit.as_millis()
                        )))
                    }),
                    None => future.await,
                };
                (id, result)
            });
            run.tasks.insert(handle.id(), id);
        }

        while let Some(joined) = join_set.join_next_with_id().await {
            run.absorb(joined);
        }
        run.barrier.wait().await;

        if let Some(message) = run.fatal {
            tracing::error!(
                submitted = run.stats.submitted,
                ready = run.stats.ready,
                failed = run.stats.failed,
                "enrichment aborted: {}",
                message
            );
            return Err(EnrichError::FatalDispatch { message });
        }

        tracing::debug!(
            submitted = run.stats.submitted,
            ready = run.stats.ready,
            failed = run.stats.failed,
            peak_in_flight = run.stats.peak_in_flight,
            "dispatch complete"
        );
        Ok(Dispatched {
            chunks: run.table.into_values().collect(),
            stats: run.stats,
        })
    }
}

impl<T> RunState<T> {
    /// Stores one finished call in the results table.
    fn absorb(&mut self, joined: Joined<T>) {
        self.barrier.release();
        let (id, outcome) = match joined {
            Ok((task, (id, result))) => {
                self.tasks.remove(&task);
                (id, result)
            }
            Err(e) => {
                let Some(id) = self.tasks.remove(&e.id()) else {
                    tracing::warn!("unknown enrichment task failed: {}", e);
                    return;
                };
                (id, Err(EnrichmentError::Recoverable(format!("call panicked: {e}"))))
            }
        };

        let Some(chunk) = self.table.get_mut(&id) else {
            return;
        };
        match outcome {
            Ok(payload) => {
                chunk.state = ChunkState::Ready(payload);
                self.stats.ready += 1;
            }
            Err(error) => {
                tracing::warn!(chunk = id, "enrichment call failed: {}", error);
                if error.is_fatal() && self.fatal.is_none() {
                    self.fatal = Some(error.message().to_string());
                }
                chunk.state = ChunkState::Failed(error.message().to_string());
                self.stats.failed += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn texts(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("chunk {i}")).collect()
    }

    #[test]
    fn test_zero_cap_is_config_error() {
        assert!(matches!(
            Dispatcher::new(0),
            Err(EnrichError::ConfigInvalidValue { .. })
        ));
    }

    #[tokio::test]
    async fn test_cap_never_exceeded() {
        let dispatcher = Dispatcher::new(3).unwrap();
        let active = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let result = dispatcher
            .dispatch(texts(12), |id, _| {
                let active = active.clone();
                let peak = peak.clone();
                async move {
                    let now = active.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(5 + (id as u64 % 3) * 5)).await;
                    active.fetch_sub(1, Ordering::SeqCst);
                    Ok(id)
                }
            })
            .await
            .unwrap();

        assert!(peak.load(Ordering::SeqCst) <= 3);
        assert!(result.stats.peak_in_flight <= 3);
        assert_eq!(result.stats.submitted, 12);
        assert_eq!(result.stats.ready, 12);
    }

    #[tokio::test]
    async fn test_results_in_id_order_despite_completion_order() {
        let dispatcher = Dispatcher::new(4).unwrap();
        let finished = Arc::new(Mutex::new(Vec::new()));

        let result = dispatcher
            .dispatch(texts(4), |id, text| {
                let finished = finished.clone();
                async move {
                    // Later chunks finish first.
                    tokio::time::sleep(Duration::from_millis(40 - id as u64 * 10)).await;
                    finished.lock().unwrap().push(id);
                    Ok(text.to_uppercase())
                }
            })
            .await
            .unwrap();

        assert_eq!(*finished.lock().unwrap(), vec![3, 2, 1, 0]);
        let ids: Vec<usize> = result.chunks.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![0, 1, 2, 3]);
        let payloads: Vec<&String> = result.payloads().collect();
        assert_eq!(payloads[0], "CHUNK 0");
        assert_eq!(payloads[3], "CHUNK 3");
    }

    #[tokio::test]
    async fn test_failure_does_not_block_siblings() {
        let dispatcher = Dispatcher::new(1).unwrap();
        let result = dispatcher
            .dispatch(texts(3), |id, _| async move {
                if id == 1 {
                    Err(EnrichmentError::Recoverable("throttled".to_string()))
                } else {
                    Ok(id)
                }
            })
            .await
            .unwrap();

        assert_eq!(result.stats.ready, 2);
        assert_eq!(result.stats.failed, 1);
        assert_eq!(result.chunks[1].failure(), Some("throttled"));
        assert_eq!(result.chunks[2].payload(), Some(&2));
    }

    #[tokio::test]
    async fn test_fatal_stops_admission_and_drains() {
        let dispatcher = Dispatcher::new(2).unwrap();
        let started = Arc::new(AtomicUsize::new(0));
        let completed = Arc::new(AtomicUsize::new(0));

        let result = dispatcher
            .dispatch(texts(20), |id, _| {
                let started = started.clone();
                let completed = completed.clone();
                async move {
                    started.fetch_add(1, Ordering::SeqCst);
                    if id == 0 {
                        return Err(EnrichmentError::Fatal("bad credentials".to_string()));
                    }
                    tokio::time::sleep(Duration::from_millis(30)).await;
                    completed.fetch_add(1, Ordering::SeqCst);
                    Ok(id)
                }
            })
            .await;

        match result {
            Err(EnrichError::FatalDispatch { message }) => assert_eq!(message, "bad credentials"),
            other => panic!("expected FatalDispatch, got {:?}", other.map(|d| d.stats)),
        }
        let started = started.load(Ordering::SeqCst);
        assert!(started < 20, "admission should stop, started {started}");
        // Every admitted call other than the fatal one ran to completion.
        assert_eq!(completed.load(Ordering::SeqCst), started - 1);
    }

    #[tokio::test]
    async fn test_timeout_marks_chunk_failed() {
        let dispatcher = Dispatcher::new(2)
            .unwrap()
            .with_call_timeout(Some(Duration::from_millis(20)));
        let result = dispatcher
            .dispatch(texts(2), |id, _| async move {
                if id == 0 {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                }
                Ok(id)
            })
            .await
            .unwrap();

        assert!(result.chunks[0].failure().is_some_and(|r| r.contains("timed out")));
        assert_eq!(result.chunks[1].payload(), Some(&1));
        assert_eq!(result.stats.failed, 1);
    }

    #[tokio::test]
    async fn test_quiescence_window_is_waited() {
        let dispatcher = Dispatcher::new(1)
            .unwrap()
            .with_quiescence(Duration::from_millis(50));
        let started = tokio::time::Instant::now();
        dispatcher
            .dispatch(texts(1), |id, _| async move { Ok(id) })
            .await
            .unwrap();
        assert!(started.elapsed() >= Duration::from_millis(45));
    }

    #[tokio::test]
    async fn test_empty_input() {
        let dispatcher = Dispatcher::new(1).unwrap();
        let result = dispatcher
            .dispatch(Vec::new(), |id, _| async move { Ok(id) })
            .await
            .unwrap();
        assert!(result.chunks.is_empty());
        assert_eq!(result.stats, DispatchStats::default());
    }
}
