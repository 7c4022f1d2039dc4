// Background ranking worker.
// One worker thread per session runs rankings off the caller's thread and
// hands finished reports back over a channel. Submitting a new request
// supersedes the previous one: a pending job is dropped, a running one is
// cancelled, and its late outcome is filtered out by generation number.

use parking_lot::{Condvar, Mutex};
use resumerank_core::{Document, Result};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::debug;

use crate::engine::{CancelToken, RankingEngine};
use crate::report::RankingReport;

struct RankingJob {
    generation: u64,
    query: String,
    candidates: Vec<Document>,
    cancel: CancelToken,
}

/// Result of one submitted request
#[derive(Debug)]
pub struct RankingOutcome {
    pub generation: u64,
    pub result: Result<RankingReport>,
}

#[derive(Default)]
struct Slot {
    pending: Option<RankingJob>,
    in_flight: Option<CancelToken>,
    shutdown: bool,
}

struct Shared {
    slot: Mutex<Slot>,
    condvar: Condvar,
    latest: AtomicU64,
}

/// Runs one ranking at a time on a dedicated thread
pub struct RankingWorker {
    shared: Arc<Shared>,
    handle: Option<JoinHandle<()>>,
}

/// Receiving end for outcomes of the most recent request
pub struct RankingReceiver {
    rx: mpsc::Receiver<RankingOutcome>,
    shared: Arc<Shared>,
}

impl RankingWorker {
    pub fn spawn(engine: RankingEngine) -> Result<(Self, RankingReceiver)> {
        let shared = Arc::new(Shared {
            slot: Mutex::new(Slot::default()),
            condvar: Condvar::new(),
            latest: AtomicU64::new(0),
        });
        let (tx, rx) = mpsc::channel();

        let worker_shared = shared.clone();
        let handle = thread::Builder::new()
            .name("ranking-worker".to_string())
            .spawn(move || run(engine, worker_shared, tx))?;

        Ok((
            Self {
                shared: shared.clone(),
                handle: Some(handle),
            },
            RankingReceiver { rx, shared },
        ))
    }

    /// Queue a ranking request and return its generation number.
    /// Any earlier request still pending or running is superseded.
    pub fn submit(&self, query: impl Into<String>, candidates: Vec<Document>) -> u64 {
        let mut slot = self.shared.slot.lock();
        let generation = self.shared.latest.fetch_add(1, Ordering::AcqRel) + 1;

        supersede(&mut slot);
        slot.pending = Some(RankingJob {
            generation,
            query: query.into(),
            candidates,
            cancel: CancelToken::new(),
        });
        self.shared.condvar.notify_one();

        generation
    }

    /// Cancel whatever is pending or running; no outcome will be delivered for it
    pub fn cancel(&self) {
        let mut slot = self.shared.slot.lock();
        self.shared.latest.fetch_add(1, Ordering::AcqRel);
        supersede(&mut slot);
    }

    /// True while a request is queued or running
    pub fn is_busy(&self) -> bool {
        let slot = self.shared.slot.lock();
        slot.pending.is_some() || slot.in_flight.is_some()
    }

    pub fn latest_generation(&self) -> u64 {
        self.shared.latest.load(Ordering::Acquire)
    }
}

impl Drop for RankingWorker {
    fn drop(&mut self) {
        {
            let mut slot = self.shared.slot.lock();
            slot.shutdown = true;
            supersede(&mut slot);
            self.shared.condvar.notify_all();
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn supersede(slot: &mut Slot) {
    if let Some(job) = slot.pending.take() {
        debug!(generation = job.generation, "Dropping superseded ranking request");
    }
    if let Some(cancel) = &slot.in_flight {
        cancel.cancel();
    }
}

fn run(engine: RankingEngine, shared: Arc<Shared>, tx: mpsc::Sender<RankingOutcome>) {
    loop {
        let job = {
            let mut slot = shared.slot.lock();
            while slot.pending.is_none() && !slot.shutdown {
                shared.condvar.wait(&mut slot);
            }
            if slot.shutdown {
                break;
            }
            match slot.pending.take() {
                Some(job) => {
                    slot.in_flight = Some(job.cancel.clone());
                    job
                }
                None => continue,
            }
        };

        debug!(generation = job.generation, candidates = job.candidates.len(), "Ranking started");
        let result = engine.rank_with_cancel(&job.query, &job.candidates, &job.cancel);
        shared.slot.lock().in_flight = None;

        let outcome = RankingOutcome {
            generation: job.generation,
            result,
        };
        if tx.send(outcome).is_err() {
            // receiver gone, nobody is listening
            break;
        }
    }
}

impl RankingReceiver {
    fn is_current(&self, outcome: &RankingOutcome) -> bool {
        let current = outcome.generation == self.shared.latest.load(Ordering::Acquire);
        if !current {
            debug!(generation = outcome.generation, "Discarding stale ranking outcome");
        }
        current
    }

    /// Block until the latest request finishes.
    /// Returns `None` once the worker has shut down.
    pub fn recv(&self) -> Option<RankingOutcome> {
        loop {
            let outcome = self.rx.recv().ok()?;
            if self.is_current(&outcome) {
                return Some(outcome);
            }
        }
    }

    /// Like [`recv`](Self::recv) but gives up after `timeout`
    pub fn recv_timeout(&self, timeout: Duration) -> Option<RankingOutcome> {
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            let outcome = self.rx.recv_timeout(remaining).ok()?;
            if self.is_current(&outcome) {
                return Some(outcome);
            }
        }
    }

    /// Non-blocking poll
    pub fn try_recv(&self) -> Option<RankingOutcome> {
        loop {
            let outcome = self.rx.try_recv().ok()?;
            if self.is_current(&outcome) {
                return Some(outcome);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use resumerank_core::Error;

    fn candidates() -> Vec<Document> {
        vec![
            Document::new("c1", "senior python developer"),
            Document::new("c2", "graphic designer"),
        ]
    }

    #[test]
    fn test_submit_and_receive() {
        let (worker, receiver) = RankingWorker::spawn(RankingEngine::default()).unwrap();
        let generation = worker.submit("python developer", candidates());

        let outcome = receiver.recv_timeout(Duration::from_secs(10)).unwrap();
        assert_eq!(outcome.generation, generation);
        let report = outcome.result.unwrap();
        assert_eq!(report.results[0].name, "c1");
    }

    #[test]
    fn test_only_latest_request_delivered() {
        let (worker, receiver) = RankingWorker::spawn(RankingEngine::default()).unwrap();
        worker.submit("graphic designer", candidates());
        let latest = worker.submit("python developer", candidates());

        let outcome = receiver.recv_timeout(Duration::from_secs(10)).unwrap();
        assert_eq!(outcome.generation, latest);
        assert_eq!(outcome.result.unwrap().results[0].name, "c1");
        assert!(receiver.try_recv().is_none());
    }

    #[test]
    fn test_cancel_suppresses_outcome() {
        let (worker, receiver) = RankingWorker::spawn(RankingEngine::default()).unwrap();
        worker.submit("python developer", candidates());
        worker.cancel();

        assert!(receiver.recv_timeout(Duration::from_millis(200)).is_none());
    }

    #[test]
    fn test_errors_are_delivered() {
        let (worker, receiver) = RankingWorker::spawn(RankingEngine::default()).unwrap();
        worker.submit("   ", candidates());

        let outcome = receiver.recv_timeout(Duration::from_secs(10)).unwrap();
        assert!(matches!(outcome.result, Err(Error::Validation(_))));
    }

    #[test]
    fn test_drop_shuts_down() {
        let (worker, receiver) = RankingWorker::spawn(RankingEngine::default()).unwrap();
        drop(worker);
        assert!(receiver.recv().is_none());
    }
}
