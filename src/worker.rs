// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Background computation.
//!
//! An [`IsochroneWorker`] owns one thread that serves requests in arrival
//! order. [`IsochroneWorker::submit`] returns a [`PendingIsochrones`] handle
//! carrying a unique [`RequestId`] and a [`CancellationToken`].
//!
//! # Cancellation
//!
//! Cancellation only acts at job boundaries. A job cancelled while still
//! queued is skipped. A job that is already running is **not** interrupted:
//! it runs to completion and its result is dropped. Timing out in
//! [`PendingIsochrones::wait`] cancels the token, so a slow request never
//! blocks the caller for longer than the timeout, but the worker stays busy
//! until that request is done. Either way the handle then resolves to
//! [`IsochroneError::Cancelled`].
//!
//! Workers are ordinary values; any number may exist at once.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{bounded, unbounded, Receiver, RecvTimeoutError, Sender, TryRecvError};
use log::{debug, warn};

use crate::bands::Band;
use crate::config::EngineConfig;
use crate::engine::{compute_isochrones, IsochroneRequest};
use crate::error::IsochroneError;

/// Correlation id of one submitted request, unique per worker.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(u64);

impl RequestId {
    #[inline]
    pub const fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Shared flag telling the worker a result is no longer wanted.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

type JobResult = Result<Vec<Band>, IsochroneError>;

struct Job {
    id: RequestId,
    request: IsochroneRequest,
    token: CancellationToken,
    reply: Sender<JobResult>,
}

/// Handle to one submitted request.
#[derive(Debug)]
pub struct PendingIsochrones {
    id: RequestId,
    token: CancellationToken,
    reply: Receiver<JobResult>,
}

impl PendingIsochrones {
    #[inline]
    pub fn id(&self) -> RequestId {
        self.id
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Give up on this request. See the module docs for what that means.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Block until the result arrives or `timeout` elapses.
    ///
    /// On timeout the request is cancelled and [`IsochroneError::TimedOut`]
    /// is returned.
    pub fn wait(self, timeout: Duration) -> JobResult {
        match self.reply.recv_timeout(timeout) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => {
                self.token.cancel();
                warn!("request {} timed out after {:?}", self.id, timeout);
                Err(IsochroneError::TimedOut { id: self.id })
            }
            Err(RecvTimeoutError::Disconnected) => Err(self.no_reply()),
        }
    }

    /// Non-blocking poll: `None` while the request is still pending.
    pub fn try_result(&self) -> Option<JobResult> {
        match self.reply.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(self.no_reply())),
        }
    }

    /// Why the worker hung up without answering.
    fn no_reply(&self) -> IsochroneError {
        if self.token.is_cancelled() {
            IsochroneError::Cancelled { id: self.id }
        } else {
            IsochroneError::WorkerUnavailable
        }
    }
}

/// A single background thread computing isochrone bands.
pub struct IsochroneWorker {
    jobs: Option<Sender<Job>>,
    join: Option<JoinHandle<()>>,
    next_id: AtomicU64,
    config: EngineConfig,
}

impl IsochroneWorker {
    pub fn spawn(config: EngineConfig) -> Result<Self, IsochroneError> {
        let (tx, rx) = unbounded::<Job>();
        let worker_config = config.clone();
        let join = thread::Builder::new()
            .name("isochrone-worker".into())
            .spawn(move || run(rx, worker_config))
            .map_err(|e| {
                warn!("failed to start isochrone worker: {e}");
                IsochroneError::WorkerUnavailable
            })?;
        debug!("isochrone worker started");
        Ok(Self {
            jobs: Some(tx),
            join: Some(join),
            next_id: AtomicU64::new(1),
            config,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Queue a request.
    pub fn submit(&self, request: IsochroneRequest) -> Result<PendingIsochrones, IsochroneError> {
        let id = RequestId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let token = CancellationToken::new();
        let (reply_tx, reply_rx) = bounded(1);
        let job = Job {
            id,
            request,
            token: token.clone(),
            reply: reply_tx,
        };
        self.jobs
            .as_ref()
            .ok_or(IsochroneError::WorkerUnavailable)?
            .send(job)
            .map_err(|_| IsochroneError::WorkerUnavailable)?;
        debug!("request {id} queued");
        Ok(PendingIsochrones {
            id,
            token,
            reply: reply_rx,
        })
    }

    /// Submit and wait for the configured timeout.
    pub fn compute(&self, request: IsochroneRequest) -> JobResult {
        self.submit(request)?.wait(self.config.timeout())
    }
}

impl Drop for IsochroneWorker {
    fn drop(&mut self) {
        // Closing the queue ends the loop once pending jobs are drained.
        drop(self.jobs.take());
        if let Some(join) = self.join.take() {
            if join.join().is_err() {
                warn!("isochrone worker panicked");
            }
        }
        debug!("isochrone worker stopped");
    }
}

fn run(jobs: Receiver<Job>, config: EngineConfig) {
    for job in jobs.iter() {
        if job.token.is_cancelled() {
            debug!("request {} cancelled before start, skipped", job.id);
            continue;
        }
        let result = compute_isochrones(&job.request, &config);
        if job.token.is_cancelled() {
            debug!("request {} finished after cancellation, result discarded", job.id);
            continue;
        }
        // The caller may have dropped its handle.
        let _ = job.reply.send(result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::GeoBounds;
    use crate::julian::CalendarDate;

    fn request(prayer: &str) -> IsochroneRequest {
        IsochroneRequest::new(
            prayer,
            GeoBounds::new(2.0, 3.0, 48.0, 49.0).unwrap(),
            CalendarDate::new(2024, 6, 21).unwrap(),
        )
        .with_timezone(1.0)
    }

    #[test]
    fn ids_are_unique_and_increasing() {
        let worker = IsochroneWorker::spawn(EngineConfig::default()).unwrap();
        let a = worker.submit(request("dhuhr")).unwrap();
        let b = worker.submit(request("dhuhr")).unwrap();
        assert!(a.id() < b.id());
        assert!(a.wait(Duration::from_secs(60)).is_ok());
        assert!(b.wait(Duration::from_secs(60)).is_ok());
    }

    #[test]
    fn errors_come_back_per_request() {
        let worker = IsochroneWorker::spawn(EngineConfig::default()).unwrap();
        let bad = worker.submit(request("tarawih")).unwrap();
        let good = worker.submit(request("dhuhr")).unwrap();
        assert_eq!(
            bad.wait(Duration::from_secs(60)),
            Err(IsochroneError::InvalidPrayer("tarawih".into()))
        );
        assert!(!good.wait(Duration::from_secs(60)).unwrap().is_empty());
    }

    #[test]
    fn zero_timeout_cancels() {
        let worker = IsochroneWorker::spawn(EngineConfig::default()).unwrap();
        // Keep the worker busy so the second job is still queued.
        let _busy = worker.submit(request("fajr")).unwrap();
        let pending = worker.submit(request("fajr")).unwrap();
        let token = pending.token().clone();
        let id = pending.id();
        assert_eq!(
            pending.wait(Duration::ZERO),
            Err(IsochroneError::TimedOut { id })
        );
        assert!(token.is_cancelled());
    }

    // Dense enough to keep the worker busy for a noticeable while.
    fn slow_request() -> IsochroneRequest {
        request("fajr").with_latitude_samples(5_000)
    }

    #[test]
    fn cancelled_while_queued_is_skipped() {
        let worker = IsochroneWorker::spawn(EngineConfig::default()).unwrap();
        let busy = worker.submit(slow_request()).unwrap();
        let queued = worker.submit(request("dhuhr")).unwrap();
        let after = worker.submit(request("dhuhr")).unwrap();
        queued.cancel();

        // Dropping the worker drains the queue before joining.
        drop(worker);
        assert!(matches!(busy.try_result(), Some(Ok(bands)) if !bands.is_empty()));
        assert_eq!(
            queued.try_result(),
            Some(Err(IsochroneError::Cancelled { id: queued.id() }))
        );
        assert!(matches!(after.try_result(), Some(Ok(_))));
    }

    #[test]
    fn cancelled_while_running_sends_nothing() {
        let worker = IsochroneWorker::spawn(EngineConfig::default()).unwrap();
        let running = worker.submit(slow_request()).unwrap();
        thread::sleep(Duration::from_millis(10));
        running.cancel();
        assert_eq!(running.try_result(), None);

        // The worker keeps serving once the cancelled job has finished.
        let next = worker.submit(request("dhuhr")).unwrap();
        assert!(next.wait(Duration::from_secs(120)).is_ok());
        assert_eq!(
            running.try_result(),
            Some(Err(IsochroneError::Cancelled { id: running.id() }))
        );
    }

    #[test]
    fn token_is_shared() {
        let token = CancellationToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        assert!(clone.is_cancelled());
    }
}
