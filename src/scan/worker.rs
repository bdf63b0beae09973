//! Background scan worker.
//!
//! Runs [`ScanEngine::scan`] on its own thread so the caller stays free to
//! redraw and to accept a cancel request. Progress and the final result come
//! back over a channel; the only shared state is the cancellation flag.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{unbounded, Receiver, TryRecvError};
use tracing::warn;

use super::engine::ScanEngine;
use super::error::ScanError;
use super::types::{ProgressEvent, ScanRequest, ScanResult};

/// Message from the worker thread.
#[derive(Debug)]
pub enum ScanEvent {
    /// One folder was visited.
    Progress(ProgressEvent),
    /// The scan is over. Always the last event sent.
    Finished(Result<ScanResult, ScanError>),
}

/// Spawns scans on a background thread.
pub struct ScanWorker;

impl ScanWorker {
    pub fn spawn(engine: ScanEngine, request: ScanRequest) -> ScanHandle {
        Self::spawn_with_flag(engine, request, Arc::new(AtomicBool::new(false)))
    }

    /// Spawn using an existing cancellation flag, e.g. one also set by a
    /// signal handler.
    pub fn spawn_with_flag(
        engine: ScanEngine,
        request: ScanRequest,
        cancelled: Arc<AtomicBool>,
    ) -> ScanHandle {
        let (tx, rx) = unbounded();
        let worker_flag = Arc::clone(&cancelled);

        let join = thread::spawn(move || {
            let progress_tx = tx.clone();
            let result = engine.scan(
                request,
                |event| {
                    // The receiver may already be gone
                    let _ = progress_tx.send(ScanEvent::Progress(event.clone()));
                },
                || worker_flag.load(Ordering::Relaxed),
            );
            let _ = tx.send(ScanEvent::Finished(result));
        });

        ScanHandle {
            events: rx,
            cancelled,
            join: Some(join),
        }
    }
}

/// Handle to a running (or finished) background scan.
pub struct ScanHandle {
    events: Receiver<ScanEvent>,
    cancelled: Arc<AtomicBool>,
    join: Option<JoinHandle<()>>,
}

impl ScanHandle {
    /// Receiver for progress and the final result.
    pub fn events(&self) -> &Receiver<ScanEvent> {
        &self.events
    }

    /// Drain every event available right now without blocking.
    ///
    /// Also returns the events sent before the worker disconnected.
    pub fn try_events(&self) -> Vec<ScanEvent> {
        let mut drained = Vec::new();
        loop {
            match self.events.try_recv() {
                Ok(event) => drained.push(event),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        drained
    }

    /// Ask the worker to stop at the next folder.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// Whether the worker thread has exited.
    pub fn is_finished(&self) -> bool {
        self.join.as_ref().map_or(true, |j| j.is_finished())
    }

    /// Block until the scan ends and return its result, discarding progress.
    pub fn wait(mut self) -> Result<ScanResult, ScanError> {
        let mut finished = None;
        for event in self.events.iter() {
            if let ScanEvent::Finished(result) = event {
                finished = Some(result);
            }
        }

        if let Some(join) = self.join.take() {
            if join.join().is_err() {
                warn!("scan worker panicked");
            }
        }

        finished.unwrap_or(Err(ScanError::WorkerStopped))
    }
}

impl Drop for ScanHandle {
    fn drop(&mut self) {
        // Dropping the handle cancels a scan that is still running
        if self.join.is_some() {
            self.cancel();
        }
    }
}
