use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{unbounded, Sender};
use parking_lot::{Condvar, Mutex};

use crate::error::{FlowstepError, Result};

use super::{Executor, WorkUnit};

/// Configuration for a [`PoolExecutor`].
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
pub struct PoolConfig {
    /// Number of worker threads. Values below 1 are treated as 1.
    pub worker_count: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        PoolConfig {
            worker_count: thread::available_parallelism().map(|n| n.get()).unwrap_or(1),
        }
    }
}

struct State {
    posted: usize,
    completed: usize,
    first_error: Option<FlowstepError>,
}

struct Shared {
    state: Mutex<State>,
    cond: Condvar,
}

/// Runs posted work units across a fixed pool of worker threads. `sync`
/// blocks the caller until every unit posted since the previous `sync`
/// has completed, then returns the first error any of them raised.
pub struct PoolExecutor {
    sender: Mutex<Option<Sender<WorkUnit>>>,
    workers: Mutex<Vec<JoinHandle<()>>>,
    shared: Arc<Shared>,
}

impl PoolExecutor {
    pub fn new(config: PoolConfig) -> Self {
        let worker_count = config.worker_count.max(1);
        let (sender, receiver) = unbounded::<WorkUnit>();
        let shared = Arc::new(Shared {
            state: Mutex::new(State {
                posted: 0,
                completed: 0,
                first_error: None,
            }),
            cond: Condvar::new(),
        });

        tracing::debug!(worker_count, "starting flowstep pool executor");

        let workers = (0..worker_count)
            .map(|id| {
                let receiver = receiver.clone();
                let shared = shared.clone();
                thread::Builder::new()
                    .name(format!("flowstep-pool-{id}"))
                    .spawn(move || {
                        tracing::trace!(worker = id, "pool worker thread started");
                        while let Ok(work) = receiver.recv() {
                            let result = work();
                            let mut state = shared.state.lock();
                            match result {
                                Ok(()) => {}
                                Err(e) => {
                                    tracing::warn!(worker = id, error = %e, "work unit failed");
                                    if state.first_error.is_none() {
                                        state.first_error = Some(e);
                                    }
                                }
                            }
                            state.completed += 1;
                            shared.cond.notify_all();
                        }
                        tracing::trace!(worker = id, "pool worker thread stopped");
                    })
                    .expect("failed to spawn flowstep pool worker thread")
            })
            .collect();

        PoolExecutor {
            sender: Mutex::new(Some(sender)),
            workers: Mutex::new(workers),
            shared,
        }
    }

    /// Close the intake channel: every future `post` fails with
    /// [`FlowstepError::PoolShutDown`]. Work already queued still runs.
    pub fn shutdown(&self) {
        tracing::debug!("shutting down flowstep pool executor intake");
        self.sender.lock().take();
    }
}

impl Executor for PoolExecutor {
    fn post(&self, work: WorkUnit) -> Result<()> {
        let guard = self.sender.lock();
        let sender = guard.as_ref().ok_or(FlowstepError::PoolShutDown)?;
        self.shared.state.lock().posted += 1;
        sender.send(work).map_err(|_| FlowstepError::PoolShutDown)
    }

    fn sync(&self) -> Result<()> {
        let mut state = self.shared.state.lock();
        while state.completed < state.posted {
            self.shared.cond.wait(&mut state);
        }
        state.posted = 0;
        state.completed = 0;
        match state.first_error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl Drop for PoolExecutor {
    fn drop(&mut self) {
        self.sender.lock().take();
        for worker in self.workers.lock().drain(..) {
            let _ = worker.join();
        }
    }
}
