//! Executor: runs posted work units, either inline or across a fixed pool
//! of worker threads, with a barrier that waits for every unit posted
//! since the last `sync` to finish.

mod pool;
mod serial;

pub use pool::{PoolConfig, PoolExecutor};
pub use serial::SerialExecutor;

use crate::error::Result;

/// A unit of work handed to an [`Executor`]: a component's
/// collect/execute/expose call (or some subset of it), boxed so it can
/// cross a thread boundary.
pub type WorkUnit = Box<dyn FnOnce() -> Result<()> + Send>;

/// Posts and synchronizes work units. `post` never blocks the caller past
/// enqueueing; `sync` blocks until every unit posted since the previous
/// `sync` (or since construction) has run, then returns the first error
/// any of them produced, if any.
pub trait Executor: Send + Sync {
    fn post(&self, work: WorkUnit) -> Result<()>;
    fn sync(&self) -> Result<()>;
}
