use parking_lot::Mutex;

use crate::error::Result;

use super::{Executor, WorkUnit};

/// Runs every posted unit inline, on the caller's thread, the moment it's
/// posted. `sync` has nothing to wait for; it only surfaces the first
/// error seen since the previous call.
#[derive(Default)]
pub struct SerialExecutor {
    first_error: Mutex<Option<crate::error::FlowstepError>>,
}

impl SerialExecutor {
    pub fn new() -> Self {
        SerialExecutor {
            first_error: Mutex::new(None),
        }
    }
}

impl Executor for SerialExecutor {
    fn post(&self, work: WorkUnit) -> Result<()> {
        if let Err(e) = work() {
            tracing::warn!(error = %e, "work unit failed");
            let mut slot = self.first_error.lock();
            if slot.is_none() {
                *slot = Some(e);
            }
        }
        Ok(())
    }

    fn sync(&self) -> Result<()> {
        match self.first_error.lock().take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
