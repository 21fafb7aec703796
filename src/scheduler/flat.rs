use crate::error::Result;
use crate::executor::Executor;

use super::{collect_and_execute, expose, ComponentHandle};

/// Runs every registered component, every step, with a single barrier
/// between the collect/execute phase and the expose phase.
pub struct FlatScheduler {
    components: Vec<ComponentHandle>,
}

impl FlatScheduler {
    pub fn new() -> Self {
        FlatScheduler {
            components: Vec::new(),
        }
    }

    pub fn add_component(&mut self, component: ComponentHandle) {
        self.components.push(component);
    }

    /// Run one collect/execute/expose cycle over every registered
    /// component, using `exec` to (optionally) parallelize within each
    /// phase.
    pub fn step(&self, exec: &dyn Executor) -> Result<()> {
        for c in &self.components {
            collect_and_execute(c, exec)?;
        }
        if let Err(e) = exec.sync() {
            tracing::error!(error = %e, "step() propagating functor error from collect/execute phase");
            return Err(e);
        }

        for c in &self.components {
            expose(c, exec)?;
        }
        if let Err(e) = exec.sync() {
            tracing::error!(error = %e, "step() propagating functor error from expose phase");
            return Err(e);
        }
        Ok(())
    }
}

impl Default for FlatScheduler {
    fn default() -> Self {
        Self::new()
    }
}
