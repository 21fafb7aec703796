//! Scheduler: drives stepping of a set of components. Three variants —
//! [`FlatScheduler`], [`PhasedScheduler`], [`VirtualTimeScheduler`] — share
//! the same `add_component` + `step` shape but differ in how they
//! determine which components act on a given `step()` call.

mod flat;
mod phased;
mod virtual_time;

pub use flat::FlatScheduler;
pub use phased::PhasedScheduler;
pub use virtual_time::{Timing, VirtualTimeScheduler};

use std::sync::{Arc, Mutex as StdMutex};

use crate::component::Component;
use crate::error::Result;
use crate::executor::Executor;

/// A component handle shared between the caller (who built the graph) and
/// the scheduler (who drives it). The scheduler never owns a component
/// outright — only `Arc<Mutex<Component>>` handles, mirroring that a
/// `post`ed closure must own a `'static` reference to call into it from a
/// worker thread.
pub type ComponentHandle = Arc<StdMutex<Component>>;

/// Run `collect()` then `execute()` on `component`, translating a poisoned
/// lock (a previous panic inside the functor) into the same error a
/// functor failure would produce.
pub(crate) fn collect_and_execute(component: &ComponentHandle, exec: &dyn Executor) -> Result<()> {
    let component = component.clone();
    exec.post(Box::new(move || {
        let mut c = component.lock().unwrap_or_else(|e| e.into_inner());
        c.collect()?;
        c.execute()
    }))
}

/// Run `expose()` on `component` via the executor.
pub(crate) fn expose(component: &ComponentHandle, exec: &dyn Executor) -> Result<()> {
    let component = component.clone();
    exec.post(Box::new(move || {
        let mut c = component.lock().unwrap_or_else(|e| e.into_inner());
        c.expose()
    }))
}
