use crate::error::Result;
use crate::executor::Executor;
use crate::ordered_map::OrderedMap;

use super::{collect_and_execute, expose, ComponentHandle};

/// Runs components grouped into non-negative phases, phases in ascending
/// order, each phase applying the flat-scheduler protocol. Components
/// within a phase are expected to be mutually independent; a phase
/// number lets later phases depend on earlier ones' exposed output.
pub struct PhasedScheduler {
    phases: OrderedMap<u32, Vec<ComponentHandle>>,
}

impl PhasedScheduler {
    pub fn new() -> Self {
        PhasedScheduler {
            phases: OrderedMap::new(),
        }
    }

    pub fn add_component(&mut self, component: ComponentHandle, phase: u32) {
        let (idx, _) = self.phases.try_emplace(phase, Vec::new);
        self.phases
            .index_mut(idx)
            .expect("try_emplace just returned this index")
            .push(component);
    }

    pub fn step(&self, exec: &dyn Executor) -> Result<()> {
        for phase_idx in 0..self.phases.size() {
            let components = self.phases.index(phase_idx)?;

            for c in components {
                collect_and_execute(c, exec)?;
            }
            if let Err(e) = exec.sync() {
                tracing::error!(error = %e, phase = phase_idx, "step() propagating functor error from collect/execute phase");
                return Err(e);
            }

            for c in components {
                expose(c, exec)?;
            }
            if let Err(e) = exec.sync() {
                tracing::error!(error = %e, phase = phase_idx, "step() propagating functor error from expose phase");
                return Err(e);
            }
        }
        Ok(())
    }
}

impl Default for PhasedScheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Buffer;
    use crate::component::{connect, Component};
    use crate::executor::SerialExecutor;
    use std::sync::{Arc, Mutex};

    #[test]
    fn later_phase_sees_earlier_phases_output_same_step() {
        let mut emitter = Component::new(Box::new(|_inputs, outputs| {
            *outputs.at_mut(&"default".to_string())? = Buffer::from_bytes(vec![7]);
            Ok(())
        }));
        emitter.make_out_port("default");

        let mut consumer = Component::new(Box::new(|_, _| Ok(())));
        consumer.make_in_port("default");
        connect(&emitter, "default", &mut consumer, "default").unwrap();

        let emitter = Arc::new(Mutex::new(emitter));
        let consumer = Arc::new(Mutex::new(consumer));

        let mut scheduler = PhasedScheduler::new();
        scheduler.add_component(emitter.clone(), 0);
        scheduler.add_component(consumer.clone(), 1);

        let exec = SerialExecutor::new();
        scheduler.step(&exec).unwrap();

        // consumer's collect happens in phase 1, after phase 0's expose barrier,
        // so it sees emitter's value within the same step() call.
        assert_eq!(
            *consumer.lock().unwrap().input("default").unwrap(),
            Buffer::from_bytes(vec![7])
        );
    }
}
