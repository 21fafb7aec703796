use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::error::{FlowstepError, Result};
use crate::executor::Executor;

use super::{collect_and_execute, expose, ComponentHandle};

/// `(offset, interval, sleep)` — when a component first wakes, how long
/// it stays awake, how long it sleeps. Immutable after registration.
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
pub struct Timing {
    /// Virtual time of the first wake-up.
    pub offset: u64,
    /// Time from wake to next sleep.
    pub interval: u64,
    /// Time from sleep to next wake.
    pub sleep: u64,
}

/// Which half of its duty cycle a component was invoked for during a
/// [`VirtualTimeScheduler::step`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Collect + execute: the component is starting its active window.
    Awake,
    /// Expose: the component is finishing its active window.
    Asleep,
}

struct Event {
    time: u64,
    seq: u64,
    component: usize,
    timing: Timing,
    /// `true` if this event owes an `expose` (the component is ending its
    /// wake period); `false` if it owes `collect` + `execute` (starting
    /// one).
    asleep: bool,
}

impl PartialEq for Event {
    fn eq(&self, other: &Self) -> bool {
        self.time == other.time && self.seq == other.seq
    }
}
impl Eq for Event {}
impl PartialOrd for Event {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Event {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.time, self.seq).cmp(&(other.time, other.seq))
    }
}

/// Drives stepping from a min-heap of events, one per registered
/// component, ordered by virtual time. See the module's `step` doc for
/// the two-bucket, barrier-separated dispatch algorithm.
pub struct VirtualTimeScheduler {
    components: Vec<ComponentHandle>,
    queue: BinaryHeap<Reverse<Event>>,
    next_seq: u64,
}

impl VirtualTimeScheduler {
    pub fn new() -> Self {
        VirtualTimeScheduler {
            components: Vec::new(),
            queue: BinaryHeap::new(),
            next_seq: 0,
        }
    }

    pub fn add_component(&mut self, component: ComponentHandle, timing: Timing) {
        let index = self.components.len();
        self.components.push(component);
        self.push(Event {
            time: timing.offset,
            seq: self.next_seq,
            component: index,
            timing,
            asleep: false,
        });
    }

    fn push(&mut self, mut event: Event) {
        event.seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(Reverse(event));
    }

    /// Advance virtual time to the earliest pending event, drain every
    /// event at that timestamp into an asleep-bucket and an awake-bucket,
    /// run the asleep-bucket's `expose` behind a barrier, then run the
    /// awake-bucket's `collect` + `execute` behind a second barrier.
    ///
    /// Fails with [`FlowstepError::NoScheduledWork`] if no components are
    /// registered.
    pub fn step(&mut self, exec: &dyn Executor) -> Result<Vec<(usize, Phase)>> {
        let time = match self.queue.peek() {
            Some(Reverse(e)) => e.time,
            None => {
                tracing::warn!("step() called with an empty event queue");
                return Err(FlowstepError::NoScheduledWork);
            }
        };
        tracing::trace!(time, "advancing virtual time");

        let mut batch = Vec::new();
        while matches!(self.queue.peek(), Some(Reverse(e)) if e.time == time) {
            let Reverse(event) = self
                .queue
                .pop()
                .expect("peek just confirmed an event exists at this time");
            batch.push(event);
        }

        let mut asleep_bucket = Vec::new();
        let mut awake_bucket = Vec::new();
        for event in batch {
            if event.asleep {
                asleep_bucket.push(event);
            } else {
                awake_bucket.push(event);
            }
        }

        for event in &asleep_bucket {
            self.push(Event {
                time: time + event.timing.sleep,
                seq: 0,
                component: event.component,
                timing: event.timing,
                asleep: false,
            });
        }
        for event in &awake_bucket {
            self.push(Event {
                time: time + event.timing.interval,
                seq: 0,
                component: event.component,
                timing: event.timing,
                asleep: true,
            });
        }

        let mut trace = Vec::with_capacity(asleep_bucket.len() + awake_bucket.len());

        for event in &asleep_bucket {
            expose(&self.components[event.component], exec)?;
        }
        if let Err(e) = exec.sync() {
            tracing::error!(error = %e, time, "step() propagating functor error from asleep-bucket expose");
            return Err(e);
        }
        for event in &asleep_bucket {
            trace.push((event.component, Phase::Asleep));
        }

        for event in &awake_bucket {
            collect_and_execute(&self.components[event.component], exec)?;
        }
        if let Err(e) = exec.sync() {
            tracing::error!(error = %e, time, "step() propagating functor error from awake-bucket collect/execute");
            return Err(e);
        }
        for event in &awake_bucket {
            trace.push((event.component, Phase::Awake));
        }

        // Reported in component-index order (a per-step status listing),
        // independent of which bucket actually ran first — the barrier
        // order above (asleep's expose, then awake's collect/execute) is
        // what correctness depends on, not this ordering.
        trace.sort_by_key(|(index, _)| *index);
        Ok(trace)
    }
}

impl Default for VirtualTimeScheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::Component;
    use crate::executor::SerialExecutor;
    use std::sync::{Arc, Mutex};

    fn noop_component() -> ComponentHandle {
        Arc::new(Mutex::new(Component::new(Box::new(|_, _| Ok(())))))
    }

    #[test]
    fn p4_virtual_time_ordering() {
        let mut scheduler = VirtualTimeScheduler::new();
        scheduler.add_component(
            noop_component(),
            Timing {
                offset: 0,
                interval: 1,
                sleep: 1,
            },
        );
        scheduler.add_component(
            noop_component(),
            Timing {
                offset: 0,
                interval: 2,
                sleep: 2,
            },
        );

        let exec = SerialExecutor::new();

        let step1 = scheduler.step(&exec).unwrap();
        assert_eq!(step1, vec![(0, Phase::Awake), (1, Phase::Awake)]);

        let step2 = scheduler.step(&exec).unwrap();
        assert_eq!(step2, vec![(0, Phase::Asleep)]);

        let step3 = scheduler.step(&exec).unwrap();
        assert_eq!(step3, vec![(0, Phase::Awake), (1, Phase::Asleep)]);

        let step4 = scheduler.step(&exec).unwrap();
        assert_eq!(step4, vec![(0, Phase::Asleep)]);

        let step5 = scheduler.step(&exec).unwrap();
        assert_eq!(step5, vec![(0, Phase::Awake), (1, Phase::Awake)]);
    }

    #[test]
    fn empty_scheduler_fails_with_no_scheduled_work() {
        let mut scheduler = VirtualTimeScheduler::new();
        let exec = SerialExecutor::new();
        assert!(matches!(
            scheduler.step(&exec),
            Err(FlowstepError::NoScheduledWork)
        ));
    }

    #[test]
    fn p10_functor_error_does_not_corrupt_event_queue() {
        let failing = Arc::new(Mutex::new(Component::new(Box::new(|_, _| {
            Err(anyhow::anyhow!("boom"))
        }))));
        let healthy = noop_component();

        let mut scheduler = VirtualTimeScheduler::new();
        scheduler.add_component(
            failing,
            Timing {
                offset: 0,
                interval: 1,
                sleep: 1,
            },
        );
        scheduler.add_component(
            healthy,
            Timing {
                offset: 0,
                interval: 1,
                sleep: 1,
            },
        );

        let exec = SerialExecutor::new();
        assert!(matches!(
            scheduler.step(&exec),
            Err(FlowstepError::Functor(_))
        ));

        // Despite the failure, virtual time still advances in order on the
        // next call: both components were scheduled asleep at time 1.
        let step2 = scheduler.step(&exec).unwrap();
        assert_eq!(step2, vec![(0, Phase::Asleep), (1, Phase::Asleep)]);
    }

    #[test]
    fn p6_no_stale_reads_asleep_before_awake_barrier() {
        use crate::buffer::Buffer;
        use crate::component::connect;

        let mut writer = Component::new(Box::new(|_inputs, outputs| {
            let current = outputs.at(&"o".to_string())?.size();
            *outputs.at_mut(&"o".to_string())? = Buffer::from_bytes(vec![current as u8 + 1]);
            Ok(())
        }));
        writer.make_out_port("o");

        let mut reader = Component::new(Box::new(|_, _| Ok(())));
        reader.make_in_port("o");
        connect(&writer, "o", &mut reader, "o").unwrap();

        let writer = Arc::new(Mutex::new(writer));
        let reader = Arc::new(Mutex::new(reader));

        let mut scheduler = VirtualTimeScheduler::new();
        scheduler.add_component(
            writer.clone(),
            Timing {
                offset: 0,
                interval: 1,
                sleep: 1,
            },
        );
        scheduler.add_component(
            reader.clone(),
            Timing {
                offset: 0,
                interval: 1,
                sleep: 1,
            },
        );

        let exec = SerialExecutor::new();
        scheduler.step(&exec).unwrap(); // both awake: collect+execute only, nothing exposed yet
        assert!(reader.lock().unwrap().input("o").unwrap().is_empty());

        scheduler.step(&exec).unwrap(); // both asleep: expose now runs
        scheduler.step(&exec).unwrap(); // both awake again: reader collects writer's step-1 value
        assert_eq!(
            reader.lock().unwrap().input("o").unwrap().data(),
            &[1]
        );
    }
}
