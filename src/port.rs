//! Port: a shared single-slot mailbox between one writer and N readers.
//!
//! A port is an identity-typed handle — cloning it shares the same
//! underlying slot, and two handles compare equal iff they refer to the same
//! slot. `get`/`set` never block across components in a well-formed graph,
//! because the scheduler's phase barrier already guarantees writers and
//! readers never touch a port within the same phase; the mutex exists for
//! memory safety, not for contention.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::buffer::Buffer;

struct Slot {
    content: Mutex<Option<Buffer>>,
}

/// A single-slot mailbox holding the most recently exposed [`Buffer`].
#[derive(Clone)]
pub struct Port {
    slot: Arc<Slot>,
}

impl Port {
    /// A freshly allocated, empty port.
    pub fn new() -> Self {
        Port {
            slot: Arc::new(Slot {
                content: Mutex::new(None),
            }),
        }
    }

    /// Replace the stored buffer.
    pub fn set(&self, buffer: Buffer) {
        *self.slot.content.lock() = Some(buffer);
    }

    /// The currently stored buffer, or `None` if nothing has ever been
    /// exposed to this port.
    pub fn get(&self) -> Option<Buffer> {
        self.slot.content.lock().clone()
    }
}

impl Default for Port {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Port {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.slot, &other.slot)
    }
}
impl Eq for Port {}

impl std::fmt::Debug for Port {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Port")
            .field("has_value", &self.slot.content.lock().is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_port_is_empty() {
        let p = Port::new();
        assert!(p.get().is_none());
    }

    #[test]
    fn set_then_get_round_trips() {
        let p = Port::new();
        let b = Buffer::from_bytes(vec![1, 2, 3]);
        p.set(b.clone());
        assert_eq!(p.get(), Some(b));
    }

    #[test]
    fn clone_aliases_same_slot() {
        let p = Port::new();
        let q = p.clone();
        p.set(Buffer::from_bytes(vec![9]));
        assert_eq!(q.get(), Some(Buffer::from_bytes(vec![9])));
        assert_eq!(p, q);
    }

    #[test]
    fn distinct_ports_are_not_equal() {
        let a = Port::new();
        let b = Port::new();
        assert_ne!(a, b);
    }
}
