//! Component: a pure functor over named input/output ports, with the
//! three-phase collect/execute/expose lifecycle.

use crate::buffer::{compatible, zeros_like, Buffer, BufferInfo};
use crate::error::{FlowstepError, Result};
use crate::ordered_map::OrderedMap;
use crate::port::Port;

/// A private scratch dictionary: the same key set as a component's
/// `in_ports` (respectively `out_ports`), holding the most-recently
/// collected (respectively about-to-be-exposed) values.
pub type Dictionary = OrderedMap<String, Buffer>;

/// A user-supplied callable: read any key of `inputs`, write any key of
/// `outputs`. Must not mutate `in_ports`/`out_ports` or call other
/// components' methods. `Send + Sync` because the executor may invoke it
/// from a worker thread.
pub type Functor = Box<dyn Fn(&Dictionary, &mut Dictionary) -> anyhow::Result<()> + Send + Sync>;

/// A component in the simulation graph: named ports, a private
/// input/output scratch dictionary, and a user functor.
pub struct Component {
    functor: Functor,
    in_ports: OrderedMap<String, Port>,
    out_ports: OrderedMap<String, Port>,
    inputs: Dictionary,
    outputs: Dictionary,
}

impl Component {
    pub fn new(functor: Functor) -> Self {
        Component {
            functor,
            in_ports: OrderedMap::new(),
            out_ports: OrderedMap::new(),
            inputs: OrderedMap::new(),
            outputs: OrderedMap::new(),
        }
    }

    /// Declare an untyped input port. Idempotent: a second call with the
    /// same name is a no-op.
    pub fn make_in_port(&mut self, name: impl Into<String>) {
        let name = name.into();
        self.in_ports.try_emplace(name.clone(), Port::new);
        self.inputs.try_emplace(name, || Buffer::new(0));
    }

    /// Declare a shaped input port: the port and the `inputs` entry both
    /// start pre-filled with a zeroed buffer matching `info`, enabling
    /// [`connect`] to reject shape-incompatible wiring (§4.4 typed variant).
    pub fn make_in_port_shaped(&mut self, name: impl Into<String>, info: BufferInfo) {
        let name = name.into();
        let (_, inserted) = self
            .in_ports
            .try_emplace(name.clone(), Port::new);
        let seed = Buffer::with_info(vec![0u8; info.len() * info.item_size], info);
        if inserted {
            self.in_ports
                .find(&name)
                .expect("try_emplace just inserted this key")
                .set(seed.clone());
        }
        self.inputs.try_emplace(name, || seed);
    }

    /// Declare an untyped output port, allocating a fresh [`Port`].
    /// Idempotent: a second call with the same name is a no-op.
    pub fn make_out_port(&mut self, name: impl Into<String>) {
        let name = name.into();
        self.out_ports.try_emplace(name.clone(), Port::new);
        self.outputs.try_emplace(name, || Buffer::new(0));
    }

    /// Declare a shaped output port (see [`Component::make_in_port_shaped`]).
    pub fn make_out_port_shaped(&mut self, name: impl Into<String>, info: BufferInfo) {
        let name = name.into();
        let (_, inserted) = self
            .out_ports
            .try_emplace(name.clone(), Port::new);
        let seed = Buffer::with_info(vec![0u8; info.len() * info.item_size], info);
        if inserted {
            self.out_ports
                .find(&name)
                .expect("try_emplace just inserted this key")
                .set(seed.clone());
        }
        self.outputs.try_emplace(name, || seed);
    }

    pub fn get_in_port(&self, name: &str) -> Result<Port> {
        self.in_ports.at(&name.to_string()).cloned()
    }

    pub fn get_out_port(&self, name: &str) -> Result<Port> {
        self.out_ports.at(&name.to_string()).cloned()
    }

    /// Read-only access to the current `inputs` scratch, e.g. for test
    /// assertions (see P2).
    pub fn input(&self, name: &str) -> Result<&Buffer> {
        self.inputs.at(&name.to_string())
    }

    /// Read-only access to the current `outputs` scratch.
    pub fn output(&self, name: &str) -> Result<&Buffer> {
        self.outputs.at(&name.to_string())
    }

    /// Collect: for each declared input port, pull its currently exposed
    /// buffer into the private `inputs` dictionary. A port that has never
    /// been written leaves its `inputs` entry untouched.
    pub fn collect(&mut self) -> Result<()> {
        for i in 0..self.in_ports.size() {
            if let Some(buffer) = self.in_ports.index(i)?.get() {
                *self.inputs.index_mut(i)? = buffer;
            }
        }
        Ok(())
    }

    /// Execute: reset each output slot to zero, then invoke the functor.
    /// Resetting first means a functor that doesn't write a given key that
    /// step leaves that key empty rather than stale from a previous step.
    pub fn execute(&mut self) -> Result<()> {
        for i in 0..self.outputs.size() {
            let zeroed = zeros_like(self.outputs.index(i)?);
            *self.outputs.index_mut(i)? = zeroed;
        }
        if let Err(e) = (self.functor)(&self.inputs, &mut self.outputs) {
            tracing::warn!(error = %e, "functor failed during execute");
            return Err(e.into());
        }
        Ok(())
    }

    /// Expose: publish each `outputs` entry to its corresponding out-port.
    pub fn expose(&mut self) -> Result<()> {
        for i in 0..self.out_ports.size() {
            let value = self.outputs.index(i)?.clone();
            self.out_ports.index(i)?.set(value);
        }
        Ok(())
    }
}

/// Rebind `target`'s `tgt_in` input port to `source`'s `src_out` output
/// port. After this call, any prior `Port` handle `target` held for
/// `tgt_in` is dropped — the two components now share the same slot (see
/// P3).
///
/// Fails with [`FlowstepError::KeyNotFound`] if either port is undeclared,
/// or with [`FlowstepError::Incompatible`] if both ports already hold
/// buffers whose shape/format descriptors disagree (the typed variant,
/// §4.4).
pub fn connect(
    source: &Component,
    src_out: &str,
    target: &mut Component,
    tgt_in: &str,
) -> Result<()> {
    let source_port = source.get_out_port(src_out)?;
    target.in_ports.at(&tgt_in.to_string())?; // undeclared input port -> KeyNotFound

    let target_port = target.get_in_port(tgt_in)?;
    if let (Some(src_buf), Some(tgt_buf)) = (source_port.get(), target_port.get()) {
        if !compatible(&src_buf, &tgt_buf) {
            tracing::warn!(src_out, tgt_in, "connect rejected: incompatible buffer shapes");
            return Err(FlowstepError::Incompatible(format!(
                "connect: {src_out} and {tgt_in} have incompatible shapes"
            )));
        }
    }

    *target.in_ports.at_mut(&tgt_in.to_string())? = source_port;
    tracing::trace!(src_out, tgt_in, "connected ports");
    Ok(())
}
