//! flowstep: a discrete-event simulation kernel for modular computational
//! graphs.
//!
//! A graph is built from [`Component`]s, each pairing a user functor with
//! named input/output [`Port`]s. [`connect`] wires a source's output port
//! to a target's input port. A [`scheduler`] drives the graph forward one
//! step at a time through each component's collect/execute/expose
//! lifecycle, dispatching independent work through an [`Executor`].
//!
//! ```
//! use flowstep::{connect, Buffer, Component};
//! use flowstep::executor::SerialExecutor;
//! use flowstep::scheduler::FlatScheduler;
//! use std::sync::{Arc, Mutex};
//!
//! let mut emit = Component::new(Box::new(|_inputs, outputs| {
//!     *outputs.at_mut(&"default".to_string())? = Buffer::from_bytes(vec![1, 2, 3]);
//!     Ok(())
//! }));
//! emit.make_out_port("default");
//!
//! let mut sink = Component::new(Box::new(|_, _| Ok(())));
//! sink.make_in_port("default");
//! connect(&emit, "default", &mut sink, "default").unwrap();
//!
//! let emit = Arc::new(Mutex::new(emit));
//! let sink = Arc::new(Mutex::new(sink));
//!
//! let mut scheduler = FlatScheduler::new();
//! scheduler.add_component(emit.clone());
//! scheduler.add_component(sink.clone());
//!
//! let exec = SerialExecutor::new();
//! scheduler.step(&exec).unwrap();
//! scheduler.step(&exec).unwrap();
//! assert_eq!(*sink.lock().unwrap().input("default").unwrap(), Buffer::from_bytes(vec![1, 2, 3]));
//! ```

pub mod buffer;
pub mod component;
pub mod error;
pub mod executor;
pub mod ordered_map;
pub mod port;
pub mod scheduler;

pub use buffer::{Buffer, BufferInfo};
pub use component::{connect, Component, Dictionary, Functor};
pub use error::{FlowstepError, Result};
pub use ordered_map::OrderedMap;
pub use port::Port;
