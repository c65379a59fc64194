//! A discrete-event simulation kernel for modeling systems as graphs of
//! communicating components.
//!
//! `desim` lets you model a system as a set of components exchanging
//! time-stamped messages over latency-bearing links, and deterministically
//! advances a virtual clock while delivering those messages in causal
//! order. It is single-threaded and synchronous by design: a component's
//! `tick` runs to completion on the calling thread, and the only way for a
//! component to "wait" is to schedule a future event and return.
//!
//! # A practical overview
//!
//! Building a simulation typically involves three activities:
//!
//! 1. declaring component types and the ports, links and timers they own,
//! 2. assembling a bench by registering components with a [`Simulator`] and
//!    connecting their links to other components' ports,
//! 3. running the simulator, which advances virtual time and dispatches
//!    ticks until the system quiesces or a quit condition is reached.
//!
//! ## Authoring components
//!
//! A component owns any combination of:
//!
//! * [`Port<M>`](port::Port), an inbound, time-ordered queue of messages of
//!   type `M`,
//! * [`Link<M>`](link::Link), a unicast outbound handle bound to exactly
//!   one port, or [`BroadcastLink<M>`](link::BroadcastLink), which fans a
//!   send out to any number of bound ports, or
//!   [`BatchLink<M>`](link::BatchLink), a unicast link whose latency is
//!   chosen by the engine rather than the caller,
//! * [`Timer<M>`](timer::Timer), a self-scheduled event queue.
//!
//! Components must implement the [`Component`](component::Component) trait,
//! whose `tick` method is dispatched once per step for every component
//! whose [`next_wake`](component::Component::next_wake) equals the
//! simulator's current time. Rather than implementing `Component` by hand,
//! most components use the [`component!`] macro, which derives `tick`,
//! `next_wake` and `register_endpoints` from a declarative list of a
//! struct's ports/links/timers and `on_message`/`on_timer` handlers:
//!
//! ```
//! use desim::component;
//! use desim::link::Link;
//! use desim::port::Port;
//!
//! pub struct Doubler {
//!     pub input: Port<i64>,
//!     pub output: Link<i64>,
//! }
//!
//! impl Doubler {
//!     pub fn new(output_latency: i64) -> Self {
//!         Doubler {
//!             input: Port::new(),
//!             output: Link::new(output_latency).expect("latency must be positive"),
//!         }
//!     }
//! }
//!
//! component! {
//!     Doubler {
//!         ports { input: Port<i64> }
//!         links { output: Link<i64> }
//!         on_message(input, value, sim) {
//!             self.output.send(sim, value * 2, 0).unwrap();
//!         }
//!     }
//! }
//! ```
//!
//! ## Assembling a bench
//!
//! Components are constructed, then registered with a [`Simulator`], which
//! wires `(simulator, component)` identity into each of their endpoints.
//! Links are connected to ports after registration and before `run`:
//!
//! ```ignore
//! use desim::simulation::Simulator;
//!
//! let source = Doubler::default();
//! let sink = Doubler::default();
//! let sink_input = sink.input.clone();
//!
//! let mut sim = Simulator::new(0);
//! let source_id = sim.register(source, "source")?;
//! sim.register(sink, "sink")?;
//! // `connect` binds `source`'s output link to `sink`'s input port; the
//! // real call site has `&mut` access to the registered component's link
//! // field, typically via a handle kept before registration.
//! # let _ = (source_id, sink_input);
//! ```
//!
//! (See the crate's integration tests for complete, runnable bench
//! assembly examples using multiple distinct component types.)
//!
//! ## Running the simulation
//!
//! [`Simulator::run`] fires every component's startup hook, then repeatedly
//! advances `current_time` to the earliest pending event across all
//! components and ticks each component whose wake time matches, until the
//! system quiesces, [`Simulator::quit`] is called, or the configured
//! `quit_time` is exceeded; it then fires every shutdown hook and returns.
//!
//! # Message ordering guarantees
//!
//! `desim` provides two guarantees that make it possible to reason about
//! same-time activity without worrying about execution order ambiguities:
//!
//! 1. *causal delivery*: a message sent at time `t` over a link with total
//!    latency `L` (base latency plus any `extra_delay`) arrives no earlier
//!    than `t + L`, establishing a strict happens-before edge between
//!    send-site and receive-site,
//! 2. *per-tick component order*: within a single tick step, every
//!    component due to wake is ticked exactly once, in registration order.
//!
//! Per-link FIFO is *not* guaranteed across different `extra_delay` values:
//! a later-sent message with a smaller total latency may arrive before an
//! earlier-sent message with a larger one. Within equal total latency,
//! insertion order is preserved via a sequence number on
//! [`Event`](event::Event).
//!
//! # Cargo feature flags
//!
//! ## Tracing
//!
//! The `tracing` feature flag instruments `register`, `connect`, `run` and
//! each per-tick dispatch with [`tracing`](https://docs.rs/tracing)
//! spans/events, and can be activated in `Cargo.toml` with:
//!
//! ```toml
//! [dependencies]
//! desim = { version = "0.1.0", features = ["tracing"] }
//! ```

#![warn(missing_docs, missing_debug_implementations, unreachable_pub)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod component;
pub mod error;
pub mod event;
pub mod link;
mod macros;
pub mod port;
pub mod simulation;
pub mod time;
pub mod timer;
