//! The component base contract and the identifiers that replace cyclic
//! component→simulator back-pointers.

use crate::time::SimulationTime;

/// Identifies a [`Simulator`](crate::simulation::Simulator) instance.
///
/// Ports, links and timers are stamped with the id of the simulator they are
/// registered to, so that [`Simulator::connect`](crate::simulation::Simulator::connect)
/// can reject a link and port that belong to different simulators
/// (`SimulatorMismatch`) without either side holding an actual reference to
/// the other's simulator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SimulatorId(pub(crate) u64);

/// A dense index identifying a registered component within its simulator's
/// arena.
///
/// This is an arena-and-indices replacement for a back-pointer from a port,
/// link or timer to its owning component.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ComponentId(pub(crate) usize);

/// The `(simulator, component)` pair stamped onto every port, link and timer
/// at registration time.
///
/// This is what `register_endpoints` writes into each endpoint in place of
/// a structural-reflection field walk.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EndpointId {
    pub(crate) simulator: SimulatorId,
    pub(crate) component: ComponentId,
}

/// A by-value handle threaded through `tick` and into `send`/`set` calls.
///
/// `TickContext` replaces the back-reference a link or timer would otherwise
/// need to read "the current time" from its owning component's simulator.
/// It carries only what a tick body needs: the current time, plus the
/// identity of the driving simulator for any future call site that needs it
/// (cross-simulator `send`/`set` is already rejected earlier, at `connect`
/// time, via `SimulatorMismatch`).
#[derive(Clone, Copy, Debug)]
pub struct TickContext {
    pub(crate) time: SimulationTime,
    #[allow(dead_code)]
    pub(crate) simulator: SimulatorId,
}

impl TickContext {
    pub(crate) fn new(time: SimulationTime, simulator: SimulatorId) -> Self {
        TickContext { time, simulator }
    }

    /// The simulator's current time at the moment this tick started.
    ///
    /// Captured once per tick: sends issued mid-tick never change which
    /// messages a component's own drain sees, since link latency is always
    /// `>= 1` and cannot land in the same tick.
    pub fn current_time(&self) -> SimulationTime {
        self.time
    }
}

/// An endpoint that can be bound to a `(simulator, component)` pair.
///
/// Implemented by [`Port`](crate::port::Port), [`Link`](crate::link::Link),
/// [`BroadcastLink`](crate::link::BroadcastLink), [`BatchLink`](crate::link::BatchLink)
/// and [`Timer`](crate::timer::Timer). `register_endpoints` implementations
/// walk every field of this kind (directly or inside a `Vec`) and call
/// `bind` on each, which is the hand-written stand-in for compile-time
/// field reflection.
pub trait Endpoint {
    /// Stamps this endpoint with its owner's identity. Called exactly once,
    /// by `Simulator::register`.
    fn bind(&mut self, id: EndpointId);

    /// The `(simulator, component)` pair this endpoint was stamped with, if
    /// it has been registered.
    fn endpoint_id(&self) -> Option<EndpointId>;
}

/// The polymorphic capability every registered simulation component
/// implements.
///
/// This trait is a dynamic-dispatch replacement for inheritance-based
/// component bases with overridable `tick`/`next_wake`: the simulator holds
/// components as `Box<dyn Component>` in a dense arena, keyed by
/// [`ComponentId`].
///
/// Hand-written implementations are legal, but the common case is to use the
/// [`component!`](crate::component!) macro, which derives `tick`,
/// `next_wake`, and `register_endpoints` from a declarative description of a
/// struct's ports, links and timers.
pub trait Component {
    /// Stamps every port, link and timer this component owns with `id`.
    ///
    /// The default implementation does nothing, which is correct for
    /// components with no endpoints at all: a component with no ports is
    /// legal and simply never wakes.
    fn register_endpoints(&mut self, id: EndpointId) {
        let _ = id;
    }

    /// Runs one tick. `is_startup` and `is_shutdown` select the run loop's
    /// three phases; at most one of them is `true`.
    ///
    /// The default implementation is a no-op.
    fn tick(&mut self, cx: &TickContext, is_startup: bool, is_shutdown: bool) {
        let _ = (cx, is_startup, is_shutdown);
    }

    /// The earliest time this component must next be ticked, or `NO_EVENT`.
    ///
    /// Must equal the minimum of `peek_time()` across every port and timer
    /// the component owns. The [`component!`](crate::component!) macro
    /// derives this automatically; hand-written components must maintain it
    /// themselves.
    fn next_wake(&self) -> SimulationTime;
}
