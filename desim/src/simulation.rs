//! The virtual clock and the per-tick scheduling loop.

use std::sync::atomic::{AtomicU64, Ordering};

use slab::Slab;

use crate::component::{Component, ComponentId, EndpointId, SimulatorId, TickContext};
use crate::error::{trace_err, SimError};
use crate::time::SimulationTime;

static NEXT_SIMULATOR_ID: AtomicU64 = AtomicU64::new(0);

/// The simulator's lifecycle phase.
///
/// `register` and `connect` are only legal during `Building`; `run`
/// transitions `Building -> Running` and, once the run loop exits,
/// `Running -> Terminated`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SimState {
    Building,
    Running,
    Terminated,
}

struct Registered {
    name: String,
    component: Box<dyn Component>,
}

/// Owns the virtual clock, the registered component set, and the run loop.
///
/// `quit_time == 0` means "run until quiescent"; any other value means
/// "stop once `current_time` exceeds it".
pub struct Simulator {
    id: SimulatorId,
    current_time: SimulationTime,
    next_event: SimulationTime,
    quit_time: i64,
    quit_requested: bool,
    components: Slab<Registered>,
    state: SimState,
}

impl Simulator {
    /// Creates a simulator starting at `t = 0`.
    ///
    /// `quit_time == 0` means unbounded; otherwise `run` stops once
    /// `current_time` would exceed it.
    pub fn new(quit_time: i64) -> Self {
        let id = SimulatorId(NEXT_SIMULATOR_ID.fetch_add(1, Ordering::Relaxed));
        #[cfg(feature = "tracing")]
        tracing::trace!(simulator = id.0, quit_time, "simulator created");
        Simulator {
            id,
            current_time: SimulationTime::ZERO,
            next_event: crate::time::NO_EVENT,
            quit_time,
            quit_requested: false,
            components: Slab::new(),
            state: SimState::Building,
        }
    }

    /// The simulator's current virtual time.
    pub fn current_time(&self) -> SimulationTime {
        self.current_time
    }

    /// Registers `component` under `name`, wiring `(simulator, component)`
    /// identity into every endpoint it owns via
    /// [`Component::register_endpoints`].
    ///
    /// Errors with [`SimError::AlreadyRegistered`] if `name` is already
    /// taken by another component registered with this simulator.
    pub fn register<C>(&mut self, mut component: C, name: impl Into<String>) -> Result<ComponentId, SimError>
    where
        C: Component + 'static,
    {
        assert_eq!(
            self.state,
            SimState::Building,
            "register() called outside the Building phase"
        );
        let name = name.into();
        if self.components.iter().any(|(_, r)| r.name == name) {
            return Err(trace_err(SimError::AlreadyRegistered(name)));
        }

        let entry = self.components.vacant_entry();
        let id = ComponentId(entry.key());
        component.register_endpoints(EndpointId {
            simulator: self.id,
            component: id,
        });
        #[cfg(feature = "tracing")]
        tracing::trace!(simulator = self.id.0, component = id.0, name = %name, "component registered");
        entry.insert(Registered { name, component: Box::new(component) });
        Ok(id)
    }

    /// Validates that `link_id` and `port_id` both belong to this simulator,
    /// raising the error taxonomy's `NotRegistered`/`SimulatorMismatch`
    /// variants for the connect-time checks.
    fn check_connectable(
        &self,
        link_id: Option<EndpointId>,
        port_id: Option<EndpointId>,
    ) -> Result<(), SimError> {
        assert_eq!(
            self.state,
            SimState::Building,
            "connect() called outside the Building phase"
        );
        let link_id = link_id.ok_or_else(|| trace_err(SimError::NotRegistered))?;
        let port_id = port_id.ok_or_else(|| trace_err(SimError::NotRegistered))?;
        if link_id.simulator != self.id || port_id.simulator != self.id {
            return Err(trace_err(SimError::SimulatorMismatch));
        }
        Ok(())
    }

    /// Binds `link` to `port`, or appends `port` to `link`'s target list for
    /// a [`BroadcastLink`](crate::link::BroadcastLink).
    ///
    /// Pre: both `link` and `port` belong to components already registered
    /// with this simulator. Errors: `NotRegistered`, `SimulatorMismatch`,
    /// and (for unicast links) `AlreadyConnected`.
    pub fn connect<M, L>(&self, link: &L, port: &crate::port::Port<M>) -> Result<(), SimError>
    where
        L: crate::component::Endpoint + crate::link::LinkConnect<M>,
    {
        self.check_connectable(link.endpoint_id(), port.endpoint_id())?;
        #[cfg(feature = "tracing")]
        tracing::trace!(simulator = self.id.0, "link connected to port");
        link.attach(port.clone())
    }

    /// Requests that `run` stop after the current tick step completes.
    pub fn quit(&mut self) {
        self.quit_requested = true;
    }

    fn keys_in_order(&self) -> Vec<usize> {
        self.components.iter().map(|(key, _)| key).collect()
    }

    fn recompute_next_event(&mut self) {
        self.next_event = SimulationTime::earliest_of(
            self.components.iter().map(|(_, r)| r.component.next_wake()),
        );
    }

    fn tick_one(&mut self, key: usize, is_startup: bool, is_shutdown: bool) {
        let cx = TickContext::new(self.current_time, self.id);
        #[cfg(feature = "tracing")]
        let name = self.components[key].name.clone();
        #[cfg(feature = "tracing")]
        let _span = tracing::trace_span!(
            "tick",
            time = %self.current_time,
            component = %name,
            is_startup,
            is_shutdown
        )
        .entered();
        self.components[key]
            .component
            .tick(&cx, is_startup, is_shutdown);
    }

    fn keep_going(&self) -> bool {
        !self.quit_requested
            && !self.next_event.is_no_event()
            && (self.quit_time == 0 || self.quit_time >= self.current_time.ticks())
    }

    /// Drives the simulation: fires every component's startup hook, then
    /// repeatedly advances `current_time` to the earliest pending event and
    /// ticks every component whose wake time matches, then fires every
    /// shutdown hook. Within a tick step, every component due to wake is
    /// ticked exactly once, in registration order.
    pub fn run(&mut self) {
        assert_eq!(self.state, SimState::Building, "run() called more than once");
        self.state = SimState::Running;
        #[cfg(feature = "tracing")]
        tracing::trace!(simulator = self.id.0, "run started");

        for key in self.keys_in_order() {
            self.tick_one(key, true, false);
        }
        self.recompute_next_event();

        while self.keep_going() {
            self.current_time = self.next_event;
            for key in self.keys_in_order() {
                let wake = self.components[key].component.next_wake();
                if wake == self.current_time {
                    self.tick_one(key, false, false);
                }
            }
            self.recompute_next_event();
        }

        for key in self.keys_in_order() {
            self.tick_one(key, false, true);
        }
        self.state = SimState::Terminated;
        #[cfg(feature = "tracing")]
        tracing::trace!(simulator = self.id.0, time = %self.current_time, "run finished");
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use super::*;
    use crate::link::Link;
    use crate::port::Port;
    use crate::timer::Timer;

    struct NoEndpoints;

    impl Component for NoEndpoints {
        fn next_wake(&self) -> SimulationTime {
            crate::time::NO_EVENT
        }
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut sim = Simulator::new(0);
        sim.register(NoEndpoints, "dup").unwrap();
        let err = sim.register(NoEndpoints, "dup").unwrap_err();
        assert_eq!(err, SimError::AlreadyRegistered("dup".to_string()));
    }

    #[test]
    fn connecting_unregistered_endpoints_errors() {
        let sim = Simulator::new(0);
        let link = Link::<u32>::new(1).unwrap();
        let port = Port::new();
        assert_eq!(sim.connect(&link, &port).unwrap_err(), SimError::NotRegistered);
    }

    #[test]
    fn connecting_across_simulators_errors() {
        struct HasLink {
            link: Link<u32>,
        }
        struct HasPort {
            port: Port<u32>,
        }
        component! { HasLink { links { link: Link<u32> } } }
        component! { HasPort { ports { port: Port<u32> } } }

        let mut sim_a = Simulator::new(0);
        let mut sim_b = Simulator::new(0);

        let comp = HasLink { link: Link::new(1).unwrap() };
        let link = comp.link.clone();
        sim_a.register(comp, "sender").unwrap();

        let comp = HasPort { port: Port::new() };
        let port = comp.port.clone();
        sim_b.register(comp, "receiver").unwrap();

        assert_eq!(sim_a.connect(&link, &port).unwrap_err(), SimError::SimulatorMismatch);
    }

    #[test]
    fn startup_and_shutdown_run_exactly_once_and_never_see_messages() {
        struct Probe {
            link: Link<u32>,
            port: Port<u32>,
            startups: Rc<Cell<u32>>,
            shutdowns: Rc<Cell<u32>>,
            messages_during_boundary: Rc<Cell<u32>>,
        }

        component! {
            Probe {
                ports { port: Port<u32> }
                links { link: Link<u32> }
                startup(sim) {
                    self.startups.set(self.startups.get() + 1);
                    self.link.send(sim, 1, 0).unwrap();
                }
                shutdown(_sim) {
                    self.shutdowns.set(self.shutdowns.get() + 1);
                    if !self.port.is_empty() {
                        self.messages_during_boundary.set(self.messages_during_boundary.get() + 1);
                    }
                }
                on_message(port, _msg, _sim) {
                    // Drained only on ordinary ticks, never during startup/shutdown.
                }
            }
        }

        let startups = Rc::new(Cell::new(0));
        let shutdowns = Rc::new(Cell::new(0));
        let messages_during_boundary = Rc::new(Cell::new(0));

        let mut sim = Simulator::new(0);
        let probe = Probe {
            link: Link::new(1).unwrap(),
            port: Port::new(),
            startups: Rc::clone(&startups),
            shutdowns: Rc::clone(&shutdowns),
            messages_during_boundary: Rc::clone(&messages_during_boundary),
        };
        let link = probe.link.clone();
        let port = probe.port.clone();
        sim.register(probe, "probe").unwrap();
        sim.connect(&link, &port).unwrap();

        sim.run();

        assert_eq!(startups.get(), 1);
        assert_eq!(shutdowns.get(), 1);
        assert_eq!(messages_during_boundary.get(), 0);
    }

    #[test]
    fn ticks_fire_in_registration_order_within_a_step() {
        let order = Rc::new(RefCell::new(Vec::new()));

        struct Named {
            name: &'static str,
            order: Rc<RefCell<Vec<&'static str>>>,
            timer: Timer<()>,
        }

        component! {
            Named {
                timers { timer: Timer<()> }
                startup(sim) {
                    self.timer.set(sim, (), 1).unwrap();
                }
                on_timer(timer, _msg, _sim) {
                    self.order.borrow_mut().push(self.name);
                }
            }
        }

        let mut sim = Simulator::new(0);
        sim.register(
            Named { name: "first", order: Rc::clone(&order), timer: Timer::new() },
            "first",
        )
        .unwrap();
        sim.register(
            Named { name: "second", order: Rc::clone(&order), timer: Timer::new() },
            "second",
        )
        .unwrap();

        sim.run();

        assert_eq!(*order.borrow(), vec!["first", "second"]);
    }

    #[test]
    fn quit_time_bounds_the_run() {
        struct Forever {
            timer: Timer<()>,
        }

        component! {
            Forever {
                timers { timer: Timer<()> }
                startup(sim) {
                    self.timer.set(sim, (), 1).unwrap();
                }
                on_timer(timer, _msg, sim) {
                    self.timer.set(sim, (), 1).unwrap();
                }
            }
        }

        let mut sim = Simulator::new(3);
        sim.register(Forever { timer: Timer::new() }, "forever").unwrap();
        sim.run();

        assert!(sim.current_time().ticks() > 3);
    }

    #[test]
    fn quiescent_simulation_stops_at_zero() {
        let mut sim = Simulator::new(0);
        sim.register(NoEndpoints, "idle").unwrap();
        sim.run();
        assert_eq!(sim.current_time(), SimulationTime::ZERO);
    }
}
