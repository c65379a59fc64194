//! Helper components.
//!
//! This module contains small, domain-agnostic components useful for
//! simulation bench assembly: keeping a bench alive past quiescence, and
//! recording everything a port receives for later inspection.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use desim::component;
use desim::component::{Component, Endpoint, EndpointId, TickContext};
use desim::port::Port;
use desim::time::SimulationTime;
use desim::timer::Timer;

/// Self-schedules on a fixed period purely to keep a bench's
/// `sim.next_event` non-`NO_EVENT`.
///
/// This kernel's `keep_going()` condition naturally quiesces once every
/// port and timer drains, so add a `Heartbeat` to a bench that otherwise
/// has no other source of activity and would stop at `t = 0`.
#[derive(Debug)]
pub struct Heartbeat {
    period: i64,
    alarm: Timer<()>,
}

impl Heartbeat {
    /// Creates a `Heartbeat` that re-arms itself every `period` ticks.
    ///
    /// `period` must be strictly positive: a non-positive period is only
    /// rejected once the bench runs, via the
    /// [`SimError::InvalidDelay`](desim::error::SimError::InvalidDelay)
    /// `Timer::set` itself raises.
    pub fn new(period: i64) -> Self {
        Heartbeat {
            period,
            alarm: Timer::new(),
        }
    }
}

component! {
    Heartbeat {
        timers { alarm: Timer<()> }
        startup(sim) {
            self.alarm.set(sim, (), self.period).unwrap();
        }
        on_timer(alarm, _msg, sim) {
            self.alarm.set(sim, (), self.period).unwrap();
        }
    }
}

/// A shared, `Rc`-backed log of `(arrival time, message)` pairs.
///
/// Cloning a [`Recorder`]'s `log_handle()` before registering it with a
/// [`Simulator`](desim::simulation::Simulator) is what lets test/demo code
/// read recorded messages back after `run()` returns, since the
/// `Recorder` itself is moved into the simulator's component arena at
/// registration, the same "keep a cheap shared clone before handing
/// ownership to the simulation" pattern `Port` and `Link` use, applied
/// here to a sink's results rather than to wiring.
pub type RecorderLog<M> = Rc<RefCell<Vec<(SimulationTime, M)>>>;

/// Appends every message a single [`Port<M>`] receives, together with its
/// arrival time, to a shared in-memory log.
///
/// `Recorder` is an ordinary component whose `on_message` handler appends
/// to its own log, rather than a sink type the simulation pushes into
/// directly.
pub struct Recorder<M> {
    /// The port fed by whatever the bench connects to it.
    pub inbox: Port<M>,
    log: RecorderLog<M>,
}

impl<M> Recorder<M> {
    /// Creates a `Recorder` with an empty log.
    pub fn new() -> Self {
        Recorder {
            inbox: Port::new(),
            log: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// A cheap, shared clone of this recorder's log. Take one before
    /// registering the recorder with a simulator so the recorded messages
    /// remain readable after `run()` returns.
    pub fn log_handle(&self) -> RecorderLog<M> {
        Rc::clone(&self.log)
    }
}

impl<M> Default for Recorder<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> fmt::Debug for Recorder<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Recorder")
            .field("logged", &self.log.borrow().len())
            .finish()
    }
}

impl<M: 'static> Component for Recorder<M> {
    fn register_endpoints(&mut self, id: EndpointId) {
        Endpoint::bind(&mut self.inbox, id);
    }

    fn next_wake(&self) -> SimulationTime {
        self.inbox.peek_time()
    }

    fn tick(&mut self, cx: &TickContext, is_startup: bool, is_shutdown: bool) {
        if is_startup || is_shutdown {
            return;
        }
        let time = cx.current_time();
        let mut log = self.log.borrow_mut();
        for msg in self.inbox.drain_at(time) {
            log.push((time, msg));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use desim::link::Link;
    use desim::simulation::Simulator;

    struct Pinger {
        out: Link<u32>,
    }

    impl Pinger {
        fn new() -> Self {
            Pinger {
                out: Link::new(1).unwrap(),
            }
        }
    }

    component! {
        Pinger {
            links { out: Link<u32> }
            startup(sim) {
                self.out.send(sim, 7, 0).unwrap();
            }
        }
    }

    #[test]
    fn recorder_logs_arrival_time_and_message() {
        let mut sim = Simulator::new(0);

        let pinger = Pinger::new();
        let pinger_out = pinger.out.clone();

        let recorder = Recorder::<u32>::new();
        let recorder_inbox = recorder.inbox.clone();
        let log = recorder.log_handle();

        sim.register(pinger, "pinger").unwrap();
        sim.register(recorder, "recorder").unwrap();
        sim.connect(&pinger_out, &recorder_inbox).unwrap();

        sim.run();

        assert_eq!(*log.borrow(), vec![(SimulationTime::new(1), 7)]);
    }

    #[test]
    fn heartbeat_keeps_a_bench_alive_until_quit_time() {
        let mut sim = Simulator::new(5);
        sim.register(Heartbeat::new(1), "heartbeat").unwrap();
        sim.run();
        assert_eq!(sim.current_time(), SimulationTime::new(6));
    }
}
