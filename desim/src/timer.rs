//! Self-scheduled events.

use crate::component::{Endpoint, EndpointId, TickContext};
use crate::error::{trace_err, SimError};
use crate::event::Event;
use crate::port::Port;
use crate::time::SimulationTime;

/// A self-scheduled event queue owned by a component.
///
/// Structurally a [`Port<M>`] paired with an implicit zero-setup self-link:
/// `set` enqueues directly onto the timer's own heap rather than going
/// through a separate `Link`, since the owner and the target are always the
/// same component. A newtype over `Port` avoids a second implementation of
/// the same heap.
#[derive(Debug, Clone)]
pub struct Timer<M> {
    queue: Port<M>,
}

impl<M> Timer<M> {
    /// Creates an empty, unregistered timer.
    pub fn new() -> Self {
        Timer { queue: Port::new() }
    }

    /// Schedules `msg` to fire at `cx.current_time() + delay`.
    ///
    /// Errors with [`SimError::InvalidDelay`] if `delay <= 0`.
    pub fn set(&self, cx: &TickContext, msg: M, delay: i64) -> Result<(), SimError> {
        if delay <= 0 {
            return Err(trace_err(SimError::InvalidDelay));
        }
        self.queue.push(Event::new(msg, cx.current_time() + delay));
        Ok(())
    }

    /// The time of the earliest pending timer event, `NO_EVENT` if none is
    /// scheduled.
    pub fn peek_time(&self) -> SimulationTime {
        self.queue.peek_time()
    }

    /// Returns `true` if no timer event is currently scheduled.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Pops and returns every message due at `t`, oldest-scheduled first;
    /// see [`Port::drain_at`].
    pub fn drain_at(&self, t: SimulationTime) -> Vec<M> {
        self.queue.drain_at(t)
    }
}

impl<M> Default for Timer<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> Endpoint for Timer<M> {
    fn bind(&mut self, id: EndpointId) {
        self.queue.bind(id);
    }

    fn endpoint_id(&self) -> Option<EndpointId> {
        self.queue.endpoint_id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::SimulatorId;

    fn cx(time: i64) -> TickContext {
        TickContext::new(SimulationTime::new(time), SimulatorId(0))
    }

    #[test]
    fn nonpositive_delay_errors() {
        let timer = Timer::new();
        assert_eq!(timer.set(&cx(0), 1, 0).unwrap_err(), SimError::InvalidDelay);
        assert_eq!(timer.set(&cx(0), 1, -1).unwrap_err(), SimError::InvalidDelay);
    }

    #[test]
    fn set_schedules_relative_to_current_time() {
        let timer = Timer::new();
        timer.set(&cx(10), "wake", 5).unwrap();
        assert_eq!(timer.peek_time(), SimulationTime::new(15));
        assert_eq!(timer.drain_at(SimulationTime::new(15)), vec!["wake"]);
        assert!(timer.is_empty());
    }
}
