//! Per-component inbound event queues.

use std::cell::RefCell;
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::fmt;
use std::rc::Rc;

use crate::component::{Endpoint, EndpointId};
use crate::event::Event;
use crate::time::{SimulationTime, NO_EVENT};

struct Inner<M> {
    events: BinaryHeap<Reverse<Event<M>>>,
    id: Option<EndpointId>,
}

/// A component's inbound queue for messages of type `M`.
///
/// A `Port` is priority-ordered by arrival time: the earliest-due event is
/// always at the front, and events that arrive at the same time are drained
/// in the order they were enqueued.
///
/// A port is reference-shared between its owning component (which reads
/// from it) and any [`Link`](crate::link::Link) bound to it (which writes
/// to it): cloning a `Port` is a shallow, `Rc`-backed copy. Interior
/// mutability makes `push` available on a shared `&Port`, so a `Link` can
/// enqueue without the component giving up ownership of its read side.
pub struct Port<M> {
    inner: Rc<RefCell<Inner<M>>>,
}

impl<M> Port<M> {
    /// Creates an empty, unregistered port.
    pub fn new() -> Self {
        Port {
            inner: Rc::new(RefCell::new(Inner {
                events: BinaryHeap::new(),
                id: None,
            })),
        }
    }

    /// Inserts `event` in time order.
    pub(crate) fn push(&self, event: Event<M>) {
        self.inner.borrow_mut().events.push(Reverse(event));
    }

    /// The time of the earliest pending event, `NO_EVENT` if the port is
    /// empty.
    pub fn peek_time(&self) -> SimulationTime {
        self.inner
            .borrow()
            .events
            .peek()
            .map(|Reverse(e)| e.time())
            .unwrap_or(NO_EVENT)
    }

    /// Returns `true` if the port holds no pending events.
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().events.is_empty()
    }

    /// Pops and returns every message whose timestamp equals `t`, oldest
    /// insertion first.
    ///
    /// Pre: no pending event has `time < t`; violating this indicates a
    /// scheduling bug in the engine, not a user error, so it is an
    /// assertion rather than a `Result`.
    pub fn drain_at(&self, t: SimulationTime) -> Vec<M> {
        let mut inner = self.inner.borrow_mut();
        let mut drained = Vec::new();
        while let Some(Reverse(event)) = inner.events.peek() {
            assert!(
                event.time() >= t,
                "port holds an event dated before the requested drain time: \
                 {} < {t}",
                event.time()
            );
            if event.time() != t {
                break;
            }
            let Reverse(event) = inner.events.pop().expect("peeked event just vanished");
            drained.push(event.into_message());
        }
        drained
    }
}

impl<M> Clone for Port<M> {
    fn clone(&self) -> Self {
        Port {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<M> Default for Port<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> fmt::Debug for Port<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Port").field("peek_time", &self.peek_time()).finish()
    }
}

impl<M> Endpoint for Port<M> {
    fn bind(&mut self, id: EndpointId) {
        self.inner.borrow_mut().id = Some(id);
    }

    fn endpoint_id(&self) -> Option<EndpointId> {
        self.inner.borrow().id
    }
}
