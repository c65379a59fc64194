//! Outbound handles bound to one, many, or an engine-chosen number of ports.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::component::{Endpoint, EndpointId, TickContext};
use crate::error::{trace_err, SimError};
use crate::event::Event;
use crate::port::Port;
use crate::time::SimulationTime;

/// The latency `BatchLink` currently assigns to every send.
///
/// A future multi-threaded scheduler may want a coarser, engine-chosen
/// latency for batch/metadata traffic so it can use link latencies as a
/// safe-frontier bound; no such scheduler exists in this crate, so the
/// value is fixed. Revisit once a parallel scheduler motivates a
/// different policy.
const BATCH_LINK_LATENCY: i64 = 1;

fn checked_latency(latency: i64) -> Result<i64, SimError> {
    if latency <= 0 {
        Err(trace_err(SimError::InvalidLatency))
    } else {
        Ok(latency)
    }
}

fn checked_extra_delay(extra_delay: i64) -> Result<i64, SimError> {
    if extra_delay < 0 {
        Err(trace_err(SimError::InvalidDelay))
    } else {
        Ok(extra_delay)
    }
}

struct LinkInner<M> {
    latency: i64,
    target: Option<Port<M>>,
    id: Option<EndpointId>,
}

/// A unicast outbound handle to a single [`Port<M>`].
///
/// Constructed with a fixed, strictly positive `latency`. Must be bound
/// to exactly one port via
/// [`Simulator::connect`](crate::simulation::Simulator::connect) before
/// `send` succeeds; rebinding an already-connected `Link` is an error.
///
/// Like [`Port`], a `Link` is a cheap, `Rc`-backed clone: keep a clone
/// before handing the owning component to
/// [`Simulator::register`](crate::simulation::Simulator::register) (which
/// takes the component by value) so the link can still be passed to
/// `connect` afterwards.
pub struct Link<M> {
    inner: Rc<RefCell<LinkInner<M>>>,
}

impl<M> Link<M> {
    /// Creates a unicast link with the given latency.
    ///
    /// Errors with [`SimError::InvalidLatency`] if `latency <= 0`.
    pub fn new(latency: i64) -> Result<Self, SimError> {
        Ok(Link {
            inner: Rc::new(RefCell::new(LinkInner {
                latency: checked_latency(latency)?,
                target: None,
                id: None,
            })),
        })
    }

    /// The link's base latency.
    pub fn latency(&self) -> SimulationTime {
        SimulationTime::new(self.inner.borrow().latency)
    }

    /// `true` once this link has been bound to a port.
    pub fn is_connected(&self) -> bool {
        self.inner.borrow().target.is_some()
    }

    /// Binds this link to `port`. Called once by
    /// [`Simulator::connect`](crate::simulation::Simulator::connect).
    pub(crate) fn connect_to(&self, port: Port<M>) -> Result<(), SimError> {
        let mut inner = self.inner.borrow_mut();
        if inner.target.is_some() {
            return Err(trace_err(SimError::AlreadyConnected));
        }
        inner.target = Some(port);
        Ok(())
    }

    /// Enqueues `msg` on the target port, due at
    /// `cx.current_time() + latency() + extra_delay`.
    ///
    /// Errors with [`SimError::NotConnected`] if no port is bound, or
    /// [`SimError::InvalidDelay`] if `extra_delay < 0`.
    pub fn send(&self, cx: &TickContext, msg: M, extra_delay: i64) -> Result<(), SimError> {
        let extra_delay = checked_extra_delay(extra_delay)?;
        let inner = self.inner.borrow();
        let target = inner
            .target
            .as_ref()
            .ok_or_else(|| trace_err(SimError::NotConnected))?;
        let arrival = cx.current_time() + (inner.latency + extra_delay);
        target.push(Event::new(msg, arrival));
        Ok(())
    }
}

impl<M> Clone for Link<M> {
    fn clone(&self) -> Self {
        Link {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<M> fmt::Debug for Link<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Link")
            .field("latency", &self.latency())
            .field("connected", &self.is_connected())
            .finish()
    }
}

impl<M> Endpoint for Link<M> {
    fn bind(&mut self, id: EndpointId) {
        self.inner.borrow_mut().id = Some(id);
    }

    fn endpoint_id(&self) -> Option<EndpointId> {
        self.inner.borrow().id
    }
}

struct BroadcastLinkInner<M> {
    latency: i64,
    targets: Vec<Port<M>>,
    id: Option<EndpointId>,
}

/// An outbound handle that fans a single send out to zero or more bound
/// ports.
///
/// Unlike [`Link`], connecting a second (third, ...) port is not an error:
/// the target list grows monotonically during the simulator's `Building`
/// state. Sending with zero bound ports is a silent no-op rather than
/// [`SimError::NotConnected`]; this asymmetry with `Link::send` is
/// deliberate.
pub struct BroadcastLink<M> {
    inner: Rc<RefCell<BroadcastLinkInner<M>>>,
}

impl<M> BroadcastLink<M> {
    /// Creates a broadcast link with the given latency and no bound ports.
    ///
    /// Errors with [`SimError::InvalidLatency`] if `latency <= 0`.
    pub fn new(latency: i64) -> Result<Self, SimError> {
        Ok(BroadcastLink {
            inner: Rc::new(RefCell::new(BroadcastLinkInner {
                latency: checked_latency(latency)?,
                targets: Vec::new(),
                id: None,
            })),
        })
    }

    /// The link's base latency.
    pub fn latency(&self) -> SimulationTime {
        SimulationTime::new(self.inner.borrow().latency)
    }

    /// The number of ports currently bound.
    pub fn target_count(&self) -> usize {
        self.inner.borrow().targets.len()
    }

    /// Appends `port` to the target list. Called by
    /// [`Simulator::connect`](crate::simulation::Simulator::connect).
    pub(crate) fn connect_to(&self, port: Port<M>) {
        self.inner.borrow_mut().targets.push(port);
    }
}

impl<M: Clone> BroadcastLink<M> {
    /// Enqueues a clone of `msg` on every bound port, all with the
    /// identical arrival time `cx.current_time() + latency() + extra_delay`.
    ///
    /// A silent no-op (`Ok(())`) if no port is bound.
    pub fn send(&self, cx: &TickContext, msg: M, extra_delay: i64) -> Result<(), SimError> {
        let extra_delay = checked_extra_delay(extra_delay)?;
        let inner = self.inner.borrow();
        if inner.targets.is_empty() {
            return Ok(());
        }
        let arrival = cx.current_time() + (inner.latency + extra_delay);
        for target in &inner.targets {
            target.push(Event::new(msg.clone(), arrival));
        }
        Ok(())
    }
}

impl<M> Clone for BroadcastLink<M> {
    fn clone(&self) -> Self {
        BroadcastLink {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<M> fmt::Debug for BroadcastLink<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BroadcastLink")
            .field("latency", &self.latency())
            .field("target_count", &self.target_count())
            .finish()
    }
}

impl<M> Endpoint for BroadcastLink<M> {
    fn bind(&mut self, id: EndpointId) {
        self.inner.borrow_mut().id = Some(id);
    }

    fn endpoint_id(&self) -> Option<EndpointId> {
        self.inner.borrow().id
    }
}

/// A unicast link whose latency is chosen by the engine rather than by the
/// caller, reserved for coarser-grained traffic a future parallel scheduler
/// may want to treat differently from user latencies.
///
/// Currently always `1`; see [`BATCH_LINK_LATENCY`]. Behaves exactly like
/// [`Link`] otherwise, including being a cheap `Rc`-backed clone.
pub struct BatchLink<M> {
    inner: Link<M>,
}

impl<M> BatchLink<M> {
    /// Creates a batch link with the engine-assigned latency.
    pub fn new() -> Self {
        BatchLink {
            inner: Link::new(BATCH_LINK_LATENCY).expect("engine-assigned latency is positive"),
        }
    }

    /// The link's current latency (presently always `1`).
    pub fn latency(&self) -> SimulationTime {
        self.inner.latency()
    }

    /// `true` once this link has been bound to a port.
    pub fn is_connected(&self) -> bool {
        self.inner.is_connected()
    }

    pub(crate) fn connect_to(&self, port: Port<M>) -> Result<(), SimError> {
        self.inner.connect_to(port)
    }

    /// Enqueues `msg` on the target port; see [`Link::send`].
    pub fn send(&self, cx: &TickContext, msg: M, extra_delay: i64) -> Result<(), SimError> {
        self.inner.send(cx, msg, extra_delay)
    }
}

impl<M> Clone for BatchLink<M> {
    fn clone(&self) -> Self {
        BatchLink {
            inner: self.inner.clone(),
        }
    }
}

impl<M> Default for BatchLink<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> fmt::Debug for BatchLink<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchLink").field("inner", &self.inner).finish()
    }
}

impl<M> Endpoint for BatchLink<M> {
    fn bind(&mut self, id: EndpointId) {
        self.inner.bind(id);
    }

    fn endpoint_id(&self) -> Option<EndpointId> {
        self.inner.endpoint_id()
    }
}

/// Connects a link type to a [`Port<M>`], the common surface
/// [`Simulator::connect`](crate::simulation::Simulator::connect) dispatches
/// through regardless of whether the link is unicast, broadcast, or batch.
pub trait LinkConnect<M> {
    /// Binds `port` as (one of) this link's send target(s).
    fn attach(&self, port: Port<M>) -> Result<(), SimError>;
}

impl<M> LinkConnect<M> for Link<M> {
    fn attach(&self, port: Port<M>) -> Result<(), SimError> {
        self.connect_to(port)
    }
}

impl<M: Clone> LinkConnect<M> for BroadcastLink<M> {
    fn attach(&self, port: Port<M>) -> Result<(), SimError> {
        self.connect_to(port);
        Ok(())
    }
}

impl<M> LinkConnect<M> for BatchLink<M> {
    fn attach(&self, port: Port<M>) -> Result<(), SimError> {
        self.connect_to(port)
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
    fn rejects_nonpositive_latency() {
        assert_eq!(Link::<u32>::new(0).unwrap_err(), SimError::InvalidLatency);
        assert_eq!(Link::<u32>::new(-1).unwrap_err(), SimError::InvalidLatency);
    }

    #[test]
    fn unconnected_unicast_send_errors() {
        let link = Link::new(1).unwrap();
        let err = link.send(&cx(0), 42, 0).unwrap_err();
        assert_eq!(err, SimError::NotConnected);
    }

    #[test]
    fn unconnected_broadcast_send_is_noop() {
        let link: BroadcastLink<u32> = BroadcastLink::new(1).unwrap();
        assert!(link.send(&cx(0), 42, 0).is_ok());
    }

    #[test]
    fn connecting_unicast_twice_errors() {
        let link = Link::new(1).unwrap();
        let port_a = Port::new();
        let port_b = Port::new();
        link.connect_to(port_a).unwrap();
        let err = link.connect_to(port_b).unwrap_err();
        assert_eq!(err, SimError::AlreadyConnected);
    }

    #[test]
    fn unicast_send_computes_arrival_with_extra_delay() {
        let port = Port::new();
        let link = Link::new(3).unwrap();
        link.connect_to(port.clone()).unwrap();
        link.send(&cx(10), "hi", 5).unwrap();
        assert_eq!(port.peek_time(), SimulationTime::new(18));
    }

    #[test]
    fn negative_extra_delay_errors() {
        let port = Port::new();
        let link = Link::new(1).unwrap();
        link.connect_to(port).unwrap();
        let err = link.send(&cx(0), "x", -1).unwrap_err();
        assert_eq!(err, SimError::InvalidDelay);
    }

    #[test]
    fn broadcast_send_reaches_every_bound_port_at_same_time() {
        let link: BroadcastLink<u32> = BroadcastLink::new(1).unwrap();
        let a = Port::new();
        let b = Port::new();
        link.connect_to(a.clone());
        link.connect_to(b.clone());
        link.send(&cx(5), 7, 0).unwrap();
        assert_eq!(a.peek_time(), SimulationTime::new(6));
        assert_eq!(b.peek_time(), SimulationTime::new(6));
    }

    #[test]
    fn batch_link_latency_is_one() {
        let link: BatchLink<u32> = BatchLink::new();
        assert_eq!(link.latency(), SimulationTime::new(1));
    }

    #[test]
    fn clones_share_the_same_binding() {
        let link = Link::new(1).unwrap();
        let handle = link.clone();
        let port = Port::new();
        handle.connect_to(port).unwrap();
        assert!(link.is_connected());
    }
}
