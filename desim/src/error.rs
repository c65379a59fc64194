//! Error taxonomy for the simulation kernel.

use std::error::Error;
use std::fmt;

/// Errors raised by the simulation API.
///
/// All variants are fail-fast and synchronous: the engine never retries a
/// failed operation, and a failure raised from within a `tick` aborts `run`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SimError {
    /// A component with this name is already registered with the simulator.
    AlreadyRegistered(String),
    /// The link or port is not registered with any simulator yet.
    NotRegistered,
    /// The link and the port it was connected to belong to different
    /// simulators.
    SimulatorMismatch,
    /// A unicast [`Link`](crate::link::Link) was connected to a port while
    /// already bound to another one.
    AlreadyConnected,
    /// `send` was called on a unicast link that has no bound port.
    NotConnected,
    /// A link was constructed, or connected, with a non-positive latency.
    InvalidLatency,
    /// `Timer::set` was called with a non-positive delay, or `send` was
    /// called with a negative `extra_delay`.
    InvalidDelay,
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::AlreadyRegistered(name) => {
                write!(f, "a component named `{name}` is already registered")
            }
            SimError::NotRegistered => {
                write!(f, "the link or port is not registered with a simulator")
            }
            SimError::SimulatorMismatch => {
                write!(f, "the link and the port belong to different simulators")
            }
            SimError::AlreadyConnected => write!(f, "the link is already connected to a port"),
            SimError::NotConnected => write!(f, "send on a unicast link with no bound port"),
            SimError::InvalidLatency => write!(f, "link latency must be strictly positive"),
            SimError::InvalidDelay => write!(f, "delay must be strictly positive"),
        }
    }
}

impl Error for SimError {}

/// Emits a `tracing::debug!` event for an error right before it is returned
/// to the caller, so a `tracing-subscriber` consumer observes failures even
/// when the `Result` is only inspected further downstream.
#[cfg(feature = "tracing")]
pub(crate) fn trace_err(err: SimError) -> SimError {
    tracing::debug!(error = %err, "simulation API call failed");
    err
}

#[cfg(not(feature = "tracing"))]
pub(crate) fn trace_err(err: SimError) -> SimError {
    err
}
