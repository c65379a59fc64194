//! Simulation time.
//!
//! `SimulationTime` is an opaque tick counter. The engine only assumes it is
//! monotonically non-decreasing and addable; what a tick *means* (a
//! nanosecond, a clock cycle, a turn) is left entirely to the user.

use std::fmt;
use std::ops::Add;

/// Sentinel value meaning "no event pending".
///
/// Numerically `-1`, chosen so that `SimulationTime` can be a plain signed
/// integer without an `Option` wrapper at every call site. Use
/// [`SimulationTime::earliest`] (never a bare `min`/`cmp`) whenever `NO_EVENT`
/// may be one of the operands, since `NO_EVENT` must be treated as `+∞`, not
/// as the smallest time.
pub const NO_EVENT: SimulationTime = SimulationTime(-1);

/// A point in virtual time, measured in ticks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SimulationTime(i64);

impl SimulationTime {
    /// The origin of simulated time (`t = 0`).
    pub const ZERO: SimulationTime = SimulationTime(0);

    /// Builds a `SimulationTime` from a raw tick count.
    ///
    /// Passing `-1` is equivalent to [`NO_EVENT`]; any other negative value
    /// is accepted (ticks are only required to be addable and monotone, not
    /// non-negative) but will never compare equal to `NO_EVENT`.
    pub const fn new(ticks: i64) -> Self {
        SimulationTime(ticks)
    }

    /// Returns the raw tick count.
    pub const fn ticks(self) -> i64 {
        self.0
    }

    /// Returns `true` if this is the [`NO_EVENT`] sentinel.
    pub const fn is_no_event(self) -> bool {
        self.0 == NO_EVENT.0
    }

    /// Returns the earlier of two times, treating [`NO_EVENT`] as `+∞`.
    ///
    /// This is the only correct way to fold a set of `SimulationTime`s
    /// together (spec invariant: `sim.next_event` is the min over components,
    /// "treating NO_EVENT as +∞, or NO_EVENT if all are").
    pub fn earliest(self, other: Self) -> Self {
        match (self.is_no_event(), other.is_no_event()) {
            (true, true) => NO_EVENT,
            (true, false) => other,
            (false, true) => self,
            (false, false) => self.min(other),
        }
    }

    /// Folds an iterator of times down to the earliest one, `NO_EVENT` if the
    /// iterator is empty or every item is `NO_EVENT`.
    pub fn earliest_of(times: impl IntoIterator<Item = Self>) -> Self {
        times
            .into_iter()
            .fold(NO_EVENT, |acc, t| acc.earliest(t))
    }
}

impl fmt::Display for SimulationTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_no_event() {
            write!(f, "NO_EVENT")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl Add<i64> for SimulationTime {
    type Output = SimulationTime;

    fn add(self, rhs: i64) -> Self::Output {
        debug_assert!(!self.is_no_event(), "cannot offset NO_EVENT");
        SimulationTime(self.0 + rhs)
    }
}

impl Add<SimulationTime> for SimulationTime {
    type Output = SimulationTime;

    fn add(self, rhs: SimulationTime) -> Self::Output {
        self + rhs.0
    }
}

impl From<i64> for SimulationTime {
    fn from(ticks: i64) -> Self {
        SimulationTime(ticks)
    }
}
