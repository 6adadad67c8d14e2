//! Simulated time, and the scheduler abstraction that the network uses to defer chunk arrivals.

pub mod event_queue;

use std::fmt::{Display, Formatter};
use std::ops::Sub;
use ordered_float::OrderedFloat;

/// A point on the simulated timeline, in nanoseconds since the start of the simulation.
///  Fractional nanoseconds are allowed.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub struct SimTime(OrderedFloat<f64>);

impl Display for SimTime {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}ns", self.0)
    }
}

impl SimTime {
    pub const ZERO: SimTime = SimTime(OrderedFloat(0.0));

    pub fn from_ns(ns: f64) -> SimTime {
        SimTime(OrderedFloat(ns))
    }

    pub fn as_ns(&self) -> f64 {
        self.0.into_inner()
    }

    pub fn after(&self, delay: TimeSpec) -> SimTime {
        SimTime::from_ns(self.as_ns() + delay.as_ns())
    }
}

impl Sub for SimTime {
    type Output = TimeSpec;

    fn sub(self, rhs: SimTime) -> TimeSpec {
        TimeSpec::ns(self.as_ns() - rhs.as_ns())
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum TimeUnit {
    S,
    Ms,
    Us,
    Ns,
}
impl TimeUnit {
    fn ns_factor(&self) -> f64 {
        match self {
            TimeUnit::S => 1e9,
            TimeUnit::Ms => 1e6,
            TimeUnit::Us => 1e3,
            TimeUnit::Ns => 1.0,
        }
    }
}

/// A duration on the simulated timeline, expressed as a unit and a magnitude.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct TimeSpec {
    pub unit: TimeUnit,
    pub value: f64,
}
impl TimeSpec {
    pub fn new(unit: TimeUnit, value: f64) -> TimeSpec {
        TimeSpec { unit, value }
    }

    pub fn ns(value: f64) -> TimeSpec {
        TimeSpec::new(TimeUnit::Ns, value)
    }

    pub fn as_ns(&self) -> f64 {
        self.value * self.unit.ns_factor()
    }
}

/// The simulation's clock and event queue, as seen by the network.
///
/// Events are typed values rather than callbacks: the scheduler owns an event from the moment
///  it is scheduled until [EventScheduler::advance] hands it back, and the caller decides how
///  to dispatch it.
///
/// Implementations must guarantee that
/// * an event is returned no earlier than `delay` after the time it was scheduled, and exactly once
/// * events for the same point in time are returned in the order they were scheduled
/// * time never goes backwards
pub trait EventScheduler<E> {
    fn current_time(&self) -> SimTime;

    fn schedule(&mut self, delay: TimeSpec, event: E);

    /// Removes the earliest pending event, moving the clock forward to its time. Returns `None`
    ///  if there are no pending events, leaving the clock where it is.
    fn advance(&mut self) -> Option<(SimTime, E)>;
}


#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[rstest]
    #[case::seconds(TimeUnit::S, 1.5, 1_500_000_000.0)]
    #[case::millis(TimeUnit::Ms, 2.0, 2_000_000.0)]
    #[case::micros(TimeUnit::Us, 0.25, 250.0)]
    #[case::nanos(TimeUnit::Ns, 17.0, 17.0)]
    #[case::zero(TimeUnit::S, 0.0, 0.0)]
    fn test_time_spec_as_ns(#[case] unit: TimeUnit, #[case] value: f64, #[case] expected: f64) {
        assert_eq!(TimeSpec::new(unit, value).as_ns(), expected);
    }

    #[test]
    fn test_sim_time_after() {
        let t = SimTime::from_ns(100.0);
        assert_eq!(t.after(TimeSpec::new(TimeUnit::Us, 1.0)), SimTime::from_ns(1100.0));
        assert_eq!(SimTime::ZERO.after(TimeSpec::ns(0.0)), SimTime::ZERO);
    }

    #[test]
    fn test_sim_time_ordering() {
        assert!(SimTime::from_ns(1.0) < SimTime::from_ns(1.5));
        assert!(SimTime::ZERO < SimTime::from_ns(0.001));
        assert_eq!(SimTime::from_ns(7.0) - SimTime::from_ns(2.0), TimeSpec::ns(5.0));
        assert_eq!(SimTime::from_ns(12.5).to_string(), "12.5ns");
    }
}
