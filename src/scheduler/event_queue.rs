use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use tracing::trace;
use crate::scheduler::{EventScheduler, SimTime, TimeSpec};

/// A discrete-event queue: a min-heap of pending events keyed by simulated time, with an
///  insertion sequence number as tie breaker so that events for the same point in time come out
///  in the order they were scheduled.
pub struct EventQueue<E> {
    now: SimTime,
    next_seq: u64,
    pending: BinaryHeap<Reverse<ScheduledEvent<E>>>,
}

struct ScheduledEvent<E> {
    time: SimTime,
    seq: u64,
    event: E,
}
impl<E> ScheduledEvent<E> {
    fn sort_key(&self) -> (SimTime, u64) {
        (self.time, self.seq)
    }
}

impl<E> PartialEq for ScheduledEvent<E> {
    fn eq(&self, other: &Self) -> bool {
        self.sort_key() == other.sort_key()
    }
}
impl<E> Eq for ScheduledEvent<E> {}

impl<E> PartialOrd for ScheduledEvent<E> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl<E> Ord for ScheduledEvent<E> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl<E> Default for EventQueue<E> {
    fn default() -> Self {
        EventQueue::new()
    }
}

impl<E> EventQueue<E> {
    pub fn new() -> EventQueue<E> {
        EventQueue {
            now: SimTime::ZERO,
            next_seq: 0,
            pending: BinaryHeap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// the time of the earliest pending event, if any
    pub fn next_event_time(&self) -> Option<SimTime> {
        self.pending.peek()
            .map(|Reverse(e)| e.time)
    }
}

impl<E> EventScheduler<E> for EventQueue<E> {
    fn current_time(&self) -> SimTime {
        self.now
    }

    fn schedule(&mut self, delay: TimeSpec, event: E) {
        let delay_ns = delay.as_ns();
        assert!(delay_ns.is_finite() && delay_ns >= 0.0, "invalid delay {:?}", delay);

        let time = self.now.after(delay);
        let seq = self.next_seq;
        self.next_seq += 1;

        trace!("scheduling event #{} at {} (now {})", seq, time, self.now);
        self.pending.push(Reverse(ScheduledEvent { time, seq, event }));
    }

    fn advance(&mut self) -> Option<(SimTime, E)> {
        let Reverse(scheduled) = self.pending.pop()?;

        debug_assert!(scheduled.time >= self.now);
        self.now = scheduled.time;

        trace!("advancing to event #{} at {}", scheduled.seq, scheduled.time);
        Some((scheduled.time, scheduled.event))
    }
}
