//! A deterministic timer queue on a logical clock
//!
//! Nothing here sleeps or spawns anything.  The owner asks the queue for the
//! next due event with [`TimerQueue::pop_due()`], handles it to completion,
//! and asks again; an event's handler may freely schedule or cancel other
//! timers in between.  The caller decides how logical time relates to wall
//! time: the terminal front end feeds it `Instant::elapsed()`, tests just
//! advance it by hand.
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use std::fmt;
use std::time::Duration;

/// Cancellable handle to a scheduled timer
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct TimerHandle(u64);

impl fmt::Display for TimerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer#{}", self.0)
    }
}

#[derive(Clone, Debug)]
pub struct TimerQueue<E> {
    /// The current logical time
    now: Duration,

    /// Counter for issuing handles
    next_handle: u64,

    /// Counter for breaking ties between timers due at the same instant, so
    /// that they fire in the order they were (re)scheduled
    next_seq: u64,

    /// Pending firings.  Entries whose timer has been cancelled or
    /// rescheduled are skipped when they reach the front.
    queue: BinaryHeap<Reverse<(Duration, u64, TimerHandle)>>,

    timers: HashMap<TimerHandle, Timer<E>>,
}

#[derive(Clone, Debug)]
struct Timer<E> {
    event: E,
    due: Duration,
    seq: u64,
    period: Option<Duration>,
}

impl<E: Clone> TimerQueue<E> {
    pub fn new() -> TimerQueue<E> {
        TimerQueue {
            now: Duration::ZERO,
            next_handle: 0,
            next_seq: 0,
            queue: BinaryHeap::new(),
            timers: HashMap::new(),
        }
    }

    /// The current logical time
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Fire `event` once, `delay` from now
    pub fn schedule_once(&mut self, delay: Duration, event: E) -> TimerHandle {
        self.insert(delay, None, event)
    }

    /// Fire `event` every `period`, starting one `period` from now.
    ///
    /// A zero period is bumped up to one nanosecond so that the timer cannot
    /// fire forever without time advancing.
    pub fn schedule_repeating(&mut self, period: Duration, event: E) -> TimerHandle {
        let period = period.max(Duration::from_nanos(1));
        self.insert(period, Some(period), event)
    }

    /// Cancel a timer.  Returns `false` if the timer had already fired (for a
    /// one-shot timer) or been cancelled.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        self.timers.remove(&handle).is_some()
    }

    pub fn is_active(&self, handle: TimerHandle) -> bool {
        self.timers.contains_key(&handle)
    }

    /// Number of timers that are still scheduled to fire
    pub fn active_count(&self) -> usize {
        self.timers.len()
    }

    /// The period of a repeating timer
    pub fn period(&self, handle: TimerHandle) -> Option<Duration> {
        self.timers.get(&handle).and_then(|t| t.period)
    }

    /// When the given timer will next fire
    pub fn due(&self, handle: TimerHandle) -> Option<Duration> {
        self.timers.get(&handle).map(|t| t.due)
    }

    /// The time at which the earliest active timer will fire
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.values().map(|t| t.due).min()
    }

    /// Remove and return the earliest timer event due at or before `until`,
    /// moving the clock forwards to that event's due time.  Repeating timers
    /// are rescheduled for their next period.
    ///
    /// Once nothing further is due, the clock is moved forwards to `until`
    /// (it never moves backwards) and `None` is returned.
    pub fn pop_due(&mut self, until: Duration) -> Option<(TimerHandle, E)> {
        while let Some(&Reverse((due, seq, handle))) = self.queue.peek() {
            if due > until {
                break;
            }
            let _ = self.queue.pop();
            let Some(timer) = self.timers.get_mut(&handle) else {
                continue;
            };
            if timer.seq != seq {
                continue;
            }
            self.now = self.now.max(due);
            let event = timer.event.clone();
            if let Some(period) = timer.period {
                let next_due = due.saturating_add(period);
                let next_seq = self.next_seq;
                self.next_seq += 1;
                timer.due = next_due;
                timer.seq = next_seq;
                self.queue.push(Reverse((next_due, next_seq, handle)));
            } else {
                let _ = self.timers.remove(&handle);
            }
            return Some((handle, event));
        }
        self.now = self.now.max(until);
        None
    }

    fn insert(&mut self, delay: Duration, period: Option<Duration>, event: E) -> TimerHandle {
        let handle = TimerHandle(self.next_handle);
        self.next_handle += 1;
        let seq = self.next_seq;
        self.next_seq += 1;
        let due = self.now.saturating_add(delay);
        self.queue.push(Reverse((due, seq, handle)));
        let _ = self.timers.insert(
            handle,
            Timer {
                event,
                due,
                seq,
                period,
            },
        );
        handle
    }
}

impl<E: Clone> Default for TimerQueue<E> {
    fn default() -> TimerQueue<E> {
        TimerQueue::new()
    }
}
