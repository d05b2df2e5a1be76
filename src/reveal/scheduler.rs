use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

pub trait Scheduler {
    fn schedule_repeating(&mut self, interval: Duration) -> TimerId;
    fn cancel(&mut self, id: TimerId);
}

#[derive(Debug, Clone, Copy)]
struct TimerEntry {
    interval: Duration,
    next_due: Duration,
}

#[derive(Debug, Default)]
struct ClockState {
    now: Duration,
    next_id: u64,
    timers: BTreeMap<TimerId, TimerEntry>,
}

/// Single-threaded scheduler whose clock only moves when `advance` is called.
/// Clones share one clock.
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    state: Rc<RefCell<ClockState>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn now(&self) -> Duration {
        self.state.borrow().now
    }

    #[cfg(test)]
    pub fn active_timers(&self) -> usize {
        self.state.borrow().timers.len()
    }

    #[cfg(test)]
    pub fn is_active(&self, id: TimerId) -> bool {
        self.state.borrow().timers.contains_key(&id)
    }

    /// Moves the clock forward and returns the timers that came due, in creation
    /// order. A timer fires at most once per call however many of its intervals
    /// elapsed; missed ticks are dropped, not replayed.
    pub fn advance(&self, elapsed: Duration) -> Vec<TimerId> {
        let mut state = self.state.borrow_mut();
        state.now += elapsed;
        let now = state.now;
        let mut fired = Vec::new();
        for (id, timer) in state.timers.iter_mut() {
            if timer.next_due <= now {
                fired.push(*id);
                timer.next_due = now + timer.interval;
            }
        }
        fired
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_repeating(&mut self, interval: Duration) -> TimerId {
        let mut state = self.state.borrow_mut();
        let id = TimerId(state.next_id);
        state.next_id += 1;
        let next_due = state.now + interval;
        state.timers.insert(id, TimerEntry { interval, next_due });
        id
    }

    fn cancel(&mut self, id: TimerId) {
        self.state.borrow_mut().timers.remove(&id);
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/reveal/scheduler.rs"]
mod tests;
