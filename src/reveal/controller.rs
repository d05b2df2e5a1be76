use std::time::Duration;

use serde::Serialize;
use tracing::{debug, trace};

use crate::model::config::AnimationConfig;
use crate::reveal::scheduler::{Scheduler, TimerId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RevealPhase {
    Idle,
    Revealing,
    Complete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RevealState {
    pub current_step: usize,
    pub series_len: usize,
    pub phase: RevealPhase,
}

/// Reveals a fixed-length series one element per timer tick.
///
/// Owns at most one repeating timer. The timer is cancelled on completion, on
/// reset, on series replacement and when the controller is dropped.
#[derive(Debug)]
pub struct RevealController<S: Scheduler> {
    scheduler: S,
    interval: Duration,
    start_step: usize,
    series_len: usize,
    step: usize,
    phase: RevealPhase,
    timer: Option<TimerId>,
}

impl<S: Scheduler> RevealController<S> {
    pub fn new(scheduler: S, series_len: usize, cfg: &AnimationConfig) -> Self {
        Self {
            scheduler,
            interval: Duration::from_millis(cfg.tick_interval_ms),
            start_step: cfg.start_step,
            series_len,
            step: 0,
            phase: RevealPhase::Idle,
            timer: None,
        }
    }

    pub fn state(&self) -> RevealState {
        RevealState {
            current_step: self.step,
            series_len: self.series_len,
            phase: self.phase,
        }
    }

    #[cfg(test)]
    pub fn step(&self) -> usize {
        self.step
    }

    pub fn phase(&self) -> RevealPhase {
        self.phase
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    #[cfg(test)]
    pub fn timer(&self) -> Option<TimerId> {
        self.timer
    }

    pub fn start(&mut self) {
        self.cancel_timer();
        self.step = self.start_step.min(self.series_len);
        if self.step == self.series_len {
            debug!("reveal of {} elements has nothing left to show", self.series_len);
            self.phase = RevealPhase::Complete;
            return;
        }
        self.timer = Some(self.scheduler.schedule_repeating(self.interval));
        self.phase = RevealPhase::Revealing;
        debug!(
            "reveal started at step {} of {} (every {:?})",
            self.step, self.series_len, self.interval
        );
    }

    /// Returns false when `timer` is not the one this controller currently owns;
    /// such a tick leaves the state untouched.
    pub fn on_tick(&mut self, timer: TimerId) -> bool {
        if self.timer != Some(timer) {
            trace!("ignoring stale tick from {:?}", timer);
            return false;
        }
        if self.step < self.series_len {
            self.step += 1;
        }
        if self.step == self.series_len {
            self.cancel_timer();
            self.phase = RevealPhase::Complete;
            debug!("reveal complete at step {}", self.step);
        }
        true
    }

    pub fn reset(&mut self) {
        self.cancel_timer();
        self.step = 0;
        self.phase = RevealPhase::Idle;
    }

    pub fn replace_series(&mut self, series_len: usize) {
        self.reset();
        self.series_len = series_len;
    }

    pub fn set_running(&mut self, running: bool) {
        if running {
            self.start();
        } else {
            self.reset();
        }
    }

    fn cancel_timer(&mut self) {
        if let Some(id) = self.timer.take() {
            self.scheduler.cancel(id);
        }
    }
}

impl<S: Scheduler> Drop for RevealController<S> {
    fn drop(&mut self) {
        self.cancel_timer();
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/reveal/controller.rs"]
mod tests;
