pub mod controller;
pub mod scheduler;

use std::time::Duration;

use crate::model::config::Milestone;

pub use controller::{RevealController, RevealPhase, RevealState};
pub use scheduler::ManualScheduler;

/// A row whose values can be blanked out while keeping its axis key.
pub trait Maskable {
    fn masked(&self) -> Self;
}

/// Same length as `series`; rows at index `>= step` are masked.
pub fn project<T: Maskable + Clone>(series: &[T], step: usize) -> Vec<T> {
    series
        .iter()
        .enumerate()
        .map(|(idx, row)| if idx < step { row.clone() } else { row.masked() })
        .collect()
}

pub fn visible_milestones(milestones: &[Milestone], step: usize) -> Vec<&Milestone> {
    milestones
        .iter()
        .filter(|m| step >= m.period as usize)
        .collect()
}

/// Loads a series of `series_len` elements into `controller` and drives it on
/// `scheduler` until it stops revealing, calling `on_frame` with the initial state
/// and after every accepted tick. With `realtime` the thread sleeps one interval
/// between clock advances.
pub fn play<F>(
    controller: &mut RevealController<ManualScheduler>,
    scheduler: &ManualScheduler,
    series_len: usize,
    realtime: bool,
    mut on_frame: F,
) where
    F: FnMut(&RevealState),
{
    controller.replace_series(series_len);
    controller.set_running(true);
    on_frame(&controller.state());
    let interval = controller.interval();
    while controller.phase() == RevealPhase::Revealing {
        if realtime {
            std::thread::sleep(interval);
        }
        let step = if interval.is_zero() {
            Duration::from_millis(1)
        } else {
            interval
        };
        for id in scheduler.advance(step) {
            if controller.on_tick(id) {
                on_frame(&controller.state());
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/reveal/mod.rs"]
mod tests;
