use crate::foundation::error::EaselResult;
use crate::render::adapter::RenderAdapter;
use crate::sketch::controller::{SketchController, TickOutcome};
use std::cell::Cell;
use std::rc::Rc;

/// Host-side periodic callback the controller re-arms after each interactive tick.
///
/// `schedule` asks for one more `tick`; `cancel` withdraws any outstanding request. Both may be
/// called repeatedly.
pub trait TickScheduler {
    /// Request another tick.
    fn schedule(&mut self);
    /// Withdraw the outstanding request, if any.
    fn cancel(&mut self);
}

#[derive(Debug, Default)]
struct Counters {
    armed: Cell<bool>,
    scheduled: Cell<usize>,
    cancelled: Cell<usize>,
}

/// Scheduler for hosts that pump ticks themselves. Clones share state, so a clone kept by the
/// host observes what the controller requested.
#[derive(Clone, Debug, Default)]
pub struct ManualScheduler {
    counters: Rc<Counters>,
}

impl ManualScheduler {
    /// Fresh, disarmed scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` while a tick is requested.
    pub fn is_armed(&self) -> bool {
        self.counters.armed.get()
    }

    /// How many times a tick was requested.
    pub fn scheduled(&self) -> usize {
        self.counters.scheduled.get()
    }

    /// How many times a request was withdrawn.
    pub fn cancelled(&self) -> usize {
        self.counters.cancelled.get()
    }
}

impl TickScheduler for ManualScheduler {
    fn schedule(&mut self) {
        self.counters.armed.set(true);
        self.counters.scheduled.set(self.counters.scheduled.get() + 1);
    }

    fn cancel(&mut self) {
        self.counters.armed.set(false);
        self.counters.cancelled.set(self.counters.cancelled.get() + 1);
    }
}

/// Pump `controller` with a fixed `step` (seconds) for as long as it keeps a tick armed, at most
/// `max_ticks` times. Returns the outcomes in order.
pub fn drive<A: RenderAdapter>(
    controller: &mut SketchController<A>,
    step: f64,
    max_ticks: usize,
) -> EaselResult<Vec<TickOutcome>> {
    let mut outcomes = Vec::new();
    while controller.is_tick_armed() && outcomes.len() < max_ticks {
        outcomes.push(controller.tick(step)?);
    }
    Ok(outcomes)
}

#[cfg(test)]
#[path = "../../tests/unit/sketch/scheduler.rs"]
mod tests;
