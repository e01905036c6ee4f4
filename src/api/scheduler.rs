use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use tracing::trace;

use crate::core::PlotId;
use crate::render::{DrawingLayer, LayerHandle};

/// Delay between building a plot layer and attaching its value labels.
pub const VALUE_LABEL_DEFERRAL: Duration = Duration::from_secs(3);

/// One-shot deferred label attachment for a single layer.
///
/// The task only holds a weak handle. It is dropped without effect when the
/// layer is gone or was rebuilt after scheduling.
#[derive(Debug, Clone)]
pub struct LabelTask {
    pub owner: PlotId,
    layer: Weak<RefCell<DrawingLayer>>,
    generation: u64,
    due: Duration,
}

impl LabelTask {
    #[must_use]
    pub fn due(&self) -> Duration {
        self.due
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Live layer handle if the task still targets the current build.
    #[must_use]
    pub fn resolve(&self) -> Option<LayerHandle> {
        let layer = self.layer.upgrade()?;
        let current = layer.borrow().generation;
        (current == self.generation).then_some(layer)
    }
}

/// Task whose deadline passed and whose layer is still current.
#[derive(Debug, Clone)]
pub struct ReadyLabelTask {
    pub owner: PlotId,
    pub layer: LayerHandle,
}

/// Frame-clock scheduler advanced explicitly by the host.
#[derive(Debug, Default)]
pub struct LabelScheduler {
    now: Duration,
    tasks: Vec<LabelTask>,
}

impl LabelScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn now(&self) -> Duration {
        self.now
    }

    #[must_use]
    pub fn pending(&self) -> &[LabelTask] {
        &self.tasks
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn schedule(&mut self, owner: PlotId, layer: &LayerHandle, delay: Duration) {
        let generation = layer.borrow().generation;
        let due = self.now.saturating_add(delay);
        trace!(owner = %owner, generation, due_ms = due.as_millis() as u64, "label task scheduled");
        self.tasks.push(LabelTask {
            owner,
            layer: Rc::downgrade(layer),
            generation,
            due,
        });
    }

    /// Re-targets pending work of `owner` at the current build of `layer`,
    /// keeping the earliest deadline. Returns `false` when nothing was pending.
    pub fn supersede(&mut self, owner: &PlotId, layer: &LayerHandle) -> bool {
        let mut earliest: Option<Duration> = None;
        self.tasks.retain(|task| {
            if &task.owner == owner {
                earliest = Some(earliest.map_or(task.due, |due| due.min(task.due)));
                false
            } else {
                true
            }
        });
        let Some(due) = earliest else {
            return false;
        };
        let delay = due.saturating_sub(self.now);
        self.schedule(owner.clone(), layer, delay);
        true
    }

    pub fn cancel_owner(&mut self, owner: &PlotId) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|task| &task.owner != owner);
        before - self.tasks.len()
    }

    /// Moves the clock forward and returns the due tasks that are still valid.
    ///
    /// Due tasks are removed whether or not they resolve.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<ReadyLabelTask> {
        self.now = self.now.saturating_add(elapsed);
        let now = self.now;

        let mut ready = Vec::new();
        let mut remaining = Vec::with_capacity(self.tasks.len());
        for task in self.tasks.drain(..) {
            if task.due > now {
                remaining.push(task);
                continue;
            }
            match task.resolve() {
                Some(layer) => ready.push(ReadyLabelTask {
                    owner: task.owner,
                    layer,
                }),
                None => trace!(owner = %task.owner, "stale label task dropped"),
            }
        }
        self.tasks = remaining;
        ready
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{LabelScheduler, VALUE_LABEL_DEFERRAL};
    use crate::core::PlotId;
    use crate::render::{DrawingLayer, LayerKind, layer_handle};

    fn bar_layer() -> crate::render::LayerHandle {
        layer_handle(DrawingLayer::new(LayerKind::Bar, Some(PlotId::new("bars"))))
    }

    #[test]
    fn fires_only_after_deferral() {
        let layer = bar_layer();
        let mut scheduler = LabelScheduler::new();
        scheduler.schedule(PlotId::new("bars"), &layer, VALUE_LABEL_DEFERRAL);

        assert!(scheduler.advance(Duration::from_millis(2_999)).is_empty());
        let ready = scheduler.advance(Duration::from_millis(1));
        assert_eq!(ready.len(), 1);
        assert_eq!(ready[0].owner, PlotId::new("bars"));
        assert!(scheduler.is_idle());
    }

    #[test]
    fn dropped_layer_makes_task_a_no_op() {
        let layer = bar_layer();
        let mut scheduler = LabelScheduler::new();
        scheduler.schedule(PlotId::new("bars"), &layer, VALUE_LABEL_DEFERRAL);
        drop(layer);
        assert!(scheduler.advance(VALUE_LABEL_DEFERRAL).is_empty());
        assert!(scheduler.is_idle());
    }

    #[test]
    fn rebuilt_layer_makes_task_a_no_op_until_superseded() {
        let layer = bar_layer();
        let owner = PlotId::new("bars");
        let mut scheduler = LabelScheduler::new();
        scheduler.schedule(owner.clone(), &layer, VALUE_LABEL_DEFERRAL);
        layer.borrow_mut().generation += 1;

        scheduler.advance(Duration::from_secs(1));
        assert_eq!(scheduler.pending()[0].generation(), 0);
        assert!(scheduler.supersede(&owner, &layer));
        assert_eq!(scheduler.pending()[0].generation(), 1);
        assert_eq!(scheduler.pending()[0].due(), VALUE_LABEL_DEFERRAL);
        assert_eq!(scheduler.advance(Duration::from_secs(2)).len(), 1);

        scheduler.schedule(owner.clone(), &layer, VALUE_LABEL_DEFERRAL);
        layer.borrow_mut().generation += 1;
        assert!(scheduler.advance(VALUE_LABEL_DEFERRAL).is_empty());
    }

    #[test]
    fn cancel_owner_removes_only_that_owner() {
        let bars = bar_layer();
        let dots = bar_layer();
        let mut scheduler = LabelScheduler::new();
        scheduler.schedule(PlotId::new("bars"), &bars, VALUE_LABEL_DEFERRAL);
        scheduler.schedule(PlotId::new("dots"), &dots, VALUE_LABEL_DEFERRAL);
        assert_eq!(scheduler.cancel_owner(&PlotId::new("bars")), 1);
        assert_eq!(scheduler.pending().len(), 1);
        assert!(!scheduler.supersede(&PlotId::new("bars"), &bars));
    }
}
