//! Drag gesture lifecycle.
//!
//! [`PointerTracker`] turns raw pointer input into either a click or a drag
//! activation. [`DragSession`] holds the lifted task between activation and
//! release and decides which pointer-over events reach the reorder engine.

use crate::editor::CardEditor;
use crate::reorder;
use crate::types::{DragItem, ItemKind, Task};
use log::debug;

/// Default pointer travel, in pixels, before a press becomes a drag.
pub const DEFAULT_ACTIVATION_DISTANCE: f64 = 3.0;

/// A pointer position in rendering-layer coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn distance_to(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// What a completed press turned out to be.
#[derive(Debug, Clone, PartialEq)]
pub enum Release {
    /// Released before travelling past the activation distance.
    Click(DragItem),
    /// Released after a drag was activated.
    Drop,
    /// No press was being tracked.
    None,
}

#[derive(Debug, Clone)]
struct Press {
    item: DragItem,
    origin: Point,
    activated: bool,
}

/// Distinguishes clicks from drags using a minimum travel distance.
#[derive(Debug, Clone)]
pub struct PointerTracker {
    activation_distance: f64,
    press: Option<Press>,
}

impl PointerTracker {
    pub fn new(activation_distance: f64) -> Self {
        Self {
            activation_distance,
            press: None,
        }
    }

    /// Record a press on `item`.
    ///
    /// Returns false, and tracks nothing, when the item cannot be a drag
    /// source: columns, or a card currently open in `editor`.
    pub fn press(&mut self, item: DragItem, at: Point, editor: &CardEditor) -> bool {
        if !item.kind.is_draggable() || editor.is_editing(&item.id) {
            self.press = None;
            return false;
        }
        self.press = Some(Press {
            item,
            origin: at,
            activated: false,
        });
        true
    }

    /// Feed a pointer move. Returns the item exactly once, on the move that
    /// first travels strictly beyond the activation distance.
    pub fn motion(&mut self, at: Point) -> Option<DragItem> {
        let press = self.press.as_mut()?;
        if press.activated || press.origin.distance_to(&at) <= self.activation_distance {
            return None;
        }
        press.activated = true;
        Some(press.item.clone())
    }

    pub fn release(&mut self) -> Release {
        match self.press.take() {
            Some(press) if press.activated => Release::Drop,
            Some(press) => Release::Click(press.item),
            None => Release::None,
        }
    }

    pub fn is_pressed(&self) -> bool {
        self.press.is_some()
    }
}

impl Default for PointerTracker {
    fn default() -> Self {
        Self::new(DEFAULT_ACTIVATION_DISTANCE)
    }
}

/// Gesture state. Settling is instantaneous, so there is no third state.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        /// Snapshot taken at activation; rendered as the overlay
        active: Task,
        /// Last target the reorder engine was run against
        last_over: Option<DragItem>,
    },
}

/// How a gesture ended.
#[derive(Debug, Clone, PartialEq)]
pub enum DragEnd {
    /// Released over a target; the final sequence must be persisted.
    Dropped { active: Task, over: DragItem },
    /// Released outside any droppable area.
    Cancelled { active: Task },
}

/// Drag session state machine.
#[derive(Debug, Clone, Default)]
pub struct DragSession {
    state: DragState,
}

impl DragSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// The task following the pointer, if any.
    pub fn overlay(&self) -> Option<&Task> {
        match &self.state {
            DragState::Dragging { active, .. } => Some(active),
            DragState::Idle => None,
        }
    }

    /// Lift `source` if it is a task present in `tasks`.
    pub fn start(&mut self, source: &DragItem, tasks: &[Task]) -> bool {
        if source.kind != ItemKind::Task {
            return false;
        }
        let Some(task) = tasks.iter().find(|t| t.id == source.id) else {
            return false;
        };
        debug!("drag start: {}", task.id);
        self.state = DragState::Dragging {
            active: task.clone(),
            last_over: None,
        };
        true
    }

    /// Route a pointer-over event to the reorder engine.
    ///
    /// Returns the new sequence, or `tasks` untouched when idle, when the
    /// target repeats the last applied one, or when the engine finds nothing
    /// to do.
    pub fn over(&mut self, tasks: Vec<Task>, over: &DragItem) -> Vec<Task> {
        let DragState::Dragging { active, last_over } = &mut self.state else {
            return tasks;
        };
        if last_over.as_ref() == Some(over) {
            return tasks;
        }

        let source = DragItem::task(active.id.clone());
        match reorder::plan(&tasks, &source, over) {
            Some(mv) => {
                debug!("drag over {:?} {}: {:?}", over.kind, over.id, mv);
                *last_over = Some(over.clone());
                reorder::apply(tasks, mv)
            }
            None => tasks,
        }
    }

    /// Release the pointer. The session is idle again before this returns.
    pub fn end(&mut self, over: Option<&DragItem>) -> Option<DragEnd> {
        let DragState::Dragging { active, .. } = std::mem::take(&mut self.state) else {
            return None;
        };
        debug!("drag end: {} over {:?}", active.id, over.map(|o| &o.id));
        Some(match over {
            Some(over) => DragEnd::Dropped {
                active,
                over: over.clone(),
            },
            None => DragEnd::Cancelled { active },
        })
    }

    /// Abandon any gesture without an outcome.
    pub fn reset(&mut self) {
        self.state = DragState::Idle;
    }
}
