//! Reorder engine: pure position math over the flat task sequence.
//!
//! A column's visible order is the flat sequence filtered by `column_id`, so
//! every move is expressed as a change to a task's column, its index in the
//! flat sequence, or both. Nothing here performs I/O.

use crate::types::{DragItem, Id, ItemKind, Task};

/// A resolved move of the active task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Move {
    /// Reassign the task at `from` to `column` and reinsert it at `to`.
    OntoTask { from: usize, to: usize, column: Id },

    /// Reassign the task at `index` to `column`; flat position unchanged.
    IntoColumn { index: usize, column: Id },
}

/// Resolve what dropping `active` over `over` would do to `tasks`.
///
/// Returns `None` for every no-op case: a non-task source, a target equal to
/// the source, unknown ids, and unrecognized target kinds.
pub fn plan(tasks: &[Task], active: &DragItem, over: &DragItem) -> Option<Move> {
    if active.kind != ItemKind::Task || active.id == over.id {
        return None;
    }

    let from = position(tasks, &active.id)?;

    match over.kind {
        ItemKind::Task => {
            let to = position(tasks, &over.id)?;
            Some(Move::OntoTask {
                from,
                to,
                column: tasks[to].column_id.clone(),
            })
        }
        ItemKind::Column => Some(Move::IntoColumn {
            index: from,
            column: over.id.clone(),
        }),
        ItemKind::Unknown => None,
    }
}

/// Apply a planned move. A move whose indices fall outside `tasks`
/// leaves the sequence unchanged.
pub fn apply(mut tasks: Vec<Task>, mv: Move) -> Vec<Task> {
    match mv {
        Move::OntoTask { from, to, column } => {
            if from >= tasks.len() || to >= tasks.len() {
                return tasks;
            }
            tasks[from].column_id = column;
            array_move(&mut tasks, from, to);
        }
        Move::IntoColumn { index, column } => {
            if let Some(task) = tasks.get_mut(index) {
                task.column_id = column;
            }
        }
    }
    tasks
}

/// Produce the task sequence that results from `active` hovering `over`.
///
/// Over a task, the active task adopts that task's column and moves to its
/// flat index, shifting the tasks between them by one. Over a column body,
/// only the active task's column changes. Anything else returns `tasks`
/// unchanged.
///
/// Applying the same pair twice is not a fixed point: dragging t1 over t2
/// swaps them, and the same event again swaps them back. Gesture code goes
/// through [`DragSession::over`](crate::drag::DragSession::over), which
/// skips a repeat of the last applied target.
pub fn reorder(tasks: Vec<Task>, active: &DragItem, over: &DragItem) -> Vec<Task> {
    match plan(&tasks, active, over) {
        Some(mv) => apply(tasks, mv),
        None => tasks,
    }
}

/// Visible order of one column.
pub fn column_tasks<'a, 'b>(tasks: &'a [Task], column: &'b Id) -> impl Iterator<Item = &'a Task> {
    tasks.iter().filter(move |t| &t.column_id == column)
}

fn position(tasks: &[Task], id: &Id) -> Option<usize> {
    tasks.iter().position(|t| &t.id == id)
}

/// Remove the element at `from` and reinsert it at `to`.
fn array_move<T>(items: &mut Vec<T>, from: usize, to: usize) {
    if from == to {
        return;
    }
    let item = items.remove(from);
    items.insert(to, item);
}
