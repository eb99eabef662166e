//! Board controller: owns the entity store for the active project and
//! composes the drag session, reorder engine and reconciler.

use crate::api::{ApiError, BoardApi};
use crate::drag::{DragEnd, DragSession};
use crate::reconcile::Reconciler;
use crate::reorder::column_tasks;
use crate::session::Session;
use crate::types::{Capacity, Column, DragItem, Id, ItemKind, Task, validate_board};
use log::{debug, info, warn};
use std::sync::Arc;

/// Errors surfaced by board operations.
///
/// By the time an `Api` error is returned the forced-reload policy has
/// already run: the session is unauthenticated and the board is empty.
#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("no project is active")]
    NoProject,

    #[error("unknown column: {0}")]
    UnknownColumn(Id),

    #[error("column {column} already holds {count} tasks")]
    ColumnFull { column: Id, count: usize },
}

/// Result of releasing the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOutcome {
    /// Dropped on a target; the final sequence was persisted once.
    Persisted,
    /// Released outside any target; the local order stands unpersisted.
    Kept,
    /// No gesture was in progress.
    Ignored,
}

/// Read-only snapshot of one column for rendering.
#[derive(Debug, Clone)]
pub struct ColumnView<'a> {
    pub column: &'a Column,
    pub tasks: Vec<&'a Task>,
    pub capacity: Capacity,
}

impl ColumnView<'_> {
    pub fn count(&self) -> usize {
        self.tasks.len()
    }

    /// Whether the create-task affordance is offered.
    pub fn can_create(&self) -> bool {
        self.capacity.allows_create()
    }
}

/// The board for one project at a time.
pub struct Board {
    reconciler: Reconciler,
    project: Option<Id>,
    project_name: Option<String>,
    columns: Vec<Column>,
    tasks: Vec<Task>,
    drag: DragSession,
}

impl Board {
    pub fn new(api: Arc<dyn BoardApi>, session: Arc<Session>) -> Self {
        Self {
            reconciler: Reconciler::new(api, session),
            project: None,
            project_name: None,
            columns: Vec::new(),
            tasks: Vec::new(),
            drag: DragSession::new(),
        }
    }

    pub fn project(&self) -> Option<&Id> {
        self.project.as_ref()
    }

    pub fn project_name(&self) -> Option<&str> {
        self.project_name.as_deref()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// The flat task sequence.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Tasks of one column in visible order.
    pub fn tasks_in(&self, column: &Id) -> Vec<&Task> {
        column_tasks(&self.tasks, column).collect()
    }

    pub fn column_views(&self) -> Vec<ColumnView<'_>> {
        self.columns
            .iter()
            .map(|column| {
                let tasks = self.tasks_in(&column.id);
                let capacity = Capacity::of(tasks.len());
                ColumnView {
                    column,
                    tasks,
                    capacity,
                }
            })
            .collect()
    }

    pub fn can_create_task(&self, column: &Id) -> bool {
        self.has_column(column) && Capacity::of(column_tasks(&self.tasks, column).count()).allows_create()
    }

    /// The task shown in the drag overlay.
    pub fn active_task(&self) -> Option<&Task> {
        self.drag.overlay()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    fn has_column(&self, column: &Id) -> bool {
        self.columns.iter().any(|c| &c.id == column)
    }

    /// Drop everything back to the no-project state.
    pub fn reset(&mut self) {
        self.project = None;
        self.project_name = None;
        self.columns.clear();
        self.tasks.clear();
        self.drag.reset();
    }

    /// Switch to `project`, or to no project.
    ///
    /// Local state is cleared before anything is fetched, so a previous
    /// project is never shown while the next one loads.
    pub async fn activate(&mut self, project: Option<Id>) -> Result<(), BoardError> {
        self.reset();
        let Some(project) = project else {
            return Ok(());
        };
        info!("Activating project {}", project);
        self.project = Some(project.clone());

        let api = self.reconciler.api();
        let (detail, tasks) = tokio::join!(api.fetch_project(&project), api.fetch_tasks(&project));
        let detail = self.reconciler.settle(detail);
        let tasks = self.reconciler.settle(tasks);

        let (detail, tasks) = match (detail, tasks) {
            (Ok(detail), Ok(tasks)) => (detail, tasks),
            (Err(e), _) | (_, Err(e)) => {
                self.reset();
                return Err(e.into());
            }
        };

        if let Err(e) = validate_board(&detail.columns, &tasks) {
            warn!("Project {} loaded with inconsistent tasks: {}", project, e);
        }
        debug!(
            "Loaded {} column(s), {} task(s) for {}",
            detail.columns.len(),
            tasks.len(),
            project
        );

        self.project_name = Some(detail.name);
        self.columns = detail.columns;
        self.tasks = tasks;
        Ok(())
    }

    /// Replace the task sequence with the remote one.
    pub async fn refresh_tasks(&mut self) -> Result<(), BoardError> {
        let project = self.project.clone().ok_or(BoardError::NoProject)?;
        let result = self.reconciler.api().fetch_tasks(&project).await;
        let tasks = self.remote(result)?;

        if let Err(e) = validate_board(&self.columns, &tasks) {
            warn!("Project {} refreshed with inconsistent tasks: {}", project, e);
        }
        self.tasks = tasks;
        Ok(())
    }

    /// Append an empty task to `column`, then re-fetch.
    pub async fn create_task(&mut self, column: &Id) -> Result<(), BoardError> {
        let project = self.project.clone().ok_or(BoardError::NoProject)?;
        if !self.has_column(column) {
            return Err(BoardError::UnknownColumn(column.clone()));
        }
        let count = column_tasks(&self.tasks, column).count();
        if !Capacity::of(count).allows_create() {
            return Err(BoardError::ColumnFull {
                column: column.clone(),
                count,
            });
        }

        let result = self.reconciler.api().create_task(&project, column).await;
        self.remote(result)?;
        self.refresh_tasks().await
    }

    /// Delete a task, then re-fetch. An empty id is ignored.
    pub async fn delete_task(&mut self, id: &Id) -> Result<(), BoardError> {
        if id.is_empty() {
            return Ok(());
        }
        let result = self.reconciler.api().delete_task(id).await;
        self.remote(result)?;
        self.refresh_tasks().await
    }

    /// Replace a task's content, then re-fetch. Empty content is ignored.
    pub async fn update_task(&mut self, id: &Id, content: &str) -> Result<(), BoardError> {
        if content.is_empty() {
            return Ok(());
        }
        let result = self.reconciler.api().update_task(id, content).await;
        self.remote(result)?;
        self.refresh_tasks().await
    }

    /// Lift a task. Columns and unknown ids are refused.
    pub fn on_drag_start(&mut self, source: &DragItem) -> bool {
        self.drag.start(source, &self.tasks)
    }

    /// Pointer moved over `over`; recompute the sequence synchronously.
    pub fn on_drag_over(&mut self, over: Option<&DragItem>) {
        let Some(over) = over else {
            return;
        };
        if over.kind == ItemKind::Column && !self.has_column(&over.id) {
            return;
        }
        let tasks = std::mem::take(&mut self.tasks);
        self.tasks = self.drag.over(tasks, over);
    }

    /// Pointer released. The session is idle before anything is persisted,
    /// and at most one persist call is made per gesture.
    pub async fn on_drag_end(&mut self, over: Option<&DragItem>) -> Result<DragOutcome, BoardError> {
        match self.drag.end(over) {
            None => Ok(DragOutcome::Ignored),
            Some(DragEnd::Cancelled { active }) => {
                debug!("Drag of {} released outside the board", active.id);
                Ok(DragOutcome::Kept)
            }
            Some(DragEnd::Dropped { .. }) => {
                let project = self.project.clone().ok_or(BoardError::NoProject)?;
                let result = self.reconciler.persist(&project, &self.tasks).await;
                if let Err(e) = result {
                    self.reset();
                    return Err(e.into());
                }
                Ok(DragOutcome::Persisted)
            }
        }
    }

    /// Apply the failure policy to a remote result.
    fn remote<T>(&mut self, result: Result<T, ApiError>) -> Result<T, BoardError> {
        match self.reconciler.settle(result) {
            Ok(value) => Ok(value),
            Err(e) => {
                self.reset();
                Err(e.into())
            }
        }
    }
}
