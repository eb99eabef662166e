//! Core data types for the lanes board.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fmt;

/// Column size at which the create-task affordance is withdrawn and the
/// counter switches to its warning style.
pub const SOFT_LIMIT: usize = 5;

/// Column size at which the counter switches to its danger style.
pub const HARD_LIMIT: usize = 10;

/// Placeholder shown for a card with no content.
pub const PLACEHOLDER: &str = "Add description...";

/// Opaque identifier for tasks, columns and projects.
///
/// Only equality is meaningful; identifiers carry no ordering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Id(String);

impl Id {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Id {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for Id {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<str> for Id {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Id {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Id {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// A single work item on the board.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    /// Assigned by the remote store at creation
    #[serde(rename = "_id")]
    pub id: Id,

    /// The column this task currently belongs to
    #[serde(rename = "columnId")]
    pub column_id: Id,

    /// User-editable text, may be empty
    #[serde(default)]
    pub content: String,

    /// Fields owned by the remote store that the board passes through
    /// untouched on bulk persist
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Task {
    pub fn new(id: impl Into<Id>, column_id: impl Into<Id>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            column_id: column_id.into(),
            content: content.into(),
            extra: Map::new(),
        }
    }

    /// Text to render on the card.
    pub fn display_content(&self) -> &str {
        if self.content.is_empty() { PLACEHOLDER } else { &self.content }
    }
}

/// A named bucket of tasks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Column {
    #[serde(rename = "_id")]
    pub id: Id,

    pub title: String,
}

impl Column {
    pub fn new(id: impl Into<Id>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
        }
    }
}

/// Project summary as listed in the sidebar.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Project {
    #[serde(rename = "_id")]
    pub id: Id,

    pub name: String,
}

impl Project {
    pub fn new(id: impl Into<Id>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// A loaded project: its name and its columns in remote order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProjectDetail {
    pub name: String,

    #[serde(default)]
    pub columns: Vec<Column>,
}

/// What kind of board element a drag item refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    Task,
    Column,
    #[serde(other)]
    Unknown,
}

impl ItemKind {
    /// Only tasks may be lifted; columns are drop targets only.
    pub fn is_draggable(&self) -> bool {
        matches!(self, ItemKind::Task)
    }

    pub fn is_droppable(&self) -> bool {
        matches!(self, ItemKind::Task | ItemKind::Column)
    }
}

/// An element taking part in a drag: the lifted source or the target under
/// the pointer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DragItem {
    pub id: Id,
    pub kind: ItemKind,
}

impl DragItem {
    pub fn new(id: impl Into<Id>, kind: ItemKind) -> Self {
        Self { id: id.into(), kind }
    }

    pub fn task(id: impl Into<Id>) -> Self {
        Self::new(id, ItemKind::Task)
    }

    pub fn column(id: impl Into<Id>) -> Self {
        Self::new(id, ItemKind::Column)
    }
}

/// Fill level of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capacity {
    Normal,
    /// At or above the soft limit; no new tasks may be created
    Busy,
    Overloaded,
}

impl Capacity {
    pub fn of(count: usize) -> Self {
        if count >= HARD_LIMIT {
            Capacity::Overloaded
        } else if count >= SOFT_LIMIT {
            Capacity::Busy
        } else {
            Capacity::Normal
        }
    }

    /// Returns true if the column still offers the create-task affordance.
    pub fn allows_create(&self) -> bool {
        matches!(self, Capacity::Normal)
    }
}

/// Board invariant violations found in a loaded project.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("task {task} references unknown column {column}")]
    OrphanTask { task: Id, column: Id },

    #[error("task id {0} appears more than once")]
    DuplicateTask(Id),
}

/// Check that every task belongs to a loaded column and that task ids are
/// unique.
pub fn validate_board(columns: &[Column], tasks: &[Task]) -> Result<(), ValidationError> {
    let column_ids: HashSet<&Id> = columns.iter().map(|c| &c.id).collect();
    let mut seen = HashSet::new();

    for task in tasks {
        if !seen.insert(&task.id) {
            return Err(ValidationError::DuplicateTask(task.id.clone()));
        }
        if !column_ids.contains(&task.column_id) {
            return Err(ValidationError::OrphanTask {
                task: task.id.clone(),
                column: task.column_id.clone(),
            });
        }
    }

    Ok(())
}
