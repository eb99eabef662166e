//! Lanes: a kanban board core with drag-and-drop reordering.
//!
//! Tasks live in one flat sequence; a column's order is that sequence
//! filtered by `column_id`. Drags reorder the sequence locally on every
//! pointer-over event and persist it once, when the pointer is released.
//! Any remote failure drops the client back to the login boundary.
//!
//! # Example
//!
//! ```no_run
//! use lanes::{Board, Config, DragItem, HttpClient, Id, Session};
//! use std::sync::Arc;
//!
//! # async fn demo() -> eyre::Result<()> {
//! let session = Arc::new(Session::in_memory());
//! let api = Arc::new(HttpClient::new(&Config::default(), None)?);
//! let mut board = Board::new(api, session);
//!
//! board.activate(Some(Id::from("p1"))).await?;
//!
//! // Drag t1 over t3, then drop it there
//! board.on_drag_start(&DragItem::task("t1"));
//! board.on_drag_over(Some(&DragItem::task("t3")));
//! board.on_drag_end(Some(&DragItem::task("t3"))).await?;
//! # Ok(())
//! # }
//! ```

mod types;

pub mod api;
pub mod auth;
pub mod board;
pub mod client;
pub mod config;
pub mod drag;
pub mod editor;
pub mod projects;
pub mod protocol;
pub mod reconcile;
pub mod reorder;
pub mod session;

// Re-export public API
pub use api::{ApiError, BoardApi};
pub use auth::{AuthError, AuthForm, AuthMode, AuthOutcome};
pub use board::{Board, BoardError, ColumnView, DragOutcome};
pub use client::HttpClient;
pub use config::Config;
pub use drag::{DragEnd, DragSession, DragState, Point, PointerTracker, Release};
pub use editor::{CardEditor, EditorAction, EditorKey};
pub use projects::ProjectList;
pub use reconcile::Reconciler;
pub use reorder::reorder;
pub use session::{Session, SessionState};
pub use types::{
    Capacity, Column, DragItem, HARD_LIMIT, Id, ItemKind, PLACEHOLDER, Project, ProjectDetail, SOFT_LIMIT, Task,
    ValidationError, validate_board,
};
