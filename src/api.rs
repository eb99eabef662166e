//! The remote store seen from the board: operations and their failures.

use crate::types::{Id, Project, ProjectDetail, Task};
use async_trait::async_trait;

/// Errors returned by a [`BoardApi`] implementation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response.
    #[error("transport error: {0}")]
    Transport(String),

    /// The remote store rejected the session.
    #[error("not authorized (status {status})")]
    Unauthorized { status: u16 },

    /// Any other non-success status.
    #[error("request failed with status {status}: {message}")]
    Status { status: u16, message: String },

    /// The response body could not be understood.
    #[error("invalid response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Returns true if the failure came from the session itself rather than
    /// the network path.
    pub fn is_auth(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. })
    }

    /// Returns true if repeating the request could plausibly succeed.
    ///
    /// The board does not retry; this only feeds logging.
    pub fn is_transient(&self) -> bool {
        match self {
            ApiError::Transport(_) => true,
            ApiError::Status { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }
}

/// Operations the board consumes from the remote store.
#[async_trait]
pub trait BoardApi: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> Result<(), ApiError>;

    async fn signup(&self, name: &str, email: &str, password: &str) -> Result<(), ApiError>;

    async fn logout(&self) -> Result<(), ApiError>;

    async fn list_projects(&self) -> Result<Vec<Project>, ApiError>;

    async fn create_project(&self, name: &str) -> Result<(), ApiError>;

    async fn rename_project(&self, id: &Id, name: &str) -> Result<(), ApiError>;

    async fn delete_project(&self, id: &Id) -> Result<(), ApiError>;

    /// Project name and its columns in display order.
    async fn fetch_project(&self, id: &Id) -> Result<ProjectDetail, ApiError>;

    /// The project's flat task sequence.
    async fn fetch_tasks(&self, project: &Id) -> Result<Vec<Task>, ApiError>;

    /// Replace the project's task ordering with `tasks`.
    async fn persist_tasks(&self, project: &Id, tasks: &[Task]) -> Result<(), ApiError>;

    /// Append an empty task to `column`.
    async fn create_task(&self, project: &Id, column: &Id) -> Result<(), ApiError>;

    async fn delete_task(&self, id: &Id) -> Result<(), ApiError>;

    async fn update_task(&self, id: &Id, content: &str) -> Result<(), ApiError>;

    /// Cookie header for the current session, if the transport keeps one.
    fn session_cookie(&self) -> Option<String> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        assert!(ApiError::Unauthorized { status: 401 }.is_auth());
        assert!(!ApiError::Transport("refused".into()).is_auth());

        assert!(ApiError::Transport("refused".into()).is_transient());
        assert!(
            ApiError::Status {
                status: 503,
                message: String::new()
            }
            .is_transient()
        );
        assert!(
            !ApiError::Status {
                status: 400,
                message: "bad".into()
            }
            .is_transient()
        );
        assert!(!ApiError::Unauthorized { status: 403 }.is_transient());
        assert!(!ApiError::Decode("eof".into()).is_transient());
    }

    #[test]
    fn test_error_display() {
        let err = ApiError::Status {
            status: 422,
            message: "columnId missing".into(),
        };
        assert_eq!(err.to_string(), "request failed with status 422: columnId missing");
    }
}
