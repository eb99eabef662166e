//! Persistence reconciler and the forced-reload failure policy.

use crate::api::{ApiError, BoardApi};
use crate::session::Session;
use crate::types::{Id, Task};
use log::debug;
use std::sync::Arc;

/// Pushes settled board state to the remote store and applies the
/// forced-reload policy to every remote failure.
#[derive(Clone)]
pub struct Reconciler {
    api: Arc<dyn BoardApi>,
    session: Arc<Session>,
}

impl Reconciler {
    pub fn new(api: Arc<dyn BoardApi>, session: Arc<Session>) -> Self {
        Self { api, session }
    }

    pub fn api(&self) -> &dyn BoardApi {
        self.api.as_ref()
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Replace the project's task ordering with `tasks` in one call.
    ///
    /// No retry and no rollback: on failure the session is reset and the
    /// error is returned for the caller to stop on.
    pub async fn persist(&self, project: &Id, tasks: &[Task]) -> Result<(), ApiError> {
        debug!("Persisting {} task(s) for project {}", tasks.len(), project);
        let result = self.api.persist_tasks(project, tasks).await;
        self.settle(result)
    }

    /// Pass a remote result through, resetting the session on failure.
    pub fn settle<T>(&self, result: Result<T, ApiError>) -> Result<T, ApiError> {
        if let Err(e) = &result {
            self.session.force_reload(e);
        }
        result
    }
}
