//! Project list: selection and project CRUD.

use crate::api::ApiError;
use crate::reconcile::Reconciler;
use crate::types::{Id, Project};
use log::debug;

/// The user's projects and which one is active.
pub struct ProjectList {
    reconciler: Reconciler,
    projects: Vec<Project>,
    active: Option<Id>,
}

impl ProjectList {
    pub fn new(reconciler: Reconciler) -> Self {
        Self {
            reconciler,
            projects: Vec::new(),
            active: None,
        }
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn active(&self) -> Option<&Id> {
        self.active.as_ref()
    }

    /// Select a project. Returns the id the board should activate.
    pub fn select(&mut self, id: &Id) -> Option<Id> {
        if !self.projects.iter().any(|p| &p.id == id) {
            return None;
        }
        self.active = Some(id.clone());
        self.active.clone()
    }

    pub async fn refresh(&mut self) -> Result<(), ApiError> {
        let result = self.reconciler.api().list_projects().await;
        self.projects = self.remote(result)?;
        debug!("Listed {} project(s)", self.projects.len());
        Ok(())
    }

    /// Create a project. Blank names are refused locally; returns whether a
    /// request was made.
    pub async fn create(&mut self, name: &str) -> Result<bool, ApiError> {
        if name.trim().is_empty() {
            return Ok(false);
        }
        let result = self.reconciler.api().create_project(name).await;
        self.remote(result)?;
        self.refresh().await?;
        Ok(true)
    }

    pub async fn rename(&mut self, id: &Id, name: &str) -> Result<(), ApiError> {
        let result = self.reconciler.api().rename_project(id, name).await;
        self.remote(result)?;
        self.refresh().await
    }

    /// Delete a project. The selection is cleared whichever project was
    /// deleted, so the board must be deactivated.
    pub async fn delete(&mut self, id: &Id) -> Result<(), ApiError> {
        let result = self.reconciler.api().delete_project(id).await;
        self.remote(result)?;
        self.refresh().await?;
        self.active = None;
        Ok(())
    }

    /// Drop the list and the selection.
    pub fn reset(&mut self) {
        self.projects.clear();
        self.active = None;
    }

    /// Log out. A failed logout is handled like any other remote failure.
    pub async fn sign_out(&mut self) -> Result<(), ApiError> {
        let result = self.reconciler.api().logout().await;
        self.remote(result)?;
        self.reconciler.session().sign_out();
        self.reset();
        Ok(())
    }

    /// Apply the failure policy to a remote result.
    fn remote<T>(&mut self, result: Result<T, ApiError>) -> Result<T, ApiError> {
        let result = self.reconciler.settle(result);
        if result.is_err() {
            self.reset();
        }
        result
    }
}
