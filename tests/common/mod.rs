//! Shared test infrastructure for lanes integration tests.
//!
//! Provides an in-memory remote store and a TestEnv helper wiring it to a
//! board and session.

#![allow(dead_code)]

use async_trait::async_trait;
use lanes::{ApiError, Board, BoardApi, Column, Id, Project, ProjectDetail, Session, Task};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

/// Project every TestEnv starts with.
pub const PROJECT: &str = "p1";

#[derive(Default)]
struct Remote {
    projects: Vec<Project>,
    columns: HashMap<Id, Vec<Column>>,
    tasks: HashMap<Id, Vec<Task>>,
    users: HashMap<String, String>,
    logged_in: bool,
    next_id: u64,
}

/// In-memory stand-in for the remote store.
///
/// Records every call by name, keeps each bulk persist payload, and fails
/// any operation named with `fail_on`.
#[derive(Default)]
pub struct MemoryApi {
    remote: Mutex<Remote>,
    calls: Mutex<Vec<String>>,
    persisted: Mutex<Vec<(Id, Vec<Task>)>>,
    failing: Mutex<HashSet<String>>,
}

impl MemoryApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_project(&self, id: &str, name: &str, columns: &[(&str, &str)]) {
        let mut remote = self.remote.lock().unwrap();
        remote.projects.push(Project::new(id, name));
        remote.columns.insert(
            Id::from(id),
            columns.iter().map(|(cid, title)| Column::new(*cid, *title)).collect(),
        );
        remote.tasks.entry(Id::from(id)).or_default();
    }

    pub fn set_tasks(&self, project: &str, tasks: Vec<Task>) {
        self.remote.lock().unwrap().tasks.insert(Id::from(project), tasks);
    }

    pub fn add_user(&self, email: &str, password: &str) {
        self.remote
            .lock()
            .unwrap()
            .users
            .insert(email.to_string(), password.to_string());
    }

    pub fn remote_tasks(&self, project: &str) -> Vec<Task> {
        self.remote
            .lock()
            .unwrap()
            .tasks
            .get(&Id::from(project))
            .cloned()
            .unwrap_or_default()
    }

    /// Make every later call to `op` fail.
    pub fn fail_on(&self, op: &str) {
        self.failing.lock().unwrap().insert(op.to_string());
    }

    pub fn recover(&self, op: &str) {
        self.failing.lock().unwrap().remove(op);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, op: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| c.as_str() == op).count()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn persisted(&self) -> Vec<(Id, Vec<Task>)> {
        self.persisted.lock().unwrap().clone()
    }

    fn enter(&self, op: &str) -> Result<(), ApiError> {
        self.calls.lock().unwrap().push(op.to_string());
        if self.failing.lock().unwrap().contains(op) {
            return Err(ApiError::Unauthorized { status: 401 });
        }
        Ok(())
    }

    fn not_found(what: &str, id: &Id) -> ApiError {
        ApiError::Status {
            status: 404,
            message: format!("{} {} not found", what, id),
        }
    }
}

#[async_trait]
impl BoardApi for MemoryApi {
    async fn login(&self, email: &str, password: &str) -> Result<(), ApiError> {
        self.enter("login")?;
        let mut remote = self.remote.lock().unwrap();
        match remote.users.get(email) {
            Some(pw) if pw == password => {
                remote.logged_in = true;
                Ok(())
            }
            _ => Err(ApiError::Status {
                status: 400,
                message: "Invalid credentials".into(),
            }),
        }
    }

    async fn signup(&self, _name: &str, email: &str, password: &str) -> Result<(), ApiError> {
        self.enter("signup")?;
        let mut remote = self.remote.lock().unwrap();
        if remote.users.contains_key(email) {
            return Err(ApiError::Status {
                status: 409,
                message: "Email taken".into(),
            });
        }
        remote.users.insert(email.to_string(), password.to_string());
        Ok(())
    }

    async fn logout(&self) -> Result<(), ApiError> {
        self.enter("logout")?;
        self.remote.lock().unwrap().logged_in = false;
        Ok(())
    }

    async fn list_projects(&self) -> Result<Vec<Project>, ApiError> {
        self.enter("list_projects")?;
        Ok(self.remote.lock().unwrap().projects.clone())
    }

    async fn create_project(&self, name: &str) -> Result<(), ApiError> {
        self.enter("create_project")?;
        let mut remote = self.remote.lock().unwrap();
        remote.next_id += 1;
        let id = Id::from(format!("p-new-{}", remote.next_id));
        remote.projects.push(Project::new(id.clone(), name));
        remote.columns.insert(id.clone(), Vec::new());
        remote.tasks.insert(id, Vec::new());
        Ok(())
    }

    async fn rename_project(&self, id: &Id, name: &str) -> Result<(), ApiError> {
        self.enter("rename_project")?;
        let mut remote = self.remote.lock().unwrap();
        let project = remote
            .projects
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or_else(|| Self::not_found("project", id))?;
        project.name = name.to_string();
        Ok(())
    }

    async fn delete_project(&self, id: &Id) -> Result<(), ApiError> {
        self.enter("delete_project")?;
        let mut remote = self.remote.lock().unwrap();
        remote.projects.retain(|p| &p.id != id);
        remote.columns.remove(id);
        remote.tasks.remove(id);
        Ok(())
    }

    async fn fetch_project(&self, id: &Id) -> Result<ProjectDetail, ApiError> {
        self.enter("fetch_project")?;
        let remote = self.remote.lock().unwrap();
        let project = remote
            .projects
            .iter()
            .find(|p| &p.id == id)
            .ok_or_else(|| Self::not_found("project", id))?;
        Ok(ProjectDetail {
            name: project.name.clone(),
            columns: remote.columns.get(id).cloned().unwrap_or_default(),
        })
    }

    async fn fetch_tasks(&self, project: &Id) -> Result<Vec<Task>, ApiError> {
        self.enter("fetch_tasks")?;
        Ok(self
            .remote
            .lock()
            .unwrap()
            .tasks
            .get(project)
            .cloned()
            .unwrap_or_default())
    }

    async fn persist_tasks(&self, project: &Id, tasks: &[Task]) -> Result<(), ApiError> {
        self.enter("persist_tasks")?;
        self.persisted.lock().unwrap().push((project.clone(), tasks.to_vec()));
        self.remote.lock().unwrap().tasks.insert(project.clone(), tasks.to_vec());
        Ok(())
    }

    async fn create_task(&self, project: &Id, column: &Id) -> Result<(), ApiError> {
        self.enter("create_task")?;
        let mut remote = self.remote.lock().unwrap();
        remote.next_id += 1;
        let task = Task::new(format!("t-new-{}", remote.next_id), column.clone(), "");
        remote.tasks.entry(project.clone()).or_default().push(task);
        Ok(())
    }

    async fn delete_task(&self, id: &Id) -> Result<(), ApiError> {
        self.enter("delete_task")?;
        let mut remote = self.remote.lock().unwrap();
        for tasks in remote.tasks.values_mut() {
            tasks.retain(|t| &t.id != id);
        }
        Ok(())
    }

    async fn update_task(&self, id: &Id, content: &str) -> Result<(), ApiError> {
        self.enter("update_task")?;
        let mut remote = self.remote.lock().unwrap();
        let task = remote
            .tasks
            .values_mut()
            .flat_map(|tasks| tasks.iter_mut())
            .find(|t| &t.id == id)
            .ok_or_else(|| Self::not_found("task", id))?;
        task.content = content.to_string();
        Ok(())
    }

    fn session_cookie(&self) -> Option<String> {
        if self.remote.lock().unwrap().logged_in {
            Some("sid=memory".to_string())
        } else {
            None
        }
    }
}

/// Test environment: a seeded remote, an authenticated session and a board.
pub struct TestEnv {
    pub api: Arc<MemoryApi>,
    pub session: Arc<Session>,
    pub board: Board,
}

impl TestEnv {
    /// Project `p1` with empty columns `colA`, `colB`, `colC`.
    pub fn new() -> Self {
        let api = Arc::new(MemoryApi::new());
        api.add_project(PROJECT, "Launch", &[("colA", "To do"), ("colB", "Doing"), ("colC", "Done")]);

        let session = Arc::new(Session::in_memory());
        session.authenticate(Some("sid=memory".to_string())).expect("Failed to authenticate");

        let board = Board::new(api.clone(), session.clone());
        Self { api, session, board }
    }

    /// Seed `p1` with `(task id, column id)` pairs in flat order.
    pub fn with_tasks(tasks: &[(&str, &str)]) -> Self {
        let env = Self::new();
        env.api.set_tasks(
            PROJECT,
            tasks
                .iter()
                .map(|(id, column)| Task::new(*id, *column, format!("content of {}", id)))
                .collect(),
        );
        env
    }

    /// Activate `p1` and forget the load calls.
    pub async fn load(&mut self) {
        self.board
            .activate(Some(Id::from(PROJECT)))
            .await
            .expect("Failed to activate project");
        self.api.clear_calls();
    }

    /// Flat task order on the board.
    pub fn order(&self) -> Vec<String> {
        self.board.tasks().iter().map(|t| t.id.to_string()).collect()
    }

    /// Visible order of one column.
    pub fn column_order(&self, column: &str) -> Vec<String> {
        self.board
            .tasks_in(&Id::from(column))
            .iter()
            .map(|t| t.id.to_string())
            .collect()
    }

    pub fn column_of(&self, task: &str) -> String {
        self.board
            .tasks()
            .iter()
            .find(|t| t.id == task)
            .map(|t| t.column_id.to_string())
            .expect("Task not on board")
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}
