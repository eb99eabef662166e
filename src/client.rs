//! HTTP client for the remote task store.

use crate::api::{ApiError, BoardApi};
use crate::config::Config;
use crate::protocol::{Envelope, ErrorBody, Request};
use crate::types::{Id, Project, ProjectDetail, Task};
use async_trait::async_trait;
use log::debug;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use url::Url;

/// [`BoardApi`] over HTTP, carrying the session in a cookie jar.
pub struct HttpClient {
    base: Url,
    http: reqwest::Client,
    jar: Arc<Jar>,
}

impl HttpClient {
    /// Build a client for `config.api_url`, seeding the jar with a cookie
    /// header saved from an earlier login.
    pub fn new(config: &Config, cookie: Option<&str>) -> Result<Self, ApiError> {
        let base = Url::parse(&config.api_url).map_err(|e| ApiError::Transport(format!("invalid API URL: {}", e)))?;
        if base.cannot_be_a_base() {
            return Err(ApiError::Transport(format!("invalid API URL: {}", base)));
        }

        let jar = Arc::new(Jar::default());
        if let Some(header) = cookie {
            for pair in header.split(';').map(str::trim).filter(|p| !p.is_empty()) {
                jar.add_cookie_str(pair, &base);
            }
        }

        let mut builder = reqwest::Client::builder().cookie_provider(Arc::clone(&jar));
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(Self { base, http, jar })
    }

    /// Base URL requests are resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn url(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::Transport(format!("invalid API URL: {}", self.base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request.send().await.map_err(|e| ApiError::Transport(e.to_string()))?;
        let status = response.status();
        debug!("{} {}", status.as_u16(), response.url());

        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ApiError::Unauthorized {
                status: status.as_u16(),
            });
        }

        let body: ErrorBody = response.json().await.unwrap_or_default();
        Err(ApiError::Status {
            status: status.as_u16(),
            message: body
                .error
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown error").to_string()),
        })
    }

    async fn get_data<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, ApiError> {
        let response = self.send(self.http.get(self.url(segments)?)).await?;
        let envelope: Envelope<T> = response.json().await.map_err(|e| ApiError::Decode(e.to_string()))?;
        Ok(envelope.data)
    }
}

#[async_trait]
impl BoardApi for HttpClient {
    async fn login(&self, email: &str, password: &str) -> Result<(), ApiError> {
        let body = Request::Login { email, password };
        self.send(self.http.post(self.url(&["login"])?).json(&body)).await?;
        Ok(())
    }

    async fn signup(&self, name: &str, email: &str, password: &str) -> Result<(), ApiError> {
        let body = Request::Signup { name, email, password };
        self.send(self.http.post(self.url(&["signup"])?).json(&body)).await?;
        Ok(())
    }

    async fn logout(&self) -> Result<(), ApiError> {
        self.send(self.http.post(self.url(&["logout"])?).json(&Request::Empty {}))
            .await?;
        Ok(())
    }

    async fn list_projects(&self) -> Result<Vec<Project>, ApiError> {
        self.get_data(&["projects"]).await
    }

    async fn create_project(&self, name: &str) -> Result<(), ApiError> {
        let body = Request::ProjectName { name };
        self.send(self.http.post(self.url(&["projects"])?).json(&body)).await?;
        Ok(())
    }

    async fn rename_project(&self, id: &Id, name: &str) -> Result<(), ApiError> {
        let body = Request::ProjectName { name };
        self.send(self.http.patch(self.url(&["projects", id.as_str()])?).json(&body))
            .await?;
        Ok(())
    }

    async fn delete_project(&self, id: &Id) -> Result<(), ApiError> {
        self.send(self.http.delete(self.url(&["projects", id.as_str()])?)).await?;
        Ok(())
    }

    async fn fetch_project(&self, id: &Id) -> Result<ProjectDetail, ApiError> {
        self.get_data(&["projects", id.as_str()]).await
    }

    async fn fetch_tasks(&self, project: &Id) -> Result<Vec<Task>, ApiError> {
        self.get_data(&["tasks", project.as_str(), "tasks"]).await
    }

    async fn persist_tasks(&self, project: &Id, tasks: &[Task]) -> Result<(), ApiError> {
        let url = self.url(&["tasks", project.as_str(), "update-tasks"])?;
        self.send(self.http.patch(url).json(tasks)).await?;
        Ok(())
    }

    async fn create_task(&self, project: &Id, column: &Id) -> Result<(), ApiError> {
        let body = Request::AddTask {
            project_id: project,
            column_id: column,
        };
        self.send(self.http.patch(self.url(&["tasks", "add-task"])?).json(&body))
            .await?;
        Ok(())
    }

    async fn delete_task(&self, id: &Id) -> Result<(), ApiError> {
        self.send(self.http.delete(self.url(&["tasks", id.as_str()])?)).await?;
        Ok(())
    }

    async fn update_task(&self, id: &Id, content: &str) -> Result<(), ApiError> {
        let body = Request::EditTask { new_content: content };
        self.send(self.http.patch(self.url(&["tasks", id.as_str()])?).json(&body))
            .await?;
        Ok(())
    }

    fn session_cookie(&self) -> Option<String> {
        self.jar
            .cookies(&self.base)
            .and_then(|value| value.to_str().ok().map(String::from))
    }
}
