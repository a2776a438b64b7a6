//! HTTP client for the task API.

use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::api::MessageResponse;
use crate::api::error::ApiError;
use crate::models::{NewProject, Project, Task, TaskPatch};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server responded {status}: {message}")]
    Api { status: StatusCode, message: String },
}

/// Thin wrapper over `reqwest::Client` bound to an API base URL such as
/// `http://localhost:5000/api`.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> ApiClient {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        ApiClient { http: reqwest::Client::new(), base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn list_tasks(&self) -> Result<Vec<Task>, ClientError> {
        decode(self.http.get(self.url("/tasks")).send().await?).await
    }

    pub async fn create_task(&self, fields: &TaskPatch) -> Result<Task, ClientError> {
        decode(self.http.post(self.url("/tasks")).json(fields).send().await?).await
    }

    pub async fn update_task(&self, id: u64, fields: &TaskPatch) -> Result<Task, ClientError> {
        let url = self.url(&format!("/tasks/{id}"));
        decode(self.http.put(url).json(fields).send().await?).await
    }

    pub async fn delete_task(&self, id: u64) -> Result<MessageResponse, ClientError> {
        let url = self.url(&format!("/tasks/{id}"));
        decode(self.http.delete(url).send().await?).await
    }

    pub async fn list_projects(&self) -> Result<Vec<Project>, ClientError> {
        decode(self.http.get(self.url("/projects")).send().await?).await
    }

    pub async fn create_project(&self, name: &str) -> Result<Project, ClientError> {
        let body = NewProject { name: Some(name.to_string()) };
        decode(self.http.post(self.url("/projects")).json(&body).send().await?).await
    }

    pub async fn delete_project(&self, id: u64) -> Result<MessageResponse, ClientError> {
        let url = self.url(&format!("/projects/{id}"));
        decode(self.http.delete(url).send().await?).await
    }
}

/// Parses a success body, or turns the server's error body into `ClientError::Api`.
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }
    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiError>(&text)
        .map(|e| e.message)
        .unwrap_or(text);
    Err(ClientError::Api { status, message })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_dropped() {
        let client = ApiClient::new("http://localhost:5000/api/");
        assert_eq!(client.url("/tasks"), "http://localhost:5000/api/tasks");
    }
}
