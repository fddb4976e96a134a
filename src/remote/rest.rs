//! REST/JSON implementation of [`TaskService`].

use async_trait::async_trait;
use log::debug;
use reqwest::{Client, Response, Url};

use super::{RemoteError, TaskService};
use crate::config::ApiConfig;
use crate::models::{CreateTaskArgs, Task, UpdateTaskArgs};

/// Client for a `{id, title, completed}` task resource.
///
/// The base URL points at the collection (`.../todos`); single tasks live at
/// `{base}/{id}`.
pub struct RestTaskService {
    client: Client,
    base_url: Url,
}

impl RestTaskService {
    /// Create a client from the `[api]` configuration section.
    pub fn new(config: &ApiConfig) -> anyhow::Result<Self> {
        let base_url = Url::parse(&config.base_url)?;
        let client = Client::builder().timeout(config.timeout()).build()?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn task_url(&self, id: i64) -> String {
        format!("{}/{}", self.base_url.as_str().trim_end_matches('/'), id)
    }

    fn check_status(response: Response) -> Result<Response, RemoteError> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(RemoteError::Status { status: status.as_u16() })
        }
    }
}

#[async_trait]
impl TaskService for RestTaskService {
    async fn list(&self, limit: u32) -> Result<Vec<Task>, RemoteError> {
        debug!("GET {} (_limit={limit})", self.base_url);
        let response = self
            .client
            .get(self.base_url.clone())
            .query(&[("_limit", limit)])
            .send()
            .await?;

        Ok(Self::check_status(response)?.json().await?)
    }

    async fn create(&self, args: CreateTaskArgs) -> Result<Task, RemoteError> {
        debug!("POST {}", self.base_url);
        let response = self.client.post(self.base_url.clone()).json(&args).send().await?;

        Ok(Self::check_status(response)?.json().await?)
    }

    async fn update_partial(&self, id: i64, args: UpdateTaskArgs) -> Result<Task, RemoteError> {
        let url = self.task_url(id);
        debug!("PATCH {url}");
        let response = self.client.patch(&url).json(&args).send().await?;

        Ok(Self::check_status(response)?.json().await?)
    }

    async fn delete(&self, id: i64) -> Result<(), RemoteError> {
        let url = self.task_url(id);
        debug!("DELETE {url}");
        let response = self.client.delete(&url).send().await?;
        Self::check_status(response)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_url_joins_id() {
        let config = ApiConfig {
            base_url: "https://example.com/todos/".to_string(),
            ..ApiConfig::default()
        };
        let service = RestTaskService::new(&config).unwrap();
        assert_eq!(service.task_url(42), "https://example.com/todos/42");
    }
}
