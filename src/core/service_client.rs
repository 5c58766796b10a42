// src/core/service_client.rs
//! HTTP client for the job post store - JSON over bearer-authenticated REST

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::app_log;
use crate::auth::RequestContext;
use crate::config::ClientConfig;
use crate::core::RemoteStore;
use crate::error::{SyncError, SyncResult};
use crate::types::{
    ErrorResponse, JobPost, JobPostUpdate, LinkedInPostRequest, LinkedInPostResponse,
    MessageResponse, NewJobPost, RefineResponse, User,
};

const CURRENT_USER_ENDPOINT: &str = "/auth/me";
const JOBS_ENDPOINT: &str = "/jobs/";

pub struct HttpRemoteStore {
    client: reqwest::Client,
    base_url: String,
}

impl HttpRemoteStore {
    /// Create new store client with configuration
    pub fn new(base_url: &str, timeout_seconds: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Self::new(&config.api_base_url, config.timeout_seconds)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    fn job_url(&self, id: i64, action: Option<&str>) -> String {
        match action {
            Some(action) => format!("{}{}{}/{}", self.base_url, JOBS_ENDPOINT, id, action),
            None => format!("{}{}{}", self.base_url, JOBS_ENDPOINT, id),
        }
    }

    /// Attach the bearer token, send, and map non-success statuses.
    async fn send(
        &self,
        request: RequestBuilder,
        ctx: &RequestContext,
        job_id: Option<i64>,
    ) -> SyncResult<Response> {
        let response = request
            .bearer_auth(ctx.bearer_token())
            .send()
            .await
            .map_err(|e| {
                app_log!(error, "Remote store request failed: {}", e);
                SyncError::from(e)
            })?;

        let status = response.status();
        app_log!(trace, "Response status: {}", status);

        if status.is_success() {
            Ok(response)
        } else {
            Err(Self::error_from_response(response, job_id).await)
        }
    }

    async fn send_json<R>(
        &self,
        request: RequestBuilder,
        ctx: &RequestContext,
        job_id: Option<i64>,
    ) -> SyncResult<R>
    where
        R: DeserializeOwned,
    {
        let response = self.send(request, ctx, job_id).await?;
        let body = response.text().await?;

        serde_json::from_str::<R>(&body).map_err(|e| {
            app_log!(error, "Failed to parse store response: {}", e);
            SyncError::Decode(e.to_string())
        })
    }

    async fn error_from_response(response: Response, job_id: Option<i64>) -> SyncError {
        let status = response.status();
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        let detail = serde_json::from_str::<ErrorResponse>(&error_text)
            .map(|body| body.message())
            .unwrap_or(error_text);

        app_log!(warn, "Store returned error status {}: {}", status, detail);
        map_status(status, detail, job_id)
    }
}

fn map_status(status: StatusCode, detail: String, job_id: Option<i64>) -> SyncError {
    match (status, job_id) {
        (StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN, _) => SyncError::Unauthenticated(detail),
        (StatusCode::NOT_FOUND, Some(id)) => SyncError::NotFound(id),
        _ => SyncError::Rejected {
            status: status.as_u16(),
            detail,
        },
    }
}

#[async_trait]
impl RemoteStore for HttpRemoteStore {
    async fn current_user(&self, ctx: &RequestContext) -> SyncResult<User> {
        let url = self.url(CURRENT_USER_ENDPOINT);
        app_log!(trace, "Validating session: {}", url);

        self.send_json(self.client.get(&url), ctx, None).await
    }

    async fn list_job_posts(&self, ctx: &RequestContext) -> SyncResult<Vec<JobPost>> {
        let url = self.url(JOBS_ENDPOINT);
        app_log!(trace, "Listing job posts: {}", url);

        self.send_json(self.client.get(&url), ctx, None).await
    }

    async fn get_job_post(&self, ctx: &RequestContext, id: i64) -> SyncResult<JobPost> {
        let url = self.job_url(id, None);
        app_log!(trace, "Fetching job post: {}", url);

        self.send_json(self.client.get(&url), ctx, Some(id)).await
    }

    async fn create_job_post(
        &self,
        ctx: &RequestContext,
        request: &NewJobPost,
    ) -> SyncResult<JobPost> {
        let url = self.url(JOBS_ENDPOINT);
        app_log!(info, "Creating job post: {}", url);

        self.send_json(self.client.post(&url).json(request), ctx, None)
            .await
    }

    async fn update_job_post(
        &self,
        ctx: &RequestContext,
        id: i64,
        update: &JobPostUpdate,
    ) -> SyncResult<JobPost> {
        let url = self.job_url(id, None);
        app_log!(info, "Updating job post: {}", url);

        self.send_json(self.client.put(&url).json(update), ctx, Some(id))
            .await
    }

    async fn delete_job_post(&self, ctx: &RequestContext, id: i64) -> SyncResult<()> {
        let url = self.job_url(id, None);
        app_log!(info, "Deleting job post: {}", url);

        self.send(self.client.delete(&url), ctx, Some(id)).await?;
        Ok(())
    }

    async fn approve_job_post(&self, ctx: &RequestContext, id: i64) -> SyncResult<MessageResponse> {
        let url = self.job_url(id, Some("approve"));
        app_log!(info, "Approving job post: {}", url);

        self.send_json(self.client.post(&url), ctx, Some(id)).await
    }

    async fn refine_job_post(
        &self,
        ctx: &RequestContext,
        id: i64,
        feedback: &str,
    ) -> SyncResult<RefineResponse> {
        let url = self.job_url(id, Some("refine"));
        app_log!(info, "Refining job post: {}", url);

        self.send_json(
            self.client.post(&url).query(&[("feedback", feedback)]),
            ctx,
            Some(id),
        )
        .await
    }

    async fn publish_job_post(
        &self,
        ctx: &RequestContext,
        id: i64,
        request: &LinkedInPostRequest,
    ) -> SyncResult<LinkedInPostResponse> {
        let url = self.job_url(id, Some("post-linkedin"));
        app_log!(info, "Publishing job post to LinkedIn: {}", url);

        self.send_json(self.client.post(&url).json(request), ctx, Some(id))
            .await
    }
}
