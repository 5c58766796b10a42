// src/core/remote_store.rs
//! Contract the client expects from the authoritative job post store.

use async_trait::async_trait;

use crate::auth::RequestContext;
use crate::error::SyncResult;
use crate::types::{
    JobPost, JobPostUpdate, LinkedInPostRequest, LinkedInPostResponse, MessageResponse,
    NewJobPost, RefineResponse, User,
};

/// Every call carries the caller's credential explicitly. A missing or
/// rejected credential surfaces as `SyncError::Unauthenticated`.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// `GET /auth/me`
    async fn current_user(&self, ctx: &RequestContext) -> SyncResult<User>;

    /// `GET /jobs/`, newest first.
    async fn list_job_posts(&self, ctx: &RequestContext) -> SyncResult<Vec<JobPost>>;

    /// `GET /jobs/{id}`
    async fn get_job_post(&self, ctx: &RequestContext, id: i64) -> SyncResult<JobPost>;

    /// `POST /jobs/`
    async fn create_job_post(&self, ctx: &RequestContext, request: &NewJobPost)
        -> SyncResult<JobPost>;

    /// `PUT /jobs/{id}`
    async fn update_job_post(
        &self,
        ctx: &RequestContext,
        id: i64,
        update: &JobPostUpdate,
    ) -> SyncResult<JobPost>;

    /// `DELETE /jobs/{id}`
    async fn delete_job_post(&self, ctx: &RequestContext, id: i64) -> SyncResult<()>;

    /// `POST /jobs/{id}/approve`
    async fn approve_job_post(&self, ctx: &RequestContext, id: i64) -> SyncResult<MessageResponse>;

    /// `POST /jobs/{id}/refine?feedback=...`
    async fn refine_job_post(
        &self,
        ctx: &RequestContext,
        id: i64,
        feedback: &str,
    ) -> SyncResult<RefineResponse>;

    /// `POST /jobs/{id}/post-linkedin`
    async fn publish_job_post(
        &self,
        ctx: &RequestContext,
        id: i64,
        request: &LinkedInPostRequest,
    ) -> SyncResult<LinkedInPostResponse>;
}
