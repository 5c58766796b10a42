// src/testing.rs
//! Scripted in-memory store shared by unit tests.

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use std::collections::HashMap;
use std::sync::Mutex;

use crate::auth::{Credential, RequestContext};
use crate::core::RemoteStore;
use crate::error::{SyncError, SyncResult};
use crate::lifecycle::JobStatus;
use crate::types::{
    JobPost, JobPostUpdate, LinkedInPostRequest, LinkedInPostResponse, MessageResponse,
    NewJobPost, RefineResponse, User,
};

pub const VALID_TOKEN: &str = "valid-token";

pub fn context() -> RequestContext {
    RequestContext::new(Credential::new(VALID_TOKEN).unwrap())
}

pub fn expired_jwt() -> String {
    let exp = (Utc::now() - Duration::hours(1)).timestamp();
    encode(
        &Header::default(),
        &serde_json::json!({ "sub": "1", "exp": exp }),
        &EncodingKey::from_secret(b"secret"),
    )
    .unwrap()
}

pub fn recruiter() -> User {
    User {
        id: 1,
        email: "recruiter@example.com".to_string(),
        username: "recruiter".to_string(),
        full_name: Some("Rae Cruiter".to_string()),
        company: Some("Acme".to_string()),
    }
}

/// A post satisfying the field invariants of `status`.
pub fn job(id: i64, status: JobStatus) -> JobPost {
    let drafted = status != JobStatus::Draft;
    let approved = matches!(status, JobStatus::Approved | JobStatus::Posted);
    let posted = status == JobStatus::Posted;

    JobPost {
        id,
        role_request: format!("Role {}", id),
        requirements: None,
        jd_draft: drafted.then(|| format!("Draft for role {}", id)),
        final_jd: approved.then(|| format!("Final for role {}", id)),
        status,
        linkedin_post_id: posted.then(|| format!("urn:li:share:{}", id)),
        linkedin_post_url: posted
            .then(|| format!("https://www.linkedin.com/feed/update/urn:li:share:{}", id)),
        google_form_link: None,
        created_at: Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap() + Duration::minutes(id),
        updated_at: None,
    }
}

#[derive(Default)]
struct FakeState {
    posts: Vec<JobPost>,
    next_id: i64,
    calls: Vec<String>,
    failures: HashMap<String, SyncError>,
    next_update: Option<JobPost>,
    publish_rejection: Option<String>,
}

/// Behaves like the job post store for a single recruiter holding
/// `VALID_TOKEN`. Records every call by name.
#[derive(Default)]
pub struct FakeRemoteStore {
    state: Mutex<FakeState>,
}

impl FakeRemoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_posts(posts: Vec<JobPost>) -> Self {
        let store = Self::new();
        store.replace_posts(posts);
        store
    }

    pub fn replace_posts(&self, posts: Vec<JobPost>) {
        let mut state = self.state.lock().unwrap();
        state.next_id = state
            .next_id
            .max(posts.iter().map(|job| job.id).max().unwrap_or(0) + 1);
        state.posts = posts;
    }

    pub fn server_posts(&self) -> Vec<JobPost> {
        self.state.lock().unwrap().posts.clone()
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Make the next call named `op` fail with `error`.
    pub fn fail_next(&self, op: &str, error: SyncError) {
        self.state
            .lock()
            .unwrap()
            .failures
            .insert(op.to_string(), error);
    }

    /// Answer the next update with `job` instead of the stored result.
    pub fn override_next_update(&self, job: JobPost) {
        self.state.lock().unwrap().next_update = Some(job);
    }

    pub fn reject_next_publish(&self, message: &str) {
        self.state.lock().unwrap().publish_rejection = Some(message.to_string());
    }

    /// Record the call and apply scripted failures and authentication.
    fn enter(&self, op: &str, ctx: &RequestContext) -> SyncResult<std::sync::MutexGuard<'_, FakeState>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(op.to_string());

        if let Some(error) = state.failures.remove(op) {
            return Err(error);
        }
        if ctx.bearer_token() != VALID_TOKEN {
            return Err(SyncError::Unauthenticated(
                "Could not validate credentials".to_string(),
            ));
        }
        Ok(state)
    }
}

fn find(state: &mut FakeState, id: i64) -> SyncResult<&mut JobPost> {
    state
        .posts
        .iter_mut()
        .find(|job| job.id == id)
        .ok_or(SyncError::NotFound(id))
}

#[async_trait]
impl RemoteStore for FakeRemoteStore {
    async fn current_user(&self, ctx: &RequestContext) -> SyncResult<User> {
        self.enter("current_user", ctx)?;
        Ok(recruiter())
    }

    async fn list_job_posts(&self, ctx: &RequestContext) -> SyncResult<Vec<JobPost>> {
        let state = self.enter("list_job_posts", ctx)?;
        Ok(state.posts.clone())
    }

    async fn get_job_post(&self, ctx: &RequestContext, id: i64) -> SyncResult<JobPost> {
        let mut state = self.enter("get_job_post", ctx)?;
        find(&mut state, id).cloned()
    }

    async fn create_job_post(
        &self,
        ctx: &RequestContext,
        request: &NewJobPost,
    ) -> SyncResult<JobPost> {
        let mut state = self.enter("create_job_post", ctx)?;
        let id = state.next_id.max(1);
        state.next_id = id + 1;

        let job = JobPost {
            id,
            role_request: request.role_request.clone(),
            requirements: request.requirements.clone(),
            jd_draft: None,
            final_jd: None,
            status: JobStatus::Draft,
            linkedin_post_id: None,
            linkedin_post_url: None,
            google_form_link: request.google_form_link.clone(),
            created_at: Utc::now(),
            updated_at: None,
        };
        state.posts.insert(0, job.clone());
        Ok(job)
    }

    async fn update_job_post(
        &self,
        ctx: &RequestContext,
        id: i64,
        update: &JobPostUpdate,
    ) -> SyncResult<JobPost> {
        let mut state = self.enter("update_job_post", ctx)?;
        if let Some(job) = state.next_update.take() {
            return Ok(job);
        }

        let job = find(&mut state, id)?;
        if let Some(requirements) = &update.requirements {
            job.requirements = requirements.clone();
        }
        if let Some(jd_draft) = &update.jd_draft {
            job.jd_draft = jd_draft.clone();
        }
        if let Some(final_jd) = &update.final_jd {
            job.final_jd = final_jd.clone();
        }
        if let Some(status) = update.status {
            job.status = status;
        }
        if let Some(link) = &update.google_form_link {
            job.google_form_link = link.clone();
        }
        job.updated_at = Some(Utc::now());
        Ok(job.clone())
    }

    async fn delete_job_post(&self, ctx: &RequestContext, id: i64) -> SyncResult<()> {
        let mut state = self.enter("delete_job_post", ctx)?;
        find(&mut state, id)?;
        state.posts.retain(|job| job.id != id);
        Ok(())
    }

    async fn approve_job_post(&self, ctx: &RequestContext, id: i64) -> SyncResult<MessageResponse> {
        let mut state = self.enter("approve_job_post", ctx)?;
        let job = find(&mut state, id)?;
        job.final_jd = job.jd_draft.clone();
        job.status = JobStatus::Approved;
        job.updated_at = Some(Utc::now());
        Ok(MessageResponse {
            message: "Job description approved successfully".to_string(),
        })
    }

    async fn refine_job_post(
        &self,
        ctx: &RequestContext,
        id: i64,
        feedback: &str,
    ) -> SyncResult<RefineResponse> {
        let mut state = self.enter("refine_job_post", ctx)?;
        let job = find(&mut state, id)?;
        let refined = format!("{}\n\n{}", job.jd_draft.clone().unwrap_or_default(), feedback);
        job.jd_draft = Some(refined.clone());
        job.status = JobStatus::Drafted;
        job.updated_at = Some(Utc::now());
        Ok(RefineResponse {
            message: "Job description refined successfully".to_string(),
            jd_draft: refined,
        })
    }

    async fn publish_job_post(
        &self,
        ctx: &RequestContext,
        id: i64,
        _request: &LinkedInPostRequest,
    ) -> SyncResult<LinkedInPostResponse> {
        let mut state = self.enter("publish_job_post", ctx)?;
        if let Some(message) = state.publish_rejection.take() {
            return Ok(LinkedInPostResponse {
                success: false,
                post_id: None,
                post_url: None,
                message,
            });
        }

        let job = find(&mut state, id)?;
        let post_id = format!("urn:li:share:{}", id);
        let post_url = format!("https://www.linkedin.com/feed/update/{}", post_id);
        job.linkedin_post_id = Some(post_id.clone());
        job.linkedin_post_url = Some(post_url.clone());
        job.status = JobStatus::Posted;
        job.updated_at = Some(Utc::now());
        Ok(LinkedInPostResponse {
            success: true,
            post_id: Some(post_id),
            post_url: Some(post_url),
            message: "Successfully posted to LinkedIn".to_string(),
        })
    }
}
