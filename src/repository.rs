// src/repository.rs
//! Client-side job post collection kept consistent with the remote store.
//!
//! Every mutation is confirmed by the store before it is reflected locally,
//! and each operation is all-or-nothing against the cached collection. The
//! lock is never held across a remote call, so overlapping operations are
//! possible; the last confirmed response wins.

use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::{watch, Mutex};

use crate::aggregator::{DashboardSnapshot, DashboardSummary};
use crate::app_log;
use crate::auth::RequestContext;
use crate::core::RemoteStore;
use crate::error::{SyncError, SyncResult};
use crate::lifecycle::{self, JobStatus};
use crate::types::{JobPost, JobPostUpdate, LinkedInPostRequest, NewJobPost};

pub struct JobPostRepository {
    store: Arc<dyn RemoteStore>,
    posts: Mutex<Vec<JobPost>>,
    snapshots: watch::Sender<DashboardSnapshot>,
}

impl JobPostRepository {
    pub fn new(store: Arc<dyn RemoteStore>) -> Self {
        let (snapshots, _) = watch::channel(DashboardSnapshot::default());
        Self {
            store,
            posts: Mutex::new(Vec::new()),
            snapshots,
        }
    }

    /// Observe the collection. Dropping the receiver is always safe.
    pub fn subscribe(&self) -> watch::Receiver<DashboardSnapshot> {
        self.snapshots.subscribe()
    }

    pub async fn posts(&self) -> Vec<JobPost> {
        self.posts.lock().await.clone()
    }

    pub async fn get(&self, id: i64) -> Option<JobPost> {
        self.posts.lock().await.iter().find(|job| job.id == id).cloned()
    }

    pub async fn summary(&self) -> DashboardSummary {
        DashboardSummary::from_posts(&self.posts.lock().await)
    }

    /// Replace the collection wholesale with the store's current list.
    pub async fn list(&self, ctx: &RequestContext) -> SyncResult<DashboardSnapshot> {
        let fetched = report("list", self.store.list_job_posts(ctx).await)?;

        let mut seen = HashSet::with_capacity(fetched.len());
        for job in &fetched {
            if !seen.insert(job.id) {
                return report("list", Err(SyncError::DuplicateId(job.id)));
            }
            report("list", lifecycle::check_invariants(job))?;
        }

        let mut posts = self.posts.lock().await;
        *posts = fetched;
        app_log!(info, "Loaded {} job posts", posts.len());
        Ok(self.publish_snapshot(&posts))
    }

    /// Submit a new post and prepend the confirmed result.
    pub async fn create(&self, ctx: &RequestContext, request: NewJobPost) -> SyncResult<JobPost> {
        if request.role_request.trim().is_empty() {
            return report(
                "create",
                Err(SyncError::InvalidRequest("role request is required".to_string())),
            );
        }

        let created = report("create", self.store.create_job_post(ctx, &request).await)?;
        report("create", lifecycle::check_entry(&created))?;

        let mut posts = self.posts.lock().await;
        if posts.iter().any(|job| job.id == created.id) {
            return report("create", Err(SyncError::DuplicateId(created.id)));
        }
        posts.insert(0, created.clone());
        app_log!(info, "Created job post {} ({})", created.id, created.status);
        self.publish_snapshot(&posts);

        Ok(created)
    }

    /// Submit a modified post and replace the matching entry in place.
    ///
    /// Every client-owned field is sent, so a cleared field is cleared
    /// remotely too. `role_request` is fixed at creation. If the entry
    /// disappeared while the call was in flight the confirmed post is
    /// returned but not re-inserted.
    pub async fn update(&self, ctx: &RequestContext, job: JobPost) -> SyncResult<JobPost> {
        let current = self.require(job.id).await?;

        if job.role_request != current.role_request {
            return report(
                "update",
                Err(SyncError::InvalidRequest(format!(
                    "role request of job post {} cannot change after creation",
                    job.id
                ))),
            );
        }
        report(
            "update",
            lifecycle::check_transition(job.id, current.status, job.status),
        )?;

        // LinkedIn fields are store-owned; judge the submission with the cached ones.
        let candidate = JobPost {
            linkedin_post_id: current.linkedin_post_id.clone(),
            linkedin_post_url: current.linkedin_post_url.clone(),
            ..job.clone()
        };
        report("update", lifecycle::check_invariants(&candidate))?;

        let update = JobPostUpdate::from(&job);
        let updated = report(
            "update",
            self.store.update_job_post(ctx, job.id, &update).await,
        )?;

        if updated.id != job.id {
            return report(
                "update",
                Err(SyncError::Decode(format!(
                    "update of job post {} answered with job post {}",
                    job.id, updated.id
                ))),
            );
        }

        self.apply_confirmed("update", updated.clone()).await?;
        Ok(updated)
    }

    /// Remove the entry once the store confirms the deletion.
    pub async fn delete(&self, ctx: &RequestContext, id: i64) -> SyncResult<()> {
        report("delete", self.store.delete_job_post(ctx, id).await)?;

        let mut posts = self.posts.lock().await;
        posts.retain(|job| job.id != id);
        app_log!(info, "Deleted job post {}", id);
        self.publish_snapshot(&posts);

        Ok(())
    }

    /// Re-read a single post from the store and replace it in place.
    ///
    /// Returns `None` when the post is no longer held locally.
    pub async fn refresh(&self, ctx: &RequestContext, id: i64) -> SyncResult<Option<JobPost>> {
        let fetched = report("refresh", self.store.get_job_post(ctx, id).await)?;
        self.apply_confirmed("refresh", fetched).await
    }

    /// Accept the AI draft as the final description.
    pub async fn approve(&self, ctx: &RequestContext, id: i64) -> SyncResult<Option<JobPost>> {
        let current = self.require(id).await?;
        report(
            "approve",
            lifecycle::check_transition(id, current.status, JobStatus::Approved),
        )?;
        if current.jd_draft.is_none() {
            return report(
                "approve",
                Err(SyncError::InvalidRequest(format!(
                    "job post {} has no draft to approve",
                    id
                ))),
            );
        }

        let response = report("approve", self.store.approve_job_post(ctx, id).await)?;
        app_log!(info, "Job post {}: {}", id, response.message);

        self.refresh(ctx, id).await
    }

    /// Ask the generation collaborator to rework the draft.
    pub async fn refine(
        &self,
        ctx: &RequestContext,
        id: i64,
        feedback: &str,
    ) -> SyncResult<Option<JobPost>> {
        if feedback.trim().is_empty() {
            return report(
                "refine",
                Err(SyncError::InvalidRequest("feedback is required".to_string())),
            );
        }

        let current = self.require(id).await?;
        report(
            "refine",
            lifecycle::check_transition(id, current.status, JobStatus::Drafted),
        )?;
        if current.jd_draft.is_none() {
            return report(
                "refine",
                Err(SyncError::InvalidRequest(format!(
                    "job post {} has no draft to refine",
                    id
                ))),
            );
        }

        let response = report("refine", self.store.refine_job_post(ctx, id, feedback).await)?;
        app_log!(info, "Job post {}: {}", id, response.message);

        self.refresh(ctx, id).await
    }

    /// Publish an approved post through the LinkedIn collaborator.
    pub async fn publish(
        &self,
        ctx: &RequestContext,
        id: i64,
        access_token: &str,
        author_urn: &str,
    ) -> SyncResult<Option<JobPost>> {
        let current = self.require(id).await?;
        if current.status != JobStatus::Approved {
            return report(
                "publish",
                Err(SyncError::InvalidTransition {
                    id,
                    from: current.status,
                    to: JobStatus::Posted,
                }),
            );
        }

        let request = LinkedInPostRequest {
            job_post_id: id,
            access_token: access_token.to_string(),
            author_urn: author_urn.to_string(),
        };
        let response = report(
            "publish",
            self.store.publish_job_post(ctx, id, &request).await,
        )?;
        if !response.success {
            return report("publish", Err(SyncError::Publish(response.message)));
        }
        app_log!(info, "Job post {} published: {:?}", id, response.post_url);

        self.refresh(ctx, id).await
    }

    async fn require(&self, id: i64) -> SyncResult<JobPost> {
        match self.get(id).await {
            Some(job) => Ok(job),
            None => report("lookup", Err(SyncError::NotFound(id))),
        }
    }

    /// Replace the entry with a store-confirmed version, keeping its position.
    async fn apply_confirmed(&self, op: &str, confirmed: JobPost) -> SyncResult<Option<JobPost>> {
        report(op, lifecycle::check_invariants(&confirmed))?;

        let mut posts = self.posts.lock().await;
        let Some(slot) = posts.iter_mut().find(|job| job.id == confirmed.id) else {
            app_log!(
                warn,
                "Discarding {} response for job post {} no longer held",
                op,
                confirmed.id
            );
            return Ok(None);
        };

        report(
            op,
            lifecycle::check_transition(confirmed.id, slot.status, confirmed.status),
        )?;

        *slot = confirmed.clone();
        app_log!(info, "Job post {} is now {}", confirmed.id, confirmed.status);
        self.publish_snapshot(&posts);

        Ok(Some(confirmed))
    }

    fn publish_snapshot(&self, posts: &[JobPost]) -> DashboardSnapshot {
        let snapshot = DashboardSnapshot::new(posts.to_vec());
        self.snapshots.send_replace(snapshot.clone());
        snapshot
    }
}

fn report<T>(op: &str, result: SyncResult<T>) -> SyncResult<T> {
    if let Err(e) = &result {
        app_log!(warn, "Job post {} failed ({:?}): {}", op, e.kind(), e);
    }
    result
}
