// src/dashboard.rs
//! Session-gated entry point tying the guard, repository and summaries
//! together.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

use crate::aggregator::{DashboardSnapshot, DashboardSummary};
use crate::app_log;
use crate::auth::{Session, SessionGuard, SessionOutcome, UnauthenticatedReason};
use crate::core::RemoteStore;
use crate::error::{SyncError, SyncResult};
use crate::repository::JobPostRepository;
use crate::types::{JobPost, NewJobPost, User};

pub enum DashboardOutcome {
    Ready(Dashboard),
    Unauthenticated(UnauthenticatedReason),
}

pub struct Dashboard {
    guard: SessionGuard,
    session: Session,
    repository: JobPostRepository,
    signed_out: AtomicBool,
}

impl Dashboard {
    /// Validate the session, then load the collection. No data call is made
    /// unless the session is valid.
    pub async fn open(guard: SessionGuard, store: Arc<dyn RemoteStore>) -> SyncResult<DashboardOutcome> {
        let session = match guard.establish().await? {
            SessionOutcome::Authenticated(session) => session,
            SessionOutcome::Unauthenticated(reason) => {
                app_log!(warn, "Dashboard unavailable: {}", reason.message());
                return Ok(DashboardOutcome::Unauthenticated(reason));
            }
        };

        let repository = JobPostRepository::new(store);
        match repository.list(&session.context).await {
            Ok(snapshot) => {
                app_log!(
                    info,
                    "Dashboard ready for {} with {} job posts",
                    session.user.username,
                    snapshot.summary.total
                );
            }
            Err(e) if e.is_unauthenticated() => {
                guard.invalidate()?;
                return Ok(DashboardOutcome::Unauthenticated(
                    UnauthenticatedReason::Rejected(e.to_string()),
                ));
            }
            Err(e) => return Err(e),
        }

        Ok(DashboardOutcome::Ready(Self {
            guard,
            session,
            repository,
            signed_out: AtomicBool::new(false),
        }))
    }

    pub fn user(&self) -> &User {
        &self.session.user
    }

    pub fn repository(&self) -> &JobPostRepository {
        &self.repository
    }

    pub fn subscribe(&self) -> watch::Receiver<DashboardSnapshot> {
        self.repository.subscribe()
    }

    pub async fn posts(&self) -> Vec<JobPost> {
        self.repository.posts().await
    }

    pub async fn summary(&self) -> DashboardSummary {
        self.repository.summary().await
    }

    pub fn is_signed_out(&self) -> bool {
        self.signed_out.load(Ordering::SeqCst)
    }

    pub async fn reload(&self) -> SyncResult<DashboardSnapshot> {
        self.ensure_active()?;
        let result = self.repository.list(&self.session.context).await;
        self.route(result)
    }

    pub async fn create(&self, request: NewJobPost) -> SyncResult<JobPost> {
        self.ensure_active()?;
        let result = self.repository.create(&self.session.context, request).await;
        self.route(result)
    }

    pub async fn update(&self, job: JobPost) -> SyncResult<JobPost> {
        self.ensure_active()?;
        let result = self.repository.update(&self.session.context, job).await;
        self.route(result)
    }

    pub async fn delete(&self, id: i64) -> SyncResult<()> {
        self.ensure_active()?;
        let result = self.repository.delete(&self.session.context, id).await;
        self.route(result)
    }

    pub async fn refresh(&self, id: i64) -> SyncResult<Option<JobPost>> {
        self.ensure_active()?;
        let result = self.repository.refresh(&self.session.context, id).await;
        self.route(result)
    }

    pub async fn approve(&self, id: i64) -> SyncResult<Option<JobPost>> {
        self.ensure_active()?;
        let result = self.repository.approve(&self.session.context, id).await;
        self.route(result)
    }

    pub async fn refine(&self, id: i64, feedback: &str) -> SyncResult<Option<JobPost>> {
        self.ensure_active()?;
        let result = self
            .repository
            .refine(&self.session.context, id, feedback)
            .await;
        self.route(result)
    }

    pub async fn publish(
        &self,
        id: i64,
        access_token: &str,
        author_urn: &str,
    ) -> SyncResult<Option<JobPost>> {
        self.ensure_active()?;
        let result = self
            .repository
            .publish(&self.session.context, id, access_token, author_urn)
            .await;
        self.route(result)
    }

    /// Drop the session locally. Further operations fail as unauthenticated.
    pub fn sign_out(&self) -> SyncResult<()> {
        self.signed_out.store(true, Ordering::SeqCst);
        self.guard.logout()
    }

    fn ensure_active(&self) -> SyncResult<()> {
        if self.is_signed_out() {
            Err(SyncError::Unauthenticated("session has ended".to_string()))
        } else {
            Ok(())
        }
    }

    /// An unauthenticated answer ends the session and clears the cached token.
    fn route<T>(&self, result: SyncResult<T>) -> SyncResult<T> {
        if let Err(e) = &result {
            if e.is_unauthenticated() && !self.signed_out.swap(true, Ordering::SeqCst) {
                app_log!(warn, "Session invalidated by store: {}", e);
                if let Err(clear_err) = self.guard.invalidate() {
                    app_log!(error, "Failed to clear session token: {}", clear_err);
                }
            }
        }
        result
    }
}
