// src/types/job_post.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::timestamp;
use crate::lifecycle::JobStatus;

/// A job post as confirmed by the remote store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPost {
    pub id: i64,
    pub role_request: String,
    #[serde(default)]
    pub requirements: Option<String>,
    #[serde(default)]
    pub jd_draft: Option<String>,
    #[serde(default)]
    pub final_jd: Option<String>,
    pub status: JobStatus,
    #[serde(default)]
    pub linkedin_post_id: Option<String>,
    #[serde(default)]
    pub linkedin_post_url: Option<String>,
    #[serde(default)]
    pub google_form_link: Option<String>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default, with = "timestamp::option")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl JobPost {
    /// Final text if approved, otherwise the AI draft.
    pub fn current_description(&self) -> Option<&str> {
        self.final_jd.as_deref().or(self.jd_draft.as_deref())
    }

    pub fn is_published(&self) -> bool {
        self.linkedin_post_id.is_some() && self.linkedin_post_url.is_some()
    }
}

/// Payload for `POST /jobs/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewJobPost {
    pub role_request: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirements: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_form_link: Option<String>,
}

impl NewJobPost {
    pub fn new(role_request: impl Into<String>) -> Self {
        Self {
            role_request: role_request.into(),
            requirements: None,
            google_form_link: None,
        }
    }

    pub fn with_requirements(mut self, requirements: impl Into<String>) -> Self {
        self.requirements = Some(requirements.into());
        self
    }

    pub fn with_google_form_link(mut self, link: impl Into<String>) -> Self {
        self.google_form_link = Some(link.into());
        self
    }
}

/// Payload for `PUT /jobs/{id}`.
///
/// Only client-owned fields travel; identifiers, timestamps, `role_request`
/// and LinkedIn fields belong to the store. An outer `None` leaves the field
/// untouched remotely, `Some(None)` sends an explicit `null` that clears it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct JobPostUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requirements: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jd_draft: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_jd: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<JobStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub google_form_link: Option<Option<String>>,
}

/// Full replacement of every client-owned field, cleared ones included.
impl From<&JobPost> for JobPostUpdate {
    fn from(job: &JobPost) -> Self {
        Self {
            requirements: Some(job.requirements.clone()),
            jd_draft: Some(job.jd_draft.clone()),
            final_jd: Some(job.final_jd.clone()),
            status: Some(job.status),
            google_form_link: Some(job.google_form_link.clone()),
        }
    }
}

/// The authenticated recruiter, as returned by `GET /auth/me`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub username: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
}

impl User {
    pub fn display_name(&self) -> &str {
        self.full_name.as_deref().unwrap_or(&self.username)
    }
}
