// src/lifecycle.rs
//! Job post lifecycle: statuses, the allowed-transition table and the
//! field invariants each status implies.
//!
//! Progression is forward only:
//! `DRAFT -> DRAFTED -> APPROVED -> POSTED`, with `DRAFT -> APPROVED` allowed
//! when the recruiter writes the final text directly. `POSTED` is terminal.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{SyncError, SyncResult};
use crate::types::JobPost;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum JobStatus {
    /// Created, AI drafting not finished yet.
    Draft,
    /// `jd_draft` produced by the generation collaborator.
    Drafted,
    /// Recruiter accepted a final description.
    Approved,
    /// Live on LinkedIn.
    Posted,
}

/// Every permitted `(from, to)` pair. Self-transitions cover text edits.
const ALLOWED_TRANSITIONS: &[(JobStatus, JobStatus)] = &[
    (JobStatus::Draft, JobStatus::Draft),
    (JobStatus::Draft, JobStatus::Drafted),
    (JobStatus::Draft, JobStatus::Approved),
    (JobStatus::Drafted, JobStatus::Drafted),
    (JobStatus::Drafted, JobStatus::Approved),
    (JobStatus::Approved, JobStatus::Approved),
    (JobStatus::Approved, JobStatus::Posted),
    (JobStatus::Posted, JobStatus::Posted),
];

impl JobStatus {
    pub const ALL: [JobStatus; 4] = [
        JobStatus::Draft,
        JobStatus::Drafted,
        JobStatus::Approved,
        JobStatus::Posted,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Draft => "DRAFT",
            JobStatus::Drafted => "DRAFTED",
            JobStatus::Approved => "APPROVED",
            JobStatus::Posted => "POSTED",
        }
    }

    pub fn can_transition_to(self, to: JobStatus) -> bool {
        ALLOWED_TRANSITIONS.contains(&(self, to))
    }

    /// Next step in the regular progression.
    pub fn next(self) -> Option<JobStatus> {
        match self {
            JobStatus::Draft => Some(JobStatus::Drafted),
            JobStatus::Drafted => Some(JobStatus::Approved),
            JobStatus::Approved => Some(JobStatus::Posted),
            JobStatus::Posted => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        self == JobStatus::Posted
    }

    /// Counted as "in progress" on the dashboard.
    pub fn is_in_progress(self) -> bool {
        matches!(self, JobStatus::Draft | JobStatus::Drafted)
    }

    /// Statuses a freshly created post may carry. Drafting can finish
    /// inside the create call.
    pub fn is_entry(self) -> bool {
        matches!(self, JobStatus::Draft | JobStatus::Drafted)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobStatus {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "DRAFT" => Ok(JobStatus::Draft),
            "DRAFTED" => Ok(JobStatus::Drafted),
            "APPROVED" => Ok(JobStatus::Approved),
            "POSTED" => Ok(JobStatus::Posted),
            _ => Err(SyncError::UnknownStatus(s.to_string())),
        }
    }
}

/// Check the fields a post must (not) carry for its status.
pub fn check_invariants(job: &JobPost) -> SyncResult<()> {
    match job.status {
        JobStatus::Posted if !job.is_published() => Err(SyncError::InvariantViolation {
            id: job.id,
            reason: "POSTED without LinkedIn post id and url".to_string(),
        }),
        JobStatus::Draft if job.final_jd.is_some() => Err(SyncError::InvariantViolation {
            id: job.id,
            reason: "DRAFT must not carry a final description".to_string(),
        }),
        _ => Ok(()),
    }
}

pub fn check_transition(id: i64, from: JobStatus, to: JobStatus) -> SyncResult<()> {
    if from.can_transition_to(to) {
        Ok(())
    } else {
        Err(SyncError::InvalidTransition { id, from, to })
    }
}

/// Validate a post returned by a create call.
pub fn check_entry(job: &JobPost) -> SyncResult<()> {
    if !job.status.is_entry() {
        return Err(SyncError::InvariantViolation {
            id: job.id,
            reason: format!("new job post cannot start as {}", job.status),
        });
    }
    check_invariants(job)
}

/// Presentation hint per status. Carries no behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusAffordance {
    Draft,
    Drafted,
    Approved,
    Posted,
    /// Generic treatment for anything unrecognised.
    Pending,
}

impl StatusAffordance {
    pub fn for_status(status: JobStatus) -> Self {
        match status {
            JobStatus::Draft => StatusAffordance::Draft,
            JobStatus::Drafted => StatusAffordance::Drafted,
            JobStatus::Approved => StatusAffordance::Approved,
            JobStatus::Posted => StatusAffordance::Posted,
        }
    }

    /// Never fails: unknown labels map to `Pending`.
    pub fn for_label(label: &str) -> Self {
        label
            .parse::<JobStatus>()
            .map(Self::for_status)
            .unwrap_or(StatusAffordance::Pending)
    }

    pub fn icon(self) -> &'static str {
        match self {
            StatusAffordance::Draft | StatusAffordance::Pending => "clock",
            StatusAffordance::Drafted => "briefcase",
            StatusAffordance::Approved => "trending-up",
            StatusAffordance::Posted => "linkedin",
        }
    }

    pub fn tone(self) -> &'static str {
        match self {
            StatusAffordance::Draft => "yellow",
            StatusAffordance::Drafted => "blue",
            StatusAffordance::Approved => "green",
            StatusAffordance::Posted => "purple",
            StatusAffordance::Pending => "gray",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::job;
    use rstest::rstest;

    #[rstest]
    #[case::draft_to_drafted(JobStatus::Draft, JobStatus::Drafted, true)]
    #[case::draft_to_approved(JobStatus::Draft, JobStatus::Approved, true)]
    #[case::drafted_to_approved(JobStatus::Drafted, JobStatus::Approved, true)]
    #[case::approved_to_posted(JobStatus::Approved, JobStatus::Posted, true)]
    #[case::edit_in_place(JobStatus::Drafted, JobStatus::Drafted, true)]
    #[case::posted_stays(JobStatus::Posted, JobStatus::Posted, true)]
    #[case::draft_to_posted(JobStatus::Draft, JobStatus::Posted, false)]
    #[case::drafted_to_posted(JobStatus::Drafted, JobStatus::Posted, false)]
    #[case::approved_back_to_drafted(JobStatus::Approved, JobStatus::Drafted, false)]
    #[case::posted_back_to_approved(JobStatus::Posted, JobStatus::Approved, false)]
    #[case::drafted_back_to_draft(JobStatus::Drafted, JobStatus::Draft, false)]
    fn test_transition_table(
        #[case] from: JobStatus,
        #[case] to: JobStatus,
        #[case] allowed: bool,
    ) {
        assert_eq!(from.can_transition_to(to), allowed);
        assert_eq!(check_transition(1, from, to).is_ok(), allowed);
    }

    #[test]
    fn test_regular_progression_is_allowed() {
        let mut status = JobStatus::Draft;
        while let Some(next) = status.next() {
            assert!(status.can_transition_to(next));
            status = next;
        }
        assert!(status.is_terminal());
    }

    #[rstest]
    #[case("DRAFT", JobStatus::Draft)]
    #[case("drafted", JobStatus::Drafted)]
    #[case(" Approved ", JobStatus::Approved)]
    #[case("POSTED", JobStatus::Posted)]
    fn test_parse_status(#[case] label: &str, #[case] expected: JobStatus) {
        assert_eq!(label.parse::<JobStatus>().unwrap(), expected);
    }

    #[test]
    fn test_parse_unknown_status() {
        assert!(matches!(
            "ARCHIVED".parse::<JobStatus>(),
            Err(SyncError::UnknownStatus(label)) if label == "ARCHIVED"
        ));
    }

    #[rstest]
    #[case("DRAFT", StatusAffordance::Draft, "yellow")]
    #[case("DRAFTED", StatusAffordance::Drafted, "blue")]
    #[case("APPROVED", StatusAffordance::Approved, "green")]
    #[case("POSTED", StatusAffordance::Posted, "purple")]
    #[case("ARCHIVED", StatusAffordance::Pending, "gray")]
    #[case("", StatusAffordance::Pending, "gray")]
    fn test_affordance_for_label(
        #[case] label: &str,
        #[case] expected: StatusAffordance,
        #[case] tone: &str,
    ) {
        let affordance = StatusAffordance::for_label(label);
        assert_eq!(affordance, expected);
        assert_eq!(affordance.tone(), tone);
    }

    #[test]
    fn test_posted_requires_linkedin_fields() {
        let mut post = job(1, JobStatus::Posted);
        assert!(check_invariants(&post).is_ok());

        post.linkedin_post_id = None;
        post.linkedin_post_url = None;
        assert!(matches!(
            check_invariants(&post),
            Err(SyncError::InvariantViolation { id: 1, .. })
        ));

        post.linkedin_post_id = Some("urn:li:share:1".to_string());
        assert!(check_invariants(&post).is_err());

        post.linkedin_post_url = Some("https://www.linkedin.com/feed/update/urn:li:share:1".to_string());
        assert!(check_invariants(&post).is_ok());
    }

    #[test]
    fn test_draft_must_not_carry_final_text() {
        let mut post = job(2, JobStatus::Draft);
        assert!(check_invariants(&post).is_ok());
        assert!(post.final_jd.is_none());

        post.final_jd = Some("Final".to_string());
        assert!(check_invariants(&post).is_err());
    }

    #[test]
    fn test_entry_states() {
        assert!(check_entry(&job(1, JobStatus::Draft)).is_ok());
        assert!(check_entry(&job(1, JobStatus::Drafted)).is_ok());
        assert!(check_entry(&job(1, JobStatus::Approved)).is_err());
    }
}
