// src/aggregator.rs
//! Read-only summaries derived from the job post collection.

use serde::{Deserialize, Serialize};

use crate::lifecycle::JobStatus;
use crate::types::JobPost;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub total: usize,
    /// `DRAFT` and `DRAFTED`.
    pub in_progress: usize,
    pub approved: usize,
    pub posted: usize,
}

impl DashboardSummary {
    pub fn from_posts(posts: &[JobPost]) -> Self {
        posts.iter().fold(
            Self {
                total: posts.len(),
                ..Self::default()
            },
            |mut summary, job| {
                match job.status {
                    JobStatus::Draft | JobStatus::Drafted => summary.in_progress += 1,
                    JobStatus::Approved => summary.approved += 1,
                    JobStatus::Posted => summary.posted += 1,
                }
                summary
            },
        )
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

/// What subscribers observe after every collection change.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardSnapshot {
    pub posts: Vec<JobPost>,
    pub summary: DashboardSummary,
}

impl DashboardSnapshot {
    pub fn new(posts: Vec<JobPost>) -> Self {
        let summary = DashboardSummary::from_posts(&posts);
        Self { posts, summary }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::job;

    #[test]
    fn test_empty_collection() {
        let summary = DashboardSummary::from_posts(&[]);
        assert_eq!(summary, DashboardSummary::default());
        assert!(summary.is_empty());
    }

    #[test]
    fn test_counts_per_status() {
        let posts = vec![
            job(1, JobStatus::Draft),
            job(2, JobStatus::Drafted),
            job(3, JobStatus::Approved),
            job(4, JobStatus::Posted),
            job(5, JobStatus::Drafted),
        ];

        let summary = DashboardSummary::from_posts(&posts);
        assert_eq!(
            summary,
            DashboardSummary {
                total: 5,
                in_progress: 3,
                approved: 1,
                posted: 1,
            }
        );
    }

    #[test]
    fn test_subsets_sum_to_total() {
        let mut posts = Vec::new();
        for (i, status) in JobStatus::ALL.iter().cycle().take(11).enumerate() {
            posts.push(job(i as i64, *status));
            let summary = DashboardSummary::from_posts(&posts);
            assert_eq!(
                summary.in_progress + summary.approved + summary.posted,
                summary.total
            );
        }
    }

    #[test]
    fn test_snapshot_carries_summary() {
        let snapshot = DashboardSnapshot::new(vec![job(1, JobStatus::Approved)]);
        assert_eq!(snapshot.summary.approved, 1);
        assert_eq!(snapshot.posts.len(), 1);
    }
}
