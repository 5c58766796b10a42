//! Job post lifecycle client: session gating, a server-confirmed job post
//! collection, the status state machine and dashboard summaries.

/// Structured log line through `tracing`, e.g. `app_log!(info, "Loaded {}", n)`.
#[macro_export]
macro_rules! app_log {
    ($level:ident, $($arg:tt)+) => {
        ::tracing::$level!($($arg)+)
    };
}

pub mod aggregator;
pub mod auth;
pub mod cli;
pub mod config;
pub mod core;
pub mod dashboard;
pub mod error;
pub mod lifecycle;
pub mod repository;
pub mod types;

#[cfg(test)]
mod testing;

pub use aggregator::{DashboardSnapshot, DashboardSummary};
pub use auth::{
    Credential, FileTokenStore, MemoryTokenStore, RequestContext, Session, SessionGuard,
    SessionOutcome, TokenStore, UnauthenticatedReason,
};
pub use config::{ClientConfig, ConfigManager};
pub use crate::core::{HttpRemoteStore, RemoteStore};
pub use dashboard::{Dashboard, DashboardOutcome};
pub use error::{ErrorKind, SyncError, SyncResult};
pub use lifecycle::{JobStatus, StatusAffordance};
pub use repository::JobPostRepository;
pub use types::{JobPost, JobPostUpdate, NewJobPost, User};
