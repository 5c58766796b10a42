// src/cli.rs
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use crate::aggregator::DashboardSummary;
use crate::app_log;
use crate::auth::{FileTokenStore, SessionGuard, SessionOutcome};
use crate::config::ClientConfig;
use crate::core::{HttpRemoteStore, RemoteStore};
use crate::dashboard::{Dashboard, DashboardOutcome};
use crate::error::SyncError;
use crate::lifecycle::{JobStatus, StatusAffordance};
use crate::types::{JobPost, NewJobPost};

#[derive(Parser)]
#[command(name = "jobpost")]
#[command(about = "Create, track and publish AI-drafted job posts")]
pub struct JobPostCli {
    #[command(subcommand)]
    pub command: JobPostCommand,

    /// Path to config.yaml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the job post API base URL
    #[arg(long, global = true)]
    pub api_url: Option<String>,
}

#[derive(Subcommand)]
pub enum JobPostCommand {
    /// Store a session token issued by the hiring backend
    Login {
        #[arg(long)]
        token: String,
    },
    /// Forget the stored session token
    Logout,
    /// Show the authenticated recruiter
    Whoami,
    /// List job posts, newest first
    List,
    /// Show counts per lifecycle stage
    Summary,
    /// Show one job post in full
    Show { id: i64 },
    /// Create a job post and let the AI draft its description
    Create {
        #[arg(long)]
        role: String,
        #[arg(long)]
        requirements: Option<String>,
        #[arg(long)]
        form_link: Option<String>,
    },
    /// Edit a job post
    Update {
        id: i64,
        #[arg(long)]
        requirements: Option<String>,
        #[arg(long)]
        draft: Option<String>,
        #[arg(long)]
        final_jd: Option<String>,
        #[arg(long)]
        status: Option<JobStatus>,
        #[arg(long)]
        form_link: Option<String>,
    },
    /// Accept the AI draft as the final description
    Approve { id: i64 },
    /// Ask the AI to rework the draft
    Refine {
        id: i64,
        #[arg(long)]
        feedback: String,
    },
    /// Publish an approved job post to LinkedIn
    Publish {
        id: i64,
        #[arg(long)]
        access_token: String,
        #[arg(long)]
        author_urn: String,
    },
    /// Delete a job post
    Delete { id: i64 },
}

pub async fn handle_command(cli: JobPostCli, config: ClientConfig) -> Result<()> {
    let store: Arc<dyn RemoteStore> = Arc::new(HttpRemoteStore::from_config(&config)?);
    let tokens = Arc::new(FileTokenStore::new(config.token_path.clone()));
    let guard = SessionGuard::new(store.clone(), tokens.clone());

    match &cli.command {
        JobPostCommand::Login { token } => {
            guard.login(token)?;
            match guard.establish().await? {
                SessionOutcome::Authenticated(session) => {
                    println!("✅ Logged in as {}", session.user.display_name());
                    println!("Token cached at {}", tokens.path().display());
                }
                SessionOutcome::Unauthenticated(reason) => {
                    anyhow::bail!("Token rejected: {}", reason.message());
                }
            }
            return Ok(());
        }
        JobPostCommand::Logout => {
            guard.logout()?;
            println!("Logged out, removed {}", tokens.path().display());
            return Ok(());
        }
        _ => {}
    }

    let outcome = match Dashboard::open(guard, store).await {
        Ok(outcome) => outcome,
        Err(e) => match load_failure_hint(&e) {
            Some(hint) => return Err(anyhow::Error::new(e).context(hint)),
            None => return Err(e.into()),
        },
    };

    let dashboard = match outcome {
        DashboardOutcome::Ready(dashboard) => dashboard,
        DashboardOutcome::Unauthenticated(reason) => {
            anyhow::bail!(
                "{}. Run `jobpost login --token <TOKEN>` to sign in again.",
                reason.message()
            );
        }
    };

    let result = run(&dashboard, cli.command).await;
    if dashboard.is_signed_out() {
        return result.context("Session ended. Run `jobpost login --token <TOKEN>` to sign in again");
    }
    result
}

async fn run(dashboard: &Dashboard, command: JobPostCommand) -> Result<()> {
    match command {
        JobPostCommand::Login { .. } | JobPostCommand::Logout => {}

        JobPostCommand::Whoami => {
            let user = dashboard.user();
            println!("{} <{}>", user.display_name(), user.email);
            if let Some(company) = &user.company {
                println!("Company: {}", company);
            }
        }

        JobPostCommand::List => {
            let posts = dashboard.posts().await;
            if posts.is_empty() {
                println!("No job posts yet. Create your first one with `jobpost create --role ...`.");
            } else {
                print_table(&posts);
            }
        }

        JobPostCommand::Summary => {
            let summary = dashboard.summary().await;
            if summary.is_empty() {
                println!("No job posts yet.");
            } else {
                print_summary(&summary);
            }
        }

        JobPostCommand::Show { id } => {
            let job = dashboard
                .refresh(id)
                .await?
                .ok_or(SyncError::NotFound(id))?;
            print_job(&job);
        }

        JobPostCommand::Create {
            role,
            requirements,
            form_link,
        } => {
            let mut request = NewJobPost::new(role);
            if let Some(requirements) = requirements {
                request = request.with_requirements(requirements);
            }
            if let Some(link) = form_link {
                request = request.with_google_form_link(link);
            }
            let job = dashboard.create(request).await?;
            println!("✅ Job post {} created ({})", job.id, job.status);
        }

        JobPostCommand::Update {
            id,
            requirements,
            draft,
            final_jd,
            status,
            form_link,
        } => {
            let mut job = dashboard
                .repository()
                .get(id)
                .await
                .ok_or(SyncError::NotFound(id))?;

            if requirements.is_some() {
                job.requirements = requirements;
            }
            if draft.is_some() {
                job.jd_draft = draft;
            }
            if final_jd.is_some() {
                job.final_jd = final_jd;
            }
            if let Some(status) = status {
                job.status = status;
            }
            if form_link.is_some() {
                job.google_form_link = form_link;
            }

            let job = dashboard.update(job).await?;
            println!("✅ Job post {} updated ({})", job.id, job.status);
        }

        JobPostCommand::Approve { id } => {
            report_transition(id, dashboard.approve(id).await?);
        }

        JobPostCommand::Refine { id, feedback } => {
            report_transition(id, dashboard.refine(id, &feedback).await?);
        }

        JobPostCommand::Publish {
            id,
            access_token,
            author_urn,
        } => {
            let job = dashboard.publish(id, &access_token, &author_urn).await?;
            if let Some(url) = job.as_ref().and_then(|job| job.linkedin_post_url.as_deref()) {
                println!("✅ Posted to LinkedIn: {}", url);
            } else {
                report_transition(id, job);
            }
        }

        JobPostCommand::Delete { id } => {
            dashboard.delete(id).await?;
            println!("✅ Job post {} deleted", id);
        }
    }

    Ok(())
}

/// Explain a collection the store sent back in an inconsistent state.
fn load_failure_hint(error: &SyncError) -> Option<String> {
    let id = match error {
        SyncError::InvariantViolation { id, .. } | SyncError::DuplicateId(id) => *id,
        _ => return None,
    };
    Some(format!(
        "Job post {} from the store is inconsistent, so the dashboard cannot load. \
         Correct it on the server, or run `jobpost login --token <TOKEN>` and retry",
        id
    ))
}

fn report_transition(id: i64, job: Option<JobPost>) {
    match job {
        Some(job) => println!("✅ Job post {} is now {}", job.id, job.status),
        None => {
            app_log!(warn, "Job post {} vanished before its refresh was applied", id);
            println!("Job post {} is no longer available", id);
        }
    }
}

fn print_summary(summary: &DashboardSummary) {
    println!("{:<22} {}", "Total jobs", summary.total);
    println!("{:<22} {}", "In progress", summary.in_progress);
    println!("{:<22} {}", "Approved", summary.approved);
    println!("{:<22} {}", "Posted to LinkedIn", summary.posted);
}

fn print_table(posts: &[JobPost]) {
    println!(
        "{:<6} {:<10} {:<12} {:<40} {:<17}",
        "ID", "Status", "Icon", "Role", "Created"
    );
    println!("{}", "-".repeat(89));

    for job in posts {
        let affordance = StatusAffordance::for_status(job.status);
        println!(
            "{:<6} {:<10} {:<12} {:<40} {:<17}",
            job.id,
            job.status,
            affordance.icon(),
            truncate(&job.role_request, 40),
            job.created_at.format("%Y-%m-%d %H:%M")
        );
    }
}

fn print_job(job: &JobPost) {
    println!("Job post {} [{}]", job.id, job.status);
    println!("Role: {}", job.role_request);
    if let Some(requirements) = &job.requirements {
        println!("Requirements: {}", requirements);
    }
    if let Some(link) = &job.google_form_link {
        println!("Application form: {}", link);
    }
    if let Some(url) = &job.linkedin_post_url {
        println!("LinkedIn: {}", url);
    }
    println!("Created: {}", job.created_at.format("%Y-%m-%d %H:%M"));
    if let Some(updated) = job.updated_at {
        println!("Updated: {}", updated.format("%Y-%m-%d %H:%M"));
    }
    if let Some(description) = job.current_description() {
        println!();
        println!("{}", description);
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
        cut.push('…');
        cut
    }
}
