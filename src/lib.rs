//! Client for a resume-to-job-description scoring service: validates and
//! captures resume files, submits them (single or batch), drives the batch
//! polling loop, and renders the returned compatibility scores.

use anyhow::{bail, Result};
use std::path::Path;

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod report;
pub mod session;
pub mod types;
pub mod upload;

pub use client::{ScoringApi, ScoringClient};
pub use config::AppConfig;
pub use error::ApiError;
pub use session::{AnalysisSession, AnalysisState};
pub use types::{AnalysisResult, BatchAnalysisResult, BatchStatus};
pub use upload::{ResumeFile, UploadOutcome, UploadPolicy};

/// Convenience entry point: validate one resume and run a single analysis
/// against the configured scoring service.
pub async fn analyze_resume(
    resume_path: &Path,
    job_description: &str,
    config: &AppConfig,
) -> Result<AnalysisResult> {
    if job_description.trim().is_empty() {
        bail!("Please enter a job description");
    }

    let policy = UploadPolicy::from_config(config);
    let file = match upload::inspect_file(resume_path, &policy).await {
        UploadOutcome::Accepted(file) => file,
        UploadOutcome::Rejected(reason) => bail!("{}", reason),
    };

    let client = ScoringClient::new(config)?;
    let mut session = AnalysisSession::new(client, config.poll_interval);
    session.analyze_single(&file, job_description).await;

    match (
        session.state().results.clone(),
        session.state().error.clone(),
    ) {
        (Some(results), _) => Ok(results),
        (None, Some(error)) => bail!("{}", error),
        (None, None) => bail!("Analysis produced no result"),
    }
}
