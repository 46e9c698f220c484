// src/cli.rs
use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::client::ScoringClient;
use crate::config::AppConfig;
use crate::report::{render_analysis, render_batch};
use crate::session::AnalysisSession;
use crate::upload::{inspect_file, UploadOutcome, UploadPolicy, UploadQueue, UploadSlot};

#[derive(Parser)]
#[command(name = "resumatch")]
#[command(about = "Match resumes against a job description via the scoring service")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Override the scoring service base URL
    #[arg(long, global = true)]
    pub api_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Analyze one resume against a job description
    Analyze {
        /// Resume file (pdf, doc, docx, txt, jpg, png)
        #[arg(long)]
        resume: PathBuf,

        /// Job description text
        #[arg(long, conflicts_with = "job_file")]
        job_description: Option<String>,

        /// Read the job description from a file
        #[arg(long)]
        job_file: Option<PathBuf>,
    },
    /// Analyze several resumes against one job description as a batch job
    Batch {
        /// Resume files, one flag per file
        #[arg(long = "resume", required = true)]
        resumes: Vec<PathBuf>,

        #[arg(long, conflicts_with = "job_file")]
        job_description: Option<String>,

        #[arg(long)]
        job_file: Option<PathBuf>,
    },
    /// Check the status of a batch job
    Status { job_id: String },
    /// Check scoring service health
    Health,
    /// List resume formats the service accepts
    SupportedTypes,
}

pub async fn handle_command(cli: Cli, mut config: AppConfig) -> Result<()> {
    if let Some(url) = cli.api_url {
        config = config.with_base_url(url);
    }

    match cli.command {
        Command::Analyze {
            resume,
            job_description,
            job_file,
        } => {
            let description = resolve_job_description(job_description, job_file)?;
            analyze_single(&resume, &description, &config).await
        }

        Command::Batch {
            resumes,
            job_description,
            job_file,
        } => {
            let description = resolve_job_description(job_description, job_file)?;
            analyze_batch(&resumes, &description, &config).await
        }

        Command::Status { job_id } => {
            let client = ScoringClient::new(&config)?;
            let mut session = AnalysisSession::new(client, config.poll_interval);
            session.check_batch_status(&job_id).await;

            if let Some(error) = &session.state().error {
                bail!("{}", error);
            }
            if let Some(batch) = &session.state().batch_results {
                print!("{}", render_batch(batch));
            }
            Ok(())
        }

        Command::Health => {
            let client = ScoringClient::new(&config)?;
            let health = client.health().await?;
            println!("{}: {}", health.status, health.message);
            Ok(())
        }

        Command::SupportedTypes => {
            let client = ScoringClient::new(&config)?;
            let response = client.supported_types().await?;
            for file_type in response.supported_types {
                println!("{}", file_type);
            }
            Ok(())
        }
    }
}

async fn analyze_single(resume: &Path, description: &str, config: &AppConfig) -> Result<()> {
    let policy = UploadPolicy::from_config(config);
    let mut slot = UploadSlot::new();

    match inspect_file(resume, &policy).await {
        UploadOutcome::Accepted(file) => slot.accept(file),
        UploadOutcome::Rejected(reason) => bail!("{}", reason),
    }

    let Some(file) = slot.file() else {
        bail!("Please upload a resume");
    };

    let client = ScoringClient::new(config)?;
    let mut session = AnalysisSession::new(client, config.poll_interval);
    session.analyze_single(file, description).await;

    match (&session.state().results, &session.state().error) {
        (Some(results), _) => {
            print!("{}", render_analysis(results));
            Ok(())
        }
        (None, Some(error)) => bail!("{}", error),
        (None, None) => bail!("Analysis produced no result"),
    }
}

async fn analyze_batch(resumes: &[PathBuf], description: &str, config: &AppConfig) -> Result<()> {
    let policy = UploadPolicy::from_config(config);
    let mut queue = UploadQueue::new();

    for path in resumes {
        match inspect_file(path, &policy).await {
            UploadOutcome::Accepted(file) => queue.push(file),
            UploadOutcome::Rejected(reason) => {
                bail!("{}: {}", path.display(), reason)
            }
        }
    }

    if queue.is_empty() {
        bail!("Please upload at least one resume for batch analysis");
    }

    info!("Submitting batch of {} resumes", queue.len());

    let client = ScoringClient::new(config)?;
    let mut session = AnalysisSession::new(client, config.poll_interval);
    session.analyze_batch(queue.files(), description).await;

    match (&session.state().batch_results, &session.state().error) {
        (Some(batch), None) => {
            print!("{}", render_batch(batch));
            Ok(())
        }
        (_, Some(error)) => bail!("{}", error),
        (None, None) => bail!("Batch analysis produced no result"),
    }
}

/// Resolve the job description from the flag or a file, rejecting blank
/// input before any network call.
fn resolve_job_description(
    inline: Option<String>,
    file: Option<PathBuf>,
) -> Result<String> {
    let raw = match (inline, file) {
        (Some(text), None) => text,
        (None, Some(path)) => std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?,
        (None, None) => bail!("Please enter a job description (--job-description or --job-file)"),
        (Some(_), Some(_)) => bail!("Use either --job-description or --job-file, not both"),
    };

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        bail!("Please enter a job description");
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_description_required() {
        assert!(resolve_job_description(None, None).is_err());
    }

    #[test]
    fn test_blank_job_description_rejected() {
        let result = resolve_job_description(Some("   \n".to_string()), None);
        assert!(result.is_err());
    }

    #[test]
    fn test_job_description_trimmed() {
        let result = resolve_job_description(Some("  rust engineer  ".to_string()), None);
        assert_eq!(result.unwrap(), "rust engineer");
    }

    #[test]
    fn test_cli_parses_batch_with_repeated_resumes() {
        let cli = Cli::try_parse_from([
            "resumatch",
            "batch",
            "--resume",
            "a.pdf",
            "--resume",
            "b.pdf",
            "--job-description",
            "rust engineer",
        ])
        .unwrap();
        match cli.command {
            Command::Batch { resumes, .. } => assert_eq!(resumes.len(), 2),
            _ => panic!("expected batch command"),
        }
    }
}
