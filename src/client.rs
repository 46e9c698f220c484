// src/client.rs
//! HTTP adapter for the resume scoring service.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use tracing::{error, info};

use crate::config::AppConfig;
use crate::error::ApiError;
use crate::types::{
    AnalysisResult, AnalyzeResponse, BatchAnalysisResult, BatchSubmitResponse, HealthResponse,
    SupportedTypesResponse,
};
use crate::upload::ResumeFile;

const ANALYZE_ENDPOINT: &str = "/analyze";
const ANALYZE_BATCH_ENDPOINT: &str = "/analyze/batch";
const HEALTH_ENDPOINT: &str = "/health";
const SUPPORTED_TYPES_ENDPOINT: &str = "/supported-types";

/// The subset of service operations the orchestration session depends on.
/// Kept as a trait so the session can be tested against a scripted double.
#[async_trait]
pub trait ScoringApi {
    async fn analyze(
        &self,
        resume: &ResumeFile,
        job_description: &str,
    ) -> Result<AnalysisResult, ApiError>;

    async fn analyze_batch(
        &self,
        resumes: &[ResumeFile],
        job_description: &str,
    ) -> Result<BatchSubmitResponse, ApiError>;

    async fn batch_status(&self, job_id: &str) -> Result<BatchAnalysisResult, ApiError>;
}

pub struct ScoringClient {
    client: reqwest::Client,
    base_url: String,
}

impl ScoringClient {
    pub fn new(config: &AppConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    pub async fn health(&self) -> Result<HealthResponse, ApiError> {
        self.get_json(HEALTH_ENDPOINT).await
    }

    pub async fn supported_types(&self) -> Result<SupportedTypesResponse, ApiError> {
        self.get_json(SUPPORTED_TYPES_ENDPOINT).await
    }

    fn resume_part(resume: &ResumeFile) -> Result<Part, ApiError> {
        Part::bytes(resume.bytes.clone())
            .file_name(resume.file_name.clone())
            .mime_str(resume.content_type)
            .map_err(|e| ApiError::Transport(e.to_string()))
    }

    async fn get_json<R>(&self, endpoint: &str) -> Result<R, ApiError>
    where
        R: serde::de::DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, endpoint);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(ApiError::from_transport)?;

        Self::decode(response).await
    }

    async fn decode<R>(response: reqwest::Response) -> Result<R, ApiError>
    where
        R: serde::de::DeserializeOwned,
    {
        let status = response.status();
        if status.is_success() {
            response
                .json::<R>()
                .await
                .map_err(|e| ApiError::InvalidResponse(e.to_string()))
        } else {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!("Scoring service error {}: {}", status, body);
            Err(ApiError::from_status(status.as_u16(), body))
        }
    }
}

#[async_trait]
impl ScoringApi for ScoringClient {
    /// One resume against one job description, synchronous round trip.
    async fn analyze(
        &self,
        resume: &ResumeFile,
        job_description: &str,
    ) -> Result<AnalysisResult, ApiError> {
        let url = format!("{}{}", self.base_url, ANALYZE_ENDPOINT);

        let form = Form::new()
            .part("resume", Self::resume_part(resume)?)
            .text("job_description", job_description.to_string());

        info!("Submitting {} for analysis", resume.file_name);

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(ApiError::from_transport)?;

        let envelope: AnalyzeResponse = Self::decode(response).await?;
        Ok(envelope.similarity_analysis)
    }

    /// Submit a batch job; the returned job id is polled via `batch_status`.
    async fn analyze_batch(
        &self,
        resumes: &[ResumeFile],
        job_description: &str,
    ) -> Result<BatchSubmitResponse, ApiError> {
        let url = format!("{}{}", self.base_url, ANALYZE_BATCH_ENDPOINT);

        let mut form = Form::new();
        for resume in resumes {
            form = form.part("resumes", Self::resume_part(resume)?);
        }
        form = form.text("job_description", job_description.to_string());

        info!("Submitting batch of {} resumes", resumes.len());

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(ApiError::from_transport)?;

        Self::decode(response).await
    }

    async fn batch_status(&self, job_id: &str) -> Result<BatchAnalysisResult, ApiError> {
        let endpoint = format!("{}/{}", ANALYZE_BATCH_ENDPOINT, job_id);
        self.get_json(&endpoint).await
    }
}
