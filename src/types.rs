// src/types.rs
//! Wire types for the resume scoring service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ===== Analysis result =====

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Overall compatibility score on a 0-100 scale.
    pub overall_score: f64,
    pub component_scores: ComponentScores,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub recommendations: Vec<String>,
    pub detailed_analysis: DetailedAnalysis,
}

/// The five sub-metrics behind the overall score, each on a 0.0-1.0 scale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentScores {
    pub semantic_similarity: f64,
    pub skill_match: f64,
    pub experience_match: f64,
    pub education_match: f64,
    pub keyword_match: f64,
}

impl ComponentScores {
    /// Fixed display order, paired with human-readable labels.
    pub fn labelled(&self) -> [(&'static str, f64); 5] {
        [
            ("Semantic Similarity", self.semantic_similarity),
            ("Skill Match", self.skill_match),
            ("Experience Match", self.experience_match),
            ("Education Match", self.education_match),
            ("Keyword Match", self.keyword_match),
        ]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailedAnalysis {
    pub overall_assessment: String,
    pub strengths: Vec<String>,
    pub areas_for_improvement: Vec<String>,
}

// ===== Batch job =====

/// Server-assigned batch job state. Monotonic: once `Completed` or `Failed`
/// the job never reverts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl BatchStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, BatchStatus::Completed | BatchStatus::Failed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BatchStatus::Pending => "pending",
            BatchStatus::Processing => "processing",
            BatchStatus::Completed => "completed",
            BatchStatus::Failed => "failed",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchAnalysisResult {
    pub job_id: String,
    pub status: BatchStatus,
    /// Populated only when the job completed.
    pub results: Option<Vec<AnalysisResult>>,
    /// Populated only when the job failed.
    pub error: Option<String>,
    pub created_at: String,
    pub completed_at: Option<String>,
}

impl BatchAnalysisResult {
    pub fn created_at_time(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.created_at)
    }

    pub fn completed_at_time(&self) -> Option<DateTime<Utc>> {
        self.completed_at.as_deref().and_then(parse_timestamp)
    }
}

/// Timestamps come back string-encoded; parse leniently and fall back to
/// None rather than failing the whole decode.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}

// ===== Service response envelopes =====

#[derive(Debug, Deserialize)]
pub struct AnalyzeResponse {
    pub similarity_analysis: AnalysisResult,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BatchSubmitResponse {
    pub job_id: String,
}

#[derive(Debug, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct SupportedTypesResponse {
    pub supported_types: Vec<String>,
}
