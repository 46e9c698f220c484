// src/session.rs
//! Analysis orchestration: owns the request lifecycle state for single and
//! batch submissions and drives the batch polling loop.
//!
//! The session is an explicit state container constructed per use, injected
//! with any `ScoringApi` implementation. Methods take `&mut self`, so only
//! one submission can be live at a time and `reset` cannot race an in-flight
//! polling loop; dropping the future returned by `analyze_batch` cancels the
//! loop with no orphan timer left behind.

use std::time::Duration;
use tracing::{error, info, warn};

use crate::client::ScoringApi;
use crate::types::{AnalysisResult, BatchAnalysisResult, BatchStatus};
use crate::upload::ResumeFile;

const FALLBACK_BATCH_ERROR: &str = "Analysis failed";

/// Client-held lifecycle state for one analysis session.
///
/// `is_loading` is true only between submit and terminal resolution.
/// `results` and `batch_results` are mutually exclusive outcomes.
#[derive(Debug, Default)]
pub struct AnalysisState {
    pub is_loading: bool,
    pub results: Option<AnalysisResult>,
    pub batch_results: Option<BatchAnalysisResult>,
    pub error: Option<String>,
}

impl AnalysisState {
    fn begin_single(&mut self) {
        self.is_loading = true;
        self.error = None;
        self.results = None;
    }

    fn begin_batch(&mut self) {
        self.is_loading = true;
        self.error = None;
        self.batch_results = None;
    }

    fn fail(&mut self, message: String) {
        self.is_loading = false;
        self.error = Some(message);
    }
}

pub struct AnalysisSession<A: ScoringApi> {
    api: A,
    poll_interval: Duration,
    state: AnalysisState,
}

impl<A: ScoringApi> AnalysisSession<A> {
    pub fn new(api: A, poll_interval: Duration) -> Self {
        Self {
            api,
            poll_interval,
            state: AnalysisState::default(),
        }
    }

    pub fn state(&self) -> &AnalysisState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading
    }

    /// Single mode: exactly one of `results` or `error` is set afterward,
    /// and `is_loading` is false either way. Input validation is the
    /// caller's responsibility.
    pub async fn analyze_single(&mut self, resume: &ResumeFile, job_description: &str) {
        self.state.begin_single();

        match self.api.analyze(resume, job_description).await {
            Ok(results) => {
                info!("Analysis completed: overall score {:.1}", results.overall_score);
                self.state.is_loading = false;
                self.state.results = Some(results);
            }
            Err(e) => {
                error!("Analysis failed: {}", e);
                self.state.fail(e.to_string());
            }
        }
    }

    /// Batch mode: submit, then poll sequentially on a fixed interval until
    /// the job reaches a terminal status. Each tick replaces `batch_results`
    /// wholesale; the server snapshot is authoritative. The first transport
    /// error during polling ends the loop with no retry.
    pub async fn analyze_batch(&mut self, resumes: &[ResumeFile], job_description: &str) {
        self.state.begin_batch();

        info!("Starting batch analysis for {} resumes", resumes.len());

        let job_id = match self.api.analyze_batch(resumes, job_description).await {
            Ok(response) => response.job_id,
            Err(e) => {
                error!("Batch submission failed: {}", e);
                self.state.fail(e.to_string());
                return;
            }
        };

        info!("Batch job {} accepted, polling for status", job_id);

        loop {
            let snapshot = match self.api.batch_status(&job_id).await {
                Ok(snapshot) => snapshot,
                Err(e) => {
                    error!("Batch status check failed for job {}: {}", job_id, e);
                    self.state.fail(e.to_string());
                    return;
                }
            };

            let status = snapshot.status;
            let job_error = snapshot.error.clone();
            self.state.batch_results = Some(snapshot);

            match status {
                BatchStatus::Completed => {
                    info!("Batch job {} completed", job_id);
                    self.state.is_loading = false;
                    return;
                }
                BatchStatus::Failed => {
                    let message =
                        job_error.unwrap_or_else(|| FALLBACK_BATCH_ERROR.to_string());
                    warn!("Batch job {} failed: {}", job_id, message);
                    self.state.fail(message);
                    return;
                }
                BatchStatus::Pending | BatchStatus::Processing => {
                    tokio::time::sleep(self.poll_interval).await;
                }
            }
        }
    }

    /// One-off status check for a known job id. Replaces the batch snapshot
    /// without touching `is_loading`.
    pub async fn check_batch_status(&mut self, job_id: &str) {
        match self.api.batch_status(job_id).await {
            Ok(snapshot) => {
                self.state.batch_results = Some(snapshot);
            }
            Err(e) => {
                error!("Batch status check failed for job {}: {}", job_id, e);
                self.state.error = Some(e.to_string());
            }
        }
    }

    /// Unconditionally back to idle: all result and error fields cleared.
    pub fn reset(&mut self) {
        self.state = AnalysisState::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::types::{BatchSubmitResponse, ComponentScores, DetailedAnalysis};
    use async_trait::async_trait;
    use std::sync::Mutex;

    fn sample_result(overall: f64) -> AnalysisResult {
        AnalysisResult {
            overall_score: overall,
            component_scores: ComponentScores {
                semantic_similarity: 0.8,
                skill_match: 0.7,
                experience_match: 0.6,
                education_match: 0.9,
                keyword_match: 0.65,
            },
            matched_skills: vec!["rust".to_string()],
            missing_skills: vec!["kubernetes".to_string()],
            recommendations: vec![],
            detailed_analysis: DetailedAnalysis {
                overall_assessment: "ok".to_string(),
                strengths: vec![],
                areas_for_improvement: vec![],
            },
        }
    }

    fn sample_resume() -> ResumeFile {
        ResumeFile {
            file_name: "cv.pdf".to_string(),
            content_type: "application/pdf",
            bytes: b"%PDF".to_vec(),
        }
    }

    fn batch_snapshot(status: BatchStatus, error: Option<&str>) -> BatchAnalysisResult {
        BatchAnalysisResult {
            job_id: "job-1".to_string(),
            status,
            results: if status == BatchStatus::Completed {
                Some(vec![sample_result(80.0)])
            } else {
                None
            },
            error: error.map(|s| s.to_string()),
            created_at: "2025-03-01T10:00:00Z".to_string(),
            completed_at: status
                .is_terminal()
                .then(|| "2025-03-01T10:01:00Z".to_string()),
        }
    }

    /// Scripted service double: pops one canned response per call.
    struct ScriptedApi {
        single: Mutex<Vec<Result<AnalysisResult, ApiError>>>,
        submit: Mutex<Vec<Result<BatchSubmitResponse, ApiError>>>,
        polls: Mutex<Vec<Result<BatchAnalysisResult, ApiError>>>,
    }

    impl ScriptedApi {
        fn new() -> Self {
            Self {
                single: Mutex::new(vec![]),
                submit: Mutex::new(vec![]),
                polls: Mutex::new(vec![]),
            }
        }

        fn poll_calls_remaining(&self) -> usize {
            self.polls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ScoringApi for &ScriptedApi {
        async fn analyze(
            &self,
            _resume: &ResumeFile,
            _job_description: &str,
        ) -> Result<AnalysisResult, ApiError> {
            self.single.lock().unwrap().remove(0)
        }

        async fn analyze_batch(
            &self,
            _resumes: &[ResumeFile],
            _job_description: &str,
        ) -> Result<BatchSubmitResponse, ApiError> {
            self.submit.lock().unwrap().remove(0)
        }

        async fn batch_status(&self, _job_id: &str) -> Result<BatchAnalysisResult, ApiError> {
            self.polls.lock().unwrap().remove(0)
        }
    }

    fn session(api: &ScriptedApi) -> AnalysisSession<&ScriptedApi> {
        AnalysisSession::new(api, Duration::from_millis(1))
    }

    #[tokio::test]
    async fn test_single_success_sets_results_only() {
        let api = ScriptedApi::new();
        api.single.lock().unwrap().push(Ok(sample_result(72.5)));

        let mut session = session(&api);
        session.analyze_single(&sample_resume(), "rust engineer").await;

        let state = session.state();
        assert!(!state.is_loading);
        assert!(state.results.is_some());
        assert!(state.error.is_none());
    }

    #[tokio::test]
    async fn test_single_failure_sets_error_only() {
        let api = ScriptedApi::new();
        api.single.lock().unwrap().push(Err(ApiError::RateLimited));

        let mut session = session(&api);
        session.analyze_single(&sample_resume(), "rust engineer").await;

        let state = session.state();
        assert!(!state.is_loading);
        assert!(state.results.is_none());
        assert_eq!(
            state.error.as_deref(),
            Some("Too many requests. Please try again later.")
        );
    }

    #[tokio::test]
    async fn test_batch_polls_until_completed() {
        let api = ScriptedApi::new();
        api.submit.lock().unwrap().push(Ok(BatchSubmitResponse {
            job_id: "job-1".to_string(),
        }));
        api.polls.lock().unwrap().extend([
            Ok(batch_snapshot(BatchStatus::Pending, None)),
            Ok(batch_snapshot(BatchStatus::Processing, None)),
            Ok(batch_snapshot(BatchStatus::Completed, None)),
        ]);

        let mut session = session(&api);
        session.analyze_batch(&[sample_resume()], "rust engineer").await;

        let state = session.state();
        assert!(!state.is_loading);
        assert!(state.error.is_none());
        let batch = state.batch_results.as_ref().unwrap();
        assert_eq!(batch.status, BatchStatus::Completed);
        assert_eq!(batch.results.as_ref().unwrap().len(), 1);
        assert_eq!(api.poll_calls_remaining(), 0);
    }

    #[tokio::test]
    async fn test_batch_immediate_failure_ends_after_one_tick() {
        let api = ScriptedApi::new();
        api.submit.lock().unwrap().push(Ok(BatchSubmitResponse {
            job_id: "job-1".to_string(),
        }));
        api.polls.lock().unwrap().extend([
            Ok(batch_snapshot(BatchStatus::Failed, Some("x"))),
            // must never be reached
            Ok(batch_snapshot(BatchStatus::Completed, None)),
        ]);

        let mut session = session(&api);
        session.analyze_batch(&[sample_resume()], "rust engineer").await;

        let state = session.state();
        assert!(!state.is_loading);
        assert_eq!(state.error.as_deref(), Some("x"));
        assert_eq!(api.poll_calls_remaining(), 1);
    }

    #[tokio::test]
    async fn test_batch_transport_error_during_poll_stops_loop() {
        let api = ScriptedApi::new();
        api.submit.lock().unwrap().push(Ok(BatchSubmitResponse {
            job_id: "job-1".to_string(),
        }));
        api.polls.lock().unwrap().extend([
            Ok(batch_snapshot(BatchStatus::Processing, None)),
            Err(ApiError::Timeout),
            Ok(batch_snapshot(BatchStatus::Completed, None)),
        ]);

        let mut session = session(&api);
        session.analyze_batch(&[sample_resume()], "rust engineer").await;

        let state = session.state();
        assert!(!state.is_loading);
        assert_eq!(
            state.error.as_deref(),
            Some("Request timeout. Please try again.")
        );
        // the loop stopped at the transport error, leaving one canned poll
        assert_eq!(api.poll_calls_remaining(), 1);
    }

    #[tokio::test]
    async fn test_batch_failed_without_message_uses_fallback() {
        let api = ScriptedApi::new();
        api.submit.lock().unwrap().push(Ok(BatchSubmitResponse {
            job_id: "job-1".to_string(),
        }));
        api.polls
            .lock()
            .unwrap()
            .push(Ok(batch_snapshot(BatchStatus::Failed, None)));

        let mut session = session(&api);
        session.analyze_batch(&[sample_resume()], "rust engineer").await;

        assert_eq!(session.state().error.as_deref(), Some("Analysis failed"));
    }

    #[tokio::test]
    async fn test_reset_clears_everything() {
        let api = ScriptedApi::new();
        api.submit.lock().unwrap().push(Ok(BatchSubmitResponse {
            job_id: "job-1".to_string(),
        }));
        api.polls
            .lock()
            .unwrap()
            .push(Ok(batch_snapshot(BatchStatus::Completed, None)));

        let mut session = session(&api);
        session.analyze_batch(&[sample_resume()], "rust engineer").await;
        assert!(session.state().batch_results.is_some());

        session.reset();

        let state = session.state();
        assert!(!state.is_loading);
        assert!(state.results.is_none());
        assert!(state.batch_results.is_none());
        assert!(state.error.is_none());
    }

    #[tokio::test]
    async fn test_check_batch_status_replaces_snapshot() {
        let api = ScriptedApi::new();
        api.polls
            .lock()
            .unwrap()
            .push(Ok(batch_snapshot(BatchStatus::Processing, None)));

        let mut session = session(&api);
        session.check_batch_status("job-1").await;

        let state = session.state();
        assert!(!state.is_loading);
        assert_eq!(
            state.batch_results.as_ref().unwrap().status,
            BatchStatus::Processing
        );
    }
}
