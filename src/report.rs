// src/report.rs
//! Pure text rendering of analysis results: score banding, component
//! percentages, capped skill lists.

use std::fmt::Write;

use crate::types::{AnalysisResult, BatchAnalysisResult, BatchStatus};

/// Entries shown per skill list before collapsing into a "+N more" line.
pub const SKILL_DISPLAY_CAP: usize = 20;

/// Coarse classification of a 0-100 score for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    Favorable,
    Borderline,
    Unfavorable,
}

impl ScoreBand {
    pub fn from_percent(percent: f64) -> Self {
        if percent >= 75.0 {
            ScoreBand::Favorable
        } else if percent >= 60.0 {
            ScoreBand::Borderline
        } else {
            ScoreBand::Unfavorable
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScoreBand::Favorable => "favorable",
            ScoreBand::Borderline => "borderline",
            ScoreBand::Unfavorable => "unfavorable",
        }
    }
}

/// Convert a 0.0-1.0 component score to a rounded whole percentage.
pub fn component_percent(score: f64) -> u32 {
    (score * 100.0).round() as u32
}

/// First `SKILL_DISPLAY_CAP` entries plus the count of hidden ones.
pub fn capped_skills(skills: &[String]) -> (&[String], usize) {
    if skills.len() > SKILL_DISPLAY_CAP {
        (&skills[..SKILL_DISPLAY_CAP], skills.len() - SKILL_DISPLAY_CAP)
    } else {
        (skills, 0)
    }
}

pub fn render_analysis(result: &AnalysisResult) -> String {
    let mut out = String::new();
    let overall_band = ScoreBand::from_percent(result.overall_score);

    writeln!(
        out,
        "Overall Match: {:.1}% ({})",
        result.overall_score,
        overall_band.label()
    )
    .ok();
    writeln!(out, "{}", result.detailed_analysis.overall_assessment).ok();
    writeln!(out).ok();

    writeln!(out, "Component Scores").ok();
    for (label, score) in result.component_scores.labelled() {
        let percent = component_percent(score);
        let band = ScoreBand::from_percent(percent as f64);
        writeln!(out, "  {:<20} {:>3}%  {}", label, percent, band.label()).ok();
    }
    writeln!(out).ok();

    render_skill_list(&mut out, "Matched Skills", &result.matched_skills);
    render_skill_list(&mut out, "Missing Skills", &result.missing_skills);

    if !result.recommendations.is_empty() {
        writeln!(out, "Recommendations").ok();
        for item in &result.recommendations {
            writeln!(out, "  - {}", item).ok();
        }
        writeln!(out).ok();
    }

    if !result.detailed_analysis.strengths.is_empty() {
        writeln!(out, "Strengths").ok();
        for item in &result.detailed_analysis.strengths {
            writeln!(out, "  - {}", item).ok();
        }
        writeln!(out).ok();
    }

    if !result.detailed_analysis.areas_for_improvement.is_empty() {
        writeln!(out, "Areas for Improvement").ok();
        for item in &result.detailed_analysis.areas_for_improvement {
            writeln!(out, "  - {}", item).ok();
        }
    }

    out
}

fn render_skill_list(out: &mut String, heading: &str, skills: &[String]) {
    writeln!(out, "{} ({})", heading, skills.len()).ok();
    let (shown, hidden) = capped_skills(skills);
    for skill in shown {
        writeln!(out, "  - {}", skill).ok();
    }
    if hidden > 0 {
        writeln!(out, "  +{} more skills", hidden).ok();
    }
    writeln!(out).ok();
}

pub fn render_batch(batch: &BatchAnalysisResult) -> String {
    let mut out = String::new();

    writeln!(out, "Batch job {}: {}", batch.job_id, batch.status.as_str()).ok();

    if let (Some(created), Some(completed)) =
        (batch.created_at_time(), batch.completed_at_time())
    {
        let elapsed = completed.signed_duration_since(created);
        writeln!(out, "Elapsed: {}s", elapsed.num_seconds()).ok();
    }

    match batch.status {
        BatchStatus::Completed => {
            if let Some(results) = &batch.results {
                for (index, result) in results.iter().enumerate() {
                    writeln!(out).ok();
                    writeln!(out, "=== Resume {} ===", index + 1).ok();
                    out.push_str(&render_analysis(result));
                }
            }
        }
        BatchStatus::Failed => {
            if let Some(error) = &batch.error {
                writeln!(out, "Error: {}", error).ok();
            }
        }
        BatchStatus::Pending | BatchStatus::Processing => {
            writeln!(out, "Job is still running; check again later.").ok();
        }
    }

    out
}
