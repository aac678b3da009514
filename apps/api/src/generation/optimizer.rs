//! Optimization loop: generate, score, and revise until the candidate clears the
//! target ATS score or the iteration cap is hit.
//!
//! `iterations` counts scored candidates, so it is always within `1..=max_iterations`.
//! The last candidate is returned even when it never reaches the target.

use tracing::info;

use crate::errors::AppError;
use crate::generation::writer::ResumeWriter;
use crate::jobs::extractor::JobData;
use crate::models::documents::OptimizationStep;
use crate::models::profile::Profile;

#[derive(Debug, Clone, Copy)]
pub struct OptimizationPolicy {
    pub target_score: i32,
    pub max_iterations: u32,
}

#[derive(Debug, Clone)]
pub struct OptimizationOutcome {
    pub latex: String,
    pub ats_score: i32,
    pub iterations: u32,
    /// Keywords the final candidate matched.
    pub keywords: Vec<String>,
    /// One step per revision, in order.
    pub history: Vec<OptimizationStep>,
}

pub async fn optimize_resume(
    writer: &dyn ResumeWriter,
    profile: &Profile,
    job: &JobData,
    policy: OptimizationPolicy,
) -> Result<OptimizationOutcome, AppError> {
    let max_iterations = policy.max_iterations.max(1);

    let mut candidate = writer.generate(profile, job).await?;
    let mut history = Vec::new();
    let mut iterations = 0u32;

    loop {
        let report = writer.score(&candidate, job).await?;
        iterations += 1;

        info!(
            "Iteration {}/{}: ATS score {} (target {})",
            iterations, max_iterations, report.ats_score, policy.target_score
        );

        if report.ats_score >= policy.target_score || iterations >= max_iterations {
            return Ok(OptimizationOutcome {
                latex: candidate,
                ats_score: report.ats_score,
                iterations,
                keywords: report.keyword_matches,
                history,
            });
        }

        history.push(OptimizationStep {
            iteration: iterations,
            score: report.ats_score,
            missing_keywords: report.missing_keywords.clone(),
            suggestions: report.suggestions.clone(),
        });

        candidate = writer.revise(&candidate, &report, iterations).await?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::writer::AtsReport;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Writer that replays a fixed score sequence and numbers its drafts.
    struct ScriptedWriter {
        scores: Mutex<VecDeque<i32>>,
        fail_on_revise: bool,
    }

    impl ScriptedWriter {
        fn new(scores: &[i32]) -> Self {
            Self {
                scores: Mutex::new(scores.iter().copied().collect()),
                fail_on_revise: false,
            }
        }
    }

    #[async_trait]
    impl ResumeWriter for ScriptedWriter {
        async fn generate(&self, _profile: &Profile, _job: &JobData) -> Result<String, AppError> {
            Ok("draft-0".to_string())
        }

        async fn score(&self, resume: &str, _job: &JobData) -> Result<AtsReport, AppError> {
            let score = self.scores.lock().unwrap().pop_front().expect("score script exhausted");
            Ok(AtsReport {
                ats_score: score,
                keyword_matches: vec![format!("matched-by-{resume}")],
                missing_keywords: vec!["Kafka".to_string()],
                suggestions: vec![format!("improve {resume}")],
            })
        }

        async fn revise(
            &self,
            _resume: &str,
            _report: &AtsReport,
            iteration: u32,
        ) -> Result<String, AppError> {
            if self.fail_on_revise {
                return Err(AppError::Llm("upstream timeout".to_string()));
            }
            Ok(format!("draft-{iteration}"))
        }
    }

    fn policy() -> OptimizationPolicy {
        OptimizationPolicy {
            target_score: 85,
            max_iterations: 5,
        }
    }

    fn inputs() -> (Profile, JobData) {
        (Profile::fixture("Ada", &["Rust"]), JobData::default())
    }

    #[tokio::test]
    async fn test_first_pass_at_target_stops_after_one_iteration() {
        let (profile, job) = inputs();
        let writer = ScriptedWriter::new(&[91]);

        let outcome = optimize_resume(&writer, &profile, &job, policy()).await.unwrap();

        assert_eq!(outcome.iterations, 1);
        assert_eq!(outcome.ats_score, 91);
        assert_eq!(outcome.latex, "draft-0");
        assert!(outcome.history.is_empty());
        assert_eq!(outcome.keywords, vec!["matched-by-draft-0"]);
    }

    #[tokio::test]
    async fn test_never_reaching_target_returns_last_candidate() {
        let (profile, job) = inputs();
        let writer = ScriptedWriter::new(&[40, 55, 60, 70, 80]);

        let outcome = optimize_resume(&writer, &profile, &job, policy()).await.unwrap();

        assert_eq!(outcome.iterations, 5);
        assert_eq!(outcome.ats_score, 80);
        assert_eq!(outcome.latex, "draft-4");
        assert_eq!(outcome.history.len(), 4);
        assert_eq!(
            outcome.history.iter().map(|s| s.score).collect::<Vec<_>>(),
            vec![40, 55, 60, 70]
        );
        assert_eq!(outcome.history[0].iteration, 1);
        assert_eq!(outcome.history[0].suggestions, vec!["improve draft-0"]);
    }

    #[tokio::test]
    async fn test_stops_as_soon_as_target_reached() {
        let (profile, job) = inputs();
        let writer = ScriptedWriter::new(&[70, 85]);

        let outcome = optimize_resume(&writer, &profile, &job, policy()).await.unwrap();

        assert_eq!(outcome.iterations, 2);
        assert_eq!(outcome.ats_score, 85);
        assert_eq!(outcome.latex, "draft-1");
        assert_eq!(outcome.history.len(), 1);
        assert_eq!(outcome.history[0].missing_keywords, vec!["Kafka"]);
    }

    #[tokio::test]
    async fn test_revision_error_propagates() {
        let (profile, job) = inputs();
        let mut writer = ScriptedWriter::new(&[30]);
        writer.fail_on_revise = true;

        let result = optimize_resume(&writer, &profile, &job, policy()).await;

        assert!(matches!(result, Err(AppError::Llm(msg)) if msg.contains("timeout")));
    }

    #[tokio::test]
    async fn test_zero_cap_still_scores_once() {
        let (profile, job) = inputs();
        let writer = ScriptedWriter::new(&[10]);
        let policy = OptimizationPolicy {
            target_score: 85,
            max_iterations: 0,
        };

        let outcome = optimize_resume(&writer, &profile, &job, policy).await.unwrap();

        assert_eq!(outcome.iterations, 1);
        assert_eq!(outcome.latex, "draft-0");
    }
}
