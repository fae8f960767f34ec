//! Quiz analytics reports with JSON persistence and markdown output.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::attempt::Attempt;
use crate::model::{Quiz, QuizStatus};
use crate::statistics::{question_analytics, recompute_stats, QuestionAnalytics, QuizStats};

/// A snapshot of a quiz's results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    pub quiz: QuizSummary,
    /// Stats folded from the completed attempts in this report.
    pub stats: QuizStats,
    /// Per-question breakdown, in quiz order.
    pub questions: Vec<QuestionAnalytics>,
    pub attempts: Vec<AttemptSummary>,
}

/// Summary of a quiz (without the question bodies).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizSummary {
    pub id: String,
    pub title: String,
    pub subject: String,
    pub status: QuizStatus,
    pub question_count: usize,
    pub total_marks: u32,
    pub passing_marks: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttemptSummary {
    pub attempt_id: Uuid,
    pub learner_id: String,
    pub score: u32,
    pub percentage: f64,
    pub passed: bool,
    pub pending_manual: usize,
    pub submitted_at: Option<DateTime<Utc>>,
}

impl QuizReport {
    /// Build a report from a quiz and the attempts recorded against it.
    ///
    /// Attempts for other quizzes and in-progress attempts are left out.
    pub fn build(quiz: &Quiz, attempts: &[Attempt]) -> Self {
        let relevant: Vec<Attempt> = attempts
            .iter()
            .filter(|a| a.quiz_id == quiz.id && a.is_completed())
            .cloned()
            .collect();

        QuizReport {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            quiz: QuizSummary {
                id: quiz.id.clone(),
                title: quiz.title.clone(),
                subject: quiz.subject.clone(),
                status: quiz.status,
                question_count: quiz.questions.len(),
                total_marks: quiz.total_marks(),
                passing_marks: quiz.passing_marks,
            },
            stats: recompute_stats(&relevant),
            questions: question_analytics(quiz, &relevant),
            attempts: relevant
                .iter()
                .map(|a| AttemptSummary {
                    attempt_id: a.id,
                    learner_id: a.learner_id.clone(),
                    score: a.score,
                    percentage: a.percentage,
                    passed: a.passed,
                    pending_manual: a.pending_manual().len(),
                    submitted_at: a.submitted_at,
                })
                .collect(),
        }
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: QuizReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }

    /// Format the report as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!("## {} ({})\n\n", self.quiz.title, self.quiz.subject));
        md.push_str(&format!(
            "**Summary:** {} attempts, {:.2}% average, {:.2}% pass rate\n\n",
            self.stats.attempts_count,
            self.stats.average_percentage,
            self.stats.pass_rate()
        ));

        if !self.questions.is_empty() {
            md.push_str("### Questions\n\n");
            md.push_str("| Question | Correct | Incorrect | Unanswered | Pending | Correct % |\n");
            md.push_str("|----------|---------|-----------|------------|---------|-----------|\n");
            for q in &self.questions {
                md.push_str(&format!(
                    "| {} | {} | {} | {} | {} | {:.1}% |\n",
                    q.question_id,
                    q.correct,
                    q.incorrect,
                    q.unanswered,
                    q.pending_manual,
                    q.correct_rate()
                ));
            }
            md.push('\n');
        }

        if !self.attempts.is_empty() {
            md.push_str("### Attempts\n\n");
            md.push_str("| Learner | Score | Percentage | Result |\n");
            md.push_str("|---------|-------|------------|--------|\n");
            for a in &self.attempts {
                let result = if a.pending_manual > 0 {
                    "pending"
                } else if a.passed {
                    "pass"
                } else {
                    "fail"
                };
                md.push_str(&format!(
                    "| {} | {}/{} | {:.2}% | {} |\n",
                    a.learner_id, a.score, self.quiz.total_marks, a.percentage, result
                ));
            }
        }

        md
    }
}
