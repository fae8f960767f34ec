//! Attempt aggregation and quiz analytics.
//!
//! Quiz stats are a running mean folded one completed attempt at a time.
//! [`recompute_stats`] folds a whole history and is the way to rebuild stats
//! after an attempt is regraded.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::attempt::Attempt;
use crate::model::Quiz;
use crate::scoring::{round2, Outcome};

/// Derived quiz statistics. Never edited by hand.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct QuizStats {
    pub attempts_count: u32,
    /// Running mean of attempt percentages, in `[0, 100]`.
    pub average_percentage: f64,
    /// Completed attempts that reached the passing marks.
    #[serde(default)]
    pub passed_count: u32,
}

impl QuizStats {
    /// Share of completed attempts that passed, as a percentage.
    pub fn pass_rate(&self) -> f64 {
        if self.attempts_count == 0 {
            return 0.0;
        }
        round2(self.passed_count as f64 / self.attempts_count as f64 * 100.0)
    }

    pub fn average_rounded(&self) -> f64 {
        round2(self.average_percentage)
    }
}

/// Fold one attempt into the stats.
///
/// In-progress attempts leave the stats unchanged.
pub fn record_attempt(stats: &QuizStats, attempt: &Attempt) -> QuizStats {
    if !attempt.is_completed() {
        return *stats;
    }

    let count = stats.attempts_count + 1;
    let percentage = attempt.percentage.clamp(0.0, 100.0);
    let average_percentage = if stats.attempts_count == 0 {
        percentage
    } else {
        (stats.average_percentage * stats.attempts_count as f64 + percentage) / count as f64
    };

    QuizStats {
        attempts_count: count,
        average_percentage: average_percentage.clamp(0.0, 100.0),
        passed_count: stats.passed_count + u32::from(attempt.passed),
    }
}

/// Rebuild stats from a full attempt history.
pub fn recompute_stats(attempts: &[Attempt]) -> QuizStats {
    attempts
        .iter()
        .fold(QuizStats::default(), |stats, a| record_attempt(&stats, a))
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("attempt {0} has already been recorded")]
    AlreadyRecorded(Uuid),

    #[error("attempt {0} is not completed")]
    NotCompleted(Uuid),
}

/// Serializes stat folds per quiz and folds each attempt exactly once.
///
/// Scoring can run anywhere in parallel; the fold into a quiz's running mean
/// must not interleave, so every update goes through one lock.
#[derive(Debug, Default)]
pub struct StatsRecorder {
    inner: Mutex<RecorderState>,
}

#[derive(Debug, Default)]
struct RecorderState {
    stats: HashMap<String, QuizStats>,
    recorded: HashSet<Uuid>,
}

impl StatsRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the recorder with stats already persisted for a quiz.
    pub fn with_quiz(self, quiz: &Quiz) -> Self {
        self.lock().stats.insert(quiz.id.clone(), quiz.stats);
        self
    }

    /// Fold a completed attempt into its quiz's stats and return the new stats.
    pub fn record(&self, attempt: &Attempt) -> Result<QuizStats, RecordError> {
        if !attempt.is_completed() {
            return Err(RecordError::NotCompleted(attempt.id));
        }

        let mut state = self.lock();
        if !state.recorded.insert(attempt.id) {
            return Err(RecordError::AlreadyRecorded(attempt.id));
        }

        let entry = state.stats.entry(attempt.quiz_id.clone()).or_default();
        *entry = record_attempt(entry, attempt);
        tracing::debug!(
            quiz_id = %attempt.quiz_id,
            attempts = entry.attempts_count,
            average = entry.average_percentage,
            "attempt recorded"
        );
        Ok(*entry)
    }

    pub fn stats(&self, quiz_id: &str) -> QuizStats {
        self.lock().stats.get(quiz_id).copied().unwrap_or_default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, RecorderState> {
        // Folds never panic mid-update, so a poisoned state is still consistent.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Per-question results across completed attempts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuestionAnalytics {
    pub question_id: String,
    pub correct: u32,
    pub incorrect: u32,
    pub unanswered: u32,
    pub pending_manual: u32,
    /// Average share of the question's points awarded, as a percentage.
    pub average_points_percentage: f64,
}

impl QuestionAnalytics {
    pub fn responses(&self) -> u32 {
        self.correct + self.incorrect + self.unanswered + self.pending_manual
    }

    /// Correct answers over auto-graded responses; unanswered counts against the rate.
    pub fn correct_rate(&self) -> f64 {
        let graded = self.correct + self.incorrect + self.unanswered;
        if graded == 0 {
            return 0.0;
        }
        round2(self.correct as f64 / graded as f64 * 100.0)
    }
}

/// Break completed attempts down by question, in quiz order.
pub fn question_analytics(quiz: &Quiz, attempts: &[Attempt]) -> Vec<QuestionAnalytics> {
    let completed: Vec<&Attempt> = attempts
        .iter()
        .filter(|a| a.is_completed() && a.quiz_id == quiz.id)
        .collect();

    let mut by_id: BTreeMap<&str, (QuestionAnalytics, f64)> = quiz
        .questions
        .iter()
        .map(|q| {
            (
                q.id.as_str(),
                (
                    QuestionAnalytics {
                        question_id: q.id.clone(),
                        ..Default::default()
                    },
                    0.0,
                ),
            )
        })
        .collect();

    for attempt in &completed {
        for (id, score) in &attempt.per_question {
            let Some((entry, points_share)) = by_id.get_mut(id.as_str()) else {
                continue;
            };
            match score.outcome {
                Outcome::Correct => entry.correct += 1,
                Outcome::Incorrect => entry.incorrect += 1,
                Outcome::Unanswered => entry.unanswered += 1,
                Outcome::RequiresManualGrading => entry.pending_manual += 1,
                // Graded essays count as correct when they earned any points.
                Outcome::ManuallyGraded if score.points_awarded > 0 => entry.correct += 1,
                Outcome::ManuallyGraded => entry.incorrect += 1,
            }
            if score.max_points > 0 {
                *points_share += score.points_awarded as f64 / score.max_points as f64;
            }
        }
    }

    quiz.questions
        .iter()
        .filter_map(|q| by_id.remove(q.id.as_str()))
        .map(|(mut analytics, points_share)| {
            let n = analytics.responses();
            if n > 0 {
                analytics.average_points_percentage = round2(points_share / n as f64 * 100.0);
            }
            analytics
        })
        .collect()
}
