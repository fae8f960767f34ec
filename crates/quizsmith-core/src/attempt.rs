//! Learner attempts.
//!
//! An attempt starts `in-progress` when the quiz is available and becomes
//! immutable once submitted. Submission scores the answers and freezes the
//! result; later changes (manual essay grades) produce a new value.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{NotAvailable, ScoringError};
use crate::lifecycle::check_availability;
use crate::model::Quiz;
use crate::scoring::{self, QuestionScore, ScoredResult};

/// A learner's response to one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Response {
    /// Selected option indices, for choice questions.
    Choices(BTreeSet<usize>),
    /// Free text, for fill-blank, short-answer, and essay questions.
    Text(String),
}

impl Response {
    pub fn choice(index: usize) -> Self {
        Response::Choices(BTreeSet::from([index]))
    }

    pub fn text(text: impl Into<String>) -> Self {
        Response::Text(text.into())
    }

    /// An empty selection or whitespace-only text counts as unanswered.
    pub fn is_blank(&self) -> bool {
        match self {
            Response::Choices(selected) => selected.is_empty(),
            Response::Text(text) => text.trim().is_empty(),
        }
    }
}

/// Responses keyed by question id. Missing entries are unanswered.
pub type Answers = BTreeMap<String, Response>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AttemptStatus {
    InProgress,
    Completed,
}

impl fmt::Display for AttemptStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttemptStatus::InProgress => write!(f, "in-progress"),
            AttemptStatus::Completed => write!(f, "completed"),
        }
    }
}

/// One learner's submission against a quiz.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attempt {
    pub id: Uuid,
    pub quiz_id: String,
    pub learner_id: String,
    #[serde(default)]
    pub answers: Answers,
    #[serde(default)]
    pub per_question: BTreeMap<String, QuestionScore>,
    #[serde(default)]
    pub score: u32,
    #[serde(default)]
    pub total_marks: u32,
    #[serde(default)]
    pub percentage: f64,
    #[serde(default)]
    pub passed: bool,
    #[serde(default)]
    pub time_spent_minutes: u32,
    pub started_at: DateTime<Utc>,
    #[serde(default)]
    pub submitted_at: Option<DateTime<Utc>>,
    pub status: AttemptStatus,
}

/// Start an attempt if the quiz is open at `now`.
///
/// `previous_completed` is the number of attempts this learner has already
/// completed on the quiz; a second attempt needs `allow_retake`.
pub fn start_attempt(
    quiz: &Quiz,
    learner_id: &str,
    previous_completed: usize,
    now: DateTime<Utc>,
) -> Result<Attempt, NotAvailable> {
    check_availability(quiz, now)?;
    if previous_completed > 0 && !quiz.settings.allow_retake {
        return Err(NotAvailable::RetakeNotAllowed);
    }

    Ok(Attempt {
        id: Uuid::new_v4(),
        quiz_id: quiz.id.clone(),
        learner_id: learner_id.to_string(),
        answers: Answers::new(),
        per_question: BTreeMap::new(),
        score: 0,
        total_marks: quiz.total_marks(),
        percentage: 0.0,
        passed: false,
        time_spent_minutes: 0,
        started_at: now,
        submitted_at: None,
        status: AttemptStatus::InProgress,
    })
}

impl Attempt {
    pub fn is_completed(&self) -> bool {
        self.status == AttemptStatus::Completed
    }

    /// Essays in this attempt still waiting for a grader.
    pub fn pending_manual(&self) -> Vec<&str> {
        self.per_question
            .iter()
            .filter(|(_, s)| s.outcome == scoring::Outcome::RequiresManualGrading)
            .map(|(id, _)| id.as_str())
            .collect()
    }

    /// Score `answers` and return the completed attempt.
    pub fn submit(
        &self,
        quiz: &Quiz,
        answers: Answers,
        now: DateTime<Utc>,
    ) -> Result<Attempt, ScoringError> {
        if self.is_completed() {
            return Err(ScoringError::AttemptFinalized(self.id.to_string()));
        }
        if self.quiz_id != quiz.id {
            return Err(ScoringError::QuizMismatch {
                attempt_quiz: self.quiz_id.clone(),
                quiz: quiz.id.clone(),
            });
        }

        let result = scoring::score_attempt(quiz, &answers)?;
        let elapsed = (now - self.started_at).num_minutes().max(0);

        let mut completed = self.clone();
        completed.answers = answers;
        completed.time_spent_minutes = u32::try_from(elapsed).unwrap_or(u32::MAX);
        completed.submitted_at = Some(now);
        completed.status = AttemptStatus::Completed;
        completed.apply_result(result, quiz.passing_marks);
        Ok(completed)
    }

    /// Record a grader's essay score and return the updated attempt.
    pub fn grade_manually(
        &self,
        quiz: &Quiz,
        question_id: &str,
        points: u32,
    ) -> Result<Attempt, ScoringError> {
        let graded = scoring::apply_manual_grade(&self.result(), question_id, points)?;
        let mut next = self.clone();
        next.apply_result(graded, quiz.passing_marks);
        Ok(next)
    }

    /// The scored view of this attempt.
    pub fn result(&self) -> ScoredResult {
        ScoredResult {
            per_question: self.per_question.clone(),
            score: self.score,
            total_marks: self.total_marks,
            percentage: self.percentage,
            pending_manual: self
                .pending_manual()
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }

    fn apply_result(&mut self, result: ScoredResult, passing_marks: u32) {
        self.passed = result.passed(passing_marks);
        self.per_question = result.per_question;
        self.score = result.score;
        self.total_marks = result.total_marks;
        self.percentage = result.percentage;
    }
}
