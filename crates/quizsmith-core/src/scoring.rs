//! Answer scoring.
//!
//! Scoring is pure: the same quiz and answers always produce the same
//! result. Every question is all-or-nothing; essays are never auto-scored
//! and wait for [`apply_manual_grade`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::attempt::{Answers, Response};
use crate::error::ScoringError;
use crate::model::{AnswerKey, Question, QuestionType, Quiz};

/// How a single question was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Correct,
    Incorrect,
    Unanswered,
    /// Essay awaiting a grader.
    RequiresManualGrading,
    /// Essay with a grader-supplied score.
    ManuallyGraded,
}

/// Points awarded for one question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionScore {
    pub points_awarded: u32,
    pub max_points: u32,
    pub outcome: Outcome,
}

/// The scored form of an attempt's answers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredResult {
    /// Keyed by question id.
    pub per_question: BTreeMap<String, QuestionScore>,
    /// Sum of awarded points.
    pub score: u32,
    pub total_marks: u32,
    /// `score / total_marks * 100`, rounded to two decimals; 0 when there are no marks.
    ///
    /// Ungraded essays keep their points in `total_marks`, so an attempt with an
    /// essay pending stays below 100 until the grade is applied.
    pub percentage: f64,
    /// Essay ids still waiting for manual grading.
    pub pending_manual: Vec<String>,
}

impl ScoredResult {
    pub fn requires_manual_grading(&self) -> bool {
        !self.pending_manual.is_empty()
    }

    pub fn passed(&self, passing_marks: u32) -> bool {
        self.score >= passing_marks
    }

    fn from_scores(per_question: BTreeMap<String, QuestionScore>, total_marks: u32) -> Self {
        let score = per_question
            .values()
            .fold(0u32, |total, s| total.saturating_add(s.points_awarded));
        let pending_manual = per_question
            .iter()
            .filter(|(_, s)| s.outcome == Outcome::RequiresManualGrading)
            .map(|(id, _)| id.clone())
            .collect();

        ScoredResult {
            per_question,
            score,
            total_marks,
            percentage: percentage(score, total_marks),
            pending_manual,
        }
    }
}

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `score / total * 100`, rounded to two decimals, 0 when `total` is 0.
pub fn percentage(score: u32, total: u32) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round2(score as f64 / total as f64 * 100.0)
}

/// Trimmed, lowercased form used to compare free-text answers.
pub fn normalize_text(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Score a set of answers against a quiz.
///
/// Fails only when an answer references a question the quiz does not hold,
/// which indicates a caller bug rather than a learner mistake.
pub fn score_attempt(quiz: &Quiz, answers: &Answers) -> Result<ScoredResult, ScoringError> {
    if let Some(unknown) = answers.keys().find(|id| quiz.question(id).is_none()) {
        tracing::error!(quiz_id = %quiz.id, question_id = %unknown, "answer for unknown question");
        return Err(ScoringError::UnknownQuestion(unknown.clone()));
    }

    let per_question = quiz
        .questions
        .iter()
        .map(|q| (q.id.clone(), score_question(q, answers.get(&q.id))))
        .collect();

    Ok(ScoredResult::from_scores(per_question, quiz.total_marks()))
}

/// Score one question against an optional response.
pub fn score_question(question: &Question, response: Option<&Response>) -> QuestionScore {
    let max_points = question.points;
    let award = |outcome: Outcome| QuestionScore {
        points_awarded: if outcome == Outcome::Correct {
            max_points
        } else {
            0
        },
        max_points,
        outcome,
    };

    if question.question_type == QuestionType::Essay {
        return award(Outcome::RequiresManualGrading);
    }

    let Some(response) = response.filter(|r| !r.is_blank()) else {
        return award(Outcome::Unanswered);
    };

    let correct = match (&question.correct_answers, response) {
        (Some(AnswerKey::Choices(expected)), Response::Choices(selected))
            if question.question_type.is_choice() =>
        {
            selected == expected
        }
        (Some(AnswerKey::Accepted(accepted)), Response::Text(text))
            if question.question_type.is_text() =>
        {
            let given = normalize_text(text);
            accepted.iter().any(|a| normalize_text(a) == given)
        }
        _ => {
            tracing::debug!(
                question_id = %question.id,
                question_type = %question.question_type,
                "response kind does not match answer key"
            );
            false
        }
    };

    award(if correct {
        Outcome::Correct
    } else {
        Outcome::Incorrect
    })
}

/// Record a grader's score for an essay and recompute the totals.
pub fn apply_manual_grade(
    result: &ScoredResult,
    question_id: &str,
    points: u32,
) -> Result<ScoredResult, ScoringError> {
    let current = result
        .per_question
        .get(question_id)
        .ok_or_else(|| ScoringError::UnknownQuestion(question_id.to_string()))?;

    if !matches!(
        current.outcome,
        Outcome::RequiresManualGrading | Outcome::ManuallyGraded
    ) {
        return Err(ScoringError::NotManuallyGradable(question_id.to_string()));
    }
    if points > current.max_points {
        return Err(ScoringError::PointsExceedMaximum {
            question_id: question_id.to_string(),
            awarded: points,
            max: current.max_points,
        });
    }

    let mut per_question = result.per_question.clone();
    per_question.insert(
        question_id.to_string(),
        QuestionScore {
            points_awarded: points,
            max_points: current.max_points,
            outcome: Outcome::ManuallyGraded,
        },
    );

    Ok(ScoredResult::from_scores(per_question, result.total_marks))
}
