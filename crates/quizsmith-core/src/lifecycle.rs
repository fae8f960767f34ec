//! Quiz lifecycle state machine and availability window.
//!
//! ```text
//! draft ──publish──▶ published ──archive──▶ archived
//! ```
//!
//! Publication is one-directional and `archived` is terminal. Transitions
//! return a new `Quiz`; the input is never modified.

use chrono::{DateTime, Utc};

use crate::error::{LifecycleError, NotAvailable, PublishBlocker};
use crate::model::{Quiz, QuizStatus};
use crate::validation::{validate_question, validate_quiz};

/// Returns `true` if `from → to` is an edge of the state machine.
pub fn is_allowed(from: QuizStatus, to: QuizStatus) -> bool {
    matches!(
        (from, to),
        (QuizStatus::Draft, QuizStatus::Published) | (QuizStatus::Published, QuizStatus::Archived)
    )
}

/// Move a quiz to `target`, returning the updated copy.
pub fn transition_quiz(
    quiz: &Quiz,
    target: QuizStatus,
    now: DateTime<Utc>,
) -> Result<Quiz, LifecycleError> {
    if !is_allowed(quiz.status, target) {
        return Err(LifecycleError::InvalidTransition {
            from: quiz.status,
            to: target,
        });
    }

    if target == QuizStatus::Published {
        check_publishable(quiz).map_err(LifecycleError::PublishRejected)?;
    }

    let mut next = quiz.clone();
    next.status = target;
    match target {
        QuizStatus::Published => next.published_at = Some(now),
        QuizStatus::Archived => next.archived_at = Some(now),
        QuizStatus::Draft => {}
    }

    tracing::info!(quiz_id = %quiz.id, from = %quiz.status, to = %target, "quiz transitioned");
    Ok(next)
}

/// Check the publication preconditions, reporting the first that fails.
pub fn check_publishable(quiz: &Quiz) -> Result<(), PublishBlocker> {
    if quiz.questions.is_empty() {
        return Err(PublishBlocker::NoQuestions);
    }

    for question in &quiz.questions {
        let errors = validate_question(question);
        if !errors.is_empty() {
            return Err(PublishBlocker::InvalidQuestion {
                question_id: question.id.clone(),
                errors,
            });
        }
    }

    if quiz.total_marks() == 0 {
        return Err(PublishBlocker::ZeroMarks);
    }

    let quiz_errors = validate_quiz(quiz);
    if !quiz_errors.is_empty() {
        return Err(PublishBlocker::InvalidQuiz(quiz_errors));
    }

    Ok(())
}

/// Check whether the quiz accepts new attempts at `now`.
///
/// The schedule window is inclusive at both ends; a missing bound is open.
pub fn check_availability(quiz: &Quiz, now: DateTime<Utc>) -> Result<(), NotAvailable> {
    if quiz.status != QuizStatus::Published {
        return Err(NotAvailable::NotPublished(quiz.status));
    }
    if let Some(opens_at) = quiz.schedule_start {
        if now < opens_at {
            return Err(NotAvailable::NotYetOpen { opens_at });
        }
    }
    if let Some(closed_at) = quiz.schedule_end {
        if now > closed_at {
            return Err(NotAvailable::Closed { closed_at });
        }
    }
    Ok(())
}

pub fn can_accept_attempt(quiz: &Quiz, now: DateTime<Utc>) -> bool {
    check_availability(quiz, now).is_ok()
}
