//! Structural validation for questions and quizzes.
//!
//! Validators never stop at the first problem: they return every violation
//! they find, in check order, so an authoring tool can show them together.

use std::collections::HashSet;

use crate::error::{QuizValidationError, ValidationError};
use crate::model::{AnswerKey, Question, QuestionType, Quiz, TRUE_FALSE_OPTIONS};

/// Validate a single question. An empty result means the question is valid.
///
/// Question type names are checked where they enter the system (see
/// [`QuestionType::from_str`](std::str::FromStr)), so a `Question` value always
/// carries a recognized type.
pub fn validate_question(question: &Question) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if question.text.trim().is_empty() {
        errors.push(ValidationError::BlankText);
    }

    let qtype = question.question_type;

    if qtype.is_choice() {
        check_options(question, &mut errors);
    }

    check_answer_key(question, &mut errors);

    if question.points == 0 {
        errors.push(ValidationError::ZeroPoints);
    }

    errors
}

fn check_options(question: &Question, errors: &mut Vec<ValidationError>) {
    let qtype = question.question_type;

    if qtype == QuestionType::TrueFalse {
        if question.options.len() != 2
            || question
                .options
                .iter()
                .zip(TRUE_FALSE_OPTIONS)
                .any(|(actual, expected)| actual != expected)
        {
            errors.push(ValidationError::TrueFalseOptions);
        }
        return;
    }

    if question.options.len() < 2 {
        errors.push(ValidationError::TooFewOptions {
            question_type: qtype,
            found: question.options.len(),
        });
    }

    for (index, option) in question.options.iter().enumerate() {
        if option.trim().is_empty() {
            errors.push(ValidationError::BlankOption { index });
        }
    }
}

fn check_answer_key(question: &Question, errors: &mut Vec<ValidationError>) {
    let qtype = question.question_type;

    // Essays are graded by hand; any stored key is ignored.
    if qtype == QuestionType::Essay {
        return;
    }

    let key = match &question.correct_answers {
        Some(key) if !key.is_empty() => key,
        _ => {
            errors.push(ValidationError::MissingCorrectAnswer);
            return;
        }
    };

    match key {
        AnswerKey::Choices(indices) if qtype.is_choice() => {
            let options = question.options.len();
            for &index in indices {
                if index >= options {
                    errors.push(ValidationError::CorrectIndexOutOfRange { index, options });
                }
            }
            if qtype.is_single_answer() && indices.len() != 1 {
                errors.push(ValidationError::WrongAnswerCount {
                    question_type: qtype,
                    found: indices.len(),
                });
            }
        }
        AnswerKey::Accepted(texts) if qtype.is_text() => {
            for (index, text) in texts.iter().enumerate() {
                if text.trim().is_empty() {
                    errors.push(ValidationError::BlankAcceptedAnswer { index });
                }
            }
        }
        _ => errors.push(ValidationError::AnswerKindMismatch {
            question_type: qtype,
        }),
    }
}

/// Returns `true` when [`validate_question`] finds nothing.
pub fn is_valid_question(question: &Question) -> bool {
    validate_question(question).is_empty()
}

/// Validate a quiz and every question it holds.
pub fn validate_quiz(quiz: &Quiz) -> Vec<QuizValidationError> {
    let mut errors = Vec::new();

    if quiz.title.trim().is_empty() {
        errors.push(QuizValidationError::BlankTitle);
    }

    if quiz.duration_minutes == 0 {
        errors.push(QuizValidationError::ZeroDuration);
    }

    let mut seen_ids = HashSet::new();
    for question in &quiz.questions {
        if !seen_ids.insert(question.id.as_str()) {
            errors.push(QuizValidationError::DuplicateQuestionId(
                question.id.clone(),
            ));
        }
        for error in validate_question(question) {
            errors.push(QuizValidationError::Question {
                question_id: question.id.clone(),
                error,
            });
        }
    }

    match quiz.checked_marks() {
        None => errors.push(QuizValidationError::MarksOverflow),
        Some(computed) => {
            if let Some(declared) = quiz.total_marks {
                if declared != computed {
                    errors.push(QuizValidationError::TotalMarksMismatch { declared, computed });
                }
            }
        }
    }

    let total = quiz.total_marks();
    if quiz.passing_marks > total {
        errors.push(QuizValidationError::PassingMarksExceedTotal {
            passing: quiz.passing_marks,
            total,
        });
    }

    if let (Some(start), Some(end)) = (quiz.schedule_start, quiz.schedule_end) {
        if start >= end {
            errors.push(QuizValidationError::InvalidSchedule { start, end });
        }
    }

    errors
}
