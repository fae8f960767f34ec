//! Domain error types.
//!
//! Every failure the engine reports is a recoverable value. Validation and
//! import failures come back as lists so a caller can show everything at
//! once; lifecycle, availability and scoring failures are single values.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::{QuestionType, QuizStatus};

/// A structural problem with a single question.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The prompt is empty or whitespace.
    #[error("question text is blank")]
    BlankText,

    /// A choice question has fewer than two options.
    #[error("{question_type} question needs at least 2 options, found {found}")]
    TooFewOptions {
        question_type: QuestionType,
        found: usize,
    },

    /// An option of a choice question is empty or whitespace.
    #[error("option {index} is blank")]
    BlankOption { index: usize },

    /// A true-false question whose options are not exactly `["True", "False"]`.
    #[error("true-false options must be exactly [\"True\", \"False\"]")]
    TrueFalseOptions,

    /// No answer key, or an empty one.
    #[error("correct answer is missing")]
    MissingCorrectAnswer,

    /// The answer key is of the wrong kind for the question type.
    #[error("{question_type} question has an answer key of the wrong kind")]
    AnswerKindMismatch { question_type: QuestionType },

    /// A correct index points past the end of the options.
    #[error("correct answer index {index} is out of range for {options} options")]
    CorrectIndexOutOfRange { index: usize, options: usize },

    /// Single-answer types must have exactly one correct index.
    #[error("{question_type} question needs exactly 1 correct answer, found {found}")]
    WrongAnswerCount {
        question_type: QuestionType,
        found: usize,
    },

    /// An accepted answer of a text question is empty or whitespace.
    #[error("accepted answer {index} is blank")]
    BlankAcceptedAnswer { index: usize },

    /// Points must be positive.
    #[error("points must be a positive integer")]
    ZeroPoints,
}

/// A structural problem with a quiz as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuizValidationError {
    #[error("quiz title is blank")]
    BlankTitle,

    #[error("duration must be greater than 0 minutes")]
    ZeroDuration,

    #[error("duplicate question id: {0}")]
    DuplicateQuestionId(String),

    #[error("question {question_id}: {error}")]
    Question {
        question_id: String,
        error: ValidationError,
    },

    #[error("question points add up to more than {} marks", u32::MAX)]
    MarksOverflow,

    #[error("total marks is set to {declared} but questions add up to {computed}")]
    TotalMarksMismatch { declared: u32, computed: u32 },

    #[error("passing marks {passing} exceed total marks {total}")]
    PassingMarksExceedTotal { passing: u32, total: u32 },

    #[error("schedule start {start} is not before schedule end {end}")]
    InvalidSchedule {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

/// Why a draft could not be published.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PublishBlocker {
    #[error("quiz has no questions")]
    NoQuestions,

    #[error("question {question_id} is invalid: {}", join_errors(.errors))]
    InvalidQuestion {
        question_id: String,
        errors: Vec<ValidationError>,
    },

    #[error("quiz has zero total marks")]
    ZeroMarks,

    #[error("quiz is invalid: {}", join_errors(.0))]
    InvalidQuiz(Vec<QuizValidationError>),
}

/// Errors from lifecycle transitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifecycleError {
    /// The requested move is not an edge of the state machine.
    #[error("invalid transition from {from} to {to}")]
    InvalidTransition { from: QuizStatus, to: QuizStatus },

    /// The move is legal but the draft fails a publication precondition.
    #[error("cannot publish: {0}")]
    PublishRejected(PublishBlocker),
}

/// Why a quiz does not currently accept attempts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotAvailable {
    #[error("quiz is {0}, not published")]
    NotPublished(QuizStatus),

    #[error("quiz opens at {opens_at}")]
    NotYetOpen { opens_at: DateTime<Utc> },

    #[error("quiz closed at {closed_at}")]
    Closed { closed_at: DateTime<Utc> },

    #[error("quiz does not allow retakes")]
    RetakeNotAllowed,
}

/// Errors from editing a quiz's question list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuizError {
    /// Only drafts can be edited; published quizzes hold a frozen snapshot.
    #[error("quiz is {0}; only drafts can be edited")]
    NotEditable(QuizStatus),

    #[error("question not found: {0}")]
    QuestionNotFound(String),

    #[error("duplicate question id: {0}")]
    DuplicateQuestionId(String),
}

/// Errors from scoring and grading.
///
/// `UnknownQuestion` is a caller contract violation rather than a learner
/// mistake: answers must only reference questions of the quiz being scored.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoringError {
    #[error("answer references question {0} which is not part of the quiz")]
    UnknownQuestion(String),

    #[error("attempt {0} is already completed")]
    AttemptFinalized(String),

    #[error("attempt belongs to quiz {attempt_quiz}, not {quiz}")]
    QuizMismatch { attempt_quiz: String, quiz: String },

    #[error("question {0} is not awaiting manual grading")]
    NotManuallyGradable(String),

    #[error("{awarded} points exceed the maximum of {max} for question {question_id}")]
    PointsExceedMaximum {
        question_id: String,
        awarded: u32,
        max: u32,
    },
}

fn join_errors<E: std::fmt::Display>(errors: &[E]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
