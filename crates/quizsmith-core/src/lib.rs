//! Question model, bulk import, lifecycle, scoring, and analytics for quizzes.
//!
//! Validation, import, lifecycle transitions, scoring, and aggregation are
//! pure functions over value types. File loading and report persistence
//! live in `parser` and `report`.

pub mod attempt;
pub mod error;
pub mod import;
pub mod lifecycle;
pub mod model;
pub mod parser;
pub mod report;
pub mod scoring;
pub mod statistics;
pub mod validation;

pub use attempt::{start_attempt, Answers, Attempt, AttemptStatus, Response};
pub use import::{parse_bulk_questions, BulkImport, ImportDefaults, LineError};
pub use lifecycle::{can_accept_attempt, check_availability, transition_quiz};
pub use model::{AnswerKey, Difficulty, Question, QuestionType, Quiz, QuizSettings, QuizStatus};
pub use scoring::{apply_manual_grade, score_attempt, ScoredResult};
pub use statistics::{record_attempt, recompute_stats, QuizStats, StatsRecorder};
pub use validation::{validate_question, validate_quiz};
