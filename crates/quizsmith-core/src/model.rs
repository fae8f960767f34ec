//! Core data model types for quizsmith.
//!
//! Questions, quizzes and their settings. Quizzes own their questions by
//! value, so a published quiz is a frozen snapshot that later edits to a
//! question record cannot reach.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::error::QuizError;
use crate::statistics::QuizStats;

/// The kinds of question the engine can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionType {
    SingleChoice,
    MultiChoice,
    TrueFalse,
    FillBlank,
    ShortAnswer,
    Essay,
}

impl QuestionType {
    /// Types answered by selecting option indices.
    pub fn is_choice(self) -> bool {
        matches!(
            self,
            QuestionType::SingleChoice | QuestionType::MultiChoice | QuestionType::TrueFalse
        )
    }

    /// Types answered with free text and scored against accepted answers.
    pub fn is_text(self) -> bool {
        matches!(self, QuestionType::FillBlank | QuestionType::ShortAnswer)
    }

    /// Types whose answer key holds exactly one index.
    pub fn is_single_answer(self) -> bool {
        matches!(self, QuestionType::SingleChoice | QuestionType::TrueFalse)
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QuestionType::SingleChoice => "single-choice",
            QuestionType::MultiChoice => "multi-choice",
            QuestionType::TrueFalse => "true-false",
            QuestionType::FillBlank => "fill-blank",
            QuestionType::ShortAnswer => "short-answer",
            QuestionType::Essay => "essay",
        };
        f.write_str(name)
    }
}

/// Returned when a question type name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown question type: {0}")]
pub struct ParseQuestionTypeError(pub String);

impl FromStr for QuestionType {
    type Err = ParseQuestionTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "single-choice" | "single" => Ok(QuestionType::SingleChoice),
            "multi-choice" | "multiple-choice" | "multi" => Ok(QuestionType::MultiChoice),
            "true-false" | "boolean" => Ok(QuestionType::TrueFalse),
            "fill-blank" | "fill-in-the-blank" => Ok(QuestionType::FillBlank),
            "short-answer" => Ok(QuestionType::ShortAnswer),
            "essay" => Ok(QuestionType::Essay),
            _ => Err(ParseQuestionTypeError(s.to_string())),
        }
    }
}

/// Descriptive difficulty label; not used in scoring.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "easy"),
            Difficulty::Medium => write!(f, "medium"),
            Difficulty::Hard => write!(f, "hard"),
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty: {other}")),
        }
    }
}

/// What counts as a correct answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerKey {
    /// Zero-based option indices, for choice types.
    Choices(BTreeSet<usize>),
    /// Accepted texts, for fill-blank and short-answer. Compared trimmed and
    /// case-insensitively.
    Accepted(Vec<String>),
}

impl AnswerKey {
    pub fn is_empty(&self) -> bool {
        match self {
            AnswerKey::Choices(set) => set.is_empty(),
            AnswerKey::Accepted(texts) => texts.is_empty(),
        }
    }
}

/// The options every true-false question carries.
pub const TRUE_FALSE_OPTIONS: [&str; 2] = ["True", "False"];

/// A single gradable prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Opaque unique identifier.
    pub id: String,
    /// The prompt shown to the learner.
    pub text: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    /// Ordered options; only meaningful for choice types.
    #[serde(default)]
    pub options: Vec<String>,
    /// Absent for essays.
    #[serde(default)]
    pub correct_answers: Option<AnswerKey>,
    /// Maximum score contribution.
    pub points: u32,
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub difficulty: Difficulty,
    /// Bumped by [`Question::revise`].
    #[serde(default = "default_version")]
    pub version: u32,
}

fn default_version() -> u32 {
    1
}

impl Question {
    fn base(question_type: QuestionType, text: &str, points: u32) -> Self {
        Question {
            id: Uuid::new_v4().to_string(),
            text: text.to_string(),
            question_type,
            options: Vec::new(),
            correct_answers: None,
            points,
            explanation: String::new(),
            category: None,
            difficulty: Difficulty::default(),
            version: 1,
        }
    }

    /// A single- or multi-choice question.
    pub fn choice<I, S>(
        question_type: QuestionType,
        text: &str,
        options: I,
        correct: &[usize],
        points: u32,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut q = Self::base(question_type, text, points);
        q.options = options.into_iter().map(Into::into).collect();
        q.correct_answers = Some(AnswerKey::Choices(correct.iter().copied().collect()));
        q
    }

    pub fn true_false(text: &str, answer: bool, points: u32) -> Self {
        let index = if answer { 0 } else { 1 };
        Self::choice(
            QuestionType::TrueFalse,
            text,
            TRUE_FALSE_OPTIONS,
            &[index],
            points,
        )
    }

    /// A fill-blank or short-answer question.
    pub fn text_answer<I, S>(question_type: QuestionType, text: &str, accepted: I, points: u32) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut q = Self::base(question_type, text, points);
        q.correct_answers = Some(AnswerKey::Accepted(
            accepted.into_iter().map(Into::into).collect(),
        ));
        q
    }

    pub fn essay(text: &str, points: u32) -> Self {
        Self::base(QuestionType::Essay, text, points)
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = explanation.into();
        self
    }

    /// Start a new version of this question for use in a new draft.
    ///
    /// Quizzes that already hold the previous version keep it unchanged.
    pub fn revise(&self) -> Question {
        let mut next = self.clone();
        next.version = self.version + 1;
        next
    }
}

/// Lifecycle state of a quiz.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuizStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

impl fmt::Display for QuizStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuizStatus::Draft => write!(f, "draft"),
            QuizStatus::Published => write!(f, "published"),
            QuizStatus::Archived => write!(f, "archived"),
        }
    }
}

impl FromStr for QuizStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "draft" => Ok(QuizStatus::Draft),
            "published" | "publish" => Ok(QuizStatus::Published),
            "archived" | "archive" => Ok(QuizStatus::Archived),
            other => Err(format!("unknown quiz status: {other}")),
        }
    }
}

/// Presentation and retake settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizSettings {
    #[serde(default)]
    pub randomize_questions: bool,
    #[serde(default = "default_true")]
    pub show_results_immediately: bool,
    #[serde(default)]
    pub allow_retake: bool,
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self {
            randomize_questions: false,
            show_results_immediately: true,
            allow_retake: false,
        }
    }
}

fn default_true() -> bool {
    true
}

/// A named, timed collection of questions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quiz {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Course or subject label supplied by the caller.
    #[serde(default)]
    pub subject: String,
    pub duration_minutes: u32,
    /// Explicit total; `None` means the sum of question points.
    #[serde(default)]
    pub total_marks: Option<u32>,
    #[serde(default)]
    pub passing_marks: u32,
    #[serde(default)]
    pub questions: Vec<Question>,
    #[serde(default)]
    pub status: QuizStatus,
    #[serde(default)]
    pub schedule_start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub schedule_end: Option<DateTime<Utc>>,
    #[serde(default)]
    pub settings: QuizSettings,
    /// Maintained by the aggregator only.
    #[serde(default)]
    pub stats: QuizStats,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archived_at: Option<DateTime<Utc>>,
}

impl Quiz {
    /// An empty draft with a generated id. `created_at` is left for the caller to stamp.
    pub fn new_draft(title: &str, subject: &str, duration_minutes: u32) -> Self {
        Quiz {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            description: String::new(),
            subject: subject.to_string(),
            duration_minutes,
            total_marks: None,
            passing_marks: 0,
            questions: Vec::new(),
            status: QuizStatus::Draft,
            schedule_start: None,
            schedule_end: None,
            settings: QuizSettings::default(),
            stats: QuizStats::default(),
            created_at: None,
            published_at: None,
            archived_at: None,
        }
    }

    /// Sum of question points, or `None` when it does not fit in a `u32`.
    pub fn checked_marks(&self) -> Option<u32> {
        self.questions
            .iter()
            .try_fold(0u32, |total, q| total.checked_add(q.points))
    }

    /// Sum of question points, saturating at `u32::MAX`.
    pub fn computed_marks(&self) -> u32 {
        self.checked_marks().unwrap_or(u32::MAX)
    }

    /// Explicit total if set, otherwise the sum of question points.
    pub fn total_marks(&self) -> u32 {
        self.total_marks.unwrap_or_else(|| self.computed_marks())
    }

    pub fn question(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    pub fn is_editable(&self) -> bool {
        self.status == QuizStatus::Draft
    }

    fn ensure_editable(&self) -> Result<(), QuizError> {
        if self.is_editable() {
            Ok(())
        } else {
            Err(QuizError::NotEditable(self.status))
        }
    }

    pub fn add_question(&mut self, question: Question) -> Result<(), QuizError> {
        self.ensure_editable()?;
        if self.question(&question.id).is_some() {
            return Err(QuizError::DuplicateQuestionId(question.id));
        }
        self.questions.push(question);
        Ok(())
    }

    /// Swap in a new version of a question with the same id.
    pub fn replace_question(&mut self, question: Question) -> Result<(), QuizError> {
        self.ensure_editable()?;
        let slot = self
            .questions
            .iter_mut()
            .find(|q| q.id == question.id)
            .ok_or_else(|| QuizError::QuestionNotFound(question.id.clone()))?;
        *slot = question;
        Ok(())
    }

    pub fn remove_question(&mut self, id: &str) -> Result<Question, QuizError> {
        self.ensure_editable()?;
        let pos = self
            .questions
            .iter()
            .position(|q| q.id == id)
            .ok_or_else(|| QuizError::QuestionNotFound(id.to_string()))?;
        Ok(self.questions.remove(pos))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_type_display_and_parse() {
        assert_eq!(QuestionType::SingleChoice.to_string(), "single-choice");
        assert_eq!(QuestionType::FillBlank.to_string(), "fill-blank");
        assert_eq!(
            "multi_choice".parse::<QuestionType>().unwrap(),
            QuestionType::MultiChoice
        );
        assert_eq!(
            "True-False".parse::<QuestionType>().unwrap(),
            QuestionType::TrueFalse
        );
        assert!("matching".parse::<QuestionType>().is_err());
    }

    #[test]
    fn question_type_rejects_unknown_in_serde() {
        let json = r#"{"id":"q","text":"t","type":"matching","points":1}"#;
        assert!(serde_json::from_str::<Question>(json).is_err());
    }

    #[test]
    fn total_marks_prefers_explicit_value() {
        let mut quiz = Quiz::new_draft("Quiz", "math", 10);
        quiz.add_question(Question::essay("Explain", 4)).unwrap();
        quiz.add_question(Question::true_false("Sky is blue", true, 1))
            .unwrap();
        assert_eq!(quiz.total_marks(), 5);
        quiz.total_marks = Some(7);
        assert_eq!(quiz.total_marks(), 7);
        assert_eq!(quiz.computed_marks(), 5);
    }

    #[test]
    fn published_quiz_rejects_edits() {
        let mut quiz = Quiz::new_draft("Quiz", "math", 10);
        let q = Question::essay("Explain", 4).with_id("q1");
        quiz.add_question(q.clone()).unwrap();
        quiz.status = QuizStatus::Published;

        let err = quiz.replace_question(q.revise()).unwrap_err();
        assert_eq!(err, QuizError::NotEditable(QuizStatus::Published));
        assert_eq!(quiz.questions[0].version, 1);
    }

    #[test]
    fn revise_bumps_version_and_keeps_id() {
        let q = Question::essay("Explain", 4).with_id("q1");
        let next = q.revise();
        assert_eq!(next.id, "q1");
        assert_eq!(next.version, 2);
    }

    #[test]
    fn add_question_rejects_duplicate_id() {
        let mut quiz = Quiz::new_draft("Quiz", "math", 10);
        quiz.add_question(Question::essay("A", 1).with_id("q1"))
            .unwrap();
        let err = quiz
            .add_question(Question::essay("B", 1).with_id("q1"))
            .unwrap_err();
        assert_eq!(err, QuizError::DuplicateQuestionId("q1".into()));
    }

    #[test]
    fn quiz_serde_roundtrip() {
        let mut quiz = Quiz::new_draft("Capitals", "geography", 15);
        quiz.add_question(
            Question::choice(
                QuestionType::SingleChoice,
                "Capital of France?",
                ["Berlin", "Paris"],
                &[1],
                2,
            )
            .with_id("q1"),
        )
        .unwrap();
        let json = serde_json::to_string(&quiz).unwrap();
        assert!(json.contains("\"type\":\"single-choice\""));
        let parsed: Quiz = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, quiz);
    }

    #[test]
    fn total_marks_saturates_instead_of_overflowing() {
        let mut quiz = Quiz::new_draft("Quiz", "math", 10);
        quiz.add_question(Question::essay("Long", u32::MAX).with_id("long"))
            .unwrap();
        quiz.add_question(Question::essay("Short", 1).with_id("short"))
            .unwrap();

        assert_eq!(quiz.checked_marks(), None);
        assert_eq!(quiz.total_marks(), u32::MAX);
    }

    #[test]
    fn new_draft_is_empty_and_unstamped() {
        let quiz = Quiz::new_draft("Quiz", "math", 10);
        assert_eq!(quiz.status, QuizStatus::Draft);
        assert!(quiz.questions.is_empty());
        assert_eq!(quiz.created_at, None);
        assert_eq!(quiz.published_at, None);
    }
}
