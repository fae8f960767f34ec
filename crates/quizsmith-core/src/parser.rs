//! Quiz, answer-sheet, and attempt file loading.
//!
//! Quizzes are authored as TOML (a `[quiz]` header plus `[[questions]]`) or
//! stored as JSON in their serde form. Answer sheets may be TOML or JSON.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::attempt::{Answers, Attempt};
use crate::lifecycle::check_publishable;
use crate::model::{
    AnswerKey, Difficulty, Question, QuestionType, Quiz, QuizSettings, QuizStatus,
    TRUE_FALSE_OPTIONS,
};
use crate::statistics::QuizStats;

/// Intermediate TOML structure for quiz files.
#[derive(Debug, Deserialize)]
struct TomlQuizFile {
    quiz: TomlQuizHeader,
    #[serde(default)]
    questions: Vec<TomlQuestion>,
}

#[derive(Debug, Deserialize)]
struct TomlQuizHeader {
    id: String,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    subject: String,
    #[serde(default = "default_duration")]
    duration_minutes: u32,
    #[serde(default)]
    total_marks: Option<u32>,
    #[serde(default)]
    passing_marks: u32,
    #[serde(default = "default_status")]
    status: String,
    #[serde(default)]
    schedule_start: Option<String>,
    #[serde(default)]
    schedule_end: Option<String>,
    #[serde(default)]
    settings: QuizSettings,
}

fn default_duration() -> u32 {
    30
}

fn default_status() -> String {
    "draft".to_string()
}

#[derive(Debug, Deserialize)]
struct TomlQuestion {
    id: String,
    text: String,
    #[serde(rename = "type", default = "default_question_type")]
    question_type: String,
    #[serde(default)]
    options: Vec<String>,
    /// Zero-based option indices, for choice types.
    #[serde(default)]
    correct: Vec<usize>,
    /// Accepted answers, for text types.
    #[serde(default)]
    accepted: Vec<String>,
    #[serde(default = "default_points")]
    points: u32,
    #[serde(default)]
    explanation: String,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    difficulty: Option<String>,
}

fn default_question_type() -> String {
    "single-choice".to_string()
}

fn default_points() -> u32 {
    1
}

/// Load a quiz from a `.toml` or `.json` file.
pub fn parse_quiz(path: &Path) -> Result<Quiz> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read quiz file: {}", path.display()))?;

    if path.extension().is_some_and(|ext| ext == "json") {
        let quiz: Quiz = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse quiz JSON: {}", path.display()))?;
        ensure_live_quiz_publishable(quiz, path)
    } else {
        parse_quiz_str(&content, path)
    }
}

/// Published and archived quizzes must still satisfy the publication checks.
fn ensure_live_quiz_publishable(quiz: Quiz, source_path: &Path) -> Result<Quiz> {
    if quiz.status != QuizStatus::Draft {
        check_publishable(&quiz).with_context(|| {
            format!(
                "{} quiz {} in {} fails publication checks",
                quiz.status,
                quiz.id,
                source_path.display()
            )
        })?;
    }
    Ok(quiz)
}

/// Parse a TOML quiz definition (useful for testing).
pub fn parse_quiz_str(content: &str, source_path: &Path) -> Result<Quiz> {
    let parsed: TomlQuizFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let header = parsed.quiz;
    let status: QuizStatus = header
        .status
        .parse()
        .map_err(|e: String| anyhow::anyhow!("{}", e))?;

    let questions = parsed
        .questions
        .into_iter()
        .map(convert_question)
        .collect::<Result<Vec<_>>>()?;

    let quiz = Quiz {
        id: header.id,
        title: header.title,
        description: header.description,
        subject: header.subject,
        duration_minutes: header.duration_minutes,
        total_marks: header.total_marks,
        passing_marks: header.passing_marks,
        questions,
        status,
        schedule_start: parse_instant(header.schedule_start.as_deref(), "schedule_start")?,
        schedule_end: parse_instant(header.schedule_end.as_deref(), "schedule_end")?,
        settings: header.settings,
        stats: QuizStats::default(),
        created_at: None,
        published_at: None,
        archived_at: None,
    };

    ensure_live_quiz_publishable(quiz, source_path)
}

fn convert_question(q: TomlQuestion) -> Result<Question> {
    let question_type: QuestionType = q
        .question_type
        .parse()
        .with_context(|| format!("question {}", q.id))?;

    let difficulty = q
        .difficulty
        .map(|d| d.parse::<Difficulty>().map_err(|e| anyhow::anyhow!("{}", e)))
        .transpose()?
        .unwrap_or_default();

    let options = if question_type == QuestionType::TrueFalse && q.options.is_empty() {
        TRUE_FALSE_OPTIONS.iter().map(|s| s.to_string()).collect()
    } else {
        q.options
    };

    let correct_answers = if question_type.is_choice() && !q.correct.is_empty() {
        Some(AnswerKey::Choices(q.correct.into_iter().collect()))
    } else if question_type.is_text() && !q.accepted.is_empty() {
        Some(AnswerKey::Accepted(q.accepted))
    } else {
        None
    };

    Ok(Question {
        id: q.id,
        text: q.text,
        question_type,
        options,
        correct_answers,
        points: q.points,
        explanation: q.explanation,
        category: q.category,
        difficulty,
        version: 1,
    })
}

fn parse_instant(value: Option<&str>, field: &str) -> Result<Option<DateTime<Utc>>> {
    value
        .map(|s| {
            DateTime::parse_from_rfc3339(s)
                .map(|dt| dt.with_timezone(&Utc))
                .with_context(|| format!("invalid {field}: {s}"))
        })
        .transpose()
}

/// Recursively collect the `.toml` and `.json` files under a directory, in path order.
pub fn quiz_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
    {
        let path = entry?.path();
        if path.is_dir() {
            files.extend(quiz_files(&path)?);
        } else if path
            .extension()
            .is_some_and(|ext| ext == "toml" || ext == "json")
        {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

/// Recursively load all quizzes from a directory, skipping files that fail to load.
pub fn load_quiz_directory(dir: &Path) -> Result<Vec<Quiz>> {
    let mut quizzes = Vec::new();

    for path in quiz_files(dir)? {
        match parse_quiz(&path) {
            Ok(quiz) => quizzes.push(quiz),
            Err(e) => {
                tracing::warn!("skipping {}: {:#}", path.display(), e);
            }
        }
    }

    Ok(quizzes)
}

/// Write a quiz in its JSON form.
pub fn save_quiz_json(quiz: &Quiz, path: &Path) -> Result<()> {
    write_json(quiz, path, "quiz")
}

/// A learner's answers as submitted from outside the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerSheet {
    pub learner_id: String,
    #[serde(default)]
    pub time_spent_minutes: Option<u32>,
    #[serde(default)]
    pub answers: Answers,
}

/// Load an answer sheet from a `.toml` or `.json` file.
pub fn parse_answer_sheet(path: &Path) -> Result<AnswerSheet> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read answer sheet: {}", path.display()))?;
    parse_answer_sheet_str(&content, path)
}

pub fn parse_answer_sheet_str(content: &str, source_path: &Path) -> Result<AnswerSheet> {
    if source_path.extension().is_some_and(|ext| ext == "json") {
        serde_json::from_str(content)
            .with_context(|| format!("failed to parse answers JSON: {}", source_path.display()))
    } else {
        toml::from_str(content)
            .with_context(|| format!("failed to parse answers TOML: {}", source_path.display()))
    }
}

/// Write a scored attempt as JSON.
pub fn save_attempt_json(attempt: &Attempt, path: &Path) -> Result<()> {
    write_json(attempt, path, "attempt")
}

/// Load every `.json` attempt under a directory (non-recursive).
pub fn load_attempts(dir: &Path) -> Result<Vec<Attempt>> {
    let mut attempts = Vec::new();

    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("failed to read attempts directory: {}", dir.display()))?
    {
        let path = entry?.path();
        if !path.extension().is_some_and(|ext| ext == "json") {
            continue;
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read attempt: {}", path.display()))?;
        match serde_json::from_str::<Attempt>(&content) {
            Ok(attempt) => attempts.push(attempt),
            Err(e) => tracing::warn!("skipping {}: {}", path.display(), e),
        }
    }

    attempts.sort_by_key(|a| (a.submitted_at, a.started_at));
    Ok(attempts)
}

fn write_json<T: Serialize>(value: &T, path: &Path, what: &str) -> Result<()> {
    let json = serde_json::to_string_pretty(value)
        .with_context(|| format!("failed to serialize {what}"))?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, json)
        .with_context(|| format!("failed to write {what} to {}", path.display()))?;
    Ok(())
}
