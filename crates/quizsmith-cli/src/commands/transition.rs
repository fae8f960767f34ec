//! The `quizsmith transition` command.

use std::path::PathBuf;

use anyhow::Result;
use chrono::Utc;

use quizsmith_core::lifecycle::transition_quiz;
use quizsmith_core::model::QuizStatus;
use quizsmith_core::parser::{parse_quiz, save_quiz_json};

pub fn execute(quiz_path: PathBuf, to: String, output: Option<PathBuf>) -> Result<()> {
    let target: QuizStatus = to.parse().map_err(|e: String| anyhow::anyhow!("{}", e))?;
    let quiz = parse_quiz(&quiz_path)?;

    let next = transition_quiz(&quiz, target, Utc::now())?;

    let output = output.unwrap_or_else(|| quiz_path.with_extension("json"));
    save_quiz_json(&next, &output)?;

    println!("Quiz {}: {} -> {}", next.id, quiz.status, next.status);
    eprintln!("Saved to: {}", output.display());
    Ok(())
}
