//! The `quizsmith validate` command.

use std::path::PathBuf;

use anyhow::Result;

use quizsmith_core::lifecycle::check_publishable;
use quizsmith_core::model::{Quiz, QuizStatus};
use quizsmith_core::parser::{parse_quiz, quiz_files};
use quizsmith_core::validation::validate_quiz;

pub fn execute(quiz_path: PathBuf) -> Result<()> {
    let files = if quiz_path.is_dir() {
        quiz_files(&quiz_path)?
    } else {
        vec![quiz_path]
    };

    let mut total_problems = 0;

    for path in &files {
        match parse_quiz(path) {
            Ok(quiz) => total_problems += report_quiz(&quiz),
            Err(e) => {
                println!("{}", path.display());
                println!("  ERROR: {e:#}");
                total_problems += 1;
            }
        }
    }

    if total_problems == 0 {
        println!("All quizzes valid.");
        Ok(())
    } else {
        anyhow::bail!("{total_problems} problem(s) found")
    }
}

/// Print a quiz's validation results and return how many problems it has.
fn report_quiz(quiz: &Quiz) -> usize {
    println!(
        "Quiz: {} ({} questions, {} marks, {})",
        quiz.title,
        quiz.questions.len(),
        quiz.total_marks(),
        quiz.status
    );

    let errors = validate_quiz(quiz);
    for e in &errors {
        println!("  ERROR: {e}");
    }
    let mut problems = errors.len();

    if quiz.status == QuizStatus::Draft {
        match check_publishable(quiz) {
            Ok(()) => println!("  ready to publish"),
            Err(blocker) => {
                println!("  cannot publish: {blocker}");
                if errors.is_empty() {
                    problems += 1;
                }
            }
        }
    }

    problems
}
