//! The `quizsmith score` command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use comfy_table::{Cell, Table};

use quizsmith_core::attempt::{start_attempt, Attempt};
use quizsmith_core::model::Quiz;
use quizsmith_core::parser::{parse_answer_sheet, parse_quiz, save_attempt_json};
use quizsmith_core::scoring::Outcome;

pub fn execute(
    quiz_path: PathBuf,
    answers_path: PathBuf,
    save: Option<PathBuf>,
    previous_attempts: usize,
    format: String,
) -> Result<()> {
    let quiz = parse_quiz(&quiz_path)?;
    let sheet = parse_answer_sheet(&answers_path)?;

    let now = Utc::now();
    let started_at = now - Duration::minutes(i64::from(sheet.time_spent_minutes.unwrap_or(0)));

    let attempt = start_attempt(&quiz, &sheet.learner_id, previous_attempts, started_at)
        .with_context(|| format!("cannot start attempt on quiz {}", quiz.id))?;
    let attempt = attempt
        .submit(&quiz, sheet.answers, now)
        .context("failed to score answers")?;

    tracing::info!(
        quiz_id = %quiz.id,
        learner_id = %attempt.learner_id,
        score = attempt.score,
        "attempt scored"
    );

    match format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&attempt)?),
        _ => print_summary(&quiz, &attempt),
    }

    if let Some(dir) = save {
        let path = dir.join(format!("{}.json", attempt.id));
        save_attempt_json(&attempt, &path)?;
        eprintln!("Attempt saved to: {}", path.display());
    }

    Ok(())
}

fn print_summary(quiz: &Quiz, attempt: &Attempt) {
    println!("Learner: {} ({})", attempt.learner_id, quiz.title);

    if !quiz.settings.show_results_immediately {
        println!("Submitted. Results will be released later.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["Question", "Type", "Result", "Points"]);

    for question in &quiz.questions {
        let Some(score) = attempt.per_question.get(&question.id) else {
            continue;
        };
        let result = match score.outcome {
            Outcome::Correct => "correct",
            Outcome::Incorrect => "incorrect",
            Outcome::Unanswered => "unanswered",
            Outcome::RequiresManualGrading => "needs grading",
            Outcome::ManuallyGraded => "graded",
        };
        table.add_row(vec![
            Cell::new(&question.id),
            Cell::new(question.question_type),
            Cell::new(result),
            Cell::new(format!("{}/{}", score.points_awarded, score.max_points)),
        ]);
    }

    println!("{table}");
    println!(
        "Score: {}/{} ({:.2}%) {}",
        attempt.score,
        attempt.total_marks,
        attempt.percentage,
        if attempt.passed { "PASS" } else { "FAIL" }
    );

    let pending = attempt.pending_manual();
    if !pending.is_empty() {
        println!("{} question(s) awaiting manual grading", pending.len());
    }
}
