//! The `quizsmith stats` command.

use std::path::PathBuf;

use anyhow::Result;

use quizsmith_core::parser::{load_attempts, parse_quiz};
use quizsmith_core::report::QuizReport;

use crate::config::load_config_from;

pub fn execute(
    quiz_path: PathBuf,
    attempts_dir: Option<PathBuf>,
    format: String,
    output: Option<PathBuf>,
) -> Result<()> {
    let attempts_dir = match attempts_dir {
        Some(dir) => dir,
        None => load_config_from(None)?.output_dir,
    };

    let quiz = parse_quiz(&quiz_path)?;
    let attempts = load_attempts(&attempts_dir)?;

    let skipped = attempts.iter().filter(|a| a.quiz_id != quiz.id).count();
    if skipped > 0 {
        tracing::warn!("ignoring {skipped} attempt(s) for other quizzes");
    }

    let report = QuizReport::build(&quiz, &attempts);

    match format.as_str() {
        "markdown" | "md" => println!("{}", report.to_markdown()),
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        _ => print_summary(&report),
    }

    if let Some(path) = output {
        report.save_json(&path)?;
        eprintln!("Report saved to: {}", path.display());
    }

    Ok(())
}

fn print_summary(report: &QuizReport) {
    use comfy_table::{Cell, Table};

    println!(
        "{}: {} attempts, {:.2}% average, {:.2}% pass rate",
        report.quiz.title,
        report.stats.attempts_count,
        report.stats.average_percentage,
        report.stats.pass_rate()
    );

    let mut table = Table::new();
    table.set_header(vec![
        "Question",
        "Correct",
        "Incorrect",
        "Unanswered",
        "Pending",
        "Correct %",
    ]);

    for q in &report.questions {
        table.add_row(vec![
            Cell::new(&q.question_id),
            Cell::new(q.correct),
            Cell::new(q.incorrect),
            Cell::new(q.unanswered),
            Cell::new(q.pending_manual),
            Cell::new(format!("{:.1}%", q.correct_rate())),
        ]);
    }

    println!("{table}");
}
