//! The `quizsmith import` command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;

use quizsmith_core::import::parse_bulk_questions;
use quizsmith_core::model::Quiz;
use quizsmith_core::parser::save_quiz_json;

use crate::config::load_config_from;

pub struct ImportArgs {
    pub input: PathBuf,
    pub points: Option<u32>,
    pub output: Option<PathBuf>,
    pub title: String,
    pub subject: String,
    pub duration: u32,
    pub format: String,
    pub strict: bool,
    pub config: Option<PathBuf>,
}

pub fn execute(args: ImportArgs) -> Result<()> {
    let config = load_config_from(args.config.as_deref())?;

    let block = std::fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read question file: {}", args.input.display()))?;

    let mut defaults = config.import_defaults();
    if let Some(points) = args.points {
        defaults.points = Some(points);
    }

    let import = parse_bulk_questions(&block, &defaults);

    match args.format.as_str() {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&import)?);
        }
        _ => {
            println!(
                "Imported {} question(s), {} line(s) rejected",
                import.questions.len(),
                import.errors.len()
            );
            for error in &import.errors {
                println!("  {error}");
            }
        }
    }

    if let Some(output) = &args.output {
        let mut quiz = Quiz::new_draft(&args.title, &args.subject, args.duration);
        quiz.created_at = Some(Utc::now());
        quiz.questions = import.questions.clone();
        quiz.passing_marks = config.passing_marks_for(quiz.total_marks());
        save_quiz_json(&quiz, output)?;
        eprintln!("Draft quiz saved to: {}", output.display());
    }

    if args.strict && !import.is_clean() {
        anyhow::bail!("{} line(s) rejected", import.errors.len());
    }

    Ok(())
}
