//! The `quizsmith init` command.

use std::path::Path;

use anyhow::Result;

pub fn execute() -> Result<()> {
    write_if_missing(Path::new("quizsmith.toml"), SAMPLE_CONFIG)?;

    std::fs::create_dir_all("quizzes")?;
    write_if_missing(Path::new("quizzes/example.toml"), EXAMPLE_QUIZ)?;
    write_if_missing(Path::new("questions.txt"), EXAMPLE_QUESTIONS)?;

    println!("\nNext steps:");
    println!("  1. Run: quizsmith validate --quiz quizzes/example.toml");
    println!("  2. Run: quizsmith transition --quiz quizzes/example.toml --to published");
    println!("  3. Run: quizsmith import --input questions.txt --output quizzes/imported.json");

    Ok(())
}

fn write_if_missing(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        println!("{} already exists, skipping.", path.display());
    } else {
        std::fs::write(path, content)?;
        println!("Created {}", path.display());
    }
    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# quizsmith configuration

output_dir = "./quizsmith-results"

[import]
default_points = 1
default_difficulty = "medium"

[grading]
passing_percentage = 50.0
"#;

const EXAMPLE_QUIZ: &str = r#"[quiz]
id = "example"
title = "Example Quiz"
description = "A short quiz to get started"
subject = "general"
duration_minutes = 10
passing_marks = 3

[quiz.settings]
allow_retake = true

[[questions]]
id = "capital-france"
text = "What is the capital of France?"
type = "single-choice"
options = ["Berlin", "Paris", "Rome", "Madrid"]
correct = [1]
points = 1

[[questions]]
id = "primes"
text = "Which of these are prime?"
type = "multi-choice"
options = ["2", "4", "5", "9"]
correct = [0, 2]
points = 2

[[questions]]
id = "boiling"
text = "Water boils at 100 degrees Celsius at sea level."
type = "true-false"
correct = [0]
points = 1

[[questions]]
id = "largest-planet"
text = "Name the largest planet in the solar system."
type = "short-answer"
accepted = ["Jupiter"]
points = 1
"#;

const EXAMPLE_QUESTIONS: &str = "\
What is 2 + 2? | 3 | 4 | 5 | 6 | 4
Which gas do plants absorb? | Oxygen | Nitrogen | Carbon dioxide | Helium | Carbon dioxide
Who wrote Hamlet? | Marlowe | Shakespeare | Jonson | Kyd | Shakespeare
";
