//! CLI integration tests using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn quizsmith() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("quizsmith").unwrap()
}

#[test]
fn validate_valid_quizzes() {
    quizsmith()
        .arg("validate")
        .arg("--quiz")
        .arg("../../quiz-sets/valid")
        .assert()
        .success()
        .stdout(predicate::str::contains("Geography Basics"))
        .stdout(predicate::str::contains("Ancient History"))
        .stdout(predicate::str::contains("ready to publish"))
        .stdout(predicate::str::contains("All quizzes valid"));
}

#[test]
fn validate_empty_draft_fails() {
    quizsmith()
        .arg("validate")
        .arg("--quiz")
        .arg("../../quiz-sets/invalid/empty-draft.toml")
        .assert()
        .failure()
        .stdout(predicate::str::contains("cannot publish: quiz has no questions"))
        .stderr(predicate::str::contains("1 problem(s) found"));
}

#[test]
fn validate_reports_unloadable_published_quiz() {
    quizsmith()
        .arg("validate")
        .arg("--quiz")
        .arg("../../quiz-sets/invalid")
        .assert()
        .failure()
        .stdout(predicate::str::contains("overstated-published.toml"))
        .stdout(predicate::str::contains("fails publication checks"))
        .stdout(predicate::str::contains("cannot publish: quiz has no questions"))
        .stderr(predicate::str::contains("2 problem(s) found"));
}

#[test]
fn score_rejects_published_quiz_with_inconsistent_totals() {
    quizsmith()
        .arg("score")
        .arg("--quiz")
        .arg("../../quiz-sets/invalid/overstated-published.toml")
        .arg("--answers")
        .arg("../../quiz-sets/answers/bob.json")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "total marks is set to 1 but questions add up to 5",
        ));
}

#[test]
fn validate_nonexistent_file() {
    quizsmith()
        .arg("validate")
        .arg("--quiz")
        .arg("nonexistent.toml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn import_reports_rejected_lines() {
    quizsmith()
        .arg("import")
        .arg("--input")
        .arg("../../quiz-sets/questions.txt")
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 3 question(s), 2 line(s) rejected"))
        .stdout(predicate::str::contains("line 4: insufficient fields"))
        .stdout(predicate::str::contains(
            "line 5: correct answer not found among options",
        ));
}

#[test]
fn import_strict_fails_on_rejected_lines() {
    quizsmith()
        .arg("import")
        .arg("--input")
        .arg("../../quiz-sets/questions.txt")
        .arg("--strict")
        .assert()
        .failure()
        .stderr(predicate::str::contains("2 line(s) rejected"));
}

#[test]
fn import_writes_draft_quiz() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("imported.json");

    quizsmith()
        .arg("import")
        .arg("--input")
        .arg("../../quiz-sets/questions.txt")
        .arg("--points")
        .arg("2")
        .arg("--title")
        .arg("Imported")
        .arg("--output")
        .arg(&output)
        .assert()
        .success();

    let quiz: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(quiz["status"], "draft");
    assert_eq!(quiz["title"], "Imported");
    assert!(quiz["created_at"].is_string());
    assert_eq!(quiz["questions"].as_array().unwrap().len(), 3);
    assert_eq!(quiz["questions"][0]["points"], 2);
    // Default passing percentage is 50% of 6 marks.
    assert_eq!(quiz["passing_marks"], 3);
}

#[test]
fn import_with_huge_points_saves_unpublishable_draft() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("huge.json");

    quizsmith()
        .arg("import")
        .arg("--input")
        .arg("../../quiz-sets/questions.txt")
        .arg("--points")
        .arg("4294967295")
        .arg("--output")
        .arg(&output)
        .assert()
        .success();

    quizsmith()
        .arg("validate")
        .arg("--quiz")
        .arg(&output)
        .assert()
        .failure()
        .stdout(predicate::str::contains(
            "question points add up to more than 4294967295 marks",
        ));
}

#[test]
fn import_json_format() {
    quizsmith()
        .arg("import")
        .arg("--input")
        .arg("../../quiz-sets/questions.txt")
        .arg("--format")
        .arg("json")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"insufficient_fields\""))
        .stdout(predicate::str::contains("\"single-choice\""));
}

#[test]
fn transition_publishes_draft() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("history.json");

    quizsmith()
        .arg("transition")
        .arg("--quiz")
        .arg("../../quiz-sets/valid/history.toml")
        .arg("--to")
        .arg("published")
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("draft -> published"));

    // Publishing twice is not an edge of the state machine.
    quizsmith()
        .arg("transition")
        .arg("--quiz")
        .arg(&output)
        .arg("--to")
        .arg("published")
        .arg("--output")
        .arg(dir.path().join("again.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "invalid transition from published to published",
        ));
}

#[test]
fn transition_rejects_empty_draft() {
    let dir = TempDir::new().unwrap();

    quizsmith()
        .arg("transition")
        .arg("--quiz")
        .arg("../../quiz-sets/invalid/empty-draft.toml")
        .arg("--to")
        .arg("published")
        .arg("--output")
        .arg(dir.path().join("out.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("quiz has no questions"));
}

#[test]
fn score_answer_sheet() {
    quizsmith()
        .arg("score")
        .arg("--quiz")
        .arg("../../quiz-sets/valid/geography.toml")
        .arg("--answers")
        .arg("../../quiz-sets/answers/ada.toml")
        .assert()
        .success()
        .stdout(predicate::str::contains("Score: 6/10 (60.00%)"))
        .stdout(predicate::str::contains("PASS"))
        .stdout(predicate::str::contains("1 question(s) awaiting manual grading"));
}

#[test]
fn score_rejects_draft_quiz() {
    quizsmith()
        .arg("score")
        .arg("--quiz")
        .arg("../../quiz-sets/valid/history.toml")
        .arg("--answers")
        .arg("../../quiz-sets/answers/ada.toml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not published"));
}

#[test]
fn score_rejects_unknown_question() {
    quizsmith()
        .arg("score")
        .arg("--quiz")
        .arg("../../quiz-sets/valid/geography.toml")
        .arg("--answers")
        .arg("../../quiz-sets/answers/ghost.toml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not-a-question"));
}

#[test]
fn score_then_stats() {
    let dir = TempDir::new().unwrap();
    let attempts = dir.path().join("attempts");

    for sheet in ["ada.toml", "bob.json"] {
        quizsmith()
            .arg("score")
            .arg("--quiz")
            .arg("../../quiz-sets/valid/geography.toml")
            .arg("--answers")
            .arg(format!("../../quiz-sets/answers/{sheet}"))
            .arg("--save")
            .arg(&attempts)
            .assert()
            .success();
    }

    let report_path = dir.path().join("report.json");
    quizsmith()
        .arg("stats")
        .arg("--quiz")
        .arg("../../quiz-sets/valid/geography.toml")
        .arg("--attempts")
        .arg(&attempts)
        .arg("--output")
        .arg(&report_path)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Geography Basics: 2 attempts, 40.00% average, 50.00% pass rate",
        ));

    assert!(report_path.exists());

    quizsmith()
        .arg("stats")
        .arg("--quiz")
        .arg("../../quiz-sets/valid/geography.toml")
        .arg("--attempts")
        .arg(&attempts)
        .arg("--format")
        .arg("markdown")
        .assert()
        .success()
        .stdout(predicate::str::contains("| capital-france | 2 | 0 | 0 | 0 | 100.0% |"));
}

#[test]
fn init_creates_files() {
    let dir = TempDir::new().unwrap();

    quizsmith()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created quizsmith.toml"))
        .stdout(predicate::str::contains("Created quizzes/example.toml"))
        .stdout(predicate::str::contains("Created questions.txt"));

    assert!(dir.path().join("quizsmith.toml").exists());
    assert!(dir.path().join("quizzes/example.toml").exists());

    // The generated example must itself validate.
    quizsmith()
        .current_dir(dir.path())
        .arg("validate")
        .arg("--quiz")
        .arg("quizzes/example.toml")
        .assert()
        .success()
        .stdout(predicate::str::contains("ready to publish"));
}

#[test]
fn init_skips_existing() {
    let dir = TempDir::new().unwrap();

    quizsmith()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    quizsmith()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn help_output() {
    quizsmith()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Quiz authoring, bulk import, and scoring engine",
        ));
}
