//! Bulk question import from pipe-delimited text.
//!
//! Each non-blank line describes one single-choice question:
//!
//! ```text
//! question text | option A | option B | option C | option D | correct option text
//! ```
//!
//! Parsing is total. Every non-blank line ends up either as a question or as
//! exactly one [`LineError`], so `questions.len() + errors.len()` always equals
//! the number of non-blank lines.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::model::{Difficulty, Question, QuestionType};
use crate::validation::validate_question;

/// Field separator.
pub const DELIMITER: char = '|';

/// Question text, four options, and the correct option text.
pub const REQUIRED_FIELDS: usize = 6;

const OPTION_COUNT: usize = 4;

/// Values applied to every imported question.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportDefaults {
    /// Points per question; 1 when unset.
    #[serde(default)]
    pub points: Option<u32>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
}

/// Result of a bulk import: accepted questions plus per-line failures.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BulkImport {
    pub questions: Vec<Question>,
    pub errors: Vec<LineError>,
}

impl BulkImport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// A line that could not be turned into a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineError {
    /// 1-based, counted over the raw input including blank lines.
    pub line_number: usize,
    pub reason: LineErrorReason,
}

impl fmt::Display for LineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line_number, self.reason)
    }
}

/// Why a line was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LineErrorReason {
    InsufficientFields { found: usize },
    CorrectAnswerNotFound { answer: String },
    Invalid { errors: Vec<String> },
}

impl fmt::Display for LineErrorReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineErrorReason::InsufficientFields { found } => write!(
                f,
                "insufficient fields (expected {REQUIRED_FIELDS}, found {found})"
            ),
            LineErrorReason::CorrectAnswerNotFound { answer } => {
                write!(f, "correct answer not found among options: {answer:?}")
            }
            LineErrorReason::Invalid { errors } => write!(f, "{}", errors.join("; ")),
        }
    }
}

impl LineErrorReason {
    fn from_validation(errors: &[ValidationError]) -> Self {
        LineErrorReason::Invalid {
            errors: errors.iter().map(|e| e.to_string()).collect(),
        }
    }
}

/// Parse a block of pipe-delimited lines into questions.
pub fn parse_bulk_questions(block: &str, defaults: &ImportDefaults) -> BulkImport {
    let mut import = BulkImport::default();

    for (index, line) in block.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let line_number = index + 1;

        match parse_line(line, defaults) {
            Ok(question) => import.questions.push(question),
            Err(reason) => {
                tracing::debug!("bulk import skipped line {line_number}: {reason}");
                import.errors.push(LineError {
                    line_number,
                    reason,
                });
            }
        }
    }

    import
}

fn parse_line(line: &str, defaults: &ImportDefaults) -> Result<Question, LineErrorReason> {
    let fields: Vec<&str> = line.split(DELIMITER).map(str::trim).collect();
    if fields.len() < REQUIRED_FIELDS {
        return Err(LineErrorReason::InsufficientFields {
            found: fields.len(),
        });
    }

    let text = fields[0];
    let options = &fields[1..=OPTION_COUNT];
    let answer = fields[OPTION_COUNT + 1];

    let correct = options
        .iter()
        .position(|option| *option == answer)
        .ok_or_else(|| LineErrorReason::CorrectAnswerNotFound {
            answer: answer.to_string(),
        })?;

    let mut question = Question::choice(
        QuestionType::SingleChoice,
        text,
        options.iter().copied(),
        &[correct],
        defaults.points.unwrap_or(1),
    );
    question.category = defaults.category.clone();
    question.difficulty = defaults.difficulty.unwrap_or_default();

    let errors = validate_question(&question);
    if !errors.is_empty() {
        return Err(LineErrorReason::from_validation(&errors));
    }

    Ok(question)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AnswerKey;

    fn defaults() -> ImportDefaults {
        ImportDefaults::default()
    }

    #[test]
    fn parses_well_formed_line() {
        let import = parse_bulk_questions("Q|A|B|C|D|B", &defaults());
        assert!(import.is_clean());
        assert_eq!(import.questions.len(), 1);

        let q = &import.questions[0];
        assert_eq!(q.text, "Q");
        assert_eq!(q.question_type, QuestionType::SingleChoice);
        assert_eq!(q.options, vec!["A", "B", "C", "D"]);
        assert_eq!(
            q.correct_answers,
            Some(AnswerKey::Choices([1].into_iter().collect()))
        );
        assert_eq!(q.points, 1);
    }

    #[test]
    fn trims_fields_and_applies_defaults() {
        let defaults = ImportDefaults {
            points: Some(3),
            category: Some("geo".into()),
            difficulty: Some(Difficulty::Hard),
        };
        let import = parse_bulk_questions(
            "  Capital of Peru?  | Lima | Quito |Bogota| La Paz |  Lima ",
            &defaults,
        );
        let q = &import.questions[0];
        assert_eq!(q.text, "Capital of Peru?");
        assert_eq!(q.options[2], "Bogota");
        assert_eq!(q.points, 3);
        assert_eq!(q.category.as_deref(), Some("geo"));
        assert_eq!(q.difficulty, Difficulty::Hard);
    }

    #[test]
    fn reports_insufficient_fields() {
        let import = parse_bulk_questions("Q|A|B|C|D", &defaults());
        assert!(import.questions.is_empty());
        assert_eq!(
            import.errors,
            vec![LineError {
                line_number: 1,
                reason: LineErrorReason::InsufficientFields { found: 5 }
            }]
        );
        assert!(import.errors[0].to_string().contains("insufficient fields"));
    }

    #[test]
    fn answer_match_is_case_sensitive() {
        let import = parse_bulk_questions("Q|Apple|Pear|Plum|Fig|apple", &defaults());
        assert_eq!(import.errors.len(), 1);
        assert!(matches!(
            import.errors[0].reason,
            LineErrorReason::CorrectAnswerNotFound { .. }
        ));
        assert!(import.errors[0]
            .to_string()
            .contains("correct answer not found among options"));
    }

    #[test]
    fn validator_failures_become_line_errors() {
        let import = parse_bulk_questions(" |A||C|D|A", &defaults());
        assert_eq!(import.errors.len(), 1);
        let LineErrorReason::Invalid { errors } = &import.errors[0].reason else {
            panic!("expected validation failure");
        };
        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("blank"));
    }

    #[test]
    fn zero_default_points_rejected_per_line() {
        let defaults = ImportDefaults {
            points: Some(0),
            ..Default::default()
        };
        let import = parse_bulk_questions("Q|A|B|C|D|A\nR|A|B|C|D|D", &defaults);
        assert!(import.questions.is_empty());
        assert_eq!(import.errors.len(), 2);
        assert_eq!(import.errors[1].line_number, 2);
    }

    #[test]
    fn mixed_block_counts_every_nonblank_line() {
        let block = "\n\
            Q1|A|B|C|D|A\n\
            \n\
            broken line\n\
            Q2|A|B|C|D|E\n   \n\
            Q3|A|B|C|D|D|extra\r\n\
            Q4|w|x|y|z|y";
        let import = parse_bulk_questions(block, &defaults());
        let non_blank = block.lines().filter(|l| !l.trim().is_empty()).count();

        assert_eq!(import.questions.len() + import.errors.len(), non_blank);
        assert_eq!(import.questions.len(), 3);
        let lines: Vec<usize> = import.errors.iter().map(|e| e.line_number).collect();
        assert_eq!(lines, vec![4, 5]);
    }

    #[test]
    fn empty_input_is_not_an_error() {
        let import = parse_bulk_questions("", &defaults());
        assert!(import.questions.is_empty());
        assert!(import.errors.is_empty());

        let import = parse_bulk_questions("\n  \n\t\n", &defaults());
        assert!(import.questions.is_empty());
        assert!(import.errors.is_empty());
    }

    #[test]
    fn reparsing_is_structurally_identical() {
        let block = "Q1|A|B|C|D|C\nbad\nQ2|1|2|3|4|4";
        let first = parse_bulk_questions(block, &defaults());
        let second = parse_bulk_questions(block, &defaults());

        assert_eq!(first.errors, second.errors);
        assert_eq!(first.questions.len(), second.questions.len());
        for (a, b) in first.questions.iter().zip(&second.questions) {
            assert_ne!(a.id, b.id);
            assert_eq!(a.clone().with_id("x"), b.clone().with_id("x"));
        }
    }

    #[test]
    fn duplicate_options_resolve_to_first_match() {
        let import = parse_bulk_questions("Q|A|B|B|D|B", &defaults());
        assert_eq!(
            import.questions[0].correct_answers,
            Some(AnswerKey::Choices([1].into_iter().collect()))
        );
    }
}
