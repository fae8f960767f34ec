//! quizsmith command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;
mod config;

#[derive(Parser)]
#[command(
    name = "quizsmith",
    version,
    about = "Quiz authoring, bulk import, and scoring engine"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import pipe-delimited questions from a text file
    Import {
        /// Text file with one `question | A | B | C | D | answer` per line
        #[arg(long)]
        input: PathBuf,

        /// Points per imported question (overrides config)
        #[arg(long)]
        points: Option<u32>,

        /// Write a draft quiz containing the imported questions
        #[arg(long)]
        output: Option<PathBuf>,

        /// Title of the draft quiz
        #[arg(long, default_value = "Imported quiz")]
        title: String,

        /// Subject of the draft quiz
        #[arg(long, default_value = "")]
        subject: String,

        /// Duration of the draft quiz in minutes
        #[arg(long, default_value = "30")]
        duration: u32,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,

        /// Exit code 1 if any line was rejected
        #[arg(long)]
        strict: bool,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate quiz files and check whether drafts can be published
    Validate {
        /// Path to quiz file or directory
        #[arg(long)]
        quiz: PathBuf,
    },

    /// Move a quiz through its lifecycle (published, archived)
    Transition {
        /// Quiz file (.toml or .json)
        #[arg(long)]
        quiz: PathBuf,

        /// Target status
        #[arg(long)]
        to: String,

        /// Where to write the updated quiz JSON (default: next to the input)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Score an answer sheet against a quiz
    Score {
        /// Quiz file (.toml or .json)
        #[arg(long)]
        quiz: PathBuf,

        /// Answer sheet (.toml or .json)
        #[arg(long)]
        answers: PathBuf,

        /// Directory to save the scored attempt into
        #[arg(long)]
        save: Option<PathBuf>,

        /// Completed attempts this learner already has
        #[arg(long, default_value = "0")]
        previous_attempts: usize,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Aggregate saved attempts into quiz statistics
    Stats {
        /// Quiz file (.toml or .json)
        #[arg(long)]
        quiz: PathBuf,

        /// Directory of saved attempt JSON files (default: config output_dir)
        #[arg(long)]
        attempts: Option<PathBuf>,

        /// Output format: text, json, markdown
        #[arg(long, default_value = "text")]
        format: String,

        /// Save the report as JSON
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Create a starter config, example quiz, and question file
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("quizsmith_core=info".parse().unwrap())
                .add_directive("quizsmith=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Import {
            input,
            points,
            output,
            title,
            subject,
            duration,
            format,
            strict,
            config,
        } => commands::import::execute(commands::import::ImportArgs {
            input,
            points,
            output,
            title,
            subject,
            duration,
            format,
            strict,
            config,
        }),
        Commands::Validate { quiz } => commands::validate::execute(quiz),
        Commands::Transition { quiz, to, output } => {
            commands::transition::execute(quiz, to, output)
        }
        Commands::Score {
            quiz,
            answers,
            save,
            previous_attempts,
            format,
        } => commands::score::execute(quiz, answers, save, previous_attempts, format),
        Commands::Stats {
            quiz,
            attempts,
            format,
            output,
        } => commands::stats::execute(quiz, attempts, format, output),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
